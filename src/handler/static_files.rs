//! Static file serving module
//!
//! Loads resolved files and directory listings and builds their responses.

use crate::handler::listing;
use crate::handler::resolve::percent_decode;
use crate::handler::router::RequestContext;
use crate::http::{self, conditional, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use tokio::fs;

/// Serve a regular file, honoring `If-Modified-Since`
pub async fn serve_file(ctx: &RequestContext<'_>, file_path: &Path) -> Response<Full<Bytes>> {
    let modified = match fs::metadata(file_path).await.and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(e) => return io_error_response(ctx, file_path, &e),
    };
    let last_modified = conditional::format_http_date(modified);

    if conditional::is_not_modified(
        ctx.if_modified_since.as_deref(),
        ctx.has_if_none_match,
        modified,
    ) {
        return http::build_304_response(&last_modified);
    }

    // Buffered whole: served assets are test bundles, and a full body keeps
    // `Content-Length` exact for HEAD and the access log
    let content = match fs::read(file_path).await {
        Ok(c) => c,
        Err(e) => return io_error_response(ctx, file_path, &e),
    };

    http::build_file_response(
        Bytes::from(content),
        mime::content_type_for(file_path),
        &last_modified,
        ctx.is_head,
    )
}

/// Serve the generated listing for a directory without an index file
pub async fn serve_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    match listing::render_directory(dir, &percent_decode(ctx.path)).await {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(e) => io_error_response(ctx, dir, &e),
    }
}

/// Map an I/O failure to 404 or 500
pub fn io_error_response(
    ctx: &RequestContext<'_>,
    path: &Path,
    err: &io::Error,
) -> Response<Full<Bytes>> {
    if err.kind() == io::ErrorKind::NotFound {
        return http::build_404_response(ctx.is_head);
    }
    logger::log_error(&format!("Failed to read '{}': {err}", path.display()));
    http::build_500_response(ctx.is_head)
}
