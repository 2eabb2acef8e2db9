//! Request dispatch module
//!
//! Entry point for HTTP request processing: method check, resolution,
//! response finalization and access logging.

use crate::config::AppState;
use crate::handler::resolve::{self, Resolved};
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw URL path, still percent-encoded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_modified_since: headers
                .get("if-modified-since")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: headers.contains_key("if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling.
///
/// Generic over the request body, which is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = respond(&req, &state).await;
    let response = http::apply_isolation_headers(response);

    if state.access_log() {
        log_access(&req, &response, peer_addr);
    }
    Ok(response)
}

/// Produce the response before finalization
async fn respond<B>(req: &Request<B>, state: &AppState) -> Response<Full<Bytes>> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        logger::log_warning(&format!("Unsupported method: {}", req.method()));
        return http::build_501_response();
    }

    let ctx = RequestContext::from_request(req);
    match resolve::resolve(&state.root, ctx.path, ctx.query).await {
        Resolved::File(path) => static_files::serve_file(&ctx, &path).await,
        Resolved::Listing(dir) => static_files::serve_listing(&ctx, &dir).await,
        Resolved::Redirect(location) => http::build_301_response(&location, ctx.is_head),
        Resolved::NotFound => http::build_404_response(ctx.is_head),
        Resolved::Failed(e) => {
            let path = resolve::translate_path(&state.root, &resolve::percent_decode(ctx.path));
            static_files::io_error_response(&ctx, &path, &e)
        }
    }
}

fn log_access<B>(req: &Request<B>, response: &Response<Full<Bytes>>, peer_addr: SocketAddr) {
    let uri = req
        .uri()
        .path_and_query()
        .map_or_else(|| req.uri().to_string(), ToString::to_string);
    let mut entry = AccessLogEntry::new(peer_addr.ip().to_string(), req.method().to_string(), uri);
    entry.http_version = version_label(req.version()).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().filter(|&n| n > 0);
    logger::log_access(&entry);
}

fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use http_body_util::BodyExt;
    use std::path::{Path, PathBuf};

    /// Temporary serving root, removed on drop
    struct ScratchRoot(PathBuf);

    impl std::ops::Deref for ScratchRoot {
        type Target = Path;

        fn deref(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for ScratchRoot {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    /// Scratch serving root with `examples/demo.wasm`, `examples/index.html`,
    /// `examples/app.js` and an index-less `pkg/` directory.
    fn scratch_root(name: &str) -> ScratchRoot {
        let root = std::env::temp_dir().join(format!(
            "wasm_serve_router_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(root.join("examples")).unwrap();
        std::fs::create_dir_all(root.join("pkg")).unwrap();
        std::fs::write(root.join("examples/demo.wasm"), b"\0asm\x01\0\0\0").unwrap();
        std::fs::write(root.join("examples/index.html"), "<h1>demo</h1>").unwrap();
        std::fs::write(root.join("examples/app.js"), "console.log(1)").unwrap();
        std::fs::write(root.join("pkg/app_bg.wasm"), b"\0asm").unwrap();
        ScratchRoot(root)
    }

    fn state_for(root: &Path) -> Arc<AppState> {
        let mut cfg = Config::load().unwrap();
        cfg.server.root = root.to_string_lossy().into_owned();
        cfg.logging.access_log = false;
        Arc::new(AppState::new(&cfg).unwrap())
    }

    async fn send(state: &Arc<AppState>, method: Method, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::builder().method(method).uri(uri).body(()).unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        handle_request(req, Arc::clone(state), peer).await.unwrap()
    }

    async fn body_of(response: Response<Full<Bytes>>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    fn assert_isolated(response: &Response<Full<Bytes>>) {
        assert_eq!(response.headers()["cross-origin-embedder-policy"], "require-corp");
        assert_eq!(response.headers()["cross-origin-opener-policy"], "same-origin");
    }

    #[tokio::test]
    async fn test_wasm_served_with_wasm_type() {
        let root = scratch_root("wasm");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/examples/demo.wasm").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/wasm");
        assert!(response.headers().contains_key("last-modified"));
        assert_isolated(&response);
        assert_eq!(body_of(response).await, Bytes::from_static(b"\0asm\x01\0\0\0"));
    }

    #[tokio::test]
    async fn test_default_types() {
        let root = scratch_root("types");
        let state = state_for(&root);

        let html = send(&state, Method::GET, "/examples/index.html").await;
        assert_eq!(html.status(), 200);
        assert!(html.headers()["content-type"].to_str().unwrap().starts_with("text/html"));
        assert_isolated(&html);

        let js = send(&state, Method::GET, "/examples/app.js?cache=no").await;
        assert_eq!(js.headers()["content-type"], "application/javascript");
    }

    #[tokio::test]
    async fn test_missing_file_is_404_with_headers() {
        let root = scratch_root("missing");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/examples/missing.txt").await;
        assert_eq!(response.status(), 404);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_directory_redirect_and_index() {
        let root = scratch_root("dirs");
        let state = state_for(&root);

        let redirect = send(&state, Method::GET, "/examples?x=1").await;
        assert_eq!(redirect.status(), 301);
        assert_eq!(redirect.headers()["location"], "/examples/?x=1");
        assert_isolated(&redirect);

        let index = send(&state, Method::GET, "/examples/").await;
        assert_eq!(index.status(), 200);
        assert_eq!(body_of(index).await, Bytes::from_static(b"<h1>demo</h1>"));
    }

    #[tokio::test]
    async fn test_listing() {
        let root = scratch_root("listing");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/pkg/").await;
        assert_eq!(response.status(), 200);
        assert_isolated(&response);
        let body = body_of(response).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Directory listing for /pkg/"));
        assert!(html.contains("app_bg.wasm"));
    }

    #[tokio::test]
    async fn test_file_with_trailing_slash_is_404() {
        let root = scratch_root("slash");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/examples/demo.wasm/").await;
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_traversal_stays_in_root() {
        let root = scratch_root("traversal");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/../../examples/%2e%2e/examples/demo.wasm").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/wasm");

        let outside = send(&state, Method::GET, "/../../../etc/passwd").await;
        assert_eq!(outside.status(), 404);
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let root = scratch_root("head");
        let state = state_for(&root);

        let response = send(&state, Method::HEAD, "/examples/demo.wasm").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-length"], "8");
        assert_isolated(&response);
        assert!(body_of(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let root = scratch_root("method");
        let state = state_for(&root);

        let response = send(&state, Method::POST, "/examples/demo.wasm").await;
        assert_eq!(response.status(), 501);
        assert_isolated(&response);
    }

    #[tokio::test]
    async fn test_if_modified_since() {
        let root = scratch_root("conditional");
        let state = state_for(&root);

        let first = send(&state, Method::GET, "/examples/demo.wasm").await;
        let last_modified = first.headers()["last-modified"].clone();

        let req = Request::builder()
            .uri("/examples/demo.wasm")
            .header("If-Modified-Since", last_modified.clone())
            .body(())
            .unwrap();
        let peer: SocketAddr = "127.0.0.1:40000".parse().unwrap();
        let response = handle_request(req, Arc::clone(&state), peer).await.unwrap();
        assert_eq!(response.status(), 304);
        assert_isolated(&response);

        let req = Request::builder()
            .uri("/examples/demo.wasm")
            .header("If-Modified-Since", last_modified)
            .header("If-None-Match", "\"abc\"")
            .body(())
            .unwrap();
        let response = handle_request(req, state, peer).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_leading_double_slash_redirect_stays_local() {
        let root = scratch_root("double_slash");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "//examples").await;
        assert_eq!(response.status(), 301);
        assert_eq!(response.headers()["location"], "/examples/");
        assert_isolated(&response);

        let response = send(&state, Method::GET, "///examples?x=1").await;
        assert_eq!(response.headers()["location"], "/examples/?x=1");
    }

    #[tokio::test]
    async fn test_escaped_slash_is_not_trailing() {
        let root = scratch_root("escaped_slash");
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/examples/demo.wasm%2F").await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["content-type"], "application/wasm");
    }

    #[tokio::test]
    async fn test_large_wasm_body_is_complete() {
        let root = scratch_root("large");
        let data: Vec<u8> = (0..4 * 1024 * 1024).map(|i: u32| (i % 251) as u8).collect();
        std::fs::write(root.join("pkg/big_bg.wasm"), &data).unwrap();
        let state = state_for(&root);

        let response = send(&state, Method::GET, "/pkg/big_bg.wasm").await;
        assert_eq!(response.status(), 200);
        assert_eq!(
            response.headers()["content-length"],
            data.len().to_string().as_str()
        );
        assert_eq!(body_of(response).await, Bytes::from(data));
    }
}
