//! MIME type detection module
//!
//! Returns the corresponding Content-Type based on file extension.

use std::ffi::OsStr;
use std::path::Path;

pub const WASM_CONTENT_TYPE: &str = "application/wasm";

/// Content type for a resolved file.
///
/// Paths ending in `.wasm` always get `application/wasm`; everything else
/// falls through to [`guess_type`].
pub fn content_type_for(path: &Path) -> &'static str {
    if path.as_os_str().to_string_lossy().ends_with(".wasm") {
        return WASM_CONTENT_TYPE;
    }
    guess_type(path)
}

/// Default extension-based guess (extension compared case-insensitively)
pub fn guess_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // Text
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("txt" | "md") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("csv") => "text/csv",

        // Scripts and data
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Video
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        // Audio
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Archives and documents
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",

        _ => "application/octet-stream",
    }
}
