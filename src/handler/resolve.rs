//! Path resolution module
//!
//! Maps a request URL path onto the serving root.

use percent_encoding::percent_decode_str;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files tried, in order, when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Outcome of resolving a URL path
#[derive(Debug)]
pub enum Resolved {
    /// A regular file to send
    File(PathBuf),
    /// A directory without an index file
    Listing(PathBuf),
    /// Directory requested without its trailing slash
    Redirect(String),
    NotFound,
    Failed(io::Error),
}

/// Resolve `uri_path` (raw, still percent-encoded) under `root`.
///
/// `root` must already be canonical.
pub async fn resolve(root: &Path, uri_path: &str, query: Option<&str>) -> Resolved {
    // Taken before decoding: an escaped `%2F` does not count as a trailing slash
    let trailing_slash = uri_path.ends_with('/');
    let decoded = percent_decode(uri_path);
    let path = translate_path(root, &decoded);

    let metadata = match fs::metadata(&path).await {
        Ok(m) => m,
        Err(e) => return from_io_error(e),
    };

    // Symlinks may point anywhere; only serve what stays under the root
    match fs::canonicalize(&path).await {
        Ok(canonical) if canonical.starts_with(root) => {}
        Ok(canonical) => {
            crate::logger::log_warning(&format!(
                "Path outside serving root blocked: {uri_path} -> {}",
                canonical.display()
            ));
            return Resolved::NotFound;
        }
        Err(e) => return from_io_error(e),
    }

    if metadata.is_dir() {
        if !trailing_slash {
            // A leading `//` would make the Location protocol-relative
            let base = format!("/{}", uri_path.trim_start_matches('/'));
            let location = match query {
                Some(q) => format!("{base}/?{q}"),
                None => format!("{base}/"),
            };
            return Resolved::Redirect(location);
        }
        for index in INDEX_FILES {
            let index_path = path.join(index);
            if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
                return Resolved::File(index_path);
            }
        }
        return Resolved::Listing(path);
    }

    if trailing_slash {
        return Resolved::NotFound;
    }
    Resolved::File(path)
}

fn from_io_error(e: io::Error) -> Resolved {
    match e.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Resolved::NotFound,
        _ => Resolved::Failed(e),
    }
}

/// Join a decoded URL path onto `root`.
///
/// `.` and empty segments are skipped and `..` pops the previous segment,
/// never going above the root.
pub fn translate_path(root: &Path, decoded: &str) -> PathBuf {
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            // A backslash or drive prefix must not turn into a path component
            s if s.contains('\\') || (cfg!(windows) && s.contains(':')) => {}
            s => segments.push(s),
        }
    }
    segments
        .into_iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment))
}

/// Decode `%XX` escapes. Malformed escapes are kept literally and invalid
/// UTF-8 is replaced.
pub fn percent_decode(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}
