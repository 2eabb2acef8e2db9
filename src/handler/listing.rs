//! Directory listing module
//!
//! Renders the default HTML index for directories without an index file.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters left unescaped in listing links
const LINK_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// One directory entry as shown in the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    /// Directory, or a symlink resolving to one
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Read `dir` and render its listing. `display_path` is the decoded URL path.
pub async fn render_directory(dir: &Path, display_path: &str) -> io::Result<String> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();
    while let Some(entry) = reader.next_entry().await? {
        // `metadata` follows symlinks, `file_type` does not
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        entries.push(ListingEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
            is_symlink,
        });
    }
    Ok(render_listing(display_path, entries))
}

/// Build the listing page; entries are sorted case-insensitively
pub fn render_listing(display_path: &str, mut entries: Vec<ListingEntry>) -> String {
    entries.sort_by_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>\n<hr>\n<ul>");
    for entry in &entries {
        let link_suffix = if entry.is_dir { "/" } else { "" };
        // Symlinks are marked with `@`, even when they point at a directory
        let display_suffix = if entry.is_symlink { "@" } else { link_suffix };
        let _ = writeln!(
            html,
            "<li><a href=\"{}{link_suffix}\">{}{display_suffix}</a></li>",
            utf8_percent_encode(&entry.name, LINK_SET),
            escape_html(&entry.name),
        );
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
