//! Logger module
//!
//! Startup banner on stdout; access, warning and error lines on stderr.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

/// Write to info log
fn write_info(message: &str) {
    println!("{message}");
}

/// Write to error log
fn write_error(message: &str) {
    eprintln!("{message}");
}

/// The two lines an operator sees when the server comes up.
/// `base_url` ends with `/`.
pub fn startup_lines(base_url: &str) -> [String; 2] {
    [
        format!("Server running at {base_url}"),
        format!("Open {base_url}examples/ to view examples"),
    ]
}

pub fn log_server_start(base_url: &str) {
    for line in startup_lines(base_url) {
        write_info(&line);
    }
}

pub fn log_shutdown(signal: &str) {
    write_error(&format!("\n[SIGNAL] {signal} received, shutting down"));
}

pub fn log_accept_error(err: &std::io::Error) {
    write_error(&format!("[ERROR] Failed to accept connection: {err}"));
}

pub fn log_connection_error(peer_addr: &SocketAddr, err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection from {peer_addr}: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry) {
    write_error(&entry.format_common());
}
