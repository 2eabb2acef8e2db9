//! Request handler module
//!
//! Method validation, path resolution and static file serving. The router
//! finalizes every response with the cross-origin isolation headers.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
