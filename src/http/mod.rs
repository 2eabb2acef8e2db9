//! HTTP protocol layer module
//!
//! Content types, conditional requests, response builders and the
//! cross-origin isolation headers applied to every response.

pub mod conditional;
pub mod isolation;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use isolation::apply_isolation_headers;
pub use response::{
    build_301_response, build_304_response, build_404_response, build_500_response,
    build_501_response, build_file_response, build_html_response,
};
