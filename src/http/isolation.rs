//! Cross-origin isolation headers
//!
//! Browsers only expose `SharedArrayBuffer` and high-resolution timers to
//! pages served with both headers below.

use hyper::header::{HeaderName, HeaderValue};
use hyper::Response;

pub const EMBEDDER_POLICY: &str = "cross-origin-embedder-policy";
pub const EMBEDDER_POLICY_VALUE: &str = "require-corp";
pub const OPENER_POLICY: &str = "cross-origin-opener-policy";
pub const OPENER_POLICY_VALUE: &str = "same-origin";

/// Append both isolation headers to a finished response, whatever its status.
pub fn apply_isolation_headers<B>(mut response: Response<B>) -> Response<B> {
    let headers = response.headers_mut();
    headers.append(
        HeaderName::from_static(EMBEDDER_POLICY),
        HeaderValue::from_static(EMBEDDER_POLICY_VALUE),
    );
    headers.append(
        HeaderName::from_static(OPENER_POLICY),
        HeaderValue::from_static(OPENER_POLICY_VALUE),
    );
    response
}
