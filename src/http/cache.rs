//! HTTP cache control module
//!
//! Disables client and intermediary caching, and evaluates
//! `If-Modified-Since` conditional requests against file modification times.

use hyper::header::{HeaderMap, HeaderValue, CACHE_CONTROL, EXPIRES, PRAGMA};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// `Cache-Control` value sent on every response
pub const NO_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";
/// `Pragma` value sent on every response
pub const NO_CACHE_PRAGMA: &str = "no-cache";
/// `Expires` value sent on every response
pub const NO_CACHE_EXPIRES: &str = "0";

/// Append the no-cache header set to a response's headers
///
/// Headers are appended, never inserted, so anything the file handler
/// already set (`Content-Type`, `Content-Length`, `Last-Modified`, ...)
/// stays exactly as it was.
pub fn append_no_cache_headers(headers: &mut HeaderMap) {
    headers.append(CACHE_CONTROL, HeaderValue::from_static(NO_CACHE_CONTROL));
    headers.append(PRAGMA, HeaderValue::from_static(NO_CACHE_PRAGMA));
    headers.append(EXPIRES, HeaderValue::from_static(NO_CACHE_EXPIRES));
}

/// Format a modification time as an HTTP date for `Last-Modified`
pub fn format_last_modified(modified: SystemTime) -> String {
    httpdate::fmt_http_date(modified)
}

/// Check whether a conditional GET can be answered with 304
///
/// `If-None-Match` takes precedence: when the client sent one, the
/// modification date is not consulted. Unparseable dates are ignored.
///
/// # Arguments
/// * `if_modified_since` - Client-sent If-Modified-Since header
/// * `has_if_none_match` - Whether the client also sent If-None-Match
/// * `modified` - File modification time
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    has_if_none_match: bool,
    modified: SystemTime,
) -> bool {
    if has_if_none_match {
        return false;
    }

    let Some(since) = if_modified_since.and_then(|v| httpdate::parse_http_date(v.trim()).ok())
    else {
        return false;
    };

    // HTTP dates have whole-second resolution
    truncate_to_seconds(modified) <= since
}

fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    time.duration_since(UNIX_EPOCH)
        .map_or(time, |d| UNIX_EPOCH + Duration::from_secs(d.as_secs()))
}
