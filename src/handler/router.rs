//! Request dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the file handler, and the final header hook that runs for every response.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<&'a str>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_parts(parts: &'a Parts) -> Self {
        let headers = &parts.headers;
        Self {
            method: &parts.method,
            path: parts.uri.path(),
            query: parts.uri.query(),
            is_head: parts.method == Method::HEAD,
            if_modified_since: headers
                .get("if-modified-since")
                .and_then(|v| v.to_str().ok()),
            has_if_none_match: headers.contains_key("if-none-match"),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // GET and HEAD carry no meaningful body
    let (parts, body) = req.into_parts();
    drop(body);
    let ctx = RequestContext::from_parts(&parts);

    let mut response = dispatch(&ctx, &state).await;
    finalize_headers(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            parts.method.to_string(),
            parts
                .uri
                .path_and_query()
                .map_or_else(|| ctx.path.to_string(), ToString::to_string),
        );
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.referer = header_string(&parts, REFERER);
        entry.user_agent = header_string(&parts, USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route a request to the file handler, or reject its method
async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(ctx) {
        return resp;
    }
    static_files::serve_path(ctx, &state.root).await
}

/// Only GET and HEAD are served; everything else gets 501
fn check_http_method(ctx: &RequestContext<'_>) -> Option<Response<Full<Bytes>>> {
    match *ctx.method {
        Method::GET | Method::HEAD => None,
        _ => Some(http::build_501_response(ctx.method.as_str(), ctx.is_head)),
    }
}

/// Last step before a response is handed to the connection
///
/// Runs for every status. The no-cache headers go after everything the
/// handler set, so content headers are never replaced.
pub fn finalize_headers(response: &mut Response<Full<Bytes>>, server_name: &str) {
    let headers = response.headers_mut();
    if !headers.contains_key(SERVER) {
        match HeaderValue::from_str(server_name) {
            Ok(value) => {
                headers.insert(SERVER, value);
            }
            Err(e) => logger::log_warning(&format!("Invalid server name '{server_name}': {e}")),
        }
    }
    http::append_no_cache_headers(headers);
}

fn header_string(parts: &Parts, name: HeaderName) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
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
