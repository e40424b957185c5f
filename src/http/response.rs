//! HTTP response building module
//!
//! Builders for every response the file server sends. None of them set
//! caching headers; those are appended by the handler once the response is
//! complete.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build 200 response for file content
///
/// `content_length` is the file size; for HEAD requests `data` is empty but
/// the header still reports the size the GET body would have.
pub fn build_file_response(
    data: Bytes,
    content_length: u64,
    content_type: &str,
    last_modified: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(last_modified) = last_modified {
        builder = builder.header("Last-Modified", last_modified);
    }

    builder.body(Full::new(data)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 200 response for a generated HTML page (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response (directory requested without trailing slash)
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::MOVED_PERMANENTLY)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response with the given message
pub fn build_404_response(message: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(StatusCode::NOT_FOUND, message, is_head)
}

/// Build 501 response for methods the file server does not implement
pub fn build_501_response(method: &str, is_head: bool) -> Response<Full<Bytes>> {
    build_error_response(
        StatusCode::NOT_IMPLEMENTED,
        &format!("Unsupported method ('{method}')"),
        is_head,
    )
}

/// Build an HTML error response
///
/// The connection is closed after an error. HEAD requests get the headers
/// of the page without its body.
fn build_error_response(
    status: StatusCode,
    message: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content = render_error_page(status, message);
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(status)
        .header("Connection", "close")
        .header("Content-Type", "text/html;charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn render_error_page(status: StatusCode, message: &str) -> String {
    format!(
        r#"<!DOCTYPE HTML>
<html lang="en">
    <head>
        <meta charset="utf-8">
        <title>Error response</title>
    </head>
    <body>
        <h1>Error response</h1>
        <p>Error code: {code}</p>
        <p>Message: {message}.</p>
        <p>Error code explanation: {code} - {explain}.</p>
    </body>
</html>
"#,
        code = status.as_u16(),
        message = escape_html(message),
        explain = explain_status(status),
    )
}

/// Long-form explanation of an error status for the error page
fn explain_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "Nothing matches the given URI",
        StatusCode::NOT_IMPLEMENTED => "Server does not support this operation",
        _ => status.canonical_reason().unwrap_or("Unknown"),
    }
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_404_page() {
        let response = build_404_response("File not found", false);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()["Connection"], "close");
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html;charset=utf-8"
        );
        let body = body_string(response).await;
        assert!(body.contains("<p>Error code: 404</p>"));
        assert!(body.contains("<p>Message: File not found.</p>"));
        assert!(body.contains("Nothing matches the given URI"));
    }

    #[tokio::test]
    async fn test_error_page_head_has_no_body() {
        let response = build_404_response("File not found", true);
        let length: usize = response.headers()["Content-Length"]
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert!(length > 0);
        assert!(body_string(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_501_escapes_method() {
        let response = build_501_response("<X>", false);
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(response.headers()["Connection"], "close");
        assert_eq!(
            response.headers()["Content-Type"],
            "text/html;charset=utf-8"
        );
        let body = body_string(response).await;
        assert!(body.contains("Unsupported method (&#x27;&lt;X&gt;&#x27;)"));
    }

    #[test]
    fn test_redirect() {
        let response = build_redirect_response("/docs/?page=2");
        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(response.headers()["Location"], "/docs/?page=2");
        assert_eq!(response.headers()["Content-Length"], "0");
    }

    #[test]
    fn test_file_response_headers() {
        let response = build_file_response(
            Bytes::from_static(b"<h1>hi</h1>"),
            11,
            "text/html",
            Some("Sun, 06 Nov 1994 08:49:37 GMT"),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Type"], "text/html");
        assert_eq!(response.headers()["Content-Length"], "11");
        assert_eq!(
            response.headers()["Last-Modified"],
            "Sun, 06 Nov 1994 08:49:37 GMT"
        );
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
