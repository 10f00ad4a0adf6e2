//! HTTP response building module
//!
//! Builders for the status codes the server produces. Builder failures are
//! logged and answered with a bare response instead of panicking.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use crate::config::HttpConfig;

const ALLOW: &str = "GET, HEAD, OPTIONS";

/// Start a response carrying the headers every reply shares
fn base(status: StatusCode, http: &HttpConfig) -> Builder {
    let builder = Response::builder()
        .status(status)
        .header("Server", &http.server_name);

    if http.enable_cors {
        builder.header("Access-Control-Allow-Origin", "*")
    } else {
        builder
    }
}

fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body.clone())).unwrap_or_else(|e| {
        log_build_error(label, &e);
        Response::new(Full::new(body))
    })
}

fn plain_text(status: StatusCode, text: &'static str, http: &HttpConfig) -> Response<Full<Bytes>> {
    let builder = base(status, http).header("Content-Type", "text/plain; charset=utf-8");
    finish(builder, Bytes::from_static(text.as_bytes()), status.as_str())
}

/// Build the localized page response
///
/// `HEAD` keeps the `Content-Length` of the full page but sends no body.
pub fn build_page_response(
    html: String,
    locale: &str,
    is_head: bool,
    http: &HttpConfig,
) -> Response<Full<Bytes>> {
    let content_length = html.len();
    let body = if is_head { Bytes::new() } else { Bytes::from(html) };

    let builder = base(StatusCode::OK, http)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Content-Language", locale)
        .header("Vary", "Accept-Language")
        .header("Cache-Control", "no-store");
    finish(builder, body, "200")
}

/// Build 404 Not Found response
pub fn build_404_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    plain_text(StatusCode::NOT_FOUND, "404 Not Found", http)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let builder = base(StatusCode::METHOD_NOT_ALLOWED, http)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Allow", ALLOW);
    finish(builder, Bytes::from_static(b"405 Method Not Allowed"), "405")
}

/// Build 413 Payload Too Large response
pub fn build_413_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    plain_text(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large", http)
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(http: &HttpConfig) -> Response<Full<Bytes>> {
    let mut builder = base(StatusCode::NO_CONTENT, http).header("Allow", ALLOW);

    if http.enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", ALLOW)
            .header("Access-Control-Allow-Headers", "Accept-Language")
            .header("Access-Control-Max-Age", "86400");
    }

    finish(builder, Bytes::new(), "OPTIONS")
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
