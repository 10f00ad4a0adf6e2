//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body size
//! checks, negotiation for the index route, and access logging.

use crate::config::AppState;
use crate::handler::index;
use crate::http;
use crate::i18n::{NegotiationParams, RequestContext};
use crate::logger::{self, AccessLogEntry};
use chrono::Utc;
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::http::request::Parts;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const INDEX_PATH: &str = "/";

/// Main entry point for HTTP request handling
pub async fn handle_request<B: Body>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // The body is never read; only the head matters
    let (parts, _body) = req.into_parts();

    let (response, ctx) = respond(&parts, &state);

    if state.access_log {
        let entry = access_entry(&parts, &response, ctx.as_ref(), peer_addr, started);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Produce the response for a request head.
///
/// Also returns the negotiated context when the index page was served.
pub fn respond(
    parts: &Parts,
    state: &AppState,
) -> (Response<Full<Bytes>>, Option<RequestContext>) {
    let http_config = &state.config.http;

    // 1. Check HTTP method
    if let Some(resp) = check_http_method(&parts.method, state) {
        return (resp, None);
    }

    // 2. Check body size
    if let Some(resp) = check_body_size(parts, state) {
        return (resp, None);
    }

    // 3. Log headers if enabled
    logger::log_headers_count(parts.headers.len(), state.config.logging.show_headers);

    // 4. Route
    if parts.uri.path() != INDEX_PATH {
        logger::log_debug(&format!("No route for {}", parts.uri.path()));
        return (http::build_404_response(http_config), None);
    }

    let ctx = negotiate(parts, state);
    logger::log_debug(&format!(
        "Negotiated user={:?} locale={} timezone={}",
        ctx.user.as_ref().map(|u| u.id),
        ctx.locale,
        ctx.timezone
    ));

    let html = index::render_index(&ctx, state.catalog, Utc::now());
    let is_head = parts.method == Method::HEAD;
    let resp = http::build_page_response(html, &ctx.locale, is_head, http_config);
    (resp, Some(ctx))
}

/// Resolve user, locale and timezone from the request head
pub fn negotiate(parts: &Parts, state: &AppState) -> RequestContext {
    let params = NegotiationParams::from_query(parts.uri.query());
    let accept_language = parts
        .headers
        .get("accept-language")
        .and_then(|v| v.to_str().ok());

    RequestContext::resolve(&params, accept_language, &state.users, &state.config.i18n)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, state: &AppState) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(&state.config.http)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(&state.config.http))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(parts: &Parts, state: &AppState) -> Option<Response<Full<Bytes>>> {
    let max_body_size = state.config.http.max_body_size;
    let content_length = parts.headers.get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response(&state.config.http))
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn access_entry(
    parts: &Parts,
    response: &Response<Full<Bytes>>,
    ctx: Option<&RequestContext>,
    peer_addr: SocketAddr,
    started: Instant,
) -> AccessLogEntry {
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        parts.method.to_string(),
        parts.uri.path().to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = match parts.version {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = usize::try_from(response.body().size_hint().exact().unwrap_or(0))
        .unwrap_or(usize::MAX);
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");
    entry.locale = ctx.map(|c| c.locale.clone());
    entry.timezone = ctx.map(|c| c.timezone.name().to_string());
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, I18nConfig};
    use crate::i18n::UserTable;
    use hyper::StatusCode;

    fn test_state() -> AppState {
        let _lock = crate::config::lock_env();
        let mut config = Config::load_from("does-not-exist/i18n-login").expect("defaults load");
        config.logging.access_log = false;
        config.i18n = I18nConfig::default();
        AppState::new(&config, UserTable::builtin())
    }

    fn parts(method: Method, uri: &str, headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).expect("valid request").into_parts().0
    }

    fn body_text(resp: Response<Full<Bytes>>) -> String {
        use http_body_util::BodyExt;
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        let bytes = rt.block_on(async {
            resp.into_body()
                .collect()
                .await
                .expect("infallible")
                .to_bytes()
        });
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    #[test]
    fn test_index_logged_in() {
        let state = test_state();
        let (resp, ctx) = respond(&parts(Method::GET, "/?login_as=1", &[]), &state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-language"], "fr");

        let ctx = ctx.expect("index negotiates");
        assert_eq!(ctx.timezone.name(), "Europe/Paris");

        let html = body_text(resp);
        assert!(html.contains("Vous êtes connecté en tant que <b>Balou</b>."));
    }

    #[test]
    fn test_index_accept_language() {
        let state = test_state();
        let req = parts(
            Method::GET,
            "/",
            &[("Accept-Language", "fr-CA,fr;q=0.9,en;q=0.5")],
        );
        let (resp, ctx) = respond(&req, &state);
        assert_eq!(resp.headers()["content-language"], "fr");
        assert_eq!(ctx.map(|c| c.locale), Some("fr".to_string()));
    }

    #[test]
    fn test_locale_param_beats_user_and_header() {
        let state = test_state();
        let req = parts(
            Method::GET,
            "/?login_as=2&locale=fr",
            &[("Accept-Language", "en")],
        );
        let ctx = negotiate(&req, &state);
        assert_eq!(ctx.locale, "fr");
        assert_eq!(ctx.timezone.name(), "US/Central");
    }

    #[test]
    fn test_negotiation_is_idempotent() {
        let state = test_state();
        let req = parts(
            Method::GET,
            "/?login_as=3&timezone=Invalid%2FZone",
            &[("Accept-Language", "kg, fr;q=0.1")],
        );
        let first = negotiate(&req, &state);
        for _ in 0..3 {
            assert_eq!(negotiate(&req, &state), first);
        }
        assert_eq!(first.locale, "fr");
        assert_eq!(first.timezone.name(), "UTC");
    }

    #[test]
    fn test_head_has_no_body() {
        let state = test_state();
        let (resp, ctx) = respond(&parts(Method::HEAD, "/", &[]), &state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(ctx.is_some());
        assert!(body_text(resp).is_empty());
    }

    #[test]
    fn test_unknown_path_is_404() {
        let state = test_state();
        let (resp, ctx) = respond(&parts(Method::GET, "/index.html", &[]), &state);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(ctx.is_none());
    }

    #[test]
    fn test_method_checks() {
        let state = test_state();
        let (resp, _) = respond(&parts(Method::POST, "/", &[]), &state);
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let (resp, _) = respond(&parts(Method::OPTIONS, "/", &[]), &state);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_body_size_limit() {
        let state = test_state();
        let too_big = (state.config.http.max_body_size + 1).to_string();
        let (resp, _) = respond(
            &parts(Method::GET, "/", &[("Content-Length", too_big.as_str())]),
            &state,
        );
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let (resp, _) = respond(&parts(Method::GET, "/", &[("Content-Length", "0")]), &state);
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_access_entry_carries_negotiation() {
        let state = test_state();
        let req = parts(
            Method::GET,
            "/?login_as=4",
            &[("User-Agent", "curl/8.0"), ("Accept-Language", "fr")],
        );
        let (resp, ctx) = respond(&req, &state);
        let peer: SocketAddr = "10.0.0.7:40000".parse().expect("valid addr");
        let entry = access_entry(&req, &resp, ctx.as_ref(), peer, Instant::now());

        assert_eq!(entry.remote_addr, "10.0.0.7");
        assert_eq!(entry.query.as_deref(), Some("login_as=4"));
        assert_eq!(entry.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(entry.locale.as_deref(), Some("fr"));
        assert_eq!(entry.timezone.as_deref(), Some("Europe/London"));
        assert_eq!(entry.status, 200);
        assert!(entry.body_bytes > 0);
    }
}
