//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, body collection, route matching, and dispatching.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Method, Request, Response, Version};

use super::error::HandlerError;
use super::{forms, pages, static_files};
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Methods the site accepts anywhere
const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";
/// Methods accepted by the read-only page routes
const PAGE_METHODS: &str = "GET, HEAD, OPTIONS";

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Query string without the leading `?`
    pub query: Option<&'a str>,
    /// Collected request body (empty for bodyless methods)
    pub body: Bytes,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format_http_version(req.version()).to_string();
    entry.referer = header_str(req.headers(), "referer");
    entry.user_agent = header_str(req.headers(), "user-agent");

    let mut response = process_request(req, &state).await;

    // Identify the server in every response
    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert("Server", server);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response_body_bytes(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate the request, collect the body, and dispatch
async fn process_request(req: Request<Incoming>, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(req.method()) {
        return resp;
    }

    // 2. Check declared body size
    if let Some(resp) = check_body_size(req.headers(), state.config.http.max_body_size) {
        return resp;
    }

    let method = req.method().clone();
    let is_head = method == Method::HEAD;
    let if_none_match = header_str(req.headers(), "if-none-match");

    let (parts, body) = req.into_parts();

    // 3. Collect the form body on POST
    let body = if method == Method::POST {
        match collect_body(body, state.config.http.max_body_size).await {
            Ok(bytes) => bytes,
            Err(resp) => return resp,
        }
    } else {
        Bytes::new()
    };

    // 4. Dispatch on path
    let ctx = RequestContext {
        method: &method,
        path: parts.uri.path(),
        query: parts.uri.query(),
        body,
        is_head,
        if_none_match,
    };

    dispatch(&ctx, state).await
}

/// Route request based on path
pub async fn dispatch(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match ctx.path {
        "/" => reject_post(ctx).unwrap_or_else(|| pages::home(ctx)),
        "/today" => reject_post(ctx).unwrap_or_else(|| {
            pages::today(ctx, state).unwrap_or_else(HandlerError::into_response)
        }),
        "/about" => reject_post(ctx).unwrap_or_else(|| pages::about(ctx)),
        "/account" => forms::account(ctx, state).unwrap_or_else(HandlerError::into_response),
        "/welcome" => forms::welcome(ctx, state).unwrap_or_else(HandlerError::into_response),
        "/favicon.ico" | "/favicon.svg" => match reject_post(ctx) {
            Some(resp) => resp,
            None => static_files::serve_favicon(ctx, state).await,
        },
        path if path.starts_with(static_files::STATIC_ROUTE_PREFIX) => match reject_post(ctx) {
            Some(resp) => resp,
            None => static_files::serve(ctx, state).await,
        },
        _ => http::build_404_response(),
    }
}

/// Check HTTP method and return appropriate response for unsupported methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD | Method::POST => None,
        Method::OPTIONS => Some(http::build_options_response(ALLOWED_METHODS)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response(ALLOWED_METHODS))
        }
    }
}

/// Reject POST on routes that only render content
fn reject_post(ctx: &RequestContext<'_>) -> Option<Response<Full<Bytes>>> {
    if *ctx.method == Method::POST {
        logger::log_warning(&format!("POST not allowed on {}", ctx.path));
        Some(http::build_405_response(PAGE_METHODS))
    } else {
        None
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get("content-length")?;
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
                Some(http::build_413_response())
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

/// Collect the request body, enforcing the configured size limit
async fn collect_body(
    body: Incoming,
    max_body_size: u64,
) -> Result<Bytes, Response<Full<Bytes>>> {
    match body.collect().await {
        Ok(collected) => {
            let bytes = collected.to_bytes();
            if u64::try_from(bytes.len()).unwrap_or(u64::MAX) > max_body_size {
                logger::log_error(&format!(
                    "Request body too large: {} bytes (max: {max_body_size})",
                    bytes.len()
                ));
                Err(http::build_413_response())
            } else {
                Ok(bytes)
            }
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response("unreadable request body"))
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn format_http_version(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

/// Exact size of the response body, for the access log
fn response_body_bytes(response: &Response<Full<Bytes>>) -> usize {
    use hyper::body::Body as _;
    usize::try_from(response.body().size_hint().exact().unwrap_or(0)).unwrap_or(usize::MAX)
}
