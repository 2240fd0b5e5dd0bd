//! Static asset serving module
//!
//! Serves files under the configured static directory at the `/static/`
//! prefix, plus the favicon. Conditional requests are answered with 304
//! when the client's `ETag` still matches.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

use super::router::RequestContext;
use crate::config::AppState;
use crate::http::{self, cache, mime};
use crate::logger;

/// Route prefix the static directory is mounted under
pub const STATIC_ROUTE_PREFIX: &str = "/static/";

const FAVICON_FILE: &str = "favicon.svg";

/// Serve favicon from the static directory
pub async fn serve_favicon(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let file_path = Path::new(&state.config.site.static_dir).join(FAVICON_FILE);
    match fs::read(&file_path).await {
        Ok(content) => respond_with_cache(ctx, content, "image/svg+xml"),
        Err(_) => http::build_404_response(),
    }
}

/// Serve a file from the static directory
pub async fn serve(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    match load_static(&state.config.site.static_dir, ctx.path).await {
        Some((content, content_type)) => respond_with_cache(ctx, content, content_type),
        None => http::build_404_response(),
    }
}

/// Load a static file, refusing paths that escape the static directory
async fn load_static(static_dir: &str, path: &str) -> Option<(Vec<u8>, &'static str)> {
    let relative = path.strip_prefix(STATIC_ROUTE_PREFIX)?;
    let clean = relative.replace("..", "");
    let file_path = Path::new(static_dir).join(&clean);

    // Security: resolved path must stay inside static_dir
    let static_dir_canonical = match Path::new(static_dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let file_path_canonical = file_path.canonicalize().ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        return None;
    }

    let content = fs::read(&file_path_canonical).await.ok()?;
    let content_type = mime::get_content_type(
        file_path_canonical
            .extension()
            .and_then(|ext| ext.to_str()),
    );
    Some((content, content_type))
}

/// Answer with 304 when the client's ETag matches, 200 otherwise
fn respond_with_cache(
    ctx: &RequestContext<'_>,
    content: Vec<u8>,
    content_type: &str,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&content);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }
    http::build_static_response(Bytes::from(content), content_type, &etag, ctx.is_head)
}
