//! Fixed page handlers
//!
//! The home and about pages are fixed HTML fragments; the date/time page
//! renders `today.html` with the current clock reading shifted to the
//! site's fixed UTC offset.

use chrono::{FixedOffset, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::error::HandlerError;
use super::router::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::templates::Context;

/// 首頁：標題加上三個導覽連結
pub fn home(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let mut page = String::from("<h1>顧晉瑋網頁</h1>");
    page.push_str("<a href='/today'>顯示日期時間</a><br>");
    page.push_str("<a href='/about'>顧晉瑋簡介網頁</a><br>");
    page.push_str("<a href='/account'>網頁表單傳值</a><br>");
    http::build_html_response(page, ctx.is_head)
}

/// Date/time page: current instant at the configured fixed offset
pub fn today(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    let mut context = Context::new();
    context.insert("datetime", &current_datetime_string(state.tz));
    let html = state.templates.render("today.html", &context)?;
    Ok(http::build_html_response(html, ctx.is_head))
}

/// 個人簡介網頁
pub fn about(ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
    let page =
        "<h1>顧晉瑋簡介網頁</h1><p>這裡放個人簡介內容，例如個人網頁、聯絡資訊等。</p>".to_string();
    http::build_html_response(page, ctx.is_head)
}

/// Format the current instant at `tz`, e.g. `2025-01-31 20:15:02.123456+08:00`
pub fn current_datetime_string(tz: FixedOffset) -> String {
    Utc::now()
        .with_timezone(&tz)
        .format("%Y-%m-%d %H:%M:%S%.6f%:z")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use http_body_util::BodyExt;
    use hyper::Method;

    // is_head is always false here; HEAD behavior is covered in router tests

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn get_ctx<'a>(method: &'a Method, path: &'a str) -> RequestContext<'a> {
        RequestContext {
            method,
            path,
            query: None,
            body: Bytes::new(),
            is_head: false,
            if_none_match: None,
        }
    }

    #[tokio::test]
    async fn test_home_contains_title_and_three_links() {
        let method = Method::GET;
        let html = body_string(home(&get_ctx(&method, "/"))).await;
        assert!(html.contains("<h1>顧晉瑋網頁</h1>"));
        assert!(html.contains("href='/today'"));
        assert!(html.contains("href='/about'"));
        assert!(html.contains("href='/account'"));
        assert_eq!(html.matches("<a ").count(), 3);
    }

    #[tokio::test]
    async fn test_home_is_byte_identical_across_requests() {
        let method = Method::GET;
        let first = body_string(home(&get_ctx(&method, "/"))).await;
        let second = body_string(home(&get_ctx(&method, "/"))).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_about_is_static_biography() {
        let method = Method::GET;
        let html = body_string(about(&get_ctx(&method, "/about"))).await;
        assert!(html.contains("<h1>顧晉瑋簡介網頁</h1>"));
        assert!(html.contains("個人簡介內容"));
    }

    #[test]
    fn test_datetime_string_has_plus_eight_offset() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let s = current_datetime_string(tz);
        let parsed = DateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S%.6f%:z").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 8 * 3600);
    }

    #[tokio::test]
    async fn test_today_renders_datetime_into_template() {
        let state = AppState::for_tests();
        let method = Method::GET;
        let resp = today(&get_ctx(&method, "/today"), &state).unwrap();
        assert_eq!(resp.status(), 200);
        let html = body_string(resp).await;
        assert!(html.contains("現在時刻："));
        assert!(html.contains("+08:00"));
    }
}
