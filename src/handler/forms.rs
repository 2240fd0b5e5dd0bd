//! Form handlers
//!
//! The account route echoes submitted credentials back as plain text; the
//! welcome route greets by the `nick` value taken from either the query
//! string or the form body. Both read `application/x-www-form-urlencoded`
//! payloads.

use std::collections::HashMap;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use querystrong::QueryStrong;

use super::error::HandlerError;
use super::router::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::templates::Context;

/// Decode an urlencoded payload (form body or query string) into a map
///
/// Only plain `name=value` pairs are kept; nested or repeated keys are
/// ignored. An unparseable payload yields an empty map, which downstream
/// field lookups report as missing fields.
pub fn parse_urlencoded(input: &str) -> HashMap<String, String> {
    let Ok(parsed) = QueryStrong::parse(input) else {
        return HashMap::new();
    };
    let mut fields = HashMap::with_capacity(parsed.len());
    if let Some(map) = parsed.as_map() {
        for (name, value) in map {
            if let querystrong::Value::String(v) = value {
                fields.insert(name.to_string(), v.clone());
            }
        }
    }
    fields
}

fn required_field<'a>(
    fields: &'a HashMap<String, String>,
    name: &'static str,
) -> Result<&'a str, HandlerError> {
    fields
        .get(name)
        .map(String::as_str)
        .ok_or(HandlerError::MissingField(name))
}

/// 表單傳值：GET 呈現表單，POST 回應輸入的帳號密碼
pub fn account(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    if *ctx.method == Method::POST {
        let fields = parse_urlencoded(std::str::from_utf8(&ctx.body).unwrap_or_default());
        let user = required_field(&fields, "user")?;
        let pwd = required_field(&fields, "pwd")?;
        // Escape before echoing; the values came straight off the wire
        let result = format!(
            "您輸入的帳號是：{}; 密碼為：{}",
            html_escape::encode_safe(user),
            html_escape::encode_safe(pwd)
        );
        Ok(http::build_text_response(result, ctx.is_head))
    } else {
        let html = state.templates.render("account.html", &Context::new())?;
        Ok(http::build_html_response(html, ctx.is_head))
    }
}

/// Greeting page: `nick` comes from the query string on GET, the form body on POST
pub fn welcome(
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, HandlerError> {
    let fields = if *ctx.method == Method::POST {
        parse_urlencoded(std::str::from_utf8(&ctx.body).unwrap_or_default())
    } else {
        parse_urlencoded(ctx.query.unwrap_or_default())
    };
    let nick = required_field(&fields, "nick")?;

    let mut context = Context::new();
    context.insert("name", nick);
    let html = state.templates.render("welcome.html", &context)?;
    Ok(http::build_html_response(html, ctx.is_head))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_string(resp: Response<Full<Bytes>>) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_ctx<'a>(method: &'a Method, path: &'a str, body: &str) -> RequestContext<'a> {
        RequestContext {
            method,
            path,
            query: None,
            body: Bytes::from(body.to_string()),
            is_head: false,
            if_none_match: None,
        }
    }

    #[test]
    fn test_parse_urlencoded_pairs() {
        let fields = parse_urlencoded("user=alice&pwd=secret");
        assert_eq!(fields.get("user").map(String::as_str), Some("alice"));
        assert_eq!(fields.get("pwd").map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_parse_urlencoded_decodes_escapes() {
        let fields = parse_urlencoded("nick=Bob%20Wang");
        assert_eq!(fields.get("nick").map(String::as_str), Some("Bob Wang"));
    }

    #[test]
    fn test_parse_urlencoded_empty_input() {
        assert!(parse_urlencoded("").is_empty());
    }

    #[tokio::test]
    async fn test_account_post_echoes_both_values() {
        let state = AppState::for_tests();
        let method = Method::POST;
        let ctx = post_ctx(&method, "/account", "user=alice&pwd=secret");
        let resp = account(&ctx, &state).unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            body_string(resp).await,
            "您輸入的帳號是：alice; 密碼為：secret"
        );
    }

    #[tokio::test]
    async fn test_account_post_escapes_markup_in_echo() {
        let state = AppState::for_tests();
        let method = Method::POST;
        let ctx = post_ctx(&method, "/account", "user=%3Cb%3Ex%3C%2Fb%3E&pwd=secret");
        let text = body_string(account(&ctx, &state).unwrap()).await;
        assert!(!text.contains("<b>"));
        assert!(text.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_account_post_missing_pwd_is_missing_field() {
        let state = AppState::for_tests();
        let method = Method::POST;
        let ctx = post_ctx(&method, "/account", "user=alice");
        let err = account(&ctx, &state).unwrap_err();
        assert!(matches!(err, HandlerError::MissingField("pwd")));
        assert_eq!(err.into_response().status(), 400);
    }

    #[tokio::test]
    async fn test_account_get_renders_form_without_echo() {
        let state = AppState::for_tests();
        let method = Method::GET;
        let ctx = post_ctx(&method, "/account", "");
        let html = body_string(account(&ctx, &state).unwrap()).await;
        assert!(html.contains("<form"));
        assert!(!html.contains("您輸入的帳號是"));
    }

    #[tokio::test]
    async fn test_welcome_query_and_form_render_identically() {
        let state = AppState::for_tests();

        let get = Method::GET;
        let query_ctx = RequestContext {
            method: &get,
            path: "/welcome",
            query: Some("nick=Bob"),
            body: Bytes::new(),
            is_head: false,
            if_none_match: None,
        };
        let from_query = body_string(welcome(&query_ctx, &state).unwrap()).await;

        let post = Method::POST;
        let form_ctx = post_ctx(&post, "/welcome", "nick=Bob");
        let from_form = body_string(welcome(&form_ctx, &state).unwrap()).await;

        assert_eq!(from_query, from_form);
        assert!(from_query.contains("Bob"));
    }

    #[test]
    fn test_welcome_without_nick_is_missing_field() {
        let state = AppState::for_tests();
        let method = Method::GET;
        let ctx = RequestContext {
            method: &method,
            path: "/welcome",
            query: None,
            body: Bytes::new(),
            is_head: false,
            if_none_match: None,
        };
        let err = welcome(&ctx, &state).unwrap_err();
        assert!(matches!(err, HandlerError::MissingField("nick")));
    }
}
