//! Handler error types
//!
//! The two failure classes a handler itself can produce. Everything else
//! (bad method, unknown path, oversized body) is rejected by the router
//! before a handler runs.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use thiserror::Error;

use crate::http;
use crate::logger;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// A required form or query field was absent from the request
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    /// Template lookup or rendering failed; not recoverable per request
    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),
}

impl HandlerError {
    /// Convert the error into the HTTP response surfaced to the client
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::MissingField(_) => http::build_400_response(&self.to_string()),
            Self::Template(ref e) => {
                logger::log_error(&format!("Template error: {e}"));
                http::build_500_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::{Context, TemplateEngine};

    #[test]
    fn test_missing_field_maps_to_400() {
        let resp = HandlerError::MissingField("pwd").into_response();
        assert_eq!(resp.status(), 400);
    }

    #[test]
    fn test_template_error_maps_to_500() {
        let tera_err = TemplateEngine::from_raw(&[])
            .render("missing.html", &Context::new())
            .unwrap_err();
        let err = HandlerError::from(tera_err);
        assert_eq!(err.into_response().status(), 500);
    }

    #[test]
    fn test_missing_field_message_names_the_field() {
        let err = HandlerError::MissingField("user");
        assert_eq!(err.to_string(), "missing required field 'user'");
    }
}
