//! Cross-origin resource sharing.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
};

use crate::pipeline::{Flow, RequestContext};

pub const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Origin, Content-Type, Accept, Authorization, X-Requested-With";

/// Mark every response as cross-origin friendly; short-circuit preflights.
pub fn apply_cors(ctx: &mut RequestContext) -> Flow {
    let headers = ctx.response_headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );

    if ctx.method() == Method::OPTIONS {
        return Flow::Respond(StatusCode::NO_CONTENT.into_response());
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{HeaderMap, Request}};

    fn ctx(method: Method) -> RequestContext {
        RequestContext::from_request(
            Request::builder()
                .method(method)
                .uri("/api/notes/memos")
                .body(Body::empty())
                .unwrap(),
        )
    }

    #[test]
    fn test_preflight_short_circuits() {
        let mut ctx = ctx(Method::OPTIONS);
        let Flow::Respond(response) = apply_cors(&mut ctx) else {
            panic!("preflight must not continue");
        };
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let mut headers = HeaderMap::new();
        ctx.decorate_response(&mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], ALLOW_METHODS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_HEADERS], ALLOW_HEADERS);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[test]
    fn test_other_methods_continue_unchanged() {
        for method in [Method::GET, Method::POST, Method::DELETE] {
            let mut ctx = ctx(method.clone());
            assert!(apply_cors(&mut ctx).is_continue());
            assert_eq!(ctx.method(), &method);
            assert_eq!(ctx.path(), "/api/notes/memos");
        }
    }
}
