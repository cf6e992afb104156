//! Path prefix stripping for route groups mounted under a collection prefix.

use crate::pipeline::{Flow, RequestContext};

/// Remove the literal `prefix` from the front of `path`, if present.
pub fn strip_path_prefix<'a>(path: &'a str, prefix: &str) -> &'a str {
    path.strip_prefix(prefix).unwrap_or(path)
}

/// Rewrite the in-flight path. Never aborts.
pub fn apply_strip_prefix(prefix: &str, ctx: &mut RequestContext) -> Flow {
    let stripped = strip_path_prefix(ctx.path(), prefix);
    if stripped.len() != ctx.path().len() {
        tracing::trace!(from = %ctx.path(), to = %stripped, "Path rewritten");
        let stripped = stripped.to_string();
        ctx.set_path(stripped);
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};

    #[test]
    fn test_strip_path_prefix() {
        assert_eq!(strip_path_prefix("/api/notes/memos", "/api/notes"), "/memos");
        assert_eq!(
            strip_path_prefix("/api/notes/articles/42/chapters/7", "/api/notes"),
            "/articles/42/chapters/7"
        );
        assert_eq!(strip_path_prefix("/api/user/profile", "/api/notes"), "/api/user/profile");
        assert_eq!(strip_path_prefix("/memos", "/api/notes"), "/memos");
    }

    #[test]
    fn test_stage_rewrites_context() {
        let mut ctx = RequestContext::from_request(
            Request::builder()
                .uri("/api/notes/memos?page=2")
                .body(Body::empty())
                .unwrap(),
        );
        assert!(apply_strip_prefix("/api/notes", &mut ctx).is_continue());
        assert_eq!(ctx.path(), "/memos");
        assert_eq!(ctx.query(), Some("page=2"));

        // already stripped: second pass is a no-op
        assert!(apply_strip_prefix("/api/notes", &mut ctx).is_continue());
        assert_eq!(ctx.path(), "/memos");
    }
}
