//! The gateway's route registrations.

use axum::http::Method;

use crate::pipeline::Stage;
use crate::proxy::Backend;
use crate::routing::{RouteError, RouteTable, Target};

/// Mount point of the notes service; stripped before forwarding.
pub const NOTES_PREFIX: &str = "/api/notes";

/// `/api/auth/<endpoint>` → `/<endpoint>` on the auth service.
const AUTH_ENDPOINTS: [&str; 6] = [
    "signup",
    "signin",
    "logout",
    "token-verify",
    "token-info",
    "token-refresh",
];

/// Build the route table for the given backends.
pub fn gateway_routes(auth: &Backend, notes: &Backend) -> Result<RouteTable, RouteError> {
    let mut builder = RouteTable::builder()
        .global_stage(Stage::Cors)
        .routes(&[Method::GET, Method::HEAD], "/health", vec![], Target::Health);

    for endpoint in AUTH_ENDPOINTS {
        builder = builder.route(
            Method::POST,
            &format!("/api/auth/{endpoint}"),
            vec![Stage::Authenticate],
            Target::Backend(auth.fixed(format!("/{endpoint}"))),
        );
    }

    builder = builder.routes(
        &[Method::GET, Method::PATCH],
        "/api/user/profile",
        vec![Stage::Authenticate],
        Target::Backend(auth.fixed("/user/profile")),
    );

    let notes_stages = vec![Stage::Authenticate, Stage::StripPrefix(NOTES_PREFIX.to_string())];
    let notes_target = Target::Backend(notes.passthrough());
    let notes_routes = [
        (vec![Method::GET, Method::POST], "/memos"),
        (vec![Method::GET, Method::PUT, Method::DELETE], "/memos/{id}"),
        (vec![Method::GET, Method::POST], "/articles"),
        (vec![Method::GET, Method::PUT, Method::DELETE], "/articles/{id}"),
        (vec![Method::POST], "/articles/{id}/chapters"),
        (
            vec![Method::GET, Method::PUT, Method::DELETE],
            "/articles/{id}/chapters/{chapter_id}",
        ),
    ];
    for (methods, suffix) in notes_routes {
        builder = builder.routes(
            &methods,
            &format!("{NOTES_PREFIX}{suffix}"),
            notes_stages.clone(),
            notes_target.clone(),
        );
    }

    builder.build()
}
