use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use stocktrace_auth::Role;
use stocktrace_core::ActorId;

use crate::context::ActorContext;

/// Header carrying the resolved actor id (UUID).
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the actor's roles as a comma-separated list.
pub const ACTOR_ROLES_HEADER: &str = "x-actor-roles";

/// Build the request's [`ActorContext`] from identity headers.
///
/// Identity is resolved and verified by the external directory service in
/// front of this API; a request without a valid actor id is rejected before
/// any domain route runs.
pub async fn actor_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let actor_id = extract_actor_id(req.headers())?;
    let roles = extract_roles(req.headers());

    req.extensions_mut()
        .insert(ActorContext::new(actor_id, roles));

    Ok(next.run(req).await)
}

fn extract_actor_id(headers: &HeaderMap) -> Result<ActorId, StatusCode> {
    let header = headers
        .get(ACTOR_ID_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    header
        .trim()
        .parse::<ActorId>()
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

fn extract_roles(headers: &HeaderMap) -> Vec<Role> {
    let Some(header) = headers.get(ACTOR_ROLES_HEADER) else {
        return Vec::new();
    };
    let Ok(header) = header.to_str() else {
        return Vec::new();
    };

    header
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Role::new(s.to_string()))
        .collect()
}
