use axum::{Json, http::StatusCode, response::IntoResponse};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    axum::extract::Extension(actor): axum::extract::Extension<crate::context::ActorContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "actor_id": actor.actor_id().to_string(),
        "roles": actor.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
}
