use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stocktrace_core::DomainError;
use stocktrace_ledger::EntryKind;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InsufficientStock { .. } => json_error(
            StatusCode::BAD_REQUEST,
            "insufficient_stock",
            err.to_string(),
        ),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_entry_kind(s: &str) -> Result<EntryKind, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "in" => Ok(EntryKind::In),
        "out" => Ok(EntryKind::Out),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_transaction_type",
            "type must be one of: in, out",
        )),
    }
}
