use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stocktrace_auth::Permission;
use stocktrace_core::CategoryId;

use crate::app::routes::common::OpAuth;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_category).get(list_categories))
        .route(
            "/:id",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

fn parse_category_id(id: &str) -> Result<CategoryId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
    })
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: body,
        required: vec![Permission::new("inventory.categories.create")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    match services
        .categories
        .create(op.inner.name, op.inner.description, actor.actor_id())
    {
        Ok(category) => {
            (StatusCode::CREATED, Json(dto::category_to_json(&category))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let categories: Vec<_> = services
        .categories
        .list()
        .iter()
        .map(dto::category_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::Value::Array(categories))).into_response()
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let category_id = match parse_category_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.categories.get(category_id) {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCategoryRequest>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: body,
        required: vec![Permission::new("inventory.categories.update")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let category_id = match parse_category_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .categories
        .update(category_id, op.inner.name, op.inner.description)
    {
        Ok(category) => (StatusCode::OK, Json(dto::category_to_json(&category))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: (),
        required: vec![Permission::new("inventory.categories.delete")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let category_id = match parse_category_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.categories.delete(category_id) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "category removed" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
