use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use stocktrace_auth::Permission;
use stocktrace_core::{CategoryId, ItemId};
use stocktrace_inventory::{ItemDraft, ItemFilter, ItemPatch};

use crate::app::routes::common::OpAuth;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_item).get(list_items))
        .route(
            "/:id",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route(
            "/:id/transactions",
            post(record_transaction).get(list_transactions),
        )
}

fn parse_item_id(id: &str) -> Result<ItemId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid item id")
    })
}

fn parse_category_id(id: &str) -> Result<CategoryId, axum::response::Response> {
    id.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid category id")
    })
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: body,
        required: vec![Permission::new("inventory.items.create")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let category = match parse_category_id(&op.inner.category) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let draft = ItemDraft {
        name: op.inner.name,
        description: op.inner.description,
        category,
        quantity: op.inner.quantity,
        price: op.inner.price,
        unit: op.inner.unit,
        location: op.inner.location,
        sku: op.inner.sku,
        threshold: op.inner.threshold,
        image: op.inner.image,
    };

    match services.items.create_item(draft, actor.actor_id()) {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<dto::ListItemsParams>,
) -> axum::response::Response {
    let category = match params.category.as_deref().map(parse_category_id) {
        Some(Ok(v)) => Some(v),
        Some(Err(resp)) => return resp,
        None => None,
    };

    let filter = ItemFilter {
        category,
        search: params.search,
        low_stock: params.low_stock.unwrap_or(false),
    };

    let items: Vec<_> = services
        .items
        .list_items(&filter)
        .iter()
        .map(dto::item_to_json)
        .collect();

    (StatusCode::OK, Json(serde_json::Value::Array(items))).into_response()
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.get_item(item_id) {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: body,
        required: vec![Permission::new("inventory.items.update")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let category = match op.inner.category.as_deref().map(parse_category_id) {
        Some(Ok(v)) => Some(v),
        Some(Err(resp)) => return resp,
        None => None,
    };

    let patch = ItemPatch {
        name: op.inner.name,
        description: op.inner.description,
        category,
        quantity: op.inner.quantity,
        price: op.inner.price,
        unit: op.inner.unit,
        location: op.inner.location,
        sku: op.inner.sku,
        threshold: op.inner.threshold,
        image: op.inner.image,
    };

    match services.items.update_item(item_id, patch, actor.actor_id()) {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: (),
        required: vec![Permission::new("inventory.items.delete")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.delete_item(item_id) {
        Ok(_purged) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "item removed" })),
        )
            .into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn record_transaction(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(actor): Extension<crate::context::ActorContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RecordTransactionRequest>,
) -> axum::response::Response {
    let op = OpAuth {
        inner: body,
        required: vec![Permission::new("inventory.items.adjust")],
    };

    if let Err(e) = crate::authz::authorize_operation(&actor, &op) {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string());
    }

    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let kind = match errors::parse_entry_kind(&op.inner.kind) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.record_transaction(
        item_id,
        kind,
        op.inner.quantity,
        op.inner.notes,
        op.inner.reference,
        actor.actor_id(),
    ) {
        Ok(entry) => (StatusCode::CREATED, Json(dto::entry_to_json(&entry))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_transactions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let item_id = match parse_item_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.items.item_history(item_id) {
        Ok(entries) => {
            let entries: Vec<_> = entries.iter().map(dto::entry_to_json).collect();
            (StatusCode::OK, Json(serde_json::Value::Array(entries))).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}
