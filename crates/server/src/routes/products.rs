use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use service::domain::{CreateProductInput, UpdateProductInput};
use service::errors::ServiceError;
use service::events::ProductEvent;
use service::pagination::{PageParams, DEFAULT_LIMIT};
use service::product_service;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<models::product::Model>,
    /// Size of the returned page, not the table-wide count. Kept for
    /// compatibility with the existing response contract.
    pub total: usize,
    pub offset: u64,
    pub limit: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub product: models::product::Model,
}

#[derive(Debug, Serialize)]
pub struct UpdatedResponse {
    pub message: &'static str,
    pub product: models::product::Model,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub id: i32,
}

fn bad_payload(rejection: JsonRejection) -> JsonApiError {
    JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(rejection.body_text()))
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of products"),
        (status = 400, description = "Bad query"),
        (status = 500, description = "List Failed")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<ProductPage>, JsonApiError> {
    let page = PageParams {
        offset: q.offset.unwrap_or(0),
        limit: q.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let (offset, limit) = page.normalize();
    match product_service::list_products(&state.db, page).await {
        Ok(products) => {
            info!(count = products.len(), offset, limit, "list products");
            Ok(Json(ProductPage { total: products.len(), products, offset, limit }))
        }
        Err(e) => {
            error!(err = %e, "list products failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "List Failed", None))
        }
    }
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::CreateProductInputDoc,
    responses(
        (status = 201, description = "Created"),
        (status = 400, description = "Validation Error"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<CreateProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), JsonApiError> {
    let Json(input) = payload.map_err(bad_payload)?;
    let new = match input.into_new_product() {
        Ok(new) => new,
        Err(ServiceError::Validation(msg)) => {
            return Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)))
        }
        Err(e) => {
            error!(err = %e, "create product input failed");
            return Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", None));
        }
    };

    match product_service::create_product(&state.db, new).await {
        Ok(m) => {
            info!(id = m.id, title = %m.title, "created product");
            state.events.publish(ProductEvent::Created { id: m.id });
            Ok((
                StatusCode::CREATED,
                Json(CreatedResponse { message: "Product created successfully", product: m }),
            ))
        }
        Err(ServiceError::Validation(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)))
        }
        Err(e) => {
            error!(err = %e, "create product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Create Failed", None))
        }
    }
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "OK"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<models::product::Model>, JsonApiError> {
    match product_service::get_product(&state.db, id).await {
        Ok(Some(m)) => Ok(Json(m)),
        Ok(None) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some("product not found".into()),
        )),
        Err(e) => {
            error!(err = %e, id, "get product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Get Failed", None))
        }
    }
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    request_body = crate::openapi::UpdateProductInputDoc,
    responses(
        (status = 200, description = "Updated"),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Update Failed")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    payload: Result<Json<UpdateProductInput>, JsonRejection>,
) -> Result<Json<UpdatedResponse>, JsonApiError> {
    let Json(input) = payload.map_err(bad_payload)?;
    match product_service::update_product(&state.db, id, input).await {
        Ok(m) => {
            info!(id = m.id, "updated product");
            state.events.publish(ProductEvent::Updated { id: m.id });
            Ok(Json(UpdatedResponse { message: "Product updated successfully", product: m }))
        }
        Err(ServiceError::Validation(msg)) => {
            Err(JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)))
        }
        Err(ServiceError::NotFound(msg)) => {
            Err(JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)))
        }
        Err(e) => {
            error!(err = %e, id, "update product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Update Failed", None))
        }
    }
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = i32, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Delete Failed")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    match product_service::delete_product(&state.db, id).await {
        Ok(true) => {
            info!(id, "deleted product");
            state.events.publish(ProductEvent::Deleted { id });
            Ok(Json(DeletedResponse { message: "Product deleted successfully", id }))
        }
        Ok(false) => Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some("product not found".into()),
        )),
        Err(e) => {
            error!(err = %e, id, "delete product failed");
            Err(JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Delete Failed", None))
        }
    }
}
