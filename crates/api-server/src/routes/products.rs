use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::Router;
use domain::{Product, ProductListQuery, ProductSubmission, ProductUpdate};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentAccount;
use crate::error::ApiError;
use crate::response::{Envelope, JsonBody, Paging, PathParam, QueryParams};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/search", get(search_products))
        .route("/category/:category", get(products_by_category))
        .route("/user/my-products", get(my_products))
        .route("/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/:id/status", patch(update_status))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StatusChange {
    #[serde(default)]
    status: Option<String>,
}

async fn create_product(
    State(state): State<AppState>,
    CurrentAccount(seller): CurrentAccount,
    JsonBody(submission): JsonBody<ProductSubmission>,
) -> Result<(StatusCode, Envelope<Product>), ApiError> {
    let product = state
        .marketplace
        .catalog_service
        .create_listing(&seller, submission)
        .await
        .map_err(ApiError::write)?;

    info!(product_id = %product.id, "📦 product listed");
    Ok((
        StatusCode::CREATED,
        Envelope::data(product).message("Product created successfully"),
    ))
}

async fn list_products(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ProductListQuery>,
) -> Result<Envelope<Vec<Product>>, ApiError> {
    let page = state.marketplace.catalog_service.list_products(query).await?;
    let paging = Paging {
        total: page.total,
        page: page.page,
        pages: page.pages,
    };
    Ok(Envelope::page(page.items, paging))
}

async fn search_products(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<SearchParams>,
) -> Result<Envelope<Vec<Product>>, ApiError> {
    let products = state
        .marketplace
        .catalog_service
        .search(params.q.as_deref())
        .await?;
    Ok(Envelope::list(products))
}

async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<String>,
) -> Result<Envelope<Product>, ApiError> {
    let product = state.marketplace.catalog_service.get_product(&id).await?;
    Ok(Envelope::data(product))
}

async fn products_by_category(
    State(state): State<AppState>,
    PathParam(category): PathParam<String>,
) -> Result<Envelope<Vec<Product>>, ApiError> {
    let products = state
        .marketplace
        .catalog_service
        .list_by_category(&category)
        .await?;
    Ok(Envelope::list(products))
}

async fn my_products(
    State(state): State<AppState>,
    CurrentAccount(seller): CurrentAccount,
) -> Result<Envelope<Vec<Product>>, ApiError> {
    let products = state.marketplace.catalog_service.list_by_seller(&seller).await?;
    Ok(Envelope::list(products))
}

async fn update_product(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathParam(id): PathParam<String>,
    JsonBody(update): JsonBody<ProductUpdate>,
) -> Result<Envelope<Product>, ApiError> {
    let product = state
        .marketplace
        .catalog_service
        .update_product(&id, &caller, update)
        .await
        .map_err(ApiError::write)?;
    Ok(Envelope::data(product).message("Product updated successfully"))
}

async fn update_status(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathParam(id): PathParam<String>,
    JsonBody(change): JsonBody<StatusChange>,
) -> Result<Envelope<Product>, ApiError> {
    let product = state
        .marketplace
        .catalog_service
        .update_status(&id, &caller, change.status.as_deref())
        .await
        .map_err(ApiError::write)?;

    let message = format!("Product status updated to {}", product.status);
    Ok(Envelope::data(product).message(message))
}

async fn delete_product(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathParam(id): PathParam<String>,
) -> Result<Envelope<()>, ApiError> {
    state
        .marketplace
        .catalog_service
        .delete_product(&id, &caller)
        .await
        .map_err(ApiError::write)?;
    Ok(Envelope::done("Product deleted successfully"))
}
