use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::Router;
use domain::{Order, PlaceOrderRequest, PopulatedOrder};
use tracing::info;

use crate::auth::CurrentAccount;
use crate::error::ApiError;
use crate::response::{Envelope, JsonBody, PathParam};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order))
        .route("/my-orders", get(my_orders))
        .route("/:id", get(get_order))
        .route("/:id/cancel", patch(cancel_order))
}

async fn create_order(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
    JsonBody(request): JsonBody<PlaceOrderRequest>,
) -> Result<(StatusCode, Envelope<Order>), ApiError> {
    let order = state
        .marketplace
        .order_service
        .place_order(&buyer, request)
        .await
        .map_err(ApiError::write)?;

    info!(order_id = %order.id, "🧾 order created");
    Ok((
        StatusCode::CREATED,
        Envelope::data(order).message("Order created successfully"),
    ))
}

async fn my_orders(
    State(state): State<AppState>,
    CurrentAccount(buyer): CurrentAccount,
) -> Result<Envelope<Vec<PopulatedOrder>>, ApiError> {
    let orders = state.marketplace.order_service.my_orders(&buyer).await?;
    Ok(Envelope::list(orders))
}

async fn get_order(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathParam(id): PathParam<String>,
) -> Result<Envelope<PopulatedOrder>, ApiError> {
    let order = state.marketplace.order_service.order_for(&id, &caller).await?;
    Ok(Envelope::data(order))
}

async fn cancel_order(
    State(state): State<AppState>,
    CurrentAccount(caller): CurrentAccount,
    PathParam(id): PathParam<String>,
) -> Result<Envelope<Order>, ApiError> {
    let order = state
        .marketplace
        .order_service
        .cancel(&id, &caller)
        .await
        .map_err(ApiError::write)?;
    Ok(Envelope::data(order).message("Order cancelled successfully"))
}
