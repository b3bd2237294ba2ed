//! Checkout API Handlers

use axum::{Json, extract::State};

use crate::checkout::{CartSubmission, CheckoutService};
use crate::core::ServerState;
use crate::db::models::Order;
use crate::utils::{AppResponse, AppResult};

/// POST /api/checkout - 提交购物车，算价并原子落单
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<CartSubmission>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = CheckoutService::new(state.db.clone());
    let order = service.submit(payload).await?;
    Ok(Json(AppResponse::success(order)))
}
