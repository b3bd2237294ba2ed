//! Order API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderDetail};
use crate::db::repository::OrderRepository;
use crate::utils::{AppError, AppResponse, AppResult};

/// GET /api/orders - 获取所有订单 (新建在前)
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Order>>>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_all().await?;
    Ok(Json(AppResponse::success(orders)))
}

/// GET /api/orders/:id - 获取单个订单
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(AppResponse::success(order)))
}

/// GET /api/orders/:id/detail - 获取订单及购物车明细
pub async fn get_detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<OrderDetail>>> {
    let repo = OrderRepository::new(state.db.clone());
    let detail = repo
        .get_detail(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    Ok(Json(AppResponse::success(detail)))
}

/// POST /api/create-order - 创建订单 (无购物车明细)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<AppResponse<Order>>> {
    payload.validate()?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(payload).await?;
    Ok(Json(AppResponse::success(order)))
}
