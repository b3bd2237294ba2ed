//! Discount Code API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{DiscountCode, DiscountCodeCreate};
use crate::db::repository::DiscountCodeRepository;
use crate::utils::{AppError, AppResponse, AppResult};

/// 折扣码预检请求
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub code: String,
}

/// GET /api/discount-codes - 获取所有折扣码
pub async fn list(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<Vec<DiscountCode>>>> {
    let repo = DiscountCodeRepository::new(state.db.clone());
    let codes = repo.find_all().await?;
    Ok(Json(AppResponse::success(codes)))
}

/// GET /api/discount-codes/:id - 获取单个折扣码
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<DiscountCode>>> {
    let repo = DiscountCodeRepository::new(state.db.clone());
    let code = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount code {} not found", id)))?;
    Ok(Json(AppResponse::success(code)))
}

/// POST /api/discount-codes - 创建折扣码 (Auto 模式自动生成码)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiscountCodeCreate>,
) -> AppResult<Json<AppResponse<DiscountCode>>> {
    payload.validate()?;

    let repo = DiscountCodeRepository::new(state.db.clone());
    let code = repo.create(payload).await?;
    Ok(Json(AppResponse::success(code)))
}

/// PUT /api/discount-codes/:id/toggle - 启用/停用折扣码
pub async fn toggle_active(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<DiscountCode>>> {
    let repo = DiscountCodeRepository::new(state.db.clone());
    let code = repo.toggle_active(&id).await?;
    Ok(Json(AppResponse::success(code)))
}

/// DELETE /api/discount-codes/:id - 删除折扣码并清理订单引用
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = DiscountCodeRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(AppResponse::success(result)))
}

/// POST /api/validate-discount - 结账前校验折扣码是否可用
pub async fn validate(
    State(state): State<ServerState>,
    Json(payload): Json<ValidateRequest>,
) -> AppResult<Json<AppResponse<DiscountCode>>> {
    let repo = DiscountCodeRepository::new(state.db.clone());
    let code = repo
        .find_by_code(&payload.code)
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Discount code '{}' not found", payload.code))
        })?;
    code.validate_at(Utc::now())
        .map_err(|rejection| AppError::validation(rejection.to_string()))?;
    Ok(Json(AppResponse::success(code)))
}
