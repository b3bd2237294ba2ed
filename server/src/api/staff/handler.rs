//! Staff API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Staff, StaffCreate};
use crate::db::repository::StaffRepository;
use crate::utils::{AppError, AppResponse, AppResult};

/// 旧版删除端点的请求体
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    #[serde(rename = "userId")]
    pub user_id: String,
}

/// GET /api/staff - 获取所有活跃员工
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Staff>>>> {
    let repo = StaffRepository::new(state.db.clone());
    let staff = repo.find_all().await?;
    Ok(Json(AppResponse::success(staff)))
}

/// GET /api/staff/:id - 获取单个员工
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Staff>>> {
    let repo = StaffRepository::new(state.db.clone());
    let staff = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Staff {} not found", id)))?;
    Ok(Json(AppResponse::success(staff)))
}

/// POST /api/create-user - 创建员工
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StaffCreate>,
) -> AppResult<Json<AppResponse<Staff>>> {
    payload.validate()?;

    let repo = StaffRepository::new(state.db.clone());
    let staff = repo.create(payload).await?;
    Ok(Json(AppResponse::success(staff)))
}

/// DELETE /api/staff/:id - 删除员工
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = StaffRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;
    Ok(Json(AppResponse::success(result)))
}

/// DELETE /api/delete-user - 删除员工 (id 在请求体中)
pub async fn delete_by_body(
    State(state): State<ServerState>,
    Json(payload): Json<DeleteUserRequest>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = StaffRepository::new(state.db.clone());
    let result = repo.delete(&payload.user_id).await?;
    Ok(Json(AppResponse::success(result)))
}
