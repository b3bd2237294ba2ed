//! Timeline API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::ServerState;
use crate::db::models::{Order, ProductType};
use crate::timeline::{SearchResult, TimelineService};
use crate::utils::{AppError, AppResponse, AppResult};

/// 看板查询参数
#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    /// 逗号分隔的类型过滤，如 `types=Roland,Digital`。缺省为不过滤
    pub types: Option<String>,
}

/// 看板响应
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub date: NaiveDate,
    /// 每个槽位的已排订单数
    pub occupancy: Vec<usize>,
    pub least_loaded_tick: u8,
    pub orders: Vec<Order>,
}

/// 搜索查询参数
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub orderno: String,
}

/// 移动请求
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub date: NaiveDate,
    pub tick: u8,
}

/// 自动放置请求
#[derive(Debug, Deserialize)]
pub struct AutoPlaceRequest {
    pub date: NaiveDate,
}

/// 指派请求 (staff_id 为空表示取消指派)
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub staff_id: Option<String>,
}

/// GET /api/timeline/:date - 获取某天的看板
pub async fn board(
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<BoardQuery>,
) -> AppResult<Json<AppResponse<BoardResponse>>> {
    let types = parse_types(query.types.as_deref())?;

    let service = TimelineService::new(state.db.clone());
    let board = service.load_board(date).await?;

    let orders = board
        .filter_by_type(&types)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();

    Ok(Json(AppResponse::success(BoardResponse {
        date: board.date(),
        occupancy: board.occupancy().to_vec(),
        least_loaded_tick: board.least_loaded_tick(),
        orders,
    })))
}

/// GET /api/timeline/:date/search?orderno=... - 按订单号定位订单
pub async fn search(
    State(state): State<ServerState>,
    Path(date): Path<NaiveDate>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<AppResponse<SearchResult>>> {
    let service = TimelineService::new(state.db.clone());
    let result = service.search_on(date, &query.orderno).await?;
    Ok(Json(AppResponse::success(result)))
}

/// PUT /api/timeline/orders/:id/move - 拖动订单到指定槽位
pub async fn move_to_tick(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MoveRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = TimelineService::new(state.db.clone());
    let order = service
        .move_to_tick(&id, payload.tick, payload.date)
        .await?;
    Ok(Json(AppResponse::success(order)))
}

/// PUT /api/timeline/orders/:id/auto-place - 放到当天最空的槽位
pub async fn auto_place(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AutoPlaceRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = TimelineService::new(state.db.clone());
    let order = service.move_to_least_loaded_tick(&id, payload.date).await?;
    Ok(Json(AppResponse::success(order)))
}

/// PUT /api/timeline/orders/:id/unplace - 退回未排期队列
pub async fn unplace(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = TimelineService::new(state.db.clone());
    let order = service.unplace(&id).await?;
    Ok(Json(AppResponse::success(order)))
}

/// PUT /api/timeline/orders/:id/complete - 标记完成 (不可逆)
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = TimelineService::new(state.db.clone());
    let order = service.mark_complete(&id).await?;
    Ok(Json(AppResponse::success(order)))
}

/// PUT /api/timeline/orders/:id/assign - 指派或取消指派员工
pub async fn assign(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AssignRequest>,
) -> AppResult<Json<AppResponse<Order>>> {
    let service = TimelineService::new(state.db.clone());
    let order = service.assign(&id, payload.staff_id.as_deref()).await?;
    Ok(Json(AppResponse::success(order)))
}

/// Parse a comma separated type filter
fn parse_types(raw: Option<&str>) -> AppResult<Vec<ProductType>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.to_lowercase().as_str() {
            "roland" => Ok(ProductType::Roland),
            "digital" => Ok(ProductType::Digital),
            "sign" => Ok(ProductType::Sign),
            "laser" => Ok(ProductType::Laser),
            "wood" => Ok(ProductType::Wood),
            "reprint" => Ok(ProductType::Reprint),
            _ => Err(AppError::validation(format!("Invalid product type: {}", s))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_types_accepts_mixed_case_list() {
        let types = parse_types(Some("Roland,digital, SIGN")).unwrap();
        assert_eq!(
            types,
            vec![ProductType::Roland, ProductType::Digital, ProductType::Sign]
        );
    }

    #[test]
    fn parse_types_empty_means_no_filter() {
        assert!(parse_types(None).unwrap().is_empty());
        assert!(parse_types(Some("")).unwrap().is_empty());
    }

    #[test]
    fn parse_types_rejects_unknown_type() {
        assert!(parse_types(Some("vinyl")).is_err());
    }
}
