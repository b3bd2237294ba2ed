//! Staff API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/staff", routes())
        // 旧版前端使用的平铺端点
        .route("/api/create-user", post(handler::create))
        .route("/api/delete-user", delete(handler::delete_by_body))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
