//! Timeline API 模块
//!
//! 看板读取与排期命令。所有命令先写库，成功才返回更新后的订单。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/timeline", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{date}", get(handler::board))
        .route("/{date}/search", get(handler::search))
        .route("/orders/{id}/move", put(handler::move_to_tick))
        .route("/orders/{id}/auto-place", put(handler::auto_place))
        .route("/orders/{id}/unplace", put(handler::unplace))
        .route("/orders/{id}/complete", put(handler::complete))
        .route("/orders/{id}/assign", put(handler::assign))
}
