//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`orders`] - 订单管理接口 (含 /api/create-order 兼容端点)
//! - [`timeline`] - 时间轴看板与排期命令
//! - [`products`] - 商品与选项菜单管理接口
//! - [`discount_codes`] - 折扣码管理接口
//! - [`staff`] - 员工管理接口 (含 /api/create-user, /api/delete-user 兼容端点)
//! - [`checkout`] - 购物车结账接口

pub mod health;

pub mod checkout;
pub mod discount_codes;
pub mod orders;
pub mod products;
pub mod staff;
pub mod timeline;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
