//! Checkout Module
//!
//! 购物车提交：解析选项、算价、单事务落库。

pub mod service;

pub use service::{CartItem, CartSelection, CartSubmission, CheckoutService};
