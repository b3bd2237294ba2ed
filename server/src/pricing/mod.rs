//! Pricing Module
//!
//! 购物车金额计算：选项价格求和、折扣、总价。
//! 全程 rust_decimal，入库即展示值。

pub mod calculator;

pub use calculator::{
    PriceBreakdown, discount_amount, line_subtotal, price_cart, round_money, unit_subtotal,
};
