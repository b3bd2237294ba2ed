//! Price Calculator
//!
//! Pure cart arithmetic. Uses rust_decimal for precise calculations.
//!
//! 规则：
//! - 单件小计 = 所选选项价格之和
//! - 行小计 = 单件小计 × 数量
//! - 订单小计 = 各行小计之和
//! - 百分比折扣 = 小计 × 百分比 / 100
//! - 总价 = max(0, 小计 - 折扣额)

use crate::db::models::{DiscountCode, DiscountKind};
use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary values round to 2 decimal places, half away from zero
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value for storage and display
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Calculated cart totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
}

/// Per-unit subtotal of one cart line (sum of selected option prices)
pub fn unit_subtotal(option_prices: &[Decimal]) -> Decimal {
    round_money(option_prices.iter().copied().sum())
}

/// Subtotal of one cart line
pub fn line_subtotal(unit_subtotal: Decimal, quantity: u32) -> Decimal {
    round_money(unit_subtotal * Decimal::from(quantity))
}

/// Discount amount a code grants on a subtotal
pub fn discount_amount(subtotal: Decimal, code: &DiscountCode) -> Decimal {
    match code.kind {
        DiscountKind::Fixed => round_money(code.amount),
        DiscountKind::Percentage => round_money(subtotal * code.amount / Decimal::ONE_HUNDRED),
    }
}

/// Price a whole cart: line subtotals, optional discount, clamped total
pub fn price_cart(line_subtotals: &[Decimal], discount: Option<&DiscountCode>) -> PriceBreakdown {
    let subtotal = round_money(line_subtotals.iter().copied().sum());
    let discount_amount = discount
        .map(|code| self::discount_amount(subtotal, code))
        .unwrap_or_default();
    let total = round_money((subtotal - discount_amount).max(Decimal::ZERO));

    PriceBreakdown {
        subtotal,
        discount_amount,
        total,
    }
}
