//! Order Model (Graph Model)
//!
//! 订单使用图边关系存储明细：
//! order ->has_item-> order_item ->has_option-> item_option

use super::serde_helpers;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Order ID type
pub type OrderId = RecordId;

/// Product type classifier
///
/// 每个订单属于且仅属于一个类型，用于时间轴过滤和着色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProductType {
    Roland,
    Digital,
    Sign,
    Laser,
    Wood,
    Reprint,
}

// =============================================================================
// Order (主表)
// =============================================================================

/// Order entity
///
/// 时间轴调度的最小单位 ("cube")：
/// - `tick = None` 表示未排期 (queued)，在任何日期视图都可见
/// - `tick = Some(n)` 时 `timeline_date` 必须存在，订单只属于那一天
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// 外部订单号 (全局唯一)
    pub orderno: String,
    pub customer_name: String,
    pub product_type: ProductType,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub completed: bool,
    /// 指派员工 (可空)
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub assigned_to: Option<RecordId>,
    /// 时间轴小时槽位 (0..=23)
    pub tick: Option<u8>,
    /// 排期所属日期 (与 tick 同生同灭)
    pub timeline_date: Option<NaiveDate>,
    pub deadline: Option<DateTime<Utc>>,
    /// 结账时使用的折扣码
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub discount: Option<RecordId>,
    /// 商品名称快照 (用于展示标题)
    pub product_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub total: Decimal,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_quantity() -> u32 {
    1
}

/// Create order payload (POST /api/create-order)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    /// 创建时即指派的员工 (可选)
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "orderno is required"))]
    pub orderno: String,
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub deadline: Option<DateTime<Utc>>,
}

// =============================================================================
// Order Item (图边: has_item)
// =============================================================================

/// Order item (connected via has_item edge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub product: Option<RecordId>,
    pub name: String,
    pub quantity: u32,
    /// 单件小计 (所选选项价格之和)
    pub unit_subtotal: Decimal,
}

/// Order item option (connected via has_option edge)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOption {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub menu_name: String,
    pub option_name: String,
    pub price: Decimal,
}

// =============================================================================
// Checkout Input (单事务写入的输入)
// =============================================================================

/// One cart line for the checkout transaction
///
/// `product` 直接以原生 RecordId 绑定，落库为记录链接
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    #[serde(default)]
    pub product: Option<RecordId>,
    pub name: String,
    pub quantity: u32,
    pub unit_subtotal: Decimal,
    #[serde(default)]
    pub options: Vec<ItemOptionDetail>,
}

/// Fully priced order ready to be persisted
///
/// 金额在结账服务中算好；折扣码在写入事务内做最终校验
#[derive(Debug, Clone)]
pub struct CheckoutOrder {
    pub orderno: String,
    pub customer_name: String,
    pub product_type: ProductType,
    pub deadline: Option<DateTime<Utc>>,
    pub product_name: Option<String>,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub total: Decimal,
    pub discount_code: Option<String>,
    pub items: Vec<CheckoutItem>,
}

// =============================================================================
// API Response Types (graph traversal projections)
// =============================================================================

/// Item option for detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemOptionDetail {
    pub menu_name: String,
    pub option_name: String,
    pub price: Decimal,
}

/// Order item for detail view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_subtotal: Decimal,
    #[serde(default)]
    pub options: Vec<ItemOptionDetail>,
}

/// Full order detail (order row plus nested items and options)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order_id: String,
    pub orderno: String,
    pub customer_name: String,
    pub product_type: ProductType,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub completed: bool,
    pub tick: Option<u8>,
    pub timeline_date: Option<NaiveDate>,
    pub deadline: Option<DateTime<Utc>>,
    pub product_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItemDetail>,
}
