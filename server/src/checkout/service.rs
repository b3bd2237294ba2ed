//! Checkout Service
//!
//! 提交流程：
//! 1. 校验购物车结构
//! 2. 逐行解析商品与所选选项并算价
//! 3. 折扣码预校验 (给出友好错误)
//! 4. 调订单仓储的单事务写入 (事务内再次校验折扣并计数)

use crate::db::models::{
    CheckoutItem, CheckoutOrder, DiscountCode, ItemOptionDetail, Order, ProductType,
};
use crate::db::repository::{DiscountCodeRepository, OrderRepository, ProductRepository};
use crate::pricing;
use crate::utils::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

/// One selected option of a cart line
#[derive(Debug, Clone, Deserialize)]
pub struct CartSelection {
    pub menu_name: String,
    pub option_name: String,
}

/// One cart line: a product with its chosen options
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartItem {
    #[validate(length(min = 1, message = "product_id is required"))]
    pub product_id: String,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: u32,
    pub selections: Vec<CartSelection>,
}

/// Cart submission payload (POST /api/checkout)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CartSubmission {
    #[validate(length(min = 1, message = "orderno is required"))]
    pub orderno: String,
    #[validate(length(min = 1, message = "customer_name is required"))]
    pub customer_name: String,
    #[serde(rename = "type")]
    pub product_type: ProductType,
    pub deadline: Option<DateTime<Utc>>,
    pub discount_code: Option<String>,
    #[validate(length(min = 1, message = "cart must contain at least one item"))]
    #[validate(nested)]
    pub items: Vec<CartItem>,
}

#[derive(Clone)]
pub struct CheckoutService {
    orders: OrderRepository,
    products: ProductRepository,
    discounts: DiscountCodeRepository,
}

impl CheckoutService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            discounts: DiscountCodeRepository::new(db),
        }
    }

    /// Price the cart and persist the order atomically
    pub async fn submit(&self, cart: CartSubmission) -> AppResult<Order> {
        cart.validate()?;

        let discount = self.resolve_discount(cart.discount_code.as_deref()).await?;
        let items = self.resolve_items(&cart.items).await?;

        let line_subtotals: Vec<_> = items
            .iter()
            .map(|item| pricing::line_subtotal(item.unit_subtotal, item.quantity))
            .collect();
        let breakdown = pricing::price_cart(&line_subtotals, discount.as_ref());

        let product_name = items.first().map(|item| item.name.clone());
        let quantity = items.iter().map(|item| item.quantity).sum();

        let order = CheckoutOrder {
            orderno: cart.orderno,
            customer_name: cart.customer_name,
            product_type: cart.product_type,
            deadline: cart.deadline,
            product_name,
            quantity,
            subtotal: breakdown.subtotal,
            discount_amount: breakdown.discount_amount,
            total: breakdown.total,
            discount_code: discount.map(|code| code.code),
            items,
        };

        Ok(self.orders.create_with_items(order).await?)
    }

    /// Look up the discount code and check it is currently redeemable
    async fn resolve_discount(&self, code: Option<&str>) -> AppResult<Option<DiscountCode>> {
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return Ok(None);
        };

        let discount = self
            .discounts
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Discount code '{}' not found", code)))?;
        discount
            .validate_at(Utc::now())
            .map_err(|rejection| AppError::validation(rejection.to_string()))?;
        Ok(Some(discount))
    }

    /// Resolve every cart line against the product catalog
    async fn resolve_items(&self, lines: &[CartItem]) -> AppResult<Vec<CheckoutItem>> {
        let mut items = Vec::with_capacity(lines.len());

        for line in lines {
            let product = self
                .products
                .find_by_id(&line.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::not_found(format!("Product {} not found", line.product_id))
                })?;
            if !product.is_active {
                return Err(AppError::validation(format!(
                    "Product '{}' is no longer available",
                    product.name
                )));
            }

            let mut options = Vec::with_capacity(line.selections.len());
            for selection in &line.selections {
                let option = product
                    .find_option(&selection.menu_name, &selection.option_name)
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "Product '{}' has no option '{}' in menu '{}'",
                            product.name, selection.option_name, selection.menu_name
                        ))
                    })?;
                options.push(ItemOptionDetail {
                    menu_name: selection.menu_name.clone(),
                    option_name: selection.option_name.clone(),
                    price: option.price,
                });
            }

            let prices: Vec<_> = options.iter().map(|o| o.price).collect();
            items.push(CheckoutItem {
                product: product.id.clone(),
                name: product.name.clone(),
                quantity: line.quantity,
                unit_subtotal: pricing::unit_subtotal(&prices),
                options,
            });
        }

        Ok(items)
    }
}
