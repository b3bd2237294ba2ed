//! Product Model
//!
//! Option menus are embedded directly in the product record.

use super::order::ProductType;
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type ProductId = RecordId;

/// Menu option (embedded in ProductMenu)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuOption {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub display_order: i32,
}

impl MenuOption {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
            display_order: 0,
        }
    }
}

/// Named option menu (embedded in Product)
///
/// 下单时每个菜单必须且只能选择一个选项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductMenu {
    pub name: String,
    #[serde(default)]
    pub options: Vec<MenuOption>,
}

/// Product model (with embedded option menus)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    pub product_type: ProductType,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub menus: Vec<ProductMenu>,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Look up a priced option by menu name and option name
    pub fn find_option(&self, menu_name: &str, option_name: &str) -> Option<&MenuOption> {
        self.menus
            .iter()
            .find(|m| m.name == menu_name)
            .and_then(|m| m.options.iter().find(|o| o.name == option_name))
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProductCreate {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub product_type: ProductType,
    pub menus: Option<Vec<ProductMenu>>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<ProductType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menus: Option<Vec<ProductMenu>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
