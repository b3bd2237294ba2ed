//! Database Models

// Serde helpers
pub mod serde_helpers;

// Staff
pub mod staff;

// Product Domain
pub mod product;

// Discounts
pub mod discount_code;

// Orders
pub mod order;

// Re-exports
pub use staff::{Staff, StaffCreate, StaffId, StaffRole};
pub use product::{MenuOption, Product, ProductCreate, ProductId, ProductMenu, ProductUpdate};
pub use discount_code::{
    DiscountCode, DiscountCodeCreate, DiscountCodeId, DiscountKind, DiscountMode,
    DiscountRejection,
};
pub use order::{
    CheckoutItem, CheckoutOrder, ItemOption, ItemOptionDetail, Order, OrderCreate, OrderDetail,
    OrderId, OrderItem, OrderItemDetail, ProductType,
};
