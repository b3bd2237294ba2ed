//! Order Repository
//!
//! 订单主行为平表，明细通过图边遍历：
//! order ->has_item-> order_item ->has_option-> item_option

use super::{BaseRepository, RepoError, RepoResult, map_unique_violation};
use crate::db::models::{CheckoutOrder, Order, OrderCreate, OrderDetail};
use chrono::{DateTime, NaiveDate, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

/// Single atomic write for a checkout: discount re-check, redemption count,
/// order row, item rows and graph edges all commit or all roll back.
///
/// 折扣校验失败用 THROW 使整个事务回滚
const CHECKOUT_TRANSACTION: &str = r#"
BEGIN TRANSACTION;

LET $code_rec = IF $discount_code != NONE AND $discount_code != NULL {
    (SELECT * FROM discount_code WHERE code = $discount_code LIMIT 1)[0]
} ELSE {
    NONE
};

IF $discount_code != NONE AND $discount_code != NULL AND $code_rec = NONE {
    THROW "discount_not_found";
};
IF $code_rec != NONE AND $code_rec.is_active != true {
    THROW "discount_inactive";
};
IF $code_rec != NONE AND $code_rec.expiration_date != NONE AND $code_rec.expiration_date < $now {
    THROW "discount_expired";
};
IF $code_rec != NONE AND $code_rec.use_limit != NONE AND $code_rec.times_used >= $code_rec.use_limit {
    THROW "discount_exhausted";
};
IF $code_rec != NONE {
    UPDATE $code_rec.id SET times_used += 1;
};

LET $order = (CREATE order SET
    orderno = $orderno,
    customer_name = $customer_name,
    product_type = $product_type,
    completed = false,
    assigned_to = NONE,
    tick = NONE,
    timeline_date = NONE,
    deadline = $deadline ?? NONE,
    discount = $code_rec.id ?? NONE,
    product_name = $product_name ?? NONE,
    quantity = $quantity,
    subtotal = $subtotal,
    discount_amount = $discount_amount,
    total = $total,
    created_at = time::now()
RETURN AFTER)[0];

FOR $item IN $items {
    LET $item_row = (CREATE order_item SET
        product = $item.product ?? NONE,
        name = $item.name,
        quantity = $item.quantity,
        unit_subtotal = $item.unit_subtotal
    RETURN AFTER)[0];
    RELATE $order->has_item->$item_row;
    FOR $opt IN $item.options {
        LET $opt_row = (CREATE item_option SET
            menu_name = $opt.menu_name,
            option_name = $opt.option_name,
            price = $opt.price
        RETURN AFTER)[0];
        RELATE $item_row->has_option->$opt_row;
    };
};

COMMIT TRANSACTION;
"#;

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all orders, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find orders visible on a given timeline date
    ///
    /// 未排期订单在任何日期可见；已排期订单只在所属日期可见
    pub async fn find_for_timeline(&self, date: NaiveDate) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self
            .base
            .db()
            .query("SELECT * FROM order WHERE tick = NONE OR timeline_date = $date ORDER BY created_at")
            .bind(("date", date))
            .await?
            .take(0)?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let order: Option<Order> = self.base.db().select(thing).await?;
        Ok(order)
    }

    /// Find order by its external order number
    pub async fn find_by_orderno(&self, orderno: &str) -> RepoResult<Option<Order>> {
        let orderno_owned = orderno.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE orderno = $orderno LIMIT 1")
            .bind(("orderno", orderno_owned))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Create a bare order (no cart lines)
    ///
    /// orderno 唯一性由数据库唯一索引保证
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        let assigned_to: Option<RecordId> = match data.user_id.as_deref().filter(|s| !s.is_empty())
        {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", raw)))?,
            ),
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE order SET
                    orderno = $orderno,
                    customer_name = $customer_name,
                    product_type = $product_type,
                    completed = false,
                    assigned_to = $assigned_to ?? NONE,
                    tick = NONE,
                    timeline_date = NONE,
                    deadline = $deadline ?? NONE,
                    discount = NONE,
                    product_name = NONE,
                    quantity = 1,
                    subtotal = $zero,
                    discount_amount = $zero,
                    total = $zero,
                    created_at = time::now()
                RETURN AFTER"#,
            )
            .bind(("orderno", data.orderno.clone()))
            .bind(("customer_name", data.customer_name))
            .bind(("product_type", data.product_type))
            .bind(("assigned_to", assigned_to))
            .bind(("deadline", data.deadline))
            .bind(("zero", rust_decimal::Decimal::ZERO))
            .await
            .map_err(|e| {
                map_unique_violation(e, format!("Order number '{}' already exists", data.orderno))
            })?;

        let created: Option<Order> = result.take(0).map_err(|e| {
            map_unique_violation(e, format!("Order number '{}' already exists", data.orderno))
        })?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Create a priced order with its cart lines in one transaction
    ///
    /// 折扣码在事务内重新校验并计数，避免并发下超用
    pub async fn create_with_items(&self, data: CheckoutOrder) -> RepoResult<Order> {
        let orderno = data.orderno.clone();
        self.base
            .db()
            .query(CHECKOUT_TRANSACTION)
            .bind(("discount_code", data.discount_code))
            .bind(("now", Utc::now()))
            .bind(("orderno", data.orderno))
            .bind(("customer_name", data.customer_name))
            .bind(("product_type", data.product_type))
            .bind(("deadline", data.deadline))
            .bind(("product_name", data.product_name))
            .bind(("quantity", data.quantity))
            .bind(("subtotal", data.subtotal))
            .bind(("discount_amount", data.discount_amount))
            .bind(("total", data.total))
            .bind(("items", data.items))
            .await
            .map_err(|e| map_checkout_error(e, &orderno))?
            .check()
            .map_err(|e| map_checkout_error(e, &orderno))?;

        self.find_by_orderno(&orderno)
            .await?
            .ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// Fetch the full order detail via graph traversal
    pub async fn get_detail(&self, id: &str) -> RepoResult<Option<OrderDetail>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT
                    <string> id AS order_id,
                    orderno,
                    customer_name,
                    product_type,
                    completed,
                    tick,
                    timeline_date,
                    deadline,
                    product_name,
                    quantity,
                    subtotal,
                    discount_amount,
                    total,
                    (SELECT
                        name,
                        quantity,
                        unit_subtotal,
                        (SELECT menu_name, option_name, price
                         FROM ->has_option->item_option) AS options
                     FROM ->has_item->order_item) AS items
                FROM $thing"#,
            )
            .bind(("thing", thing))
            .await?;
        let detail: Option<OrderDetail> = result.take(0)?;
        Ok(detail)
    }

    /// Place the order on an hourly tick of a date
    pub async fn set_tick(&self, id: &str, tick: u8, date: NaiveDate) -> RepoResult<Order> {
        let thing = self.parse_existing(id).await?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET tick = $tick, timeline_date = $date RETURN AFTER")
            .bind(("thing", thing))
            .bind(("tick", tick))
            .bind(("date", date))
            .await?;
        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Return the order to the unplaced queue
    pub async fn clear_tick(&self, id: &str) -> RepoResult<Order> {
        let thing = self.parse_existing(id).await?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET tick = NONE, timeline_date = NONE RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Mark the order completed
    pub async fn set_completed(&self, id: &str) -> RepoResult<Order> {
        let thing = self.parse_existing(id).await?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET completed = true RETURN AFTER")
            .bind(("thing", thing))
            .await?;
        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Assign (or unassign with `None`) a staff member
    pub async fn set_assigned(&self, id: &str, staff: Option<RecordId>) -> RepoResult<Order> {
        let thing = self.parse_existing(id).await?;
        let mut result = match staff {
            Some(staff) => {
                self.base
                    .db()
                    .query("UPDATE $thing SET assigned_to = $staff RETURN AFTER")
                    .bind(("thing", thing))
                    .bind(("staff", staff))
                    .await?
            }
            None => {
                self.base
                    .db()
                    .query("UPDATE $thing SET assigned_to = NONE RETURN AFTER")
                    .bind(("thing", thing))
                    .await?
            }
        };
        result
            .take::<Option<Order>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Parse the id and verify the order exists
    async fn parse_existing(&self, id: &str) -> RepoResult<RecordId> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;
        Ok(thing)
    }
}

/// Map checkout transaction failures to repository errors.
///
/// THROW 的错误串与唯一索引冲突都从错误文本识别
fn map_checkout_error(err: surrealdb::Error, orderno: &str) -> RepoError {
    let text = err.to_string();
    if text.contains("discount_not_found") {
        RepoError::NotFound("Discount code not found".to_string())
    } else if text.contains("discount_inactive") {
        RepoError::Validation("Discount code is not active".to_string())
    } else if text.contains("discount_expired") {
        RepoError::Validation("Discount code has expired".to_string())
    } else if text.contains("discount_exhausted") {
        RepoError::Validation("Discount code has reached its use limit".to_string())
    } else if text.contains("already contains") {
        RepoError::Duplicate(format!("Order number '{}' already exists", orderno))
    } else {
        RepoError::Database(text)
    }
}
