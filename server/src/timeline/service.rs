//! Timeline Service
//!
//! 时间轴命令层：所有变更先写库，成功后才反映到看板。
//! 进行中的拖动不做乐观更新，失败即原样回弹。

use super::board::{SearchResult, TICKS_PER_DAY, TimelineBoard};
use crate::db::models::Order;
use crate::db::repository::{OrderRepository, StaffRepository};
use crate::utils::{AppError, AppResult};
use chrono::NaiveDate;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct TimelineService {
    orders: OrderRepository,
    staff: StaffRepository,
}

impl TimelineService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: OrderRepository::new(db.clone()),
            staff: StaffRepository::new(db),
        }
    }

    /// Load the board projection for a date
    pub async fn load_board(&self, date: NaiveDate) -> AppResult<TimelineBoard> {
        let orders = self.orders.find_for_timeline(date).await?;
        Ok(TimelineBoard::new(date, orders))
    }

    /// Move an order onto a tick of the given date
    ///
    /// 已完成订单不可移动；跨日期移动需先取消排期
    pub async fn move_to_tick(&self, id: &str, tick: u8, date: NaiveDate) -> AppResult<Order> {
        if tick >= TICKS_PER_DAY {
            return Err(AppError::validation(format!(
                "Tick must be within 0..={}",
                TICKS_PER_DAY - 1
            )));
        }

        let order = self.require_order(id).await?;
        if order.completed {
            return Err(AppError::business_rule(
                "Completed orders cannot be moved on the timeline",
            ));
        }
        if order.tick.is_some() && order.timeline_date != Some(date) {
            return Err(AppError::validation(
                "Order is scheduled on another date; unplace it first",
            ));
        }

        Ok(self.orders.set_tick(id, tick, date).await?)
    }

    /// Move an order to the least loaded tick of the date
    pub async fn move_to_least_loaded_tick(&self, id: &str, date: NaiveDate) -> AppResult<Order> {
        let board = self.load_board(date).await?;
        self.move_to_tick(id, board.least_loaded_tick(), date).await
    }

    /// Return an order to the unplaced queue
    pub async fn unplace(&self, id: &str) -> AppResult<Order> {
        let order = self.require_order(id).await?;
        if order.completed {
            return Err(AppError::business_rule(
                "Completed orders cannot be moved on the timeline",
            ));
        }
        Ok(self.orders.clear_tick(id).await?)
    }

    /// Mark an order completed. There is no way back to in-progress.
    pub async fn mark_complete(&self, id: &str) -> AppResult<Order> {
        self.require_order(id).await?;
        Ok(self.orders.set_completed(id).await?)
    }

    /// Assign a staff member, or clear the assignment with `None`
    pub async fn assign(&self, id: &str, staff_id: Option<&str>) -> AppResult<Order> {
        self.require_order(id).await?;

        match staff_id {
            Some(sid) => {
                let staff = self
                    .staff
                    .find_by_id(sid)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Staff {} not found", sid)))?;
                if !staff.is_active {
                    return Err(AppError::business_rule(
                        "Cannot assign an inactive staff member",
                    ));
                }
                Ok(self.orders.set_assigned(id, staff.id).await?)
            }
            None => Ok(self.orders.set_assigned(id, None).await?),
        }
    }

    /// Search all orders by order number
    pub async fn search(&self, orderno: &str) -> AppResult<SearchResult> {
        match self.orders.find_by_orderno(orderno).await? {
            Some(order) => Ok(SearchResult::classify(order)),
            None => Ok(SearchResult::NotFound),
        }
    }

    /// Search from a day view: visible orders first, then the rest
    pub async fn search_on(&self, date: NaiveDate, orderno: &str) -> AppResult<SearchResult> {
        let board = self.load_board(date).await?;
        match board.find_by_orderno(orderno) {
            SearchResult::NotFound => self.search(orderno).await,
            hit => Ok(hit),
        }
    }

    async fn require_order(&self, id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))
    }
}
