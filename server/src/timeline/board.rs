//! Timeline Board
//!
//! 某一天时间轴的纯内存投影。不碰数据库，所有写操作走 [`super::TimelineService`]。

use crate::db::models::{Order, ProductType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Hourly slots per day
pub const TICKS_PER_DAY: u8 = 24;

/// Pixel width of one tick column, used to compute scroll offsets
pub const TICK_COLUMN_WIDTH: u32 = 160;

/// Outcome of an order number search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum SearchResult {
    NotFound,
    Unplaced {
        order: Order,
    },
    Placed {
        order: Order,
        tick: u8,
        /// 让该槽位滚动进视口的横向偏移
        scroll_offset: u32,
    },
}

impl SearchResult {
    /// Classify a found order as placed or still queued
    pub fn classify(order: Order) -> Self {
        match order.tick {
            Some(tick) => SearchResult::Placed {
                tick,
                scroll_offset: u32::from(tick) * TICK_COLUMN_WIDTH,
                order,
            },
            None => SearchResult::Unplaced { order },
        }
    }
}

/// One day's view of the timeline
///
/// 可见性规则：未排期订单任何日期可见；已排期订单只在所属日期可见
#[derive(Debug, Clone)]
pub struct TimelineBoard {
    date: NaiveDate,
    orders: Vec<Order>,
}

impl TimelineBoard {
    /// Build the board for a date, keeping only orders visible on it
    pub fn new(date: NaiveDate, orders: Vec<Order>) -> Self {
        let orders = orders
            .into_iter()
            .filter(|o| Self::is_visible(o, date))
            .collect();
        Self { date, orders }
    }

    fn is_visible(order: &Order, date: NaiveDate) -> bool {
        match order.tick {
            None => true,
            Some(_) => order.timeline_date == Some(date),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Orders still waiting in the queue
    pub fn unplaced(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.tick.is_none())
    }

    /// Orders placed on a tick of this date
    pub fn placed(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter().filter(|o| o.tick.is_some())
    }

    /// Number of placed orders per tick
    pub fn occupancy(&self) -> [usize; TICKS_PER_DAY as usize] {
        let mut counts = [0usize; TICKS_PER_DAY as usize];
        for order in self.placed() {
            if let Some(tick) = order.tick
                && usize::from(tick) < counts.len()
            {
                counts[usize::from(tick)] += 1;
            }
        }
        counts
    }

    /// Tick with the fewest placed orders
    ///
    /// 并列时取编号最小的槽位
    pub fn least_loaded_tick(&self) -> u8 {
        let counts = self.occupancy();
        let mut best: u8 = 0;
        for (tick, &count) in counts.iter().enumerate() {
            if count < counts[usize::from(best)] {
                best = tick as u8;
            }
        }
        best
    }

    /// Orders matching any of the given types
    ///
    /// 空类型列表表示不过滤
    pub fn filter_by_type(&self, types: &[ProductType]) -> Vec<&Order> {
        if types.is_empty() {
            return self.orders.iter().collect();
        }
        self.orders
            .iter()
            .filter(|o| types.contains(&o.product_type))
            .collect()
    }

    /// Search the visible orders by order number
    pub fn find_by_orderno(&self, orderno: &str) -> SearchResult {
        match self.orders.iter().find(|o| o.orderno == orderno) {
            Some(order) => SearchResult::classify(order.clone()),
            None => SearchResult::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn make_order(
        orderno: &str,
        product_type: ProductType,
        tick: Option<u8>,
        timeline_date: Option<NaiveDate>,
    ) -> Order {
        Order {
            id: None,
            orderno: orderno.to_string(),
            customer_name: "Test Customer".to_string(),
            product_type,
            completed: false,
            assigned_to: None,
            tick,
            timeline_date,
            deadline: None,
            discount: None,
            product_name: None,
            quantity: 1,
            subtotal: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            total: Decimal::ZERO,
            created_at: None,
        }
    }

    #[test]
    fn unplaced_orders_visible_on_any_date() {
        let orders = vec![make_order("A-1", ProductType::Roland, None, None)];
        let board = TimelineBoard::new(d("2025-03-10"), orders.clone());
        assert_eq!(board.orders().len(), 1);

        let board = TimelineBoard::new(d("2025-07-01"), orders);
        assert_eq!(board.orders().len(), 1);
    }

    #[test]
    fn placed_orders_only_visible_on_their_date() {
        let orders = vec![make_order(
            "A-1",
            ProductType::Digital,
            Some(9),
            Some(d("2025-03-10")),
        )];
        let board = TimelineBoard::new(d("2025-03-10"), orders.clone());
        assert_eq!(board.orders().len(), 1);

        let board = TimelineBoard::new(d("2025-03-11"), orders);
        assert!(board.orders().is_empty());
    }

    #[test]
    fn occupancy_counts_orders_per_tick() {
        let date = d("2025-03-10");
        let orders = vec![
            make_order("A-1", ProductType::Roland, Some(9), Some(date)),
            make_order("A-2", ProductType::Sign, Some(9), Some(date)),
            make_order("A-3", ProductType::Laser, Some(14), Some(date)),
            make_order("A-4", ProductType::Wood, None, None),
        ];
        let board = TimelineBoard::new(date, orders);
        let counts = board.occupancy();
        assert_eq!(counts[9], 2);
        assert_eq!(counts[14], 1);
        assert_eq!(counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn least_loaded_picks_first_empty_tick() {
        let date = d("2025-03-10");
        let orders = vec![
            make_order("A-1", ProductType::Roland, Some(0), Some(date)),
            make_order("A-2", ProductType::Roland, Some(1), Some(date)),
        ];
        let board = TimelineBoard::new(date, orders);
        assert_eq!(board.least_loaded_tick(), 2);
    }

    #[test]
    fn least_loaded_tick_prefers_lowest_on_tie() {
        let board = TimelineBoard::new(d("2025-03-10"), Vec::new());
        assert_eq!(board.least_loaded_tick(), 0);
    }

    #[test]
    fn filter_with_empty_type_list_shows_all() {
        let orders = vec![
            make_order("A-1", ProductType::Roland, None, None),
            make_order("A-2", ProductType::Digital, None, None),
        ];
        let board = TimelineBoard::new(d("2025-03-10"), orders);
        assert_eq!(board.filter_by_type(&[]).len(), 2);
    }

    #[test]
    fn filter_keeps_only_matching_types() {
        let orders = vec![
            make_order("A-1", ProductType::Roland, None, None),
            make_order("A-2", ProductType::Digital, None, None),
            make_order("A-3", ProductType::Roland, None, None),
        ];
        let board = TimelineBoard::new(d("2025-03-10"), orders);
        let filtered = board.filter_by_type(&[ProductType::Roland]);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|o| o.product_type == ProductType::Roland));
    }

    #[test]
    fn search_miss_returns_not_found() {
        let board = TimelineBoard::new(d("2025-03-10"), Vec::new());
        assert!(matches!(
            board.find_by_orderno("missing"),
            SearchResult::NotFound
        ));
    }

    #[test]
    fn search_finds_unplaced_order() {
        let orders = vec![make_order("A-7", ProductType::Sign, None, None)];
        let board = TimelineBoard::new(d("2025-03-10"), orders);
        assert!(matches!(
            board.find_by_orderno("A-7"),
            SearchResult::Unplaced { .. }
        ));
    }

    #[test]
    fn search_reports_tick_and_scroll_offset() {
        let date = d("2025-03-10");
        let orders = vec![make_order("A-9", ProductType::Laser, Some(5), Some(date))];
        let board = TimelineBoard::new(date, orders);
        match board.find_by_orderno("A-9") {
            SearchResult::Placed {
                tick,
                scroll_offset,
                ..
            } => {
                assert_eq!(tick, 5);
                assert_eq!(scroll_offset, 5 * TICK_COLUMN_WIDTH);
            }
            other => panic!("expected placed result, got {:?}", other),
        }
    }
}
