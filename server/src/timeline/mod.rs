//! Timeline Module
//!
//! 时间轴排期：每天 24 个小时槽位 (tick)，订单方块在槽位间拖动。
//! board 是纯投影，service 负责先持久化后生效的命令。

pub mod board;
pub mod service;

pub use board::{SearchResult, TICK_COLUMN_WIDTH, TICKS_PER_DAY, TimelineBoard};
pub use service::TimelineService;
