//! PrintDesk Server - 打印门店订单管理系统
//!
//! # 架构概述
//!
//! 本模块是 PrintDesk 服务端的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储，订单明细用图边关系表达
//! - **时间轴** (`timeline`): 每天 24 个小时槽位的订单排期看板
//! - **定价** (`pricing`): 选项菜单求和与折扣计算
//! - **结账** (`checkout`): 购物车解析与单事务落单
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── timeline/      # 时间轴看板与排期命令
//! ├── pricing/       # 购物车算价
//! ├── checkout/      # 结账流程
//! └── utils/         # 错误、日志等工具
//! ```

pub mod api;
pub mod checkout;
pub mod core;
pub mod db;
pub mod pricing;
pub mod timeline;
pub mod utils;

// Re-export 公共类型
pub use checkout::CheckoutService;
pub use core::{Config, Server, ServerState};
pub use timeline::{TimelineBoard, TimelineService};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境: dotenv、工作目录、日志
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let logs_dir = config.logs_dir();
    init_logger_with_file(Some(&config.log_level), logs_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ____       _       __  ____            __
   / __ \_____(_)___  / /_/ __ \___  _____/ /__
  / /_/ / ___/ / __ \/ __/ / / / _ \/ ___/ //_/
 / ____/ /  / / / / / /_/ /_/ /  __(__  ) ,<
/_/   /_/  /_/_/ /_/\__/_____/\___/____/_/|_|
    "#
    );
}
