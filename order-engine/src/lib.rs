//! Order Engine - 餐厅订单进度与状态转换引擎
//!
//! # 架构概述
//!
//! 订单从下单到送达经过一条线性的生命周期，本引擎负责：
//!
//! - **订单命令** (`orders`): 事件溯源的命令处理、状态转换校验、进度推导
//! - **延迟送达** (`orders::dispatch`): 送餐后自动标记为已送达
//! - **通知** (`notifications`): 面向服务员、厨房、顾客的通知流
//! - **屏幕视图** (`views`): 厨房队列、服务员面板、顾客追踪
//! - **菜品目录** (`catalog`): 准备时间查询
//!
//! # 模块结构
//!
//! ```text
//! order-engine/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── orders/        # 订单事件溯源
//! ├── views/         # 屏幕视图模型
//! ├── utils/         # 日志
//! ├── catalog.rs     # 菜品目录
//! └── notifications.rs
//! ```

pub mod catalog;
pub mod core;
pub mod notifications;
pub mod orders;
pub mod utils;
pub mod views;

// Re-export 公共类型
pub use catalog::{CatalogService, DishLookup};
pub use crate::core::{BackgroundTasks, Config, EngineState, TaskKind};
pub use notifications::NotificationFeed;
pub use orders::{DeliveryScheduler, OrderStorage, OrdersManager};
pub use views::{KitchenQueue, OrderTracker, WaiterDashboard};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (可选)
/// 2. 从环境变量读取配置
/// 3. 初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();
    if let Some(dir) = config.log_dir.as_deref() {
        std::fs::create_dir_all(dir)?;
    }
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );

    tracing::debug!(dotenv_loaded, environment = %config.environment, "Environment ready");
    Ok(config)
}
