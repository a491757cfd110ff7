//! 核心模块 - 引擎配置、状态和后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置
//! - [`EngineState`] - 引擎状态
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::EngineState;
pub use tasks::{BackgroundTasks, TaskKind};
