//! 后台任务管理
//!
//! 统一管理所有后台任务的注册、启动和关闭。
//!
//! # 任务类型
//!
//! - [`TaskKind::Listener`] - 事件监听器 (如 `DeliveryScheduler`)
//! - [`TaskKind::Periodic`] - 定时任务 (如 `RetentionWorker`)

use futures::FutureExt;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// 事件监听器
    Listener,
    /// 定时任务
    Periodic,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Listener => write!(f, "Listener"),
            TaskKind::Periodic => write!(f, "Periodic"),
        }
    }
}

/// 已注册的后台任务
struct RegisteredTask {
    name: &'static str,
    kind: TaskKind,
    handle: JoinHandle<()>,
}

/// 后台任务管理器
///
/// ```ignore
/// let mut tasks = BackgroundTasks::new();
///
/// let scheduler = DeliveryScheduler::new(manager, delay, tasks.shutdown_token());
/// tasks.spawn("delivery_scheduler", TaskKind::Listener, scheduler.run());
///
/// // Graceful shutdown
/// tasks.shutdown(Duration::from_secs(10)).await;
/// ```
pub struct BackgroundTasks {
    tasks: Vec<RegisteredTask>,
    /// 全局取消令牌
    shutdown: CancellationToken,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            shutdown: CancellationToken::new(),
        }
    }

    /// 获取取消令牌（用于任务内部监听 shutdown 信号）
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 注册并启动一个后台任务
    ///
    /// 任务会被包装以捕获 panic，如果任务异常退出会记录错误日志。
    pub fn spawn<F>(&mut self, name: &'static str, kind: TaskKind, future: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let shutdown = self.shutdown.clone();
        let wrapped_future = async move {
            let result: Result<(), Box<dyn std::any::Any + Send>> =
                AssertUnwindSafe(future).catch_unwind().await;
            match result {
                Ok(()) => {
                    if !shutdown.is_cancelled() {
                        tracing::warn!(task = %name, kind = %kind, "Background task completed unexpectedly");
                    }
                }
                Err(panic_info) => {
                    let panic_msg: String = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(
                        task = %name,
                        kind = %kind,
                        panic = %panic_msg,
                        "Background task panicked! This is a bug that should be reported."
                    );
                }
            }
        };

        let handle = tokio::spawn(wrapped_future);
        tracing::debug!(task = %name, kind = %kind, "Registered background task");
        self.tasks.push(RegisteredTask { name, kind, handle });
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// 按类型统计任务数量 (listener, periodic)
    pub fn count_by_kind(&self) -> (usize, usize) {
        let mut listener = 0;
        let mut periodic = 0;

        for task in &self.tasks {
            match task.kind {
                TaskKind::Listener => listener += 1,
                TaskKind::Periodic => periodic += 1,
            }
        }

        (listener, periodic)
    }

    pub fn log_summary(&self) {
        let (listener, periodic) = self.count_by_kind();
        tracing::info!(
            "Background tasks registered: {} total (Listener: {}, Periodic: {})",
            self.tasks.len(),
            listener,
            periodic
        );
    }

    /// 检查所有任务健康状态
    ///
    /// 返回已经终止的任务数量。
    pub fn check_health(&self) -> usize {
        let mut failed_count = 0;
        for task in &self.tasks {
            if task.handle.is_finished() {
                tracing::error!(
                    task = %task.name,
                    kind = %task.kind,
                    "Background task unexpectedly finished! This may indicate a panic or error."
                );
                failed_count += 1;
            }
        }
        failed_count
    }

    /// Graceful shutdown - 取消所有任务并等待完成
    ///
    /// 超时后仍未退出的任务会被 abort。
    pub async fn shutdown(self, timeout: Duration) {
        tracing::info!("Shutting down {} background tasks...", self.tasks.len());

        self.shutdown.cancel();

        let deadline = tokio::time::Instant::now() + timeout;
        for task in self.tasks {
            let abort = task.handle.abort_handle();
            match tokio::time::timeout_at(deadline, task.handle).await {
                Ok(Ok(())) => {
                    tracing::debug!(task = %task.name, "Task completed");
                }
                Ok(Err(e)) if e.is_cancelled() => {
                    tracing::debug!(task = %task.name, "Task cancelled");
                }
                Ok(Err(e)) => {
                    tracing::error!(task = %task.name, error = ?e, "Task panicked");
                }
                Err(_) => {
                    tracing::warn!(task = %task.name, "Task did not stop in time, aborting");
                    abort.abort();
                }
            }
        }

        tracing::info!("All background tasks stopped");
    }
}

impl Default for BackgroundTasks {
    fn default() -> Self {
        Self::new()
    }
}
