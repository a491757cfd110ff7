use std::time::Duration;

/// 引擎配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (unset) | 滚动日志目录，未设置时只输出到终端 |
/// | LOG_JSON | false | JSON 格式日志 |
/// | DELIVERY_DELAY_MS | 3000 | 送餐 → 已送达 的延迟(毫秒) |
/// | EVENT_CHANNEL_CAPACITY | 4096 | 事件广播通道容量 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 后台任务关闭超时(毫秒) |
/// | RETENTION_MINUTES | 240 | 已送达订单保留时间(分钟) |
/// | RETENTION_SWEEP_SECS | 60 | 清理间隔(秒) |
///
/// # 示例
///
/// ```ignore
/// DELIVERY_DELAY_MS=5000 LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
    /// Courier → Delivered 自动转换延迟 (毫秒)
    pub delivery_delay_ms: u64,
    pub event_channel_capacity: usize,
    /// 关闭超时时间 (毫秒)
    pub shutdown_timeout_ms: u64,
    /// 已送达订单保留时间 (分钟)
    pub retention_minutes: u64,
    pub retention_sweep_secs: u64,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            delivery_delay_ms: std::env::var("DELIVERY_DELAY_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            event_channel_capacity: std::env::var("EVENT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(4096),
            shutdown_timeout_ms: std::env::var("SHUTDOWN_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(10000),
            retention_minutes: std::env::var("RETENTION_MINUTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(240),
            retention_sweep_secs: std::env::var("RETENTION_SWEEP_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(60),
        }
    }

    /// 覆盖送餐延迟
    ///
    /// 常用于测试场景
    pub fn with_delivery_delay(mut self, delay_ms: u64) -> Self {
        self.delivery_delay_ms = delay_ms;
        self
    }

    pub fn delivery_delay(&self) -> Duration {
        Duration::from_millis(self.delivery_delay_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_minutes.saturating_mul(60))
    }

    pub fn retention_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.retention_sweep_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_delivery_delay() {
        let config = Config::from_env().with_delivery_delay(250);
        assert_eq!(config.delivery_delay(), Duration::from_millis(250));
        assert!(config.event_channel_capacity > 0);
        assert!(config.retention_sweep_interval() > Duration::ZERO);
    }
}
