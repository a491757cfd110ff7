use std::sync::Arc;

use shared::models::Dish;
use shared::util::now_millis;

use crate::catalog::CatalogService;
use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::orders::{DeliveryScheduler, OrdersManager, RetentionWorker};
use crate::views::{KitchenQueue, OrderTracker, WaiterDashboard};

/// 引擎状态 - 持有所有服务的共享引用
///
/// 克隆成本低 (仅 Arc 引用计数)，可在任意屏幕处理器之间共享。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 引擎配置 |
/// | orders | 订单命令处理、快照、通知 |
/// | catalog | 菜品目录 (准备时间) |
#[derive(Clone, Debug)]
pub struct EngineState {
    pub config: Config,
    pub orders: Arc<OrdersManager>,
    pub catalog: Arc<CatalogService>,
}

impl EngineState {
    /// 初始化引擎状态
    pub fn initialize(config: &Config) -> Self {
        Self::with_catalog(config, CatalogService::new())
    }

    /// 使用预加载的菜品目录初始化
    pub fn with_catalog(config: &Config, catalog: CatalogService) -> Self {
        let orders = OrdersManager::new(config.event_channel_capacity);
        tracing::info!(
            epoch = %orders.epoch(),
            dishes = catalog.len(),
            "Order engine initialized"
        );
        Self {
            config: config.clone(),
            orders: Arc::new(orders),
            catalog: Arc::new(catalog),
        }
    }

    /// 启动后台任务
    ///
    /// | 任务 | 类型 | 说明 |
    /// |------|------|------|
    /// | delivery_scheduler | Listener | 送餐 → 已送达 延迟转换 |
    /// | order_retention | Periodic | 清理过期的已送达订单 |
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let scheduler = DeliveryScheduler::new(
            self.orders.clone(),
            self.config.delivery_delay(),
            tasks.shutdown_token(),
        );
        tasks.spawn("delivery_scheduler", TaskKind::Listener, scheduler.run());

        let retention = RetentionWorker::new(
            self.orders.clone(),
            self.config.retention(),
            self.config.retention_sweep_interval(),
            tasks.shutdown_token(),
        );
        tasks.spawn("order_retention", TaskKind::Periodic, retention.run());

        tasks.log_summary();
        tasks
    }

    /// 更新菜品目录 (菜单同步)
    pub fn sync_dishes(&self, dishes: impl IntoIterator<Item = Dish>) {
        for dish in dishes {
            self.catalog.upsert(dish);
        }
    }

    // ========== Screens ==========

    /// 厨房队列
    pub fn kitchen_queue(&self) -> KitchenQueue {
        self.kitchen_queue_at(now_millis())
    }

    pub fn kitchen_queue_at(&self, now: i64) -> KitchenQueue {
        KitchenQueue::build(&self.orders.active_orders(), now, self.catalog.as_ref())
    }

    /// 服务员面板
    pub fn waiter_dashboard(&self, waiter_id: i64) -> WaiterDashboard {
        self.waiter_dashboard_at(waiter_id, now_millis())
    }

    pub fn waiter_dashboard_at(&self, waiter_id: i64, now: i64) -> WaiterDashboard {
        WaiterDashboard::build(
            waiter_id,
            &self.orders.active_orders(),
            self.orders.notifications(),
            now,
        )
    }

    /// 顾客订单追踪，订单不存在时返回 None
    pub fn order_tracker(&self, order_id: &str) -> Option<OrderTracker> {
        self.order_tracker_at(order_id, now_millis())
    }

    pub fn order_tracker_at(&self, order_id: &str, now: i64) -> Option<OrderTracker> {
        self.orders
            .get_snapshot(order_id)
            .map(|order| OrderTracker::build(&order, now, self.catalog.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{OrderCommand, OrderCommandPayload, OrderItemInput, PaymentMethod};

    fn state() -> EngineState {
        EngineState::with_catalog(
            &Config::from_env(),
            CatalogService::with_dishes([Dish::new("ceviche", "Ceviche", 20)]),
        )
    }

    fn place(state: &EngineState, method: PaymentMethod) -> String {
        let cmd = OrderCommand::new(
            1,
            "Mesa".to_string(),
            OrderCommandPayload::PlaceOrder {
                table_id: 3,
                items: vec![OrderItemInput {
                    dish_id: "ceviche".to_string(),
                    name: "Ceviche".to_string(),
                    quantity: 1,
                    unit_price: 30.0,
                    notes: None,
                }],
                payment_method: method,
                notes: None,
                waiter_id: Some(9),
            },
        );
        let response = state.orders.execute_command(cmd);
        assert!(response.success);
        response.order_id.expect("order id")
    }

    #[test]
    fn test_screens_reflect_orders() {
        let state = state();
        let order_id = place(&state, PaymentMethod::Cash);

        let tracker = state.order_tracker(&order_id).expect("tracker");
        assert_eq!(tracker.order_id, order_id);

        let dashboard = state.waiter_dashboard(9);
        assert_eq!(dashboard.pending_cash_payments, vec![order_id]);

        // cash payment still pending, so nothing reaches the kitchen yet
        assert!(state.kitchen_queue().is_empty());
    }

    #[tokio::test]
    async fn test_background_tasks_registered() {
        let tasks = state().start_background_tasks();
        assert_eq!(tasks.count_by_kind(), (1, 1));
        assert_eq!(tasks.check_health(), 0);
        tasks.shutdown(std::time::Duration::from_secs(1)).await;
    }

    #[test]
    fn test_unknown_order_has_no_tracker() {
        assert!(state().order_tracker("missing").is_none());
    }

    #[test]
    fn test_sync_dishes() {
        let state = state();
        state.sync_dishes([Dish::new("causa", "Causa", 10)]);
        assert_eq!(state.catalog.len(), 2);
    }
}
