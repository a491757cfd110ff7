//! Notification Model

use serde::{Deserialize, Serialize};

/// Who a notification is addressed to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recipient {
    Waiter,
    Kitchen,
    Customer,
}

/// Notification kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    /// 新订单待确认
    NewOrder,
    /// 现金待收款
    PaymentPending,
    /// 新的厨房工单
    KitchenTicket,
    /// 出餐完成，待上菜
    OrderReady,
    OrderDelivered,
}

/// Notification entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: String,
    pub order_id: String,
    pub recipient: Recipient,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    /// Unix millis
    pub created_at: i64,
}
