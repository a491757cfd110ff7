//! Order lifecycle stages
//!
//! Two closely related enumerations live here:
//!
//! - [`OrderStatus`]: the value actually stored on an order.
//! - [`Stage`]: the canonical progress sequence shown to users. It contains
//!   every status plus the `PaymentValidated` gate, which is derived from the
//!   payment flag and never stored.
//!
//! ```text
//! New → PaymentValidated → Confirmed → Preparing → Ready → CourierEnroute → Delivered
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stored order status
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// 顾客刚下单
    #[default]
    New,
    /// 服务员确认并送往厨房
    Confirmed,
    /// 厨房开始制作（第一道菜开始时自动进入）
    Preparing,
    /// 全部菜品完成
    Ready,
    /// 服务员送餐途中
    CourierEnroute,
    /// 已送达 - 终态
    Delivered,
}

impl OrderStatus {
    /// All statuses in lifecycle order
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::New,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::CourierEnroute,
        OrderStatus::Delivered,
    ];

    /// The status that directly follows this one, `None` for the terminal status
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::New => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::CourierEnroute),
            OrderStatus::CourierEnroute => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Delivered
    }

    /// Canonical stage this status occupies
    pub fn stage(self) -> Stage {
        match self {
            OrderStatus::New => Stage::New,
            OrderStatus::Confirmed => Stage::Confirmed,
            OrderStatus::Preparing => Stage::Preparing,
            OrderStatus::Ready => Stage::Ready,
            OrderStatus::CourierEnroute => Stage::CourierEnroute,
            OrderStatus::Delivered => Stage::Delivered,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::CourierEnroute => "COURIER_ENROUTE",
            OrderStatus::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl From<OrderStatus> for Stage {
    fn from(status: OrderStatus) -> Self {
        status.stage()
    }
}

/// Canonical progress stage
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    New,
    /// Payment gate (derived, never stored)
    PaymentValidated,
    Confirmed,
    Preparing,
    Ready,
    CourierEnroute,
    Delivered,
}

impl Stage {
    /// Stages in canonical order
    pub const CANONICAL: [Stage; 7] = [
        Stage::New,
        Stage::PaymentValidated,
        Stage::Confirmed,
        Stage::Preparing,
        Stage::Ready,
        Stage::CourierEnroute,
        Stage::Delivered,
    ];

    /// Zero-based position in [`Stage::CANONICAL`]
    pub fn position(self) -> usize {
        match self {
            Stage::New => 0,
            Stage::PaymentValidated => 1,
            Stage::Confirmed => 2,
            Stage::Preparing => 3,
            Stage::Ready => 4,
            Stage::CourierEnroute => 5,
            Stage::Delivered => 6,
        }
    }

    /// Display metadata for this stage
    pub fn info(self) -> &'static StageInfo {
        &STAGE_INFO[self.position()]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::New => "NEW",
            Stage::PaymentValidated => "PAYMENT_VALIDATED",
            Stage::Confirmed => "CONFIRMED",
            Stage::Preparing => "PREPARING",
            Stage::Ready => "READY",
            Stage::CourierEnroute => "COURIER_ENROUTE",
            Stage::Delivered => "DELIVERED",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display metadata for one stage
///
/// `icon` and `color` are keys, front-ends map them to their own assets.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StageInfo {
    pub stage: Stage,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// Canonical stage → display mapping, indexed by [`Stage::position`]
pub static STAGE_INFO: [StageInfo; 7] = [
    StageInfo {
        stage: Stage::New,
        label: "Order received",
        icon: "check-circle",
        color: "blue",
        description: "Your order has been received and registered",
    },
    StageInfo {
        stage: Stage::PaymentValidated,
        label: "Payment confirmed",
        icon: "credit-card",
        color: "orange",
        description: "Payment has been confirmed",
    },
    StageInfo {
        stage: Stage::Confirmed,
        label: "Confirmed by waiter",
        icon: "clipboard-check",
        color: "orange",
        description: "The waiter confirmed your order and sent it to the kitchen",
    },
    StageInfo {
        stage: Stage::Preparing,
        label: "Preparing",
        icon: "chef-hat",
        color: "yellow",
        description: "Our chefs are preparing your food",
    },
    StageInfo {
        stage: Stage::Ready,
        label: "Ready to serve",
        icon: "star",
        color: "green",
        description: "Your order is ready",
    },
    StageInfo {
        stage: Stage::CourierEnroute,
        label: "Waiter on the way",
        icon: "truck",
        color: "blue",
        description: "The waiter is bringing your order to the table",
    },
    StageInfo {
        stage: Stage::Delivered,
        label: "Delivered",
        icon: "party",
        color: "green",
        description: "Enjoy your meal!",
    },
];

/// An action that can move an order forward
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "type", content = "target", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Transition {
    /// Clears the payment gate, leaves `status` untouched
    ValidatePayment,
    /// Moves `status` to the given value
    Advance(OrderStatus),
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::ValidatePayment => f.write_str("VALIDATE_PAYMENT"),
            Transition::Advance(status) => write!(f, "{}", status),
        }
    }
}

/// Per-item kitchen state
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KitchenState {
    #[default]
    Queued,
    Preparing,
    Ready,
}

impl KitchenState {
    pub fn next(self) -> Option<KitchenState> {
        match self {
            KitchenState::Queued => Some(KitchenState::Preparing),
            KitchenState::Preparing => Some(KitchenState::Ready),
            KitchenState::Ready => None,
        }
    }
}

impl fmt::Display for KitchenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KitchenState::Queued => f.write_str("QUEUED"),
            KitchenState::Preparing => f.write_str("PREPARING"),
            KitchenState::Ready => f.write_str("READY"),
        }
    }
}

/// Payment method chosen by the customer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// 现金 - 需服务员人工确认
    #[default]
    Cash,
    Card,
    DigitalWallet,
}

impl PaymentMethod {
    pub fn is_cash(self) -> bool {
        self == PaymentMethod::Cash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_info_table_is_indexed_by_position() {
        for stage in Stage::CANONICAL {
            assert_eq!(stage.info().stage, stage);
        }
    }

    #[test]
    fn test_canonical_positions_are_sequential() {
        for (idx, stage) in Stage::CANONICAL.iter().enumerate() {
            assert_eq!(stage.position(), idx);
        }
    }

    #[test]
    fn test_status_stage_order_matches_canonical_order() {
        let positions: Vec<usize> = OrderStatus::ALL.iter().map(|s| s.stage().position()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_next_walks_lifecycle() {
        let mut status = OrderStatus::New;
        let mut walked = vec![status];
        while let Some(next) = status.next() {
            walked.push(next);
            status = next;
        }
        assert_eq!(walked, OrderStatus::ALL.to_vec());
        assert!(status.is_terminal());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("courier_enroute".parse::<OrderStatus>(), Ok(OrderStatus::CourierEnroute));
        assert_eq!("READY".parse::<OrderStatus>(), Ok(OrderStatus::Ready));
        assert!("served".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_status_serde_format() {
        let json = serde_json::to_string(&OrderStatus::CourierEnroute).unwrap();
        assert_eq!(json, "\"COURIER_ENROUTE\"");
        let transition = serde_json::to_value(Transition::Advance(OrderStatus::Ready)).unwrap();
        assert_eq!(transition["type"], "ADVANCE");
        assert_eq!(transition["target"], "READY");
    }

    #[test]
    fn test_kitchen_state_no_skip() {
        assert_eq!(KitchenState::Queued.next(), Some(KitchenState::Preparing));
        assert_eq!(KitchenState::Preparing.next(), Some(KitchenState::Ready));
        assert_eq!(KitchenState::Ready.next(), None);
    }
}
