//! 订单生命周期集成测试
//!
//! 使用 EngineState::initialize 完整初始化，并启动真实的 DeliveryScheduler

use order_engine::{CatalogService, Config, EngineState};
use shared::models::{Dish, Recipient};
use shared::order::{
    KitchenState, OrderCommand, OrderCommandPayload, OrderItemInput, OrderStatus, PaymentMethod,
    Stage,
};
use std::time::Duration;

const DELIVERY_DELAY_MS: u64 = 100;

fn engine() -> EngineState {
    let config = Config::from_env().with_delivery_delay(DELIVERY_DELAY_MS);
    EngineState::with_catalog(
        &config,
        CatalogService::with_dishes([
            Dish::new("lomo", "Lomo saltado", 25),
            Dish::new("chicha", "Chicha morada", 2),
        ]),
    )
}

fn run(state: &EngineState, operator_id: i64, payload: OrderCommandPayload) {
    let response = state
        .orders
        .execute_command(OrderCommand::new(operator_id, "Staff".to_string(), payload));
    assert!(response.success, "command failed: {:?}", response.error);
}

fn place_cash_order(state: &EngineState) -> String {
    let response = state.orders.execute_command(OrderCommand::new(
        0,
        "Table 4".to_string(),
        OrderCommandPayload::PlaceOrder {
            table_id: 4,
            items: vec![
                OrderItemInput {
                    dish_id: "lomo".to_string(),
                    name: "Lomo saltado".to_string(),
                    quantity: 1,
                    unit_price: 32.0,
                    notes: None,
                },
                OrderItemInput {
                    dish_id: "chicha".to_string(),
                    name: "Chicha morada".to_string(),
                    quantity: 2,
                    unit_price: 6.5,
                    notes: Some("sin hielo".to_string()),
                },
            ],
            payment_method: PaymentMethod::Cash,
            notes: None,
            waiter_id: Some(11),
        },
    ));
    assert!(response.success, "PlaceOrder failed: {:?}", response.error);
    response.order_id.expect("PlaceOrder returns the order id")
}

/// Take an order through payment, kitchen and pickup
fn hand_to_courier(state: &EngineState, order_id: &str) {
    run(state, 11, OrderCommandPayload::ValidatePayment { order_id: order_id.to_string() });
    run(state, 11, OrderCommandPayload::AdvanceStatus {
        order_id: order_id.to_string(),
        target: OrderStatus::Confirmed,
    });
    for item_index in 0..2 {
        for to in [KitchenState::Preparing, KitchenState::Ready] {
            run(state, 20, OrderCommandPayload::UpdateItemState {
                order_id: order_id.to_string(),
                item_index,
                state: to,
            });
        }
    }
    run(state, 20, OrderCommandPayload::AdvanceStatus {
        order_id: order_id.to_string(),
        target: OrderStatus::Ready,
    });
    run(state, 11, OrderCommandPayload::AdvanceStatus {
        order_id: order_id.to_string(),
        target: OrderStatus::CourierEnroute,
    });
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_order_is_delivered_after_delay() {
    let state = engine();
    let tasks = state.start_background_tasks();
    // let the scheduler reach its receive loop
    tokio::time::sleep(Duration::from_millis(20)).await;

    let order_id = place_cash_order(&state);
    assert_eq!(state.orders.get_snapshot(&order_id).unwrap().total, 45.0);

    hand_to_courier(&state, &order_id);
    assert_eq!(
        state.orders.get_snapshot(&order_id).unwrap().status,
        OrderStatus::CourierEnroute
    );

    tokio::time::sleep(Duration::from_millis(DELIVERY_DELAY_MS * 4)).await;

    let delivered = state.orders.get_snapshot(&order_id).unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert!(delivered.stage_timestamps.contains_key(&Stage::Delivered));
    assert!(!state.orders.delivery_timers().is_armed(&order_id));

    let tracker = state.order_tracker(&order_id).unwrap();
    assert_eq!(tracker.progress_percent, 100.0);
    assert!(state.waiter_dashboard(11).orders.is_empty());

    let customer = state.orders.notifications().list(Recipient::Customer, None);
    assert!(!customer.is_empty());

    tasks.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_sync_back_to_ready_suppresses_delivery() {
    let state = engine();
    let tasks = state.start_background_tasks();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let order_id = place_cash_order(&state);
    hand_to_courier(&state, &order_id);

    // wait for the scheduler to arm the countdown
    tokio::time::sleep(Duration::from_millis(20)).await;

    let mut reset = state.orders.get_snapshot(&order_id).unwrap();
    reset.status = OrderStatus::Ready;
    state.orders.sync_snapshot(reset);

    tokio::time::sleep(Duration::from_millis(DELIVERY_DELAY_MS * 4)).await;

    assert_eq!(
        state.orders.get_snapshot(&order_id).unwrap().status,
        OrderStatus::Ready
    );

    tasks.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_order_synced_enroute_is_delivered() {
    let state = engine();
    let tasks = state.start_background_tasks();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let order_id = place_cash_order(&state);
    let mut synced = state.orders.get_snapshot(&order_id).unwrap();
    synced.payment_validated = true;
    synced.status = OrderStatus::CourierEnroute;
    state.orders.sync_snapshot(synced);

    tokio::time::sleep(Duration::from_millis(DELIVERY_DELAY_MS * 4)).await;

    assert_eq!(
        state.orders.get_snapshot(&order_id).unwrap().status,
        OrderStatus::Delivered
    );

    tasks.shutdown(Duration::from_secs(1)).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_kitchen_queue_follows_order() {
    let state = engine();

    let order_id = place_cash_order(&state);
    assert!(state.kitchen_queue().is_empty());

    run(&state, 11, OrderCommandPayload::ValidatePayment { order_id: order_id.clone() });
    run(&state, 11, OrderCommandPayload::AdvanceStatus {
        order_id: order_id.clone(),
        target: OrderStatus::Confirmed,
    });

    let queue = state.kitchen_queue();
    assert_eq!(queue.tickets.len(), 1);
    assert_eq!(queue.tickets[0].order_id, order_id);

    run(&state, 20, OrderCommandPayload::UpdateItemState {
        order_id: order_id.clone(),
        item_index: 0,
        state: KitchenState::Preparing,
    });
    assert_eq!(
        state.orders.get_snapshot(&order_id).unwrap().status,
        OrderStatus::Preparing
    );
}
