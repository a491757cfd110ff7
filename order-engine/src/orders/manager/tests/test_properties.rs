use super::*;
use crate::orders::progress::stage_completion;
use crate::orders::testing::order_with_items;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Validate,
    Advance(OrderStatus),
    Item(usize, KitchenState),
}

fn arb_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

fn arb_kitchen_state() -> impl Strategy<Value = KitchenState> {
    prop_oneof![
        Just(KitchenState::Queued),
        Just(KitchenState::Preparing),
        Just(KitchenState::Ready),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Validate),
        3 => arb_status().prop_map(Op::Advance),
        3 => (0usize..4, arb_kitchen_state()).prop_map(|(idx, state)| Op::Item(idx, state)),
    ]
}

fn arb_payment() -> impl Strategy<Value = PaymentMethod> {
    prop_oneof![
        Just(PaymentMethod::Cash),
        Just(PaymentMethod::Card),
        Just(PaymentMethod::DigitalWallet),
    ]
}

fn run_op(manager: &OrdersManager, order_id: &str, op: &Op) -> CommandResponse {
    match op {
        Op::Validate => validate_payment(manager, order_id),
        Op::Advance(target) => advance(manager, order_id, *target),
        Op::Item(idx, state) => set_item(manager, order_id, *idx, *state),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever commands arrive, the order only moves forward and the stored
    /// snapshot always equals the replayed event stream.
    #[test]
    fn prop_random_commands_keep_invariants(
        payment in arb_payment(),
        ops in prop::collection::vec(arb_op(), 1..40),
    ) {
        let manager = create_test_manager();
        let order_id = place_order(
            &manager,
            payment,
            vec![item("dish-a", 1, 5.0), item("dish-b", 2, 3.0), item("dish-c", 1, 1.5)],
        );
        let mut previous = manager.get_snapshot(&order_id).unwrap();

        for op in &ops {
            let resp = run_op(&manager, &order_id, op);
            let current = manager.get_snapshot(&order_id).unwrap();

            if !resp.success {
                prop_assert_eq!(&current, &previous);
            }
            prop_assert!(current.status >= previous.status);
            prop_assert!(current.payment_validated || !previous.payment_validated);
            for (stage, done) in stage_completion(&previous).iter() {
                if done {
                    prop_assert!(stage_completion(&current).is_completed(stage));
                }
            }
            for (before, after) in previous.items.iter().zip(&current.items) {
                prop_assert!(after.kitchen_state >= before.kitchen_state);
            }
            if current.is_delivered() {
                prop_assert!(legal_transitions(&current).is_empty());
            }
            previous = current;
        }

        prop_assert_eq!(manager.rebuild_snapshot(&order_id).unwrap(), previous);
    }

    /// An unvalidated order always sits at the payment gate
    #[test]
    fn prop_unvalidated_order_is_at_payment_gate(status in arb_status(), items in 0usize..4) {
        let lines: Vec<(&str, i32)> = std::iter::repeat_n(("dish-a", 1), items).collect();
        let order = order_with_items(status, false, &lines);
        prop_assert_eq!(current_stage(&order), Stage::PaymentValidated);
        prop_assert!(!stage_completion(&order).is_completed(Stage::Confirmed));
    }

    /// Completed stages form a prefix of the canonical order
    #[test]
    fn prop_completion_is_a_prefix(status in arb_status(), validated in any::<bool>()) {
        let order = order_with_items(status, validated, &[("dish-a", 1)]);
        let flags: Vec<bool> = stage_completion(&order).iter().map(|(_, done)| done).collect();
        let first_open = flags.iter().position(|done| !done).unwrap_or(flags.len());
        prop_assert!(flags[first_open..].iter().all(|done| !done));
    }
}
