//! Property-based tests for argument decoding.
//!
//! Whatever subset of required arguments is dropped, or whichever one is
//! replaced by a value of the wrong type, the call must be rejected before
//! any driver is touched.

mod common;

use proptest::prelude::*;
use serde_json::Value;
use tr150_core::{CommandKind, FailureKind};

/// Commands that take at least one argument.
fn command_with_arguments() -> impl Strategy<Value = CommandKind> {
    prop::sample::select(
        CommandKind::ALL
            .into_iter()
            .filter(|kind| !kind.required_arguments().is_empty())
            .collect::<Vec<_>>(),
    )
}

/// Values that are the wrong type for every argument in the vocabulary:
/// no argument takes an object, and none accepts null.
fn wrong_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(serde_json::json!({})),
        Just(serde_json::json!({"value": 1})),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    /// Property: dropping any non-empty subset of required arguments yields
    /// InvalidArgument and zero driver calls.
    #[test]
    fn prop_missing_arguments_never_reach_driver(
        kind in command_with_arguments(),
        mask in any::<u16>(),
    ) {
        let required = kind.required_arguments();
        let dropped: Vec<&str> = required
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        prop_assume!(!dropped.is_empty());

        let mut call = common::valid_call(kind);
        for name in &dropped {
            call.arguments.remove(*name);
        }

        let (result, calls) = runtime().block_on(async {
            let (bridge, mocks) = common::start_bridge();
            let result = bridge.dispatch_call(&call).await;
            (result, common::driver_calls(&mocks).await)
        });

        let failure = result.failure().cloned();
        prop_assert!(failure.is_some());
        let failure = failure.unwrap();
        prop_assert_eq!(failure.kind, FailureKind::InvalidArgument);
        // The first dropped argument, in declaration order, is the one reported.
        prop_assert_eq!(failure.message, format!("{} missing or wrong type", dropped[0]));
        prop_assert!(calls.is_empty());
    }

    /// Property: a mistyped argument is rejected like a missing one.
    #[test]
    fn prop_mistyped_argument_never_reaches_driver(
        kind in command_with_arguments(),
        index in any::<prop::sample::Index>(),
        value in wrong_value(),
    ) {
        let required = kind.required_arguments();
        let name = required[index.index(required.len())];
        let call = common::valid_call(kind).arg(name, value);

        let (result, calls) = runtime().block_on(async {
            let (bridge, mocks) = common::start_bridge();
            let result = bridge.dispatch_call(&call).await;
            (result, common::driver_calls(&mocks).await)
        });

        prop_assert_eq!(result.failure_kind(), Some(FailureKind::InvalidArgument));
        prop_assert!(calls.is_empty());
    }

    /// Property: any name outside the vocabulary is Unimplemented.
    #[test]
    fn prop_unknown_names_unimplemented(method in "[a-zA-Z]{1,16}") {
        prop_assume!(method.parse::<CommandKind>().is_err());

        let call = tr150_bridge::MethodCall::new(method);
        let (result, calls) = runtime().block_on(async {
            let (bridge, mocks) = common::start_bridge();
            let result = bridge.dispatch_call(&call).await;
            (result, common::driver_calls(&mocks).await)
        });

        prop_assert_eq!(result.failure_kind(), Some(FailureKind::Unimplemented));
        prop_assert!(calls.is_empty());
    }
}
