// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

#[macro_use]
extern crate log;

//======================================================================================================================
// Exports
//======================================================================================================================

pub mod collections;
pub mod runtime;

pub use self::runtime::{
    fail::Fail,
    scheduler::{
        Scheduler,
        SlotId,
        Task,
        TaskWithState,
    },
    timer::{
        sleep_ms,
        Stopwatch,
    },
};

//======================================================================================================================
// Macros
//======================================================================================================================

/// Ensures that two expressions are equal. If they are not, this bails out of the calling function with an error that
/// prints both expressions. Use this in tests that return [anyhow::Result] instead of [assert_eq].
#[macro_export]
macro_rules! ensure_eq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if !(*left_val == *right_val) {
                    ::anyhow::bail!(
                        "ensure_eq failed: `{} == {}` (left: `{:?}`, right: `{:?}`)",
                        stringify!($left),
                        stringify!($right),
                        left_val,
                        right_val
                    );
                }
            },
        }
    }};
}

/// Ensures that two expressions are not equal. If they are, this bails out of the calling function with an error that
/// prints both expressions.
#[macro_export]
macro_rules! ensure_neq {
    ($left:expr, $right:expr) => {{
        match (&$left, &$right) {
            (left_val, right_val) => {
                if *left_val == *right_val {
                    ::anyhow::bail!(
                        "ensure_neq failed: `{} != {}` (left: `{:?}`, right: `{:?}`)",
                        stringify!($left),
                        stringify!($right),
                        left_val,
                        right_val
                    );
                }
            },
        }
    }};
}
