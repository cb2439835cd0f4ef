// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

//======================================================================================================================
// Modules
//======================================================================================================================

mod destroy;
mod remove;

//======================================================================================================================
// Imports
//======================================================================================================================

use anyhow::Result;
use catwheel::{
    Scheduler,
    TaskWithState,
};
use std::{
    cell::Cell,
    rc::Rc,
};

//======================================================================================================================
// Macros
//======================================================================================================================

/// Runs a test and prints if it passed or failed on the standard output.
#[macro_export]
macro_rules! test {
    ($fn_name:ident($($arg:expr),*)) => {{
        match $fn_name($($arg),*) {
            Ok(ok) =>
                vec![(stringify!($fn_name).to_string(), "passed".to_string(), Ok(ok))],
            Err(err) =>
                vec![(stringify!($fn_name).to_string(), "failed".to_string(), Err(err))],
        }
    }};
}

/// Collects the result of a test and appends it to a vector.
#[macro_export]
macro_rules! collect {
    ($vec:ident, $expr:expr) => {
        $vec.append(&mut $expr);
    };
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Builds a task that increments a shared counter on every invocation and removes itself once the
/// counter reaches `target`.
pub fn counting_task(name: &str, target: usize, count: Rc<Cell<usize>>) -> TaskWithState<Rc<Cell<usize>>> {
    TaskWithState::new(
        name.to_string(),
        count,
        Box::new(move |scheduler: &mut Scheduler, count: &mut Rc<Cell<usize>>| {
            count.set(count.get() + 1);
            if count.get() >= target {
                scheduler
                    .remove_current()
                    .expect("removal from within run() should succeed");
            }
        }),
    )
}

fn main() -> Result<()> {
    let mut nfailed: usize = 0;
    let mut result: Vec<(String, String, Result<(), anyhow::Error>)> = Vec::new();

    collect!(result, insert::run());
    collect!(result, run_loop::run());
    collect!(result, remove::run());
    collect!(result, destroy::run());

    // Dump results.
    for (test_name, test_status, test_result) in result {
        println!("[{}] {}", test_status, test_name);
        if let Err(e) = test_result {
            nfailed += 1;
            println!("    {}", e);
        }
    }

    if nfailed > 0 {
        anyhow::bail!("{} tests failed", nfailed);
    } else {
        println!("all tests passed");
        Ok(())
    }
}
