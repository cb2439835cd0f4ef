// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::counting_task;
use anyhow::Result;
use catwheel::Scheduler;
use std::{
    cell::Cell,
    rc::Rc,
};

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Drives integration tests for scheduler destruction.
pub fn run() -> Vec<(String, String, Result<(), anyhow::Error>)> {
    let mut result: Vec<(String, String, Result<(), anyhow::Error>)> = Vec::new();

    crate::collect!(result, crate::test!(destroy_fails_until_registry_drains()));

    result
}

/// Attempts to destroy a scheduler that still has registered tasks, then drains it and destroys
/// it for real.
fn destroy_fails_until_registry_drains() -> Result<()> {
    println!("{}", stringify!(destroy_fails_until_registry_drains));

    let mut scheduler: Scheduler = Scheduler::new(1)?;
    let count: Rc<Cell<usize>> = Rc::new(Cell::new(0));

    scheduler.insert_task(counting_task("resident", 1, count.clone()))?;

    // Fail to destroy; the intact scheduler is handed back.
    let mut scheduler: Scheduler = match scheduler.destroy() {
        Err((e, scheduler)) => {
            assert_eq!(e.errno, libc::EBUSY, "destroy() failed with {}", e.cause);
            scheduler
        },
        Ok(()) => anyhow::bail!("destroy() on a busy scheduler should fail"),
    };
    assert_eq!(scheduler.num_tasks(), 1, "failed destruction must not change the registry");

    // Succeed to destroy once the registry has drained.
    scheduler.run()?;
    if let Err((e, _)) = scheduler.destroy() {
        anyhow::bail!("destroy() on a drained scheduler should succeed (error={:?})", e);
    }

    Ok(())
}
