// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::counting_task;
use anyhow::Result;
use catwheel::{
    Scheduler,
    SlotId,
    TaskWithState,
};
use std::{
    cell::Cell,
    rc::Rc,
};

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Drives integration tests for the self-removal protocol.
pub fn run() -> Vec<(String, String, Result<(), anyhow::Error>)> {
    let mut result: Vec<(String, String, Result<(), anyhow::Error>)> = Vec::new();

    crate::collect!(result, crate::test!(remove_current_outside_run_fails()));
    crate::collect!(result, crate::test!(cleanup_runs_exactly_once_at_removal()));
    crate::collect!(result, crate::test!(released_slot_is_reused_without_perturbing_survivors()));

    result
}

/// Attempts to remove the current task while no task invocation is in progress.
fn remove_current_outside_run_fails() -> Result<()> {
    println!("{}", stringify!(remove_current_outside_run_fails));

    let mut scheduler: Scheduler = Scheduler::new(2)?;
    let count: Rc<Cell<usize>> = Rc::new(Cell::new(0));

    scheduler.insert_task(counting_task("resident", 1, count.clone()))?;

    // Fail to remove.
    let e = scheduler
        .remove_current()
        .expect_err("remove_current() outside of run() should fail");

    // Sanity check error code and registry state.
    assert_eq!(e.errno, libc::EPERM, "remove_current() failed with {}", e.cause);
    assert_eq!(scheduler.num_tasks(), 1, "failed removal must not change the registry");
    assert_eq!(scheduler.current_slot(), None, "no slot should be marked current");

    scheduler.run()?;

    Ok(())
}

/// Checks that the cleanup hook runs exactly once, at the moment of removal, against the same
/// state every prior hook saw.
fn cleanup_runs_exactly_once_at_removal() -> Result<()> {
    println!("{}", stringify!(cleanup_runs_exactly_once_at_removal));

    let mut scheduler: Scheduler = Scheduler::new(1)?;
    let cleanups: Rc<Cell<usize>> = Rc::new(Cell::new(0));
    let observed: Rc<Cell<usize>> = Rc::new(Cell::new(0));

    let hook_cleanups: Rc<Cell<usize>> = cleanups.clone();
    let hook_observed: Rc<Cell<usize>> = observed.clone();
    let task: TaskWithState<Rc<Cell<usize>>> = counting_task("stateful", 3, Rc::new(Cell::new(0))).with_cleanup(
        Box::new(move |_, state| {
            hook_cleanups.set(hook_cleanups.get() + 1);
            hook_observed.set(state.get());
        }),
    );

    scheduler.insert_task(task)?;
    scheduler.run()?;

    assert_eq!(cleanups.get(), 1, "cleanup should run exactly once");
    assert_eq!(observed.get(), 3, "cleanup should see the state left behind by run()");

    Ok(())
}

/// Removes a task, inserts a replacement into its vacated slot, and checks that a surviving task
/// is unaffected by the reuse.
fn released_slot_is_reused_without_perturbing_survivors() -> Result<()> {
    println!("{}", stringify!(released_slot_is_reused_without_perturbing_survivors));

    let mut scheduler: Scheduler = Scheduler::new(3)?;
    let a_runs: Rc<Cell<usize>> = Rc::new(Cell::new(0));
    let b_runs: Rc<Cell<usize>> = Rc::new(Cell::new(0));
    let c_runs: Rc<Cell<usize>> = Rc::new(Cell::new(0));
    let c_slot: Rc<Cell<Option<SlotId>>> = Rc::new(Cell::new(None));

    // Task a removes itself on its second invocation, task b on its fifth.
    let slot_a: SlotId = scheduler.insert_task(counting_task("a", 2, a_runs.clone()))?;

    let hook_c_runs: Rc<Cell<usize>> = c_runs.clone();
    let hook_c_slot: Rc<Cell<Option<SlotId>>> = c_slot.clone();
    let task_b: TaskWithState<Rc<Cell<usize>>> = TaskWithState::new(
        "b".to_string(),
        b_runs.clone(),
        Box::new(move |scheduler, runs| {
            runs.set(runs.get() + 1);
            if runs.get() == 3 {
                // Task a has drained by now; c must land in its vacated slot.
                let slot: SlotId = scheduler
                    .insert_task(counting_task("c", 2, hook_c_runs.clone()))
                    .expect("registry should have a vacant slot");
                hook_c_slot.set(Some(slot));
            }
            if runs.get() >= 5 {
                scheduler
                    .remove_current()
                    .expect("removal from within run() should succeed");
            }
        }),
    );
    scheduler.insert_task(task_b)?;

    scheduler.run()?;

    assert_eq!(c_slot.get(), Some(slot_a), "task c should reuse the slot vacated by task a");
    assert_eq!(a_runs.get(), 2, "task a should have been invoked twice");
    assert_eq!(b_runs.get(), 5, "slot reuse must not perturb task b");
    assert_eq!(c_runs.get(), 2, "task c should have been invoked twice");
    assert_eq!(scheduler.num_tasks(), 0, "registry should have drained");

    Ok(())
}
