// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

#![cfg_attr(feature = "strict", deny(warnings))]
#![deny(clippy::all)]

//======================================================================================================================
// Modules
//======================================================================================================================

mod args;

//======================================================================================================================
// Imports
//======================================================================================================================

use anyhow::Result;
use args::ProgramArguments;
use catwheel::{
    runtime::logging,
    sleep_ms,
    Scheduler,
    Stopwatch,
    TaskWithState,
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// State owned by a counting task.
struct CounterState {
    /// Current count.
    count: u64,
    /// Count at which the task removes itself.
    count_to: u64,
    /// Delay injected by each invocation, in milliseconds.
    delay_ms: u64,
}

//======================================================================================================================
// Standalone Functions
//======================================================================================================================

/// Builds a task that counts up to `count_to`, one step per pass, then removes itself.
fn counter_task(count_to: u64, delay_ms: u64) -> TaskWithState<CounterState> {
    TaskWithState::new(
        format!("counter-to-{}", count_to),
        CounterState {
            count: 0,
            count_to,
            delay_ms,
        },
        Box::new(|scheduler, state| {
            if state.count >= state.count_to {
                println!("counting to {} ({}) done, removing self", state.count_to, state.count);
                scheduler
                    .remove_current()
                    .expect("a task may always remove itself from its own run hook");
                return;
            }
            state.count += 1;
            println!("counting to {} ({})", state.count_to, state.count);
            sleep_ms(state.delay_ms);
        }),
    )
}

/// Builds a task that counts upwards from zero and removes itself at `bound`.
fn increment_task(bound: u64, delay_ms: u64) -> TaskWithState<CounterState> {
    TaskWithState::new(
        "increment".to_string(),
        CounterState {
            count: 0,
            count_to: bound,
            delay_ms,
        },
        Box::new(|scheduler, state| {
            state.count += 1;
            println!("increment: {}/{}", state.count, state.count_to);
            sleep_ms(state.delay_ms);
            if state.count >= state.count_to {
                scheduler
                    .remove_current()
                    .expect("a task may always remove itself from its own run hook");
            }
        }),
    )
    .with_create(Box::new(|_, state| println!("increment: admitted (bound={})", state.count_to)))
    .with_cleanup(Box::new(|_, state| println!("increment: done at {}", state.count)))
}

/// Builds a task that counts downwards from `bound` and removes itself at zero.
fn decrement_task(bound: u64, delay_ms: u64) -> TaskWithState<CounterState> {
    TaskWithState::new(
        "decrement".to_string(),
        CounterState {
            count: bound,
            count_to: 0,
            delay_ms,
        },
        Box::new(|scheduler, state| {
            state.count -= 1;
            println!("decrement: {}", state.count);
            sleep_ms(state.delay_ms);
            if state.count == 0 {
                scheduler
                    .remove_current()
                    .expect("a task may always remove itself from its own run hook");
            }
        }),
    )
}

fn main() -> Result<()> {
    logging::initialize();

    let args: ProgramArguments = ProgramArguments::new(
        "counter",
        "Microsoft Corporation",
        "Demonstrates cooperative scheduling of self-removing counting tasks.",
    )?;

    let mut scheduler: Scheduler = Scheduler::new(args.capacity())?;

    // The classic wiring: three counters with staggered targets.
    for count_to in [4, 3, 2] {
        scheduler.insert_task(counter_task(count_to, args.delay_ms()))?;
    }

    // A sample pair counting in opposite directions.
    if args.bound() > 0 {
        scheduler.insert_task(increment_task(args.bound(), args.delay_ms()))?;
        scheduler.insert_task(decrement_task(args.bound(), args.delay_ms()))?;
    }

    let mut watch: Stopwatch = Stopwatch::default();
    watch.start();
    scheduler.run()?;
    watch.stop();

    println!(
        "all tasks drained in {} ({} passes)",
        watch.format_elapsed(),
        scheduler.num_passes()
    );

    if let Err((e, _)) = scheduler.destroy() {
        anyhow::bail!("cannot destroy scheduler: {:?}", e);
    }

    Ok(())
}
