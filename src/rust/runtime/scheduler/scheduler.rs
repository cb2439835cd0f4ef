// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Implementation of our cooperative, single-threaded task scheduler.
//!
//! The scheduler stores tasks in a fixed-capacity [SlotArray] and sweeps it in rounds, invoking
//! the run hook of every registered task once per pass, until every task has removed itself. A
//! task may deregister only from within its own run hook, by calling
//! [Scheduler::remove_current]; the scheduler never evicts a task on its own.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::{
    collections::slot_array::SlotArray,
    runtime::{
        fail::Fail,
        scheduler::task::{
            SlotId,
            Task,
        },
        timer::Stopwatch,
    },
};

//======================================================================================================================
// Structures
//======================================================================================================================

/// Task Scheduler
pub struct Scheduler {
    /// Slot registry. Stores all the tasks that are held by the scheduler.
    slots: SlotArray<Box<dyn Task>>,
    /// Slot whose task is currently executing a hook. Set only for the duration of one run hook
    /// invocation; [Scheduler::remove_current] resolves this index for O(1) self-removal.
    current: Option<SlotId>,
    /// Set when the current task has requested removal; consumed by the run loop when the hook
    /// returns.
    reap_current: bool,
    /// Number of passes swept since construction. An explicit per-instance counter; there is no
    /// process-wide scheduling state.
    passes: u64,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

impl Scheduler {
    /// Creates a scheduler with a slot registry of the given fixed capacity. Fails only when the
    /// registry cannot be allocated.
    pub fn new(capacity: usize) -> Result<Self, Fail> {
        Ok(Self {
            slots: SlotArray::new(capacity)?,
            current: None,
            reap_current: false,
            passes: 0,
        })
    }

    /// Returns the fixed capacity of the slot registry.
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Returns the number of registered tasks.
    pub fn num_tasks(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of passes swept so far.
    pub fn num_passes(&self) -> u64 {
        self.passes
    }

    /// Returns the slot of the task whose hook is currently executing, if any.
    pub fn current_slot(&self) -> Option<SlotId> {
        self.current
    }

    /// Inserts a task into the first vacant slot, scanning in ascending index order, and returns
    /// the slot it occupies. Ownership of the task and its state transfers to the scheduler. The
    /// task's create hook runs exactly once, before this function returns and therefore before
    /// the task's first run hook invocation.
    ///
    /// Fails with `EINVAL` if the task carries no run hook and with `EAGAIN` if the registry is
    /// full; a failed insertion leaves the registry unchanged.
    pub fn insert_task<T: Task>(&mut self, task: T) -> Result<SlotId, Fail> {
        if !task.has_run_hook() {
            let cause: String = format!("task has no run hook (name={:?})", task.get_name());
            error!("insert_task(): {}", cause);
            return Err(Fail::new(libc::EINVAL, &cause));
        }
        // Claim the slot before running the create hook: the hook receives the scheduler and may
        // insert further tasks, which must not steal this index.
        let index: usize = match self.slots.claim() {
            Some(index) => index,
            None => {
                let cause: String = format!("slot registry is full (capacity={})", self.slots.capacity());
                error!("insert_task(): {}", cause);
                return Err(Fail::new(libc::EAGAIN, &cause));
            },
        };

        let mut task: Box<dyn Task> = Box::new(task);
        task.create(self);
        trace!("insert_task(): name={:?}, slot={}", task.get_name(), index);
        self.slots.attach(index, task);
        Ok(SlotId(index))
    }

    /// Runs registered tasks to completion. Each pass visits every slot in ascending index
    /// order, invoking the run hook of each registered task; the loop returns once every task
    /// has removed itself. There is no other exit condition and no timeout: a task that never
    /// removes itself runs forever.
    ///
    /// A task inserted from within a running task's hook joins the pass already in progress if
    /// its slot index is greater than the inserting task's index; otherwise its first invocation
    /// happens in the next pass.
    ///
    /// Fails with `EPERM` if no tasks are registered, or if called from within a task hook.
    pub fn run(&mut self) -> Result<(), Fail> {
        if self.current.is_some() {
            let cause: &str = "cannot enter the run loop from within a task invocation";
            error!("run(): {}", cause);
            return Err(Fail::new(libc::EPERM, cause));
        }
        if self.slots.is_empty() {
            let cause: &str = "no tasks are registered";
            error!("run(): {}", cause);
            return Err(Fail::new(libc::EPERM, cause));
        }

        let mut watch: Stopwatch = Stopwatch::default();
        while !self.slots.is_empty() {
            self.passes += 1;
            trace!("run(): pass {} ({} registered tasks)", self.passes, self.slots.len());
            watch.start();
            for index in 0..self.slots.capacity() {
                let mut task: Box<dyn Task> = match self.slots.detach(index) {
                    Some(task) => task,
                    None => continue,
                };
                // Defensive: insert_task() rejects these, so no slot should ever hold one.
                if !task.has_run_hook() {
                    warn!("run(): skipping task with no run hook (slot={})", index);
                    self.slots.attach(index, task);
                    continue;
                }

                trace!("run(): invoking task (name={:?}, slot={})", task.get_name(), index);
                self.current = Some(SlotId(index));
                task.run(self);
                self.current = None;

                if self.reap_current {
                    // remove_current() has released the slot already; finish the removal by
                    // running the cleanup hook and dropping the task together with its state.
                    self.reap_current = false;
                    trace!("run(): removing task (name={:?}, slot={})", task.get_name(), index);
                    task.cleanup(self);
                } else {
                    self.slots.attach(index, task);
                }
            }
            watch.stop();
            debug!("run(): pass {} completed in {}", self.passes, watch.format_elapsed());
        }
        Ok(())
    }

    /// Deregisters the task whose run hook is currently executing. Legal only when called
    /// synchronously from within that hook, and at most once per invocation; any other call
    /// fails with `EPERM` and changes no state.
    ///
    /// On success the slot is released for reuse and the task no longer counts as registered.
    /// The task object itself is mutably borrowed by the hook invocation still on the stack, so
    /// the run loop drops it, after running its cleanup hook, at the instant the run hook
    /// returns.
    pub fn remove_current(&mut self) -> Result<(), Fail> {
        let slot: SlotId = match self.current {
            Some(slot) => slot,
            None => {
                let cause: &str = "no task invocation is in progress";
                error!("remove_current(): {}", cause);
                return Err(Fail::new(libc::EPERM, cause));
            },
        };
        if self.reap_current {
            let cause: String = format!("task already removed itself (slot={:?})", slot);
            error!("remove_current(): {}", cause);
            return Err(Fail::new(libc::EPERM, &cause));
        }

        self.slots.release(slot.into());
        self.reap_current = true;
        trace!("remove_current(): slot={:?}", slot);
        Ok(())
    }

    /// Destroys the scheduler. Fails with `EBUSY` while tasks are still registered, handing the
    /// intact scheduler back to the caller; on success the scheduler is consumed and any further
    /// use is a compile-time error.
    pub fn destroy(self) -> Result<(), (Fail, Self)> {
        if !self.slots.is_empty() {
            let cause: String = format!("scheduler still has {} registered task(s)", self.slots.len());
            error!("destroy(): {}", cause);
            return Err((Fail::new(libc::EBUSY, &cause), self));
        }
        Ok(())
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl Drop for Scheduler {
    fn drop(&mut self) {
        // The registry should be drained through self-removal before the scheduler goes away.
        if !self.slots.is_empty() {
            warn!(
                "dropping a scheduler with {} registered task(s); cleanup hooks will not run",
                self.slots.len()
            );
        }
    }
}

//======================================================================================================================
// Unit Tests
//======================================================================================================================
