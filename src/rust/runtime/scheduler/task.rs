// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//======================================================================================================================
// Imports
//======================================================================================================================

use crate::runtime::scheduler::Scheduler;

//======================================================================================================================
// Structures
//======================================================================================================================

/// Index of the slot a task occupies. Stable for the whole lifetime of the task's occupancy.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub struct SlotId(pub usize);

/// A schedulable unit of repeatable work.
///
/// The scheduler invokes [run](Task::run) once per pass until the task deregisters itself by
/// calling [Scheduler::remove_current] from within its own `run` invocation. [create](Task::create)
/// runs exactly once, when the task is accepted into a slot; [cleanup](Task::cleanup) runs exactly
/// once, when the task removes itself, immediately before the task is dropped.
///
/// Hooks must do a small, bounded amount of work and return promptly: the scheduler is
/// cooperative, so a blocking or unbounded hook starves every other task.
pub trait Task: 'static {
    /// Task name. The host should use this to identify the type of task in diagnostics.
    fn get_name(&self) -> String;

    /// Reports whether this task carries a run hook. [TaskWithState] makes a missing run hook
    /// unrepresentable; foreign implementations that can lose theirs must override this so that
    /// [Scheduler::insert_task] can reject them.
    fn has_run_hook(&self) -> bool {
        true
    }

    /// One-time initialization, invoked when the task is accepted into a slot and before its
    /// first [run](Task::run).
    fn create(&mut self, _scheduler: &mut Scheduler) {}

    /// One unit of work. Invoked once per pass for as long as the task occupies a slot.
    fn run(&mut self, scheduler: &mut Scheduler);

    /// One-time teardown, invoked when the task has removed itself and immediately before it is
    /// dropped. Requesting removal again from this hook is not legal.
    fn cleanup(&mut self, _scheduler: &mut Scheduler) {}
}

/// Signature shared by all lifecycle hooks of a [TaskWithState]: the scheduler handle (so that a
/// run hook can request self-removal) and the state the task was registered with.
pub type SchedulerHook<S> = Box<dyn FnMut(&mut Scheduler, &mut S)>;

/// A [Task] assembled from hook closures and a typed state value.
///
/// The state takes the place of the opaque context pointer of a C-style scheduler: it is owned
/// exclusively by the task, every hook receives it, it is never aliased by the scheduler outside
/// a hook invocation, and it is released exactly once, when the task is dropped on removal.
pub struct TaskWithState<S> {
    /// Task name. The host should use this to identify the type of task.
    name: String,
    /// State owned by this task, passed to every hook.
    state: S,
    /// Optional hook invoked once when the task is accepted into a slot.
    create: Option<SchedulerHook<S>>,
    /// Mandatory hook invoked once per pass.
    run: SchedulerHook<S>,
    /// Optional hook invoked once when the task removes itself.
    cleanup: Option<SchedulerHook<S>>,
}

//======================================================================================================================
// Associate Functions
//======================================================================================================================

/// Associate Functions for TaskWithState.
impl<S: 'static> TaskWithState<S> {
    /// Instantiates a task with a run hook only.
    pub fn new(name: String, state: S, run: SchedulerHook<S>) -> Self {
        Self {
            name,
            state,
            create: None,
            run,
            cleanup: None,
        }
    }

    /// Adds a create hook.
    pub fn with_create(mut self, hook: SchedulerHook<S>) -> Self {
        self.create = Some(hook);
        self
    }

    /// Adds a cleanup hook.
    pub fn with_cleanup(mut self, hook: SchedulerHook<S>) -> Self {
        self.cleanup = Some(hook);
        self
    }
}

//======================================================================================================================
// Trait Implementations
//======================================================================================================================

impl From<usize> for SlotId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl From<SlotId> for usize {
    fn from(value: SlotId) -> Self {
        value.0
    }
}

impl<S: 'static> Task for TaskWithState<S> {
    fn get_name(&self) -> String {
        self.name.clone()
    }

    fn create(&mut self, scheduler: &mut Scheduler) {
        if let Some(hook) = self.create.as_mut() {
            hook(scheduler, &mut self.state);
        }
    }

    fn run(&mut self, scheduler: &mut Scheduler) {
        (self.run)(scheduler, &mut self.state);
    }

    fn cleanup(&mut self, scheduler: &mut Scheduler) {
        if let Some(hook) = self.cleanup.as_mut() {
            hook(scheduler, &mut self.state);
        }
    }
}
