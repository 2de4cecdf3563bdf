//! Synchronous, in-process event bus for run lifecycle events.
//!
//! Dispatch is single-threaded: all observers registered for an event kind
//! run to completion, in registration order, before `publish` returns.
//! Observers mutate the event payload in place; the `skip` flag on
//! [`Event::BeforeTaskDispatch`] is the sole cancellation mechanism. An
//! observer error propagates out of `publish` and is handled only at the
//! run boundary.

use crate::definition::{DeploymentDefinition, TaskDefinition};
use crate::dispatch::DispatchResult;
use crate::error::{Error, Result};
use crate::runner::RunOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    BeforeRun,
    DefinitionsDiscovered,
    BeforeDeploymentDispatch,
    BeforeTaskDispatch,
    AfterTaskDispatch,
    AfterDeploymentDispatch,
    AfterRun,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::BeforeRun => "before-run",
            EventKind::DefinitionsDiscovered => "definitions-discovered",
            EventKind::BeforeDeploymentDispatch => "before-deployment-dispatch",
            EventKind::BeforeTaskDispatch => "before-task-dispatch",
            EventKind::AfterTaskDispatch => "after-task-dispatch",
            EventKind::AfterDeploymentDispatch => "after-deployment-dispatch",
            EventKind::AfterRun => "after-run",
        }
    }
}

/// A run lifecycle event with its payload.
///
/// Payloads borrow from the publisher; observers may inspect them and, where
/// a field is mutable, alter them for the publisher to read back after
/// `publish` returns.
pub enum Event<'a> {
    /// Fired once before discovery.
    BeforeRun { options: &'a RunOptions },
    /// Fired once after discovery. Observers may filter or extend the
    /// identifier list before the run uses it.
    DefinitionsDiscovered { identifiers: &'a mut Vec<String> },
    /// Fired per deployment, before its tasks run.
    BeforeDeploymentDispatch {
        deployment: &'a dyn DeploymentDefinition,
    },
    /// Fired per task, before dispatcher resolution. Setting `skip` prevents
    /// the dispatch; the task then reports a synthetic zero exit code.
    BeforeTaskDispatch {
        task: &'a dyn TaskDefinition,
        skip: bool,
    },
    /// Fired per dispatched task, even on a nonzero exit code.
    AfterTaskDispatch {
        task: &'a dyn TaskDefinition,
        result: &'a DispatchResult,
    },
    /// Fired per deployment after the attempt, even when it failed.
    AfterDeploymentDispatch {
        deployment: &'a dyn DeploymentDefinition,
        success: bool,
    },
    /// Fired once with the overall success flag.
    AfterRun { success: bool },
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BeforeRun { .. } => EventKind::BeforeRun,
            Event::DefinitionsDiscovered { .. } => EventKind::DefinitionsDiscovered,
            Event::BeforeDeploymentDispatch { .. } => EventKind::BeforeDeploymentDispatch,
            Event::BeforeTaskDispatch { .. } => EventKind::BeforeTaskDispatch,
            Event::AfterTaskDispatch { .. } => EventKind::AfterTaskDispatch,
            Event::AfterDeploymentDispatch { .. } => EventKind::AfterDeploymentDispatch,
            Event::AfterRun { .. } => EventKind::AfterRun,
        }
    }
}

type Observer = Box<dyn for<'a> FnMut(&mut Event<'a>) -> Result<()>>;

/// Observers attach before the run begins; during the run the bus is only
/// touched through `publish`.
#[derive(Default)]
pub struct EventBus {
    observers: Vec<(EventKind, Observer)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one event kind. Observers for the same kind
    /// run in registration order.
    pub fn observe<F>(&mut self, kind: EventKind, observer: F)
    where
        F: for<'a> FnMut(&mut Event<'a>) -> Result<()> + 'static,
    {
        self.observers.push((kind, Box::new(observer)));
    }

    /// Run every observer registered for the event's kind, in order. The
    /// first observer error stops dispatch and propagates to the caller.
    pub fn publish(&mut self, event: &mut Event<'_>) -> Result<()> {
        let kind = event.kind();
        for (registered, observer) in self.observers.iter_mut() {
            if *registered != kind {
                continue;
            }
            observer(event)
                .map_err(|e| Error::observer_failed(kind.as_str(), e.message.clone()))?;
        }
        Ok(())
    }
}
