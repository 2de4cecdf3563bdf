//! Executes a single task definition through its resolved dispatcher.

use crate::definition::TaskDefinition;
use crate::dispatch::{DispatchResult, DispatcherResolver};
use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::reporter::{Reporter, Verbosity};

pub struct TaskRunner<'a> {
    bus: &'a mut EventBus,
    resolver: &'a DispatcherResolver,
    reporter: &'a dyn Reporter,
}

impl<'a> TaskRunner<'a> {
    pub fn new(
        bus: &'a mut EventBus,
        resolver: &'a DispatcherResolver,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            bus,
            resolver,
            reporter,
        }
    }

    /// Run one task definition.
    ///
    /// An observer of `before-task-dispatch` may set the skip flag, in which
    /// case the resolver is never consulted and a synthetic zero exit code
    /// is returned. A nonzero exit code from the dispatcher is reported and
    /// returned as data; `after-task-dispatch` still fires for it.
    pub fn run(&mut self, task: &dyn TaskDefinition) -> Result<DispatchResult> {
        let mut event = Event::BeforeTaskDispatch { task, skip: false };
        self.bus.publish(&mut event)?;

        if matches!(event, Event::BeforeTaskDispatch { skip: true, .. }) {
            return Ok(DispatchResult::skipped(
                "Skipped execution of task definition",
            ));
        }

        let dispatcher = self.resolver.resolve(task)?;
        let result = dispatcher.dispatch(task)?;

        if result.exit_code() > 0 {
            self.reporter.line(
                Verbosity::Normal,
                &format!(
                    "Error while executing task ({})\nOutput: {}\nError output: {}",
                    result.exit_code(),
                    result.output(),
                    result.error_output()
                ),
            );
        }

        if !result.output().is_empty() {
            self.reporter
                .line(Verbosity::Verbose, result.output().trim_end());
        }

        self.bus
            .publish(&mut Event::AfterTaskDispatch { task, result: &result })?;

        Ok(result)
    }
}
