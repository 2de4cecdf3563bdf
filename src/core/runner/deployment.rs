//! Executes a single deployment definition: all tasks in order, stopping at
//! the first nonzero exit code.

use crate::definition::DeploymentDefinition;
use crate::dispatch::DispatcherResolver;
use crate::error::Result;
use crate::events::EventBus;
use crate::reporter::{Reporter, Verbosity};
use crate::runner::TaskRunner;

pub struct DeploymentRunner<'a> {
    bus: &'a mut EventBus,
    resolver: &'a DispatcherResolver,
    reporter: &'a dyn Reporter,
}

impl<'a> DeploymentRunner<'a> {
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

    /// Run one deployment definition and return its exit code.
    ///
    /// `define()` runs exactly once before the task sequence is read; its
    /// failure propagates uncaught. The first task with an exit code greater
    /// than zero stops the iteration; later tasks are never dispatched and
    /// there is no rollback.
    pub fn run(&mut self, deployment: &mut dyn DeploymentDefinition) -> Result<i32> {
        deployment.define()?;

        for task in deployment.tasks() {
            self.reporter.line(
                Verbosity::Debug,
                &format!("Executing {} => {}", deployment.identifier(), task.describe()),
            );

            let result =
                TaskRunner::new(self.bus, self.resolver, self.reporter).run(task.as_ref())?;

            if result.exit_code() > 0 {
                return Ok(result.exit_code());
            }
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::definition::TaskDefinition;
    use crate::dispatch::{Dispatcher, DispatchResult};
    use crate::error::{Error, ErrorCode};

    struct StubTask {
        name: &'static str,
        exit_code: i32,
    }

    impl TaskDefinition for StubTask {
        fn kind(&self) -> &str {
            "stub"
        }
        fn describe(&self) -> String {
            self.name.to_string()
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct RecordingDispatcher {
        dispatched: Rc<RefCell<Vec<String>>>,
    }

    impl Dispatcher for RecordingDispatcher {
        fn can_dispatch(&self, task: &dyn TaskDefinition) -> bool {
            task.as_any().is::<StubTask>()
        }

        fn dispatch(&self, task: &dyn TaskDefinition) -> Result<DispatchResult> {
            let task = task.as_any().downcast_ref::<StubTask>().unwrap();
            self.dispatched.borrow_mut().push(task.name.to_string());
            Ok(DispatchResult::new(task.exit_code, "", ""))
        }
    }

    struct StubDeployment {
        tasks: Vec<Box<dyn TaskDefinition>>,
        defines: Rc<RefCell<usize>>,
        define_fails: bool,
    }

    impl StubDeployment {
        fn new(codes: &[(&'static str, i32)]) -> Self {
            Self {
                tasks: codes
                    .iter()
                    .map(|&(name, exit_code)| {
                        Box::new(StubTask { name, exit_code }) as Box<dyn TaskDefinition>
                    })
                    .collect(),
                defines: Rc::new(RefCell::new(0)),
                define_fails: false,
            }
        }
    }

    impl DeploymentDefinition for StubDeployment {
        fn identifier(&self) -> &str {
            "stub-deployment"
        }

        fn define(&mut self) -> Result<()> {
            *self.defines.borrow_mut() += 1;
            if self.define_fails {
                return Err(Error::internal_unexpected("define failed"));
            }
            Ok(())
        }

        fn tasks(&self) -> &[Box<dyn TaskDefinition>] {
            &self.tasks
        }
    }

    struct NullReporter;

    impl Reporter for NullReporter {
        fn line(&self, _tier: Verbosity, _message: &str) {}
    }

    fn run_deployment(deployment: &mut StubDeployment) -> (Result<i32>, Vec<String>) {
        let dispatched = Rc::new(RefCell::new(Vec::new()));
        let mut resolver = DispatcherResolver::new();
        resolver.register(Box::new(RecordingDispatcher {
            dispatched: Rc::clone(&dispatched),
        }));
        let mut bus = EventBus::new();

        let outcome = DeploymentRunner::new(&mut bus, &resolver, &NullReporter).run(deployment);
        let names = dispatched.borrow().clone();
        (outcome, names)
    }

    #[test]
    fn all_tasks_run_when_every_exit_code_is_zero() {
        let mut deployment = StubDeployment::new(&[("a", 0), ("b", 0), ("c", 0)]);
        let (outcome, dispatched) = run_deployment(&mut deployment);
        assert_eq!(outcome.unwrap(), 0);
        assert_eq!(dispatched, vec!["a", "b", "c"]);
    }

    #[test]
    fn first_failure_stops_later_tasks() {
        let mut deployment = StubDeployment::new(&[("a", 0), ("b", 4), ("c", 0)]);
        let (outcome, dispatched) = run_deployment(&mut deployment);
        assert_eq!(outcome.unwrap(), 4);
        assert_eq!(dispatched, vec!["a", "b"]);
    }

    #[test]
    fn define_runs_exactly_once() {
        let mut deployment = StubDeployment::new(&[("a", 0)]);
        let defines = Rc::clone(&deployment.defines);
        let (outcome, _) = run_deployment(&mut deployment);
        assert!(outcome.is_ok());
        assert_eq!(*defines.borrow(), 1);
    }

    #[test]
    fn define_failure_propagates_before_any_dispatch() {
        let mut deployment = StubDeployment::new(&[("a", 0)]);
        deployment.define_fails = true;
        let (outcome, dispatched) = run_deployment(&mut deployment);
        assert_eq!(outcome.unwrap_err().code, ErrorCode::InternalUnexpected);
        assert!(dispatched.is_empty());
    }

    #[test]
    fn empty_deployment_returns_zero() {
        let mut deployment = StubDeployment::new(&[]);
        let (outcome, dispatched) = run_deployment(&mut deployment);
        assert_eq!(outcome.unwrap(), 0);
        assert!(dispatched.is_empty());
    }
}
