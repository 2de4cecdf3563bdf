//! Top-level run driver: discovery, per-deployment failure boundary, exit
//! code aggregation.

use std::rc::Rc;

use crate::dispatch::DispatcherResolver;
use crate::error::{Error, Result};
use crate::events::{Event, EventBus};
use crate::registry::{DeploymentFactory, Discovery};
use crate::reporter::{Reporter, Verbosity};
use crate::runner::DeploymentRunner;

/// Exit code reported when a deployment raises an unexpected error instead
/// of reporting a task failure.
pub const ORCHESTRATION_FAILURE_EXIT_CODE: i32 = 5;

/// Input to one run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// When non-empty, restrict the run to these discovered identifiers.
    pub only: Vec<String>,
}

/// Drives a full run: obtains executable deployment identifiers, executes
/// each in order, aggregates success across all of them, and produces the
/// process exit code.
///
/// Observers attach to the bus (via [`RunOrchestrator::bus_mut`]) before
/// `execute` is called; during the run the bus is only touched by `publish`.
pub struct RunOrchestrator {
    bus: EventBus,
    resolver: DispatcherResolver,
    discovery: Rc<dyn Discovery>,
    factory: Rc<dyn DeploymentFactory>,
    reporter: Box<dyn Reporter>,
}

impl RunOrchestrator {
    pub fn new(
        discovery: Rc<dyn Discovery>,
        factory: Rc<dyn DeploymentFactory>,
        resolver: DispatcherResolver,
        reporter: Box<dyn Reporter>,
    ) -> Self {
        Self {
            bus: EventBus::new(),
            resolver,
            discovery,
            factory,
            reporter,
        }
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Execute the run and return the process exit code: 0 when every
    /// deployment succeeded, the first failing task's exit code, or
    /// [`ORCHESTRATION_FAILURE_EXIT_CODE`] when a deployment raised an
    /// unexpected error.
    ///
    /// Structural failures (resolution, construction, observer errors) are
    /// caught here and only here; `after-run` is always published.
    pub fn execute(&mut self, options: &RunOptions) -> i32 {
        let mut success = true;
        let mut exit_code = 0;
        let mut executed = 0usize;
        let mut failed_identifier: Option<String> = None;

        if let Err(e) = self.bus.publish(&mut Event::BeforeRun { options }) {
            self.report_error(&e);
            success = false;
            exit_code = ORCHESTRATION_FAILURE_EXIT_CODE;
        }

        if success {
            match self.discover(options) {
                Ok(identifiers) => {
                    self.reporter.line(
                        Verbosity::Normal,
                        &format!("Executing {} definitions", identifiers.len()),
                    );

                    for identifier in identifiers {
                        if !self.factory.is_definition(&identifier) {
                            self.reporter.line(
                                Verbosity::Normal,
                                &format!(
                                    "WARNING: Skipping definition {} since it does not satisfy the deployment definition contract",
                                    identifier
                                ),
                            );
                            continue;
                        }

                        self.reporter.line(
                            Verbosity::Verbose,
                            &format!("Execute definition {}", identifier),
                        );

                        match self.run_definition(&identifier) {
                            Ok(0) => self.reporter.line(
                                Verbosity::Debug,
                                &format!("Finished executing definition {}", identifier),
                            ),
                            Ok(code) => {
                                self.reporter.line(
                                    Verbosity::Normal,
                                    &format!("Failed to execute definition {}", identifier),
                                );
                                success = false;
                                exit_code = code;
                                failed_identifier = Some(identifier.clone());
                            }
                            Err(e) => {
                                self.report_error(&e);
                                success = false;
                                exit_code = ORCHESTRATION_FAILURE_EXIT_CODE;
                                failed_identifier = Some(identifier.clone());
                            }
                        }

                        executed += 1;
                        if !success {
                            break;
                        }
                    }
                }
                Err(e) => {
                    self.report_error(&e);
                    success = false;
                    exit_code = ORCHESTRATION_FAILURE_EXIT_CODE;
                }
            }
        }

        if let Err(e) = self.bus.publish(&mut Event::AfterRun { success }) {
            self.report_error(&e);
            if success {
                success = false;
                exit_code = ORCHESTRATION_FAILURE_EXIT_CODE;
            }
        }

        if success {
            self.reporter.line(
                Verbosity::Normal,
                &format!("Executed {} definitions", executed),
            );
        } else {
            let summary = match &failed_identifier {
                Some(identifier) => format!(
                    "Executed {} definitions; failed with exit code {} (definition {})",
                    executed, exit_code, identifier
                ),
                None => format!(
                    "Executed {} definitions; failed with exit code {}",
                    executed, exit_code
                ),
            };
            self.reporter.line(Verbosity::Normal, &summary);
        }

        exit_code
    }

    fn discover(&mut self, options: &RunOptions) -> Result<Vec<String>> {
        let mut identifiers = self.discovery.find_executable_identifiers()?;

        if !options.only.is_empty() {
            for requested in &options.only {
                if !identifiers.contains(requested) {
                    self.reporter.line(
                        Verbosity::Normal,
                        &format!("WARNING: Requested definition {} was not discovered", requested),
                    );
                }
            }
            identifiers.retain(|id| options.only.contains(id));
        }

        self.bus.publish(&mut Event::DefinitionsDiscovered {
            identifiers: &mut identifiers,
        })?;

        Ok(identifiers)
    }

    fn run_definition(&mut self, identifier: &str) -> Result<i32> {
        let mut deployment = self.factory.create(identifier)?;

        self.bus.publish(&mut Event::BeforeDeploymentDispatch {
            deployment: deployment.as_ref(),
        })?;

        let outcome = DeploymentRunner::new(&mut self.bus, &self.resolver, self.reporter.as_ref())
            .run(deployment.as_mut());
        let success = matches!(outcome, Ok(0));

        // after-deployment-dispatch fires even when the attempt failed, so
        // observers always see the outcome; only then do errors propagate.
        let published = self.bus.publish(&mut Event::AfterDeploymentDispatch {
            deployment: deployment.as_ref(),
            success,
        });

        let code = outcome?;
        published?;
        Ok(code)
    }

    fn report_error(&self, error: &Error) {
        self.reporter.line(
            Verbosity::Normal,
            &format!("ERROR ({}): {}", error.code.as_str(), error),
        );
    }
}
