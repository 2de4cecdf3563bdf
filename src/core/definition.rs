//! Deployment and task definition contracts.
//!
//! A deployment definition is one logical deployment unit: an identifier plus
//! an ordered list of task definitions. The task list is populated lazily by
//! `define()`, which the deployment runner calls exactly once before reading
//! the tasks. Task definitions carry no behavior of their own; a dispatcher
//! downcasts them to its concrete task type via `as_any()`.

use std::any::Any;

use crate::error::Result;

/// One unit of work within a deployment.
///
/// Implementations are plain configuration structs. `kind()` is a short,
/// stable label used in error messages and resolution diagnostics;
/// `describe()` is a one-line human summary for debug output.
pub trait TaskDefinition {
    fn kind(&self) -> &str;

    fn describe(&self) -> String;

    /// Used by dispatchers to downcast to the concrete task type.
    fn as_any(&self) -> &dyn Any;
}

/// One logical deployment unit with an ordered task sequence.
///
/// The task sequence is immutable once read by the runner; mutating it
/// mid-run is undefined.
pub trait DeploymentDefinition {
    fn identifier(&self) -> &str;

    /// Populates the task sequence. Runs exactly once, before `tasks()` is
    /// read. Failures propagate to the caller uncaught.
    fn define(&mut self) -> Result<()>;

    /// The task definitions in insertion order.
    fn tasks(&self) -> &[Box<dyn TaskDefinition>];
}

impl std::fmt::Debug for dyn DeploymentDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn DeploymentDefinition")
    }
}
