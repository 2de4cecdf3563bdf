//! Task dispatch: the dispatcher contract, outcome type, and resolution.

pub mod resolver;
pub mod result;
pub mod shell;
pub mod ssh;

pub use resolver::{AmbiguityPolicy, DispatcherResolver};
pub use result::DispatchResult;
pub use shell::{ShellDispatcher, ShellTask};
pub use ssh::{SshDispatcher, SshTask};

use crate::definition::TaskDefinition;
use crate::error::Result;

/// Executes task definitions of one concrete type.
///
/// `can_dispatch` is the capability check the resolver iterates over;
/// `dispatch` blocks until the task completes and returns its outcome. A
/// nonzero exit code is a normal result, not an `Err`; `Err` is reserved for
/// structural failures such as being unable to spawn the process at all.
pub trait Dispatcher {
    fn can_dispatch(&self, task: &dyn TaskDefinition) -> bool;

    fn dispatch(&self, task: &dyn TaskDefinition) -> Result<DispatchResult>;
}

impl std::fmt::Debug for dyn Dispatcher + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn Dispatcher")
    }
}
