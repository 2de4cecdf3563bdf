// Public modules
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod manifest;
pub mod registry;
pub mod reporter;
pub mod runner;

// Re-export common types for convenience
pub use definition::{DeploymentDefinition, TaskDefinition};
pub use dispatch::{AmbiguityPolicy, Dispatcher, DispatchResult, DispatcherResolver};
pub use error::{Error, ErrorCode, Result};
pub use events::{Event, EventBus, EventKind};
pub use registry::{DefinitionRegistry, DeploymentFactory, Discovery};
pub use reporter::{ConsoleReporter, Reporter, Verbosity};
pub use runner::{RunOptions, RunOrchestrator, ORCHESTRATION_FAILURE_EXIT_CODE};
