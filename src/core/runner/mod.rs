//! Run execution: one orchestrator per run, one deployment at a time, one
//! task at a time. Strictly sequential; failure handling is first-failure-
//! wins at both the task and the deployment level.

pub mod deployment;
pub mod orchestrator;
pub mod task;

pub use deployment::DeploymentRunner;
pub use orchestrator::{RunOptions, RunOrchestrator, ORCHESTRATION_FAILURE_EXIT_CODE};
pub use task::TaskRunner;
