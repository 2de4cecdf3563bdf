//! Local shell dispatcher.

use std::any::Any;
use std::process::Command;

use crate::definition::TaskDefinition;
use crate::dispatch::{Dispatcher, DispatchResult};
use crate::error::{Error, Result};

/// A shell command to run on the local machine.
#[derive(Debug, Clone)]
pub struct ShellTask {
    pub command: String,
    pub working_dir: Option<String>,
    pub env: Vec<(String, String)>,
}

impl ShellTask {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_dir: None,
            env: Vec::new(),
        }
    }

    pub fn in_dir(mut self, dir: impl Into<String>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

impl TaskDefinition for ShellTask {
    fn kind(&self) -> &str {
        "shell"
    }

    fn describe(&self) -> String {
        format!("shell: {}", self.command)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Runs [`ShellTask`]s through the platform shell (`sh -c`, `cmd /C` on
/// Windows) and captures their output.
#[derive(Default)]
pub struct ShellDispatcher;

impl ShellDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Dispatcher for ShellDispatcher {
    fn can_dispatch(&self, task: &dyn TaskDefinition) -> bool {
        task.as_any().is::<ShellTask>()
    }

    fn dispatch(&self, task: &dyn TaskDefinition) -> Result<DispatchResult> {
        let task = task
            .as_any()
            .downcast_ref::<ShellTask>()
            .ok_or_else(|| Error::no_dispatcher(task.kind()))?;

        let mut cmd = shell_command(&task.command);

        if let Some(dir) = &task.working_dir {
            cmd.current_dir(shellexpand::tilde(dir).to_string());
        }

        if !task.env.is_empty() {
            cmd.envs(task.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        let out = cmd.output().map_err(|e| {
            Error::internal_io(
                format!("Failed to spawn shell for '{}': {}", task.command, e),
                Some("shell dispatch".to_string()),
            )
        })?;

        Ok(DispatchResult::new(
            // Termination by signal reports no code; treat it as a failure.
            out.status.code().unwrap_or(1),
            String::from_utf8_lossy(&out.stdout).to_string(),
            String::from_utf8_lossy(&out.stderr).to_string(),
        ))
    }
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command]);
    cmd
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}
