//! Remote dispatcher shelling out to the `ssh` binary.

use std::any::Any;
use std::process::Command;

use crate::definition::TaskDefinition;
use crate::dispatch::shell::ShellTask;
use crate::dispatch::{Dispatcher, DispatchResult, ShellDispatcher};
use crate::error::{Error, Result};

/// A command to run on a remote host over SSH.
#[derive(Debug, Clone)]
pub struct SshTask {
    pub host: String,
    pub user: String,
    pub port: u16,
    pub identity_file: Option<String>,
    pub command: String,
}

impl SshTask {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            port: 22,
            identity_file: None,
            command: command.into(),
        }
    }
}

impl TaskDefinition for SshTask {
    fn kind(&self) -> &str {
        "ssh"
    }

    fn describe(&self) -> String {
        format!("ssh {}@{}: {}", self.user, self.host, self.command)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Runs [`SshTask`]s via the system `ssh` client in batch mode.
///
/// Localhost hosts short-circuit to local shell execution so manifests can
/// be exercised without a reachable remote.
#[derive(Default)]
pub struct SshDispatcher;

impl SshDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Dispatcher for SshDispatcher {
    fn can_dispatch(&self, task: &dyn TaskDefinition) -> bool {
        task.as_any().is::<SshTask>()
    }

    fn dispatch(&self, task: &dyn TaskDefinition) -> Result<DispatchResult> {
        let task = task
            .as_any()
            .downcast_ref::<SshTask>()
            .ok_or_else(|| Error::no_dispatcher(task.kind()))?;

        if is_local_host(&task.host) {
            log_status!("ssh", "Host '{}' is local, running command directly", task.host);
            return ShellDispatcher::new().dispatch(&ShellTask::new(task.command.clone()));
        }

        let args = build_ssh_args(task);
        let out = Command::new("ssh").args(&args).output().map_err(|e| {
            Error::internal_io(
                format!("Failed to spawn ssh for {}@{}: {}", task.user, task.host, e),
                Some("ssh dispatch".to_string()),
            )
        })?;

        Ok(DispatchResult::new(
            out.status.code().unwrap_or(1),
            String::from_utf8_lossy(&out.stdout).to_string(),
            String::from_utf8_lossy(&out.stderr).to_string(),
        ))
    }
}

fn build_ssh_args(task: &SshTask) -> Vec<String> {
    let mut args = Vec::new();

    if let Some(identity_file) = &task.identity_file {
        args.push("-i".to_string());
        args.push(shellexpand::tilde(identity_file).to_string());
    }

    if task.port != 22 {
        args.push("-p".to_string());
        args.push(task.port.to_string());
    }

    // Batch options prevent hangs on stalled connections or unexpected
    // prompts; a hung dispatcher would block the whole run.
    args.extend([
        "-o".to_string(),
        "BatchMode=yes".to_string(),
        "-o".to_string(),
        "ConnectTimeout=10".to_string(),
        "-o".to_string(),
        "ServerAliveInterval=15".to_string(),
        "-o".to_string(),
        "ServerAliveCountMax=3".to_string(),
    ]);

    args.push(format!("{}@{}", task.user, task.host));
    args.push(task.command.clone());

    args
}

/// Check if a host address refers to the local machine.
fn is_local_host(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_port_is_omitted_from_args() {
        let task = SshTask::new("deploy.example.com", "deploy", "uptime");
        let args = build_ssh_args(&task);
        assert!(!args.contains(&"-p".to_string()));
        assert_eq!(args.last().unwrap(), "uptime");
        assert!(args.contains(&"deploy@deploy.example.com".to_string()));
    }

    #[test]
    fn custom_port_and_identity_are_passed() {
        let mut task = SshTask::new("deploy.example.com", "deploy", "uptime");
        task.port = 2222;
        task.identity_file = Some("/keys/id_ed25519".to_string());
        let args = build_ssh_args(&task);
        assert!(args.windows(2).any(|w| w == ["-p", "2222"]));
        assert!(args.windows(2).any(|w| w == ["-i", "/keys/id_ed25519"]));
    }

    #[test]
    fn batch_mode_is_always_set() {
        let args = build_ssh_args(&SshTask::new("h", "u", "true"));
        assert!(args.contains(&"BatchMode=yes".to_string()));
    }

    #[test]
    fn localhost_short_circuits_to_local_execution() {
        let result = SshDispatcher::new()
            .dispatch(&SshTask::new("localhost", "anyone", "echo local"))
            .unwrap();
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.output().trim(), "local");
    }

    #[test]
    fn recognizes_local_hosts() {
        assert!(is_local_host("localhost"));
        assert!(is_local_host("127.0.0.1"));
        assert!(is_local_host("::1"));
        assert!(!is_local_host("deploy.example.com"));
    }
}
