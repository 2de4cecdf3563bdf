//! Manifest-file definition source.
//!
//! One deployment definition per `<identifier>.json` file in a directory:
//!
//! ```json
//! {
//!   "description": "Release the storefront",
//!   "tasks": [
//!     { "type": "shell", "command": "composer install", "workingDir": "~/app" },
//!     { "type": "ssh", "host": "web1", "user": "deploy", "command": "bin/console cache:clear" }
//!   ]
//! }
//! ```
//!
//! Discovery lists file stems in sorted order. Parsing happens in `define()`,
//! so an unreadable manifest surfaces when its deployment runs, not during
//! discovery.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::definition::{DeploymentDefinition, TaskDefinition};
use crate::dispatch::{ShellTask, SshTask};
use crate::error::{Error, Result};
use crate::registry::{DeploymentFactory, Discovery};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentManifest {
    #[serde(default)]
    #[allow(dead_code)]
    description: Option<String>,
    tasks: Vec<TaskManifest>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[serde(rename_all_fields = "camelCase")]
enum TaskManifest {
    Shell {
        command: String,
        #[serde(default)]
        working_dir: Option<String>,
        #[serde(default)]
        env: BTreeMap<String, String>,
    },
    Ssh {
        host: String,
        user: String,
        #[serde(default = "default_ssh_port")]
        port: u16,
        #[serde(default)]
        identity_file: Option<String>,
        command: String,
    },
}

fn default_ssh_port() -> u16 {
    22
}

impl TaskManifest {
    fn into_task(self) -> Box<dyn TaskDefinition> {
        match self {
            TaskManifest::Shell {
                command,
                working_dir,
                env,
            } => {
                let mut task = ShellTask::new(command);
                task.working_dir = working_dir;
                task.env = env.into_iter().collect();
                Box::new(task)
            }
            TaskManifest::Ssh {
                host,
                user,
                port,
                identity_file,
                command,
            } => {
                let mut task = SshTask::new(host, user, command);
                task.port = port;
                task.identity_file = identity_file;
                Box::new(task)
            }
        }
    }
}

/// A deployment definition backed by a JSON manifest file.
pub struct ManifestDeployment {
    identifier: String,
    path: PathBuf,
    tasks: Vec<Box<dyn TaskDefinition>>,
}

impl ManifestDeployment {
    pub fn new(identifier: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            identifier: identifier.into(),
            path: path.into(),
            tasks: Vec::new(),
        }
    }
}

impl DeploymentDefinition for ManifestDeployment {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn define(&mut self) -> Result<()> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::internal_io(
                format!("Failed to read {}: {}", self.path.display(), e),
                Some(format!("define {}", self.identifier)),
            )
        })?;

        let manifest: DeploymentManifest = serde_json::from_str(&content)
            .map_err(|e| Error::invalid_manifest(self.path.display().to_string(), e.to_string()))?;

        self.tasks = manifest
            .tasks
            .into_iter()
            .map(TaskManifest::into_task)
            .collect();

        Ok(())
    }

    fn tasks(&self) -> &[Box<dyn TaskDefinition>] {
        &self.tasks
    }
}

/// Discovers `*.json` deployment manifests in a directory and constructs
/// [`ManifestDeployment`]s from them.
pub struct ManifestFinder {
    dir: PathBuf,
}

impl ManifestFinder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn manifest_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}.json", identifier))
    }
}

impl Discovery for ManifestFinder {
    fn find_executable_identifiers(&self) -> Result<Vec<String>> {
        let pattern = self.dir.join("*.json");
        let pattern = pattern.to_string_lossy();

        let paths = glob::glob(&pattern).map_err(|e| {
            Error::validation_invalid_argument("definitions-dir", e.to_string())
        })?;

        let mut identifiers: Vec<String> = paths
            .filter_map(std::result::Result::ok)
            .filter_map(|path| file_stem(&path))
            .collect();
        identifiers.sort();

        Ok(identifiers)
    }
}

impl DeploymentFactory for ManifestFinder {
    fn is_definition(&self, identifier: &str) -> bool {
        self.manifest_path(identifier).is_file()
    }

    fn create(&self, identifier: &str) -> Result<Box<dyn DeploymentDefinition>> {
        let path = self.manifest_path(identifier);
        if !path.is_file() {
            return Err(Error::construction_failed(
                identifier,
                format!("manifest file not found: {}", path.display()),
            ));
        }

        Ok(Box::new(ManifestDeployment::new(identifier, path)))
    }
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}
