use serde::Serialize;

/// Outcome of executing one task definition.
///
/// Immutable after construction. Exit code 0 means success; anything greater
/// than 0 is a task-level failure the runner inspects (never an `Err`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    exit_code: i32,
    output: String,
    error_output: String,
}

impl DispatchResult {
    pub fn new(
        exit_code: i32,
        output: impl Into<String>,
        error_output: impl Into<String>,
    ) -> Self {
        Self {
            exit_code,
            output: output.into(),
            error_output: error_output.into(),
        }
    }

    /// Synthetic success for a task an observer chose to skip.
    pub fn skipped(note: impl Into<String>) -> Self {
        Self::new(0, note, "")
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn error_output(&self) -> &str {
        &self.error_output
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
