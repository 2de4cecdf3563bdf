pub mod list;
pub mod run;

/// Result of a CLI command: the process exit code to report.
pub type CmdResult = runway::Result<i32>;
