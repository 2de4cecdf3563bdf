//! Plain-text run reporting with verbosity tiers.

/// Output tier. Higher tiers are only shown when the reporter is configured
/// at least that verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Normal,
    Verbose,
    Debug,
}

impl Verbosity {
    /// Map a repeated `-v` flag count to a tier.
    pub fn from_flag_count(count: u8) -> Self {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    }
}

/// Accepts the run's output lines. The core writes summary, per-definition,
/// per-task, and error lines at varying tiers; formatting and filtering
/// belong to the implementation.
pub trait Reporter {
    fn line(&self, tier: Verbosity, message: &str);
}

/// Prints lines to stdout, filtered by the configured verbosity.
pub struct ConsoleReporter {
    verbosity: Verbosity,
}

impl ConsoleReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn line(&self, tier: Verbosity, message: &str) {
        if tier <= self.verbosity {
            println!("{}", message);
        }
    }
}
