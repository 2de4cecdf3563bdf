use std::rc::Rc;

use clap::Args;

use runway::dispatch::{DispatcherResolver, ShellDispatcher, SshDispatcher};
use runway::manifest::ManifestFinder;
use runway::reporter::{ConsoleReporter, Verbosity};
use runway::runner::{RunOptions, RunOrchestrator};

use super::CmdResult;

#[derive(Args)]
pub struct RunArgs {
    /// Definition identifiers to run (all discovered when omitted)
    pub identifiers: Vec<String>,

    /// Directory holding deployment manifest files
    #[arg(long, default_value = "./deployments")]
    pub definitions_dir: String,

    /// Increase output verbosity (-v verbose, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run(args: RunArgs) -> CmdResult {
    let dir = shellexpand::tilde(&args.definitions_dir).to_string();
    let finder = Rc::new(ManifestFinder::new(dir));

    let mut resolver = DispatcherResolver::new();
    resolver.register(Box::new(ShellDispatcher::new()));
    resolver.register(Box::new(SshDispatcher::new()));

    let reporter = ConsoleReporter::new(Verbosity::from_flag_count(args.verbose));

    let mut orchestrator = RunOrchestrator::new(
        Rc::clone(&finder) as Rc<dyn runway::Discovery>,
        finder as Rc<dyn runway::DeploymentFactory>,
        resolver,
        Box::new(reporter),
    );

    let options = RunOptions {
        only: args.identifiers,
    };

    Ok(orchestrator.execute(&options))
}
