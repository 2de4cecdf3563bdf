use clap::Args;

use runway::log_status;
use runway::manifest::ManifestFinder;
use runway::registry::Discovery;

use super::CmdResult;

#[derive(Args)]
pub struct ListArgs {
    /// Directory holding deployment manifest files
    #[arg(long, default_value = "./deployments")]
    pub definitions_dir: String,
}

pub fn run(args: ListArgs) -> CmdResult {
    let dir = shellexpand::tilde(&args.definitions_dir).to_string();
    let finder = ManifestFinder::new(dir);

    let identifiers = finder.find_executable_identifiers()?;
    for identifier in &identifiers {
        println!("{}", identifier);
    }
    log_status!("list", "{} definitions discovered", identifiers.len());

    Ok(0)
}
