use clap::{Parser, Subcommand};

mod commands;

use commands::{list, run};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "runway")]
#[command(version = VERSION)]
#[command(about = "Run ordered deployment definitions through pluggable task dispatchers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute discovered deployment definitions in order
    Run(run::RunArgs),
    /// List discovered deployment definitions
    List(list::ListArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::List(args) => list::run(args),
    };

    match result {
        Ok(code) => std::process::ExitCode::from(exit_code_to_u8(code)),
        Err(err) => {
            eprintln!("ERROR ({}): {}", err.code.as_str(), err);
            for hint in &err.hints {
                eprintln!("hint: {}", hint.message);
            }
            std::process::ExitCode::from(1)
        }
    }
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
