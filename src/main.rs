use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;
use lintag::command;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Extract(command::ExtractCMD),
    Combine(command::CombineCMD),
    Correct(command::CorrectCMD),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(mut cmd) => cmd.try_execute(),
        Commands::Combine(mut cmd) => cmd.try_execute(),
        Commands::Correct(mut cmd) => cmd.try_execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }
    return ExitCode::SUCCESS;
}
