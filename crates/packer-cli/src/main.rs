//! Packer CLI - pick entries of a directory and pack them into an
//! encrypted `.tar.gz.gpg` archive.

mod cli;
mod commands;
mod error;
mod logger;
mod output;
mod progress;
mod prompt;

use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.generate_completions {
        commands::completion::execute(shell);
        return ExitCode::SUCCESS;
    }

    logger::init(cli.verbose, cli.quiet);
    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json && progress::ScanSpinner::should_show();

    let result = if cli.list {
        commands::list::execute(&cli, &*formatter, show_progress)
    } else {
        commands::pack::execute(&cli, &*formatter, show_progress)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(&err);
            error::exit_code(&err)
        }
    }
}
