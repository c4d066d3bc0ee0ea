//! crxkit CLI entry point.
//!
//! Parses arguments, initializes logging and colors, and dispatches to the
//! command implementations. Any error exits with status 1.

use clap::Parser;
use crxkit_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors_with(!args.no_color && ui::should_use_color());

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args).await,
        cli::Command::Start(start_args) => commands::dev_execute(start_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
