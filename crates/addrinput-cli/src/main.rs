use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod cmd;
mod error;
mod io;
mod output;

pub use cli::{Cli, Command, OutputFormat, PathOrStdin};

use error::CliError;
use output::FormatterConfig;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(&cli) {
        // Problems were already reported line by line.
        if !matches!(e, CliError::AddressProblems { .. }) || !cli.quiet {
            eprintln!("{}", e.message());
        }
        std::process::exit(e.exit_code());
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the level
/// chosen by `--quiet` / `--verbose`.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match (cli.quiet, cli.verbose) {
            (true, _) => "error",
            (false, true) => "debug",
            (false, false) => "warn",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Format { file } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::format::run(&content, &io::source_label(file), cli.format)
        }
        Command::Fields {
            region,
            latin,
            order,
        } => cmd::fields::run(region, *latin, order, cli.format),
        Command::Verify { file, field } => {
            let content = io::read_input(file, cli.max_file_size)?;
            let config = FormatterConfig::from_flags(cli.format, cli.no_color, cli.quiet);
            cmd::verify::run(
                &content,
                &io::source_label(file),
                cmd::data_source(cli)?,
                *field,
                &config,
            )
        }
        Command::Regions { key, latin } => {
            cmd::regions::run(key.as_deref(), *latin, cmd::data_source(cli)?, cli.format)
        }
        Command::Key { file } => {
            let content = io::read_input(file, cli.max_file_size)?;
            cmd::key::run(
                &content,
                &io::source_label(file),
                cmd::data_source(cli)?,
                cli.format,
            )
        }
    }
}
