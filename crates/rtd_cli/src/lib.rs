mod cmd;
mod config;
mod ctx;
pub mod error;
mod table;

use std::{
    fmt,
    io::{self, Write as _},
    path::PathBuf,
    process::ExitCode,
};

use clap::{ArgAction, Parser};
use cmd::{Commands, Output, Success};
use config::Config;
use ctx::Ctx;
use error::Result;
use tracing::{error, trace};

/// List, sync and import remote repositories of a documentation host.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten, next_help_heading = "Global Options")]
    globals: Globals,

    #[command(subcommand, next_help_heading = "Options")]
    command: Commands,
}

#[derive(Debug, clap::Args)]
pub struct Globals {
    /// Path to the configuration file.
    ///
    /// Defaults to `rtd-import.toml` in the current directory, if it exists.
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Base URL of the documentation host, e.g. `https://readthedocs.org/`.
    #[arg(long, value_name = "URL", global = true)]
    base_url: Option<String>,

    /// Increase verbosity of logging.
    ///
    /// Can be specified multiple times to increase verbosity.
    ///
    /// Defaults to printing "error" messages. For each increase in verbosity,
    /// the log level is set to "warn", "info", "debug", and "trace"
    /// respectively.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress all output, including errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

impl fmt::Display for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entry(&"config", &self.globals.config)
            .entry(&"base_url", &self.globals.base_url)
            .entry(&"verbose", &self.globals.verbose)
            .entry(&"quiet", &self.globals.quiet)
            .finish()
    }
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.globals.quiet;

    configure_logging(cli.globals.verbose, quiet);
    trace!(command = cli.command.name(), arguments = %cli, "Starting CLI run.");

    let (success, output) = match run_inner(cli).await {
        Ok(output) => (true, output_to_string(output)),
        Err(err) => {
            error!(error = %err, "Command failed.");
            (false, err.to_string())
        }
    };

    let code = if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if quiet || output.is_empty() {
        return code;
    }

    let written = if success {
        writeln!(io::stdout().lock(), "{output}")
    } else {
        writeln!(io::stderr().lock(), "{output}")
    };

    // Nothing left to report a broken pipe to.
    if written.is_err() {
        return ExitCode::FAILURE;
    }

    code
}

async fn run_inner(cli: Cli) -> Result<Success> {
    match cli.command {
        Commands::Vcs(args) => Ok(args.run()),
        cmd => {
            let config = load_config(&cli.globals)?;
            let ctx = Ctx::new(config)?;

            cmd.run(&ctx).await
        }
    }
}

/// Merge the configuration file, environment and command-line flags, in
/// increasing order of precedence.
fn load_config(globals: &Globals) -> Result<Config> {
    let config = Config::load(globals.config.as_deref())?
        .apply_env(|key| std::env::var(key).ok())
        .apply_globals(globals);

    trace!(base_url = ?config.base_url, "Loaded configuration.");
    Ok(config)
}

fn output_to_string(output: Success) -> String {
    match output {
        Success::Message(msg) => msg,
        Success::Table {
            header,
            rows,
            footer,
        } => {
            let mut out = table::list(header, rows);
            for line in footer {
                out.push('\n');
                out.push_str(&line);
            }
            out
        }
    }
}

fn configure_logging(verbose: u8, quiet: bool) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::fmt;

    let mut level = match verbose {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    if quiet {
        level = LevelFilter::OFF;
    }

    let mut filter = vec!["off".to_owned()];
    for krate in ["api", "cli", "import", "task"] {
        filter.push(format!("rtd_{krate}={level}"));
    }

    let format = fmt::format().with_target(false).compact();

    if level < LevelFilter::DEBUG {
        tracing_subscriber::fmt()
            .event_format(format)
            .without_time()
            .with_ansi(true)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    } else {
        tracing_subscriber::fmt()
            .event_format(format)
            .with_ansi(true)
            .with_target(false)
            .with_writer(io::stderr)
            .with_env_filter(filter.join(","))
            .init();
    }
}
