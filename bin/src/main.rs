//! tacora CLI - inspect, unpack and merge columnar market-data payloads.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tacora_lib::DisplayZone;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::unpack::UnpackOptions;
use display::{Family, Format};

#[derive(Parser)]
#[command(name = "tacora")]
#[command(about = "Inspect, unpack and merge columnar market-data payloads", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// IANA time zone for rendering and local dates. Defaults to $TZ, then America/New_York.
    #[arg(long, global = true)]
    zone: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show rows, schema version and date range of a payload
    Inspect {
        /// Payload file
        file: PathBuf,

        /// Data family of the payload
        #[arg(long, value_enum)]
        family: Family,
    },

    /// Unpack a payload into one record per row
    Unpack {
        /// Payload file
        file: PathBuf,

        /// Data family of the payload
        #[arg(long, value_enum)]
        family: Family,

        /// Keep rows from this local date (YYYY-MM-DD); candle families only
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Keep rows up to this local date (YYYY-MM-DD); candle families only
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: Format,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file path. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge two non-overlapping candle payloads of the same family
    Combine {
        /// Earlier payload file
        first: PathBuf,

        /// Later payload file
        second: PathBuf,

        /// Data family of both payloads
        #[arg(long, value_enum)]
        family: Family,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Output file path. Defaults to stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Installs the fmt subscriber; `RUST_LOG` overrides the flags.
fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let zone = match cli.zone.as_deref() {
        Some(name) => DisplayZone::new(name).with_context(|| format!("Invalid --zone {name}"))?,
        None => DisplayZone::from_env(),
    };

    match command {
        Commands::Inspect { file, family } => {
            commands::inspect::inspect(&file, family, &zone, std::io::stdout())
        }
        Commands::Unpack {
            file,
            family,
            from,
            to,
            format,
            pretty,
            output,
        } => {
            let options = UnpackOptions {
                format,
                pretty,
                range: display::date_range(&zone, from.as_deref(), to.as_deref())?,
                zone,
            };
            let writer = display::output_writer(output.as_deref())?;
            commands::unpack::unpack(&file, family, &options, writer)
        }
        Commands::Combine {
            first,
            second,
            family,
            pretty,
            output,
        } => {
            let writer = display::output_writer(output.as_deref())?;
            commands::combine::combine(&first, &second, family, pretty, writer)
        }
    }
}
