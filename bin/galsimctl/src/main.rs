//! ---
//! gs_section: "04-cli"
//! gs_subsection: "binary"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Command line access to the release identity."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use galsim_config::{AppConfig, DEFAULT_CANDIDATES};
use galsim_logging::{self as logging, LogStream};
use galsim_version::clap_long_version;

mod check;
mod identity;

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    about = "GalSim release identity utility",
    long_about = None
)]
struct Cli {
    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print extended version information and exit"
    )]
    version: bool,
    #[arg(long, global = true, value_name = "FILE", help = "Configuration file to load")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Print the release identity")]
    Show(identity::ShowArgs),
    #[command(about = "Validate a version string in major.minor.revision form")]
    Parse(identity::ParseArgs),
    #[command(about = "Check that every access path reports the same release")]
    Check(check::CheckArgs),
    #[command(about = "Check the release against a semver requirement")]
    Require(check::RequireArgs),
}

fn load_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    match explicit {
        Some(path) => AppConfig::from_path(path),
        None => AppConfig::load(DEFAULT_CANDIDATES),
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", clap_long_version());
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(cli.config.as_ref())?;
    // stdout carries command output.
    let mut logging_config = config.logging.clone();
    logging_config.stream = LogStream::Stderr;
    let _guard = logging::init_tracing("galsimctl", &logging_config)?;

    match cli.command {
        Some(Commands::Show(args)) => identity::show(&args),
        Some(Commands::Parse(args)) => identity::parse(&args),
        Some(Commands::Check(args)) => check::run(&args, &config),
        Some(Commands::Require(args)) => check::require(&args),
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
