//! ---
//! gs_section: "04-cli"
//! gs_subsection: "binary"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Command line access to the release identity."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, ValueEnum};
use galsim_version::{BuildInfo, ReleaseIdentity};
use serde::Serialize;

/// Single value printed by `show --field`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Field {
    Major,
    Minor,
    Revision,
    String,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Emit the identity and build metadata as JSON.
    #[arg(long, conflicts_with = "field")]
    pub json: bool,
    /// Print only one component.
    #[arg(long, value_enum)]
    pub field: Option<Field>,
}

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Version string to validate.
    pub input: String,
    /// Emit the components as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct ShowOutput<'a> {
    major: u32,
    minor: u32,
    revision: u32,
    version: &'a str,
    build: BuildInfo,
}

pub fn show(args: &ShowArgs) -> Result<ExitCode> {
    if let Some(field) = args.field {
        match field {
            Field::Major => println!("{}", galsim_version::major_version()),
            Field::Minor => println!("{}", galsim_version::minor_version()),
            Field::Revision => println!("{}", galsim_version::revision()),
            Field::String => println!("{}", galsim_version::version()),
        }
        return Ok(ExitCode::SUCCESS);
    }

    if args.json {
        let output = ShowOutput {
            major: galsim_version::major_version(),
            minor: galsim_version::minor_version(),
            revision: galsim_version::revision(),
            version: galsim_version::version(),
            build: BuildInfo::current(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", galsim_version::version());
    }
    Ok(ExitCode::SUCCESS)
}

pub fn parse(args: &ParseArgs) -> Result<ExitCode> {
    let identity = ReleaseIdentity::parse(&args.input)?;
    if args.json {
        println!("{}", serde_json::to_string(&identity)?);
    } else {
        println!(
            "major={} minor={} revision={}",
            identity.major, identity.minor, identity.revision
        );
    }
    Ok(ExitCode::SUCCESS)
}
