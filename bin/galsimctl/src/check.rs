//! ---
//! gs_section: "04-cli"
//! gs_subsection: "binary"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Consistency and compatibility commands."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use galsim_config::AppConfig;
use galsim_logging::{gs_debug, log_system_event, LogContext, SystemEventOutcome};
use galsim_version::{
    check_consistency, enforce, CompiledRelease, ConsistencyReport, MismatchPolicy,
    ReleaseIdentity, VersionError, MAJOR, MINOR, REVISION,
};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Override the configured mismatch policy (abort or warn).
    #[arg(long, value_name = "POLICY")]
    pub policy: Option<MismatchPolicy>,
    /// Emit the consistency report as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct RequireArgs {
    /// Semver requirement, e.g. ">=1.4, <2".
    pub requirement: String,
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    policy: MismatchPolicy,
    #[serde(flatten)]
    report: &'a ConsistencyReport,
}

/// `--policy` wins over the configured `on_mismatch`.
fn effective_policy(args: &CheckArgs, config: &AppConfig) -> MismatchPolicy {
    args.policy.unwrap_or(config.version.on_mismatch)
}

pub fn run(args: &CheckArgs, config: &AppConfig) -> Result<ExitCode> {
    let policy = effective_policy(args, config);
    let release = galsim_version::version();
    let ctx = LogContext::new()
        .with_component("galsimctl")
        .with_release(release)
        .with_check("consistency");

    let expected = ReleaseIdentity::new(MAJOR, MINOR, REVISION);
    let (report, mut healthy) = match enforce(policy, check_consistency(expected, &CompiledRelease))
    {
        Ok(report) => (report, true),
        Err(VersionError::Inconsistent(report)) => (report, false),
        Err(other) => return Err(other.into()),
    };
    render(&report, policy, args.json)?;

    if !report.is_consistent() {
        log_system_event(
            Some(&ctx),
            "version.consistency",
            &report.to_string(),
            SystemEventOutcome::Fault,
        );
    }

    if !config.version.accepts(&expected)? {
        let requirement = config.version.require.as_deref().unwrap_or_default();
        log_system_event(
            Some(&ctx.clone().with_check("requirement")),
            "version.requirement",
            &format!("release {release} does not satisfy {requirement}"),
            SystemEventOutcome::Fault,
        );
        eprintln!("release {release} does not satisfy configured requirement {requirement}");
        healthy = false;
    }

    gs_debug!(context = ctx, "consistency check finished under {} policy", policy);
    Ok(if healthy {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn render(report: &ConsistencyReport, policy: MismatchPolicy, json: bool) -> Result<()> {
    if json {
        let output = CheckOutput { policy, report };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if report.is_consistent() {
        println!("consistent: {}", report.expected);
    } else {
        println!("inconsistent: {report}");
    }
    Ok(())
}

pub fn require(args: &RequireArgs) -> Result<ExitCode> {
    if ReleaseIdentity::CURRENT.satisfies(&args.requirement)? {
        println!("ok");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("unsatisfied");
        Ok(ExitCode::FAILURE)
    }
}
