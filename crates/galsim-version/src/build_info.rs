//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Build metadata captured at compile time."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use serde::Serialize;

use crate::release::ReleaseIdentity;

const UNKNOWN: &str = "UNKNOWN";

/// Compile-time build metadata captured via `vergen`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    /// Release identity of the build.
    pub release: ReleaseIdentity,
    /// Git commit hash captured at build time.
    pub git_sha: String,
    /// Build timestamp from the compilation environment.
    pub build_timestamp: String,
    /// Target triple used for the build.
    pub target: String,
    /// Cargo profile used during compilation.
    pub profile: String,
}

impl BuildInfo {
    /// Construct a new [`BuildInfo`] instance using environment metadata.
    #[must_use]
    pub fn current() -> Self {
        let profile = match option_env!("VERGEN_CARGO_DEBUG") {
            Some("true") => "debug",
            Some("false") => "release",
            _ => UNKNOWN,
        };
        Self {
            release: ReleaseIdentity::CURRENT,
            git_sha: option_env!("VERGEN_GIT_SHA").unwrap_or(UNKNOWN).to_owned(),
            build_timestamp: option_env!("VERGEN_BUILD_TIMESTAMP")
                .unwrap_or(UNKNOWN)
                .to_owned(),
            target: option_env!("VERGEN_CARGO_TARGET_TRIPLE")
                .unwrap_or(UNKNOWN)
                .to_owned(),
            profile: profile.to_owned(),
        }
    }

    /// Human readable banner used in logging surfaces.
    #[must_use]
    pub fn banner(&self) -> String {
        format!("GalSim v{} (git {})", self.release, self.git_sha)
    }

    /// Extended string containing build metadata suitable for `--version` flags.
    #[must_use]
    pub fn extended(&self) -> String {
        format!(
            "{banner}\nBuilt: {built}\nTarget: {target}\nProfile: {profile}",
            banner = self.banner(),
            built = self.build_timestamp,
            target = self.target,
            profile = self.profile
        )
    }
}

/// Helper for Clap commands to print the extended version string.
#[must_use]
pub fn clap_long_version() -> String {
    BuildInfo::current().extended()
}
