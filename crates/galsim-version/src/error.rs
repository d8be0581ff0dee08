//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Error types for release identity parsing and enforcement."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use thiserror::Error;

use crate::check::ConsistencyReport;

/// Errors raised by the parsing, compatibility and enforcement helpers.
///
/// The consistency check itself never fails; it only reports. An
/// [`VersionError::Inconsistent`] value is produced solely by
/// [`crate::guard::enforce`] when the caller asked for mismatches to abort.
#[derive(Debug, Error)]
pub enum VersionError {
    /// A version string did not match the `{major}.{minor}.{revision}` format.
    #[error("invalid version string '{input}': {reason}")]
    Parse {
        /// The rejected input.
        input: String,
        /// Human readable description of the defect.
        reason: String,
    },
    /// A semver requirement could not be parsed.
    #[error("invalid version requirement '{requirement}': {source}")]
    Requirement {
        /// The rejected requirement text.
        requirement: String,
        /// Underlying semver parser error.
        #[source]
        source: semver::Error,
    },
    /// The release identity disagreed with its authoritative definition.
    #[error("release identity is inconsistent: {0}")]
    Inconsistent(ConsistencyReport),
}

impl VersionError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_owned(),
            reason: reason.into(),
        }
    }
}
