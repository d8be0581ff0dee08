//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Caller-side policy for acting on an inconsistent release identity."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::check::{check_consistency, CompiledRelease, ConsistencyReport};
use crate::error::VersionError;
use crate::release::ReleaseIdentity;

/// What a caller does when the startup check finds a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchPolicy {
    /// Refuse to continue initialisation.
    #[default]
    Abort,
    /// Log every mismatch and carry on.
    Warn,
}

impl MismatchPolicy {
    fn as_str(&self) -> &'static str {
        match self {
            MismatchPolicy::Abort => "abort",
            MismatchPolicy::Warn => "warn",
        }
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MismatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(MismatchPolicy::Abort),
            "warn" => Ok(MismatchPolicy::Warn),
            other => Err(format!(
                "unknown mismatch policy '{other}' (expected 'abort' or 'warn')"
            )),
        }
    }
}

/// Apply `policy` to a consistency report.
///
/// Returns the report when the caller may continue.
pub fn enforce(
    policy: MismatchPolicy,
    report: ConsistencyReport,
) -> Result<ConsistencyReport, VersionError> {
    if report.is_consistent() {
        debug!(release = %report.expected, "release identity consistent");
        return Ok(report);
    }
    match policy {
        MismatchPolicy::Abort => Err(VersionError::Inconsistent(report)),
        MismatchPolicy::Warn => {
            for mismatch in &report.mismatches {
                warn!(
                    field = %mismatch.field,
                    expected = %mismatch.expected,
                    reported = %mismatch.reported,
                    "release identity mismatch"
                );
            }
            Ok(report)
        }
    }
}

/// Run the in-process consistency check and apply `policy` to the result.
///
/// Intended for process start, before anything depends on the release identity.
pub fn startup_check(policy: MismatchPolicy) -> Result<ConsistencyReport, VersionError> {
    let expected = ReleaseIdentity::new(crate::MAJOR, crate::MINOR, crate::REVISION);
    enforce(policy, check_consistency(expected, &CompiledRelease))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drifted() -> ConsistencyReport {
        check_consistency(ReleaseIdentity::new(1, 5, 3), &ReleaseIdentity::new(1, 6, 3))
    }

    #[test]
    fn abort_rejects_mismatch() {
        let err = enforce(MismatchPolicy::Abort, drifted()).expect_err("mismatch aborts");
        assert!(matches!(err, VersionError::Inconsistent(_)));
        assert!(err.to_string().contains("minor expected 5 but reported 6"));
    }

    #[test]
    fn warn_continues_with_report() {
        let report = enforce(MismatchPolicy::Warn, drifted()).expect("warn continues");
        assert!(!report.is_consistent());
    }

    #[test]
    fn startup_check_passes_for_this_build() {
        let report = startup_check(MismatchPolicy::Abort).expect("consistent build");
        assert!(report.is_consistent());
    }

    #[test]
    fn policy_parses_case_insensitively() {
        assert_eq!("ABORT".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Abort));
        assert_eq!("warn".parse::<MismatchPolicy>(), Ok(MismatchPolicy::Warn));
        assert!("ignore".parse::<MismatchPolicy>().is_err());
        assert_eq!(MismatchPolicy::default().to_string(), "abort");
    }
}
