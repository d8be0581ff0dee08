//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Consistency checks between the authoritative identity and reported values."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::fmt;

use serde::Serialize;

use crate::release::ReleaseIdentity;

/// Anything able to report a release identity through the four access paths.
///
/// [`CompiledRelease`] is the implementation backed by this library's
/// accessors. Embedders that load a release identity from elsewhere (a plugin,
/// a shared object, a packaged manifest) implement this to run the same check.
pub trait VersionSource {
    /// Reported major version.
    fn major_version(&self) -> u32;
    /// Reported minor version.
    fn minor_version(&self) -> u32;
    /// Reported revision number.
    fn revision(&self) -> u32;
    /// Reported formatted version string.
    fn version(&self) -> String;
}

/// The identity compiled into this library.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompiledRelease;

impl VersionSource for CompiledRelease {
    fn major_version(&self) -> u32 {
        crate::major_version()
    }

    fn minor_version(&self) -> u32 {
        crate::minor_version()
    }

    fn revision(&self) -> u32 {
        crate::revision()
    }

    fn version(&self) -> String {
        crate::version().to_owned()
    }
}

impl VersionSource for ReleaseIdentity {
    fn major_version(&self) -> u32 {
        self.major
    }

    fn minor_version(&self) -> u32 {
        self.minor
    }

    fn revision(&self) -> u32 {
        self.revision
    }

    fn version(&self) -> String {
        self.to_string()
    }
}

/// Access path that disagreed with the expected identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionField {
    /// `major_version()`.
    Major,
    /// `minor_version()`.
    Minor,
    /// `revision()`.
    Revision,
    /// `version()`.
    VersionString,
}

impl VersionField {
    /// Stable lowercase name used in logs and reports.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionField::Major => "major",
            VersionField::Minor => "minor",
            VersionField::Revision => "revision",
            VersionField::VersionString => "version-string",
        }
    }
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One disagreement between the expected identity and a reported value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMismatch {
    /// Which access path disagreed.
    pub field: VersionField,
    /// Value derived from the authoritative identity.
    pub expected: String,
    /// Value reported by the source.
    pub reported: String,
}

/// Outcome of comparing a [`VersionSource`] against an expected identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// The identity the source was checked against.
    pub expected: ReleaseIdentity,
    /// Every access path that disagreed, in field order.
    pub mismatches: Vec<FieldMismatch>,
}

impl ConsistencyReport {
    /// True when every access path agreed.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Look up the mismatch recorded for a field, if any.
    #[must_use]
    pub fn mismatch(&self, field: VersionField) -> Option<&FieldMismatch> {
        self.mismatches.iter().find(|m| m.field == field)
    }
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_consistent() {
            return write!(f, "consistent with {}", self.expected);
        }
        for (idx, mismatch) in self.mismatches.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            write!(
                f,
                "{} expected {} but reported {}",
                mismatch.field, mismatch.expected, mismatch.reported
            )?;
        }
        Ok(())
    }
}

/// Compare every access path of `source` against `expected`.
///
/// Never fails: disagreement is a build or packaging defect and is only
/// reported. Callers decide whether it is fatal.
pub fn check_consistency<S>(expected: ReleaseIdentity, source: &S) -> ConsistencyReport
where
    S: VersionSource + ?Sized,
{
    let mut mismatches = Vec::new();
    let mut compare = |field: VersionField, expected: String, reported: String| {
        if expected != reported {
            mismatches.push(FieldMismatch {
                field,
                expected,
                reported,
            });
        }
    };

    compare(
        VersionField::Major,
        expected.major.to_string(),
        source.major_version().to_string(),
    );
    compare(
        VersionField::Minor,
        expected.minor.to_string(),
        source.minor_version().to_string(),
    );
    compare(
        VersionField::Revision,
        expected.revision.to_string(),
        source.revision().to_string(),
    );
    compare(VersionField::VersionString, expected.to_string(), source.version());

    ConsistencyReport {
        expected,
        mismatches,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A source whose formatted string drifted away from its numeric fields.
    struct StaleString;

    impl VersionSource for StaleString {
        fn major_version(&self) -> u32 {
            1
        }

        fn minor_version(&self) -> u32 {
            5
        }

        fn revision(&self) -> u32 {
            3
        }

        fn version(&self) -> String {
            "1.5.2".to_owned()
        }
    }

    #[test]
    fn matching_source_is_consistent() {
        let expected = ReleaseIdentity::new(1, 5, 3);
        let report = check_consistency(expected, &ReleaseIdentity::new(1, 5, 3));
        assert!(report.is_consistent());
        assert_eq!(report.to_string(), "consistent with 1.5.3");
    }

    #[test]
    fn minor_drift_is_reported() {
        let expected = ReleaseIdentity::new(1, 5, 3);
        let report = check_consistency(expected, &ReleaseIdentity::new(1, 6, 3));
        assert!(!report.is_consistent());

        let minor = report.mismatch(VersionField::Minor).expect("minor mismatch");
        assert_eq!(minor.expected, "5");
        assert_eq!(minor.reported, "6");
        assert!(report.mismatch(VersionField::Major).is_none());
        assert!(report.mismatch(VersionField::VersionString).is_some());
    }

    #[test]
    fn string_drift_alone_is_reported() {
        let report = check_consistency(ReleaseIdentity::new(1, 5, 3), &StaleString);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].field, VersionField::VersionString);
        assert_eq!(
            report.to_string(),
            "version-string expected 1.5.3 but reported 1.5.2"
        );
    }

    #[test]
    fn compiled_release_matches_current() {
        let report = check_consistency(ReleaseIdentity::CURRENT, &CompiledRelease);
        assert!(report.is_consistent(), "{report}");
    }

    #[test]
    fn report_serializes_field_names() {
        let report = check_consistency(ReleaseIdentity::new(2, 0, 0), &ReleaseIdentity::new(3, 0, 0));
        let json = serde_json::to_value(&report).expect("serializable report");
        assert_eq!(json["mismatches"][0]["field"], "major");
        assert_eq!(json["expected"]["major"], 2);
    }
}
