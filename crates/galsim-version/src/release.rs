//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Release identity triple, its canonical format and compatibility rules."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Decode a Cargo version component at compile time.
///
/// Cargo guarantees the `CARGO_PKG_VERSION_*` values are plain decimal
/// numbers, so a malformed value is a build defect and fails const evaluation.
const fn component(raw: &'static str) -> u32 {
    let bytes = raw.as_bytes();
    assert!(!bytes.is_empty(), "version component is empty");

    let mut pos = 0;
    let mut accum: u32 = 0;
    while pos < bytes.len() {
        let digit = bytes[pos];
        assert!(digit.is_ascii_digit(), "version component is not decimal");
        accum = match accum.checked_mul(10) {
            Some(value) => value,
            None => panic!("version component overflows u32"),
        };
        accum = match accum.checked_add((digit - b'0') as u32) {
            Some(value) => value,
            None => panic!("version component overflows u32"),
        };
        pos += 1;
    }
    accum
}

/// The `(major, minor, revision)` triple identifying a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReleaseIdentity {
    /// Major release number.
    pub major: u32,
    /// Minor release number.
    pub minor: u32,
    /// Patch or revision number.
    pub revision: u32,
}

impl ReleaseIdentity {
    /// The authoritative identity of this build, taken from the package version.
    pub const CURRENT: Self = Self {
        major: component(env!("CARGO_PKG_VERSION_MAJOR")),
        minor: component(env!("CARGO_PKG_VERSION_MINOR")),
        revision: component(env!("CARGO_PKG_VERSION_PATCH")),
    };

    /// Construct an identity from its three components.
    #[must_use]
    pub const fn new(major: u32, minor: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            revision,
        }
    }

    /// Parse the canonical `{major}.{minor}.{revision}` form.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        input.parse()
    }

    /// Convert into a [`semver::Version`] without pre-release or build metadata.
    #[must_use]
    pub fn to_semver(&self) -> Version {
        Version::new(
            u64::from(self.major),
            u64::from(self.minor),
            u64::from(self.revision),
        )
    }

    /// Check the identity against a semver requirement such as `>=1.4, <2`.
    pub fn satisfies(&self, requirement: &str) -> Result<bool, VersionError> {
        let req = VersionReq::parse(requirement).map_err(|source| VersionError::Requirement {
            requirement: requirement.to_owned(),
            source,
        })?;
        Ok(req.matches(&self.to_semver()))
    }

    /// Whether a consumer built against `other` can run against `self`.
    ///
    /// Follows Cargo's caret rules: the left-most non-zero component must
    /// match, and `self` must not be older than `other`.
    #[must_use]
    pub fn is_compatible_with(&self, other: &ReleaseIdentity) -> bool {
        if self < other {
            return false;
        }
        match (other.major, other.minor) {
            (0, 0) => self.major == 0 && self.minor == 0 && self.revision == other.revision,
            (0, minor) => self.major == 0 && self.minor == minor,
            (major, _) => self.major == major,
        }
    }
}

impl fmt::Display for ReleaseIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.revision)
    }
}

impl FromStr for ReleaseIdentity {
    type Err = VersionError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split('.');
        let major = parse_component(input, parts.next(), "major")?;
        let minor = parse_component(input, parts.next(), "minor")?;
        let revision = parse_component(input, parts.next(), "revision")?;
        if parts.next().is_some() {
            return Err(VersionError::parse(
                input,
                "expected exactly three dot-separated components",
            ));
        }
        Ok(Self::new(major, minor, revision))
    }
}

fn parse_component(input: &str, part: Option<&str>, name: &str) -> Result<u32, VersionError> {
    let part = part.ok_or_else(|| VersionError::parse(input, format!("missing {name} component")))?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionError::parse(
            input,
            format!("{name} component must be decimal digits"),
        ));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VersionError::parse(
            input,
            format!("{name} component has a leading zero"),
        ));
    }
    part.parse::<u32>()
        .map_err(|_| VersionError::parse(input, format!("{name} component is out of range")))
}

impl From<ReleaseIdentity> for Version {
    fn from(identity: ReleaseIdentity) -> Self {
        identity.to_semver()
    }
}

impl TryFrom<&Version> for ReleaseIdentity {
    type Error = VersionError;

    fn try_from(version: &Version) -> Result<Self, Self::Error> {
        let text = version.to_string();
        if !version.pre.is_empty() || !version.build.is_empty() {
            return Err(VersionError::parse(
                &text,
                "pre-release and build metadata are not part of a release identity",
            ));
        }
        let narrow = |value: u64, name: &str| {
            u32::try_from(value)
                .map_err(|_| VersionError::parse(&text, format!("{name} component is out of range")))
        };
        Ok(Self::new(
            narrow(version.major, "major")?,
            narrow(version.minor, "minor")?,
            narrow(version.patch, "revision")?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_matches_package_version() {
        assert_eq!(
            ReleaseIdentity::CURRENT.to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn display_has_no_padding() {
        assert_eq!(ReleaseIdentity::new(2, 4, 0).to_string(), "2.4.0");
        assert_eq!(ReleaseIdentity::new(10, 0, 12).to_string(), "10.0.12");
    }

    #[test]
    fn parses_canonical_form() {
        let parsed = ReleaseIdentity::parse("1.5.3").expect("valid version");
        assert_eq!(parsed, ReleaseIdentity::new(1, 5, 3));
        assert_eq!(
            ReleaseIdentity::parse("0.0.0").expect("zeros are valid"),
            ReleaseIdentity::new(0, 0, 0)
        );
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in [
            "", "1", "1.5", "1.5.3.0", "01.5.3", "1.05.3", "1.5.03", "1.5.3-rc1", "1.5.3+abc",
            " 1.5.3", "1.5.3 ", "a.b.c", "-1.5.3", "+1.5.3", "1..3", "4294967296.0.0",
        ] {
            assert!(
                ReleaseIdentity::parse(input).is_err(),
                "'{input}' should be rejected"
            );
        }
    }

    #[test]
    fn parse_error_names_the_component() {
        let err = ReleaseIdentity::parse("1.x.3").expect_err("minor is not numeric");
        assert!(err.to_string().contains("minor"));
    }

    #[test]
    fn requirement_matching() {
        let identity = ReleaseIdentity::new(1, 5, 3);
        assert!(identity.satisfies(">=1.4, <2").expect("valid requirement"));
        assert!(identity.satisfies("^1.5").expect("valid requirement"));
        assert!(!identity.satisfies(">=1.6").expect("valid requirement"));
        assert!(identity.satisfies("not a requirement").is_err());
    }

    #[test]
    fn caret_compatibility() {
        let running = ReleaseIdentity::new(1, 5, 3);
        assert!(running.is_compatible_with(&ReleaseIdentity::new(1, 0, 0)));
        assert!(running.is_compatible_with(&ReleaseIdentity::new(1, 5, 3)));
        assert!(!running.is_compatible_with(&ReleaseIdentity::new(1, 6, 0)));
        assert!(!running.is_compatible_with(&ReleaseIdentity::new(0, 9, 0)));

        let early = ReleaseIdentity::new(0, 4, 2);
        assert!(early.is_compatible_with(&ReleaseIdentity::new(0, 4, 0)));
        assert!(!early.is_compatible_with(&ReleaseIdentity::new(0, 3, 0)));

        let seed = ReleaseIdentity::new(0, 0, 7);
        assert!(seed.is_compatible_with(&ReleaseIdentity::new(0, 0, 7)));
        assert!(!seed.is_compatible_with(&ReleaseIdentity::new(0, 0, 6)));
    }

    #[test]
    fn semver_conversion_rejects_prerelease() {
        let plain = Version::parse("2.4.0").expect("valid semver");
        assert_eq!(
            ReleaseIdentity::try_from(&plain).expect("plain release"),
            ReleaseIdentity::new(2, 4, 0)
        );
        let pre = Version::parse("2.4.0-beta.1").expect("valid semver");
        assert!(ReleaseIdentity::try_from(&pre).is_err());
        let wide = Version::new(u64::from(u32::MAX) + 1, 0, 0);
        assert!(ReleaseIdentity::try_from(&wide).is_err());
    }
}
