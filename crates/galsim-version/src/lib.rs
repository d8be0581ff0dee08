//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Release identity accessors and consistency checks."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Release identity for GalSim builds.
//!
//! The package version is the single source of truth. The [`MAJOR`],
//! [`MINOR`] and [`REVISION`] constants are inlined into dependents when they
//! compile, while [`major_version`], [`minor_version`], [`revision`] and
//! [`version`] are answered by this library at run time. [`check_version`]
//! and the [`check_version!`] macro confirm both views agree.

use once_cell::sync::Lazy;

pub mod build_info;
pub mod check;
pub mod error;
pub mod guard;
pub mod release;

pub use build_info::{clap_long_version, BuildInfo};
pub use check::{
    check_consistency, CompiledRelease, ConsistencyReport, FieldMismatch, VersionField,
    VersionSource,
};
pub use error::VersionError;
pub use guard::{enforce, startup_check, MismatchPolicy};
pub use release::ReleaseIdentity;

/// Major release number, fixed at compile time.
pub const MAJOR: u32 = ReleaseIdentity::CURRENT.major;
/// Minor release number, fixed at compile time.
pub const MINOR: u32 = ReleaseIdentity::CURRENT.minor;
/// Revision number, fixed at compile time.
pub const REVISION: u32 = ReleaseIdentity::CURRENT.revision;

static VERSION_STRING: Lazy<String> =
    Lazy::new(|| format!("{}.{}.{}", major_version(), minor_version(), revision()));

/// Major release number reported by the library.
#[inline(never)]
#[must_use]
pub fn major_version() -> u32 {
    ReleaseIdentity::CURRENT.major
}

/// Minor release number reported by the library.
#[inline(never)]
#[must_use]
pub fn minor_version() -> u32 {
    ReleaseIdentity::CURRENT.minor
}

/// Revision number reported by the library.
#[inline(never)]
#[must_use]
pub fn revision() -> u32 {
    ReleaseIdentity::CURRENT.revision
}

/// The release as `"{major}.{minor}.{revision}"`.
#[must_use]
pub fn version() -> &'static str {
    VERSION_STRING.as_str()
}

/// True iff every accessor and the formatted string agree with the
/// compile-time constants.
#[must_use]
pub fn check_version() -> bool {
    check_consistency(ReleaseIdentity::new(MAJOR, MINOR, REVISION), &CompiledRelease)
        .is_consistent()
}

/// Inline form of [`check_version`].
///
/// Expands in the calling crate, so the constants are the values the caller
/// was compiled against while the accessors answer from the linked library.
#[macro_export]
macro_rules! check_version {
    () => {
        $crate::check_consistency(
            $crate::ReleaseIdentity::new($crate::MAJOR, $crate::MINOR, $crate::REVISION),
            &$crate::CompiledRelease,
        )
        .is_consistent()
    };
}
