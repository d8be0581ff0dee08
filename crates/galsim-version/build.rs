//! ---
//! gs_section: "01-release-identity"
//! gs_subsection: "build"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Build script capturing build metadata for the release identity."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Source tarballs carry no git metadata; vergen falls back to defaults
    // instead of failing the build.
    EmitBuilder::builder()
        .all_build()
        .all_cargo()
        .all_git()
        .emit()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
