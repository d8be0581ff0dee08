//! ---
//! gs_section: "03-configuration"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Configuration loading and validation."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use galsim_logging::LoggingConfig;
use galsim_version::{MismatchPolicy, ReleaseIdentity};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default locations inspected when no explicit path is given.
pub const DEFAULT_CANDIDATES: &[&str] = &["galsim.toml", "configs/galsim.toml"];

/// Primary configuration object for GalSim tooling.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub version: VersionConfig,
}

/// Release identity policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionConfig {
    /// What to do when the startup consistency check fails.
    #[serde(default)]
    pub on_mismatch: MismatchPolicy,
    /// Semver requirement the running release must satisfy, e.g. `>=1.4, <2`.
    #[serde(default)]
    pub require: Option<String>,
}

impl VersionConfig {
    /// Whether `release` satisfies the configured requirement. No requirement always passes.
    pub fn accepts(&self, release: &ReleaseIdentity) -> Result<bool> {
        match &self.require {
            Some(requirement) => Ok(release.satisfies(requirement)?),
            None => Ok(true),
        }
    }
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &'static str = "GALSIM_CONFIG";

    /// Load configuration from disk, respecting the `GALSIM_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// `GALSIM_CONFIG` must point at a readable file when set. Otherwise the
    /// first existing candidate wins, and defaults apply when none exists.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            let path = candidate.as_ref();
            if path.exists() {
                let config = Self::from_path(path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path.to_path_buf()),
                });
            }
        }

        debug!("no configuration file found; using defaults");
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    /// Load and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse()
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        if let Some(requirement) = &self.version.require {
            ReleaseIdentity::CURRENT
                .satisfies(requirement)
                .map_err(|err| anyhow!("version.require is invalid: {err}"))?;
        }
        if let Some(prefix) = &self.logging.file_prefix {
            if prefix.trim().is_empty() || prefix.contains(['/', '\\']) {
                return Err(anyhow!(
                    "logging.file_prefix must be a non-empty file name, got '{prefix}'"
                ));
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}
