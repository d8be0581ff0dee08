//! ---
//! gs_section: "02-logging"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Structured logging adapters and sinks."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Tracing setup and structured logging helpers shared by GalSim tooling.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::daily;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Registry;

pub mod macros;

/// Environment variable holding a filter directive that overrides `RUST_LOG`.
pub const LOG_ENV: &str = "GALSIM_LOG";

/// Initialize a baseline tracing subscriber suitable for development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(fmt::layer())
        .try_init();
}

/// Output format of the console sink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    StructuredJson,
    /// Human readable multi-field lines.
    Pretty,
}

/// Stream receiving the console sink.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogStream {
    /// Buffered through a background writer.
    #[default]
    Stdout,
    /// Written synchronously; keeps stdout free for command output.
    Stderr,
}

/// Logging section of the application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Format of the console sink.
    #[serde(default)]
    pub format: LogFormat,
    /// Stream of the console sink.
    #[serde(default)]
    pub stream: LogStream,
    /// Directory for the daily rolling log file. No file sink when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// File name prefix, defaulting to the service name.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

fn env_filter() -> EnvFilter {
    match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); defaulting to info logging",
                LOG_ENV, err
            );
            EnvFilter::new("info")
        }),
        Err(_) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Flushes the background log writers when dropped.
///
/// Hold it until the process is about to exit; events still buffered when it
/// is dropped are written out first.
#[must_use = "dropping the guard stops the background log writers"]
#[derive(Debug, Default)]
pub struct LoggingGuard {
    _console: Option<WorkerGuard>,
    file: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a rolling file sink is attached.
    pub fn has_file_sink(&self) -> bool {
        self.file.is_some()
    }
}

/// Assemble the subscriber described by `config` without installing it.
///
/// The console sink uses [`LoggingConfig::format`] on [`LoggingConfig::stream`].
/// A JSON daily rolling file named `{prefix}.log.<date>` is added when
/// [`LoggingConfig::directory`] is set.
pub fn build_subscriber(
    service_name: &str,
    config: &LoggingConfig,
) -> Result<(impl tracing::Subscriber + Send + Sync + 'static, LoggingGuard)> {
    let mut guard = LoggingGuard::default();

    let console_writer = match config.stream {
        LogStream::Stdout => {
            let (writer, worker) = tracing_appender::non_blocking(std::io::stdout());
            guard._console = Some(worker);
            BoxMakeWriter::new(writer)
        }
        LogStream::Stderr => BoxMakeWriter::new(std::io::stderr),
    };

    let console_layer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .json()
            .with_writer(console_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(console_writer)
            .boxed(),
    };

    let file_layer = match &config.directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).with_context(|| {
                format!("unable to create log directory {}", directory.display())
            })?;
            let prefix = config.file_prefix.as_deref().unwrap_or(service_name);
            let appender = daily(directory, format!("{prefix}.log"));
            let (file_writer, worker) = tracing_appender::non_blocking(appender);
            guard.file = Some(worker);
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .json()
                    .with_writer(file_writer)
                    .boxed(),
            )
        }
        None => None,
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(console_layer)
        .with(file_layer);
    Ok((subscriber, guard))
}

/// Initialize the tracing subscriber based on configuration and environment variables.
///
/// * `GALSIM_LOG` overrides the log filter (e.g. `info`, `debug,galsim_version=trace`).
///   When unset `RUST_LOG` is honoured, finally defaulting to `info`.
/// * Sinks are those of [`build_subscriber`].
///
/// A subscriber that is already installed is left in place. The returned
/// guard must outlive every event that should reach the sinks.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let (subscriber, guard) = build_subscriber(service_name, config)?;
    subscriber.try_init().ok();

    debug!(
        service = %service_name,
        format = ?config.format,
        stream = ?config.stream,
        file_sink = guard.has_file_sink(),
        "tracing initialised"
    );
    Ok(guard)
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Component emitting the event (library, CLI, embedder).
    pub component: Option<&'a str>,
    /// Release identity the event relates to.
    pub release: Option<&'a str>,
    /// Name of the check or command being run.
    pub check: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a component name.
    pub fn with_component(mut self, component: &'a str) -> Self {
        self.component = Some(component);
        self
    }

    /// Attach a release identity.
    pub fn with_release(mut self, release: &'a str) -> Self {
        self.release = Some(release);
        self
    }

    /// Attach a check or command name.
    pub fn with_check(mut self, check: &'a str) -> Self {
        self.check = Some(check);
        self
    }
}

/// High-level outcome used when emitting lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEventOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation failed or was aborted.
    Fault,
}

impl SystemEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            SystemEventOutcome::Success => "success",
            SystemEventOutcome::Fault => "fault",
        }
    }
}

/// Emit a standardized system event with a success/fault outcome.
pub fn log_system_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: SystemEventOutcome,
) {
    let default = LogContext::default();
    let ctx = context.unwrap_or(&default);
    match outcome {
        SystemEventOutcome::Success => tracing::info!(
            event,
            outcome = outcome.as_str(),
            component = ctx.component.unwrap_or(""),
            release = ctx.release.unwrap_or(""),
            check = ctx.check.unwrap_or(""),
            message = %message
        ),
        SystemEventOutcome::Fault => tracing::error!(
            event,
            outcome = outcome.as_str(),
            component = ctx.component.unwrap_or(""),
            release = ctx.release.unwrap_or(""),
            check = ctx.check.unwrap_or(""),
            message = %message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new()
            .with_component("galsim-version")
            .with_release("1.5.3");
        gs_info!(context = ctx.clone(), "release identity loaded");
        gs_debug!("debug message");
        gs_warn!(context = ctx.clone().with_check("consistency"), "drift on {}", "minor");
        gs_error!(context = ctx, "error code: {}", 42);
    }

    #[test]
    fn system_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_check("startup");
        log_system_event(
            Some(&ctx),
            "version.check",
            "release identity consistent",
            SystemEventOutcome::Success,
        );
        log_system_event(
            None,
            "version.check",
            "release identity mismatch",
            SystemEventOutcome::Fault,
        );
    }

    fn log_files(dir: &std::path::Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir)
            .expect("log directory")
            .map(|entry| entry.expect("dir entry").path())
            .collect()
    }

    #[test]
    fn init_tracing_creates_log_directory() {
        let dir = tempfile::tempdir().expect("temp dir");
        let logs = dir.path().join("logs");
        let config = LoggingConfig {
            format: LogFormat::Pretty,
            stream: LogStream::Stderr,
            directory: Some(logs.clone()),
            file_prefix: Some("test".to_owned()),
        };
        let guard = init_tracing("galsim-logging", &config).expect("tracing init");
        assert!(logs.is_dir());
        assert!(guard.has_file_sink());
        let second = init_tracing("galsim-logging", &LoggingConfig::default())
            .expect("second init is a no-op");
        assert!(!second.has_file_sink());
    }

    #[test]
    fn file_sink_is_flushed_when_guard_drops() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = LoggingConfig {
            format: LogFormat::StructuredJson,
            stream: LogStream::Stderr,
            directory: Some(dir.path().to_path_buf()),
            file_prefix: None,
        };
        let (subscriber, guard) = build_subscriber("galsimctl", &config).expect("subscriber");
        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(event = "version.requirement", "release does not satisfy requirement");
        });
        drop(guard);

        let files = log_files(dir.path());
        assert_eq!(files.len(), 1);
        let name = files[0]
            .file_name()
            .and_then(|n| n.to_str())
            .expect("utf8 file name");
        assert!(name.starts_with("galsimctl.log"), "unexpected log file {name}");
        let contents = std::fs::read_to_string(&files[0]).expect("read log file");
        assert!(!contents.is_empty());
        assert!(contents.contains("version.requirement"));
    }

    #[test]
    fn log_format_uses_kebab_case() {
        let config: LoggingConfig =
            toml::from_str("format = \"structured-json\"").expect("valid logging section");
        assert_eq!(config.format, LogFormat::StructuredJson);
        let config: LoggingConfig = toml::from_str("format = \"pretty\"").expect("pretty");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.directory.is_none());
        assert_eq!(config.stream, LogStream::Stdout);
        let config: LoggingConfig = toml::from_str("stream = \"stderr\"").expect("stderr");
        assert_eq!(config.stream, LogStream::Stderr);
    }
}
