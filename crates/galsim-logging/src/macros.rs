//! ---
//! gs_section: "02-logging"
//! gs_subsection: "module"
//! gs_type: "source"
//! gs_scope: "code"
//! gs_description: "Structured logging adapters and sinks."
//! gs_version: "v0.0.0-prealpha"
//! gs_owner: "tbd"
//! ---
//! Logging macros that attach a [`crate::LogContext`] to every event.

#[doc(hidden)]
#[macro_export]
macro_rules! __gs_event {
    ($level:expr, context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            $level,
            component = ctx.component.unwrap_or(""),
            release = ctx.release.unwrap_or(""),
            check = ctx.check.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($level:expr, $($arg:tt)+) => {
        $crate::__gs_event!($level, context = $crate::LogContext::default(), $($arg)+)
    };
}

/// Emit an informational log enriched with release context.
#[macro_export]
macro_rules! gs_info {
    ($($arg:tt)+) => {
        $crate::__gs_event!(tracing::Level::INFO, $($arg)+)
    };
}

/// Emit a debug log enriched with release context.
#[macro_export]
macro_rules! gs_debug {
    ($($arg:tt)+) => {
        $crate::__gs_event!(tracing::Level::DEBUG, $($arg)+)
    };
}

/// Emit a warning enriched with release context.
#[macro_export]
macro_rules! gs_warn {
    ($($arg:tt)+) => {
        $crate::__gs_event!(tracing::Level::WARN, $($arg)+)
    };
}

/// Emit an error log enriched with release context.
#[macro_export]
macro_rules! gs_error {
    ($($arg:tt)+) => {
        $crate::__gs_event!(tracing::Level::ERROR, $($arg)+)
    };
}
