#![deny(missing_docs)]
//! Shared logging utilities for the YCSA workspace.
//!
//! This crate provides the `ycsa_*` logging macros used across the codebase,
//! a minimal test initializer for the global logger, and a helper that keeps
//! the platform API key out of log lines.

/// Placeholder written in place of a credential.
pub const REDACTED: &str = "REDACTED";

/// Query parameters whose values are credentials.
const SECRET_PARAMS: &[&str] = &["key", "access_token"];

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! ycsa_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! ycsa_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! ycsa_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! ycsa_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! ycsa_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Returns `url` with the values of credential query parameters replaced.
///
/// Everything else, including parameter order, is left untouched so the
/// result still identifies the request in a log line.
pub fn redact_api_key(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let (query, fragment) = match query.split_once('#') {
        Some((query, fragment)) => (query, Some(fragment)),
        None => (query, None),
    };

    let redacted = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if SECRET_PARAMS.contains(&name) => format!("{name}={REDACTED}"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    match fragment {
        Some(fragment) => format!("{base}?{redacted}#{fragment}"),
        None => format!("{base}?{redacted}"),
    }
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    // Use debug level in debug builds, info in release builds.
    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Ignore the error if a logger was already set by another test.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
