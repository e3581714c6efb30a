//! Logging for tplfactory.
//!
//! The dispatcher, resolver, engines and hooks emit [`tracing`] events. This
//! module installs the subscriber that prints them and provides the span every
//! dispatch runs in, so a log line can be traced back to its request and page
//! template.

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Installs the process-wide subscriber for the factory's log output.
///
/// `settings.log_level` is an `EnvFilter` directive such as `"debug"` or
/// `"info,tplfactory_dispatch=trace"`; an unparsable directive falls back to
/// `info`. With `settings.debug` on, output is pretty-printed with source
/// locations. Otherwise each event is one JSON line.
///
/// Returns `false` if a subscriber was already installed, in which case the
/// existing one is kept.
pub fn setup_logging(settings: &Settings) -> bool {
    use tracing_subscriber::fmt;

    let filter = log_filter(settings);
    let installed = if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
    };
    installed.is_ok()
}

fn log_filter(settings: &Settings) -> EnvFilter {
    EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Opens the span one request's dispatch runs in.
///
/// Resolution, engine binding and the hooks fired later all log inside it, so
/// each entry carries the request ID and the page's content template.
///
/// # Examples
///
/// ```
/// use tplfactory_core::logging::request_span;
///
/// let span = request_span("abc-123", "contact");
/// let _guard = span.enter();
/// tracing::info!("binding engine");
/// ```
pub fn request_span(request_id: &str, template: &str) -> tracing::Span {
    tracing::info_span!("request", id = request_id, template = template)
}
