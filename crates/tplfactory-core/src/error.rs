//! Core error types for tplfactory.
//!
//! This module provides the [`FactoryError`] enum covering engine resolution,
//! engine initialization, template lookup and rendering, and configuration
//! errors. Opting out of engine rendering (no configured engine, no template
//! file) is never an error; those outcomes are modelled as `Ok(None)` by the
//! resolver.

use thiserror::Error;

/// The primary error type for tplfactory.
///
/// Errors raised by an engine are carried through verbatim: the dispatch layer
/// never retries and never swallows them. Use [`FactoryError::is_fatal`] to tell
/// request-startup failures apart from per-render failures.
#[derive(Error, Debug)]
pub enum FactoryError {
    // ── Resolution ───────────────────────────────────────────────────

    /// The requested engine identifier is not among the installed engines.
    #[error("Template engine not installed: {0}")]
    NotInstalled(String),

    /// An engine failed during its initialization step.
    #[error("Engine initialization failed: {0}")]
    EngineInitialization(String),

    // ── Templates ────────────────────────────────────────────────────

    /// The requested template file was not found.
    #[error("Template does not exist: {0}")]
    TemplateDoesNotExist(String),

    /// An engine failed while producing output.
    #[error("Render error: {0}")]
    RenderError(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing, malformed, or used out of order.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// The factory is improperly configured.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FactoryError {
    /// Returns `true` if this error aborts request startup.
    ///
    /// - `NotInstalled`, `EngineInitialization`, `ImproperlyConfigured` -> fatal
    /// - Everything else only affects the render or hook that raised it
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NotInstalled(_) | Self::EngineInitialization(_) | Self::ImproperlyConfigured(_)
        )
    }
}

/// A convenience type alias for `Result<T, FactoryError>`.
pub type FactoryResult<T> = Result<T, FactoryError>;
