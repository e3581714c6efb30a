//! Configuration checks.
//!
//! [`run_checks`] inspects [`Settings`] for problems that would make request
//! startup fail or silently disable engine rendering, so hosts can surface them
//! in their admin screens before the first request arrives.
//!
//! ## Examples
//!
//! ```
//! use tplfactory_core::checks::{run_checks, CheckLevel};
//! use tplfactory_core::settings::Settings;
//!
//! let mut settings = Settings::default();
//! settings.api_var.clear();
//!
//! let messages = run_checks(&settings, &["passthrough", "tera"]);
//! assert!(messages.iter().any(|m| m.level == CheckLevel::Error));
//! ```

use crate::settings::Settings;

/// Severity level for a check message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckLevel {
    /// Informational message.
    Info = 1,
    /// A potential problem.
    Warning = 2,
    /// A definite problem that should be fixed.
    Error = 3,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// A diagnostic message produced by a configuration check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level.
    pub level: CheckLevel,
    /// The human-readable message describing the issue.
    pub msg: String,
    /// An optional hint on how to fix the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check message (e.g. "engine.E001").
    pub id: String,
}

impl CheckMessage {
    /// Creates a new `CheckMessage` with the given level and details.
    pub fn new(
        level: CheckLevel,
        msg: impl Into<String>,
        hint: Option<&str>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            level,
            msg: msg.into(),
            hint: hint.map(String::from),
            id: id.into(),
        }
    }

    /// Returns `true` if this is a warning or higher severity.
    pub fn is_serious(&self) -> bool {
        self.level >= CheckLevel::Warning
    }
}

impl std::fmt::Display for CheckMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}) {}: {}", self.id, self.level, self.msg)?;
        if let Some(ref hint) = self.hint {
            write!(f, "\n\tHINT: {hint}")?;
        }
        Ok(())
    }
}

/// Runs all configuration checks.
///
/// `known_engines` lists the identifiers the engine registry can construct.
pub fn run_checks(settings: &Settings, known_engines: &[&str]) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    if settings.api_var.trim().is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            "api_var is empty",
            Some("Set api_var to the name the bound engine is exposed under, e.g. \"view\""),
            "settings.E001",
        ));
    }

    let engine = settings.engine.trim();
    if engine.is_empty() {
        messages.push(CheckMessage::new(
            CheckLevel::Info,
            "No template engine configured; host rendering is used for every page",
            None,
            "engine.I001",
        ));
    } else if !known_engines.contains(&engine) {
        let hint = format!("Choose one of: {}", known_engines.join(", "));
        messages.push(CheckMessage::new(
            CheckLevel::Error,
            format!("Unknown template engine '{engine}'"),
            Some(hint.as_str()),
            "engine.E001",
        ));
    } else if !settings.templates_dir(engine).is_dir() {
        messages.push(CheckMessage::new(
            CheckLevel::Warning,
            format!(
                "Templates directory '{}' does not exist; no page will be engine-rendered",
                settings.templates_dir(engine).display()
            ),
            Some("Create the directory or adjust templates_root / templates_path"),
            "engine.W001",
        ));
    }

    messages
}
