//! Settings for tplfactory.
//!
//! This module provides the [`Settings`] struct, which holds the factory
//! configuration: which engine is active, the lookup name under which the bound
//! engine is exposed, where template sources live, and per-engine options.
//! Loading from files and the environment lives in
//! [`settings_loader`](crate::settings_loader).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FactoryError;

/// Identifier of the passthrough engine, used as the default.
pub const DEFAULT_ENGINE: &str = "passthrough";

/// Default lookup name of the bound engine instance.
pub const DEFAULT_API_VAR: &str = "view";

/// Per-engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Directory holding this engine's template sources, relative to
    /// [`Settings::templates_root`] unless absolute.
    pub templates_path: PathBuf,
    /// File suffix appended to a template name, without the leading dot.
    pub suffix: String,
    /// Directory for rendered-output caches. `None` disables output caching.
    pub cache_dir: Option<PathBuf>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            templates_path: PathBuf::from("views"),
            suffix: "html".to_string(),
            cache_dir: None,
        }
    }
}

impl EngineSettings {
    /// Creates engine settings with the default directory and the given suffix.
    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
            ..Self::default()
        }
    }
}

/// The complete set of factory settings.
///
/// # Examples
///
/// ```
/// use tplfactory_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.engine, "passthrough");
/// assert_eq!(settings.api_var, "view");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Engine selection ─────────────────────────────────────────────

    /// The active engine identifier. Empty disables engine rendering.
    pub engine: String,
    /// The name under which the bound engine instance is exposed.
    pub api_var: String,

    // ── Templates ────────────────────────────────────────────────────

    /// The site's templates directory.
    pub templates_root: PathBuf,
    /// Per-engine options, keyed by engine identifier.
    pub engines: HashMap<String, EngineSettings>,
    /// Template name of the host's administrative screens. Pages using it are
    /// never rendered by an engine.
    pub admin_template: String,

    // ── Logging ──────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        let mut engines = HashMap::new();
        engines.insert("passthrough".to_string(), EngineSettings::with_suffix("html"));
        engines.insert("tera".to_string(), EngineSettings::with_suffix("tpl"));

        Self {
            // Engine selection
            engine: DEFAULT_ENGINE.to_string(),
            api_var: DEFAULT_API_VAR.to_string(),

            // Templates
            templates_root: PathBuf::from("site/templates"),
            engines,
            admin_template: "admin".to_string(),

            // Logging
            debug: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Returns `true` if an engine identifier is configured.
    pub fn engine_enabled(&self) -> bool {
        !self.engine.trim().is_empty()
    }

    /// Returns the options for the engine with the given identifier, falling
    /// back to [`EngineSettings::default`] when none are configured.
    pub fn engine_settings(&self, engine: &str) -> EngineSettings {
        self.engines.get(engine).cloned().unwrap_or_default()
    }

    /// Returns the absolute templates directory of the given engine.
    pub fn templates_dir(&self, engine: &str) -> PathBuf {
        let relative = self.engine_settings(engine).templates_path;
        if relative.is_absolute() {
            relative
        } else {
            self.templates_root.join(relative)
        }
    }

    /// Returns the rendered-output cache directory of the given engine, if any.
    pub fn cache_dir(&self, engine: &str) -> Option<PathBuf> {
        self.engine_settings(engine)
            .cache_dir
            .map(|dir| resolve_under(&self.templates_root, dir))
    }

    /// Rejects settings the dispatcher cannot run with.
    pub fn validate(&self) -> Result<(), FactoryError> {
        if self.api_var.trim().is_empty() {
            return Err(FactoryError::ImproperlyConfigured(
                "api_var must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn resolve_under(root: &Path, dir: PathBuf) -> PathBuf {
    if dir.is_absolute() {
        dir
    } else {
        root.join(dir)
    }
}
