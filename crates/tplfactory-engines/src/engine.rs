//! The template engine interface.
//!
//! Every engine implements [`TemplateEngine`]. Engines that keep a cache of
//! rendered output additionally implement [`CacheInvalidatable`] and advertise
//! it through [`TemplateEngine::as_cache_invalidatable`]; the dispatch layer
//! only wires cache-clearing hooks for engines that do.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tplfactory_core::{FactoryResult, Settings};

/// Identifies an engine family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineId {
    /// Serves template files as they are.
    Passthrough,
    /// Renders templates with Tera.
    Tera,
}

impl EngineId {
    /// All engine families, in display order.
    pub const ALL: [Self; 2] = [Self::Passthrough, Self::Tera];

    /// Returns the identifier used in settings.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Tera => "tera",
        }
    }

    /// Returns a human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Passthrough => "Passthrough (static files)",
            Self::Tera => "Tera",
        }
    }

    /// Looks up an engine family by its identifier.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.slug() == slug)
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Everything an engine instance needs to know about the template it renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// The content template name, e.g. "contact".
    pub template_name: String,
    /// Directory holding the engine's template sources.
    pub templates_path: PathBuf,
    /// File suffix without the leading dot.
    pub suffix: String,
    /// Directory for rendered-output caches, if caching is enabled.
    pub cache_dir: Option<PathBuf>,
}

impl EngineConfig {
    /// Builds the configuration of `engine` for the given template name.
    pub fn from_settings(settings: &Settings, engine: EngineId, template_name: &str) -> Self {
        let slug = engine.slug();
        Self {
            template_name: template_name.to_string(),
            templates_path: settings.templates_dir(slug),
            suffix: settings.engine_settings(slug).suffix,
            cache_dir: settings.cache_dir(slug),
        }
    }

    /// Returns the template's file name: the template name plus the suffix.
    ///
    /// A name that already carries the suffix is returned unchanged.
    pub fn filename(&self) -> String {
        if self.suffix.is_empty() {
            return self.template_name.clone();
        }
        let dotted = format!(".{}", self.suffix);
        if self.template_name.ends_with(&dotted) {
            self.template_name.clone()
        } else {
            format!("{}{dotted}", self.template_name)
        }
    }
}

/// Variables handed from the host's page code to an engine.
///
/// Interior mutability lets the host set variables on an engine instance that
/// is shared with the render hook.
#[derive(Debug, Default)]
pub struct TemplateVars {
    values: RwLock<Map<String, Value>>,
}

impl TemplateVars {
    /// Creates an empty variable set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets or replaces a variable.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.values
            .write()
            .expect("template vars lock poisoned")
            .insert(key.into(), value);
    }

    /// Returns a copy of a variable.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values
            .read()
            .expect("template vars lock poisoned")
            .get(key)
            .cloned()
    }

    /// Returns a copy of all variables.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.read().expect("template vars lock poisoned").clone()
    }
}

/// A template rendering engine bound to one template file.
///
/// Instances are created per request by the dispatch layer, initialized once,
/// and then rendered by the host's after-render hook.
pub trait TemplateEngine: Send + Sync {
    /// Returns the directory the engine loads template sources from.
    fn templates_path(&self) -> &Path;

    /// Returns the file name of the bound template, relative to
    /// [`templates_path`](TemplateEngine::templates_path).
    fn filename(&self) -> &str;

    /// Performs engine-specific setup. Called once, after the template file
    /// has been found.
    fn init_engine(&mut self) -> FactoryResult<()>;

    /// Sets a template variable.
    fn set(&self, key: &str, value: Value);

    /// Returns a template variable.
    fn get(&self, key: &str) -> Option<Value>;

    /// Renders the bound template.
    fn render(&self) -> FactoryResult<String>;

    /// Returns the cache-invalidation capability, if the engine has one.
    fn as_cache_invalidatable(&self) -> Option<&dyn CacheInvalidatable> {
        None
    }
}

/// Engines that keep rendered output and can discard it.
pub trait CacheInvalidatable: Send + Sync {
    /// Discards every cached rendering.
    fn clear_all_cache(&self) -> FactoryResult<()>;
}
