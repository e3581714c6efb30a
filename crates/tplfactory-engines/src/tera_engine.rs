//! The Tera engine.
//!
//! Loads every template under the engine's templates directory into a
//! [`tera::Tera`] instance on initialization, so templates may extend or include
//! each other, then renders the bound template with the variables set on it.
//!
//! When a cache directory is configured, rendered output is stored there keyed
//! by a SHA-256 digest of the file name and the variables. Cached output is
//! served until [`CacheInvalidatable::clear_all_cache`] discards it.

use std::path::{Path, PathBuf};

use serde_json::Value;
use sha2::{Digest, Sha256};
use tera::Tera;
use tplfactory_core::{FactoryError, FactoryResult};

use crate::engine::{CacheInvalidatable, EngineConfig, TemplateEngine, TemplateVars};

const CACHE_EXTENSION: &str = "cache";

/// Renders templates with Tera.
pub struct TeraEngine {
    config: EngineConfig,
    filename: String,
    tera: Option<Tera>,
    vars: TemplateVars,
}

impl TeraEngine {
    /// Creates an uninitialized Tera engine for the given template.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            filename: config.filename(),
            config,
            tera: None,
            vars: TemplateVars::new(),
        }
    }

    fn cache_path(&self, dir: &Path, context: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(self.filename.as_bytes());
        hasher.update([0]);
        hasher.update(context.as_bytes());
        dir.join(format!("{:x}.{CACHE_EXTENSION}", hasher.finalize()))
    }
}

impl TemplateEngine for TeraEngine {
    fn templates_path(&self) -> &Path {
        &self.config.templates_path
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    /// Loads every `*.{suffix}` file under the templates directory.
    ///
    /// The whole directory is parsed so that the bound template can extend or
    /// include any sibling. A syntax error in any of those files therefore fails
    /// initialization for every page rendered by this engine, not only for
    /// pages whose template chain contains the broken file.
    fn init_engine(&mut self) -> FactoryResult<()> {
        let glob = self
            .config
            .templates_path
            .join(format!("**/*.{}", self.config.suffix));
        let glob = glob.to_str().ok_or_else(|| {
            FactoryError::EngineInitialization(format!(
                "Templates path '{}' is not valid UTF-8",
                self.config.templates_path.display()
            ))
        })?;

        let mut tera =
            Tera::new(glob).map_err(|e| FactoryError::EngineInitialization(describe(&e)))?;
        // Only files with the configured suffix are loaded, so every template
        // this instance holds is escaped, whatever the suffix is.
        tera.autoescape_on(vec![""]);

        tracing::debug!(
            glob,
            templates = tera.get_template_names().count(),
            "tera engine initialized"
        );
        self.tera = Some(tera);
        Ok(())
    }

    fn set(&self, key: &str, value: Value) {
        self.vars.set(key, value);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.vars.get(key)
    }

    fn render(&self) -> FactoryResult<String> {
        let tera = self.tera.as_ref().ok_or_else(|| {
            FactoryError::RenderError(format!(
                "Tera engine for '{}' rendered before initialization",
                self.filename
            ))
        })?;

        let vars = self.vars.snapshot();
        let cache_path = match &self.config.cache_dir {
            Some(dir) => {
                let serialized = serde_json::to_string(&vars)
                    .map_err(|e| FactoryError::RenderError(e.to_string()))?;
                Some(self.cache_path(dir, &serialized))
            }
            None => None,
        };

        if let Some(path) = cache_path.as_ref().filter(|path| path.is_file()) {
            tracing::debug!(filename = %self.filename, "serving cached output");
            return Ok(std::fs::read_to_string(path)?);
        }

        let context = tera::Context::from_serialize(&vars)
            .map_err(|e| FactoryError::RenderError(describe(&e)))?;
        let output = tera
            .render(&self.filename, &context)
            .map_err(|e| FactoryError::RenderError(describe(&e)))?;

        if let Some(path) = cache_path {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            std::fs::write(&path, &output)?;
        }

        Ok(output)
    }

    fn as_cache_invalidatable(&self) -> Option<&dyn CacheInvalidatable> {
        Some(self)
    }
}

impl CacheInvalidatable for TeraEngine {
    fn clear_all_cache(&self) -> FactoryResult<()> {
        let Some(dir) = self.config.cache_dir.as_ref() else {
            return Ok(());
        };
        if !dir.is_dir() {
            return Ok(());
        }

        let mut removed = 0usize;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(CACHE_EXTENSION) {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        tracing::debug!(dir = %dir.display(), removed, "tera output cache cleared");
        Ok(())
    }
}

/// Flattens a Tera error and its causes into one message.
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
