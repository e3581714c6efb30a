//! The passthrough engine.
//!
//! Serves the bound template file as it is. Variables can be set but are not
//! interpolated. This engine keeps no cache.

use std::path::Path;

use serde_json::Value;
use tplfactory_core::{FactoryError, FactoryResult};

use crate::engine::{EngineConfig, TemplateEngine, TemplateVars};

/// Returns template files verbatim.
pub struct PassthroughEngine {
    config: EngineConfig,
    filename: String,
    vars: TemplateVars,
}

impl PassthroughEngine {
    /// Creates a passthrough engine for the given template.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            filename: config.filename(),
            config,
            vars: TemplateVars::new(),
        }
    }
}

impl TemplateEngine for PassthroughEngine {
    fn templates_path(&self) -> &Path {
        &self.config.templates_path
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn init_engine(&mut self) -> FactoryResult<()> {
        tracing::debug!(filename = %self.filename, "passthrough engine ready");
        Ok(())
    }

    fn set(&self, key: &str, value: Value) {
        self.vars.set(key, value);
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.vars.get(key)
    }

    fn render(&self) -> FactoryResult<String> {
        let path = self.config.templates_path.join(&self.filename);
        std::fs::read_to_string(&path).map_err(|e| {
            FactoryError::TemplateDoesNotExist(format!(
                "Error reading template '{}': {e}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(dir: &Path, name: &str) -> EngineConfig {
        EngineConfig {
            template_name: name.to_string(),
            templates_path: dir.to_path_buf(),
            suffix: "html".to_string(),
            cache_dir: None,
        }
    }

    #[test]
    fn test_renders_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("home.html"), "<h1>{{ title }}</h1>").unwrap();

        let mut engine = PassthroughEngine::new(config(dir.path(), "home"));
        engine.init_engine().unwrap();
        engine.set("title", Value::from("ignored"));

        assert_eq!(engine.filename(), "home.html");
        assert_eq!(engine.render().unwrap(), "<h1>{{ title }}</h1>");
        assert_eq!(engine.get("title"), Some(Value::from("ignored")));
    }

    #[test]
    fn test_missing_file_is_template_error() {
        let engine = PassthroughEngine::new(config(&PathBuf::from("/nonexistent"), "home"));
        let err = engine.render().unwrap_err();
        assert!(matches!(err, FactoryError::TemplateDoesNotExist(_)));
    }

    #[test]
    fn test_has_no_cache_capability() {
        let engine = PassthroughEngine::new(config(&PathBuf::from("views"), "home"));
        assert!(engine.as_cache_invalidatable().is_none());
    }
}
