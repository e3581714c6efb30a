//! Engine resolution.
//!
//! [`EngineResolver::resolve`] turns an engine identifier and a template name
//! into an initialized engine instance. A template opts into engine rendering
//! by having a source file in the engine's templates directory; when the file
//! is absent the resolver returns `Ok(None)` and the host renders as usual.

use std::path::PathBuf;

use tplfactory_core::{FactoryError, FactoryResult, ModuleOracle, Settings};
use tplfactory_engines::{EngineConfig, TemplateEngine};

use crate::registry::EngineRegistry;

/// The pairing of a content template with the source file an engine renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBinding {
    /// The content template name.
    pub template: String,
    /// The resolved template source file.
    pub path: PathBuf,
}

impl TemplateBinding {
    /// Records which file `engine` renders for `template`.
    pub fn of(template: &str, engine: &dyn TemplateEngine) -> Self {
        Self {
            template: template.to_string(),
            path: engine.templates_path().join(engine.filename()),
        }
    }
}

/// Resolves engine identifiers to engine instances.
pub struct EngineResolver<'a> {
    registry: &'a EngineRegistry,
    oracle: &'a dyn ModuleOracle,
    settings: &'a Settings,
}

impl<'a> EngineResolver<'a> {
    /// Creates a resolver over the given registry, host oracle, and settings.
    pub const fn new(
        registry: &'a EngineRegistry,
        oracle: &'a dyn ModuleOracle,
        settings: &'a Settings,
    ) -> Self {
        Self {
            registry,
            oracle,
            settings,
        }
    }

    /// Resolves `engine` for the template `filename`.
    ///
    /// Returns `Ok(None)` when the template has no source file for the engine.
    /// Fails with [`FactoryError::NotInstalled`] when `engine` is not an
    /// installed engine, and propagates whatever the engine's initialization
    /// raises.
    pub fn resolve(
        &self,
        engine: &str,
        filename: &str,
    ) -> FactoryResult<Option<Box<dyn TemplateEngine>>> {
        let id = self
            .registry
            .list_installed(self.oracle)
            .into_iter()
            .map(|(id, _)| id)
            .find(|id| id.slug() == engine)
            .ok_or_else(|| FactoryError::NotInstalled(engine.to_string()))?;

        let config = EngineConfig::from_settings(self.settings, id, filename);
        let mut instance = self
            .registry
            .construct(id, config)
            .ok_or_else(|| FactoryError::NotInstalled(engine.to_string()))?;

        let path = instance.templates_path().join(instance.filename());
        if !path.is_file() {
            tracing::debug!(
                engine,
                path = %path.display(),
                "no template source; deferring to host rendering"
            );
            return Ok(None);
        }

        instance.init_engine()?;
        tracing::debug!(engine, path = %path.display(), "engine resolved");
        Ok(Some(instance))
    }
}
