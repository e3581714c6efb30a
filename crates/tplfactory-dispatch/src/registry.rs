//! The table of engine families.
//!
//! Each [`EngineId`] maps to a display name and a constructor. Hosts install
//! engines as modules named by [`EngineRegistry::class_name_for`]; only engines
//! the host reports as installed can be resolved.

use std::sync::Arc;

use tplfactory_core::modules::{Module, ModuleOracle};
use tplfactory_engines::{EngineConfig, EngineId, PassthroughEngine, TemplateEngine, TeraEngine};

/// Prefix of every engine module's class name.
pub const CLASS_PREFIX: &str = "TemplateEngine";

/// Builds an engine instance for one template.
pub type EngineConstructor = Arc<dyn Fn(EngineConfig) -> Box<dyn TemplateEngine> + Send + Sync>;

struct EngineEntry {
    id: EngineId,
    display_name: &'static str,
    constructor: EngineConstructor,
}

/// The fixed table of engine families known to the factory.
///
/// # Examples
///
/// ```
/// use tplfactory_dispatch::EngineRegistry;
/// use tplfactory_engines::EngineId;
///
/// let registry = EngineRegistry::builtin();
/// assert_eq!(registry.list_available().len(), 2);
/// assert_eq!(EngineRegistry::class_name_for(EngineId::Tera), "TemplateEngineTera");
/// ```
pub struct EngineRegistry {
    entries: Vec<EngineEntry>,
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EngineRegistry {
    /// Creates the registry of built-in engines.
    pub fn builtin() -> Self {
        let passthrough: EngineConstructor = Arc::new(|config: EngineConfig| {
            Box::new(PassthroughEngine::new(config)) as Box<dyn TemplateEngine>
        });
        let tera: EngineConstructor = Arc::new(|config: EngineConfig| {
            Box::new(TeraEngine::new(config)) as Box<dyn TemplateEngine>
        });

        Self {
            entries: vec![
                EngineEntry {
                    id: EngineId::Passthrough,
                    display_name: EngineId::Passthrough.display_name(),
                    constructor: passthrough,
                },
                EngineEntry {
                    id: EngineId::Tera,
                    display_name: EngineId::Tera.display_name(),
                    constructor: tera,
                },
            ],
        }
    }

    /// Replaces the constructor of an engine family.
    ///
    /// Hosts use this to decorate the built-in engines, e.g. to register extra
    /// Tera filters during construction.
    #[must_use]
    pub fn with_constructor(mut self, id: EngineId, constructor: EngineConstructor) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) {
            entry.constructor = constructor;
        }
        self
    }

    /// Returns every engine family with its display name, in table order.
    pub fn list_available(&self) -> Vec<(EngineId, &'static str)> {
        self.entries
            .iter()
            .map(|entry| (entry.id, entry.display_name))
            .collect()
    }

    /// Returns the identifiers of every engine family, in table order.
    pub fn slugs(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.id.slug()).collect()
    }

    /// Returns the module class name of an engine family: [`CLASS_PREFIX`]
    /// followed by the capitalized identifier.
    pub fn class_name_for(id: EngineId) -> String {
        let slug = id.slug();
        let mut chars = slug.chars();
        let capitalized = chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        });
        format!("{CLASS_PREFIX}{capitalized}")
    }

    /// Returns the engine families the host has installed, in table order.
    pub fn list_installed(&self, oracle: &dyn ModuleOracle) -> Vec<(EngineId, &'static str)> {
        self.list_available()
            .into_iter()
            .filter(|(id, _)| oracle.is_installed(&Self::class_name_for(*id)))
            .collect()
    }

    /// Returns module descriptors for every engine family, for hosts to install.
    pub fn modules(&self) -> Vec<EngineModule> {
        self.entries
            .iter()
            .map(|entry| EngineModule::new(entry.id, entry.display_name))
            .collect()
    }

    /// Constructs an engine instance of the given family.
    pub(crate) fn construct(
        &self,
        id: EngineId,
        config: EngineConfig,
    ) -> Option<Box<dyn TemplateEngine>> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| (entry.constructor)(config))
    }
}

/// Describes an engine family as a host module.
#[derive(Debug, Clone)]
pub struct EngineModule {
    id: EngineId,
    class_name: String,
    title: &'static str,
}

impl EngineModule {
    /// Creates the module descriptor of an engine family.
    pub fn new(id: EngineId, title: &'static str) -> Self {
        Self {
            id,
            class_name: EngineRegistry::class_name_for(id),
            title,
        }
    }

    /// Returns the engine family this module provides.
    pub const fn id(&self) -> EngineId {
        self.id
    }
}

impl Module for EngineModule {
    fn name(&self) -> &str {
        &self.class_name
    }

    fn title(&self) -> &str {
        self.title
    }

    fn ready(&self) {
        tracing::debug!(engine = %self.id, "template engine module ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tplfactory_core::ModuleRegistry;

    fn host_with(ids: &[EngineId]) -> ModuleRegistry {
        let mut modules = ModuleRegistry::new();
        for id in ids {
            modules.install(Box::new(EngineModule::new(*id, id.display_name())));
        }
        modules
    }

    #[test]
    fn test_class_name_for() {
        assert_eq!(
            EngineRegistry::class_name_for(EngineId::Passthrough),
            "TemplateEnginePassthrough"
        );
        assert_eq!(EngineRegistry::class_name_for(EngineId::Tera), "TemplateEngineTera");
    }

    #[test]
    fn test_list_available_order() {
        let registry = EngineRegistry::builtin();
        let ids: Vec<EngineId> = registry.list_available().into_iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![EngineId::Passthrough, EngineId::Tera]);
        assert_eq!(registry.slugs(), vec!["passthrough", "tera"]);
    }

    #[test]
    fn test_list_installed_is_subset_in_table_order() {
        let registry = EngineRegistry::builtin();
        let host = host_with(&[EngineId::Tera]);

        let installed = registry.list_installed(&host);
        assert_eq!(installed, vec![(EngineId::Tera, "Tera")]);
    }

    #[test]
    fn test_list_installed_empty_host() {
        let registry = EngineRegistry::builtin();
        assert!(registry.list_installed(&ModuleRegistry::new()).is_empty());
    }

    #[test]
    fn test_modules_install_into_host() {
        let registry = EngineRegistry::builtin();
        let mut host = ModuleRegistry::new();
        for module in registry.modules() {
            host.install(Box::new(module));
        }
        host.populate();

        assert_eq!(registry.list_installed(&host).len(), 2);
        assert_eq!(host.get("TemplateEngineTera").unwrap().title(), "Tera");
    }

    #[test]
    fn test_with_constructor_replaces_entry() {
        let registry = EngineRegistry::builtin().with_constructor(
            EngineId::Tera,
            Arc::new(|config: EngineConfig| {
                Box::new(PassthroughEngine::new(config)) as Box<dyn TemplateEngine>
            }),
        );
        let config = EngineConfig {
            template_name: "home".to_string(),
            templates_path: "views".into(),
            suffix: "tpl".to_string(),
            cache_dir: None,
        };

        let engine = registry.construct(EngineId::Tera, config).unwrap();
        assert!(engine.as_cache_invalidatable().is_none());
    }
}
