//! Installed host modules.
//!
//! The host decides which modules (including template engines) are installed.
//! tplfactory only needs to ask whether a module is present, which is what
//! [`ModuleOracle`] models. [`ModuleRegistry`] is the in-process implementation
//! used by hosts that keep their module list in memory.

use std::collections::HashMap;

/// A module installed into the host.
///
/// # Examples
///
/// ```
/// use tplfactory_core::modules::Module;
///
/// struct Search;
///
/// impl Module for Search {
///     fn name(&self) -> &str { "SiteSearch" }
///     fn title(&self) -> &str { "Site search" }
/// }
/// ```
pub trait Module: Send + Sync {
    /// Returns the module's class name, the key the host installs it under.
    fn name(&self) -> &str;

    /// Returns a human-readable title.
    fn title(&self) -> &str {
        self.name()
    }

    /// Called once after all modules have been installed.
    fn ready(&self) {}
}

/// Answers whether a module is installed in the host.
pub trait ModuleOracle: Send + Sync {
    /// Returns `true` if a module with the given class name is installed.
    fn is_installed(&self, class_name: &str) -> bool;
}

/// The host's registry of installed modules.
///
/// Modules are installed via [`install`](ModuleRegistry::install) and then
/// [`populate`](ModuleRegistry::populate) is called once to finish startup
/// (calling each module's `ready()` method).
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
    by_name: HashMap<String, usize>,
    ready: bool,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Creates a new, empty `ModuleRegistry`.
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
            by_name: HashMap::new(),
            ready: false,
        }
    }

    /// Installs a module.
    ///
    /// # Panics
    ///
    /// Panics if a module with the same name is already installed, or if
    /// [`populate`](ModuleRegistry::populate) has already been called.
    pub fn install(&mut self, module: Box<dyn Module>) {
        assert!(
            !self.ready,
            "Cannot install modules after the registry has been populated"
        );

        let name = module.name().to_string();
        assert!(
            !self.by_name.contains_key(&name),
            "Module '{name}' is already installed"
        );

        tracing::debug!(module = %name, "module installed");
        self.by_name.insert(name, self.modules.len());
        self.modules.push(module);
    }

    /// Returns the installed module with the given class name.
    pub fn get(&self, name: &str) -> Option<&dyn Module> {
        self.by_name.get(name).map(|&idx| self.modules[idx].as_ref())
    }

    /// Calls `ready()` on each module in installation order.
    ///
    /// # Panics
    ///
    /// Panics if `populate` has already been called.
    pub fn populate(&mut self) {
        assert!(!self.ready, "ModuleRegistry has already been populated");

        for module in &self.modules {
            module.ready();
        }

        self.ready = true;
    }

    /// Returns `true` if the registry has been populated.
    pub const fn is_ready(&self) -> bool {
        self.ready
    }
}

impl ModuleOracle for ModuleRegistry {
    fn is_installed(&self, class_name: &str) -> bool {
        self.by_name.contains_key(class_name)
    }
}
