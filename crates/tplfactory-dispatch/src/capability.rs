//! Cache-invalidation capability detection.

use tplfactory_core::FactoryResult;
use tplfactory_engines::TemplateEngine;

/// Returns `true` if the engine can discard its rendered-output cache.
///
/// The answer comes from the engine's declared capabilities, not from its
/// concrete type, so any engine implementing
/// [`CacheInvalidatable`](tplfactory_engines::CacheInvalidatable) qualifies.
pub fn supports_invalidation(engine: &dyn TemplateEngine) -> bool {
    engine.as_cache_invalidatable().is_some()
}

/// Clears the engine's whole cache if it has one.
///
/// Returns `true` if a clear was performed.
pub fn clear_cache(engine: &dyn TemplateEngine) -> FactoryResult<bool> {
    match engine.as_cache_invalidatable() {
        Some(cache) => {
            cache.clear_all_cache()?;
            Ok(true)
        }
        None => Ok(false),
    }
}
