//! The lifecycle dispatcher.
//!
//! [`LifecycleDispatcher`] holds the process-wide, read-only pieces (settings,
//! engine table, host module oracle). Everything that changes per request is
//! kept in the [`RequestContext`] handed to [`LifecycleDispatcher::on_ready`].
//!
//! ```text
//!          on_ready
//!   Idle ───────────┬──> Bound     engine registered, hooks attached
//!                   └──> Inactive  no engine configured or no template file
//! ```

use std::sync::Arc;

use tplfactory_core::logging::request_span;
use tplfactory_core::{FactoryError, FactoryResult, ModuleOracle, Settings};
use tplfactory_engines::TemplateEngine;
use tplfactory_hooks::{PageDeleted, PageRender, PageSaved};

use crate::capability::{clear_cache, supports_invalidation};
use crate::context::RequestContext;
use crate::registry::EngineRegistry;
use crate::resolver::{EngineResolver, TemplateBinding};

/// Handler ID of the render-substitution hook.
pub const RENDER_HOOK_ID: &str = "tplfactory.render";

/// Handler ID of the cache-invalidation hooks.
pub const CLEAR_CACHE_HOOK_ID: &str = "tplfactory.clear_cache";

/// Where a request stands with respect to engine rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    /// The host's ready event has not been handled yet.
    Idle,
    /// An engine is registered and its hooks are attached.
    Bound,
    /// No engine applies; the host renders the page by itself.
    Inactive,
}

/// Binds template engines to requests and wires them into the host's hooks.
pub struct LifecycleDispatcher {
    settings: Arc<Settings>,
    registry: Arc<EngineRegistry>,
    oracle: Arc<dyn ModuleOracle>,
}

impl LifecycleDispatcher {
    /// Creates a dispatcher. Fails if the settings cannot be used.
    pub fn new(
        settings: Arc<Settings>,
        registry: Arc<EngineRegistry>,
        oracle: Arc<dyn ModuleOracle>,
    ) -> FactoryResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            registry,
            oracle,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Returns a resolver over this dispatcher's registry, oracle, and settings.
    pub fn resolver(&self) -> EngineResolver<'_> {
        EngineResolver::new(&self.registry, self.oracle.as_ref(), &self.settings)
    }

    /// Handles the host's ready event for one request.
    ///
    /// Moves the request out of [`DispatchState::Idle`] exactly once. Errors
    /// from resolution (an engine that is not installed, a failing engine
    /// initialization) are returned as-is and leave the request `Idle`.
    pub fn on_ready(&self, ctx: &mut RequestContext) -> FactoryResult<DispatchState> {
        if ctx.state() != DispatchState::Idle {
            return Err(FactoryError::ConfigurationError(format!(
                "request {} has already been dispatched",
                ctx.request_id()
            )));
        }

        let span = request_span(ctx.request_id(), &ctx.page().template);
        let _guard = span.enter();

        if !self.settings.engine_enabled() {
            tracing::debug!("no engine configured");
            ctx.set_state(DispatchState::Inactive);
            return Ok(DispatchState::Inactive);
        }

        let engine_id = self.settings.engine.trim();
        let template = ctx.page().template.clone();
        let Some(engine) = self.resolver().resolve(engine_id, &template)? else {
            ctx.set_state(DispatchState::Inactive);
            return Ok(DispatchState::Inactive);
        };
        let engine: Arc<dyn TemplateEngine> = Arc::from(engine);

        let page = serde_json::to_value(ctx.page())
            .map_err(|e| FactoryError::RenderError(format!("Failed to serialize page: {e}")))?;
        engine.set("page", page);

        let binding = TemplateBinding::of(&template, engine.as_ref());
        self.attach_render_hook(ctx, Arc::clone(&engine));
        if supports_invalidation(engine.as_ref()) {
            attach_cache_hooks(ctx, &engine);
        }

        tracing::info!(
            engine = engine_id,
            api_var = %self.settings.api_var,
            path = %binding.path.display(),
            "template engine bound"
        );
        ctx.bind(&self.settings.api_var, engine, binding);
        Ok(DispatchState::Bound)
    }

    /// Resolves the configured engine for another template, e.g. a partial
    /// rendered from within a page.
    ///
    /// Returns `Ok(None)` when no engine is configured or the template has no
    /// source file.
    pub fn load(&self, template_name: &str) -> FactoryResult<Option<Box<dyn TemplateEngine>>> {
        if !self.settings.engine_enabled() {
            return Ok(None);
        }
        self.resolver()
            .resolve(self.settings.engine.trim(), template_name)
    }

    fn attach_render_hook(&self, ctx: &mut RequestContext, engine: Arc<dyn TemplateEngine>) {
        let admin_template = self.settings.admin_template.clone();
        ctx.hooks_mut().page_render.connect(
            RENDER_HOOK_ID,
            Arc::new(move |event: &mut PageRender| -> FactoryResult<()> {
                if event.page.uses_template(&admin_template) {
                    return Ok(());
                }
                event.return_value = engine.render()?;
                Ok(())
            }),
        );
    }
}

fn attach_cache_hooks(ctx: &mut RequestContext, engine: &Arc<dyn TemplateEngine>) {
    let on_save = Arc::clone(engine);
    ctx.hooks_mut().page_saved.connect(
        CLEAR_CACHE_HOOK_ID,
        Arc::new(move |event: &mut PageSaved| {
            tracing::debug!(page = event.page.id, "page saved; clearing engine cache");
            clear_cache(on_save.as_ref()).map(drop)
        }),
    );

    let on_delete = Arc::clone(engine);
    ctx.hooks_mut().page_deleted.connect(
        CLEAR_CACHE_HOOK_ID,
        Arc::new(move |event: &mut PageDeleted| {
            tracing::debug!(page = event.page.id, "page deleted; clearing engine cache");
            clear_cache(on_delete.as_ref()).map(drop)
        }),
    );
}
