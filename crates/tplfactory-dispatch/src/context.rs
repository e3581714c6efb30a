//! Request-scoped dispatch state.
//!
//! A [`RequestContext`] lives for exactly one request. It carries the page
//! being served, the dispatch state, the engine bound for this request (exposed
//! under the configured lookup name), and the request's hooks. Nothing in it is
//! shared with other requests.

use std::collections::HashMap;
use std::sync::Arc;

use tplfactory_core::{FactoryResult, Page};
use tplfactory_engines::TemplateEngine;
use tplfactory_hooks::{PageDeleted, PageRender, PageSaved, RequestHooks};

use crate::dispatcher::DispatchState;
use crate::resolver::TemplateBinding;

/// The state of one request.
pub struct RequestContext {
    request_id: String,
    page: Page,
    state: DispatchState,
    binding: Option<TemplateBinding>,
    api: HashMap<String, Arc<dyn TemplateEngine>>,
    hooks: RequestHooks,
}

impl RequestContext {
    /// Creates the context of a request serving `page`, with a fresh request ID.
    pub fn new(page: Page) -> Self {
        Self::with_request_id(uuid::Uuid::new_v4().to_string(), page)
    }

    /// Creates a context with an explicit request ID.
    pub fn with_request_id(request_id: impl Into<String>, page: Page) -> Self {
        Self {
            request_id: request_id.into(),
            page,
            state: DispatchState::Idle,
            binding: None,
            api: HashMap::new(),
            hooks: RequestHooks::new(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The page this request serves.
    pub const fn page(&self) -> &Page {
        &self.page
    }

    pub const fn state(&self) -> DispatchState {
        self.state
    }

    /// The template file bound for this request, once the dispatcher bound one.
    pub const fn binding(&self) -> Option<&TemplateBinding> {
        self.binding.as_ref()
    }

    /// Looks up the engine registered under `name`.
    pub fn api(&self, name: &str) -> Option<Arc<dyn TemplateEngine>> {
        self.api.get(name).cloned()
    }

    pub const fn hooks(&self) -> &RequestHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut RequestHooks {
        &mut self.hooks
    }

    pub(crate) fn set_state(&mut self, state: DispatchState) {
        self.state = state;
    }

    pub(crate) fn bind(
        &mut self,
        api_var: &str,
        engine: Arc<dyn TemplateEngine>,
        binding: TemplateBinding,
    ) {
        self.api.insert(api_var.to_string(), engine);
        self.binding = Some(binding);
        self.state = DispatchState::Bound;
    }

    // ── Host events ──────────────────────────────────────────────────

    /// Fires the after-render hook for `page` and returns the final output.
    ///
    /// `host_output` is what the host rendered by default; it is returned
    /// unchanged when no handler replaces it.
    pub fn render_page(&self, page: Page, host_output: String) -> FactoryResult<String> {
        let mut event = PageRender::new(page, host_output);
        self.hooks.page_render.fire(&mut event)?;
        Ok(event.return_value)
    }

    /// Fires the after-save hook. Returns the number of handlers that ran.
    pub fn page_saved(&self, page: Page) -> FactoryResult<usize> {
        self.hooks.page_saved.fire(&mut PageSaved { page })
    }

    /// Fires the after-delete hook. Returns the number of handlers that ran.
    pub fn page_deleted(&self, page: Page) -> FactoryResult<usize> {
        self.hooks.page_deleted.fire(&mut PageDeleted { page })
    }
}
