//! # tplfactory-hooks
//!
//! Host lifecycle hooks for tplfactory. A [`Hook`] is a typed event channel:
//! handlers are connected under an ID and called synchronously, in connection
//! order, every time the host fires the event. Handlers receive the event
//! mutably so that they can replace values carried by it, such as the rendered
//! output of a page.
//!
//! Hooks are owned by a single request ([`RequestHooks`]). There is no global
//! hook table, so two concurrent requests never observe each other's handlers.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use tplfactory_core::Page;
//! use tplfactory_hooks::{PageRender, RequestHooks};
//!
//! let mut hooks = RequestHooks::new();
//! hooks.page_render.connect("shout", Arc::new(|event: &mut PageRender| {
//!     event.return_value = event.return_value.to_uppercase();
//!     Ok(())
//! }));
//!
//! let mut event = PageRender::new(Page::new(1, "home", "home"), "hello".to_string());
//! hooks.page_render.fire(&mut event).unwrap();
//! assert_eq!(event.return_value, "HELLO");
//! ```

use std::sync::Arc;

use tplfactory_core::{FactoryResult, Page};

/// The type signature for a hook handler.
///
/// Handlers may fail; the first failure stops the dispatch and is returned to
/// whoever fired the event.
pub type HookHandler<E> = Arc<dyn Fn(&mut E) -> FactoryResult<()> + Send + Sync>;

/// A hook that handlers can be connected to and that the host fires.
pub struct Hook<E: 'static> {
    name: &'static str,
    handlers: Vec<(String, HookHandler<E>)>,
}

impl<E: 'static> Hook<E> {
    /// Creates a new hook with no connected handlers.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: Vec::new(),
        }
    }

    /// Returns the hook's name, used in log output.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Connects a handler to this hook.
    ///
    /// If a handler with the same ID is already connected, it is replaced in place.
    pub fn connect(&mut self, handler_id: impl Into<String>, handler: HookHandler<E>) {
        let id = handler_id.into();
        if let Some(entry) = self.handlers.iter_mut().find(|(hid, _)| *hid == id) {
            entry.1 = handler;
        } else {
            self.handlers.push((id, handler));
        }
    }

    /// Disconnects the handler with the given ID.
    ///
    /// Returns `true` if a handler was found and removed.
    pub fn disconnect(&mut self, handler_id: &str) -> bool {
        let len_before = self.handlers.len();
        self.handlers.retain(|(id, _)| id != handler_id);
        self.handlers.len() < len_before
    }

    /// Returns `true` if a handler with the given ID is connected.
    pub fn is_connected(&self, handler_id: &str) -> bool {
        self.handlers.iter().any(|(id, _)| id == handler_id)
    }

    /// Fires the hook, calling every handler in connection order.
    ///
    /// Returns the number of handlers that ran.
    pub fn fire(&self, event: &mut E) -> FactoryResult<usize> {
        for (id, handler) in &self.handlers {
            tracing::trace!(hook = self.name, handler = %id, "firing hook handler");
            handler(event)?;
        }
        Ok(self.handlers.len())
    }

    /// Returns the number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

// ── Events ───────────────────────────────────────────────────────────

/// Fired after the host has rendered a page.
///
/// `return_value` starts as the host's own output; handlers may replace it.
#[derive(Debug, Clone)]
pub struct PageRender {
    /// The page being rendered.
    pub page: Page,
    /// The output the host will send.
    pub return_value: String,
}

impl PageRender {
    /// Creates a render event carrying the host's default output.
    pub const fn new(page: Page, return_value: String) -> Self {
        Self { page, return_value }
    }
}

/// Fired after a content item has been saved.
#[derive(Debug, Clone)]
pub struct PageSaved {
    /// The saved item.
    pub page: Page,
}

/// Fired after a content item has been deleted.
#[derive(Debug, Clone)]
pub struct PageDeleted {
    /// The deleted item.
    pub page: Page,
}

/// The hooks of one request.
pub struct RequestHooks {
    /// Fired after the host rendered a page.
    pub page_render: Hook<PageRender>,
    /// Fired after a content item was saved.
    pub page_saved: Hook<PageSaved>,
    /// Fired after a content item was deleted.
    pub page_deleted: Hook<PageDeleted>,
}

impl Default for RequestHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestHooks {
    /// Creates a hook set with nothing connected.
    pub const fn new() -> Self {
        Self {
            page_render: Hook::new("page_render"),
            page_saved: Hook::new("page_saved"),
            page_deleted: Hook::new("page_deleted"),
        }
    }

    /// Returns the total number of connected handlers across all hooks.
    pub fn handler_count(&self) -> usize {
        self.page_render.handler_count()
            + self.page_saved.handler_count()
            + self.page_deleted.handler_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tplfactory_core::FactoryError;

    fn saved() -> PageSaved {
        PageSaved {
            page: Page::new(1, "home", "home"),
        }
    }

    #[test]
    fn test_hook_connect_and_fire() {
        let mut hook: Hook<PageSaved> = Hook::new("page_saved");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        hook.connect(
            "counter",
            Arc::new(move |_: &mut PageSaved| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        assert_eq!(hook.fire(&mut saved()).unwrap(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_replace_handler() {
        let mut hook: Hook<PageSaved> = Hook::new("page_saved");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        hook.connect("handler", Arc::new(|_: &mut PageSaved| Ok(())));
        hook.connect(
            "handler",
            Arc::new(move |_: &mut PageSaved| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        assert_eq!(hook.handler_count(), 1);
        hook.fire(&mut saved()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_hook_disconnect() {
        let mut hook: Hook<PageSaved> = Hook::new("page_saved");
        hook.connect("a", Arc::new(|_: &mut PageSaved| Ok(())));
        hook.connect("b", Arc::new(|_: &mut PageSaved| Ok(())));

        assert!(hook.disconnect("a"));
        assert!(!hook.is_connected("a"));
        assert!(hook.is_connected("b"));
        assert!(!hook.disconnect("nonexistent"));
        assert_eq!(hook.handler_count(), 1);
    }

    #[test]
    fn test_handlers_run_in_connection_order() {
        let mut hook: Hook<PageRender> = Hook::new("page_render");
        hook.connect(
            "first",
            Arc::new(|e: &mut PageRender| {
                e.return_value.push('a');
                Ok(())
            }),
        );
        hook.connect(
            "second",
            Arc::new(|e: &mut PageRender| {
                e.return_value.push('b');
                Ok(())
            }),
        );

        let mut event = PageRender::new(Page::new(1, "home", "home"), String::new());
        hook.fire(&mut event).unwrap();
        assert_eq!(event.return_value, "ab");
    }

    #[test]
    fn test_failing_handler_stops_dispatch() {
        let mut hook: Hook<PageSaved> = Hook::new("page_saved");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        hook.connect(
            "fails",
            Arc::new(|_: &mut PageSaved| Err(FactoryError::RenderError("boom".into()))),
        );
        hook.connect(
            "never",
            Arc::new(move |_: &mut PageSaved| {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        assert!(hook.fire(&mut saved()).is_err());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_request_hooks() {
        let hooks = RequestHooks::default();
        assert_eq!(hooks.handler_count(), 0);
        assert_eq!(hooks.page_render.name(), "page_render");
    }
}
