//! Handler registry — handlers registered per event kind with priority ordering.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use docflow_core::events::EventKind;

use super::handler::EventHandler;

/// Entry in the handler registry.
#[derive(Debug)]
struct HandlerEntry {
    /// The handler.
    handler: Arc<dyn EventHandler>,
    /// Priority (lower = earlier execution).
    priority: i32,
}

/// Registry of handlers organized by event kind.
#[derive(Debug)]
pub struct HandlerRegistry {
    /// Event kind → handlers sorted by priority.
    handlers: RwLock<HashMap<EventKind, Vec<HandlerEntry>>>,
}

impl HandlerRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a handler for an event kind.
    ///
    /// Handlers with equal priority run in registration order.
    pub async fn register(&self, kind: EventKind, priority: i32, handler: Arc<dyn EventHandler>) {
        let name = handler.name().to_string();

        let mut handlers = self.handlers.write().await;
        let entries = handlers.entry(kind).or_default();
        entries.push(HandlerEntry { handler, priority });
        entries.sort_by_key(|e| e.priority);

        info!(
            event = %kind,
            handler = %name,
            priority = priority,
            "Event handler registered"
        );
    }

    /// Returns all handlers for an event kind, sorted by priority.
    pub async fn get_handlers(&self, kind: EventKind) -> Vec<Arc<dyn EventHandler>> {
        let handlers = self.handlers.read().await;
        handlers
            .get(&kind)
            .map(|entries| entries.iter().map(|e| e.handler.clone()).collect())
            .unwrap_or_default()
    }

    /// Returns the number of handlers registered for an event kind.
    pub async fn handler_count(&self, kind: EventKind) -> usize {
        let handlers = self.handlers.read().await;
        handlers.get(&kind).map(|entries| entries.len()).unwrap_or(0)
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
