//! Event bus — publishes domain events to registered handlers.
//!
//! Delivery is synchronous from the publisher's point of view: `publish`
//! awaits each handler in ascending priority and returns only once all of
//! them succeeded. The first failing handler stops the dispatch and its
//! error is returned, so the triggering operation fails loudly and can be
//! retried; handlers are idempotent, so re-running the earlier ones is
//! harmless.

use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use docflow_core::events::{DomainEvent, EventKind};
use docflow_core::result::AppResult;

use super::handler::EventHandler;
use super::registry::HandlerRegistry;

/// Outcome of a successful dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// The dispatched event.
    pub event_id: Uuid,
    /// Its kind.
    pub kind: EventKind,
    /// Names of the handlers that ran, in execution order.
    pub handlers_run: Vec<String>,
}

/// In-process publish/subscribe bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    /// Handler registry.
    registry: Arc<HandlerRegistry>,
}

impl EventBus {
    /// Creates a bus with an empty registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(HandlerRegistry::new()))
    }

    /// Creates a bus over an existing registry.
    pub fn with_registry(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Subscribes `handler` to `kind`. Lower priorities run first.
    pub async fn subscribe(&self, kind: EventKind, handler: Arc<dyn EventHandler>, priority: i32) {
        self.registry.register(kind, priority, handler).await;
    }

    /// Publishes an event to every handler registered for its kind.
    pub async fn publish(&self, event: &DomainEvent) -> AppResult<DispatchReport> {
        let kind = event.kind();
        let handlers = self.registry.get_handlers(kind).await;

        debug!(
            event_id = %event.id,
            event = %kind,
            handler_count = handlers.len(),
            "Dispatching event"
        );

        let mut handlers_run = Vec::with_capacity(handlers.len());
        for handler in &handlers {
            if let Err(err) = handler.handle(event).await {
                error!(
                    event_id = %event.id,
                    event = %kind,
                    handler = %handler.name(),
                    error = %err,
                    "Event handler failed"
                );
                return Err(err);
            }
            handlers_run.push(handler.name().to_string());
        }

        Ok(DispatchReport {
            event_id: event.id,
            kind,
            handlers_run,
        })
    }

    /// Returns a reference to the handler registry.
    pub fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.registry
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
