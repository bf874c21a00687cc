//! # docflow-events
//!
//! In-process publish/subscribe for domain events.
//!
//! Handlers are registered per [`EventKind`] with an explicit priority at
//! startup. Publishing runs every handler for the event's kind, awaited one
//! after another in ascending priority, before `publish` returns.
//!
//! [`EventKind`]: docflow_core::events::EventKind

pub mod bus;
pub mod handler;
pub mod registry;

pub use bus::{DispatchReport, EventBus};
pub use handler::EventHandler;
pub use registry::HandlerRegistry;
