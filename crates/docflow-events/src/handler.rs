//! Event handler trait.

use async_trait::async_trait;

use docflow_core::events::DomainEvent;
use docflow_core::result::AppResult;

/// Reacts to published domain events.
///
/// Handlers may run more than once for the same logical event (a publisher
/// can retry after a partial failure), so they must be idempotent.
#[async_trait]
pub trait EventHandler: Send + Sync + std::fmt::Debug {
    /// Handles one event.
    async fn handle(&self, event: &DomainEvent) -> AppResult<()>;

    /// Name used in logs and dispatch reports.
    fn name(&self) -> &str;
}
