//! Event bus adapters.
//!
//! - `InMemoryEventBus` - captures events for test assertions
//! - `TracingEventPublisher` - writes events to the structured audit log

mod in_memory;
mod tracing_publisher;

pub use in_memory::InMemoryEventBus;
pub use tracing_publisher::TracingEventPublisher;
