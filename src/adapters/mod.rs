//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `clock` - System and fixed clocks
//! - `events` - Event bus implementations (in-memory, tracing audit log)
//! - `memory` - In-memory stores for tests and database-less runs
//! - `postgres` - PostgreSQL-backed stores
//! - `http` - REST API

pub mod clock;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use clock::{FixedClock, SystemClock};
pub use events::{InMemoryEventBus, TracingEventPublisher};
pub use memory::{InMemoryActionPlanStore, InMemoryPatientDirectory, InMemoryPhaseAccessStore};
pub use postgres::{PostgresActionPlanStore, PostgresPatientDirectory, PostgresPhaseAccessStore};
