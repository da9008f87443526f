//! Domain services for GatePass.
//!
//! Services contain business logic that operates on domain models.

pub mod lifecycle;
pub mod memory_store;
pub mod store;

pub use lifecycle::{InvalidState, LifecycleError, TicketLifecycle, MAX_CODE_ATTEMPTS};
pub use memory_store::InMemoryTicketStore;
pub use store::{CapacityInsert, StoreError, TicketStore};
