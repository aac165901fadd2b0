//! Message log subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/messages
//!     → log.rs append (validate, assign id, stamp time + origin)
//!     → serde_json record
//!     → ListStore::push
//!
//! GET /api/messages
//!     → log.rs list_all
//!     → ListStore::range_all (oldest first)
//!     → Vec<Message>
//! ```
//!
//! # Design Decisions
//! - Append-only: no update, delete, search or filter
//! - Ids come from the store's counter, reserved and pushed in one atomic step,
//!   unless `IdStrategy::Length` is chosen
//! - Read order is append order, which under the counter is also id order

pub mod log;
pub mod types;

pub use log::{LogError, MessageLog};
pub use types::{
    HealthStatus, Message, MessageCreated, MessageList, NewMessage, ServiceStatus,
};
