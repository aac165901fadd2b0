//! Demo message API library.
//!
//! A small HTTP service that appends short text messages to a log and reads
//! them back, backed by process memory or a shared Redis list.

pub mod client;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod messages;
pub mod observability;
pub mod resilience;
pub mod store;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use messages::{Message, MessageLog};
