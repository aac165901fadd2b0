//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the backing store:
//!     → timeouts.rs (enforce connect/command deadline)
//!     → On failure: error returned to the caller as-is
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries or circuit breaking: clients retry at their own discretion

pub mod timeouts;
