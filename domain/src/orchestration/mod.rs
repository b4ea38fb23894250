//! Orchestration domain.
//!
//! - [`retry`] - bounded per-slot retry policy and backoff schedule
//! - [`aggregate`] - ordered per-provider results and the sentinel rule
//! - [`value_objects`] - summary outcome and the final response
//! - [`entities`] - stages of a panel run

pub mod aggregate;
pub mod entities;
pub mod retry;
pub mod value_objects;
