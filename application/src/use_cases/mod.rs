//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod dispatch;
pub mod run_panel;
pub(crate) mod shared;
pub mod summarize;
