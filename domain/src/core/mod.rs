//! Core domain concepts shared across all subdomains.
//!
//! - [`prompt::Prompt`] - validated user text to pose to the panel
//! - [`provider_id::ProviderId`] - stable name of a backend, the aggregation key
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod prompt;
pub mod provider_id;
pub mod string;
