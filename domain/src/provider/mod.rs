//! Provider call outcomes.
//!
//! - [`failure::FailureKind`] - classification every adapter must produce
//! - [`failure::ProviderFailure`] - a classified failure with detail text
//! - [`result::ProviderResult`] - tagged outcome of one provider call
//! - [`result::ProviderRequest`] - the outbound unit shared by all slots

pub mod failure;
pub mod result;
