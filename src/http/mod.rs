//! Azure Resource Manager HTTP client
//!
//! Provides the HTTP plumbing behind the ARM record sources.
//!
//! # Features
//!
//! - **Bearer Authentication**: A pre-acquired access token on every request
//! - **Automatic Retries**: 429, 5xx, timeouts and connection failures
//! - **Exponential Backoff**: Capped, honoring `Retry-After` when present
//! - **Paging**: `value` + `nextLink` response envelopes

mod client;
mod types;

pub use client::{ArmClient, ArmClientConfig, ArmClientConfigBuilder, DEFAULT_ENDPOINT};
pub use types::{Page, PageRequest};

#[cfg(test)]
mod tests;
