//! CLI module
//!
//! Command-line interface for exporting billing data.
//!
//! # Commands
//!
//! - `accounts` - Billing accounts
//! - `invoices` - Invoices of a billing account or subscription
//! - `subscriptions` - Subscriptions
//! - `tenants` - Tenants
//! - `usage-details` - Legacy usage details below a scope
//! - `replay` - Re-export saved JSON lines

mod commands;
mod runner;

pub use commands::{Cli, Commands, InvoiceArgs, UsageArgs};
pub use runner::{Runner, DEFAULT_FORMAT};
