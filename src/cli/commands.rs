//! CLI commands and argument parsing

use crate::billing::Resource;
use crate::database::DEFAULT_TABLE;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Azure billing data exporter
#[derive(Parser, Debug)]
#[command(name = "azbill")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format [csv,json,flatten,pretty] (default: csv)
    #[arg(long, global = true, env = "AZBILL_FORMAT")]
    pub format: Option<String>,

    /// Output file path, `-` for stdout
    #[arg(short, long, global = true)]
    pub output: Option<String>,

    /// Write documents to this DuckDB database instead of a text stream
    #[arg(long, global = true)]
    pub document_db: Option<PathBuf>,

    /// Table for documents
    #[arg(long, global = true, default_value = DEFAULT_TABLE)]
    pub document_table: String,

    /// Drop the existing document table first
    #[arg(long, global = true)]
    pub document_drop: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (YAML)
    #[arg(long, global = true, env = "AZBILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Bearer token for Resource Manager
    #[arg(long, global = true, env = "AZURE_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Resource Manager endpoint
    #[arg(long, global = true, env = "AZBILL_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List billing accounts you have access to
    #[command(visible_alias = "a")]
    Accounts,

    /// List invoices
    #[command(visible_alias = "i")]
    Invoices(InvoiceArgs),

    /// List subscriptions
    #[command(visible_alias = "s")]
    Subscriptions,

    /// List tenants
    #[command(visible_alias = "t")]
    Tenants,

    /// List usage details
    #[command(visible_alias = "u")]
    UsageDetails(UsageArgs),

    /// Re-export records saved as JSON lines
    Replay {
        /// Record kind stored in the file
        #[arg(value_enum)]
        kind: Resource,

        /// JSON lines file
        file: PathBuf,
    },
}

/// Invoice selection
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("owner").required(true).args(["billing_account", "subscription"])))]
pub struct InvoiceArgs {
    /// Billing account
    #[arg(short = 'A', long)]
    pub billing_account: Option<String>,

    /// Subscription
    #[arg(short = 'S', long)]
    pub subscription: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

/// Usage detail scope and period
#[derive(Args, Debug, Clone)]
pub struct UsageArgs {
    /// Scope
    #[arg(long)]
    pub scope: Option<String>,

    /// Billing account
    #[arg(short = 'A', long)]
    pub billing_account: Option<String>,

    /// Billing period
    #[arg(short = 'P', long)]
    pub billing_period: Option<String>,

    /// Subscription
    #[arg(short = 'S', long)]
    pub subscription: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}
