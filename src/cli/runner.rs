//! CLI runner - executes commands

use crate::billing::{
    accounts_request, invoices_request, subscriptions_request, tenants_request,
    usage_details_request, Account, Invoice, InvoiceScope, Resource, Subscription, Tenant,
    UsageDetailSource, UsageQuery,
};
use crate::cli::commands::{Cli, Commands, InvoiceArgs, UsageArgs};
use crate::config::Settings;
use crate::convert::Mode;
use crate::database::DuckDbStore;
use crate::engine::Exporter;
use crate::error::{Error, Result};
use crate::http::{ArmClient, PageRequest};
use crate::output::{serializer_for, OutputFormat, ProgressSummary, ProgressTracker, Sink};
use crate::source::{ArmPager, JsonLinesSource, RecordSource};
use crate::types::OptionStringExt;
use tracing::{info, warn};

/// Format used when neither flag, environment nor settings name one
pub const DEFAULT_FORMAT: &str = "csv";

/// CLI runner
pub struct Runner {
    cli: Cli,
    settings: Settings,
}

impl Runner {
    /// Create a runner, loading the settings file if one is given
    pub fn new(cli: Cli) -> Result<Self> {
        let settings = match &cli.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        Ok(Self::with_settings(cli, settings))
    }

    /// Create a runner with explicit settings
    pub fn with_settings(cli: Cli, settings: Settings) -> Self {
        Self { cli, settings }
    }

    /// Whether progress and informational output are suppressed
    pub fn quiet(&self) -> bool {
        self.cli.quiet || self.settings.quiet.unwrap_or(false)
    }

    /// Effective output format
    pub fn format(&self) -> Result<OutputFormat> {
        self.cli
            .format
            .as_deref()
            .or(self.settings.format.as_deref())
            .unwrap_or(DEFAULT_FORMAT)
            .parse()
    }

    /// Effective output path
    pub fn output(&self) -> Option<&str> {
        self.cli.output.as_deref().or(self.settings.output.as_deref())
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<ProgressSummary> {
        // Fails before any request or output
        let format = self.format()?;

        match &self.cli.command {
            Commands::Accounts => {
                let client = self.client()?;
                let request = self.log_request(&client, Resource::Accounts, accounts_request())?;
                let mut source: ArmPager<Account> = ArmPager::new(client, request);
                self.export(Resource::Accounts, format, &mut source).await
            }
            Commands::Invoices(args) => {
                let request = invoice_request(args)?;
                let client = self.client()?;
                let request = self.log_request(&client, Resource::Invoices, request)?;
                let mut source: ArmPager<Invoice> = ArmPager::new(client, request);
                self.export(Resource::Invoices, format, &mut source).await
            }
            Commands::Subscriptions => {
                let client = self.client()?;
                let request =
                    self.log_request(&client, Resource::Subscriptions, subscriptions_request())?;
                let mut source: ArmPager<Subscription> = ArmPager::new(client, request);
                self.export(Resource::Subscriptions, format, &mut source).await
            }
            Commands::Tenants => {
                let client = self.client()?;
                let request = self.log_request(&client, Resource::Tenants, tenants_request())?;
                let mut source: ArmPager<Tenant> = ArmPager::new(client, request);
                self.export(Resource::Tenants, format, &mut source).await
            }
            Commands::UsageDetails(args) => {
                let request = usage_details_request(&usage_query(args))?;
                let client = self.client()?;
                let request = self.log_request(&client, Resource::UsageDetails, request)?;
                let mut source = UsageDetailSource::new(ArmPager::new(client, request));
                self.export(Resource::UsageDetails, format, &mut source).await
            }
            Commands::Replay { kind, file } => {
                let mut source = JsonLinesSource::open(file, kind.descriptor()).await?;
                self.export(*kind, format, &mut source).await
            }
        }
    }

    fn client(&self) -> Result<ArmClient> {
        let token = self.cli.token.clone().none_if_empty();
        if token.is_none() {
            warn!("No access token given, requests will be unauthenticated");
        }
        ArmClient::new(
            self.settings
                .client_config(self.cli.endpoint.as_deref(), token.as_deref()),
        )
    }

    fn log_request(
        &self,
        client: &ArmClient,
        resource: Resource,
        request: PageRequest,
    ) -> Result<PageRequest> {
        let url = client.url_for(&request)?;
        info!("Requesting {} from {}", resource, url);
        Ok(request)
    }

    /// Open the configured sink
    pub fn open_sink(&self) -> Result<Sink> {
        match &self.cli.document_db {
            Some(path) => {
                let store =
                    DuckDbStore::open(path, &self.cli.document_table, self.cli.document_drop)?;
                Ok(Sink::Documents(Box::new(store)))
            }
            None => Sink::from_path(self.output()),
        }
    }

    async fn export<S: RecordSource>(
        &self,
        resource: Resource,
        format: OutputFormat,
        source: &mut S,
    ) -> Result<ProgressSummary> {
        let sink = self.open_sink()?;
        let ticks = !sink.is_stdout();
        let serializer = serializer_for(format, sink, &|mode: Mode| resource.modifiers(mode))?;
        let progress = ProgressTracker::new().quiet(self.quiet()).ticks(ticks);
        let mut exporter = Exporter::new(serializer, progress);
        exporter.export(source).await
    }
}

fn invoice_request(args: &InvoiceArgs) -> Result<PageRequest> {
    let scope = match (&args.billing_account, &args.subscription) {
        (Some(account), _) => InvoiceScope::BillingAccount(account.clone()),
        (None, Some(subscription)) => InvoiceScope::Subscription(subscription.clone()),
        (None, None) => {
            return Err(Error::config(
                "either --billing-account or --subscription is required",
            ))
        }
    };
    invoices_request(&scope, args.start.as_deref(), args.end.as_deref())
}

fn usage_query(args: &UsageArgs) -> UsageQuery {
    UsageQuery {
        scope: args.scope.clone(),
        billing_account: args.billing_account.clone(),
        subscription: args.subscription.clone(),
        billing_period: args.billing_period.clone(),
        start: args.start.clone(),
        end: args.end.clone(),
    }
}
