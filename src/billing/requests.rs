//! List requests for billing resources

use crate::error::{Error, Result};
use crate::http::PageRequest;
use once_cell::sync::Lazy;
use regex::Regex;

/// Microsoft.Billing API version
pub const BILLING_API_VERSION: &str = "2020-05-01";

/// Microsoft.Resources API version for subscriptions and tenants
pub const RESOURCES_API_VERSION: &str = "2019-06-01";

/// Microsoft.Consumption API version
pub const CONSUMPTION_API_VERSION: &str = "2019-10-01";

const BILLING_ACCOUNTS: &str = "providers/Microsoft.Billing/billingAccounts";
const BILLING_PERIODS: &str = "providers/Microsoft.Billing/billingPeriods";
const USAGE_EXPAND: &str = "properties/additionalInfo,properties/meterDetails";

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

/// Check a `YYYY-MM-DD` date
pub fn validate_date(date: &str) -> Result<()> {
    if DATE.is_match(date) && chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok() {
        Ok(())
    } else {
        Err(Error::config(format!("invalid date {date:?}, expected YYYY-MM-DD")))
    }
}

/// Billing accounts visible to the caller
pub fn accounts_request() -> PageRequest {
    PageRequest::first(format!("/{BILLING_ACCOUNTS}"), BILLING_API_VERSION)
}

/// Subscriptions visible to the caller
pub fn subscriptions_request() -> PageRequest {
    PageRequest::first("/subscriptions", RESOURCES_API_VERSION)
}

/// Tenants the caller belongs to
pub fn tenants_request() -> PageRequest {
    PageRequest::first("/tenants", RESOURCES_API_VERSION)
}

/// Owner of an invoice list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceScope {
    BillingAccount(String),
    Subscription(String),
}

/// Invoices of a billing account or subscription within an optional period
pub fn invoices_request(
    scope: &InvoiceScope,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<PageRequest> {
    let path = match scope {
        InvoiceScope::BillingAccount(account) => {
            format!("/{BILLING_ACCOUNTS}/{account}/invoices")
        }
        InvoiceScope::Subscription(subscription) => format!(
            "/subscriptions/{subscription}/providers/Microsoft.Billing/billingSubscriptions/default/invoices"
        ),
    };
    let mut request = PageRequest::first(path, BILLING_API_VERSION);
    if let Some(start) = start {
        validate_date(start)?;
        request = request.query("periodStartDate", start);
    }
    if let Some(end) = end {
        validate_date(end)?;
        request = request.query("periodEndDate", end);
    }
    Ok(request)
}

/// Scope and period selection for usage details
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageQuery {
    pub scope: Option<String>,
    pub billing_account: Option<String>,
    pub subscription: Option<String>,
    pub billing_period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Join the scope segments, in order: explicit scope, billing account,
/// subscription, billing period
pub fn usage_scope(query: &UsageQuery) -> Result<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut push = |segment: String| {
        let segment = segment.trim_matches('/').to_string();
        if !segment.is_empty() {
            segments.push(segment);
        }
    };
    if let Some(scope) = &query.scope {
        push(scope.clone());
    }
    if let Some(account) = &query.billing_account {
        push(format!("{BILLING_ACCOUNTS}/{account}"));
    }
    if let Some(subscription) = &query.subscription {
        push(format!("subscriptions/{subscription}"));
    }
    if let Some(period) = &query.billing_period {
        push(format!("{BILLING_PERIODS}/{period}"));
    }
    if segments.is_empty() {
        return Err(Error::config("no scope specified"));
    }
    Ok(segments.join("/"))
}

/// Usage details below a scope
///
/// The `usageStart`/`usageEnd` filter is added only when both dates are
/// given.
pub fn usage_details_request(query: &UsageQuery) -> Result<PageRequest> {
    let scope = usage_scope(query)?;
    let mut request = PageRequest::first(
        format!("/{scope}/providers/Microsoft.Consumption/usageDetails"),
        CONSUMPTION_API_VERSION,
    )
    .query("$expand", USAGE_EXPAND);
    if let (Some(start), Some(end)) = (&query.start, &query.end) {
        validate_date(start)?;
        validate_date(end)?;
        request = request.query(
            "$filter",
            format!("properties/usageStart eq '{start}' and properties/usageEnd eq '{end}'"),
        );
    }
    Ok(request)
}
