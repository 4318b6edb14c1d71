//! Billing resources
//!
//! Transfer shapes, list requests and per-resource modifier hooks for the
//! resources the exporter knows about.
//!
//! # Overview
//!
//! | Resource        | Endpoint                                             | API version |
//! |-----------------|------------------------------------------------------|-------------|
//! | billing account | `/providers/Microsoft.Billing/billingAccounts`       | 2020-05-01  |
//! | invoice         | `…/billingAccounts/{id}/invoices` or subscription's  | 2020-05-01  |
//! | subscription    | `/subscriptions`                                     | 2019-06-01  |
//! | tenant          | `/tenants`                                           | 2019-06-01  |
//! | usage detail    | `{scope}/providers/Microsoft.Consumption/usageDetails` | 2019-10-01 |

mod requests;
mod types;

pub use requests::{
    accounts_request, invoices_request, subscriptions_request, tenants_request,
    usage_details_request, usage_scope, validate_date, InvoiceScope, UsageQuery,
    BILLING_API_VERSION, CONSUMPTION_API_VERSION, RESOURCES_API_VERSION,
};
pub use types::{
    Account, AccountProperties, AddressDetails, Amount, BillingProfilesOnExpand, Enrollment,
    EnrollmentPolicies, Invoice, InvoiceProperties, LegacyUsageDetail,
    LegacyUsageDetailProperties, MeterDetails, Subscription, SubscriptionPolicies, Tenant,
    LEGACY_KIND,
};

use crate::convert::Mode;
use crate::error::{Error, Result};
use crate::output::{parse_json_field, stringify_map, Modifiers};
use crate::record::{RecordDescriptor, RecordType};
use crate::source::{ArmPager, RecordSource};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exportable resource kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Resource {
    Accounts,
    Invoices,
    Subscriptions,
    Tenants,
    UsageDetails,
}

impl Resource {
    /// Descriptor of the resource's transfer shape
    pub fn descriptor(self) -> &'static RecordDescriptor {
        match self {
            Resource::Accounts => Account::record_descriptor(),
            Resource::Invoices => Invoice::record_descriptor(),
            Resource::Subscriptions => Subscription::record_descriptor(),
            Resource::Tenants => Tenant::record_descriptor(),
            Resource::UsageDetails => LegacyUsageDetail::record_descriptor(),
        }
    }

    /// Modifier hooks for the given conversion mode
    pub fn modifiers(self, mode: Mode) -> Modifiers {
        match self {
            Resource::UsageDetails => usage_detail_modifiers(mode),
            _ => Modifiers::new(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Accounts => "accounts",
            Resource::Invoices => "invoices",
            Resource::Subscriptions => "subscriptions",
            Resource::Tenants => "tenants",
            Resource::UsageDetails => "usage-details",
        })
    }
}

/// Hooks for usage details
///
/// Flattened output carries `tags` as JSON text; nested output parses the
/// `additionalInfo` string into an object.
pub fn usage_detail_modifiers(mode: Mode) -> Modifiers {
    match mode {
        Mode::Flatten => Modifiers::new().with(stringify_map("tags")),
        Mode::Nested => Modifiers::new().with(parse_json_field(&["properties", "additionalInfo"])),
    }
}

/// Usage detail pager that rejects non-legacy records
pub struct UsageDetailSource {
    pager: ArmPager<LegacyUsageDetail>,
}

impl UsageDetailSource {
    pub fn new(pager: ArmPager<LegacyUsageDetail>) -> Self {
        Self { pager }
    }
}

#[async_trait]
impl RecordSource for UsageDetailSource {
    type Record = LegacyUsageDetail;

    async fn next_record(&mut self) -> Result<Option<LegacyUsageDetail>> {
        match self.pager.next_record().await? {
            Some(detail) if detail.kind != LEGACY_KIND => Err(Error::source_error(format!(
                "unsupported usage detail kind {:?}",
                detail.kind
            ))),
            other => Ok(other),
        }
    }
}
