//! Transfer shapes for ARM billing resources
//!
//! Plain data, deserialized straight from list responses. Read-only
//! properties the service may leave out are optional references.

use crate::record::{Decimal, Optional, Timestamp, Uuid};
use crate::types::JsonValue;
use std::collections::BTreeMap;

// ============================================================================
// Billing Accounts
// ============================================================================

crate::record! {
    /// A billing account
    pub struct Account {
        id: Optional<String> => "id",
        name: Optional<String> => "name",
        resource_type: Optional<String> => "type",
        properties: Optional<AccountProperties> => "properties",
    }
}

crate::record! {
    pub struct AccountProperties {
        display_name: Optional<String> => "displayName",
        sold_to: Optional<AddressDetails> => "soldTo",
        account_status: String => "accountStatus",
        account_type: String => "accountType",
        agreement_type: String => "agreementType",
        billing_profiles: Optional<BillingProfilesOnExpand> => "billingProfiles",
        enrollment_details: Optional<Enrollment> => "enrollmentDetails",
        departments: Option<Vec<JsonValue>> => "departments",
        enrollment_accounts: Option<Vec<JsonValue>> => "enrollmentAccounts",
        has_read_access: Optional<bool> => "hasReadAccess",
    }
}

crate::record! {
    /// Postal address of a billing account owner
    pub struct AddressDetails {
        first_name: Optional<String> => "firstName",
        last_name: Optional<String> => "lastName",
        company_name: Optional<String> => "companyName",
        address_line1: Optional<String> => "addressLine1",
        address_line2: Optional<String> => "addressLine2",
        address_line3: Optional<String> => "addressLine3",
        city: Optional<String> => "city",
        district: Optional<String> => "district",
        region: Optional<String> => "region",
        country: Optional<String> => "country",
        postal_code: Optional<String> => "postalCode",
        email: Optional<String> => "email",
        phone_number: Optional<String> => "phoneNumber",
    }
}

crate::record! {
    pub struct BillingProfilesOnExpand {
        has_more_results: Optional<bool> => "hasMoreResults",
        value: Option<Vec<JsonValue>> => "value",
    }
}

crate::record! {
    /// Enterprise agreement enrollment
    pub struct Enrollment {
        start_date: Optional<Timestamp> => "startDate",
        end_date: Optional<Timestamp> => "endDate",
        currency: Optional<String> => "currency",
        channel: Optional<String> => "channel",
        policies: Optional<EnrollmentPolicies> => "policies",
        language: Optional<String> => "language",
        country_code: Optional<String> => "countryCode",
        status: Optional<String> => "status",
        billing_cycle: Optional<String> => "billingCycle",
    }
}

crate::record! {
    pub struct EnrollmentPolicies {
        account_owner_view_charges: Optional<bool> => "accountOwnerViewCharges",
        department_admin_view_charges: Optional<bool> => "departmentAdminViewCharges",
        marketplaces_enabled: Optional<bool> => "marketplacesEnabled",
        reserved_instances_enabled: Optional<bool> => "reservedInstancesEnabled",
    }
}

// ============================================================================
// Invoices
// ============================================================================

crate::record! {
    /// An invoice
    pub struct Invoice {
        id: Optional<String> => "id",
        name: Optional<String> => "name",
        resource_type: Optional<String> => "type",
        properties: Optional<InvoiceProperties> => "properties",
    }
}

crate::record! {
    pub struct InvoiceProperties {
        due_date: Optional<Timestamp> => "dueDate",
        invoice_date: Optional<Timestamp> => "invoiceDate",
        status: String => "status",
        amount_due: Optional<Amount> => "amountDue",
        azure_prepayment_applied: Optional<Amount> => "azurePrepaymentApplied",
        billed_amount: Optional<Amount> => "billedAmount",
        credit_amount: Optional<Amount> => "creditAmount",
        free_azure_credit_applied: Optional<Amount> => "freeAzureCreditApplied",
        sub_total: Optional<Amount> => "subTotal",
        tax_amount: Optional<Amount> => "taxAmount",
        total_amount: Optional<Amount> => "totalAmount",
        invoice_period_start_date: Optional<Timestamp> => "invoicePeriodStartDate",
        invoice_period_end_date: Optional<Timestamp> => "invoicePeriodEndDate",
        invoice_type: String => "invoiceType",
        is_monthly_invoice: Optional<bool> => "isMonthlyInvoice",
        billing_profile_id: Optional<String> => "billingProfileId",
        billing_profile_display_name: Optional<String> => "billingProfileDisplayName",
        purchase_order_number: Optional<String> => "purchaseOrderNumber",
        documents: Option<Vec<JsonValue>> => "documents",
        payments: Option<Vec<JsonValue>> => "payments",
        subscription_id: Optional<String> => "subscriptionId",
    }
}

crate::record! {
    /// Monetary amount as reported by the service
    pub struct Amount {
        currency: Optional<String> => "currency",
        value: Optional<f64> => "value",
    }
}

// ============================================================================
// Subscriptions and Tenants
// ============================================================================

crate::record! {
    /// A subscription visible to the caller
    pub struct Subscription {
        id: Optional<String> => "id",
        subscription_id: Optional<String> => "subscriptionId",
        display_name: Optional<String> => "displayName",
        tenant_id: Optional<String> => "tenantId",
        state: String => "state",
        subscription_policies: Optional<SubscriptionPolicies> => "subscriptionPolicies",
        authorization_source: Optional<String> => "authorizationSource",
        managed_by_tenants: Option<Vec<JsonValue>> => "managedByTenants",
    }
}

crate::record! {
    pub struct SubscriptionPolicies {
        location_placement_id: Optional<String> => "locationPlacementId",
        quota_id: Optional<String> => "quotaId",
        spending_limit: String => "spendingLimit",
    }
}

crate::record! {
    /// A tenant the caller belongs to
    pub struct Tenant {
        id: Optional<String> => "id",
        tenant_id: Optional<String> => "tenantId",
        tenant_category: String => "tenantCategory",
        country: Optional<String> => "country",
        country_code: Optional<String> => "countryCode",
        display_name: Optional<String> => "displayName",
        domains: Option<Vec<String>> => "domains",
    }
}

// ============================================================================
// Usage Details
// ============================================================================

/// Usage detail kind handled by [`LegacyUsageDetail`]
pub const LEGACY_KIND: &str = "legacy";

crate::record! {
    /// A legacy (EA and Web Direct) usage detail line
    pub struct LegacyUsageDetail {
        kind: String => "kind",
        id: Optional<String> => "id",
        name: Optional<String> => "name",
        resource_type: Optional<String> => "type",
        tags: Option<BTreeMap<String, Optional<String>>> => "tags",
        properties: Optional<LegacyUsageDetailProperties> => "properties",
    }
}

crate::record! {
    pub struct LegacyUsageDetailProperties {
        billing_account_id: Optional<String> => "billingAccountId",
        billing_account_name: Optional<String> => "billingAccountName",
        billing_period_start_date: Optional<Timestamp> => "billingPeriodStartDate",
        billing_period_end_date: Optional<Timestamp> => "billingPeriodEndDate",
        billing_profile_id: Optional<String> => "billingProfileId",
        billing_profile_name: Optional<String> => "billingProfileName",
        account_owner_id: Optional<String> => "accountOwnerId",
        account_name: Optional<String> => "accountName",
        subscription_id: Optional<String> => "subscriptionId",
        subscription_name: Optional<String> => "subscriptionName",
        date: Optional<Timestamp> => "date",
        product: Optional<String> => "product",
        part_number: Optional<String> => "partNumber",
        meter_id: Optional<Uuid> => "meterId",
        meter_details: Optional<MeterDetails> => "meterDetails",
        quantity: Optional<Decimal> => "quantity",
        effective_price: Optional<Decimal> => "effectivePrice",
        cost: Optional<Decimal> => "cost",
        unit_price: Optional<Decimal> => "unitPrice",
        billing_currency: Optional<String> => "billingCurrency",
        resource_location: Optional<String> => "resourceLocation",
        consumed_service: Optional<String> => "consumedService",
        resource_id: Optional<String> => "resourceId",
        resource_name: Optional<String> => "resourceName",
        service_info1: Optional<String> => "serviceInfo1",
        service_info2: Optional<String> => "serviceInfo2",
        additional_info: Optional<String> => "additionalInfo",
        invoice_section: Optional<String> => "invoiceSection",
        cost_center: Optional<String> => "costCenter",
        resource_group: Optional<String> => "resourceGroup",
        reservation_id: Optional<String> => "reservationId",
        reservation_name: Optional<String> => "reservationName",
        product_order_id: Optional<String> => "productOrderId",
        product_order_name: Optional<String> => "productOrderName",
        offer_id: Optional<String> => "offerId",
        is_azure_credit_eligible: Optional<bool> => "isAzureCreditEligible",
        term: Optional<String> => "term",
        publisher_name: Optional<String> => "publisherName",
        publisher_type: Optional<String> => "publisherType",
        plan_name: Optional<String> => "planName",
        charge_type: Optional<String> => "chargeType",
        frequency: Optional<String> => "frequency",
    }
}

crate::record! {
    pub struct MeterDetails {
        meter_name: Optional<String> => "meterName",
        meter_category: Optional<String> => "meterCategory",
        meter_sub_category: Optional<String> => "meterSubCategory",
        unit_of_measure: Optional<String> => "unitOfMeasure",
        service_family: Optional<String> => "serviceFamily",
    }
}
