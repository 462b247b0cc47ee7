//! Monetization profile of an organization.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value, json};
use url::Url;

use edgemgmt_client::{ApiClient, ApiError, JSON, OCTET_STREAM, Result};
use edgemgmt_types::{
    Address, BillingCycleType, BillingType, Country, CurrencyCode, OrgType, StatusType,
    SupportedCurrency, TaxModelType,
};

use crate::value::{array_field, as_bool, as_opt_string, as_string, decode};

const BASE: [&str; 2] = ["mint", "organizations"];

/// Keys handled directly by [`Organization::load_from_raw_data`] instead of
/// being routed to a setter.
const HYDRATION_EXCLUDED: [&str; 5] = ["address", "regNo", "taxRegNo", "parent", "children"];

/// A mint organization.
///
/// Entities are keyed by `name`; ids are assigned by the server and never
/// generated locally.
#[derive(Debug, Clone)]
pub struct Organization {
    client: ApiClient,
    addresses: Vec<Address>,
    approve_trusted: bool,
    approve_untrusted: bool,
    billing_cycle: BillingCycleType,
    children: Option<Vec<Organization>>,
    country: String,
    currency: CurrencyCode,
    description: String,
    group_organization: bool,
    has_broker: bool,
    has_self_billing: bool,
    has_separate_invoice_for_product: bool,
    id: String,
    issue_netting_statement: bool,
    logo_url: Option<String>,
    name: Option<String>,
    netting_statement_per_currency: bool,
    org_type: Option<OrgType>,
    parent: Option<Box<Organization>>,
    reg_no: Option<String>,
    self_billing_as_exch_org: bool,
    self_billing_for_all_dev: bool,
    separate_invoice_for_fees: bool,
    status: StatusType,
    supported_billing_type: Option<BillingType>,
    tax_model: TaxModelType,
    tax_nexus: Option<String>,
    tax_reg_no: Option<String>,
    timezone: String,
}

impl Organization {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            addresses: Vec::new(),
            approve_trusted: false,
            approve_untrusted: false,
            billing_cycle: BillingCycleType::default(),
            children: None,
            country: "US".to_string(),
            currency: CurrencyCode::default(),
            description: String::new(),
            group_organization: false,
            has_broker: false,
            has_self_billing: false,
            has_separate_invoice_for_product: false,
            id: String::new(),
            issue_netting_statement: false,
            logo_url: Some(String::new()),
            name: None,
            netting_statement_per_currency: false,
            org_type: None,
            parent: None,
            reg_no: Some(String::new()),
            self_billing_as_exch_org: false,
            self_billing_for_all_dev: false,
            separate_invoice_for_fees: false,
            status: StatusType::default(),
            supported_billing_type: None,
            tax_model: TaxModelType::default(),
            tax_nexus: None,
            tax_reg_no: Some(String::new()),
            timezone: "UTC".to_string(),
        }
    }

    /// Reset every field to its default, keeping the client.
    pub fn init_values(&mut self) {
        *self = Self::new(self.client.clone());
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `id`, else this organization's name, else the configured organization.
    fn resolve_id(&self, id: Option<&str>) -> String {
        id.filter(|id| !id.is_empty())
            .or(self.name.as_deref().filter(|name| !name.is_empty()))
            .unwrap_or_else(|| self.client.org_name())
            .to_string()
    }

    /// Listing every mint organization is not supported by the remote API.
    pub fn get_list(&self) -> Result<Vec<Organization>> {
        Err(ApiError::NotImplemented(
            "Organization::get_list is not supported by the mint API".to_string(),
        ))
    }

    /// Names of every organization visible to the configured credentials.
    pub async fn list_organization_identifiers(&self) -> Result<Vec<String>> {
        let value = self.client.get_json(&["organizations"], &[]).await?;
        decode(value, "organizations")
    }

    /// Load an organization by id, consulting the cache first.
    pub async fn load(&mut self, id: Option<&str>) -> Result<()> {
        let id = self.resolve_id(id);
        let data = self
            .client
            .get_json_cached(
                &format!("mint_organization:{id}"),
                &[BASE[0], BASE[1], id.as_str()],
                &[],
            )
            .await?;
        self.load_from_raw_data(&data, true)
    }

    /// Apply a raw JSON object to this organization.
    ///
    /// With `reset`, defaults are restored first; otherwise the payload is
    /// merged over the current state.
    pub fn load_from_raw_data(&mut self, data: &Value, reset: bool) -> Result<()> {
        if reset {
            self.init_values();
        }
        let Some(map) = data.as_object() else {
            return Err(ApiError::parameter(
                "organization data must be a JSON object",
            ));
        };

        for entry in array_field(data, "address") {
            self.addresses.push(decode(entry.clone(), "organization address")?);
        }

        if let Some(parent) = map.get("parent").filter(|parent| parent.is_object()) {
            let mut organization = Organization::new(self.client.clone());
            organization.load_from_raw_data(parent, true)?;
            self.parent = Some(Box::new(organization));
        }

        self.tax_reg_no = as_opt_string(map.get("taxRegNo"));
        self.reg_no = as_opt_string(map.get("regNo"));

        for (key, value) in map {
            if HYDRATION_EXCLUDED.contains(&key.as_str()) {
                continue;
            }
            self.set_property(key, value)?;
        }
        Ok(())
    }

    /// Route one remote property to its setter. `null` clears optional fields,
    /// blanks strings and leaves mandatory enumerations untouched.
    fn set_property(&mut self, key: &str, value: &Value) -> Result<()> {
        match key {
            "billingCycle" | "status" | "taxModel" if value.is_null() => {}
            "orgType" if value.is_null() => self.org_type = None,
            "supportedBillingType" if value.is_null() => self.supported_billing_type = None,
            "approveTrusted" => self.set_approve_trusted(as_bool(value)),
            "approveUntrusted" => self.set_approve_untrusted(as_bool(value)),
            "billingCycle" => self.set_billing_cycle(&as_string(value))?,
            "country" => self.set_country(&as_string(value)),
            "currency" => self.set_currency(&as_string(value)),
            "description" => self.set_description(as_string(value)),
            "groupOrganization" => self.set_group_organization(as_bool(value)),
            "hasBroker" => self.set_has_broker(as_bool(value)),
            "hasSelfBilling" => self.set_has_self_billing(as_bool(value)),
            "hasSeparateInvoiceForProduct" => {
                self.set_has_separate_invoice_for_product(as_bool(value));
            }
            "id" => self.set_id(as_string(value)),
            "issueNettingStmt" => self.set_issue_netting_statement(as_bool(value)),
            "logoUrl" => self.set_logo_url(&as_string(value))?,
            "name" => self.set_name(as_string(value)),
            "nettingStmtPerCurrency" => self.set_netting_statement_per_currency(as_bool(value)),
            "orgType" => self.set_org_type(&as_string(value))?,
            "selfBillingAsExchOrg" => self.set_self_billing_as_exch_org(as_bool(value)),
            "selfBillingForAllDev" => self.set_self_billing_for_all_dev(as_bool(value)),
            "separateInvoiceForFees" => self.set_separate_invoice_for_fees(as_bool(value)),
            "status" => self.set_status(&as_string(value))?,
            "supportedBillingType" => self.set_supported_billing_type(&as_string(value))?,
            "taxModel" => self.set_tax_model(&as_string(value))?,
            "taxNexus" => self.set_tax_nexus(as_opt_string(Some(value))),
            "timezone" => self.set_timezone(as_string(value)),
            _ => tracing::info!(property = key, "Organization has no setter for property; skipping"),
        }
        Ok(())
    }

    /// Sync this organization and its child entities from the management
    /// core. Returns the raw response body.
    pub async fn sync_all_from_4g(&self, id: Option<&str>) -> Result<String> {
        let id = self.resolve_id(id);
        if id.is_empty() {
            return Err(ApiError::parameter("Missing organization name"));
        }
        self.client
            .get_text(
                &[BASE[0], BASE[1], id.as_str(), "sync-organization"],
                &[("childEntities", "true")],
                JSON,
            )
            .await
    }

    pub async fn list_supported_currencies(
        &self,
        id: Option<&str>,
        include_children: bool,
    ) -> Result<Vec<SupportedCurrency>> {
        let id = id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| self.client.org_name())
            .to_string();
        let include = if include_children { "true" } else { "false" };
        let data = self
            .client
            .get_json_cached(
                &format!("supported-currencies:{id}/include_children={include}"),
                &[BASE[0], BASE[1], id.as_str(), "supported-currencies"],
                &[("include_children", include)],
            )
            .await?;

        array_field(&data, "supportedCurrency")
            .iter()
            .map(|entry| decode(entry.clone(), "supported currency"))
            .collect()
    }

    /// Download the prepaid balance report for one developer and currency.
    ///
    /// `month` is the English month name (any case); the report is returned as
    /// the raw CSV text.
    pub async fn get_prepaid_balance_report(
        &self,
        month: &str,
        year: i32,
        developer_id: &str,
        currency_id: &str,
    ) -> Result<String> {
        let org = self.client.org_name();
        let body = json!({
            "showTxDetail": true,
            "devCriteria": [{ "id": developer_id, "orgId": org }],
            "currCriteria": [{ "id": currency_id.to_lowercase(), "orgId": org }],
            "billingMonth": month.to_uppercase(),
            "billingYear": year,
        });
        self.client
            .post_for_text(
                &[BASE[0], BASE[1], org, "prepaid-balance-reports"],
                &body,
                OCTET_STREAM,
            )
            .await
            .map_err(ApiError::into_mint)
    }

    /// Every organization in this organization's family, keyed by id.
    pub async fn get_organization_family(
        &self,
        id: Option<&str>,
    ) -> Result<BTreeMap<String, Organization>> {
        let id = self.resolve_id(id);
        let data = self
            .client
            .get_json_cached(
                &format!("mint_organization-family:{id}"),
                &[BASE[0], BASE[1], id.as_str(), "organization-family"],
                &[],
            )
            .await?;

        let mut family = BTreeMap::new();
        for entry in array_field(&data, "organization") {
            let mut organization = Organization::new(self.client.clone());
            organization.load_from_raw_data(entry, true)?;
            family.insert(organization.id.clone(), organization);
        }
        Ok(family)
    }

    /// Wire representation using remote field names. Unset optional fields
    /// are omitted.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "address".into(),
            serde_json::to_value(&self.addresses).unwrap_or(Value::Array(Vec::new())),
        );
        obj.insert("approveTrusted".into(), self.approve_trusted.into());
        obj.insert("approveUntrusted".into(), self.approve_untrusted.into());
        obj.insert("billingCycle".into(), self.billing_cycle.as_str().into());
        if let Some(children) = &self.children {
            obj.insert(
                "children".into(),
                children.iter().map(Organization::to_json).collect(),
            );
        }
        obj.insert("country".into(), self.country.clone().into());
        obj.insert("currency".into(), self.currency.as_str().into());
        obj.insert("description".into(), self.description.clone().into());
        obj.insert("groupOrganization".into(), self.group_organization.into());
        obj.insert("hasBroker".into(), self.has_broker.into());
        obj.insert("hasSelfBilling".into(), self.has_self_billing.into());
        obj.insert(
            "hasSeparateInvoiceForProduct".into(),
            self.has_separate_invoice_for_product.into(),
        );
        obj.insert("id".into(), self.id.clone().into());
        obj.insert("issueNettingStmt".into(), self.issue_netting_statement.into());
        if let Some(logo_url) = &self.logo_url {
            obj.insert("logoUrl".into(), logo_url.clone().into());
        }
        if let Some(name) = &self.name {
            obj.insert("name".into(), name.clone().into());
        }
        obj.insert(
            "nettingStmtPerCurrency".into(),
            self.netting_statement_per_currency.into(),
        );
        if let Some(org_type) = self.org_type {
            obj.insert("orgType".into(), org_type.as_str().into());
        }
        if let Some(parent) = &self.parent {
            obj.insert("parent".into(), parent.to_json());
        }
        if let Some(reg_no) = &self.reg_no {
            obj.insert("regNo".into(), reg_no.clone().into());
        }
        obj.insert("selfBillingAsExchOrg".into(), self.self_billing_as_exch_org.into());
        obj.insert("selfBillingForAllDev".into(), self.self_billing_for_all_dev.into());
        obj.insert(
            "separateInvoiceForFees".into(),
            self.separate_invoice_for_fees.into(),
        );
        obj.insert("status".into(), self.status.as_str().into());
        if let Some(billing_type) = self.supported_billing_type {
            obj.insert("supportedBillingType".into(), billing_type.as_str().into());
        }
        obj.insert("taxModel".into(), self.tax_model.as_str().into());
        if let Some(tax_nexus) = &self.tax_nexus {
            obj.insert("taxNexus".into(), tax_nexus.clone().into());
        }
        if let Some(tax_reg_no) = &self.tax_reg_no {
            obj.insert("taxRegNo".into(), tax_reg_no.clone().into());
        }
        obj.insert("timezone".into(), self.timezone.clone().into());
        Value::Object(obj)
    }

    // Accessors

    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    #[must_use]
    pub fn approve_trusted(&self) -> bool {
        self.approve_trusted
    }

    #[must_use]
    pub fn approve_untrusted(&self) -> bool {
        self.approve_untrusted
    }

    #[must_use]
    pub fn billing_cycle(&self) -> BillingCycleType {
        self.billing_cycle
    }

    #[must_use]
    pub fn children(&self) -> Option<&[Organization]> {
        self.children.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn is_group_organization(&self) -> bool {
        self.group_organization
    }

    #[must_use]
    pub fn has_broker(&self) -> bool {
        self.has_broker
    }

    #[must_use]
    pub fn has_self_billing(&self) -> bool {
        self.has_self_billing
    }

    #[must_use]
    pub fn has_separate_invoice_for_product(&self) -> bool {
        self.has_separate_invoice_for_product
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn issue_netting_statement(&self) -> bool {
        self.issue_netting_statement
    }

    #[must_use]
    pub fn logo_url(&self) -> Option<&str> {
        self.logo_url.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn netting_statement_per_currency(&self) -> bool {
        self.netting_statement_per_currency
    }

    #[must_use]
    pub fn org_type(&self) -> Option<OrgType> {
        self.org_type
    }

    #[must_use]
    pub fn parent(&self) -> Option<&Organization> {
        self.parent.as_deref()
    }

    #[must_use]
    pub fn reg_no(&self) -> Option<&str> {
        self.reg_no.as_deref()
    }

    #[must_use]
    pub fn self_billing_as_exch_org(&self) -> bool {
        self.self_billing_as_exch_org
    }

    #[must_use]
    pub fn self_billing_for_all_dev(&self) -> bool {
        self.self_billing_for_all_dev
    }

    #[must_use]
    pub fn separate_invoice_for_fees(&self) -> bool {
        self.separate_invoice_for_fees
    }

    #[must_use]
    pub fn status(&self) -> StatusType {
        self.status
    }

    #[must_use]
    pub fn supported_billing_type(&self) -> Option<BillingType> {
        self.supported_billing_type
    }

    #[must_use]
    pub fn tax_model(&self) -> TaxModelType {
        self.tax_model
    }

    #[must_use]
    pub fn tax_nexus(&self) -> Option<&str> {
        self.tax_nexus.as_deref()
    }

    #[must_use]
    pub fn tax_reg_no(&self) -> Option<&str> {
        self.tax_reg_no.as_deref()
    }

    #[must_use]
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    // Setters

    pub fn add_address(&mut self, address: Address) {
        self.addresses.push(address);
    }

    pub fn clear_addresses(&mut self) {
        self.addresses.clear();
    }

    pub fn set_approve_trusted(&mut self, value: bool) {
        self.approve_trusted = value;
    }

    pub fn set_approve_untrusted(&mut self, value: bool) {
        self.approve_untrusted = value;
    }

    pub fn set_billing_cycle(&mut self, value: &str) -> Result<()> {
        self.billing_cycle = BillingCycleType::parse(value)?;
        Ok(())
    }

    pub fn set_children(&mut self, children: Option<Vec<Organization>>) {
        self.children = children;
    }

    /// Store an upper-case ISO 3166-1 alpha-2 code. `UK` is corrected to
    /// `GB`; anything else is logged and the previous value kept.
    pub fn set_country(&mut self, value: &str) {
        if Country::validate_country_code(value) {
            self.country = value.to_string();
        } else if value == "UK" {
            self.country = "GB".to_string();
        } else {
            tracing::error!(country = value, "Invalid country code; keeping previous value");
        }
    }

    /// Stored upper-cased.
    pub fn set_currency(&mut self, value: &str) {
        self.currency = CurrencyCode::new(value);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_group_organization(&mut self, value: bool) {
        self.group_organization = value;
    }

    pub fn set_has_broker(&mut self, value: bool) {
        self.has_broker = value;
    }

    pub fn set_has_self_billing(&mut self, value: bool) {
        self.has_self_billing = value;
    }

    pub fn set_has_separate_invoice_for_product(&mut self, value: bool) {
        self.has_separate_invoice_for_product = value;
    }

    pub fn set_id(&mut self, value: impl Into<String>) {
        self.id = value.into();
    }

    pub fn set_issue_netting_statement(&mut self, value: bool) {
        self.issue_netting_statement = value;
    }

    /// An empty value clears the logo; anything else must be an absolute
    /// http(s) URL.
    pub fn set_logo_url(&mut self, value: &str) -> Result<()> {
        if value.is_empty() {
            self.logo_url = None;
            return Ok(());
        }
        match Url::parse(value) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
                self.logo_url = Some(value.to_string());
                Ok(())
            }
            _ => Err(ApiError::parameter(format!(
                "{value} is not a valid logo URL."
            ))),
        }
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.name = Some(value.into());
    }

    pub fn set_netting_statement_per_currency(&mut self, value: bool) {
        self.netting_statement_per_currency = value;
    }

    pub fn set_org_type(&mut self, value: &str) -> Result<()> {
        self.org_type = Some(OrgType::parse(value)?);
        Ok(())
    }

    pub fn set_parent(&mut self, parent: Option<Organization>) {
        self.parent = parent.map(Box::new);
    }

    pub fn set_reg_no(&mut self, value: Option<String>) {
        self.reg_no = value;
    }

    pub fn set_self_billing_as_exch_org(&mut self, value: bool) {
        self.self_billing_as_exch_org = value;
    }

    pub fn set_self_billing_for_all_dev(&mut self, value: bool) {
        self.self_billing_for_all_dev = value;
    }

    pub fn set_separate_invoice_for_fees(&mut self, value: bool) {
        self.separate_invoice_for_fees = value;
    }

    pub fn set_status(&mut self, value: &str) -> Result<()> {
        self.status = StatusType::parse(value)?;
        Ok(())
    }

    pub fn set_supported_billing_type(&mut self, value: &str) -> Result<()> {
        self.supported_billing_type = Some(BillingType::parse(value)?);
        Ok(())
    }

    pub fn set_tax_model(&mut self, value: &str) -> Result<()> {
        self.tax_model = TaxModelType::parse(value)?;
        Ok(())
    }

    pub fn set_tax_nexus(&mut self, value: Option<String>) {
        self.tax_nexus = value;
    }

    pub fn set_tax_reg_no(&mut self, value: Option<String>) {
        self.tax_reg_no = value;
    }

    pub fn set_timezone(&mut self, value: impl Into<String>) {
        self.timezone = value.into();
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
