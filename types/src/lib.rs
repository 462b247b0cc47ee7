//! Core domain types for the management API client.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies:
//!
//! - [`enums`] - enumerated field values (billing cycle, org type, key actions, ...)
//! - [`country`] - ISO 3166-1 alpha-2 country table and validation
//! - [`currency`] - three-letter currency codes
//! - [`structures`] - nested JSON data structures (addresses, supported currencies, attributes)

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

pub mod country;
pub mod currency;
pub mod enums;
pub mod structures;

pub use country::Country;
pub use currency::CurrencyCode;
pub use enums::{
    AccessType, BillingCycleType, BillingType, EnumKind, EnumParseError, KeyAction, OrgType,
    StatusType, TaxModelType,
};
pub use structures::{Address, Attribute, CredentialApiProduct, SupportedCurrency};

/// Convert a list of [`Attribute`] pairs into its wire form (`[{name, value}]`).
#[must_use]
pub fn attributes_to_json(attributes: &[Attribute]) -> serde_json::Value {
    serde_json::Value::Array(
        attributes
            .iter()
            .map(|attr| serde_json::json!({ "name": attr.name, "value": attr.value }))
            .collect(),
    )
}
