//! Enumerated field values used by mint organizations and developer apps.
//!
//! Every enumeration parses case-insensitively from its remote string form and
//! serializes back to the canonical wire form.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumKind {
    BillingCycle,
    BillingType,
    OrgType,
    Status,
    TaxModel,
    AccessType,
    KeyAction,
}

impl EnumKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumKind::BillingCycle => "billing cycle",
            EnumKind::BillingType => "billing type",
            EnumKind::OrgType => "organization type",
            EnumKind::Status => "status",
            EnumKind::TaxModel => "tax model",
            EnumKind::AccessType => "access type",
            EnumKind::KeyAction => "key status",
        }
    }
}

impl fmt::Display for EnumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} value '{raw}'; expected one of: {expected:?}")]
pub struct EnumParseError {
    kind: EnumKind,
    raw: String,
    expected: &'static [&'static str],
}

impl EnumParseError {
    #[must_use]
    pub fn new(kind: EnumKind, raw: impl Into<String>, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            raw: raw.into(),
            expected,
        }
    }
}

/// How often a mint organization is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BillingCycleType {
    #[default]
    CalendarMonth,
    Prorated,
}

impl BillingCycleType {
    pub const VALUES: &'static [&'static str] = &["CALENDAR_MONTH", "PRORATED"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BillingCycleType::CalendarMonth => "CALENDAR_MONTH",
            BillingCycleType::Prorated => "PRORATED",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CALENDAR_MONTH" => Ok(BillingCycleType::CalendarMonth),
            "PRORATED" => Ok(BillingCycleType::Prorated),
            _ => Err(EnumParseError::new(
                EnumKind::BillingCycle,
                raw,
                Self::VALUES,
            )),
        }
    }
}

/// Which payment models an organization supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BillingType {
    Prepaid,
    Postpaid,
    Both,
}

impl BillingType {
    pub const VALUES: &'static [&'static str] = &["PREPAID", "POSTPAID", "BOTH"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BillingType::Prepaid => "PREPAID",
            BillingType::Postpaid => "POSTPAID",
            BillingType::Both => "BOTH",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PREPAID" => Ok(BillingType::Prepaid),
            "POSTPAID" => Ok(BillingType::Postpaid),
            "BOTH" => Ok(BillingType::Both),
            _ => Err(EnumParseError::new(EnumKind::BillingType, raw, Self::VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OrgType {
    Trading,
    NonTrading,
}

impl OrgType {
    pub const VALUES: &'static [&'static str] = &["TRADING", "NON_TRADING"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OrgType::Trading => "TRADING",
            OrgType::NonTrading => "NON_TRADING",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TRADING" => Ok(OrgType::Trading),
            "NON_TRADING" => Ok(OrgType::NonTrading),
            _ => Err(EnumParseError::new(EnumKind::OrgType, raw, Self::VALUES)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StatusType {
    #[default]
    Active,
    Inactive,
}

impl StatusType {
    pub const VALUES: &'static [&'static str] = &["ACTIVE", "INACTIVE"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusType::Active => "ACTIVE",
            StatusType::Inactive => "INACTIVE",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(StatusType::Active),
            "INACTIVE" => Ok(StatusType::Inactive),
            _ => Err(EnumParseError::new(EnumKind::Status, raw, Self::VALUES)),
        }
    }
}

/// Whether taxes are shown to the developer on invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TaxModelType {
    #[default]
    Disclosed,
    Undisclosed,
    Hybrid,
}

impl TaxModelType {
    pub const VALUES: &'static [&'static str] = &["DISCLOSED", "UNDISCLOSED", "HYBRID"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            TaxModelType::Disclosed => "DISCLOSED",
            TaxModelType::Undisclosed => "UNDISCLOSED",
            TaxModelType::Hybrid => "HYBRID",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "DISCLOSED" => Ok(TaxModelType::Disclosed),
            "UNDISCLOSED" => Ok(TaxModelType::Undisclosed),
            "HYBRID" => Ok(TaxModelType::Hybrid),
            _ => Err(EnumParseError::new(EnumKind::TaxModel, raw, Self::VALUES)),
        }
    }
}

/// App access type. Lower-case on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AccessType {
    Read,
    Write,
    Both,
}

impl AccessType {
    pub const VALUES: &'static [&'static str] = &["read", "write", "both"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AccessType::Read => "read",
            AccessType::Write => "write",
            AccessType::Both => "both",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "read" => Ok(AccessType::Read),
            "write" => Ok(AccessType::Write),
            "both" => Ok(AccessType::Both),
            _ => Err(EnumParseError::new(EnumKind::AccessType, raw, Self::VALUES)),
        }
    }
}

/// Approve or revoke a consumer key.
///
/// Callers historically passed booleans, `0`/`1`, or the action names; all of
/// those forms are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Approve,
    Revoke,
}

impl KeyAction {
    pub const VALUES: &'static [&'static str] = &["approve", "revoke", "true", "false", "1", "0"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            KeyAction::Approve => "approve",
            KeyAction::Revoke => "revoke",
        }
    }

    /// Credential status the remote reports after this action is applied.
    #[must_use]
    pub const fn resulting_status(self) -> &'static str {
        match self {
            KeyAction::Approve => "approved",
            KeyAction::Revoke => "revoked",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, EnumParseError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "approve" | "true" | "1" => Ok(KeyAction::Approve),
            "revoke" | "false" | "0" => Ok(KeyAction::Revoke),
            _ => Err(EnumParseError::new(EnumKind::KeyAction, raw, Self::VALUES)),
        }
    }

    pub fn from_int(value: i64) -> Result<Self, EnumParseError> {
        match value {
            1 => Ok(KeyAction::Approve),
            0 => Ok(KeyAction::Revoke),
            other => Err(EnumParseError::new(
                EnumKind::KeyAction,
                other.to_string(),
                Self::VALUES,
            )),
        }
    }
}

impl From<bool> for KeyAction {
    fn from(approve: bool) -> Self {
        if approve {
            KeyAction::Approve
        } else {
            KeyAction::Revoke
        }
    }
}

macro_rules! wire_string_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl std::str::FromStr for $ty {
                type Err = EnumParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::parse(s)
                }
            }

            impl TryFrom<String> for $ty {
                type Error = EnumParseError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    Self::parse(&value)
                }
            }

            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.as_str().to_string()
                }
            }
        )*
    };
}

wire_string_conversions!(
    BillingCycleType,
    BillingType,
    OrgType,
    StatusType,
    TaxModelType,
    AccessType,
);

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyAction {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
