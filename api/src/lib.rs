//! Entities of the management API.
//!
//! Each entity wraps an [`ApiClient`] and mirrors the remote JSON fields with
//! typed accessors:
//!
//! | Module | Entity | Base path |
//! |--------|--------|-----------|
//! | [`mint`] | [`Organization`] | `/mint/organizations` |
//! | [`management`] | [`DeveloperApp`] | `/o/{org}/developers/{developer}/apps` |
//! | [`docgen`] | [`DocGenDoc`] | `/o/{org}/apimodels` |
//!
//! Entities scoped to a single organization implement [`OrganizationAware`].
//!
//! # Hydration
//!
//! Raw JSON objects are applied field by field: each remote property name is
//! matched to the setter that owns it. Properties without a setter are logged
//! and skipped, so new server-side fields never break loading.

pub mod controller;
pub mod docgen;
pub mod management;
pub mod mint;
mod value;

pub use controller::OrganizationAware;
pub use docgen::{DocGenDoc, OperationRef};
pub use management::DeveloperApp;
pub use mint::Organization;

pub use edgemgmt_client::{ApiClient, ApiError, OrgConfig, Result};
