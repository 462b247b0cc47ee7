//! Behaviour shared by entities whose endpoints live under one organization.
//!
//! Almost every management entity is organization-scoped; the mint
//! [`Organization`](crate::Organization) itself is the exception.

/// An entity that talks to endpoints under `/o/{org}`.
pub trait OrganizationAware {
    /// The name of the organization the entity belongs to.
    fn organisation(&self) -> &str;

    /// Re-scope the entity to another organization.
    fn set_organisation(&mut self, org_name: &str);
}
