//! Core management entities scoped to an organization.

mod developer_app;

pub use developer_app::DeveloperApp;
