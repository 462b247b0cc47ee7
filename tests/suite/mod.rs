//! Integration test suites

mod config;
mod developer_app;
mod organization;
mod retry;
