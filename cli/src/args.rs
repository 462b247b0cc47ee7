//! Command-line arguments.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "edgemgmt")]
#[command(about = "Inspect mint organizations, developer apps and API docs")]
pub struct Cli {
    /// Organization to use instead of the configured one
    #[arg(long, global = true)]
    pub org: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List organization names
    Orgs,
    /// Mint organization details
    #[command(subcommand)]
    Org(OrgCommand),
    /// List supported currencies
    Currencies {
        id: Option<String>,
        /// Include currencies of child organizations
        #[arg(long = "children")]
        include_children: bool,
    },
    /// Sync an organization from the management core
    Sync { id: Option<String> },
    /// Download a prepaid balance report
    PrepaidReport {
        /// English month name
        month: String,
        year: i32,
        developer_id: String,
        currency: String,
    },
    /// Developer apps
    #[command(subcommand)]
    Apps(AppsCommand),
    /// Fetch an API model operation
    #[command(name = "docgen")]
    DocGen {
        mid: String,
        revision: String,
        resource: String,
        operation: String,
        /// Render through a named template as HTML
        #[arg(long)]
        template: Option<String>,
    },
    /// Persist the default organization
    Use { org: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum OrgCommand {
    /// Show a mint organization
    Show { id: Option<String> },
    /// Show an organization family
    Family { id: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum AppsCommand {
    /// List a developer's app names
    List { developer: String },
    /// Show one developer app
    Show { developer: String, name: String },
    /// List every app in the organization
    All,
}
