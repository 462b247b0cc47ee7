//! edgemgmt CLI - thin command layer over [`edgemgmt_api`].
//!
//! ```text
//! main() -> Cli::parse(args) -> EdgeConfig::load() -> OrgConfig -> ApiClient -> run(command)
//! ```
//!
//! Connection settings come from `~/.edgemgmt/config.toml` with `EDGE_*`
//! environment fallbacks. `--org` overrides the configured organization for a
//! single invocation; `use <org>` persists it.

mod args;

use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use edgemgmt_api::{DeveloperApp, DocGenDoc, OperationRef, Organization};
use edgemgmt_client::ApiClient;
use edgemgmt_config::EdgeConfig;

use args::{AppsCommand, Cli, Command, OrgCommand};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn client_for(cli: &Cli) -> Result<ApiClient> {
    let config = EdgeConfig::load()
        .context("failed to load configuration")?
        .unwrap_or_default();
    let mut org_config = config.to_org_config()?;
    if let Some(org) = &cli.org {
        org_config = org_config.with_org_name(org.clone());
    }
    Ok(ApiClient::new(org_config)?)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_lines<I, S>(lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = std::io::stdout().lock();
    for line in lines {
        writeln!(out, "{}", line.as_ref())?;
    }
    Ok(())
}

fn app_summary(app: &DeveloperApp) -> serde_json::Value {
    serde_json::json!({
        "appId": app.app_id(),
        "name": app.name(),
        "developer": app.developer_mail(),
        "status": app.status(),
        "accessType": app.access_type().as_str(),
        "callbackUrl": app.callback_url(),
        "description": app.description(),
        "apiProducts": app.api_products(),
        "consumerKey": app.consumer_key(),
        "credentialStatus": app.credential_status(),
    })
}

async fn run(cli: Cli) -> Result<()> {
    if let Command::Use { org } = &cli.command {
        EdgeConfig::persist_organization(org).context("failed to update configuration")?;
        tracing::info!(org = %org, "Default organization updated");
        return Ok(());
    }

    let client = client_for(&cli)?;

    match cli.command {
        Command::Use { .. } => {}
        Command::Orgs => {
            let org = Organization::new(client);
            print_lines(org.list_organization_identifiers().await?)?;
        }
        Command::Org(OrgCommand::Show { id }) => {
            let mut org = Organization::new(client);
            org.load(id.as_deref()).await?;
            print_json(&org.to_json())?;
        }
        Command::Org(OrgCommand::Family { id }) => {
            let org = Organization::new(client);
            let family = org.get_organization_family(id.as_deref()).await?;
            let value: serde_json::Map<String, serde_json::Value> = family
                .into_iter()
                .map(|(id, member)| (id, member.to_json()))
                .collect();
            print_json(&serde_json::Value::Object(value))?;
        }
        Command::Currencies {
            id,
            include_children,
        } => {
            let org = Organization::new(client);
            let currencies = org
                .list_supported_currencies(id.as_deref(), include_children)
                .await?;
            print_json(&serde_json::to_value(currencies)?)?;
        }
        Command::Sync { id } => {
            let org = Organization::new(client);
            print_lines([org.sync_all_from_4g(id.as_deref()).await?])?;
        }
        Command::PrepaidReport {
            month,
            year,
            developer_id,
            currency,
        } => {
            let org = Organization::new(client);
            let report = org
                .get_prepaid_balance_report(&month, year, &developer_id, &currency)
                .await?;
            std::io::stdout().lock().write_all(report.as_bytes())?;
        }
        Command::Apps(AppsCommand::List { developer }) => {
            let app = DeveloperApp::new(client, developer);
            print_lines(app.get_list().await?)?;
        }
        Command::Apps(AppsCommand::Show { developer, name }) => {
            let mut app = DeveloperApp::new(client, developer);
            app.load(Some(name.as_str())).await?;
            print_json(&app_summary(&app))?;
        }
        Command::Apps(AppsCommand::All) => {
            let app = DeveloperApp::new(client, "");
            let apps = app.list_all_org_apps().await?;
            print_json(&apps.iter().map(app_summary).collect())?;
        }
        Command::DocGen {
            mid,
            revision,
            resource,
            operation,
            template,
        } => {
            let doc = DocGenDoc::new(client);
            let operation = OperationRef {
                revision,
                resource,
                operation,
            };
            let body = doc
                .request_operation(&operation, &mid, template.as_deref())
                .await?;
            print_lines([body])?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    run(cli).await
}
