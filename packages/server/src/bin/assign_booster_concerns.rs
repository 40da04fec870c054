//! Tag boosters with the skin concerns their benefit texts address.
//!
//! Runs the LLM concern assignment for one business unit (or all of them),
//! optionally rebuilds base → booster matches afterwards, and prints the
//! report as JSON.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use commerce_core::common::BusinessUnitRef;
use commerce_core::config::Config;
use commerce_core::domains::auth::JwtService;
use commerce_core::domains::business_units::BusinessUnit;
use commerce_core::domains::catalog::actions::{
    assign_booster_concerns, regenerate_addon_matches, AssignOptions,
};
use commerce_core::kernel::{LlmAdapter, ServerDeps};
use llm_client::LlmClient;
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "assign_booster_concerns")]
#[command(about = "Assign skin concerns to boosters using the configured LLM")]
struct Cli {
    /// Business unit id or slug (default: every business unit)
    #[arg(long)]
    business_unit: Option<String>,

    /// Report assignments without writing them
    #[arg(long)]
    dry_run: bool,

    /// Pause between LLM calls, in milliseconds
    #[arg(long, default_value_t = 200)]
    pause_ms: u64,

    /// Rebuild base → booster matches once concerns are written
    #[arg(long)]
    regenerate_matches: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,commerce_core=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    let llm = Arc::new(LlmAdapter::new(Arc::new(LlmClient::new(config.llm.clone()))));
    let jwt_service = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
    let deps = ServerDeps::new(pool.clone(), llm, jwt_service);

    let business_units = match cli.business_unit.as_deref() {
        Some(raw) => {
            let id = BusinessUnit::resolve(&BusinessUnitRef::parse(raw), &pool)
                .await?
                .ok_or_else(|| anyhow!("Business unit not found: {}", raw))?;
            vec![id]
        }
        None => BusinessUnit::find_all(&pool)
            .await?
            .into_iter()
            .map(|b| b.id)
            .collect(),
    };

    let options = AssignOptions {
        dry_run: cli.dry_run,
        pause: Duration::from_millis(cli.pause_ms),
    };

    let mut reports = Vec::with_capacity(business_units.len());
    for business_unit_id in business_units {
        let report = assign_booster_concerns(business_unit_id, &options, &deps)
            .await
            .with_context(|| format!("Concern assignment failed for {}", business_unit_id))?;

        let matches = if cli.regenerate_matches && report.written {
            Some(regenerate_addon_matches(Some(business_unit_id), None, &pool).await?)
        } else {
            None
        };

        reports.push(json!({
            "businessUnitId": business_unit_id,
            "assignment": report,
            "matches": matches,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}
