use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use records_core::{CoreConfig, PatientService, config::records_file_from_env_value};

/// Main entry point for the patient records service
///
/// Resolves configuration once, checks the collection file exists and serves the REST API.
///
/// # Environment Variables
/// - `RECORDS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_RECORDS_FILE`: JSON collection file (default: "patients.json")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid, or server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_records_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("records_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RECORDS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let records_file: PathBuf =
        records_file_from_env_value(std::env::var("PATIENT_RECORDS_FILE").ok());

    if !records_file.is_file() {
        anyhow::bail!(
            "Patient records file does not exist: {} (create it with `records init`)",
            records_file.display()
        );
    }

    let cfg = CoreConfig::new(records_file)?;

    tracing::info!("++ Starting patient records REST on {}", rest_addr);
    tracing::info!("++ Using collection file {}", cfg.records_file().display());

    let state = AppState::new(PatientService::from_config(&cfg));
    api_rest::serve(&rest_addr, state).await?;

    Ok(())
}
