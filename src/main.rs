use anyhow::Context;
use dotenv::dotenv;
use todo_dashboard::app_env::AppConfig;
use todo_dashboard::{SharedData, build_router, logging, persistence};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    let config = AppConfig::from_env().context("reading configuration")?;

    let otel_exporters = config
        .telemetry
        .as_ref()
        .map(logging::init_exporters)
        .transpose()?;
    logging::setup_logging_and_tracing(
        logging::init_env_filter().context("parsing the log level")?,
        otel_exporters,
    );

    let ext_cxn = persistence::ExternalConnectivity::new(config.data_service)?;
    let router = build_router(SharedData {
        ext_cxn,
        secure_cookies: config.secure_cookies,
    });

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("binding to {}", config.bind_address))?;
    info!("Serving the to-do dashboard on {}", config.bind_address);
    axum::serve(listener, router)
        .await
        .context("running the server")?;

    Ok(())
}
