use stockledger_api::config::ApiConfig;
use stockledger_inventory::SharedLedger;
use stockledger_observability::LogFormat;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    stockledger_observability::init(LogFormat::Json);

    let config = ApiConfig::from_env()?;
    let app = stockledger_api::app::build_app(SharedLedger::new(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
