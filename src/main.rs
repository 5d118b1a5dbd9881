use autotrader::config::{Config, Instructions};
use autotrader::cycle::DecisionCycle;
use autotrader::exchange::UpbitClient;
use autotrader::oracle::OpenAiClient;
use autotrader::scheduler::Scheduler;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    tracing::info!("autotrader starting");

    let config = Config::from_env()?;
    let instructions = Instructions::load(&config.instructions_path);

    let exchange = Arc::new(UpbitClient::new(
        config.upbit_access_key.clone(),
        config.upbit_secret_key.clone(),
    )?);
    let oracle = Arc::new(OpenAiClient::new(config.openai_api_key.clone())?);

    let cycle = Arc::new(DecisionCycle::new(
        exchange,
        oracle,
        instructions,
        config.pair.clone(),
    ));

    tracing::info!(pair = %config.pair, "decision pipeline ready");

    // Runs until the process is terminated
    Scheduler::hourly().run(cycle).await;

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autotrader=info".into()),
        )
        .init();
}
