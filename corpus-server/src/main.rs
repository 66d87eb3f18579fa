use corpus_server::{AppState, ServerConfig, run_server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config)?;

    // The index must exist before the first upload or query.
    state.engine.pipeline().create_collection(&config.index).await?;

    run_server(&config, state).await
}
