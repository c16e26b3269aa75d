use ops_agent::{AgentState, Config, init_logger};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logger();

    tracing::info!("ops-agent starting");

    let config = Config::from_env();
    let state = AgentState::initialize(&config)?;

    match state.app_config.check_version(&config.app_version).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::error!(
                version = %config.app_version,
                "This version is below the remote minimum, update required"
            );
            return Err("unsupported version".into());
        }
        Err(e) if e.is_retryable() => {
            tracing::warn!(error = %e, "Version gate unreachable, starting offline");
            state.connectivity.set_online(false);
        }
        Err(e) => return Err(e.into()),
    }

    let backlog = state.sync_engine.backlog()?;
    if backlog > 0 {
        tracing::info!(backlog, "reports waiting from a previous run");
    }

    let shutdown = CancellationToken::new();
    let worker = state.spawn_sync_worker(shutdown.clone());

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    shutdown.cancel();
    worker.await?;

    Ok(())
}
