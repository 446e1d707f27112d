use portal_server::{Config, Server, ServerState, logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    logging::init(&config);

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Portal server starting"
    );

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
