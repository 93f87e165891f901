use order_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let log_dir = config.log_dir();
    let _ = std::fs::create_dir_all(&log_dir);
    init_logger_with_file(
        std::env::var("LOG_LEVEL").ok().as_deref(),
        log_dir.to_str(),
    );

    tracing::info!(
        environment = %config.environment,
        port = config.http_port,
        "Starting order server"
    );

    Server::new(config).run().await
}
