//! slirc-chat - line-mode IRC client.
//!
//! Reads commands and chat text from stdin, prints to stdout, logs to stderr.

use slirc_chat::client::{Driver, Input, TcpConnector};
use slirc_chat::config::Config;
use slirc_chat::sink::PrintSink;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "slirc-chat.toml".to_string());

    let config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        channels = ?config.chat.channels,
        "Starting slirc-chat"
    );

    let mut driver = Driver::new(config, TcpConnector, PrintSink::new(std::io::stdout()));
    let input = driver.sender();

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if input.send(Input::User(line)).is_err() {
                        return;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, "stdin read failed");
                    break;
                }
            }
        }
        let _ = input.send(Input::Shutdown);
    });

    driver.connect();
    driver.run().await;

    info!("Shutdown complete");
    Ok(())
}
