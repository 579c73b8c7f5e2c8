//! fi-agent: evaluate one inspection transcript from stdin.
//!
//! Usage: `fi-agent [config.toml] < transcript.txt`. Prints the evaluated
//! response as JSON on stdout; logs go to stderr.

use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use fi_agent::{AgentConfig, ConversationAgent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "fi-agent starting");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = AgentConfig::from_file(&path)?;
            tracing::info!(path = %path, "config loaded");
            config
        }
        None => AgentConfig::default(),
    };

    let mut transcript = String::new();
    tokio::io::stdin().read_to_string(&mut transcript).await?;
    if transcript.trim().is_empty() {
        anyhow::bail!("no transcript on stdin");
    }

    let agent = ConversationAgent::from_config(&config.ollama);
    let response = agent.process(transcript.trim(), None).await;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
