pub mod config;
pub mod session;
pub mod web;

#[cfg(test)]
mod test_support;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use curve_protocol::client::OptimizerClient;
use log::info;

use crate::config::ServerConfig;
use crate::session::Session;
use crate::web::create_web_server;

#[derive(Parser)]
#[command(author, version, about = "Curve control demo: schedule optimizer front end")]
struct Args {
    /// Load server settings from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bind: Option<String>,
    #[arg(long)]
    port: Option<u16>,
    /// Base url of the optimization service
    #[arg(long)]
    backend_url: Option<String>,
    /// Directory holding index.html and assets
    #[arg(long)]
    static_dir: Option<PathBuf>,
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Args {
    fn into_config(self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };

        if let Some(bind) = self.bind { config.bind_address = bind; }
        if let Some(port) = self.port { config.port = port; }
        if let Some(url) = self.backend_url { config.backend_url = url; }
        if let Some(dir) = self.static_dir { config.static_dir = dir; }
        if self.timeout_secs.is_some() { config.timeout_secs = self.timeout_secs; }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let config = Args::parse().into_config()?;

    let client = OptimizerClient::new(&config.backend_url, config.timeout())
        .context("building optimizer client")?;
    info!("optimizer backend: {}", client.backend_url());

    create_web_server(&config, Session::new(client)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() -> Result<()> {
        let args = Args::parse_from(["curve-server", "--port", "3000", "--backend-url", "http://localhost:5000"]);
        let config = args.into_config()?;
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend_url, "http://localhost:5000");
        assert_eq!(config.bind_address, "0.0.0.0");
        Ok(())
    }
}
