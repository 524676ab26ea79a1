pub mod rest;

use std::{path::Path, time::Duration};

use anyhow::{Result, anyhow};
use flick_server::config::{Parser, ServerConfig};
use rand::Rng as _;
use reqwest::Url;
use tempfile::TempDir;
use tracing::debug;

pub fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(3030..4030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

pub struct ConfigGuard {
    #[allow(dead_code)]
    data_dir: TempDir,
}

pub fn test_config(test_name: &str, base_dir: &Path) -> Result<(ServerConfig, ConfigGuard)> {
    let tmp_data_dir = TempDir::with_prefix_in(format!("{}_", test_name), base_dir)?;
    let data_dir = tmp_data_dir.path().to_string_lossy().to_string();
    let port = random_port()?.to_string();
    let args = &[
        "flick-e2e-tests",
        "--data-dir",
        &data_dir,
        "--port",
        &port,
        "--env",
        "staging",
    ];
    let config = ServerConfig::try_parse_from(args)?;
    Ok((
        config,
        ConfigGuard {
            data_dir: tmp_data_dir,
        },
    ))
}

pub async fn prepare_env(test_name: &str) -> Result<(ServerConfig, ConfigGuard)> {
    let base_dir = std::env::temp_dir().join("flick-e2e-tests");
    tokio::fs::create_dir_all(&base_dir).await?;
    test_config(test_name, &base_dir)
}

pub fn base_url(config: &ServerConfig) -> Result<Url> {
    let url = Url::parse(&format!("http://localhost:{}/", config.port))?;
    Ok(url)
}

pub fn extend_url(url: &Url, segment: impl std::fmt::Display) -> Url {
    let mut url = url.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(&segment.to_string());
    }
    url
}

/// Polls the health endpoint until the server answers.
pub async fn wait_for_server(base_url: &Url) -> Result<()> {
    let client = reqwest::Client::new();
    let url = base_url.join("v1/healthcheck")?;
    for _ in 0..50 {
        match client.get(url.clone()).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => debug!("Server not ready yet: {}", response.status()),
            Err(e) => debug!("Server not ready yet: {e}"),
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    Err(anyhow!("Server did not start in time"))
}

pub async fn spawn_server(args: ServerConfig) -> Result<Url> {
    let base_url = base_url(&args)?;
    tokio::spawn(async move {
        if let Err(e) = flick_server::run::run(args).await {
            tracing::error!("Server failed: {e}");
        }
    });
    wait_for_server(&base_url).await?;
    Ok(base_url)
}
