use std::{net::SocketAddr, path::Path};

use anyhow::Context;
use config::{builder::DefaultState, ConfigBuilder, File, FileFormat};
use serde::Deserialize;
use url::Url;

pub use duration::Duration;

mod duration;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// The default configuration, compiled into the binary
pub const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Name of the environment variable overriding `upstream.base_url`
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Load the configuration from the compiled-in defaults, the given files and
/// the `API_BASE_URL` environment variable, in that order.
pub fn load(paths: &[impl AsRef<Path>]) -> anyhow::Result<Config> {
    let api_base_url = std::env::var(API_BASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty());

    builder(paths)?
        .set_override_option("upstream.base_url", api_base_url)?
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

/// Load the configuration from the compiled-in defaults, the given files and
/// additional TOML snippets. The environment is ignored.
pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    overrides
        .iter()
        .fold(builder(paths)?, |builder, source| {
            builder.add_source(File::from_str(source, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

fn builder(paths: &[impl AsRef<Path>]) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    let defaults = config::Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
    paths.iter().try_fold(defaults, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub contact: ContactConfig,
    pub upstream: UpstreamConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub address: SocketAddr,
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactConfig {
    pub max_body_size: usize,
    pub status_cache_ttl: Duration,
}

#[derive(Debug, Deserialize)]
pub struct UpstreamConfig {
    pub base_url: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}
