use jash_config::Config;
use tracing::{info, warn};

use crate::environment;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    match &config.upstream.base_url {
        Some(base_url) => info!("Forwarding contact submissions to {base_url}"),
        None => warn!(
            "No upstream configured, contact submissions will be rejected. Set {} or \
             upstream.base_url to enable forwarding.",
            jash_config::API_BASE_URL_ENV
        ),
    }

    let server = environment::rest_server(&config)?;
    info!("Starting http server on {}", config.http.address);
    server.serve().await
}
