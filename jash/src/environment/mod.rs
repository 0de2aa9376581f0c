use anyhow::Context;
use axum::http::HeaderValue;
use jash_api_rest::RestServerConfig;
use jash_client::api::HttpContactApi;
use jash_config::Config;
use jash_core_contact_impl::ContactFeatureConfig;
use jash_extern_impl::{
    http::HttpClient,
    upstream::{UpstreamApiServiceConfig, UpstreamApiServiceImpl},
};
use types::{Contact, ContactForm, RestServer, Upstream};

pub mod types;

pub fn rest_server(config: &Config) -> anyhow::Result<RestServer> {
    Ok(RestServer::new(
        contact_service(config)?,
        rest_server_config(config)?,
    ))
}

pub fn contact_service(config: &Config) -> anyhow::Result<Contact> {
    let contact_feature_config = ContactFeatureConfig {
        status_cache_ttl: config.contact.status_cache_ttl.into(),
    };
    Ok(Contact::new(upstream(config)?, contact_feature_config))
}

pub fn contact_form(config: &Config) -> anyhow::Result<ContactForm> {
    let api = HttpContactApi::new(config.client.endpoint.clone())?;
    Ok(ContactForm::new(api, config.client.timeout.into()))
}

fn upstream(config: &Config) -> anyhow::Result<Option<Upstream>> {
    let Some(base_url) = config.upstream.base_url.clone() else {
        return Ok(None);
    };

    let upstream_api_service_config =
        UpstreamApiServiceConfig::new(base_url, config.upstream.timeout.into())?;
    let client = HttpClient::new()?;

    Ok(Some(UpstreamApiServiceImpl::new(
        upstream_api_service_config,
        client,
    )))
}

fn rest_server_config(config: &Config) -> anyhow::Result<RestServerConfig> {
    let allowed_origins = config
        .http
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid allowed origin {origin:?}"))
        })
        .collect::<anyhow::Result<_>>()?;

    Ok(RestServerConfig {
        addr: config.http.address,
        allowed_origins,
        max_body_size: config.contact.max_body_size,
    })
}
