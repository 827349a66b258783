use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    authority::{VersionAuthority, VersionQuery, VersionRow, parse_response},
    error::{Result, VersionCheckError},
};

const USER_AGENT: &str = concat!("plato-version-check/", env!("CARGO_PKG_VERSION"));

/// Version authority exposed as a database RPC over HTTP
/// (`POST {base}/rest/v1/rpc/{function}`).
#[derive(Debug, Clone)]
pub struct HttpVersionAuthority {
    client: Client,
    rpc_url: Url,
    api_key: Option<String>,
}

impl HttpVersionAuthority {
    pub fn new(base_url: &str, function: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(client, base_url, function, api_key)
    }

    pub fn with_client(
        client: Client,
        base_url: &str,
        function: &str,
        api_key: Option<String>,
    ) -> Result<Self> {
        let rpc_url = rpc_url(base_url, function)?;
        Ok(Self {
            client,
            rpc_url,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }
}

fn rpc_url(base_url: &str, function: &str) -> Result<Url> {
    if function.is_empty() || function.contains('/') {
        return Err(VersionCheckError::InvalidEndpoint(format!(
            "invalid function name '{}'",
            function
        )));
    }
    let mut base = Url::parse(base_url)
        .map_err(|e| VersionCheckError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("rest/v1/rpc/{}", function))
        .map_err(|e| VersionCheckError::InvalidEndpoint(e.to_string()))
}

#[async_trait]
impl VersionAuthority for HttpVersionAuthority {
    #[instrument(skip(self), fields(url = %self.rpc_url))]
    async fn latest_version(&self, query: VersionQuery) -> Result<Option<VersionRow>> {
        let mut request = self
            .client
            .post(self.rpc_url.clone())
            .header(header::ACCEPT, "application/json")
            .json(&query);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Version authority answered {} ({} bytes)", status, body.len());

        if !status.is_success() {
            return Err(VersionCheckError::Status { status, body });
        }

        parse_response(&body)
    }
}
