use anyhow::{Context, Result};
use async_trait::async_trait;
use cl_account_client::AccountClient;
use cl_types::{AccountRecord, ClientConfig, WalletAddress};
use serde::Deserialize;
use tracing::{debug, warn};

/// HTTP adapter for an LDPoS node gateway.
///
/// The endpoint is derived from the [`ClientConfig`]; `LDPOS_HTTP_URL`
/// overrides it where an environment exists.
pub struct LdposHttpClient {
    endpoint: String,
    chain_module_name: String,
    http: reqwest::Client,
}

/// Build the account client for a login widget.
pub fn create_client(config: &ClientConfig) -> LdposHttpClient {
    LdposHttpClient::new(config, None)
}

impl LdposHttpClient {
    pub fn new(config: &ClientConfig, endpoint: Option<String>) -> Self {
        let endpoint = endpoint
            .or_else(|| std::env::var("LDPOS_HTTP_URL").ok())
            .unwrap_or_else(|| config.base_url());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            chain_module_name: config.chain_module_name.trim_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn account_url(&self, wallet_address: &WalletAddress) -> String {
        if self.chain_module_name.is_empty() {
            format!("{}/accounts/{}", self.endpoint, wallet_address.as_str())
        } else {
            format!(
                "{}/{}/accounts/{}",
                self.endpoint,
                self.chain_module_name,
                wallet_address.as_str()
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct GatewayErrorResponse {
    message: String,
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<GatewayErrorResponse>(body) {
        Ok(err) => err.message,
        Err(_) => format!("HTTP {status}: {body}"),
    }
}

#[async_trait(?Send)]
impl AccountClient for LdposHttpClient {
    async fn get_account(&self, wallet_address: &WalletAddress) -> Result<AccountRecord> {
        let url = self.account_url(wallet_address);
        debug!("ldpos get_account {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("ldpos get_account transport")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = error_message(status, &text);
            warn!("ldpos get_account failed for {}: {message}", wallet_address.as_str());
            anyhow::bail!(message);
        }

        response
            .json::<AccountRecord>()
            .await
            .context("ldpos get_account parse")
    }
}
