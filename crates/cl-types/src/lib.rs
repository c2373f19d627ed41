use serde::{Deserialize, Serialize};

/// Number of hex characters that follow the network symbol in a wallet address.
pub const WALLET_ADDRESS_HEX_LENGTH: usize = 40;

/// Length as a browser reports it: UTF-16 code units.
pub fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    Sig,
    Multisig,
}

/// Connection parameters for the account-lookup client.
///
/// Read once when a login widget is mounted and never changed afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub network_symbol: Option<String>,
    #[serde(default)]
    pub chain_module_name: String,
    #[serde(default)]
    pub secure: bool,
}

impl ClientConfig {
    /// Exact length a wallet address must have on this network.
    ///
    /// Without a network symbol this is 0, so only the empty address matches.
    pub fn wallet_address_length(&self) -> usize {
        match self.network_symbol.as_deref() {
            Some(symbol) if !symbol.is_empty() => utf16_len(symbol) + WALLET_ADDRESS_HEX_LENGTH,
            _ => 0,
        }
    }

    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// `scheme://hostname[:port]`
    pub fn base_url(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme(), self.hostname, port),
            None => format!("{}://{}", self.scheme(), self.hostname),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub sig_public_key: Option<String>,
    #[serde(default)]
    pub multisig_public_key: Option<String>,
}

impl AccountRecord {
    pub fn supports_multisig(&self) -> bool {
        self.multisig_public_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }
}

/// Detail of the `submitCredentials` event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(rename = "type")]
    pub key_type: KeyType,
    pub passphrase: String,
    pub wallet_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountReadyDetail {
    pub account_ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PassphraseDetail {
    pub passphrase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedError {
    pub name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub error: NamedError,
}
