use cl_types::{AccountReadyDetail, Credentials, ErrorDetail, NamedError, PassphraseDetail};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Failed to fetch account because of error: {0}")]
    FetchAccount(String),
    #[error("Invalid wallet address")]
    WalletAddress,
    #[error("{0}")]
    Passphrase(String),
}

impl LoginError {
    /// Name carried by the `error` event.
    pub fn name(&self) -> &'static str {
        match self {
            LoginError::FetchAccount(_) => "FetchAccountError",
            LoginError::WalletAddress => "WalletAddressError",
            LoginError::Passphrase(_) => "PassphraseError",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            error: NamedError {
                name: self.name().to_owned(),
                message: self.to_string(),
            },
        }
    }
}

/// Notifications emitted to the embedding page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    SubmitCredentials(Credentials),
    AccountReadyStateChange(bool),
    Error(LoginError),
    PassphraseChange(String),
}

impl LoginEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LoginEvent::SubmitCredentials(_) => "submitCredentials",
            LoginEvent::AccountReadyStateChange(_) => "accountReadyStateChange",
            LoginEvent::Error(_) => "error",
            LoginEvent::PassphraseChange(_) => "passphraseChange",
        }
    }

    pub fn account_ready_detail(ready: bool) -> AccountReadyDetail {
        AccountReadyDetail {
            account_ready: ready,
        }
    }

    pub fn passphrase_detail(passphrase: &str) -> PassphraseDetail {
        PassphraseDetail {
            passphrase: passphrase.to_owned(),
        }
    }
}
