use anyhow::{Result, anyhow};
use async_trait::async_trait;
use cl_types::{AccountRecord, WalletAddress};
use std::cell::Cell;
use std::collections::HashMap;

/// Fetches account records for the login flow.
///
/// Browser futures are not `Send`, so neither is this trait.
#[async_trait(?Send)]
pub trait AccountClient {
    async fn get_account(&self, wallet_address: &WalletAddress) -> Result<AccountRecord>;
}

#[derive(Default)]
pub struct InMemoryAccountClient {
    accounts: HashMap<String, AccountRecord>,
    failure: Option<String>,
    calls: Cell<usize>,
}

impl InMemoryAccountClient {
    pub fn with_account(mut self, record: AccountRecord) -> Self {
        self.accounts.insert(record.address.clone(), record);
        self
    }

    /// Make every lookup fail with `message`.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

#[async_trait(?Send)]
impl AccountClient for InMemoryAccountClient {
    async fn get_account(&self, wallet_address: &WalletAddress) -> Result<AccountRecord> {
        self.calls.set(self.calls.get() + 1);
        if let Some(message) = &self.failure {
            return Err(anyhow!("{message}"));
        }
        self.accounts
            .get(wallet_address.as_str())
            .cloned()
            .ok_or_else(|| anyhow!("account {} was not found", wallet_address.as_str()))
    }
}
