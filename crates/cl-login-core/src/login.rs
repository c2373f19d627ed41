//! Login form state machine.
//!
//! Owns the wallet address, the passphrase forwarded by the grid, the multisig
//! checkbox and the account lookup. The lookup runs in two phases:
//! [`LoginForm::on_address_input`] decides whether to start one and
//! [`LoginForm::complete_lookup`] applies its result. Only one lookup is in
//! flight at a time; keystrokes that arrive meanwhile are not queued.

use crate::events::{LoginError, LoginEvent};
use anyhow::Result;
use cl_types::{AccountRecord, ClientConfig, Credentials, KeyType, WalletAddress, utf16_len};
use tracing::{debug, warn};
use zeroize::Zeroize;

pub const DEFAULT_SUBMIT_BUTTON_TEXT: &str = "Log in";

/// Attributes read at mount besides the client configuration.
#[derive(Clone, Debug, Default)]
pub struct LoginOptions {
    pub disabled: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub submit_button_text: Option<String>,
}

/// Lookup status shown next to the multisig checkbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    Idle,
    Spinning,
    Failed,
}

impl Indicator {
    pub fn glyph(self) -> &'static str {
        match self {
            Indicator::Idle => "",
            Indicator::Spinning => "\u{21bb}",
            Indicator::Failed => "!",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checkbox {
    pub enabled: bool,
    pub checked: bool,
}

#[derive(Debug, Default)]
pub struct AddressInput {
    /// Address to fetch; `None` when no lookup should start.
    pub lookup: Option<WalletAddress>,
    pub events: Vec<LoginEvent>,
}

pub struct LoginForm {
    wallet_address_length: usize,
    wallet_address: String,
    passphrase: String,
    multisig: Checkbox,
    indicator: Indicator,
    lookup_in_flight: bool,
    account_ready: bool,
    wallet_address_invalid: bool,
    disabled: bool,
    loading: bool,
    error: Option<String>,
    submit_button_text: String,
}

impl Drop for LoginForm {
    fn drop(&mut self) {
        self.passphrase.zeroize();
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl LoginForm {
    pub fn new(config: ClientConfig, options: LoginOptions) -> Self {
        let wallet_address_length = config.wallet_address_length();
        Self {
            wallet_address_length,
            wallet_address: String::new(),
            passphrase: String::new(),
            multisig: Checkbox::default(),
            indicator: Indicator::Idle,
            lookup_in_flight: false,
            account_ready: false,
            wallet_address_invalid: false,
            disabled: options.disabled,
            loading: options.loading,
            error: non_empty(options.error),
            submit_button_text: non_empty(options.submit_button_text)
                .unwrap_or_else(|| DEFAULT_SUBMIT_BUTTON_TEXT.to_owned()),
        }
    }

    pub fn wallet_address_length(&self) -> usize {
        self.wallet_address_length
    }

    pub fn wallet_address(&self) -> &str {
        &self.wallet_address
    }

    pub fn passphrase(&self) -> &str {
        &self.passphrase
    }

    pub fn indicator(&self) -> Indicator {
        self.indicator
    }

    pub fn multisig_checkbox(&self) -> Checkbox {
        self.multisig
    }

    pub fn multisig_supported(&self) -> bool {
        self.multisig.enabled
    }

    pub fn lookup_in_flight(&self) -> bool {
        self.lookup_in_flight
    }

    pub fn account_ready(&self) -> bool {
        self.account_ready
    }

    pub fn wallet_address_invalid(&self) -> bool {
        self.wallet_address_invalid
    }

    pub fn key_type(&self) -> KeyType {
        if self.multisig.checked {
            KeyType::Multisig
        } else {
            KeyType::Sig
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn submit_button_text(&self) -> &str {
        &self.submit_button_text
    }

    pub fn submit_enabled(&self) -> bool {
        !self.disabled && !self.loading
    }

    // ── Reactive attributes ──

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = non_empty(error);
    }

    pub fn set_submit_button_text(&mut self, text: Option<String>) {
        self.submit_button_text = text.unwrap_or_default();
    }

    // ── Input ──

    pub fn on_passphrase_change(&mut self, passphrase: &str) {
        self.passphrase.zeroize();
        self.passphrase.push_str(passphrase);
    }

    /// A click on the checkbox. It stays unchecked unless the account supports multisig.
    pub fn set_multisig_checked(&mut self, checked: bool) {
        self.multisig.checked = checked && self.multisig.enabled;
    }

    pub fn on_address_input(&mut self, value: &str) -> AddressInput {
        self.wallet_address = value.to_owned();
        let mut input = AddressInput::default();

        if utf16_len(value) >= self.wallet_address_length {
            if self.indicator == Indicator::Failed {
                self.indicator = Indicator::Idle;
            }
            if self.lookup_in_flight {
                debug!("account lookup already in flight, skipping {value}");
                return input;
            }
            self.indicator = Indicator::Spinning;
            input.events.extend(self.set_account_ready(false));
            self.lookup_in_flight = true;
            debug!("starting account lookup for {value}");
            input.lookup = Some(WalletAddress(value.to_owned()));
        } else {
            self.indicator = Indicator::Idle;
            self.multisig = Checkbox::default();
            input.events.extend(self.set_account_ready(false));
        }
        input
    }

    /// Apply the outcome of the lookup started by [`LoginForm::on_address_input`].
    pub fn complete_lookup(&mut self, result: Result<AccountRecord>) -> Vec<LoginEvent> {
        let mut events = Vec::new();
        let (account, failure) = match result {
            Ok(account) => {
                self.indicator = Indicator::Idle;
                events.extend(self.set_account_ready(true));
                (account, None)
            }
            Err(err) => {
                warn!("account lookup for {} failed: {err:#}", self.wallet_address);
                self.indicator = Indicator::Failed;
                events.extend(self.set_account_ready(false));
                (AccountRecord::default(), Some(format!("{err:#}")))
            }
        };
        self.lookup_in_flight = false;

        let supported = account.supports_multisig();
        self.multisig = Checkbox {
            enabled: supported,
            checked: supported,
        };
        debug!("account lookup finished, multisig supported: {supported}");

        if let Some(message) = failure {
            events.push(LoginEvent::Error(LoginError::FetchAccount(message)));
        }
        events
    }

    /// Validate the form and build the credentials to hand to the page.
    ///
    /// `passphrase_error` is the `error` attribute the passphrase grid reported
    /// after validation.
    pub fn submit(&mut self, passphrase_error: Option<&str>) -> Result<Credentials, Vec<LoginError>> {
        self.error = None;
        self.wallet_address_invalid = false;

        let mut errors = Vec::new();
        if utf16_len(&self.wallet_address) != self.wallet_address_length {
            self.wallet_address_invalid = true;
            errors.push(LoginError::WalletAddress);
        }
        if let Some(message) = passphrase_error.filter(|m| !m.is_empty()) {
            errors.push(LoginError::Passphrase(message.to_owned()));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let wallet_address = if self.wallet_address.is_empty() {
            None
        } else {
            Some(self.wallet_address.trim().to_owned())
        };
        Ok(Credentials {
            key_type: self.key_type(),
            passphrase: self.passphrase.clone(),
            wallet_address,
        })
    }

    /// Events to dispatch for a [`LoginForm::submit`] result.
    pub fn submit_events(result: Result<Credentials, Vec<LoginError>>) -> Vec<LoginEvent> {
        match result {
            Ok(credentials) => vec![LoginEvent::SubmitCredentials(credentials)],
            Err(errors) => errors.into_iter().map(LoginEvent::Error).collect(),
        }
    }

    fn set_account_ready(&mut self, ready: bool) -> Option<LoginEvent> {
        if self.account_ready == ready {
            return None;
        }
        self.account_ready = ready;
        Some(LoginEvent::AccountReadyStateChange(ready))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passphrase::{INVALID_MESSAGE, PassphraseGrid};
    use cl_account_client::{AccountClient, InMemoryAccountClient};
    use std::cell::RefCell;
    use std::rc::Rc;

    const ADDRESS: &str = "clsk5f3b2a9e0c8d7f6e5d4c3b2a1f0e9d8c7b6a5f43";

    fn config() -> ClientConfig {
        ClientConfig {
            hostname: "capitalisk.com".to_owned(),
            port: Some(443),
            network_symbol: Some("clsk".to_owned()),
            chain_module_name: "capitalisk_chain".to_owned(),
            secure: true,
        }
    }

    fn form() -> LoginForm {
        LoginForm::new(config(), LoginOptions::default())
    }

    fn multisig_account() -> AccountRecord {
        AccountRecord {
            address: ADDRESS.to_owned(),
            multisig_public_key: Some("a1b2c3".to_owned()),
            ..AccountRecord::default()
        }
    }

    fn full_passphrase() -> String {
        let mut grid = PassphraseGrid::new();
        grid.set_cell(0, "a b c d e f g h i j k l");
        grid.key_up(0).passphrase
    }

    /// Type `value` and run any lookup it starts to completion.
    async fn type_address(
        form: &mut LoginForm,
        client: &impl AccountClient,
        value: &str,
    ) -> Vec<LoginEvent> {
        let input = form.on_address_input(value);
        let mut events = input.events;
        if let Some(address) = input.lookup {
            let result = client.get_account(&address).await;
            events.extend(form.complete_lookup(result));
        }
        events
    }

    #[test]
    fn defaults_come_from_options() {
        let form = form();
        assert_eq!(form.wallet_address_length(), 44);
        assert_eq!(form.submit_button_text(), DEFAULT_SUBMIT_BUTTON_TEXT);
        assert!(form.submit_enabled());
        assert_eq!(form.error(), None);

        let form = LoginForm::new(
            config(),
            LoginOptions {
                disabled: true,
                loading: false,
                error: Some("Session expired".to_owned()),
                submit_button_text: Some("Sign in".to_owned()),
            },
        );
        assert!(!form.submit_enabled());
        assert_eq!(form.error(), Some("Session expired"));
        assert_eq!(form.submit_button_text(), "Sign in");
    }

    #[test]
    fn reactive_attributes_update_state() {
        let mut form = form();
        form.set_loading(true);
        assert!(!form.submit_enabled());
        form.set_loading(false);
        form.set_disabled(true);
        assert!(!form.submit_enabled());

        form.set_error(Some("Bad".to_owned()));
        assert_eq!(form.error(), Some("Bad"));
        form.set_error(Some(String::new()));
        assert_eq!(form.error(), None);

        form.set_submit_button_text(None);
        assert_eq!(form.submit_button_text(), "");
    }

    #[test]
    fn short_address_never_starts_lookup() {
        let mut form = form();
        let input = form.on_address_input(&ADDRESS[..43]);
        assert!(input.lookup.is_none());
        assert!(input.events.is_empty());
        assert_eq!(form.indicator(), Indicator::Idle);
        assert!(!form.multisig_checkbox().enabled);
    }

    #[test]
    fn only_one_lookup_in_flight() {
        let mut form = form();
        let first = form.on_address_input(ADDRESS);
        assert!(first.lookup.is_some());
        assert_eq!(form.indicator(), Indicator::Spinning);

        let second = form.on_address_input(&format!("{ADDRESS}0"));
        assert!(second.lookup.is_none());
        assert!(form.lookup_in_flight());

        form.complete_lookup(Ok(AccountRecord::default()));
        assert!(!form.lookup_in_flight());
        assert!(form.on_address_input(ADDRESS).lookup.is_some());
    }

    #[tokio::test]
    async fn second_keystroke_during_lookup_does_not_fetch_again() {
        let client = InMemoryAccountClient::default().with_account(multisig_account());
        let mut form = form();

        let first = form.on_address_input(ADDRESS);
        let skipped = form.on_address_input(ADDRESS);
        assert!(skipped.lookup.is_none());

        let address = first.lookup.expect("lookup should start");
        let result = client.get_account(&address).await;
        form.complete_lookup(result);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn multisig_account_enables_checkbox_and_submits_multisig() -> anyhow::Result<()> {
        let client = InMemoryAccountClient::default().with_account(multisig_account());
        let mut form = form();

        let events = type_address(&mut form, &client, ADDRESS).await;
        assert_eq!(events, vec![LoginEvent::AccountReadyStateChange(true)]);
        assert_eq!(form.indicator(), Indicator::Idle);
        assert!(form.multisig_supported());
        assert_eq!(
            form.multisig_checkbox(),
            Checkbox {
                enabled: true,
                checked: true
            }
        );

        let passphrase = full_passphrase();
        form.on_passphrase_change(&passphrase);
        let credentials = form.submit(None).map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(credentials.key_type, KeyType::Multisig);
        assert_eq!(credentials.passphrase, passphrase);
        assert_eq!(credentials.wallet_address.as_deref(), Some(ADDRESS));
        Ok(())
    }

    #[tokio::test]
    async fn unchecking_multisig_submits_sig() -> anyhow::Result<()> {
        let client = InMemoryAccountClient::default().with_account(multisig_account());
        let mut form = form();
        type_address(&mut form, &client, ADDRESS).await;

        form.set_multisig_checked(false);
        form.on_passphrase_change(&full_passphrase());
        let credentials = form.submit(None).map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(credentials.key_type, KeyType::Sig);
        Ok(())
    }

    #[tokio::test]
    async fn account_without_multisig_key_keeps_checkbox_disabled() {
        let client = InMemoryAccountClient::default().with_account(AccountRecord {
            address: ADDRESS.to_owned(),
            sig_public_key: Some("beef".to_owned()),
            ..AccountRecord::default()
        });
        let mut form = form();
        type_address(&mut form, &client, ADDRESS).await;

        assert!(form.account_ready());
        assert!(!form.multisig_supported());
        assert_eq!(form.multisig_checkbox(), Checkbox::default());
        form.set_multisig_checked(true);
        assert_eq!(form.key_type(), KeyType::Sig);
    }

    #[tokio::test]
    async fn failed_lookup_reports_fetch_error() {
        let client = InMemoryAccountClient::default().failing("timeout");
        let mut form = form();

        let events = type_address(&mut form, &client, ADDRESS).await;
        assert_eq!(form.indicator(), Indicator::Failed);
        assert!(!form.account_ready());
        assert_eq!(form.multisig_checkbox(), Checkbox::default());

        let [LoginEvent::Error(err)] = events.as_slice() else {
            panic!("expected a single error event, got {events:?}");
        };
        assert_eq!(err.name(), "FetchAccountError");
        assert!(err.to_string().contains("timeout"));
    }

    #[tokio::test]
    async fn account_ready_fires_only_on_transitions() {
        let client = InMemoryAccountClient::default().with_account(multisig_account());
        let mut form = form();

        let ready = type_address(&mut form, &client, ADDRESS).await;
        assert_eq!(ready, vec![LoginEvent::AccountReadyStateChange(true)]);

        // A new lookup revokes readiness and restores it on success.
        let again = type_address(&mut form, &client, ADDRESS).await;
        assert_eq!(
            again,
            vec![
                LoginEvent::AccountReadyStateChange(false),
                LoginEvent::AccountReadyStateChange(true)
            ]
        );

        let shrunk = type_address(&mut form, &client, &ADDRESS[..10]).await;
        assert_eq!(shrunk, vec![LoginEvent::AccountReadyStateChange(false)]);
        assert_eq!(form.multisig_checkbox(), Checkbox::default());

        let still_short = type_address(&mut form, &client, &ADDRESS[..9]).await;
        assert!(still_short.is_empty());
    }

    #[test]
    fn typing_after_failure_clears_error_glyph() {
        let mut form = form();
        form.on_address_input(ADDRESS);
        form.complete_lookup(Err(anyhow::anyhow!("offline")));
        assert_eq!(form.indicator(), Indicator::Failed);

        form.on_address_input(&ADDRESS[..5]);
        assert_eq!(form.indicator(), Indicator::Idle);
    }

    #[test]
    fn short_address_blocks_submission() {
        let mut form = form();
        form.on_address_input(&ADDRESS[..43]);
        form.on_passphrase_change(&full_passphrase());

        let errors = form.submit(None).expect_err("submission should fail");
        assert_eq!(errors, vec![LoginError::WalletAddress]);
        assert!(form.wallet_address_invalid());

        let events = LoginForm::submit_events(Err(errors));
        assert!(events
            .iter()
            .all(|event| !matches!(event, LoginEvent::SubmitCredentials(_))));
    }

    #[test]
    fn address_length_must_match_exactly() {
        let mut form = form();
        for len in [0, 1, 43, 45, 60] {
            let value = "a".repeat(len);
            form.on_address_input(&value);
            assert!(form.submit(None).is_err(), "length {len} should fail");
        }
        form.on_address_input(&"a".repeat(44));
        assert!(form.submit(None).is_ok());
    }

    #[test]
    fn passphrase_error_is_forwarded_with_address_error() {
        let mut form = form();
        let mut grid = PassphraseGrid::new();
        let message = grid.set_validate(true);
        assert_eq!(message, Some(INVALID_MESSAGE));

        let errors = form.submit(message).expect_err("submission should fail");
        assert_eq!(
            errors,
            vec![
                LoginError::WalletAddress,
                LoginError::Passphrase(INVALID_MESSAGE.to_owned())
            ]
        );
        assert_eq!(errors[1].name(), "PassphraseError");
    }

    #[test]
    fn submit_clears_displayed_error() {
        let mut form = LoginForm::new(
            config(),
            LoginOptions {
                error: Some("Previous failure".to_owned()),
                ..LoginOptions::default()
            },
        );
        let _ = form.submit(None);
        assert_eq!(form.error(), None);
    }

    #[test]
    fn wallet_address_is_trimmed_and_empty_is_absent() -> anyhow::Result<()> {
        let padded = ClientConfig {
            network_symbol: Some("ab".to_owned()),
            ..config()
        };
        let mut form = LoginForm::new(padded, LoginOptions::default());
        let value = format!(" {} ", "f".repeat(40));
        form.on_address_input(&value);
        let credentials = form.submit(None).map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(credentials.wallet_address, Some("f".repeat(40)));

        let mut form = LoginForm::new(ClientConfig::default(), LoginOptions::default());
        let credentials = form.submit(None).map_err(|e| anyhow::anyhow!("{e:?}"))?;
        assert_eq!(credentials.wallet_address, None);
        Ok(())
    }

    #[test]
    fn missing_network_symbol_only_accepts_empty_address() {
        let mut form = LoginForm::new(ClientConfig::default(), LoginOptions::default());
        assert_eq!(form.wallet_address_length(), 0);

        // Every keystroke is long enough to look up.
        assert!(form.on_address_input("c").lookup.is_some());
        form.complete_lookup(Err(anyhow::anyhow!("not found")));
        assert_eq!(form.submit(None), Err(vec![LoginError::WalletAddress]));
    }

    #[test]
    fn address_length_counts_utf16_units() {
        let mut form = form();
        // 43 scalars but 44 UTF-16 units: long enough to look up.
        let near = format!("clsk{}\u{1F600}", "a".repeat(38));
        assert_eq!(near.chars().count(), 43);
        assert!(form.on_address_input(&near).lookup.is_some());
        form.complete_lookup(Err(anyhow::anyhow!("not found")));

        // 44 scalars is one unit too many.
        let over = format!("clsk{}\u{1F600}", "a".repeat(39));
        assert_eq!(over.chars().count(), 44);
        form.on_address_input(&over);
        assert_eq!(form.wallet_address(), over);
        assert_eq!(form.submit(None), Err(vec![LoginError::WalletAddress]));
    }

    #[tokio::test]
    async fn dropped_form_is_not_kept_alive_by_pending_lookup() {
        let client = InMemoryAccountClient::default().with_account(multisig_account());
        let form = Rc::new(RefCell::new(form()));
        let handler_ref = Rc::downgrade(&form);

        let passphrase = full_passphrase();
        form.borrow_mut().on_passphrase_change(&passphrase);
        assert_eq!(form.borrow().passphrase(), passphrase);
        let lookup = form.borrow_mut().on_address_input(ADDRESS).lookup;
        let address = lookup.expect("lookup should start");

        drop(form);
        assert!(handler_ref.upgrade().is_none());

        let result = client.get_account(&address).await;
        let applied = handler_ref
            .upgrade()
            .map(|form| form.borrow_mut().complete_lookup(result));
        assert!(applied.is_none());
    }
}
