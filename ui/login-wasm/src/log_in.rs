//! `<capitalisk-log-in>`: wallet address, multisig checkbox, passphrase grid
//! and submit button.
//!
//! Configuration is read from the host's attributes once, at mount. After that
//! only `disabled`, `loading`, `error` and `submit-button-text` are observed.

use crate::dom;
use crate::events::{self, Bindings};
use crate::passphrase_input::PassphraseInput;
use crate::state;
use cl_account_client::AccountClient;
use cl_login_core::{Indicator, LoginForm, LoginOptions};
use cl_types::{ClientConfig, PassphraseDetail};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Element, Event, HtmlInputElement, KeyboardEvent};

const OBSERVED_ATTRIBUTES: [&str; 4] = ["disabled", "loading", "error", "submit-button-text"];

pub struct LogIn {
    host: Element,
    form: RefCell<LoginForm>,
    client: Rc<dyn AccountClient>,
    wallet_address_input: HtmlInputElement,
    multisig_checkbox: HtmlInputElement,
    multisig_indicator: Element,
    error_area: Element,
    submit_button: HtmlInputElement,
    passphrase: Rc<PassphraseInput>,
    bindings: RefCell<Bindings>,
}

/// Client configuration from `hostname`, `port`, `network-symbol`,
/// `chain-module-name` and `secure`.
pub fn read_config(host: &Element) -> ClientConfig {
    ClientConfig {
        hostname: dom::attr(host, "hostname").unwrap_or_default(),
        port: dom::attr(host, "port").and_then(|port| port.trim().parse().ok()),
        network_symbol: dom::attr(host, "network-symbol"),
        chain_module_name: dom::attr(host, "chain-module-name").unwrap_or_default(),
        secure: dom::attr(host, "secure").as_deref() == Some("true"),
    }
}

pub fn read_options(host: &Element) -> LoginOptions {
    LoginOptions {
        disabled: host.has_attribute("disabled"),
        loading: host.has_attribute("loading"),
        error: dom::attr(host, "error"),
        submit_button_text: dom::attr(host, "submit-button-text"),
    }
}

fn template(config: &ClientConfig, checkbox_id: &str) -> String {
    let hostname = dom::escape_html(&config.hostname);
    format!(
        r#"
      <form class="log-in-form">
        <h2>
          Log in via
          <a href="{scheme}://{hostname}" target="_blank">{hostname}</a>
        </h2>
        <input class="wallet-address-input long-input" type="text" placeholder="Wallet address" />
        <div class="form-panel">
          <label for="{checkbox_id}">Multisig:</label> <input id="{checkbox_id}" class="is-multisig" type="checkbox" disabled /> <span class="multisig-indicator"></span>
        </div>
        <capitalisk-passphrase-input></capitalisk-passphrase-input>
        <div class="error-area"></div>
        <input class="submit-button" type="submit" />
      </form>
    "#,
        scheme = config.scheme(),
    )
}

impl LogIn {
    pub fn mount(host: Element, config: ClientConfig) -> Result<Rc<Self>, JsValue> {
        dom::mark_mounted(&host)?;
        let client: Rc<dyn AccountClient> = Rc::new(cl_ldpos_http::create_client(&config));
        let options = read_options(&host);

        let checkbox_id = format!("is-multisig-{}", state::next_id());
        host.set_inner_html(&template(&config, &checkbox_id));

        let passphrase = PassphraseInput::mount(dom::query_within(&host, "capitalisk-passphrase-input")?)?;
        let widget = Rc::new(Self {
            wallet_address_input: dom::query_input_within(&host, ".wallet-address-input")?,
            multisig_checkbox: dom::query_input_within(&host, ".is-multisig")?,
            multisig_indicator: dom::query_within(&host, ".multisig-indicator")?,
            error_area: dom::query_within(&host, ".error-area")?,
            submit_button: dom::query_input_within(&host, ".submit-button")?,
            form: RefCell::new(LoginForm::new(config, options)),
            client,
            passphrase,
            host,
            bindings: RefCell::default(),
        });

        widget.render_attributes()?;
        widget.render_lookup()?;
        widget.bind()?;

        let this = Rc::downgrade(&widget);
        let observer = events::observe_attributes(&widget.host, &OBSERVED_ATTRIBUTES, move |name| {
            let Some(this) = this.upgrade() else { return };
            this.on_attribute_changed(name);
            if let Err(err) = this.render_attributes() {
                events::report("log-in attributes", err);
            }
        })?;
        widget.bindings.borrow_mut().observe(observer);
        Ok(widget)
    }

    fn bind(self: &Rc<Self>) -> Result<(), JsValue> {
        let mut bindings = self.bindings.borrow_mut();
        let this = Rc::downgrade(self);
        bindings.listen(events::listen(&self.wallet_address_input, "keyup", move |_: KeyboardEvent| {
            let Some(this) = this.upgrade() else { return };
            if let Err(err) = this.on_address_keyup() {
                events::report("wallet address", err);
            }
        })?);

        let this = Rc::downgrade(self);
        bindings.listen(events::listen(&self.multisig_checkbox, "change", move |_: Event| {
            let Some(this) = this.upgrade() else { return };
            let checked = this.multisig_checkbox.checked();
            this.form.borrow_mut().set_multisig_checked(checked);
            if let Err(err) = this.render_lookup() {
                events::report("multisig checkbox", err);
            }
        })?);

        let this = Rc::downgrade(self);
        bindings.listen(events::listen(self.passphrase.host(), "passphraseChange", move |event: CustomEvent| {
            let Some(this) = this.upgrade() else { return };
            match serde_wasm_bindgen::from_value::<PassphraseDetail>(event.detail()) {
                Ok(detail) => this.form.borrow_mut().on_passphrase_change(&detail.passphrase),
                Err(err) => events::report("passphrase change", err.into()),
            }
        })?);

        let form = dom::query_within(&self.host, ".log-in-form")?;
        let this = Rc::downgrade(self);
        bindings.listen(events::listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            let Some(this) = this.upgrade() else { return };
            if let Err(err) = this.on_submit() {
                events::report("log-in submit", err);
            }
        })?);
        Ok(())
    }

    fn on_address_keyup(self: &Rc<Self>) -> Result<(), JsValue> {
        let value = self.wallet_address_input.value();
        let input = self.form.borrow_mut().on_address_input(&value);
        self.render_lookup()?;
        events::dispatch_all(&self.host, &input.events)?;

        if let Some(address) = input.lookup {
            let client = Rc::clone(&self.client);
            let this = Rc::downgrade(self);
            wasm_bindgen_futures::spawn_local(async move {
                let result = client.get_account(&address).await;
                // Unmounted while the request was pending.
                let Some(this) = this.upgrade() else { return };
                let outcome = this.form.borrow_mut().complete_lookup(result);
                let rendered = this
                    .render_lookup()
                    .and_then(|_| events::dispatch_all(&this.host, &outcome));
                if let Err(err) = rendered {
                    events::report("account lookup", err);
                }
            });
        }
        Ok(())
    }

    fn on_submit(&self) -> Result<(), JsValue> {
        let passphrase_error = self.passphrase.validate()?;
        let result = self.form.borrow_mut().submit(passphrase_error.as_deref());
        self.render_attributes()?;
        self.render_lookup()?;
        events::dispatch_all(&self.host, &LoginForm::submit_events(result))
    }

    fn on_attribute_changed(&self, name: &str) {
        let mut form = self.form.borrow_mut();
        match name {
            "disabled" => form.set_disabled(self.host.has_attribute("disabled")),
            "loading" => form.set_loading(self.host.has_attribute("loading")),
            "error" => form.set_error(dom::attr(&self.host, "error")),
            "submit-button-text" => form.set_submit_button_text(dom::attr(&self.host, "submit-button-text")),
            _ => {}
        }
    }

    fn render_attributes(&self) -> Result<(), JsValue> {
        let form = self.form.borrow();
        dom::set_flag_attr(&self.submit_button, "disabled", !form.submit_enabled())?;
        self.submit_button.set_value(form.submit_button_text());

        let error = form.error().unwrap_or_default();
        dom::set_text(&self.error_area, error);
        dom::toggle_class(&self.error_area, "error", !error.is_empty());
        Ok(())
    }

    fn render_lookup(&self) -> Result<(), JsValue> {
        let form = self.form.borrow();
        let indicator = form.indicator();
        dom::set_text(&self.multisig_indicator, indicator.glyph());
        dom::toggle_class(&self.multisig_indicator, "spinning", indicator == Indicator::Spinning);
        dom::toggle_class(&self.multisig_indicator, "error", indicator == Indicator::Failed);

        dom::set_flag_attr(&self.multisig_checkbox, "disabled", !form.multisig_supported())?;
        self.multisig_checkbox.set_checked(form.multisig_checkbox().checked);

        dom::toggle_class(&self.wallet_address_input, "error", form.wallet_address_invalid());
        Ok(())
    }
}
