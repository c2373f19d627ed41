//! Capitalisk login widgets for the browser.
//!
//! Mounts `<capitalisk-log-in>`, `<capitalisk-passphrase-input>` and
//! `<show-hide-button>` hosts found on the page at start-up. Hosts added later
//! are mounted through the exported `mount_*` functions and released with
//! [`unmount`].

pub mod dom;
pub mod events;
pub mod log_in;
pub mod passphrase_input;
pub mod show_hide;
pub mod state;

use cl_types::ClientConfig;
use state::Widget;
use wasm_bindgen::prelude::*;
use web_sys::Element;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    // Outer widgets first so their nested hosts are already marked as mounted.
    for host in dom::unmounted("capitalisk-log-in")? {
        if let Err(err) = mount_log_in(host) {
            events::report("mount capitalisk-log-in", err);
        }
    }
    for host in dom::unmounted("capitalisk-passphrase-input")? {
        if let Err(err) = mount_passphrase_input(host) {
            events::report("mount capitalisk-passphrase-input", err);
        }
    }
    for host in dom::unmounted("show-hide-button")? {
        if let Err(err) = mount_show_hide_button(host) {
            events::report("mount show-hide-button", err);
        }
    }

    gloo_console::debug!(format!("capitalisk login widgets mounted: {}", state::mounted()));
    Ok(())
}

/// Mount a login form, reading its client configuration from the host's attributes.
#[wasm_bindgen]
pub fn mount_log_in(host: Element) -> Result<(), JsValue> {
    let config = log_in::read_config(&host);
    let widget = log_in::LogIn::mount(host.clone(), config)?;
    register(&host, Widget::LogIn(widget))
}

/// Mount a login form with a client configuration object
/// (`{ hostname, port, networkSymbol, chainModuleName, secure }`).
#[wasm_bindgen]
pub fn mount_log_in_with_config(host: Element, config: JsValue) -> Result<(), JsValue> {
    let config: ClientConfig = serde_wasm_bindgen::from_value(config)?;
    let widget = log_in::LogIn::mount(host.clone(), config)?;
    register(&host, Widget::LogIn(widget))
}

#[wasm_bindgen]
pub fn mount_passphrase_input(host: Element) -> Result<(), JsValue> {
    let widget = passphrase_input::PassphraseInput::mount(host.clone())?;
    register(&host, Widget::PassphraseInput(widget))
}

#[wasm_bindgen]
pub fn mount_show_hide_button(host: Element) -> Result<(), JsValue> {
    let widget = show_hide::ShowHideButton::mount(host.clone())?;
    register(&host, Widget::ShowHideButton(widget))
}

/// Tear down the widget mounted on `host`: its listeners and observers are
/// detached and its passphrase state is wiped. Hosts without a widget are
/// left alone.
#[wasm_bindgen]
pub fn unmount(host: Element) -> Result<(), JsValue> {
    let Some(id) = dom::mounted_id(&host) else {
        return Ok(());
    };
    drop(state::release(id));
    host.remove_attribute(dom::MOUNTED_ATTR)
}

fn register(host: &Element, widget: Widget) -> Result<(), JsValue> {
    let id = state::keep(widget);
    dom::mark_mounted_as(host, id)
}
