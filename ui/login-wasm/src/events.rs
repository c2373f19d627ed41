//! Event plumbing.
//!
//! Listener registration, `CustomEvent` dispatch on host elements and
//! attribute observation. Listeners and observers are owned handles: dropping
//! one detaches it and frees its closure, so a widget's handlers go away with
//! the widget.

use cl_login_core::LoginEvent;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CustomEvent, CustomEventInit, Element, Event, EventTarget, MutationObserver, MutationObserverInit,
    MutationRecord,
};

/// An event listener, removed from its target on drop.
pub struct Listener {
    target: EventTarget,
    name: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        let removed = self
            .target
            .remove_event_listener_with_callback(self.name, self.callback.as_ref().unchecked_ref());
        if let Err(err) = removed {
            report("remove listener", err);
        }
    }
}

/// Attach `handler` for `name` events on `target`, cast to the concrete event type.
pub fn listen<E, F>(target: &EventTarget, name: &'static str, mut handler: F) -> Result<Listener, JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let callback = Closure::wrap(Box::new(move |event: Event| handler(event.unchecked_into::<E>()))
        as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    Ok(Listener {
        target: target.clone(),
        name,
        callback,
    })
}

/// A `MutationObserver` on attributes, disconnected on drop.
pub struct AttributeObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for AttributeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Everything a widget has attached to the page.
#[derive(Default)]
pub struct Bindings {
    listeners: Vec<Listener>,
    observers: Vec<AttributeObserver>,
}

impl Bindings {
    pub fn listen(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    pub fn observe(&mut self, observer: AttributeObserver) {
        self.observers.push(observer);
    }
}

/// Log a failed handler to the browser console.
pub fn report(context: &str, err: JsValue) {
    gloo_console::error!(format!("{context}:"), err);
}

/// Dispatch `name` on `host` with a JSON-compatible detail (`None` becomes `null`).
pub fn dispatch<T: Serialize>(host: &Element, name: &str, detail: &T) -> Result<(), JsValue> {
    let detail = detail.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(name, &init)?;
    host.dispatch_event(&event)?;
    Ok(())
}

pub fn dispatch_login_event(host: &Element, event: &LoginEvent) -> Result<(), JsValue> {
    let name = event.name();
    match event {
        LoginEvent::SubmitCredentials(credentials) => dispatch(host, name, credentials),
        LoginEvent::AccountReadyStateChange(ready) => {
            dispatch(host, name, &LoginEvent::account_ready_detail(*ready))
        }
        LoginEvent::Error(err) => dispatch(host, name, &err.detail()),
        LoginEvent::PassphraseChange(passphrase) => {
            dispatch(host, name, &LoginEvent::passphrase_detail(passphrase))
        }
    }
}

pub fn dispatch_all(host: &Element, events: &[LoginEvent]) -> Result<(), JsValue> {
    for event in events {
        dispatch_login_event(host, event)?;
    }
    Ok(())
}

/// Call `on_change` with the attribute name whenever one of `names` changes on `target`.
pub fn observe_attributes<F>(target: &Element, names: &[&str], mut on_change: F) -> Result<AttributeObserver, JsValue>
where
    F: FnMut(&str) + 'static,
{
    let callback = Closure::wrap(Box::new(move |records: js_sys::Array, _: MutationObserver| {
        for record in records.iter() {
            if let Ok(record) = record.dyn_into::<MutationRecord>() {
                if let Some(name) = record.attribute_name() {
                    on_change(&name);
                }
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, MutationObserver)>);

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_attributes(true);
    let filter: js_sys::Array = names.iter().map(|name| JsValue::from_str(name)).collect();
    init.set_attribute_filter(&filter);
    observer.observe_with_options(target, &init)?;
    Ok(AttributeObserver {
        observer,
        _callback: callback,
    })
}
