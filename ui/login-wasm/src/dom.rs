//! DOM helpers shared by the widgets.
//!
//! Lookups are scoped to a widget's host element so several widgets can live
//! on one page.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

/// Marks a host element that already has a widget mounted in it. Top-level
/// hosts carry their registry id; hosts nested in another widget carry an
/// empty value.
pub const MOUNTED_ATTR: &str = "data-cl-mounted";

pub fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn create_element(tag: &str) -> Result<Element, JsValue> {
    document()?.create_element(tag)
}

pub fn create_input(input_type: &str) -> Result<HtmlInputElement, JsValue> {
    let input: HtmlInputElement = create_element("input")?.dyn_into()?;
    input.set_type(input_type);
    Ok(input)
}

pub fn query_within(parent: &Element, selector: &str) -> Result<Element, JsValue> {
    parent
        .query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing {selector}")))
}

pub fn query_input_within(parent: &Element, selector: &str) -> Result<HtmlInputElement, JsValue> {
    query_within(parent, selector)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| JsValue::from_str(&format!("{selector} is not an input")))
}

/// All elements matching `selector` in the document that have no widget yet.
pub fn unmounted(selector: &str) -> Result<Vec<Element>, JsValue> {
    let nl = document()?.query_selector_all(selector)?;
    let mut v = Vec::new();
    for i in 0..nl.length() {
        if let Some(el) = nl.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            if !el.has_attribute(MOUNTED_ATTR) {
                v.push(el);
            }
        }
    }
    Ok(v)
}

pub fn mark_mounted(el: &Element) -> Result<(), JsValue> {
    el.set_attribute(MOUNTED_ATTR, "")
}

pub fn mark_mounted_as(el: &Element, id: u32) -> Result<(), JsValue> {
    el.set_attribute(MOUNTED_ATTR, &id.to_string())
}

/// Registry id of the widget mounted on `el`, if it is a top-level host.
pub fn mounted_id(el: &Element) -> Option<u32> {
    parse_mounted_id(attr(el, MOUNTED_ATTR).as_deref())
}

fn parse_mounted_id(value: Option<&str>) -> Option<u32> {
    value.and_then(|id| id.parse().ok())
}

pub fn attr(el: &Element, name: &str) -> Option<String> {
    el.get_attribute(name)
}

pub fn set_flag_attr(el: &Element, name: &str, on: bool) -> Result<(), JsValue> {
    if on {
        el.set_attribute(name, "")
    } else {
        el.remove_attribute(name)
    }
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
