//! `<show-hide-button>`: a link labelled from its `show` attribute.

use crate::dom;
use crate::events::{self, Bindings};
use cl_login_core::show_hide;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;

pub struct ShowHideButton {
    host: Element,
    bindings: RefCell<Bindings>,
}

impl ShowHideButton {
    pub fn mount(host: Element) -> Result<Rc<Self>, JsValue> {
        dom::mark_mounted(&host)?;
        let button = Rc::new(Self {
            host,
            bindings: RefCell::default(),
        });
        button.render();

        let this = Rc::downgrade(&button);
        let observer = events::observe_attributes(&button.host, &["show"], move |_| {
            if let Some(this) = this.upgrade() {
                this.render();
            }
        })?;
        button.bindings.borrow_mut().observe(observer);
        Ok(button)
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    pub fn set_show(&self, show: bool) -> Result<(), JsValue> {
        self.host
            .set_attribute("show", if show { "true" } else { "false" })?;
        self.render();
        Ok(())
    }

    fn render(&self) {
        let show = show_hide::parse_show(dom::attr(&self.host, "show").as_deref());
        self.host.set_inner_html(&format!(
            r#"<a href="javascript: void(0);">{}</a>"#,
            show_hide::label(show)
        ));
    }
}
