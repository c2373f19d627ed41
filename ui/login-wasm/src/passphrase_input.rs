//! `<capitalisk-passphrase-input>`: twelve word inputs plus a show/hide toggle.
//!
//! Key handling lives in [`PassphraseGrid`]; this module copies input values
//! into the grid, writes the grid back and moves focus.

use crate::dom;
use crate::events::{self, Bindings};
use crate::show_hide::ShowHideButton;
use cl_login_core::LoginEvent;
use cl_login_core::passphrase::{CELL_COUNT, KeyPress, PassphraseGrid};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlInputElement, KeyboardEvent, MouseEvent};

pub struct PassphraseInput {
    host: Element,
    grid: RefCell<PassphraseGrid>,
    inputs: Vec<HtmlInputElement>,
    toggle: Rc<ShowHideButton>,
    bindings: RefCell<Bindings>,
}

impl Drop for PassphraseInput {
    fn drop(&mut self) {
        for input in &self.inputs {
            input.set_value("");
        }
    }
}

impl PassphraseInput {
    pub fn mount(host: Element) -> Result<Rc<Self>, JsValue> {
        dom::mark_mounted(&host)?;
        host.set_inner_html("");

        let toggle_el = dom::create_element("show-hide-button")?;
        toggle_el.class_list().add_1("passphrase-show-hide-button")?;
        let toggle = ShowHideButton::mount(toggle_el)?;

        let container = dom::create_element("div")?;
        container.class_list().add_1("passphrase-container")?;

        let mut inputs = Vec::with_capacity(CELL_COUNT);
        for index in 0..CELL_COUNT {
            let input = dom::create_input("password")?;
            input.set_attribute("index", &index.to_string())?;
            container.append_child(&input)?;
            inputs.push(input);
        }

        host.append_child(toggle.host())?;
        host.append_child(&container)?;

        let widget = Rc::new(Self {
            host,
            grid: RefCell::new(PassphraseGrid::new()),
            inputs,
            toggle,
            bindings: RefCell::default(),
        });
        widget.bind()?;
        widget.render()?;

        let this = Rc::downgrade(&widget);
        let observer = events::observe_attributes(&widget.host, &["validate"], move |_| {
            let Some(this) = this.upgrade() else { return };
            if let Err(err) = this.render() {
                events::report("passphrase render", err);
            }
        })?;
        widget.bindings.borrow_mut().observe(observer);
        Ok(widget)
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    /// Turn validation on and return the resulting `error` attribute.
    pub fn validate(&self) -> Result<Option<String>, JsValue> {
        self.host.set_attribute("validate", "true")?;
        self.render()?;
        Ok(dom::attr(&self.host, "error"))
    }

    fn bind(self: &Rc<Self>) -> Result<(), JsValue> {
        let mut bindings = self.bindings.borrow_mut();
        for (index, input) in self.inputs.iter().enumerate() {
            let this = Rc::downgrade(self);
            bindings.listen(events::listen(input, "keydown", move |event: KeyboardEvent| {
                if let Some(this) = this.upgrade() {
                    this.on_key_down(index, &event);
                }
            })?);

            let this = Rc::downgrade(self);
            bindings.listen(events::listen(input, "keyup", move |_: KeyboardEvent| {
                let Some(this) = this.upgrade() else { return };
                if let Err(err) = this.on_key_up(index) {
                    events::report("passphrase keyup", err);
                }
            })?);
        }

        let this = Rc::downgrade(self);
        bindings.listen(events::listen(self.toggle.host(), "click", move |_: MouseEvent| {
            let Some(this) = this.upgrade() else { return };
            this.grid.borrow_mut().toggle_show();
            if let Err(err) = this.render() {
                events::report("passphrase toggle", err);
            }
        })?);
        Ok(())
    }

    fn on_key_down(&self, index: usize, event: &KeyboardEvent) {
        let input = &self.inputs[index];
        let key = KeyPress::from_key(
            &event.key(),
            input.selection_start().ok().flatten(),
            input.selection_end().ok().flatten(),
        );
        let outcome = self.grid.borrow_mut().key_down(index, key);
        if outcome.prevent_default {
            event.prevent_default();
        }
        if let Some(focus) = outcome.focus {
            if let Err(err) = self.inputs[focus].focus() {
                events::report("passphrase focus", err);
            }
        }
        if let Some(cleared) = outcome.cleared {
            self.inputs[cleared].set_value("");
        }
    }

    fn on_key_up(&self, index: usize) -> Result<(), JsValue> {
        self.read_inputs();
        let outcome = self.grid.borrow_mut().key_up(index);
        self.write_inputs();
        if let Some(focus) = outcome.focus {
            self.inputs[focus].focus()?;
        }
        events::dispatch_login_event(&self.host, &LoginEvent::PassphraseChange(outcome.passphrase))
    }

    fn read_inputs(&self) {
        let mut grid = self.grid.borrow_mut();
        for (index, input) in self.inputs.iter().enumerate() {
            grid.set_cell(index, &input.value());
        }
    }

    fn write_inputs(&self) {
        let grid = self.grid.borrow();
        for (input, cell) in self.inputs.iter().zip(grid.cells()) {
            if input.value() != *cell {
                input.set_value(cell);
            }
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        self.read_inputs();
        let validate = dom::attr(&self.host, "validate").as_deref() == Some("true");
        let (show, error) = {
            let mut grid = self.grid.borrow_mut();
            let error = grid.set_validate(validate);
            for (index, input) in self.inputs.iter().enumerate() {
                input.set_type(if grid.show() { "text" } else { "password" });
                dom::toggle_class(input, "error", grid.cell_has_error(index));
            }
            (grid.show(), error)
        };

        self.toggle.set_show(show)?;
        match error {
            Some(message) => self.host.set_attribute("error", message),
            None => self.host.remove_attribute("error"),
        }
    }
}
