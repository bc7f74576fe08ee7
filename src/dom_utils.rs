//! dom_utils.rs – thin helper layer for repetitive DOM operations.
//!
//! Typed element lookups, Bootstrap visibility toggles and the handful of
//! `window` calls (alert/confirm/open/reload) the page controllers share.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventInit, HtmlButtonElement, HtmlElement, HtmlInputElement,
    HtmlOptionElement, HtmlSelectElement,
};

use crate::models::ChoiceOption;

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|w| w.document())
}

/// Bootstrap `d-none` off.
pub fn show(el: &Element) {
    let _ = el.class_list().remove_1("d-none");
}

/// Bootstrap `d-none` on.
pub fn hide(el: &Element) {
    let _ = el.class_list().add_1("d-none");
}

/// Inline `display` toggle for panels the templates hide with a style
/// attribute rather than a class.
pub fn set_display(el: &Element, visible: bool) {
    if let Some(html) = el.dyn_ref::<HtmlElement>() {
        let _ = html
            .style()
            .set_property("display", if visible { "block" } else { "none" });
    }
}

// ---------------------------------------------------------------------------
// Typed lookups
// ---------------------------------------------------------------------------

pub fn select_by_id(document: &Document, id: &str) -> Option<HtmlSelectElement> {
    document.get_element_by_id(id).and_then(|e| e.dyn_into().ok())
}

pub fn input_by_id(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document.get_element_by_id(id).and_then(|e| e.dyn_into().ok())
}

pub fn button_by_id(document: &Document, id: &str) -> Option<HtmlButtonElement> {
    document.get_element_by_id(id).and_then(|e| e.dyn_into().ok())
}

/// `value` of an `<input>` or `<textarea>`, empty when missing.
pub fn field_value(document: &Document, id: &str) -> String {
    let Some(el) = document.get_element_by_id(id) else {
        return String::new();
    };
    if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = el.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        area.value()
    } else {
        String::new()
    }
}

pub fn set_field_value(document: &Document, id: &str, value: &str) {
    if let Some(input) = input_by_id(document, id) {
        input.set_value(value);
    }
}

/// Enable/disable any form control (select, button, input).
pub fn set_disabled(el: &Element, disabled: bool) {
    if disabled {
        let _ = el.set_attribute("disabled", "disabled");
    } else {
        let _ = el.remove_attribute("disabled");
    }
}

// ---------------------------------------------------------------------------
// <select> helpers
// ---------------------------------------------------------------------------

pub fn selected_option(select: &HtmlSelectElement) -> Option<HtmlOptionElement> {
    let index = select.selected_index();
    if index < 0 {
        return None;
    }
    select
        .options()
        .item(index as u32)
        .and_then(|el| el.dyn_into::<HtmlOptionElement>().ok())
}

/// Visible text of the selected option, trimmed; empty when nothing is
/// selected.
pub fn selected_text(select: &HtmlSelectElement) -> String {
    selected_option(select)
        .map(|opt| opt.text().trim().to_string())
        .unwrap_or_default()
}

pub fn create_option(document: &Document, option: &ChoiceOption) -> Result<HtmlOptionElement, JsValue> {
    let el: HtmlOptionElement = document.create_element("option")?.dyn_into()?;
    el.set_value(&option.id);
    el.set_text_content(Some(&option.label));
    el.set_disabled(option.disabled);
    Ok(el)
}

/// Replace every option of `select` with `options`; the first entry ends
/// up selected.
pub fn replace_options(select: &HtmlSelectElement, options: &[ChoiceOption]) -> Result<(), JsValue> {
    let document = select
        .owner_document()
        .ok_or_else(|| JsValue::from_str("select is not attached to a document"))?;
    select.set_inner_html("");
    for option in options {
        let el = create_option(&document, option)?;
        select.append_child(&el)?;
    }
    select.set_selected_index(if options.is_empty() { -1 } else { 0 });
    Ok(())
}

/// Fire a bubbling `change` event so listeners re-run as if the user had
/// picked the value.
pub fn dispatch_change(target: &Element) -> Result<(), JsValue> {
    let init = EventInit::new();
    init.set_bubbles(true);
    let event = Event::new_with_event_init_dict("change", &init)?;
    target.dispatch_event(&event)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Window helpers
// ---------------------------------------------------------------------------

/// Blocking browser alert; used for validation and failure messages.
pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// Blocking confirmation; `false` when the window is unavailable.
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn open_in_new_tab(url: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.open_with_url_and_target(url, "_blank");
    }
}

pub fn reload_page() {
    if let Some(window) = web_sys::window() {
        let _ = window.location().reload();
    }
}

/// Register `handler` for `event` on `target` for the lifetime of the page.
pub fn on<F>(target: &web_sys::EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let cb = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn new_select(document: &Document) -> HtmlSelectElement {
        document.create_element("select").unwrap().dyn_into().unwrap()
    }

    #[wasm_bindgen_test]
    fn replace_options_rebuilds_list() {
        let document = document().unwrap();
        let select = new_select(&document);
        replace_options(&select, &[ChoiceOption::new("1", "a"), ChoiceOption::new("2", "b")]).unwrap();
        replace_options(&select, &[ChoiceOption::disabled("", "ph"), ChoiceOption::new("9", "z")]).unwrap();

        assert_eq!(select.options().length(), 2);
        let first = selected_option(&select).unwrap();
        assert!(first.disabled());
        assert_eq!(first.value(), "");
    }

    #[wasm_bindgen_test]
    fn show_hide_toggle_d_none() {
        let document = document().unwrap();
        let div = document.create_element("div").unwrap();
        hide(&div);
        assert!(div.class_list().contains("d-none"));
        show(&div);
        assert!(!div.class_list().contains("d-none"));
    }

    #[wasm_bindgen_test]
    fn set_disabled_round_trip() {
        let document = document().unwrap();
        let select = new_select(&document);
        set_disabled(&select, true);
        assert!(select.disabled());
        set_disabled(&select, false);
        assert!(!select.disabled());
    }
}
