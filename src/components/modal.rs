//! Shared helper for the Bootstrap modals used by the quick-create and
//! delete-attachment dialogs.
//!
//! The templates own the modal markup and Bootstrap's JS owns show/hide;
//! this module only hooks the `show.bs.modal` event, closes a modal through
//! `bootstrap.Modal.getInstance(el).hide()`, and renders an inline alert
//! inside the modal body.

use js_sys::{Function, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event};

use crate::dom_utils;

const INLINE_ALERT_CLASS: &str = "modal-inline-alert";

/// Run `handler` every time Bootstrap is about to show modal `id`.
/// No-op when the modal is not on the page.
pub fn on_show<F>(document: &Document, id: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    match document.get_element_by_id(id) {
        Some(modal) => dom_utils::on(&modal, "show.bs.modal", handler),
        None => Ok(()),
    }
}

/// The element that opened the modal (`event.relatedTarget` on Bootstrap's
/// show event).
pub fn related_target(event: &Event) -> Option<Element> {
    Reflect::get(event, &JsValue::from_str("relatedTarget"))
        .ok()
        .and_then(|v| v.dyn_into::<Element>().ok())
}

/// Close modal `id`.  Goes through Bootstrap when it is loaded so the
/// backdrop and body classes are cleaned up; otherwise strips the `show`
/// state by hand.
pub fn hide(document: &Document, id: &str) {
    let Some(modal) = document.get_element_by_id(id) else {
        return;
    };
    clear_inline_alert(&modal);
    if hide_via_bootstrap(&modal).is_err() {
        let _ = modal.class_list().remove_1("show");
        dom_utils::set_display(&modal, false);
        let _ = modal.set_attribute("aria-hidden", "true");
        if let Ok(Some(backdrop)) = document.query_selector(".modal-backdrop") {
            backdrop.remove();
        }
    }
}

fn hide_via_bootstrap(modal: &Element) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let bootstrap = Reflect::get(&window, &JsValue::from_str("bootstrap"))?;
    let modal_class = Reflect::get(&bootstrap, &JsValue::from_str("Modal"))?;
    let get_instance: Function = Reflect::get(&modal_class, &JsValue::from_str("getOrCreateInstance"))?
        .dyn_into()?;
    let instance = get_instance.call1(&modal_class, modal)?;
    let hide_fn: Function = Reflect::get(&instance, &JsValue::from_str("hide"))?.dyn_into()?;
    hide_fn.call0(&instance)?;
    Ok(())
}

/// Show `message` as a dismissable danger alert at the top of the modal
/// body, replacing any previous one.  Falls back to a browser alert when the
/// modal has no body.
pub fn show_inline_alert(document: &Document, modal_id: &str, message: &str) {
    let body = document
        .get_element_by_id(modal_id)
        .and_then(|m| m.query_selector(".modal-body").ok().flatten());
    let Some(body) = body else {
        dom_utils::alert(message);
        return;
    };

    let existing = body
        .query_selector(&format!(".{}", INLINE_ALERT_CLASS))
        .ok()
        .flatten();
    let alert = match existing {
        Some(el) => el,
        None => match document.create_element("div") {
            Ok(el) => {
                el.set_class_name(&format!("alert alert-danger {}", INLINE_ALERT_CLASS));
                let _ = el.set_attribute("role", "alert");
                let _ = body.prepend_with_node_1(&el);
                el
            }
            Err(_) => {
                dom_utils::alert(message);
                return;
            }
        },
    };
    alert.set_text_content(Some(message));
}

fn clear_inline_alert(modal: &Element) {
    if let Ok(Some(el)) = modal.query_selector(&format!(".{}", INLINE_ALERT_CLASS)) {
        el.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn mount_modal(document: &Document, id: &str) -> Element {
        let modal = document.create_element("div").unwrap();
        modal.set_id(id);
        modal.set_class_name("modal show");
        modal.set_inner_html("<div class='modal-body'><input id='x'></div>");
        document.body().unwrap().append_child(&modal).unwrap();
        modal
    }

    #[wasm_bindgen_test]
    fn inline_alert_is_reused() {
        let document = dom_utils::document().unwrap();
        let modal = mount_modal(&document, "test-inline-alert-modal");

        show_inline_alert(&document, "test-inline-alert-modal", "first");
        show_inline_alert(&document, "test-inline-alert-modal", "second");

        let alerts = modal.query_selector_all(".modal-inline-alert").unwrap();
        assert_eq!(alerts.length(), 1);
        assert_eq!(alerts.item(0).unwrap().text_content().unwrap(), "second");
        modal.remove();
    }

    #[wasm_bindgen_test]
    fn hide_without_bootstrap_falls_back() {
        let document = dom_utils::document().unwrap();
        let modal = mount_modal(&document, "test-hide-modal");
        show_inline_alert(&document, "test-hide-modal", "oops");

        hide(&document, "test-hide-modal");

        assert!(!modal.class_list().contains("show"));
        assert!(modal.query_selector(".modal-inline-alert").unwrap().is_none());
        modal.remove();
    }
}
