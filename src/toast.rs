//! Tiny toast / notification helper.
//! Creates a `#toast-root` container once per page and appends toast divs that
//! remove themselves after a few seconds.  Used for success notices so the
//! user is not interrupted by a blocking alert after every quick-create.

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

const TOAST_LIFETIME_MS: u32 = 4_000;

pub fn success(message: &str) {
    let Some(document) = crate::dom_utils::document() else {
        return;
    };
    if let Err(e) = try_show(&document, message) {
        web_sys::console::warn_1(&e);
    }
}

fn try_show(document: &Document, message: &str) -> Result<(), JsValue> {
    ensure_styles(document)?;
    let root = ensure_root(document)?;

    let toast = document.create_element("div")?;
    toast.set_class_name("fx-toast toast-success");
    toast.set_attribute("role", "status")?;
    toast.set_text_content(Some(message));

    // Prepend so newest appears on top.
    root.prepend_with_node_1(&toast)?;

    Timeout::new(TOAST_LIFETIME_MS, move || toast.remove()).forget();
    Ok(())
}

fn ensure_root(document: &Document) -> Result<Element, JsValue> {
    if let Some(el) = document.get_element_by_id("toast-root") {
        return Ok(el);
    }
    let root = document.create_element("div")?;
    root.set_id("toast-root");
    root.set_class_name("fx-toast-root");
    document
        .body()
        .ok_or_else(|| JsValue::from_str("<body> missing"))?
        .append_child(&root)?;
    Ok(root)
}

fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.get_element_by_id("toast-styles").is_some() {
        return Ok(());
    }

    // Pages are RTL, so the stack sits in the top-left corner.
    let css = "
.fx-toast-root{position:fixed;top:16px;left:16px;display:flex;flex-direction:column;gap:8px;z-index:1090}
.fx-toast{padding:10px 16px;border-radius:4px;color:#fff;box-shadow:0 2px 4px rgba(0,0,0,.1);opacity:0;animation:fx-toast-in .2s forwards}
.toast-success{background:#198754}
@keyframes fx-toast-in{to{opacity:1}}
";

    let style = document.create_element("style")?;
    style.set_id("toast-styles");
    style.set_text_content(Some(css));
    match document.head() {
        Some(head) => head.append_child(&style)?,
        None => document
            .body()
            .ok_or_else(|| JsValue::from_str("<body> missing"))?
            .append_child(&style)?,
    };
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn toast_is_prepended_to_root() {
        let document = crate::dom_utils::document().unwrap();
        success("first");
        success("second");

        let root = document.get_element_by_id("toast-root").unwrap();
        let newest = root.first_element_child().unwrap();
        assert_eq!(newest.text_content().unwrap(), "second");
        assert!(newest.class_list().contains("toast-success"));
        assert!(document.get_element_by_id("toast-styles").is_some());
    }
}
