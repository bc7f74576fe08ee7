//! Beneficiary autocomplete on the create-ticket form.
//!
//! Typing at least two characters queries `/api/beneficiaries/search` and
//! lists the matches under the input; picking one fills the hidden
//! `beneficiary_id`.  Emptying the text clears the hidden id.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement};

use crate::constants::AUTOCOMPLETE_MIN_CHARS;
use crate::dom_utils;
use crate::error::ActionError;
use crate::models::BeneficiaryMatch;
use crate::network::ApiClient;

const SUGGESTIONS_CLASS: &str = "list-group position-absolute w-100 beneficiary-suggestions";
const LOADING_CLASS: &str = "loading";

pub type SearchFuture = Pin<Box<dyn Future<Output = Result<Vec<BeneficiaryMatch>, ActionError>>>>;
pub type SearchFn = Rc<dyn Fn(String) -> SearchFuture>;

pub fn api_search() -> SearchFn {
    Rc::new(|term: String| -> SearchFuture {
        Box::pin(async move { ApiClient::search_beneficiaries(&term).await })
    })
}

/// Whether `term` is long enough to hit the server.
pub fn should_search(term: &str) -> bool {
    term.trim().chars().count() >= AUTOCOMPLETE_MIN_CHARS
}

struct Inner {
    name: HtmlInputElement,
    id: HtmlInputElement,
    list: Element,
    search: SearchFn,
    /// Last issued query; replies to older ones are ignored.
    seq: Cell<u64>,
}

#[derive(Clone)]
pub struct BeneficiarySearch {
    inner: Rc<Inner>,
}

impl BeneficiarySearch {
    /// Bind `#beneficiary_name` and `#beneficiary_id`.  `Ok(None)` when the
    /// form has no beneficiary field.
    pub fn mount(document: &Document, search: SearchFn) -> Result<Option<Self>, JsValue> {
        let (Some(name), Some(id)) = (
            dom_utils::input_by_id(document, "beneficiary_name"),
            dom_utils::input_by_id(document, "beneficiary_id"),
        ) else {
            return Ok(None);
        };
        Self::attach(document, name, id, search).map(Some)
    }

    pub fn attach(
        document: &Document,
        name: HtmlInputElement,
        id: HtmlInputElement,
        search: SearchFn,
    ) -> Result<Self, JsValue> {
        let list = document.create_element("div")?;
        list.set_class_name(SUGGESTIONS_CLASS);
        name.after_with_node_1(&list)?;

        let this = Self {
            inner: Rc::new(Inner { name, id, list, search, seq: Cell::new(0) }),
        };

        let handle = this.clone();
        dom_utils::on(&this.inner.name, "input", move |_| handle.on_input())?;

        let handle = this.clone();
        dom_utils::on(&this.inner.name, "blur", move |_| {
            // Let a pending click on a suggestion land first.
            let handle = handle.clone();
            gloo_timers::callback::Timeout::new(150, move || handle.clear_suggestions()).forget();
        })?;

        Ok(this)
    }

    fn on_input(&self) {
        let term = self.inner.name.value();
        if term.is_empty() {
            self.inner.id.set_value("");
        }
        let seq = self.inner.seq.get() + 1;
        self.inner.seq.set(seq);

        if !should_search(&term) {
            // A reply still in flight is stale now and never clears this.
            let _ = self.inner.name.class_list().remove_1(LOADING_CLASS);
            self.clear_suggestions();
            return;
        }

        let _ = self.inner.name.class_list().add_1(LOADING_CLASS);
        let handle = self.clone();
        let lookup = (self.inner.search)(term.trim().to_string());
        spawn_local(async move {
            let result = lookup.await;
            if handle.inner.seq.get() != seq {
                return;
            }
            let _ = handle.inner.name.class_list().remove_1(LOADING_CLASS);
            let matches = match result {
                Ok(matches) => matches,
                Err(err) => {
                    console_error!("beneficiary search failed: {}", err);
                    Vec::new()
                }
            };
            if let Err(e) = handle.render(&matches) {
                web_sys::console::warn_1(&e);
            }
        });
    }

    fn render(&self, matches: &[BeneficiaryMatch]) -> Result<(), JsValue> {
        self.clear_suggestions();
        let document = self
            .inner
            .list
            .owner_document()
            .ok_or_else(|| JsValue::from_str("suggestion list is detached"))?;

        for item in matches {
            let row = document.create_element("button")?;
            row.set_attribute("type", "button")?;
            row.set_class_name("list-group-item list-group-item-action");
            row.set_text_content(Some(&item.label));

            let handle = self.clone();
            let picked = item.clone();
            dom_utils::on(&row, "mousedown", move |event| {
                event.prevent_default();
                handle.pick(&picked);
            })?;
            self.inner.list.append_child(&row)?;
        }
        Ok(())
    }

    /// Apply a chosen match to the form.
    pub fn pick(&self, item: &BeneficiaryMatch) {
        debug_log!("beneficiary picked: {}", item.id);
        self.inner.name.set_value(item.display_name());
        self.inner.id.set_value(&item.id);
        self.clear_suggestions();
    }

    fn clear_suggestions(&self) {
        self.inner.list.set_inner_html("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::Event;

    wasm_bindgen_test_configure!(run_in_browser);

    fn input(document: &Document) -> HtmlInputElement {
        let el: HtmlInputElement = document.create_element("input").unwrap().dyn_into().unwrap();
        document.body().unwrap().append_child(&el).unwrap();
        el
    }

    /// Two matches for any term; terms starting with "slow" answer late.
    fn scripted_search() -> SearchFn {
        Rc::new(|term: String| -> SearchFuture {
            Box::pin(async move {
                TimeoutFuture::new(if term.starts_with("slow") { 60 } else { 0 }).await;
                Ok(vec![
                    BeneficiaryMatch { id: "5".into(), label: "أحمد - 0551".into(), value: Some("أحمد".into()) },
                    BeneficiaryMatch { id: "6".into(), label: "أحلام".into(), value: None },
                ])
            })
        })
    }

    fn type_text(name: &HtmlInputElement, text: &str) {
        name.set_value(text);
        name.dispatch_event(&Event::new("input").unwrap()).unwrap();
    }

    #[wasm_bindgen_test]
    async fn pick_fills_id_and_clearing_text_empties_it() {
        let document = dom_utils::document().unwrap();
        let (name, id) = (input(&document), input(&document));
        BeneficiarySearch::attach(&document, name.clone(), id.clone(), scripted_search()).unwrap();

        type_text(&name, "أح");
        TimeoutFuture::new(20).await;
        let list = name.next_element_sibling().unwrap();
        let rows = list.query_selector_all("button").unwrap();
        assert_eq!(rows.length(), 2);

        rows.item(0).unwrap().dispatch_event(&Event::new("mousedown").unwrap()).unwrap();
        assert_eq!(id.value(), "5");
        assert_eq!(name.value(), "أحمد");
        assert_eq!(list.child_element_count(), 0);

        type_text(&name, "");
        assert_eq!(id.value(), "");
    }

    #[wasm_bindgen_test]
    async fn shortening_the_term_drops_the_spinner() {
        let document = dom_utils::document().unwrap();
        let (name, id) = (input(&document), input(&document));
        BeneficiarySearch::attach(&document, name.clone(), id, scripted_search()).unwrap();

        type_text(&name, "slow");
        assert!(name.class_list().contains(LOADING_CLASS));
        type_text(&name, "s");
        assert!(!name.class_list().contains(LOADING_CLASS));

        TimeoutFuture::new(100).await;
        assert!(!name.class_list().contains(LOADING_CLASS));
        let list = name.next_element_sibling().unwrap();
        assert_eq!(list.child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn two_characters_trigger_a_search() {
        assert!(!should_search(""));
        assert!(!should_search(" أ "));
        assert!(should_search("أح"));
        assert!(should_search("ab"));
    }
}
