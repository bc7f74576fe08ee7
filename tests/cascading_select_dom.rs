//! DOM tests for the department → section cascade with a scripted resolver.

use std::rc::Rc;

use fixltpro_frontend::components::cascading_select::{ChildFuture, ChildResolver};
use fixltpro_frontend::components::CascadingSelect;
use fixltpro_frontend::dom_utils;
use fixltpro_frontend::error::ActionError;
use fixltpro_frontend::models::{ChoiceOption, NamedEntity};
use fixltpro_frontend::reducers::cascade::{Cascade, CascadeKind, CascadeMsg};
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{Document, HtmlOptionElement, HtmlSelectElement};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    dom_utils::document().expect("document")
}

fn select(document: &Document, options: &[ChoiceOption]) -> HtmlSelectElement {
    let el: HtmlSelectElement = document.create_element("select").unwrap().dyn_into().unwrap();
    dom_utils::replace_options(&el, options).unwrap();
    document.body().unwrap().append_child(&el).unwrap();
    el
}

fn option_at(select: &HtmlSelectElement, index: u32) -> HtmlOptionElement {
    select.options().item(index).unwrap().dyn_into().unwrap()
}

/// Answers every parent with `count` rows; "slow" replies late and "fail" errors.
fn scripted_resolver(count: usize) -> ChildResolver {
    Rc::new(move |parent_id: String| -> ChildFuture {
        Box::pin(async move {
            let delay = if parent_id == "slow" { 60 } else { 0 };
            TimeoutFuture::new(delay).await;
            if parent_id == "fail" {
                return Err(ActionError::Network("offline".into()));
            }
            Ok((1..=count)
                .map(|i| NamedEntity { id: format!("{}-{}", parent_id, i), name: format!("قسم {}", i) })
                .collect())
        })
    })
}

fn pair(prepend_none: bool, count: usize) -> (CascadingSelect, HtmlSelectElement, HtmlSelectElement) {
    let document = document();
    let parent = select(
        &document,
        &[
            ChoiceOption::new("", "--"),
            ChoiceOption::new("7", "IT"),
            ChoiceOption::new("slow", "Slow"),
            ChoiceOption::new("fast", "Fast"),
            ChoiceOption::new("fail", "Broken"),
        ],
    );
    let child = select(&document, &[ChoiceOption::disabled("", "-- اختر القسم --")]);
    child.set_disabled(true);
    let cascade = CascadingSelect::attach(
        parent.clone(),
        child.clone(),
        None,
        Cascade::new(CascadeKind::Section, prepend_none),
        scripted_resolver(count),
    )
    .unwrap();
    (cascade, parent, child)
}

async fn choose(parent: &HtmlSelectElement, value: &str) {
    parent.set_value(value);
    dom_utils::dispatch_change(parent).unwrap();
}

async fn settle(ms: u32) {
    TimeoutFuture::new(ms).await;
}

#[wasm_bindgen_test]
async fn populates_n_sections_behind_a_disabled_placeholder() {
    let (_cascade, parent, child) = pair(false, 3);
    choose(&parent, "7").await;
    settle(10).await;

    assert!(!child.disabled());
    assert_eq!(child.options().length(), 4);
    assert!(option_at(&child, 0).disabled());
    assert_eq!(option_at(&child, 1).value(), "7-1");
}

#[wasm_bindgen_test]
async fn none_variant_adds_one_sentinel() {
    let (_cascade, parent, child) = pair(true, 3);
    choose(&parent, "7").await;
    settle(10).await;

    assert_eq!(child.options().length(), 5);
    assert_eq!(option_at(&child, 1).value(), "0");
}

#[wasm_bindgen_test]
async fn clearing_parent_resets_child() {
    let (_cascade, parent, child) = pair(false, 2);
    choose(&parent, "7").await;
    settle(10).await;
    choose(&parent, "").await;

    assert!(child.disabled());
    assert_eq!(child.options().length(), 1);
}

#[wasm_bindgen_test]
async fn slow_stale_reply_never_overwrites_newer_list() {
    let (_cascade, parent, child) = pair(false, 2);
    choose(&parent, "slow").await;
    choose(&parent, "fast").await;
    settle(120).await;

    assert_eq!(child.options().length(), 3);
    assert_eq!(option_at(&child, 1).value(), "fast-1");
}

#[wasm_bindgen_test]
async fn failed_lookup_shows_error_entry() {
    let (_cascade, parent, child) = pair(false, 2);
    choose(&parent, "fail").await;
    settle(10).await;

    assert_eq!(child.options().length(), 1);
    assert!(option_at(&child, 0).disabled());
    assert!(!child.disabled());
}

#[wasm_bindgen_test]
async fn created_row_is_appended_and_selected() {
    let (cascade, parent, child) = pair(false, 2);
    choose(&parent, "7").await;
    settle(10).await;

    cascade.dispatch(CascadeMsg::Created(NamedEntity { id: "99".into(), name: "جديد".into() }));
    assert_eq!(child.options().length(), 4);
    assert_eq!(child.value(), "99");
}
