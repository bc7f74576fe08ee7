//! DOM controller for one cascading dropdown pair.
//!
//! Wires the parent `<select>`'s `change` event into the cascade reducer and
//! executes the returned commands: renders the child options, toggles the
//! child control and its "add" button, and runs the child lookup through a
//! pluggable resolver so tests can answer without a server.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlOptionElement, HtmlSelectElement};

use crate::dom_utils;
use crate::error::ActionError;
use crate::models::{ChoiceOption, NamedEntity};
use crate::network::ApiClient;
use crate::reducers::cascade::{Cascade, CascadeCommand, CascadeKind, CascadeMsg};

pub type ChildFuture = Pin<Box<dyn Future<Output = Result<Vec<NamedEntity>, ActionError>>>>;

/// `parent id → children` lookup.
pub type ChildResolver = Rc<dyn Fn(String) -> ChildFuture>;

/// Resolver backed by `GET /api/sections/{id}` or `/api/subcategories/{id}`.
pub fn api_resolver(kind: CascadeKind) -> ChildResolver {
    match kind {
        CascadeKind::Section => Rc::new(|id: String| -> ChildFuture {
            Box::pin(async move { ApiClient::get_sections(&id).await })
        }),
        CascadeKind::Subcategory => Rc::new(|id: String| -> ChildFuture {
            Box::pin(async move { ApiClient::get_subcategories(&id).await })
        }),
    }
}

/// Element ids of one pair on a page.
#[derive(Debug, Clone, Copy)]
pub struct CascadeIds {
    pub parent: &'static str,
    pub child: &'static str,
    pub add_button: Option<&'static str>,
}

struct Inner {
    cascade: RefCell<Cascade>,
    parent: HtmlSelectElement,
    child: HtmlSelectElement,
    add_button: Option<Element>,
    resolver: ChildResolver,
}

/// Cheap-to-clone handle; clones share the same state.
#[derive(Clone)]
pub struct CascadingSelect {
    inner: Rc<Inner>,
}

impl CascadingSelect {
    /// Look the pair up by id and bind it.  `Ok(None)` when either select
    /// is missing from this page.
    pub fn mount(
        document: &Document,
        ids: CascadeIds,
        cascade: Cascade,
        resolver: ChildResolver,
    ) -> Result<Option<Self>, JsValue> {
        let (Some(parent), Some(child)) = (
            dom_utils::select_by_id(document, ids.parent),
            dom_utils::select_by_id(document, ids.child),
        ) else {
            return Ok(None);
        };
        let add_button = ids.add_button.and_then(|id| document.get_element_by_id(id));
        Self::attach(parent, child, add_button, cascade, resolver).map(Some)
    }

    pub fn attach(
        parent: HtmlSelectElement,
        child: HtmlSelectElement,
        add_button: Option<Element>,
        mut cascade: Cascade,
        resolver: ChildResolver,
    ) -> Result<Self, JsValue> {
        cascade.adopt(&parent.value(), existing_options(&child));

        let this = Self {
            inner: Rc::new(Inner { cascade: RefCell::new(cascade), parent, child, add_button, resolver }),
        };

        let handle = this.clone();
        dom_utils::on(&this.inner.parent, "change", move |_| {
            let value = handle.inner.parent.value();
            handle.dispatch(CascadeMsg::ParentChanged(value));
        })?;

        Ok(this)
    }

    /// Feed a message to the reducer and run the resulting commands.
    pub fn dispatch(&self, msg: CascadeMsg) {
        // The borrow ends before any command runs; a command may dispatch again.
        let commands = self.inner.cascade.borrow_mut().update(msg);
        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&self, command: CascadeCommand) {
        match command {
            CascadeCommand::Render => {
                if let Err(e) = self.render() {
                    web_sys::console::warn_1(&e);
                }
            }
            CascadeCommand::Select(id) => self.inner.child.set_value(&id),
            CascadeCommand::Log(line) => console_error!("{}", line),
            CascadeCommand::Fetch { parent_id, seq } => {
                let handle = self.clone();
                let lookup = (self.inner.resolver)(parent_id);
                spawn_local(async move {
                    let msg = match lookup.await {
                        Ok(items) => CascadeMsg::Loaded { seq, items },
                        Err(error) => CascadeMsg::Failed { seq, error },
                    };
                    handle.dispatch(msg);
                });
            }
        }
    }

    fn render(&self) -> Result<(), JsValue> {
        let cascade = self.inner.cascade.borrow();
        let enabled = cascade.child_enabled();

        // Disable first so the user never picks from a half-built list.
        dom_utils::set_disabled(&self.inner.child, true);
        dom_utils::replace_options(&self.inner.child, &cascade.rendered_options())?;
        dom_utils::set_disabled(&self.inner.child, !enabled);

        if let Some(button) = &self.inner.add_button {
            dom_utils::set_disabled(button, !cascade.add_enabled());
        }
        Ok(())
    }
}

fn existing_options(select: &HtmlSelectElement) -> Vec<ChoiceOption> {
    let options = select.options();
    (0..options.length())
        .filter_map(|i| options.item(i))
        .filter_map(|el| el.dyn_into::<HtmlOptionElement>().ok())
        .map(|opt| ChoiceOption {
            id: opt.value(),
            label: opt.text(),
            disabled: opt.disabled(),
        })
        .collect()
}
