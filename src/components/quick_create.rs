//! Quick-create dialogs: add a department, section, category, subcategory
//! or beneficiary from its Bootstrap modal without leaving the ticket form.
//!
//! Every kind follows the same flow: validate the name locally, `POST` the
//! body, then write the created row back into the form (new option selected,
//! or the beneficiary fields filled), close the modal and clear its inputs.
//! Each dialog owns an in-flight flag so a second click while the request is
//! pending does nothing.

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde_json::{json, Map, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement};

use super::cascading_select::CascadingSelect;
use super::modal;
use crate::error::ActionError;
use crate::models::{ChoiceOption, NamedEntity};
use crate::network::ApiClient;
use crate::reducers::cascade::CascadeMsg;
use crate::{dom_utils, toast};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Department,
    Section,
    Category,
    Subcategory,
    Beneficiary,
}

/// Hidden input that carries the parent id into a section/subcategory modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentField {
    pub input_id: &'static str,
    pub body_key: &'static str,
    /// Element the modal-show handler fills with the hidden input and banner.
    pub container_id: &'static str,
    /// Select the parent id is copied from.
    pub source_select: &'static str,
    pub banner_label: &'static str,
    pub missing_message: &'static str,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Department,
        EntityKind::Section,
        EntityKind::Category,
        EntityKind::Subcategory,
        EntityKind::Beneficiary,
    ];

    pub fn endpoint(self) -> &'static str {
        match self {
            EntityKind::Department => "/api/departments/add",
            EntityKind::Section => "/api/sections/add",
            EntityKind::Category => "/api/categories/add",
            EntityKind::Subcategory => "/api/subcategories/add",
            EntityKind::Beneficiary => "/api/beneficiaries/add",
        }
    }

    /// Key of the created row in the success envelope.
    pub fn response_key(self) -> &'static str {
        match self {
            EntityKind::Department => "department",
            EntityKind::Section => "section",
            EntityKind::Category => "category",
            EntityKind::Subcategory => "subcategory",
            EntityKind::Beneficiary => "beneficiary",
        }
    }

    pub fn modal_id(self) -> &'static str {
        match self {
            EntityKind::Department => "addDepartmentModal",
            EntityKind::Section => "addSectionModal",
            EntityKind::Category => "addCategoryModal",
            EntityKind::Subcategory => "addSubcategoryModal",
            EntityKind::Beneficiary => "addQuickBeneficiaryModal",
        }
    }

    pub fn save_button_id(self) -> &'static str {
        match self {
            EntityKind::Department => "save_department",
            EntityKind::Section => "save_section",
            EntityKind::Category => "save_category",
            EntityKind::Subcategory => "save_subcategory",
            EntityKind::Beneficiary => "save_quick_beneficiary",
        }
    }

    pub fn name_input_id(self) -> &'static str {
        match self {
            EntityKind::Department => "new_department_name",
            EntityKind::Section => "new_section_name",
            EntityKind::Category => "new_category_name",
            EntityKind::Subcategory => "new_subcategory_name",
            EntityKind::Beneficiary => "quick_beneficiary_name",
        }
    }

    /// Extra optional text inputs sent along with the name.
    pub fn extra_inputs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntityKind::Beneficiary => &[("quick_beneficiary_phone", "phone")],
            _ => &[],
        }
    }

    pub fn parent_field(self) -> Option<ParentField> {
        match self {
            EntityKind::Section => Some(ParentField {
                input_id: "department_id_for_section",
                body_key: "department_id",
                container_id: "department_for_section_container",
                source_select: "department_id",
                banner_label: "الإدارة:",
                missing_message: "خطأ: لم يتم العثور على معرف الإدارة",
            }),
            EntityKind::Subcategory => Some(ParentField {
                input_id: "category_id_for_subcategory",
                body_key: "category_id",
                container_id: "category_for_subcategory_container",
                source_select: "category_id",
                banner_label: "التصنيف:",
                missing_message: "خطأ: لم يتم العثور على معرف التصنيف",
            }),
            _ => None,
        }
    }

    pub fn missing_name_message(self) -> &'static str {
        match self {
            EntityKind::Department => "يرجى إدخال اسم الإدارة",
            EntityKind::Section => "يرجى إدخال اسم القسم",
            EntityKind::Category => "يرجى إدخال اسم التصنيف",
            EntityKind::Subcategory => "يرجى إدخال اسم التصنيف الفرعي",
            EntityKind::Beneficiary => "يرجى إدخال اسم المستفيد",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            EntityKind::Department => "تم إضافة الإدارة بنجاح",
            EntityKind::Section => "تم إضافة القسم بنجاح",
            EntityKind::Category => "تم إضافة التصنيف بنجاح",
            EntityKind::Subcategory => "تم إضافة التصنيف الفرعي بنجاح",
            EntityKind::Beneficiary => "تم إضافة المستفيد بنجاح",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            EntityKind::Department => "حدث خطأ أثناء إضافة الإدارة",
            EntityKind::Section => "حدث خطأ أثناء إضافة القسم",
            EntityKind::Category => "حدث خطأ أثناء إضافة التصنيف",
            EntityKind::Subcategory => "حدث خطأ أثناء إضافة التصنيف الفرعي",
            EntityKind::Beneficiary => "حدث خطأ أثناء إضافة المستفيد",
        }
    }
}

/// Build the `POST` body.  `parent_id` is required exactly when the kind
/// has a parent field; `extras` are `(body key, value)` pairs.
pub fn build_request(
    kind: EntityKind,
    name: &str,
    parent_id: Option<&str>,
    extras: &[(&str, String)],
) -> Result<Value, ActionError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ActionError::Validation(kind.missing_name_message().to_string()));
    }

    let mut body = Map::new();
    if let Some(parent) = kind.parent_field() {
        let id = parent_id.map(str::trim).filter(|id| !id.is_empty());
        let Some(id) = id else {
            return Err(ActionError::Validation(parent.missing_message.to_string()));
        };
        body.insert(parent.body_key.to_string(), id_value(id));
    }
    body.insert("name".to_string(), json!(name));
    for (key, value) in extras {
        body.insert((*key).to_string(), json!(value.trim()));
    }
    Ok(Value::Object(body))
}

/// Numeric ids go out as numbers, anything else as the raw string.
fn id_value(id: &str) -> Value {
    id.parse::<i64>().map(Value::from).unwrap_or_else(|_| Value::from(id))
}

pub type CreateFuture = Pin<Box<dyn Future<Output = Result<NamedEntity, ActionError>>>>;

/// Sends a validated body and yields the created row.
pub type CreateTransport = Rc<dyn Fn(EntityKind, Value) -> CreateFuture>;

pub fn api_transport() -> CreateTransport {
    Rc::new(|kind: EntityKind, body: Value| -> CreateFuture {
        Box::pin(async move {
            ApiClient::create_lookup(kind.endpoint(), &body, kind.response_key()).await
        })
    })
}

/// Where a created row lands in the form.
#[derive(Clone)]
pub enum CreateTarget {
    /// Top-level lookup select: append, select, then fire `change` so any
    /// dependent cascade reloads.
    Select(HtmlSelectElement),
    /// Child of a cascading pair.
    Cascade(CascadingSelect),
    /// Beneficiary text field plus its hidden id.
    Beneficiary { name: HtmlInputElement, id: HtmlInputElement },
}

impl CreateTarget {
    fn apply(&self, document: &Document, created: &NamedEntity) -> Result<(), JsValue> {
        match self {
            CreateTarget::Select(select) => {
                let option = ChoiceOption::new(created.id.clone(), created.name.clone());
                let el = dom_utils::create_option(document, &option)?;
                select.append_child(&el)?;
                select.set_value(&created.id);
                dom_utils::dispatch_change(select)?;
            }
            CreateTarget::Cascade(cascade) => {
                cascade.dispatch(CascadeMsg::Created(created.clone()));
            }
            CreateTarget::Beneficiary { name, id } => {
                name.set_value(&created.name);
                id.set_value(&created.id);
            }
        }
        Ok(())
    }
}

struct Inner {
    kind: EntityKind,
    document: Document,
    save_button: Element,
    target: CreateTarget,
    transport: CreateTransport,
    in_flight: Cell<bool>,
}

/// One wired quick-create dialog.
#[derive(Clone)]
pub struct QuickCreate {
    inner: Rc<Inner>,
}

impl QuickCreate {
    /// Wire the save button of `kind`'s modal.  `Ok(None)` when the button
    /// is not on this page.
    pub fn mount(
        document: &Document,
        kind: EntityKind,
        target: CreateTarget,
        transport: CreateTransport,
    ) -> Result<Option<Self>, JsValue> {
        let Some(save_button) = document.get_element_by_id(kind.save_button_id()) else {
            return Ok(None);
        };

        let this = Self {
            inner: Rc::new(Inner {
                kind,
                document: document.clone(),
                save_button,
                target,
                transport,
                in_flight: Cell::new(false),
            }),
        };

        let handle = this.clone();
        dom_utils::on(&this.inner.save_button, "click", move |_| handle.submit())?;

        if let Some(parent) = kind.parent_field() {
            let doc = document.clone();
            modal::on_show(document, kind.modal_id(), move |_| {
                if let Err(e) = fill_parent_context(&doc, &parent) {
                    web_sys::console::warn_1(&e);
                }
            })?;
        }

        Ok(Some(this))
    }

    pub fn is_in_flight(&self) -> bool {
        self.inner.in_flight.get()
    }

    /// Save-button handler.
    pub fn submit(&self) {
        let inner = &self.inner;
        if inner.in_flight.get() {
            return;
        }
        let kind = inner.kind;
        let document = &inner.document;

        let parent_id = match kind.parent_field() {
            Some(parent) => match dom_utils::input_by_id(document, parent.input_id) {
                Some(input) => Some(input.value()),
                None => {
                    dom_utils::alert(parent.missing_message);
                    return;
                }
            },
            None => None,
        };

        let name = dom_utils::field_value(document, kind.name_input_id());
        let extras: Vec<(&str, String)> = kind
            .extra_inputs()
            .iter()
            .map(|(id, key)| (*key, dom_utils::field_value(document, id)))
            .collect();

        let body = match build_request(kind, &name, parent_id.as_deref(), &extras) {
            Ok(body) => body,
            Err(err) => {
                modal::show_inline_alert(document, kind.modal_id(), &err.user_message(""));
                return;
            }
        };

        inner.in_flight.set(true);
        dom_utils::set_disabled(&inner.save_button, true);

        let handle = self.clone();
        let request = (inner.transport)(kind, body);
        spawn_local(async move {
            let result = request.await;
            handle.settle(result);
        });
    }

    fn settle(&self, result: Result<NamedEntity, ActionError>) {
        let inner = &self.inner;
        inner.in_flight.set(false);
        dom_utils::set_disabled(&inner.save_button, false);

        let kind = inner.kind;
        match result {
            Ok(created) => {
                if let Err(e) = inner.target.apply(&inner.document, &created) {
                    web_sys::console::warn_1(&e);
                }
                modal::hide(&inner.document, kind.modal_id());
                dom_utils::set_field_value(&inner.document, kind.name_input_id(), "");
                for (id, _) in kind.extra_inputs() {
                    dom_utils::set_field_value(&inner.document, id, "");
                }
                toast::success(kind.success_message());
            }
            Err(err) => {
                console_error!("{} failed: {}", kind.endpoint(), err);
                let message = err.user_message(kind.failure_message());
                modal::show_inline_alert(&inner.document, kind.modal_id(), &message);
            }
        }
    }
}

/// Copy the parent select's current id into the modal's hidden field and
/// show which parent the new row will belong to.
fn fill_parent_context(document: &Document, parent: &ParentField) -> Result<(), JsValue> {
    let (Some(select), Some(container)) = (
        dom_utils::select_by_id(document, parent.source_select),
        document.get_element_by_id(parent.container_id),
    ) else {
        return Ok(());
    };

    container.set_inner_html("");

    let hidden = document.create_element("input")?;
    hidden.set_attribute("type", "hidden")?;
    hidden.set_id(parent.input_id);
    hidden.set_attribute("value", &select.value())?;
    container.append_child(&hidden)?;

    let banner = document.create_element("div")?;
    banner.set_class_name("alert alert-info");
    let label = document.create_element("strong")?;
    label.set_text_content(Some(parent.banner_label));
    banner.append_child(&label)?;
    let name = document.create_text_node(&format!(" {}", dom_utils::selected_text(&select)));
    banner.append_child(&name)?;
    container.append_child(&banner)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn empty_name_is_rejected_locally() {
        for kind in EntityKind::ALL {
            let err = build_request(kind, "   ", Some("3"), &[]).unwrap_err();
            assert_eq!(err, ActionError::Validation(kind.missing_name_message().to_string()));
        }
    }

    #[wasm_bindgen_test]
    fn section_body_carries_numeric_department_id() {
        let body = build_request(EntityKind::Section, " صيانة ", Some("7"), &[]).unwrap();
        assert_eq!(body, json!({ "department_id": 7, "name": "صيانة" }));
    }

    #[wasm_bindgen_test]
    fn child_kinds_need_a_parent() {
        let err = build_request(EntityKind::Subcategory, "طابعات", Some(""), &[]).unwrap_err();
        assert!(matches!(err, ActionError::Validation(m) if m.contains("التصنيف")));
        assert!(build_request(EntityKind::Category, "طابعات", None, &[]).is_ok());
    }

    #[wasm_bindgen_test]
    fn beneficiary_body_includes_phone() {
        let extras = [("phone", "0501234567".to_string())];
        let body = build_request(EntityKind::Beneficiary, "أحمد", None, &extras).unwrap();
        assert_eq!(body, json!({ "name": "أحمد", "phone": "0501234567" }));
    }

    #[wasm_bindgen_test]
    fn endpoints_and_keys_line_up() {
        for kind in EntityKind::ALL {
            assert!(kind.endpoint().starts_with("/api/"));
            assert!(kind.endpoint().ends_with("/add"));
            assert!(kind.modal_id().starts_with("add"));
        }
    }
}
