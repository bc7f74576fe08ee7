// src/pages/create_ticket.rs
//
// Create-ticket form: both cascading pairs, attachment preview, beneficiary
// autocomplete, the WhatsApp button, contact-method cards, custom priority
// and the five quick-create dialogs.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::components::attachment_preview::AttachmentPreview;
use crate::components::beneficiary_search::{api_search, BeneficiarySearch};
use crate::components::cascading_select::api_resolver;
use crate::components::quick_create::api_transport;
use crate::components::{whatsapp, CascadeIds, CascadingSelect, CreateTarget, EntityKind, QuickCreate};
use crate::constants::CUSTOM_PRIORITY_VALUE;
use crate::dom_utils;
use crate::network::current_config;
use crate::reducers::cascade::{Cascade, CascadeKind};
use crate::utils::SizeFormat;

const SECTION_IDS: CascadeIds = CascadeIds {
    parent: "department_id",
    child: "section_id",
    add_button: Some("addSectionBtn"),
};

const SUBCATEGORY_IDS: CascadeIds = CascadeIds {
    parent: "category_id",
    child: "subcategory_id",
    add_button: Some("addSubcategoryBtn"),
};

/// Per-deployment form behaviour, read from the form's `data-*` attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateFormVariant {
    /// `data-none-option="true"`: offer an explicit "no section" entry.
    pub prepend_none_option: bool,
    /// `data-size-locale="ar"`: Arabic size units.
    pub size_format: SizeFormat,
}

impl CreateFormVariant {
    pub fn from_attributes(none_option: Option<&str>, size_locale: Option<&str>) -> Self {
        Self {
            prepend_none_option: matches!(none_option.map(str::trim), Some("true" | "1")),
            size_format: size_locale.map(SizeFormat::from_locale).unwrap_or_default(),
        }
    }

    /// Read from the form that owns `#department_id`.
    pub fn from_document(document: &Document) -> Self {
        let form = dom_utils::select_by_id(document, "department_id").and_then(|s| s.form());
        match form {
            Some(form) => Self::from_attributes(
                form.get_attribute("data-none-option").as_deref(),
                form.get_attribute("data-size-locale").as_deref(),
            ),
            None => Self::default(),
        }
    }
}

/// Visibility of the custom-priority field and the class of the maintenance
/// column next to it.
pub fn custom_priority_layout(priority: &str) -> (bool, &'static str) {
    if priority == CUSTOM_PRIORITY_VALUE {
        (true, "col-md-6 mt-3")
    } else {
        (false, "col-md-6")
    }
}

pub fn mount(document: &Document) -> Result<(), JsValue> {
    let variant = CreateFormVariant::from_document(document);
    debug_log!("create-ticket variant: {:?}", variant);

    let sections = CascadingSelect::mount(
        document,
        SECTION_IDS,
        Cascade::new(CascadeKind::Section, variant.prepend_none_option),
        api_resolver(CascadeKind::Section),
    )?;
    let subcategories = CascadingSelect::mount(
        document,
        SUBCATEGORY_IDS,
        Cascade::new(CascadeKind::Subcategory, variant.prepend_none_option),
        api_resolver(CascadeKind::Subcategory),
    )?;

    AttachmentPreview::mount(document, variant.size_format)?;
    BeneficiarySearch::mount(document, api_search())?;
    whatsapp::mount_form_composer(document)?;
    mount_contact_methods(document)?;
    mount_custom_priority(document)?;

    if current_config().csrf_token().is_some() {
        mount_quick_create(document, sections, subcategories)?;
    } else {
        debug_log!("no csrf token on page, quick-create disabled");
    }
    Ok(())
}

fn mount_quick_create(
    document: &Document,
    sections: Option<CascadingSelect>,
    subcategories: Option<CascadingSelect>,
) -> Result<(), JsValue> {
    let targets = [
        (EntityKind::Department, dom_utils::select_by_id(document, "department_id").map(CreateTarget::Select)),
        (EntityKind::Section, sections.map(CreateTarget::Cascade)),
        (EntityKind::Category, dom_utils::select_by_id(document, "category_id").map(CreateTarget::Select)),
        (EntityKind::Subcategory, subcategories.map(CreateTarget::Cascade)),
        (
            EntityKind::Beneficiary,
            dom_utils::input_by_id(document, "beneficiary_name")
                .zip(dom_utils::input_by_id(document, "beneficiary_id"))
                .map(|(name, id)| CreateTarget::Beneficiary { name, id }),
        ),
    ];

    let transport = api_transport();
    for (kind, target) in targets {
        if let Some(target) = target {
            QuickCreate::mount(document, kind, target, transport.clone())?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Contact-method cards
// ---------------------------------------------------------------------------

fn card_radio(card: &Element) -> Option<HtmlInputElement> {
    card.query_selector("input[type=\"radio\"]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into().ok())
}

fn mount_contact_methods(document: &Document) -> Result<(), JsValue> {
    let nodes = document.query_selector_all(".contact-method-option")?;
    let cards: Vec<Element> = (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect();
    let Some(first) = cards.first() else {
        return Ok(());
    };
    first.class_list().add_1("active")?;

    for card in &cards {
        let all = cards.clone();
        let this = card.clone();
        dom_utils::on(card, "click", move |_| {
            for other in &all {
                let _ = other.class_list().remove_1("active");
            }
            let _ = this.class_list().add_1("active");
            if let Some(radio) = card_radio(&this) {
                radio.set_checked(true);
            }
        })?;

        if let Some(radio) = card_radio(card) {
            let all = cards.clone();
            let changed = radio.clone();
            dom_utils::on(&radio, "change", move |_| {
                for other in &all {
                    let mine = card_radio(other).is_some_and(|r| r == changed);
                    let _ = other.class_list().toggle_with_force("active", mine);
                }
            })?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Custom priority
// ---------------------------------------------------------------------------

fn mount_custom_priority(document: &Document) -> Result<(), JsValue> {
    let (Some(priority), Some(container), Some(custom), Some(maintenance)) = (
        dom_utils::select_by_id(document, "priority_id"),
        document.get_element_by_id("custom_priority_container"),
        document.get_element_by_id("custom_priority"),
        document.get_element_by_id("maintenance_container"),
    ) else {
        return Ok(());
    };

    let apply = {
        let priority = priority.clone();
        move || {
            let (visible, column) = custom_priority_layout(&priority.value());
            dom_utils::set_display(&container, visible);
            if visible {
                let _ = custom.set_attribute("required", "required");
            } else {
                let _ = custom.remove_attribute("required");
            }
            maintenance.set_class_name(column);
        }
    };
    apply();
    dom_utils::on(&priority, "change", move |_| apply())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn variant_defaults() {
        let v = CreateFormVariant::from_attributes(None, None);
        assert!(!v.prepend_none_option);
        assert_eq!(v.size_format, SizeFormat::Binary);
    }

    #[wasm_bindgen_test]
    fn variant_from_attributes() {
        let v = CreateFormVariant::from_attributes(Some("true"), Some("ar"));
        assert!(v.prepend_none_option);
        assert_eq!(v.size_format, SizeFormat::Arabic);
        assert!(!CreateFormVariant::from_attributes(Some("false"), None).prepend_none_option);
    }

    #[wasm_bindgen_test]
    fn custom_priority_moves_maintenance_column() {
        assert_eq!(custom_priority_layout("0"), (true, "col-md-6 mt-3"));
        assert_eq!(custom_priority_layout("2"), (false, "col-md-6"));
        assert_eq!(custom_priority_layout(""), (false, "col-md-6"));
    }
}
