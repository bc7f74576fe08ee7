// src/pages/ticket_page.rs
//
// Ticket view: WhatsApp notification of the technician, the edit form
// (cascades, custom priority, submit guard), the delete-attachment dialog
// and the overdue markers on due dates.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use gloo_timers::callback::Interval;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlFormElement};

use crate::components::cascading_select::api_resolver;
use crate::components::whatsapp::{self, TicketContext};
use crate::components::{modal, CascadeIds, CascadingSelect};
use crate::constants::{CUSTOM_PRIORITY_VALUE, DUE_DATE_REFRESH_MS, MSG_OVERDUE, MSG_SELECT_CATEGORY_FIRST};
use crate::dom_utils;
use crate::reducers::cascade::{Cascade, CascadeKind};

const EDIT_SECTION_IDS: CascadeIds = CascadeIds {
    parent: "edit_department_id",
    child: "edit_section_id",
    add_button: None,
};

const EDIT_SUBCATEGORY_IDS: CascadeIds = CascadeIds {
    parent: "edit_category_id",
    child: "edit_subcategory_id",
    add_button: None,
};

const OVERDUE_BADGE_CLASS: &str = "badge bg-danger ms-2";

pub fn mount(document: &Document) -> Result<(), JsValue> {
    if let Some(ticket) = TicketContext::from_document(document) {
        debug_log!("ticket page for #{}", ticket.id);
        whatsapp::mount_ticket_composer(document, ticket)?;
    }

    CascadingSelect::mount(
        document,
        EDIT_SECTION_IDS,
        Cascade::new(CascadeKind::Section, false),
        api_resolver(CascadeKind::Section),
    )?;
    CascadingSelect::mount(
        document,
        EDIT_SUBCATEGORY_IDS,
        Cascade::new(CascadeKind::Subcategory, false),
        api_resolver(CascadeKind::Subcategory),
    )?;

    mount_edit_priority(document)?;
    mount_delete_attachment(document)?;
    mount_edit_submit_guard(document)?;
    mount_due_dates(document);
    Ok(())
}

fn mount_edit_priority(document: &Document) -> Result<(), JsValue> {
    let (Some(priority), Some(container)) = (
        dom_utils::select_by_id(document, "edit_priority_id"),
        document.get_element_by_id("edit_custom_priority_container"),
    ) else {
        return Ok(());
    };

    let apply = {
        let priority = priority.clone();
        move || {
            let custom = priority.value() == CUSTOM_PRIORITY_VALUE;
            let _ = container.class_list().toggle_with_force("visible", custom);
        }
    };
    apply();
    dom_utils::on(&priority, "change", move |_| apply())?;
    Ok(())
}

/// Point the shared confirmation dialog at the attachment whose delete
/// button opened it.
fn mount_delete_attachment(document: &Document) -> Result<(), JsValue> {
    let doc = document.clone();
    modal::on_show(document, "deleteAttachmentModal", move |event| {
        let Some(button) = modal::related_target(&event) else {
            return;
        };
        let id = button.get_attribute("data-attachment-id").unwrap_or_default();
        let name = button.get_attribute("data-attachment-name").unwrap_or_default();

        if let Some(span) = doc.get_element_by_id("attachmentToDelete") {
            span.set_text_content(Some(&name));
        }
        if let Some(form) = doc
            .get_element_by_id("deleteAttachmentForm")
            .and_then(|el| el.dyn_into::<HtmlFormElement>().ok())
        {
            form.set_action(&format!("/attachment/{}/delete", id));
        }
    })
}

fn mount_edit_submit_guard(document: &Document) -> Result<(), JsValue> {
    let Some(form) = document.get_element_by_id("editTicketForm") else {
        return Ok(());
    };
    let doc = document.clone();
    let target = form.clone();
    dom_utils::on(&form, "submit", move |event| {
        let category = dom_utils::select_by_id(&doc, "edit_category_id")
            .map(|s| s.value())
            .unwrap_or_default();
        if category.is_empty() {
            event.prevent_default();
            dom_utils::alert(MSG_SELECT_CATEGORY_FIRST);
            return;
        }
        let _ = target.set_attribute("data-submitted", "true");
    })
}

// ---------------------------------------------------------------------------
// Due dates
// ---------------------------------------------------------------------------

/// Parse the due-date text the templates render.  Date-only values mean
/// midnight at the start of that day.
pub fn parse_due_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    const FORMATS: [&str; 4] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn is_overdue(text: &str, now: NaiveDateTime) -> bool {
    parse_due_date(text).is_some_and(|due| due < now)
}

/// Add the overdue badge to every past `.ticket-due-date` that lacks one.
pub fn refresh_due_dates(document: &Document, now: NaiveDateTime) -> Result<(), JsValue> {
    let nodes = document.query_selector_all(".ticket-due-date")?;
    for el in (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
    {
        if el.query_selector(".badge.bg-danger")?.is_some() {
            continue;
        }
        let text = el.text_content().unwrap_or_default();
        if !is_overdue(&text, now) {
            continue;
        }
        let badge = document.create_element("span")?;
        badge.set_class_name(OVERDUE_BADGE_CLASS);
        badge.set_text_content(Some(MSG_OVERDUE));
        el.append_child(&badge)?;
    }
    Ok(())
}

fn mount_due_dates(document: &Document) {
    if !matches!(document.query_selector(".ticket-due-date"), Ok(Some(_))) {
        return;
    }
    let check = {
        let document = document.clone();
        move || {
            if let Err(e) = refresh_due_dates(&document, Local::now().naive_local()) {
                web_sys::console::warn_1(&e);
            }
        }
    };
    check();
    Interval::new(DUE_DATE_REFRESH_MS, check).forget();
}
