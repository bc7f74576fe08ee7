//! WhatsApp hand-off to the assigned technician.
//!
//! Two callers share the composer: the create-ticket form (message built from
//! the fields the user has filled so far) and the ticket view (message built
//! from the rendered ticket, behind a confirmation, followed by an automatic
//! "WhatsApp sent" comment).  Opening `wa.me` never blocks the page.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlSelectElement};

use crate::constants::{
    COUNTRY_CODE, DESCRIPTION_PREVIEW_CHARS, MSG_NO_TECH_PHONE, MSG_SELECT_TECH_FIRST,
    MSG_UNSPECIFIED, WHATSAPP_BASE_URL,
};
use crate::dom_utils;
use crate::network::ApiClient;
use crate::utils::truncate_with_ellipsis;

/// How much rewriting a phone number gets before it goes into the link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonePolicy {
    /// Create form: a leading `0` becomes the country code, nothing else.
    LeadingZeroOnly,
    /// Ticket view: additionally prefix the country code when missing.
    ForceCountryCode,
}

pub fn normalize_phone(raw: &str, policy: PhonePolicy) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let mut phone = if digits.starts_with('0') {
        format!("{}{}", COUNTRY_CODE, &digits[1..])
    } else {
        digits
    };
    if policy == PhonePolicy::ForceCountryCode && !phone.starts_with(COUNTRY_CODE) {
        phone = format!("{}{}", COUNTRY_CODE, phone);
    }
    phone
}

/// `https://wa.me/<phone>?text=<encoded>`
pub fn wa_link(phone: &str, message: &str) -> String {
    let encoded: String = js_sys::encode_uri_component(message).into();
    format!("{}{}?text={}", WHATSAPP_BASE_URL, phone, encoded)
}

/// The send button is live only for a selected technician with a phone.
pub fn send_enabled(selected_value: &str, phone: Option<&str>) -> bool {
    !selected_value.is_empty() && phone.is_some_and(|p| !p.trim().is_empty())
}

/// Ticket fields rendered by the server on `#ticketContainer`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketContext {
    pub id: String,
    pub title: String,
    pub category: String,
    pub priority: String,
    pub beneficiary: String,
    pub department: String,
    pub description: String,
    pub contact_method: Option<String>,
}

impl TicketContext {
    pub fn from_element(el: &Element) -> Self {
        let attr = |name: &str| el.get_attribute(name).unwrap_or_default();
        Self {
            id: attr("data-ticket-id"),
            title: attr("data-ticket-title"),
            category: attr("data-ticket-category"),
            priority: attr("data-ticket-priority"),
            beneficiary: attr("data-ticket-beneficiary"),
            department: attr("data-ticket-department"),
            description: attr("data-ticket-description"),
            contact_method: el
                .get_attribute("data-ticket-contact-method")
                .filter(|m| !m.trim().is_empty()),
        }
    }

    pub fn from_document(document: &Document) -> Option<Self> {
        document
            .get_element_by_id("ticketContainer")
            .map(|el| Self::from_element(&el))
    }
}

/// Create-form values read at click time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub tech_name: String,
    pub category: String,
    pub priority: String,
    pub beneficiary: String,
    pub description: String,
}

pub fn compose_form_message(form: &FormSnapshot) -> String {
    let beneficiary = if form.beneficiary.trim().is_empty() {
        MSG_UNSPECIFIED
    } else {
        form.beneficiary.as_str()
    };
    let mut message = String::from("بلاغ جديد في انتظار المعالجة\n\n");
    message.push_str(&format!("الفني المسؤول: {}\n", form.tech_name));
    message.push_str(&format!("التصنيف: {}\n", form.category));
    message.push_str(&format!("الأولوية: {}\n", form.priority));
    message.push_str(&format!("المستفيد: {}\n", beneficiary));
    message.push_str(&format!(
        "وصف المشكلة: {}\n\n",
        truncate_with_ellipsis(&form.description, DESCRIPTION_PREVIEW_CHARS)
    ));
    message.push_str("الرجاء مراجعة البلاغ في نظام Fixltpro بعد إنشائه.");
    message
}

pub fn compose_ticket_message(ticket: &TicketContext) -> String {
    let mut message = format!("بلاغ رقم: {}\n", ticket.id);
    message.push_str(&format!("العنوان: {}\n", ticket.title));
    message.push_str(&format!("التصنيف: {}\n", ticket.category));
    message.push_str(&format!("الأولوية: {}\n", ticket.priority));
    message.push_str(&format!("المستفيد: {}\n", ticket.beneficiary));
    message.push_str(&format!("الإدارة: {}\n", ticket.department));
    if let Some(method) = &ticket.contact_method {
        message.push_str(&format!("طريقة الاستلام: {}\n", method));
    }
    message.push_str(&format!(
        "وصف المشكلة: {}",
        truncate_with_ellipsis(&ticket.description, DESCRIPTION_PREVIEW_CHARS)
    ));
    message.push_str("\nالرجاء مراجعة البلاغ في نظام Fixltpro في أقرب وقت.");
    message
}

fn selected_phone(select: &HtmlSelectElement) -> Option<String> {
    dom_utils::selected_option(select).and_then(|opt| opt.get_attribute("data-phone"))
}

// ---------------------------------------------------------------------------
// Create-ticket form
// ---------------------------------------------------------------------------

/// Wire `#assigned_to_id` + `#sendWhatsappBtn`.  No-op when either is
/// missing.
pub fn mount_form_composer(document: &Document) -> Result<(), JsValue> {
    let (Some(assignee), Some(button)) = (
        dom_utils::select_by_id(document, "assigned_to_id"),
        document.get_element_by_id("sendWhatsappBtn"),
    ) else {
        return Ok(());
    };

    let sync = {
        let assignee = assignee.clone();
        let button = button.clone();
        move || {
            let enabled = send_enabled(&assignee.value(), selected_phone(&assignee).as_deref());
            dom_utils::set_disabled(&button, !enabled);
        }
    };
    sync();
    let on_change = sync.clone();
    dom_utils::on(&assignee, "change", move |_| on_change())?;

    let doc = document.clone();
    dom_utils::on(&button, "click", move |_| {
        let phone = selected_phone(&assignee);
        if !send_enabled(&assignee.value(), phone.as_deref()) {
            return;
        }
        let phone = normalize_phone(phone.as_deref().unwrap_or_default(), PhonePolicy::LeadingZeroOnly);
        let snapshot = read_form(&doc, &assignee);
        dom_utils::open_in_new_tab(&wa_link(&phone, &compose_form_message(&snapshot)));
    })?;
    Ok(())
}

fn read_form(document: &Document, assignee: &HtmlSelectElement) -> FormSnapshot {
    let select_text = |id: &str| {
        dom_utils::select_by_id(document, id)
            .map(|s| dom_utils::selected_text(&s))
            .unwrap_or_default()
    };
    FormSnapshot {
        tech_name: dom_utils::selected_text(assignee),
        category: select_text("category_id"),
        priority: select_text("priority_id"),
        beneficiary: dom_utils::field_value(document, "beneficiary_name"),
        description: dom_utils::field_value(document, "description"),
    }
}

// ---------------------------------------------------------------------------
// Ticket view
// ---------------------------------------------------------------------------

/// Confirm, open WhatsApp, then record the notification as a comment.
pub fn notify_technician(ticket: &TicketContext, phone: Option<&str>, tech_name: &str) {
    let Some(raw) = phone.filter(|p| !p.trim().is_empty()) else {
        dom_utils::alert(MSG_NO_TECH_PHONE);
        return;
    };
    let phone = normalize_phone(raw, PhonePolicy::ForceCountryCode);
    let link = wa_link(&phone, &compose_ticket_message(ticket));

    if !dom_utils::confirm(&format!("هل تريد إرسال تنبيه عبر واتساب للفني {}؟", tech_name)) {
        return;
    }
    dom_utils::open_in_new_tab(&link);

    let ticket_id = ticket.id.clone();
    let tech_name = tech_name.to_string();
    spawn_local(async move {
        match ApiClient::add_whatsapp_comment(&ticket_id, &tech_name).await {
            Ok(()) => {
                debug_log!("whatsapp comment added to ticket {}", ticket_id);
                dom_utils::reload_page();
            }
            Err(err) => console_error!("whatsapp comment failed: {}", err),
        }
    });
}

/// Wire both ticket-view triggers: the assignment select with
/// `#sendWhatsappToTech`, and the direct `#sendDirectWhatsappBtn`.
pub fn mount_ticket_composer(document: &Document, ticket: TicketContext) -> Result<(), JsValue> {
    if let (Some(button), Some(select)) = (
        document.get_element_by_id("sendWhatsappToTech"),
        dom_utils::select_by_id(document, "maintenance_id"),
    ) {
        let ticket = ticket.clone();
        dom_utils::on(&button, "click", move |_| {
            if select.value().is_empty() {
                dom_utils::alert(MSG_SELECT_TECH_FIRST);
                return;
            }
            let tech_name = dom_utils::selected_text(&select);
            notify_technician(&ticket, selected_phone(&select).as_deref(), &tech_name);
        })?;
    }

    if let Some(button) = document.get_element_by_id("sendDirectWhatsappBtn") {
        let target = button.clone();
        dom_utils::on(&button, "click", move |_| {
            let phone = target.get_attribute("data-phone");
            let tech_name = target.get_attribute("data-name").unwrap_or_default();
            notify_technician(&ticket, phone.as_deref(), &tech_name);
        })?;
    }
    Ok(())
}
