use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use super::config::current_config;
use crate::error::ActionError;
use crate::models::{
    BeneficiaryMatch, NamedEntity, SectionsResponse, SetupOutcome, StatusEnvelope,
    SubcategoriesResponse,
};

const MSG_UNKNOWN_ERROR: &str = "حدث خطأ غير معروف";

/// Raw HTTP outcome before any JSON interpretation.
struct RawResponse {
    ok: bool,
    status: u16,
    status_text: String,
    body: String,
}

/// How a request identifies itself to the Flask backend.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Plain GET, no extra headers.
    None,
    /// `X-Requested-With` only (setup runs before any session exists).
    Ajax,
    /// `X-Requested-With` plus `X-CSRFToken` from the page.
    AjaxCsrf,
}

// REST client for the ticketing backend.  Every call is a thin wrapper that
// builds the URL/body and interprets the reply; `send` does the fetch.
pub struct ApiClient;

impl ApiClient {
    // ---------------- Lookups ----------------

    /// Sections of a department, in server order.  A missing `sections`
    /// key is treated as an empty list.
    pub async fn get_sections(department_id: &str) -> Result<Vec<NamedEntity>, ActionError> {
        let path = format!("/api/sections/{}", encode(department_id));
        let resp: SectionsResponse = Self::get_json(&path).await?;
        Ok(resp.sections.unwrap_or_default())
    }

    /// Subcategories of a category, in server order.
    pub async fn get_subcategories(category_id: &str) -> Result<Vec<NamedEntity>, ActionError> {
        let path = format!("/api/subcategories/{}", encode(category_id));
        let resp: SubcategoriesResponse = Self::get_json(&path).await?;
        Ok(resp.subcategories.unwrap_or_default())
    }

    /// Beneficiary autocomplete.  The endpoint returns a bare array; any
    /// other shape is logged and treated as "no matches".
    pub async fn search_beneficiaries(term: &str) -> Result<Vec<BeneficiaryMatch>, ActionError> {
        let path = format!("/api/beneficiaries/search?term={}", encode(term));
        let value: Value = Self::get_json(&path).await?;
        Ok(parse_beneficiary_matches(value))
    }

    // ---------------- Quick-create ----------------

    /// POST a quick-create body and pull the created `{id, name}` row out of
    /// `response[entity_key]`.
    pub async fn create_lookup(
        path: &str,
        body: &Value,
        entity_key: &str,
    ) -> Result<NamedEntity, ActionError> {
        let envelope = Self::post_action(path, body, Auth::AjaxCsrf).await?;
        let row = envelope
            .payload
            .get(entity_key)
            .cloned()
            .ok_or_else(|| ActionError::Malformed(format!("missing `{}` in response", entity_key)))?;
        Ok(serde_json::from_value(row)?)
    }

    // ---------------- Tickets ----------------

    /// Record an automatic "WhatsApp sent" comment on a ticket.
    pub async fn add_whatsapp_comment(ticket_id: &str, tech_name: &str) -> Result<(), ActionError> {
        let ticket_id = ticket_id
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(ticket_id));
        let body = json!({ "ticket_id": ticket_id, "tech_name": tech_name });
        Self::post_action("/api/add_whatsapp_comment", &body, Auth::AjaxCsrf).await?;
        Ok(())
    }

    // ---------------- Setup ----------------

    /// Kick off the one-time database setup.
    pub async fn run_setup() -> Result<SetupOutcome, ActionError> {
        let raw = Self::send("/setup_api", "POST", Some("{}"), Auth::Ajax).await?;
        if !raw.ok {
            return Err(ActionError::Status { status: raw.status, status_text: raw.status_text });
        }
        let envelope: StatusEnvelope = serde_json::from_str(&raw.body)?;
        match envelope.status.as_str() {
            "success" => Ok(SetupOutcome::Completed),
            "info" => Ok(SetupOutcome::AlreadyDone(envelope.message.unwrap_or_default())),
            _ => Err(ActionError::Rejected(
                envelope.message.unwrap_or_else(|| MSG_UNKNOWN_ERROR.to_string()),
            )),
        }
    }

    // -------------------------------------------------------------------
    // Transport helpers
    // -------------------------------------------------------------------

    async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ActionError> {
        let raw = Self::send(path, "GET", None, Auth::None).await?;
        if !raw.ok {
            return Err(ActionError::Status { status: raw.status, status_text: raw.status_text });
        }
        Ok(serde_json::from_str(&raw.body)?)
    }

    /// POST JSON to a mutating endpoint and unwrap the `{status, message}`
    /// envelope.  A 4xx whose body still carries an envelope is reported as
    /// `Rejected` with the server's message, since that is what the backend
    /// uses for "already exists" and friends.
    async fn post_action(path: &str, body: &Value, auth: Auth) -> Result<StatusEnvelope, ActionError> {
        let payload = body.to_string();
        let raw = Self::send(path, "POST", Some(&payload), auth).await?;

        match serde_json::from_str::<StatusEnvelope>(&raw.body) {
            Ok(envelope) if envelope.is_success() && raw.ok => Ok(envelope),
            Ok(envelope) => Err(ActionError::Rejected(
                envelope.message.unwrap_or_else(|| MSG_UNKNOWN_ERROR.to_string()),
            )),
            Err(_) if !raw.ok => {
                Err(ActionError::Status { status: raw.status, status_text: raw.status_text })
            }
            Err(e) => Err(e.into()),
        }
    }

    // Helper function to make fetch requests
    async fn send(path: &str, method: &str, body: Option<&str>, auth: Auth) -> Result<RawResponse, ActionError> {
        let config = current_config();
        let url = config.url(path);
        debug_log!("{} {}", method, url);

        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_mode(RequestMode::Cors);

        let headers = Headers::new().map_err(ActionError::from_js)?;
        if auth != Auth::None {
            headers
                .append("X-Requested-With", "XMLHttpRequest")
                .map_err(ActionError::from_js)?;
        }
        if auth == Auth::AjaxCsrf {
            if let Some(token) = config.csrf_token() {
                headers.append("X-CSRFToken", token).map_err(ActionError::from_js)?;
            }
        }
        if let Some(data) = body {
            opts.set_body(&JsValue::from_str(data));
            headers
                .append("Content-Type", "application/json")
                .map_err(ActionError::from_js)?;
        }
        opts.set_headers(&headers);

        let request = Request::new_with_str_and_init(&url, &opts).map_err(ActionError::from_js)?;
        let window = web_sys::window().ok_or_else(|| ActionError::Network("no window".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(ActionError::from_js)?;
        let resp: Response = resp_value.dyn_into().map_err(ActionError::from_js)?;

        let text_promise = resp.text().map_err(ActionError::from_js)?;
        let text = JsFuture::from(text_promise).await.map_err(ActionError::from_js)?;

        Ok(RawResponse {
            ok: resp.ok(),
            status: resp.status(),
            status_text: resp.status_text(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

fn encode(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

/// Interpret the autocomplete payload.  Non-arrays and malformed entries are
/// logged and skipped rather than failing the whole lookup.
pub fn parse_beneficiary_matches(value: Value) -> Vec<BeneficiaryMatch> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<BeneficiaryMatch>(item) {
                Ok(m) => Some(m),
                Err(e) => {
                    console_error!("skipping malformed beneficiary entry: {}", e);
                    None
                }
            })
            .collect(),
        other => {
            console_error!("beneficiary search returned a non-array payload: {}", other);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn non_array_search_payload_is_empty() {
        assert!(parse_beneficiary_matches(json!({"error": "oops"})).is_empty());
        assert!(parse_beneficiary_matches(Value::Null).is_empty());
    }

    #[wasm_bindgen_test]
    fn search_payload_keeps_valid_entries() {
        let matches = parse_beneficiary_matches(json!([
            {"id": 1, "value": "Ali", "label": "Ali - 050"},
            {"label": "missing id"},
            {"id": "2", "label": "Sara"}
        ]));
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "1");
        assert_eq!(matches[1].display_name(), "Sara");
    }

    #[wasm_bindgen_test]
    fn path_segments_are_encoded() {
        assert_eq!(encode("12"), "12");
        assert_eq!(encode("a b/c"), "a%20b%2Fc");
    }
}
