//! Error type shared by every user action (dropdown loads, quick-create,
//! setup, WhatsApp comment).

use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// Required input missing; the request never left the browser.
    #[error("{0}")]
    Validation(String),

    /// `fetch` rejected (offline, CORS, aborted).
    #[error("network error: {0}")]
    Network(String),

    /// Non-2xx response whose body carried no usable message.
    #[error("request failed: {status} {status_text}")]
    Status { status: u16, status_text: String },

    /// Body was not the JSON shape we expected.
    #[error("unexpected response: {0}")]
    Malformed(String),

    /// Server answered with `status != "success"`.
    #[error("{0}")]
    Rejected(String),
}

impl ActionError {
    /// Text shown to the user.  Validation and server messages are shown
    /// verbatim, transport/shape failures collapse to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ActionError::Validation(msg) | ActionError::Rejected(msg) => msg.clone(),
            ActionError::Network(_) | ActionError::Status { .. } | ActionError::Malformed(_) => {
                fallback.to_string()
            }
        }
    }

    pub fn from_js(err: JsValue) -> Self {
        let text = err
            .as_string()
            .or_else(|| err.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
            .or_else(|| js_sys::JSON::stringify(&err).ok().and_then(|s| s.as_string()))
            .unwrap_or_else(|| "unknown".to_string());
        ActionError::Network(text)
    }
}

impl From<ActionError> for JsValue {
    fn from(err: ActionError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<serde_json::Error> for ActionError {
    fn from(err: serde_json::Error) -> Self {
        ActionError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn user_message_shows_server_text_verbatim() {
        let err = ActionError::Rejected("الإدارة موجودة بالفعل".into());
        assert_eq!(err.user_message("generic"), "الإدارة موجودة بالفعل");
    }

    #[wasm_bindgen_test]
    fn transport_failures_use_fallback() {
        let fallback = "حدث خطأ أثناء إضافة الإدارة";
        assert_eq!(ActionError::Network("offline".into()).user_message(fallback), fallback);
        assert_eq!(
            ActionError::Status { status: 500, status_text: "Internal".into() }.user_message(fallback),
            fallback
        );
        assert_eq!(ActionError::Malformed("eof".into()).user_message(fallback), fallback);
    }

    #[wasm_bindgen_test]
    fn rejected_fetch_keeps_error_message() {
        let err = ActionError::from_js(js_sys::TypeError::new("Failed to fetch").into());
        assert_eq!(err, ActionError::Network("Failed to fetch".into()));
        assert_eq!(ActionError::from_js(JsValue::from_str("aborted")), ActionError::Network("aborted".into()));
    }
}
