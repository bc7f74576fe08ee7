use std::cell::RefCell;
use web_sys::{Document, HtmlInputElement};
use wasm_bindgen::JsCast;

/// API route configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    csrf_token: Option<String>,
}

impl Default for ApiConfig {
    /// Same-origin relative URLs and no CSRF token.  The pages are served by
    /// the same Flask app that answers `/api/*`, so an empty base is the
    /// normal production value; `API_BASE_URL` only matters when the bundle
    /// is served from a dev server on another port.
    fn default() -> Self {
        Self {
            base_url: option_env!("API_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            csrf_token: None,
        }
    }
}

impl ApiConfig {
    /// Build the config for the current page: default base URL plus the
    /// CSRF token from the hidden `csrf_token` form field, if present.
    pub fn from_document(document: &Document) -> Self {
        Self {
            csrf_token: read_csrf_token(document),
            ..Self::default()
        }
    }

    /// Create a new ApiConfig from a URL string
    pub fn from_url(url: &str) -> Self {
        Self { base_url: url.trim_end_matches('/').to_string(), csrf_token: None }
    }

    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Get the base URL for all API calls
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Get a full URL for a given absolute path (`/api/...`, `/setup_api`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn read_csrf_token(document: &Document) -> Option<String> {
    document
        .query_selector("input[name=\"csrf_token\"]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .filter(|token| !token.is_empty())
}

thread_local! {
    static API_CONFIG: RefCell<ApiConfig> = RefCell::new(ApiConfig::default());
}

/// Install the configuration used by [`super::ApiClient`].  Called once from
/// `start()`; tests call it to point the client elsewhere.
pub fn init_api_config(config: ApiConfig) {
    API_CONFIG.with(|cell| *cell.borrow_mut() = config);
}

pub fn current_config() -> ApiConfig {
    API_CONFIG.with(|cell| cell.borrow().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn url_joins_without_double_slash() {
        let cfg = ApiConfig::from_url("http://localhost:5000/");
        assert_eq!(cfg.url("/api/sections/3"), "http://localhost:5000/api/sections/3");
    }

    #[wasm_bindgen_test]
    fn csrf_token_read_from_hidden_field() {
        let document = web_sys::window().unwrap().document().unwrap();
        let input = document.create_element("input").unwrap();
        input.set_attribute("type", "hidden").unwrap();
        input.set_attribute("name", "csrf_token").unwrap();
        input.set_attribute("value", "tok-123").unwrap();
        document.body().unwrap().append_child(&input).unwrap();

        let cfg = ApiConfig::from_document(&document);
        assert_eq!(cfg.csrf_token(), Some("tok-123"));

        input.remove();
    }

    #[wasm_bindgen_test]
    fn installed_config_is_returned() {
        init_api_config(ApiConfig::from_url("http://example.test").with_csrf_token("abc"));
        let cfg = current_config();
        assert_eq!(cfg.base_url(), "http://example.test");
        assert_eq!(cfg.csrf_token(), Some("abc"));
        init_api_config(ApiConfig::default());
    }
}
