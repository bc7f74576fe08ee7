// src/pages/setup.rs
//
// One-time installation page.  Drives the setup reducer: calls the server,
// paces the step replay with timers, and renders bar/label/log/panels.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement};

use crate::constants::{SETUP_COMPLETE_DELAY_MS, SETUP_STEP_MAX_MS, SETUP_STEP_MIN_MS};
use crate::dom_utils;
use crate::error::ActionError;
use crate::network::ApiClient;
use crate::reducers::setup::{LogLevel, SetupCommand, SetupMsg, SetupState};

/// Text for the error panel.  Server messages pass through; an HTTP
/// failure names the status code.
pub fn setup_error_message(err: &ActionError) -> String {
    match err {
        ActionError::Rejected(msg) | ActionError::Validation(msg) => msg.clone(),
        ActionError::Status { status, .. } => format!("فشل الاتصال بالخادم: {}", status),
        ActionError::Network(msg) | ActionError::Malformed(msg) => msg.clone(),
    }
}

/// Uniform pick in `[SETUP_STEP_MIN_MS, SETUP_STEP_MAX_MS]`.
fn step_delay_ms() -> u32 {
    let span = (SETUP_STEP_MAX_MS - SETUP_STEP_MIN_MS + 1) as f64;
    SETUP_STEP_MIN_MS + (js_sys::Math::random() * span).floor() as u32
}

struct Elements {
    bar: HtmlElement,
    operation: Element,
    log: Element,
    complete: Element,
    error_panel: Element,
    error_message: Element,
}

#[derive(Clone)]
pub struct SetupPage {
    state: Rc<RefCell<SetupState>>,
    el: Rc<Elements>,
}

impl SetupPage {
    /// Bind the page and start setup.  No-op off the setup page.
    pub fn mount(document: &Document) -> Result<Option<Self>, JsValue> {
        let find = |id: &str| document.get_element_by_id(id);
        let (Some(bar), Some(operation), Some(log), Some(complete), Some(error_panel), Some(error_message)) = (
            find("progressBar"),
            find("currentOperation"),
            find("setupLog"),
            find("setupComplete"),
            find("setupError"),
            find("errorMessage"),
        ) else {
            return Ok(None);
        };

        let page = Self {
            state: Rc::new(RefCell::new(SetupState::default())),
            el: Rc::new(Elements {
                bar: bar.dyn_into()?,
                operation,
                log,
                complete,
                error_panel,
                error_message,
            }),
        };

        if let Some(retry) = find("retryBtn") {
            let handle = page.clone();
            dom_utils::on(&retry, "click", move |_| handle.dispatch(SetupMsg::Retry))?;
        }

        page.dispatch(SetupMsg::Start);
        Ok(Some(page))
    }

    pub fn dispatch(&self, msg: SetupMsg) {
        let commands = self.state.borrow_mut().update(msg);
        for command in commands {
            if let Err(e) = self.execute(command) {
                web_sys::console::warn_1(&e);
            }
        }
    }

    fn execute(&self, command: SetupCommand) -> Result<(), JsValue> {
        match command {
            SetupCommand::CallServer => {
                let handle = self.clone();
                spawn_local(async move {
                    let reply = ApiClient::run_setup()
                        .await
                        .map_err(|e| setup_error_message(&e));
                    handle.dispatch(SetupMsg::ServerReplied(reply));
                });
            }
            SetupCommand::Log(message, level) => self.append_log(&message, level)?,
            SetupCommand::ScheduleStepDone => {
                let handle = self.clone();
                spawn_local(async move {
                    TimeoutFuture::new(step_delay_ms()).await;
                    handle.dispatch(SetupMsg::StepDone);
                });
            }
            SetupCommand::RevealComplete => {
                let panel = self.el.complete.clone();
                spawn_local(async move {
                    TimeoutFuture::new(SETUP_COMPLETE_DELAY_MS).await;
                    dom_utils::set_display(&panel, true);
                });
            }
            SetupCommand::RevealError(message) => {
                self.el.error_message.set_text_content(Some(&message));
                dom_utils::set_display(&self.el.error_panel, true);
            }
            SetupCommand::HideError => dom_utils::set_display(&self.el.error_panel, false),
            SetupCommand::Render => self.render()?,
        }
        Ok(())
    }

    fn render(&self) -> Result<(), JsValue> {
        let state = self.state.borrow();
        let bar = &self.el.bar;
        bar.style().set_property("width", &format!("{}%", state.percent))?;
        bar.set_attribute("aria-valuenow", &state.percent.to_string())?;
        bar.set_class_name(state.bar_class());
        self.el.operation.set_text_content(Some(&state.operation));
        Ok(())
    }

    fn append_log(&self, message: &str, level: LogLevel) -> Result<(), JsValue> {
        let document = self
            .el
            .log
            .owner_document()
            .ok_or_else(|| JsValue::from_str("setup log is detached"))?;
        let stamp: String = js_sys::Date::new_0()
            .to_locale_time_string("ar-SA")
            .into();

        let entry = document.create_element("div")?;
        entry.set_class_name(&format!("log-entry {}", level.as_class()));
        entry.set_text_content(Some(&format!("[{}] {}", stamp, message)));
        self.el.log.append_child(&entry)?;
        self.el.log.set_scroll_top(self.el.log.scroll_height());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn error_panel_text() {
        assert_eq!(setup_error_message(&ActionError::Rejected("db locked".into())), "db locked");
        assert_eq!(
            setup_error_message(&ActionError::Status { status: 500, status_text: "x".into() }),
            "فشل الاتصال بالخادم: 500"
        );
    }

    #[wasm_bindgen_test]
    fn offline_setup_shows_fetch_message() {
        let err = ActionError::from_js(js_sys::TypeError::new("Failed to fetch").into());
        assert_eq!(setup_error_message(&err), "Failed to fetch");
    }

    #[wasm_bindgen_test]
    fn step_delay_within_bounds() {
        for _ in 0..50 {
            let ms = step_delay_ms();
            assert!((SETUP_STEP_MIN_MS..=SETUP_STEP_MAX_MS).contains(&ms));
        }
    }
}
