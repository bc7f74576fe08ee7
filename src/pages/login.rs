// src/pages/login.rs
//
// Login form: client-side required-field check, password visibility toggle,
// spinner on submit.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, KeyboardEvent};

use crate::constants::{MSG_PASSWORD_REQUIRED, MSG_USERNAME_REQUIRED};
use crate::dom_utils;

const INVALID_CLASS: &str = "is-invalid";

/// Per-field validation messages; `None` means the field is fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginErrors {
    pub username: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginErrors {
    pub fn is_valid(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

/// Username is trimmed; the password is taken as typed.
pub fn validate_login(username: &str, password: &str) -> LoginErrors {
    LoginErrors {
        username: username.trim().is_empty().then_some(MSG_USERNAME_REQUIRED),
        password: password.is_empty().then_some(MSG_PASSWORD_REQUIRED),
    }
}

fn mark(input: &HtmlInputElement, feedback: Option<&Element>, error: Option<&str>) {
    let _ = input.class_list().toggle_with_force(INVALID_CLASS, error.is_some());
    if let Some(feedback) = feedback {
        feedback.set_text_content(Some(error.unwrap_or_default()));
    }
}

pub fn mount(document: &Document) -> Result<(), JsValue> {
    let (Some(username), Some(password)) = (
        dom_utils::input_by_id(document, "username"),
        dom_utils::input_by_id(document, "password"),
    ) else {
        return Ok(());
    };

    if let Some(toggle) = document.query_selector(".toggle-password")? {
        let password = password.clone();
        let button = toggle.clone();
        dom_utils::on(&toggle, "click", move |_| {
            let reveal = password.type_() == "password";
            password.set_type(if reveal { "text" } else { "password" });
            if let Ok(Some(icon)) = button.query_selector("i") {
                let classes = icon.class_list();
                let _ = classes.toggle_with_force("fa-eye", !reveal);
                let _ = classes.toggle_with_force("fa-eye-slash", reveal);
            }
        })?;
    }

    if let Some(form) = document.get_element_by_id("loginForm") {
        let username = username.clone();
        let password = password.clone();
        let username_feedback = document.get_element_by_id("username-feedback");
        let password_feedback = document.get_element_by_id("password-feedback");
        let login_button = document.query_selector(".login-btn")?;
        let spinner = document.query_selector(".spinner-border")?;

        dom_utils::on(&form, "submit", move |event| {
            let errors = validate_login(&username.value(), &password.value());
            mark(&username, username_feedback.as_ref(), errors.username);
            mark(&password, password_feedback.as_ref(), errors.password);
            if !errors.is_valid() {
                event.prevent_default();
                return;
            }
            if let Some(button) = &login_button {
                dom_utils::set_disabled(button, true);
            }
            if let Some(spinner) = &spinner {
                dom_utils::show(spinner);
            }
        })?;
    }

    let inputs = document.query_selector_all("input")?;
    for input in (0..inputs.length())
        .filter_map(|i| inputs.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
    {
        let target = input.clone();
        dom_utils::on(&input, "keypress", move |event| {
            let enter = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|k| k.key() == "Enter");
            if enter && target.class_list().contains(INVALID_CLASS) {
                event.prevent_default();
            }
        })?;
    }

    let _ = username.focus();
    Ok(())
}
