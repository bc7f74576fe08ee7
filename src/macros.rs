//! Small crate-wide convenience macros.

/// `console.log` with `format!` arguments, compiled only into debug builds.
///
/// ```rust,ignore
/// debug_log!("sections loaded for department {}", department_id);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(debug_assertions)]
        {
            web_sys::console::log_1(&format!($($arg)*).into());
        }
    };
}

/// `console.error` with `format!` arguments.  Used for failures the user
/// never sees (malformed payloads, fire-and-forget requests).
#[macro_export]
macro_rules! console_error {
    ($($arg:tt)*) => {
        web_sys::console::error_1(&format!($($arg)*).into())
    };
}
