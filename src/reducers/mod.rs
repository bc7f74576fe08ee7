//! Pure state machines behind the page controllers.
//!
//! Each reducer takes a message, updates its state and returns the commands
//! the DOM side has to execute, so the transitions can be tested without a
//! page.

pub mod cascade;
pub mod setup;
