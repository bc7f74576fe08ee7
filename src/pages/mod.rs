// src/pages/mod.rs
//
// One module per server-rendered page.  Every `mount` looks for its own
// elements and quietly does nothing on other pages.

pub mod create_ticket;
pub mod login;
pub mod setup;
pub mod ticket_page;
