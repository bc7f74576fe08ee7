pub mod attachment_preview;
pub mod beneficiary_search;
pub mod cascading_select;
pub mod modal;
pub mod quick_create;
pub mod whatsapp;

// Re-export commonly used items
pub use cascading_select::{CascadeIds, CascadingSelect};
pub use quick_create::{CreateTarget, EntityKind, QuickCreate};
