//! Cascading-select reducer: the state of one parent→child dropdown pair
//! (department→section, category→subcategory).
//!
//! The reducer is pure.  `update` consumes a [`CascadeMsg`], mutates the
//! state and returns the [`CascadeCommand`]s the DOM controller must run
//! (fetch children, re-render, select a value, log a failure).  Everything the child
//! control shows – its options and whether it and its "add" button are
//! enabled – is derived from [`CascadeState`].

use crate::constants::*;
use crate::error::ActionError;
use crate::models::{ChoiceOption, NamedEntity};

/// Which child list a pair drives; decides the texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeKind {
    Section,
    Subcategory,
}

impl CascadeKind {
    pub fn placeholder(self) -> &'static str {
        match self {
            CascadeKind::Section => MSG_SECTION_PLACEHOLDER,
            CascadeKind::Subcategory => MSG_SUBCATEGORY_PLACEHOLDER,
        }
    }

    pub fn empty_text(self) -> &'static str {
        match self {
            CascadeKind::Section => MSG_NO_SECTIONS,
            CascadeKind::Subcategory => MSG_NO_SUBCATEGORIES,
        }
    }

    pub fn none_text(self) -> &'static str {
        match self {
            CascadeKind::Section => MSG_NONE_SECTION,
            CascadeKind::Subcategory => MSG_NONE_SUBCATEGORY,
        }
    }

    pub fn error_text(self) -> &'static str {
        match self {
            CascadeKind::Section => MSG_SECTIONS_FAILED,
            CascadeKind::Subcategory => MSG_SUBCATEGORIES_FAILED,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeState {
    /// No parent selected; child disabled.
    Empty,
    /// Request `seq` for `parent_id` is in flight.
    Loading { parent_id: String, seq: u64 },
    /// Children of `parent_id`, in server order.
    Populated { parent_id: String, options: Vec<ChoiceOption> },
    /// Loading children of `parent_id` failed.
    Error { parent_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CascadeMsg {
    /// Parent `<select>` changed; empty string means "nothing selected".
    ParentChanged(String),
    Loaded { seq: u64, items: Vec<NamedEntity> },
    Failed { seq: u64, error: ActionError },
    /// A child row was created through quick-create.
    Created(NamedEntity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeCommand {
    Fetch { parent_id: String, seq: u64 },
    Render,
    Select(String),
    /// Failure the controller writes to the console.
    Log(String),
}

#[derive(Debug, Clone)]
pub struct Cascade {
    kind: CascadeKind,
    prepend_none: bool,
    state: CascadeState,
    last_seq: u64,
}

impl Cascade {
    pub fn new(kind: CascadeKind, prepend_none: bool) -> Self {
        Self { kind, prepend_none, state: CascadeState::Empty, last_seq: 0 }
    }

    pub fn state(&self) -> &CascadeState {
        &self.state
    }

    pub fn update(&mut self, msg: CascadeMsg) -> Vec<CascadeCommand> {
        match msg {
            CascadeMsg::ParentChanged(parent_id) if parent_id.is_empty() => {
                self.last_seq += 1;
                self.state = CascadeState::Empty;
                vec![CascadeCommand::Render]
            }
            CascadeMsg::ParentChanged(parent_id) => {
                self.last_seq += 1;
                let seq = self.last_seq;
                self.state = CascadeState::Loading { parent_id: parent_id.clone(), seq };
                vec![CascadeCommand::Render, CascadeCommand::Fetch { parent_id, seq }]
            }
            CascadeMsg::Loaded { seq, items } => match self.take_pending(seq) {
                Some(parent_id) => {
                    let options = items.into_iter().map(ChoiceOption::from).collect();
                    self.state = CascadeState::Populated { parent_id, options };
                    vec![CascadeCommand::Render]
                }
                None => Vec::new(),
            },
            CascadeMsg::Failed { seq, error } => match self.take_pending(seq) {
                Some(parent_id) => {
                    let line = format!("loading {:?} for {} failed: {}", self.kind, parent_id, error);
                    self.state = CascadeState::Error { parent_id };
                    vec![CascadeCommand::Log(line), CascadeCommand::Render]
                }
                None => Vec::new(),
            },
            CascadeMsg::Created(row) => {
                let id = row.id.clone();
                match &mut self.state {
                    CascadeState::Populated { options, .. } => {
                        if !options.iter().any(|o| o.id == id) {
                            options.push(row.into());
                        }
                    }
                    other => {
                        // Supersede any pending load so it cannot overwrite the
                        // freshly created entry.
                        self.last_seq += 1;
                        let parent_id = match other {
                            CascadeState::Loading { parent_id, .. }
                            | CascadeState::Error { parent_id } => parent_id.clone(),
                            _ => String::new(),
                        };
                        self.state = CascadeState::Populated { parent_id, options: vec![row.into()] };
                    }
                }
                vec![CascadeCommand::Render, CascadeCommand::Select(id)]
            }
        }
    }

    /// Take over what the server rendered into the page (edit forms arrive
    /// with the parent and child already selected).  Placeholder, disabled
    /// and sentinel entries are skipped; nothing is re-rendered.
    pub fn adopt(&mut self, parent_id: &str, existing: Vec<ChoiceOption>) {
        if parent_id.is_empty() {
            self.state = CascadeState::Empty;
            return;
        }
        let options = existing
            .into_iter()
            .filter(|o| !o.disabled && !o.id.is_empty())
            .filter(|o| !(self.prepend_none && o.id == NONE_OPTION_VALUE))
            .collect();
        self.state = CascadeState::Populated { parent_id: parent_id.to_string(), options };
    }

    /// Parent id of the load `seq` if it is still the current one.  Replies
    /// to superseded requests are dropped here, so a slow response for an
    /// earlier parent can never overwrite a newer list.
    fn take_pending(&self, seq: u64) -> Option<String> {
        match &self.state {
            CascadeState::Loading { parent_id, seq: current } if *current == seq => Some(parent_id.clone()),
            _ => {
                crate::debug_log!("dropping stale {:?} response #{}", self.kind, seq);
                None
            }
        }
    }

    /// Child `<select>` enabled?
    pub fn child_enabled(&self) -> bool {
        !matches!(self.state, CascadeState::Empty)
    }

    /// "Add new child" button enabled?  Same rule as the child control.
    pub fn add_enabled(&self) -> bool {
        self.child_enabled()
    }

    /// The full option list the child control should show, placeholder first.
    /// The placeholder is always disabled so it can never be submitted.
    pub fn rendered_options(&self) -> Vec<ChoiceOption> {
        let placeholder = ChoiceOption::disabled("", self.kind.placeholder());
        match &self.state {
            CascadeState::Empty | CascadeState::Loading { .. } => vec![placeholder],
            CascadeState::Error { .. } => vec![ChoiceOption::disabled("", self.kind.error_text())],
            CascadeState::Populated { options, .. } if options.is_empty() => {
                vec![placeholder, ChoiceOption::disabled("", self.kind.empty_text())]
            }
            CascadeState::Populated { options, .. } => {
                let mut out = Vec::with_capacity(options.len() + 2);
                out.push(placeholder);
                if self.prepend_none {
                    out.push(ChoiceOption::new(NONE_OPTION_VALUE, self.kind.none_text()));
                }
                out.extend(options.iter().cloned());
                out
            }
        }
    }
}
