//! Setup-progress reducer for the one-time installation page.
//!
//! The server does all the work in a single `POST /setup_api`; the page then
//! replays a fixed list of steps so the operator sees what was created.  The
//! reducer tracks where that replay is and what the progress bar, current
//! operation label and log should show.

use crate::models::SetupOutcome;

/// Steps replayed after a successful setup, with the bar percentage each one
/// moves to.
pub const SETUP_OPERATIONS: [(&str, u8); 10] = [
    ("إنشاء جداول قاعدة البيانات", 10),
    ("إعداد جدول المستخدمين", 20),
    ("إنشاء حسابات المستخدمين الافتراضية", 30),
    ("إعداد جدول الأولويات", 40),
    ("إعداد جدول حالات البلاغات", 50),
    ("إعداد جدول التصنيفات والتصنيفات الفرعية", 60),
    ("إعداد جدول الإدارات والأقسام", 70),
    ("إنشاء بيانات تجريبية", 80),
    ("تهيئة مجلد المرفقات", 90),
    ("اكتمال الإعداد", 100),
];

const MSG_START: &str = "بدء عملية إعداد قاعدة البيانات...";
const MSG_CONNECTING: &str = "جاري الاتصال بالخادم...";
const MSG_DONE: &str = "اكتمل الإعداد بنجاح";
const MSG_DONE_LOG: &str = "تم إكمال عملية الإعداد بنجاح!";
const MSG_ALREADY: &str = "تم الإعداد مسبقاً";
const MSG_FAILED: &str = "فشل الإعداد";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

impl LogLevel {
    pub fn as_class(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "success",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupPhase {
    Idle,
    Connecting,
    /// Replaying `SETUP_OPERATIONS[index]`.
    Replaying { index: usize },
    /// All steps shown (or nothing to do); completion panel pending/visible.
    Complete,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetupMsg {
    Start,
    ServerReplied(Result<SetupOutcome, String>),
    /// The current replay step finished.
    StepDone,
    Retry,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupCommand {
    CallServer,
    Log(String, LogLevel),
    /// Wait a random 0.5–1.5 s, then send `StepDone`.
    ScheduleStepDone,
    /// Show the completion panel after a short pause.
    RevealComplete,
    RevealError(String),
    HideError,
    Render,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupState {
    pub phase: SetupPhase,
    pub percent: u8,
    pub operation: String,
}

impl Default for SetupState {
    fn default() -> Self {
        Self { phase: SetupPhase::Idle, percent: 0, operation: String::new() }
    }
}

impl SetupState {
    pub fn update(&mut self, msg: SetupMsg) -> Vec<SetupCommand> {
        match msg {
            SetupMsg::Start => {
                self.phase = SetupPhase::Connecting;
                self.percent = 5;
                self.operation = MSG_CONNECTING.to_string();
                vec![
                    SetupCommand::Log(MSG_START.to_string(), LogLevel::Info),
                    SetupCommand::Render,
                    SetupCommand::CallServer,
                ]
            }
            SetupMsg::ServerReplied(_) if self.phase != SetupPhase::Connecting => Vec::new(),
            SetupMsg::ServerReplied(Ok(SetupOutcome::Completed)) => self.enter_step(0),
            SetupMsg::ServerReplied(Ok(SetupOutcome::AlreadyDone(message))) => {
                self.phase = SetupPhase::Complete;
                self.percent = 100;
                self.operation = MSG_ALREADY.to_string();
                vec![
                    SetupCommand::Log(message, LogLevel::Info),
                    SetupCommand::Render,
                    SetupCommand::RevealComplete,
                ]
            }
            SetupMsg::ServerReplied(Err(message)) => {
                self.phase = SetupPhase::Failed(message.clone());
                self.percent = 100;
                self.operation = MSG_FAILED.to_string();
                vec![
                    SetupCommand::Log(format!("{}: {}", MSG_FAILED, message), LogLevel::Error),
                    SetupCommand::RevealError(message),
                    SetupCommand::Render,
                ]
            }
            SetupMsg::StepDone => match self.phase {
                SetupPhase::Replaying { index } => {
                    let (name, _) = SETUP_OPERATIONS[index];
                    let mut cmds = vec![SetupCommand::Log(format!("تم {} بنجاح.", name), LogLevel::Success)];
                    if index + 1 < SETUP_OPERATIONS.len() {
                        cmds.extend(self.enter_step(index + 1));
                    } else {
                        self.phase = SetupPhase::Complete;
                        self.percent = 100;
                        self.operation = MSG_DONE.to_string();
                        cmds.push(SetupCommand::Render);
                        cmds.push(SetupCommand::Log(MSG_DONE_LOG.to_string(), LogLevel::Success));
                        cmds.push(SetupCommand::RevealComplete);
                    }
                    cmds
                }
                _ => Vec::new(),
            },
            SetupMsg::Retry => {
                let mut cmds = vec![SetupCommand::HideError];
                self.percent = 0;
                cmds.extend(self.update(SetupMsg::Start));
                cmds
            }
        }
    }

    fn enter_step(&mut self, index: usize) -> Vec<SetupCommand> {
        let (name, percent) = SETUP_OPERATIONS[index];
        self.phase = SetupPhase::Replaying { index };
        self.percent = percent;
        self.operation = name.to_string();
        vec![
            SetupCommand::Render,
            SetupCommand::Log(format!("جاري {}...", name), LogLevel::Info),
            SetupCommand::ScheduleStepDone,
        ]
    }

    /// Bootstrap classes for the progress bar.
    pub fn bar_class(&self) -> &'static str {
        if matches!(self.phase, SetupPhase::Failed(_)) {
            return "progress-bar bg-danger";
        }
        progress_bar_class(self.percent)
    }
}

/// Colour ramp: info below 30 %, primary below 70 %, warning below 100 %,
/// solid success at 100 %.
pub fn progress_bar_class(percent: u8) -> &'static str {
    match percent {
        0..=29 => "progress-bar progress-bar-striped progress-bar-animated bg-info",
        30..=69 => "progress-bar progress-bar-striped progress-bar-animated bg-primary",
        70..=99 => "progress-bar progress-bar-striped progress-bar-animated bg-warning",
        _ => "progress-bar progress-bar-striped bg-success",
    }
}
