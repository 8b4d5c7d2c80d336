//! All possible UI actions. Actions are the sole mechanism for state mutation.

use outreach_core::{Campaign, LinkedInProfile, LinkedinResult, QueryState, Submission};

use crate::screen::ScreenId;

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Every state transition in the TUI is expressed as an Action.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Data (from the console's query cache) ─────────────────────
    CampaignsUpdated(QueryState<Vec<Campaign>>),
    LatestResultsUpdated(QueryState<Vec<LinkedinResult>>),
    /// Mark every cached read stale and refetch.
    Refresh,

    // ── Campaign commands ─────────────────────────────────────────
    SubmitCampaign(Submission),
    DeleteCampaign { id: String, name: String },
    ToggleCampaignStatus(Campaign),

    // ── Leads ─────────────────────────────────────────────────────
    SearchLeads { url: String, count: Option<u32> },
    /// Number of profiles the scrape returned, or the failure text.
    LeadSearchFinished(Result<usize, String>),

    // ── Message generator ─────────────────────────────────────────
    GenerateMessage(LinkedInProfile),
    MessageGenerated(Result<String, String>),
    CopyToClipboard(String),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}

impl Action {
    /// Data and request results go to every screen, not just the visible one,
    /// so a screen switched away from still clears its busy state.
    pub fn is_broadcast(&self) -> bool {
        matches!(
            self,
            Self::Tick
                | Self::CampaignsUpdated(_)
                | Self::LatestResultsUpdated(_)
                | Self::LeadSearchFinished(_)
                | Self::MessageGenerated(_)
        )
    }
}
