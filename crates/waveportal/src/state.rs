use crate::WaveRecord;
use alloy_primitives::Address;
use serde::Serialize;
use std::fmt;

/// Whether a `wave` write is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

/// A user-visible notice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// No wallet provider is available.
    InstallWallet,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstallWallet => f.write_str("Get a wallet! No wallet provider was found."),
        }
    }
}

/// Everything the page shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub current_account: Option<Address>,
    pub total_wave_count: u64,
    pub pending_message: String,
    /// Historical waves followed by live ones, in arrival order.
    pub wave_history: Vec<WaveRecord>,
    pub submit: SubmitState,
    pub notice: Option<Notice>,
}

/// A state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    AccountChanged(Option<Address>),
    TotalWaves(u64),
    PendingMessage(String),
    HistoryLoaded(Vec<WaveRecord>),
    HistoryReset,
    WaveReceived(WaveRecord),
    SubmitStarted,
    SubmitSettled,
    Notice(Notice),
    DismissNotice,
}

impl ViewState {
    pub fn is_connected(&self) -> bool {
        self.current_account.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submit == SubmitState::Submitting
    }

    /// Applies `action`.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::AccountChanged(account) => self.current_account = account,
            Action::TotalWaves(total) => self.total_wave_count = total,
            Action::PendingMessage(message) => self.pending_message = message,
            Action::HistoryLoaded(records) => self.wave_history = records,
            Action::HistoryReset => self.wave_history.clear(),
            Action::WaveReceived(record) => self.wave_history.push(record),
            Action::SubmitStarted => self.submit = SubmitState::Submitting,
            Action::SubmitSettled => self.submit = SubmitState::Idle,
            Action::Notice(notice) => self.notice = Some(notice),
            Action::DismissNotice => self.notice = None,
        }
    }
}
