//! Lifecycle Module
//!
//! The single-request state machine and its countdown.

mod controller;
mod countdown;

pub use controller::{RequestController, RequestHandle, Resolution, SubmitOutcome};
pub use countdown::{Countdown, DEFAULT_COUNTDOWN_SECS};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    Generating,
    Cancelling,
    Cancelled,
}

impl RequestState {
    /// A new request may only start from a settled state
    pub fn accepts_submit(&self) -> bool {
        matches!(self, RequestState::Idle | RequestState::Cancelled)
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::Generating | RequestState::Cancelling)
    }
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestState::Idle => write!(f, "idle"),
            RequestState::Generating => write!(f, "generating"),
            RequestState::Cancelling => write!(f, "cancelling"),
            RequestState::Cancelled => write!(f, "cancelled"),
        }
    }
}
