//! Conversational front end.
//!
//! A trigger phrase bound to one repository opens a [`Conversation`], which
//! asks a single question until the reply is `feature` or `bugfix`. Only a
//! confirmed conversation reaches the release pipeline.

mod controller;
mod trigger;

pub use controller::{ConversationController, ConversationOutcome, Reporter};
pub use trigger::{TriggerBinding, find_trigger};

use crate::ReleaseType;
use regex::Regex;
use std::sync::LazyLock;

/// Question asked until a valid release type is given
pub const RELEASE_TYPE_PROMPT: &str = "Is this a feature or a bugfix release? (feature|bugfix)";

static RELEASE_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(feature|bugfix)\s*$").expect("release type regex is valid")
});

impl ReleaseType {
    /// Parse a conversational reply; anything but `feature` or `bugfix` is `None`
    pub fn parse_reply(reply: &str) -> Option<Self> {
        let caps = RELEASE_TYPE_RE.captures(reply)?;
        match caps[1].to_ascii_lowercase().as_str() {
            "feature" => Some(ReleaseType::Feature),
            "bugfix" => Some(ReleaseType::Bugfix),
            _ => None,
        }
    }
}

/// States of the release-type exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Waiting for a `feature|bugfix` reply
    AwaitingReleaseType,
    /// A valid reply was received
    Confirmed(ReleaseType),
    /// The exchange ended without a valid reply
    Cancelled,
}

/// One release-type exchange
#[derive(Debug, Clone)]
pub struct Conversation {
    state: ConversationState,
    prompts: usize,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    /// Start awaiting a release type
    pub fn new() -> Self {
        Self {
            state: ConversationState::AwaitingReleaseType,
            prompts: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> ConversationState {
        self.state
    }

    /// Number of times the question has been asked
    pub fn prompts(&self) -> usize {
        self.prompts
    }

    /// Question to show, `None` once the exchange has left the awaiting state
    pub fn prompt(&mut self) -> Option<&'static str> {
        match self.state {
            ConversationState::AwaitingReleaseType => {
                self.prompts += 1;
                Some(RELEASE_TYPE_PROMPT)
            }
            _ => None,
        }
    }

    /// Feed a reply. Only a match leaves the awaiting state.
    pub fn on_reply(&mut self, reply: &str) -> ConversationState {
        if self.state == ConversationState::AwaitingReleaseType
            && let Some(release_type) = ReleaseType::parse_reply(reply)
        {
            self.state = ConversationState::Confirmed(release_type);
        }
        self.state
    }

    /// The exchange ended; an unanswered conversation is cancelled
    pub fn on_end(&mut self) -> ConversationState {
        if self.state == ConversationState::AwaitingReleaseType {
            self.state = ConversationState::Cancelled;
        }
        self.state
    }
}
