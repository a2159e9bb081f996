//! Chat trigger phrases bound to fixed repositories.

use serde::Deserialize;

/// A phrase that starts a release of one repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerBinding {
    /// Message that starts the conversation (case-insensitive, surrounding whitespace ignored)
    pub phrase: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

impl TriggerBinding {
    /// Create a binding
    pub fn new(phrase: impl Into<String>, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Whether `message` is this binding's phrase
    pub fn matches(&self, message: &str) -> bool {
        message.trim().eq_ignore_ascii_case(self.phrase.trim())
    }
}

/// First binding whose phrase is `message`
pub fn find_trigger<'a>(bindings: &'a [TriggerBinding], message: &str) -> Option<&'a TriggerBinding> {
    bindings.iter().find(|binding| binding.matches(message))
}
