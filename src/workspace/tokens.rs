//! Unique attempt tokens.

use std::fmt::Debug;
use uuid::Uuid;

/// Source of workspace tokens.
///
/// Implementations must return pairwise-distinct values across concurrent callers.
pub trait TokenGenerator: Debug + Send + Sync {
    /// Produce a fresh token usable as a single path component
    fn next_token(&self) -> String;
}

/// Random v4 UUID tokens in simple (hyphen-free) form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenGenerator for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_tokens_are_distinct_path_components() {
        let tokens = UuidTokens;
        let drawn: HashSet<String> = (0..1000).map(|_| tokens.next_token()).collect();
        assert_eq!(drawn.len(), 1000);
        assert!(drawn.iter().all(|t| t.len() == 32 && !t.contains('/')));
    }
}
