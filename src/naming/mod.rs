//! Unique human-readable release names.
//!
//! Names are `<adjective>-<animal>` pairs drawn at random and checked against
//! the hosting service's existing releases for the repository.

mod words;

use crate::error::{NamingError, Result};
use crate::github::ReleaseHost;
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::future::Future;

pub use words::{ADJECTIVES, ANIMALS};

/// Supplies a release name unused by any prior release of the repository
pub trait ReleaseNamer {
    /// Pick an unused name for `owner/repo`
    fn unique_name(&self, owner: &str, repo: &str) -> impl Future<Output = Result<String>>;
}

/// Draws names from the built-in word lists
#[derive(Debug, Clone)]
pub struct WordListNamer<H> {
    host: H,
    max_attempts: usize,
}

impl<H> WordListNamer<H> {
    /// Default number of draws before giving up
    pub const DEFAULT_ATTEMPTS: usize = 64;

    /// Namer checking uniqueness against `host`
    pub fn new(host: H) -> Self {
        Self {
            host,
            max_attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Override the number of draws
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }
}

impl<H: ReleaseHost> ReleaseNamer for WordListNamer<H> {
    async fn unique_name(&self, owner: &str, repo: &str) -> Result<String> {
        let existing: HashSet<String> = self
            .host
            .list_release_names(owner, repo)
            .await?
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();

        let name = pick_unused(&mut rand::rng(), &existing, self.max_attempts)?;
        log::info!("Picked release name '{}' for {}/{}", name, owner, repo);
        Ok(name)
    }
}

/// Draw up to `attempts` names, returning the first absent from `existing`
pub fn pick_unused<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &HashSet<String>,
    attempts: usize,
) -> std::result::Result<String, NamingError> {
    for _ in 0..attempts {
        let (Some(adjective), Some(animal)) = (ADJECTIVES.choose(rng), ANIMALS.choose(rng)) else {
            break;
        };
        let candidate = format!("{adjective}-{animal}");
        if !existing.contains(&candidate) {
            return Ok(candidate);
        }
    }
    Err(NamingError::Exhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn names_are_adjective_animal_pairs() {
        let mut rng = StdRng::seed_from_u64(7);
        let name = pick_unused(&mut rng, &HashSet::new(), 1).unwrap();
        let (adjective, animal) = name.split_once('-').unwrap();
        assert!(ADJECTIVES.contains(&adjective));
        assert!(ANIMALS.contains(&animal));
    }

    #[test]
    fn used_names_are_skipped() {
        let mut rng = StdRng::seed_from_u64(42);
        let first = pick_unused(&mut rng, &HashSet::new(), 1).unwrap();

        // Replaying the same seed must step past the taken name
        let mut rng = StdRng::seed_from_u64(42);
        let existing = HashSet::from([first.clone()]);
        let second = pick_unused(&mut rng, &existing, 64).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn exhausting_every_name_fails() {
        let everything: HashSet<String> = ADJECTIVES
            .iter()
            .flat_map(|a| ANIMALS.iter().map(move |b| format!("{a}-{b}")))
            .collect();
        let mut rng = StdRng::seed_from_u64(1);
        let err = pick_unused(&mut rng, &everything, 16).unwrap_err();
        assert!(matches!(err, NamingError::Exhausted { attempts: 16 }));
    }
}
