//! Player identity
//!
//! The host platform may hand us a user; when it doesn't, a local test
//! identity is derived from the session seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// A player as known to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            first_name: None,
            username: None,
        }
    }

    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn with_username(mut self, name: impl Into<String>) -> Self {
        self.username = Some(name.into());
        self
    }

    /// Name shown on the leaderboard: first name, then username, then `user-<id>`
    pub fn display_name(&self) -> String {
        [&self.first_name, &self.username]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| format!("user-{}", self.id))
    }

    /// Identity used when the host provides none
    pub fn local_fallback(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let n: u32 = rng.random_range(0..10_000);
        Self::new(format!("local_test_{n}"))
            .with_first_name("Test")
            .with_username("localuser")
    }
}

/// Source of the current user (host platform session)
pub trait IdentityProvider {
    fn current_user(&self) -> Option<Identity>;
}

/// Provider with no user; always falls back to the local identity
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<Identity> {
        None
    }
}

/// Provider with a fixed, known user
#[derive(Debug, Clone)]
pub struct FixedIdentity(pub Identity);

impl IdentityProvider for FixedIdentity {
    fn current_user(&self) -> Option<Identity> {
        Some(self.0.clone())
    }
}

/// Current user, or the deterministic local fallback
pub fn resolve_identity(provider: &dyn IdentityProvider, seed: u64) -> Identity {
    match provider.current_user() {
        Some(user) => user,
        None => {
            let user = Identity::local_fallback(seed);
            log::info!("No platform user, playing as {}", user.id);
            user
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_precedence() {
        let user = Identity::new("42")
            .with_first_name("Ada")
            .with_username("ada99");
        assert_eq!(user.display_name(), "Ada");

        let user = Identity::new("42").with_username("ada99");
        assert_eq!(user.display_name(), "ada99");

        let user = Identity::new("42").with_first_name("  ");
        assert_eq!(user.display_name(), "user-42");
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let a = resolve_identity(&Anonymous, 1234);
        let b = resolve_identity(&Anonymous, 1234);
        assert_eq!(a, b);
        assert!(a.id.starts_with("local_test_"));
        assert_eq!(a.display_name(), "Test");
    }

    #[test]
    fn test_provider_user_wins() {
        let user = Identity::new("7").with_first_name("Bo");
        let resolved = resolve_identity(&FixedIdentity(user.clone()), 1);
        assert_eq!(resolved, user);
    }
}
