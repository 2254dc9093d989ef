use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Stable external identifier for an authenticated user (e.g. a wallet address).
///
/// Construction goes through [`UserIdentity::parse`], which normalizes the
/// raw value once at the boundary. Profile lookups, cache keys and the
/// in-flight registry all see the same normalized form, so differently cased
/// spellings of one wallet address can never fork into separate cache
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity(String);

impl UserIdentity {
    /// Parses a raw identity value. Trims surrounding whitespace and
    /// lowercases (wallet addresses are case-insensitive). Returns `None`
    /// for empty input: an empty identity is an authentication failure
    /// upstream, never a valid key.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user's profile record as returned by the profile store.
///
/// The serving core holds this only for the duration of one cache-miss
/// request; the recommendation engine is the sole consumer of its attributes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub wallet_address: String,
    /// Subscription tier, e.g. "gold". Absent for unranked accounts.
    pub tier: Option<String>,
    /// Interest tags the user selected at onboarding.
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A single recommended item, scored and ready to serve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub item_id: String,
    pub title: String,
    pub score: f64,
}

/// An ordered (best-first) recommendation set produced by the engine for one
/// profile snapshot. Immutable once produced; cached and returned as-is.
pub type RecommendationSet = Vec<Recommendation>;
