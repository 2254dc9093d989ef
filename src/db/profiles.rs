use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{UserIdentity, UserProfile};

/// Read-only access to user profile records.
///
/// A missing profile is `Ok(None)`, a distinct outcome from transport
/// errors, so callers can tell "this user does not exist" apart from
/// "the store is unreachable".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for an identity. At most one record matches.
    async fn find_by_identity(&self, identity: &UserIdentity) -> AppResult<Option<UserProfile>>;
}

/// Profile store backed by the `users` table in PostgreSQL.
#[derive(Clone)]
pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn find_by_identity(&self, identity: &UserIdentity) -> AppResult<Option<UserProfile>> {
        // Identities are normalized to lowercase before they reach this
        // layer; the index on LOWER(wallet_address) keeps the comparison
        // case-insensitive on the stored side too.
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, username, email, wallet_address, tier, interests, created_at
            FROM users
            WHERE LOWER(wallet_address) = $1
            "#,
        )
        .bind(identity.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }
}
