use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::UserIdentity;

/// Header carrying the identity resolved by the fronting authentication
/// layer. The serving core trusts this value; verifying the credential that
/// produced it is the auth collaborator's job.
pub const WALLET_ADDRESS_HEADER: &str = "x-wallet-address";

/// Extractor for the authenticated user's identity.
///
/// Rejects with 401 `UNAUTHORIZED` when the header is missing, empty, or
/// unreadable, before the handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(WALLET_ADDRESS_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(UserIdentity::parse)
            .map(AuthenticatedUser)
            .ok_or(AppError::Unauthenticated)
    }
}
