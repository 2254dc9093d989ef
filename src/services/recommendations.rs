use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::db::redis::cache::{CacheKey, RecommendationCache};
use crate::db::ProfileStore;
use crate::error::ComputeError;
use crate::models::{RecommendationSet, UserIdentity};
use crate::services::RecommendationEngine;

type FlightResult = Result<RecommendationSet, ComputeError>;
type FlightReceiver = watch::Receiver<Option<FlightResult>>;

/// Cache-aside orchestration for recommendation serving.
///
/// Per request: cache lookup → on hit, return immediately → on miss, resolve
/// the profile, run the engine, populate the cache best-effort, return the
/// fresh set. Concurrent misses for the same identity are coalesced into a
/// single computation whose outcome (success or failure) every waiter
/// receives; misses for distinct identities proceed fully in parallel.
///
/// Collaborators are injected behind traits so the service can be exercised
/// with substitute adapters.
#[derive(Clone)]
pub struct RecommendationService {
    cache: Arc<dyn RecommendationCache>,
    profiles: Arc<dyn ProfileStore>,
    engine: Arc<dyn RecommendationEngine>,
    cache_ttl_secs: u64,
    /// One entry per identity with a computation in flight. The lock guards
    /// only registry mutation, never the computation itself.
    in_flight: Arc<Mutex<HashMap<UserIdentity, FlightReceiver>>>,
}

impl RecommendationService {
    pub fn new(
        cache: Arc<dyn RecommendationCache>,
        profiles: Arc<dyn ProfileStore>,
        engine: Arc<dyn RecommendationEngine>,
        cache_ttl_secs: u64,
    ) -> Self {
        Self {
            cache,
            profiles,
            engine,
            cache_ttl_secs,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the recommendation set for `identity` and whether it was
    /// served from cache.
    ///
    /// The fast path is a single cache read: a hit touches neither the
    /// profile store nor the engine.
    pub async fn get_recommendations(
        &self,
        identity: &UserIdentity,
    ) -> Result<(RecommendationSet, bool), ComputeError> {
        let key = CacheKey::Recommendations(identity.clone());

        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(%identity, "Serving recommendations from cache");
            return Ok((cached, true));
        }

        let set = self.compute_coalesced(identity).await?;
        Ok((set, false))
    }

    /// Joins the in-flight computation for `identity`, starting one if none
    /// exists.
    async fn compute_coalesced(&self, identity: &UserIdentity) -> FlightResult {
        let mut rx = {
            let mut in_flight = self.in_flight.lock().await;

            if let Some(rx) = in_flight.get(identity) {
                tracing::debug!(%identity, "Joining in-flight recommendation computation");
                rx.clone()
            } else {
                let (tx, rx) = watch::channel(None);
                in_flight.insert(identity.clone(), rx.clone());

                let service = self.clone();
                let identity = identity.clone();

                // The computation runs detached from any caller: a waiter
                // disconnecting or timing out must not cancel the work that
                // remaining waiters and the cache write depend on.
                tokio::spawn(async move {
                    let outcome = service.compute_fresh(&identity).await;

                    // Deregister before publishing: callers arriving from
                    // here on re-check the cache and start a fresh flight,
                    // rather than observing a finished one.
                    service.in_flight.lock().await.remove(&identity);
                    let _ = tx.send(Some(outcome));
                });

                rx
            }
        };

        loop {
            if let Some(outcome) = rx.borrow_and_update().clone() {
                return outcome;
            }
            if rx.changed().await.is_err() {
                // Leader dropped without publishing (runtime teardown).
                return Err(ComputeError::EngineFailure(
                    "recommendation computation aborted".to_string(),
                ));
            }
        }
    }

    /// The flight leader's work: profile lookup → engine → cache populate.
    async fn compute_fresh(&self, identity: &UserIdentity) -> FlightResult {
        let profile = self
            .profiles
            .find_by_identity(identity)
            .await
            .map_err(|e| {
                tracing::error!(%identity, error = %e, "Profile lookup failed");
                ComputeError::UpstreamUnavailable(e.to_string())
            })?
            .ok_or(ComputeError::UserNotFound)?;

        let set = self.engine.compute(&profile).await.map_err(|e| {
            tracing::error!(%identity, error = %e, "Recommendation engine failed");
            ComputeError::EngineFailure(e.to_string())
        })?;

        let key = CacheKey::Recommendations(identity.clone());
        if let Err(e) = self
            .cache
            .set(&key, &set, self.cache_ttl_secs)
            .await
        {
            tracing::warn!(%identity, error = %e, "Cache write failed, serving freshly computed set");
        }

        Ok(set)
    }
}
