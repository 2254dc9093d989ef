use crate::error::AppResult;
use crate::models::{Recommendation, RecommendationSet, UserProfile};

/// Produces an ordered recommendation set for a profile snapshot.
///
/// Implementations must be pure with respect to caching: no awareness of
/// the cache layer, safe to invoke repeatedly for the same profile, and
/// stable enough per snapshot that caching the output for a TTL window is
/// meaningful.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationEngine: Send + Sync {
    async fn compute(&self, profile: &UserProfile) -> AppResult<RecommendationSet>;
}

/// One entry in the recommendable catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub item_id: String,
    pub title: String,
    pub tags: Vec<String>,
    /// Baseline score before personalization.
    pub popularity: f64,
}

/// Content-based engine over a fixed catalog.
///
/// Scores each catalog entry by overlap between its tags and the profile's
/// interests, boosted by subscription tier, then returns the top entries
/// best-first. Fully deterministic for a given profile: ties break on
/// `item_id` so repeated invocations produce identical output.
pub struct CatalogEngine {
    catalog: Vec<CatalogEntry>,
    limit: usize,
}

const INTEREST_MATCH_WEIGHT: f64 = 1.0;

impl CatalogEngine {
    pub fn new(catalog: Vec<CatalogEntry>, limit: usize) -> Self {
        Self { catalog, limit }
    }

    /// Engine over the built-in starter catalog.
    pub fn with_default_catalog(limit: usize) -> Self {
        Self::new(default_catalog(), limit)
    }

    fn tier_multiplier(tier: Option<&str>) -> f64 {
        match tier {
            Some("gold") => 1.5,
            Some("silver") => 1.2,
            _ => 1.0,
        }
    }

    fn score(&self, entry: &CatalogEntry, profile: &UserProfile) -> f64 {
        let matches = entry
            .tags
            .iter()
            .filter(|tag| profile.interests.iter().any(|i| i == *tag))
            .count() as f64;

        (entry.popularity + matches * INTEREST_MATCH_WEIGHT)
            * Self::tier_multiplier(profile.tier.as_deref())
    }
}

#[async_trait::async_trait]
impl RecommendationEngine for CatalogEngine {
    async fn compute(&self, profile: &UserProfile) -> AppResult<RecommendationSet> {
        let mut scored: Vec<(f64, &CatalogEntry)> = self
            .catalog
            .iter()
            .map(|entry| (self.score(entry, profile), entry))
            .collect();

        scored.sort_by(|(score_a, entry_a), (score_b, entry_b)| {
            score_b
                .partial_cmp(score_a)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| entry_a.item_id.cmp(&entry_b.item_id))
        });

        Ok(scored
            .into_iter()
            .take(self.limit)
            .map(|(score, entry)| Recommendation {
                item_id: entry.item_id.clone(),
                title: entry.title.clone(),
                score,
            })
            .collect())
    }
}

fn default_catalog() -> Vec<CatalogEntry> {
    let entries = [
        ("aurora-markets", "Aurora Markets", vec!["defi", "trading"], 0.9),
        ("nebula-quest", "Nebula Quest", vec!["gaming", "nft"], 0.8),
        ("mintline", "Mintline", vec!["nft", "art"], 0.7),
        ("chainbeat", "Chainbeat", vec!["music", "nft"], 0.6),
        ("ledgerlens", "LedgerLens", vec!["analytics", "defi"], 0.6),
        ("orbit-social", "Orbit Social", vec!["social"], 0.5),
        ("stakehouse", "Stakehouse", vec!["defi", "staking"], 0.5),
        ("pixelforge", "PixelForge", vec!["gaming", "art"], 0.4),
    ];

    entries
        .into_iter()
        .map(|(item_id, title, tags, popularity)| CatalogEntry {
            item_id: item_id.to_string(),
            title: title.to_string(),
            tags: tags.into_iter().map(str::to_string).collect(),
            popularity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn profile(tier: Option<&str>, interests: &[&str]) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            username: "tester".to_string(),
            email: "tester@example.com".to_string(),
            wallet_address: "0xabc".to_string(),
            tier: tier.map(str::to_string),
            interests: interests.iter().map(|i| i.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_interest_overlap_outranks_popularity() {
        let engine = CatalogEngine::with_default_catalog(10);
        let recs = engine.compute(&profile(None, &["music"])).await.unwrap();

        // "chainbeat" has modest popularity but matches the only interest
        assert_eq!(recs[0].item_id, "chainbeat");
    }

    #[tokio::test]
    async fn test_output_is_deterministic_per_profile() {
        let engine = CatalogEngine::with_default_catalog(10);
        let p = profile(Some("gold"), &["defi", "nft"]);

        let first = engine.compute(&p).await.unwrap();
        let second = engine.compute(&p).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_limit_caps_result_size() {
        let engine = CatalogEngine::with_default_catalog(3);
        let recs = engine.compute(&profile(None, &[])).await.unwrap();
        assert_eq!(recs.len(), 3);
    }

    #[tokio::test]
    async fn test_results_are_ordered_best_first() {
        let engine = CatalogEngine::with_default_catalog(10);
        let recs = engine.compute(&profile(Some("gold"), &["defi"])).await.unwrap();

        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[tokio::test]
    async fn test_tier_scales_scores_not_order() {
        let engine = CatalogEngine::with_default_catalog(10);

        let base = engine.compute(&profile(None, &["gaming"])).await.unwrap();
        let gold = engine
            .compute(&profile(Some("gold"), &["gaming"]))
            .await
            .unwrap();

        let base_order: Vec<_> = base.iter().map(|r| &r.item_id).collect();
        let gold_order: Vec<_> = gold.iter().map(|r| &r.item_id).collect();
        assert_eq!(base_order, gold_order);
        assert!(gold[0].score > base[0].score);
    }
}
