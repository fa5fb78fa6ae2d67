// ============================================
// Async Match Service
// ============================================
//
// Catalog scans block on file I/O, so engine calls run on tokio's blocking
// pool. User preferences come from the PreferenceStore.

use super::engine::MatchEngine;
use super::matcher::MatchMask;
use super::preferences::{PreferenceStore, PreferenceSummary};
use crate::config::{LimitsConfig, PreferencesConfig};
use crate::error::Result;
use crate::models::{MatchedItem, UserId};
use crate::utils::clamp_limit;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

#[derive(Clone)]
pub struct MatchService {
    engine: Arc<MatchEngine>,
    preferences: Arc<PreferenceStore>,
    limits: LimitsConfig,
    summary_top_n: usize,
}

impl MatchService {
    pub fn new(
        engine: Arc<MatchEngine>,
        preferences: Arc<PreferenceStore>,
        limits: LimitsConfig,
        preferences_config: &PreferencesConfig,
    ) -> Self {
        Self {
            engine,
            preferences,
            limits,
            summary_top_n: preferences_config.top_n,
        }
    }

    pub fn engine(&self) -> &Arc<MatchEngine> {
        &self.engine
    }

    pub async fn match_anonymous(&self, mask: MatchMask, limit: Option<i64>) -> Result<Vec<MatchedItem>> {
        let limit = clamp_limit(limit, &self.limits);
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.match_anonymous(&mask, limit)).await?
    }

    /// Personalized matches for an authenticated user.
    pub async fn recommend(&self, user_id: UserId, limit: Option<i64>) -> Result<Vec<MatchedItem>> {
        let start = Instant::now();
        let limit = clamp_limit(limit, &self.limits);
        let preferences = self.preferences.preferences(user_id).await?;

        let engine = self.engine.clone();
        let items =
            tokio::task::spawn_blocking(move || engine.recommend(&preferences, limit)).await??;

        info!(
            user_id,
            limit,
            returned = items.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Recommendations served"
        );

        Ok(items)
    }

    pub async fn match_random(&self) -> Result<Option<MatchedItem>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.match_random()).await?
    }

    pub async fn preference_summary(&self, user_id: UserId) -> Result<PreferenceSummary> {
        self.preferences.summary(user_id, self.summary_top_n).await
    }

    /// Drop the cached preferences of `user_id` after a new interaction.
    pub fn interactions_changed(&self, user_id: UserId) {
        self.preferences.invalidate(user_id);
    }
}
