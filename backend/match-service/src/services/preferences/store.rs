use super::{PreferenceAggregator, PreferenceCounter, PreferenceSummary};
use crate::error::Result;
use crate::models::{Attribute, Interaction, UserId};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Read-only access to the persisted interaction history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InteractionSource: Send + Sync {
    /// Interactions of `user_id`, oldest first.
    async fn interactions(&self, user_id: UserId) -> Result<Vec<Interaction>>;

    /// Gender from the user's profile, if one was given.
    async fn profile_gender(&self, user_id: UserId) -> Result<Option<String>>;
}

/// Per-user preference counters, rebuilt from the interaction source on a
/// miss. Callers must `invalidate` a user after recording an interaction.
///
/// Each user carries a generation bumped by `invalidate` and `clear`. A
/// rebuild only lands in the cache if the generation it started from is
/// still current, so an invalidation racing an in-flight rebuild wins.
pub struct PreferenceStore {
    source: Arc<dyn InteractionSource>,
    aggregator: PreferenceAggregator,
    cache: DashMap<UserId, Arc<PreferenceCounter>>,
    generations: DashMap<UserId, u64>,
}

impl PreferenceStore {
    pub fn new(source: Arc<dyn InteractionSource>, aggregator: PreferenceAggregator) -> Self {
        Self {
            source,
            aggregator,
            cache: DashMap::new(),
            generations: DashMap::new(),
        }
    }

    pub async fn preferences(&self, user_id: UserId) -> Result<Arc<PreferenceCounter>> {
        if let Some(cached) = self.cached(user_id) {
            debug!(user_id, "Preference cache hit");
            return Ok(cached);
        }

        let generation = *self.generations.entry(user_id).or_insert(0);

        let interactions = self.source.interactions(user_id).await?;
        let gender = self.source.profile_gender(user_id).await?;

        let mut counter = self.aggregator.aggregate(&interactions);
        if let Some(gender) = gender {
            counter.add(Attribute::Gender, &gender, 1);
        }

        info!(
            user_id,
            interactions = interactions.len(),
            attributes = counter.attributes().count(),
            "Aggregated user preferences"
        );

        let counter = Arc::new(counter);
        self.store_if_current(user_id, generation, &counter);
        Ok(counter)
    }

    pub async fn summary(&self, user_id: UserId, top_n: usize) -> Result<PreferenceSummary> {
        Ok(self.preferences(user_id).await?.summary(top_n))
    }

    pub fn invalidate(&self, user_id: UserId) {
        *self.generations.entry(user_id).or_insert(0) += 1;
        self.cache.remove(&user_id);
    }

    pub fn clear(&self) {
        for mut generation in self.generations.iter_mut() {
            *generation += 1;
        }
        self.cache.clear();
    }

    pub fn cached_users(&self) -> usize {
        self.cache.len()
    }

    fn cached(&self, user_id: UserId) -> Option<Arc<PreferenceCounter>> {
        self.cache.get(&user_id).map(|entry| entry.value().clone())
    }

    /// Insert under the user's generation lock; a bump in between drops the
    /// rebuilt counter instead of caching it.
    fn store_if_current(&self, user_id: UserId, generation: u64, counter: &Arc<PreferenceCounter>) {
        let current = self.generations.entry(user_id).or_insert(0);
        if *current == generation {
            self.cache.insert(user_id, counter.clone());
        } else {
            debug!(user_id, "Preferences invalidated during rebuild, not caching");
        }
    }
}
