// ============================================
// Match Engine
// ============================================
//
// Synchronous entry point over one catalog snapshot. Every call opens its
// own file handle, so one engine can serve concurrent requests.

use super::matcher::{MatchMask, TagFilterMatcher};
use super::preferences::PreferenceCounter;
use super::sampler::{MatchTier, PreferenceSampler};
use crate::catalog::{CatalogStore, RecordCodec, ScanStats};
use crate::config::{Config, SamplerConfig};
use crate::error::Result;
use crate::models::{CatalogRecord, MatchedItem};
use crate::utils::random::{RandomSource, ThreadRandom};
use crate::vocabulary::TagVocabulary;
use std::sync::Arc;
use tracing::{info, warn};

pub struct MatchEngine {
    store: CatalogStore,
    matcher: TagFilterMatcher,
    sampler: PreferenceSampler,
    image_base_url: Option<String>,
}

impl MatchEngine {
    pub fn new(store: CatalogStore, sampler: &SamplerConfig, image_base_url: Option<String>) -> Self {
        Self {
            matcher: TagFilterMatcher::new(store.clone()),
            sampler: PreferenceSampler::new(store.clone(), sampler),
            store,
            image_base_url,
        }
    }

    /// Load the vocabulary and open the catalog named by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let vocabulary = match &config.catalog.vocabulary_path {
            Some(path) => TagVocabulary::load(path)?,
            None => TagVocabulary::fashion(),
        };
        let codec = RecordCodec::new(Arc::new(vocabulary));
        let store = CatalogStore::open(&config.catalog.path, codec)?;

        info!(
            path = %config.catalog.path.display(),
            records = store.record_count()?,
            "Catalog opened"
        );

        Ok(Self::new(
            store,
            &config.sampler,
            config.catalog.image_base_url.clone(),
        ))
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn vocabulary(&self) -> &Arc<TagVocabulary> {
        self.store.vocabulary()
    }

    pub fn sampler(&self) -> &PreferenceSampler {
        &self.sampler
    }

    pub fn match_anonymous(&self, mask: &MatchMask, limit: usize) -> Result<Vec<MatchedItem>> {
        self.match_anonymous_with_rng(mask, limit, &mut ThreadRandom)
    }

    pub fn match_anonymous_with_rng(
        &self,
        mask: &MatchMask,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<MatchedItem>> {
        let records = self.matcher.match_anonymous(mask, limit, rng)?;
        Ok(self.to_items(records))
    }

    pub fn recommend(&self, preferences: &PreferenceCounter, limit: usize) -> Result<Vec<MatchedItem>> {
        self.recommend_with_rng(preferences, limit, &mut ThreadRandom)
    }

    pub fn recommend_with_rng(
        &self,
        preferences: &PreferenceCounter,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<MatchedItem>> {
        let records = self.sampler.recommend(preferences, limit, rng)?;
        Ok(self.to_items(records))
    }

    /// Recommend with a fixed tier instead of a random draw.
    pub fn recommend_with_tier(
        &self,
        preferences: &PreferenceCounter,
        limit: usize,
        tier: MatchTier,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<MatchedItem>> {
        let records = self.sampler.recommend_with_tier(preferences, limit, tier, rng)?;
        Ok(self.to_items(records))
    }

    /// One record picked uniformly from the whole catalog.
    pub fn match_random(&self) -> Result<Option<MatchedItem>> {
        self.match_random_with_rng(&mut ThreadRandom)
    }

    pub fn match_random_with_rng(&self, rng: &mut dyn RandomSource) -> Result<Option<MatchedItem>> {
        let record = self.store.random_record(rng)?;
        Ok(record.map(|r| self.to_item(r)))
    }

    /// Decode the whole catalog once and report what was found.
    pub fn verify_catalog(&self) -> Result<ScanStats> {
        let mut scan = self.store.scan()?;
        for record in scan.by_ref() {
            record?;
        }
        let stats = scan.stats();

        if stats.skipped > 0 || stats.truncated_tail {
            warn!(
                decoded = stats.decoded,
                skipped = stats.skipped,
                truncated_tail = stats.truncated_tail,
                "Catalog contains undecodable records"
            );
        } else {
            info!(decoded = stats.decoded, "Catalog verified");
        }
        Ok(stats)
    }

    pub fn to_item(&self, record: CatalogRecord) -> MatchedItem {
        let vocabulary = self.store.vocabulary();
        MatchedItem {
            id: record.id,
            gender: record.gender.to_string(),
            tags: record
                .tags
                .iter()
                .filter_map(|&code| vocabulary.name(code))
                .map(str::to_string)
                .collect(),
            image_url: self.image_url(&record.image_path),
            name: record.name,
        }
    }

    fn to_items(&self, records: Vec<CatalogRecord>) -> Vec<MatchedItem> {
        records.into_iter().map(|r| self.to_item(r)).collect()
    }

    fn image_url(&self, path: &str) -> String {
        match &self.image_base_url {
            Some(base) if !base.is_empty() => {
                format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
            }
            _ => path.to_string(),
        }
    }
}
