// ============================================
// Preference-Weighted Sampler (personalized matching)
// ============================================
//
// Each call draws a strictness tier, picks that many of the user's
// preferred attributes as equality constraints, scans for matches and
// samples from them. Zero matches is returned as-is; the next call redraws
// the tier.

mod cache;

pub use cache::FilterCache;

use super::preferences::PreferenceCounter;
use super::sample_bounded;
use crate::catalog::CatalogStore;
use crate::config::SamplerConfig;
use crate::error::Result;
use crate::models::{Attribute, CatalogRecord, Gender};
use crate::utils::random::RandomSource;
use crate::vocabulary::{TagCode, TagVocabulary};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Most preferences must match
    Strong,
    /// A weaker majority must match
    Weak,
    /// Gender only
    Explore,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchTier::Strong => "strong",
            MatchTier::Weak => "weak",
            MatchTier::Explore => "explore",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TierPolicy {
    strong_below: f64,
    weak_below: f64,
    strong_ratio: f64,
    weak_ratio: f64,
}

impl TierPolicy {
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self {
            strong_below: config.strong_below,
            weak_below: config.weak_below,
            strong_ratio: config.strong_ratio,
            weak_ratio: config.weak_ratio,
        }
    }

    /// Map a uniform draw in [0, 1) to a tier.
    pub fn draw(&self, r: f64) -> MatchTier {
        if r < self.strong_below {
            MatchTier::Strong
        } else if r < self.weak_below {
            MatchTier::Weak
        } else {
            MatchTier::Explore
        }
    }

    /// Number of the `available` non-gender keys turned into constraints.
    pub fn required_keys(&self, tier: MatchTier, available: usize) -> usize {
        let ratio = match tier {
            MatchTier::Strong => self.strong_ratio,
            MatchTier::Weak => self.weak_ratio,
            MatchTier::Explore => return 0,
        };
        if available == 0 {
            return 0;
        }
        let wanted = (ratio * available as f64).round() as usize;
        wanted.clamp(1, available)
    }
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self::from_config(&SamplerConfig::default())
    }
}

/// Equality conjunction over preference values plus an optional gender.
/// Constraints are kept sorted so equal filters hash equally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreferenceFilter {
    gender: Option<Gender>,
    constraints: Vec<(Attribute, String)>,
}

impl PreferenceFilter {
    pub fn new(gender: Option<Gender>, mut constraints: Vec<(Attribute, String)>) -> Self {
        constraints.retain(|(attribute, _)| *attribute != Attribute::Gender);
        constraints.sort();
        constraints.dedup_by(|a, b| a.0 == b.0);
        Self {
            gender,
            constraints,
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        self.gender
    }

    pub fn constraints(&self) -> &[(Attribute, String)] {
        &self.constraints
    }

    /// Resolve constraint values to tag codes. `None` when some value is
    /// not in the vocabulary, in which case nothing can match.
    fn resolve(&self, vocabulary: &TagVocabulary) -> Option<ResolvedFilter> {
        let mut codes = Vec::with_capacity(self.constraints.len());
        for (attribute, value) in &self.constraints {
            let kind = attribute.tag_kind()?;
            match vocabulary.code_of(kind, value) {
                Some(code) => codes.push(code),
                None => {
                    debug!(attribute = %attribute, value = %value, "Preference value not in vocabulary");
                    return None;
                }
            }
        }
        Some(ResolvedFilter {
            gender: self.gender,
            codes,
        })
    }
}

struct ResolvedFilter {
    gender: Option<Gender>,
    codes: Vec<TagCode>,
}

impl ResolvedFilter {
    fn matches(&self, record: &CatalogRecord) -> bool {
        self.gender.map_or(true, |g| record.gender == g)
            && self.codes.iter().all(|code| record.tags.contains(code))
    }
}

/// Ids of the records satisfying one filter, in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterHits {
    pub ids: Vec<u32>,
}

pub struct PreferenceSampler {
    store: CatalogStore,
    policy: TierPolicy,
    cache: Option<FilterCache>,
}

impl PreferenceSampler {
    pub fn new(store: CatalogStore, config: &SamplerConfig) -> Self {
        let cache = (config.cache_capacity > 0).then(|| FilterCache::new(config.cache_capacity));
        Self {
            store,
            policy: TierPolicy::from_config(config),
            cache,
        }
    }

    pub fn policy(&self) -> &TierPolicy {
        &self.policy
    }

    pub fn cache(&self) -> Option<&FilterCache> {
        self.cache.as_ref()
    }

    pub fn recommend(
        &self,
        preferences: &PreferenceCounter,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<CatalogRecord>> {
        if preferences.is_empty() {
            debug!("No preferences recorded, skipping recommendation");
            return Ok(Vec::new());
        }

        let r = rng.uniform();
        let tier = self.policy.draw(r);
        debug!(r, tier = %tier, "Drew match tier");

        self.recommend_with_tier(preferences, limit, tier, rng)
    }

    pub fn recommend_with_tier(
        &self,
        preferences: &PreferenceCounter,
        limit: usize,
        tier: MatchTier,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<CatalogRecord>> {
        if preferences.is_empty() {
            return Ok(Vec::new());
        }

        let filter = self.select_filter(preferences, tier, rng);
        let hits = self.hits_for(&filter)?;

        let match_count = hits.ids.len();
        let ids = sample_bounded(hits.ids.clone(), limit, rng);
        let records = self.store.read_records(&ids)?;

        info!(
            tier = %tier,
            constraints = filter.constraints().len(),
            match_count,
            returned = records.len(),
            "Recommendation completed"
        );

        Ok(records)
    }

    /// Pick the constraint set for one call: the gender preference when
    /// present, plus `required_keys` of the other attributes chosen at random.
    pub fn select_filter(
        &self,
        preferences: &PreferenceCounter,
        tier: MatchTier,
        rng: &mut dyn RandomSource,
    ) -> PreferenceFilter {
        let gender = preferences
            .preferred(Attribute::Gender)
            .and_then(|value| match Gender::canonicalize(value) {
                Some(gender) => Some(gender),
                None => {
                    warn!(value, "Unrecognised gender preference ignored");
                    None
                }
            });

        let others: Vec<(Attribute, String)> = preferences
            .attributes()
            .filter(|attribute| *attribute != Attribute::Gender)
            .filter_map(|attribute| {
                preferences
                    .preferred(attribute)
                    .map(|value| (attribute, value.to_string()))
            })
            .collect();

        let wanted = self.policy.required_keys(tier, others.len());
        let constraints = rng
            .sample_indices(others.len(), wanted)
            .into_iter()
            .filter_map(|i| others.get(i).cloned())
            .collect();

        PreferenceFilter::new(gender, constraints)
    }

    fn hits_for(&self, filter: &PreferenceFilter) -> Result<Arc<FilterHits>> {
        if let Some(cache) = &self.cache {
            if let Some(hits) = cache.get(filter) {
                debug!(matches = hits.ids.len(), "Filter cache hit");
                return Ok(hits);
            }
            debug!("Filter cache miss");
        }

        let hits = Arc::new(self.scan_for(filter)?);
        if let Some(cache) = &self.cache {
            cache.insert(filter.clone(), hits.clone());
        }
        Ok(hits)
    }

    fn scan_for(&self, filter: &PreferenceFilter) -> Result<FilterHits> {
        let Some(resolved) = filter.resolve(self.store.vocabulary()) else {
            return Ok(FilterHits::default());
        };

        let mut ids = Vec::new();
        for record in self.store.scan()? {
            let record = record?;
            if resolved.matches(&record) {
                ids.push(record.id);
            }
        }
        Ok(FilterHits { ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{write_catalog, RecordCodec};
    use crate::utils::random::{MockRandomSource, SeededRandom};
    use crate::vocabulary::TagKind;
    use std::collections::HashSet;
    use tempfile::NamedTempFile;

    fn record(vocab: &TagVocabulary, id: u32, gender: Gender, tags: &[(TagKind, &str)]) -> CatalogRecord {
        CatalogRecord {
            id,
            gender,
            tags: tags
                .iter()
                .map(|(kind, tag)| vocab.code_of(*kind, tag).unwrap())
                .collect(),
            name: format!("Item {}", id),
            image_path: format!("images/{}.jpg", id),
        }
    }

    fn sampler_over(records: &[CatalogRecord], config: &SamplerConfig) -> (NamedTempFile, PreferenceSampler) {
        let codec = RecordCodec::new(Arc::new(TagVocabulary::fashion()));
        let mut file = NamedTempFile::new().unwrap();
        write_catalog(&codec, records, &mut file).unwrap();
        let store = CatalogStore::new(file.path(), codec);
        (file, PreferenceSampler::new(store, config))
    }

    fn first_index_rng() -> MockRandomSource {
        let mut rng = MockRandomSource::new();
        rng.expect_sample_indices()
            .returning(|n, k| (0..k.min(n)).collect());
        rng
    }

    #[test]
    fn test_tier_draw_boundaries() {
        let policy = TierPolicy::default();
        assert_eq!(policy.draw(0.0), MatchTier::Strong);
        assert_eq!(policy.draw(0.7999), MatchTier::Strong);
        assert_eq!(policy.draw(0.80), MatchTier::Weak);
        assert_eq!(policy.draw(0.9499), MatchTier::Weak);
        assert_eq!(policy.draw(0.95), MatchTier::Explore);
        assert_eq!(policy.draw(0.999), MatchTier::Explore);
    }

    #[test]
    fn test_required_keys() {
        let policy = TierPolicy::default();
        assert_eq!(policy.required_keys(MatchTier::Strong, 4), 3);
        assert_eq!(policy.required_keys(MatchTier::Weak, 4), 2);
        assert_eq!(policy.required_keys(MatchTier::Strong, 1), 1);
        assert_eq!(policy.required_keys(MatchTier::Weak, 1), 1);
        assert_eq!(policy.required_keys(MatchTier::Strong, 0), 0);
        assert_eq!(policy.required_keys(MatchTier::Explore, 4), 0);
        assert_eq!(policy.required_keys(MatchTier::Strong, 5), 4);
        assert_eq!(policy.required_keys(MatchTier::Weak, 5), 3);
    }

    #[test]
    fn test_filter_key_is_order_independent() {
        let a = PreferenceFilter::new(
            None,
            vec![
                (Attribute::Season, "Summer".into()),
                (Attribute::Category, "Apparel".into()),
            ],
        );
        let b = PreferenceFilter::new(
            None,
            vec![
                (Attribute::Category, "Apparel".into()),
                (Attribute::Season, "Summer".into()),
            ],
        );
        assert_eq!(a, b);
        assert_eq!(a.constraints()[0].0, Attribute::Category);
    }

    #[test]
    fn test_empty_counter_skips_catalog() {
        let config = SamplerConfig::default();
        let codec = RecordCodec::new(Arc::new(TagVocabulary::fashion()));
        let sampler = PreferenceSampler::new(CatalogStore::new("/nonexistent/items", codec), &config);

        let mut rng = MockRandomSource::new();
        rng.expect_uniform().never();
        let result = sampler
            .recommend(&PreferenceCounter::new(), 5, &mut rng)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_strong_tier_category_scenario() {
        let vocab = TagVocabulary::fashion();
        let records = vec![
            record(&vocab, 1, Gender::Men, &[(TagKind::MasterCategory, "Footwear")]),
            record(&vocab, 2, Gender::Women, &[(TagKind::MasterCategory, "Apparel")]),
            record(&vocab, 3, Gender::Men, &[(TagKind::MasterCategory, "Accessories")]),
        ];
        let (_file, sampler) = sampler_over(&records, &SamplerConfig::default());

        let mut prefs = PreferenceCounter::new();
        prefs.add(Attribute::Category, "Apparel", 5);

        let mut rng = first_index_rng();
        let result = sampler
            .recommend_with_tier(&prefs, 5, MatchTier::Strong, &mut rng)
            .unwrap();
        assert!(result.len() <= 1);
        assert!(result.iter().all(|r| r.id == 2));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_drawn_tier_controls_constraints() {
        let vocab = TagVocabulary::fashion();
        let records = vec![
            record(&vocab, 1, Gender::Men, &[(TagKind::MasterCategory, "Apparel"), (TagKind::Season, "Summer")]),
            record(&vocab, 2, Gender::Men, &[(TagKind::MasterCategory, "Footwear"), (TagKind::Season, "Winter")]),
            record(&vocab, 3, Gender::Women, &[(TagKind::MasterCategory, "Apparel"), (TagKind::Season, "Summer")]),
        ];
        let (_file, sampler) = sampler_over(&records, &SamplerConfig::default());

        let mut prefs = PreferenceCounter::new();
        prefs.add(Attribute::Gender, "Male", 1);
        prefs.add(Attribute::Category, "Apparel", 4);
        prefs.add(Attribute::Season, "Summer", 2);

        // Strong: both other keys required, gender canonicalised to Men
        let mut rng = first_index_rng();
        rng.expect_uniform().times(1).return_const(0.1);
        let strong: Vec<u32> = sampler
            .recommend(&prefs, 10, &mut rng)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(strong, vec![1]);

        // Explore: gender only
        let mut rng = first_index_rng();
        rng.expect_uniform().times(1).return_const(0.97);
        let mut explore: Vec<u32> = sampler
            .recommend(&prefs, 10, &mut rng)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        explore.sort_unstable();
        assert_eq!(explore, vec![1, 2]);
    }

    #[test]
    fn test_unknown_preference_value_yields_empty() {
        let vocab = TagVocabulary::fashion();
        let records = vec![record(&vocab, 1, Gender::Men, &[(TagKind::Season, "Summer")])];
        let (_file, sampler) = sampler_over(&records, &SamplerConfig::default());

        let mut prefs = PreferenceCounter::new();
        prefs.add(Attribute::Season, "Monsoon", 3);

        let mut rng = first_index_rng();
        let result = sampler
            .recommend_with_tier(&prefs, 5, MatchTier::Strong, &mut rng)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_sampling_bound_and_variation() {
        let vocab = TagVocabulary::fashion();
        let records: Vec<CatalogRecord> = (1..=40)
            .map(|id| record(&vocab, id, Gender::Women, &[(TagKind::Usage, "Casual")]))
            .collect();
        let (_file, sampler) = sampler_over(&records, &SamplerConfig::default());

        let mut prefs = PreferenceCounter::new();
        prefs.add(Attribute::Usage, "Casual", 1);

        let mut subsets = HashSet::new();
        for seed in 0..10 {
            let mut rng = SeededRandom::new(seed);
            let mut ids: Vec<u32> = sampler
                .recommend_with_tier(&prefs, 5, MatchTier::Strong, &mut rng)
                .unwrap()
                .into_iter()
                .map(|r| r.id)
                .collect();
            assert_eq!(ids.len(), 5);
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), 5);
            subsets.insert(ids);
        }
        assert!(subsets.len() > 1);
    }

    #[test]
    fn test_cache_populated_and_reused() {
        let vocab = TagVocabulary::fashion();
        let records = vec![
            record(&vocab, 1, Gender::Men, &[(TagKind::Season, "Fall")]),
            record(&vocab, 2, Gender::Men, &[(TagKind::Season, "Summer")]),
        ];
        let (_file, sampler) = sampler_over(&records, &SamplerConfig::default());

        let mut prefs = PreferenceCounter::new();
        prefs.add(Attribute::Season, "Fall", 2);

        let mut rng = first_index_rng();
        let first = sampler
            .recommend_with_tier(&prefs, 5, MatchTier::Strong, &mut rng)
            .unwrap();

        let filter = PreferenceFilter::new(None, vec![(Attribute::Season, "Fall".into())]);
        let cached = sampler.cache().unwrap().get(&filter).unwrap();
        assert_eq!(cached.ids, vec![1]);

        let second = sampler
            .recommend_with_tier(&prefs, 5, MatchTier::Strong, &mut rng)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_disabled_by_zero_capacity() {
        let config = SamplerConfig {
            cache_capacity: 0,
            ..SamplerConfig::default()
        };
        let (_file, sampler) = sampler_over(&[], &config);
        assert!(sampler.cache().is_none());
    }
}
