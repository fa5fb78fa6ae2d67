pub mod engine;
pub mod match_service;
pub mod matcher;
pub mod preferences;
pub mod sampler;

pub use engine::MatchEngine;
pub use match_service::MatchService;
pub use matcher::{MatchMask, TagFilter, TagFilterMatcher, TagSet};
pub use preferences::{
    InteractionSource, PreferenceAggregator, PreferenceCounter, PreferenceStore, PreferenceSummary,
};
pub use sampler::{FilterCache, MatchTier, PreferenceFilter, PreferenceSampler, TierPolicy};

use crate::utils::random::RandomSource;

/// Uniform sample of at most `limit` items without replacement. Returns the
/// input untouched when it already fits.
pub(crate) fn sample_bounded<T>(items: Vec<T>, limit: usize, rng: &mut dyn RandomSource) -> Vec<T> {
    if items.len() <= limit {
        return items;
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    rng.sample_indices(slots.len(), limit)
        .into_iter()
        .filter_map(|i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::random::SeededRandom;

    #[test]
    fn test_sample_bounded() {
        let mut rng = SeededRandom::new(5);
        assert_eq!(sample_bounded(vec![1, 2, 3], 5, &mut rng), vec![1, 2, 3]);

        let picked = sample_bounded((0..100).collect(), 10, &mut rng);
        assert_eq!(picked.len(), 10);
        let mut unique = picked.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);

        assert!(sample_bounded((0..4).collect::<Vec<i32>>(), 0, &mut rng).is_empty());
    }
}
