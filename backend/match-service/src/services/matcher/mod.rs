// ============================================
// Tag Filter Matcher (anonymous matching)
// ============================================
//
// A record matches a MatchMask iff:
//   gender constraint holds
//   AND its colour tag is accepted
//   AND its usage tag is accepted
//   AND at least one of its category tags is accepted
//
// The whole catalog is scanned because uniform sampling needs the full
// matching population.

mod tag_set;

pub use tag_set::TagSet;

use super::sample_bounded;
use crate::catalog::CatalogStore;
use crate::error::{MatchError, Result};
use crate::models::{CatalogRecord, Gender};
use crate::utils::random::RandomSource;
use crate::vocabulary::{TagCode, TagKind, TagVocabulary};
use tracing::info;

/// Constraint over one tag namespace group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    Any,
    OneOf(TagSet),
}

impl TagFilter {
    fn from_set(set: TagSet) -> Self {
        if set.is_empty() {
            TagFilter::Any
        } else {
            TagFilter::OneOf(set)
        }
    }

    /// Single-valued slot (colour, usage). A `OneOf` filter requires the
    /// record to carry such a tag.
    fn accepts(&self, code: Option<TagCode>) -> bool {
        match self {
            TagFilter::Any => true,
            TagFilter::OneOf(set) => code.is_some_and(|c| set.contains(c)),
        }
    }

    fn accepts_any<I: IntoIterator<Item = TagCode>>(&self, codes: I) -> bool {
        match self {
            TagFilter::Any => true,
            TagFilter::OneOf(set) => codes.into_iter().any(|c| set.contains(c)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchMask {
    pub gender: Option<Gender>,
    pub categories: TagFilter,
    pub colours: TagFilter,
    pub usages: TagFilter,
}

impl MatchMask {
    /// Mask accepting every record.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn builder(vocabulary: &TagVocabulary) -> MatchMaskBuilder<'_> {
        MatchMaskBuilder {
            vocabulary,
            mask: MatchMask::default(),
            categories: TagSet::new(),
            colours: TagSet::new(),
            usages: TagSet::new(),
            error: None,
        }
    }

    /// Split one flat bit-per-tag vector into the namespace groups.
    ///
    /// A group with no bit set becomes `TagFilter::Any`, so all-zero flags
    /// yield `MatchMask::any()`. Flags cannot express "match nothing"; build
    /// the mask with an empty `TagFilter::OneOf` for that. Season bits carry
    /// no constraint.
    pub fn from_flags(vocabulary: &TagVocabulary, gender: Option<Gender>, flags: &TagSet) -> Self {
        let mut categories = TagSet::new();
        let mut colours = TagSet::new();
        let mut usages = TagSet::new();

        for code in flags.iter() {
            match vocabulary.kind(code) {
                Some(kind) if kind.is_category() => categories.insert(code),
                Some(TagKind::BaseColour) => colours.insert(code),
                Some(TagKind::Usage) => usages.insert(code),
                _ => {}
            }
        }

        Self {
            gender,
            categories: TagFilter::from_set(categories),
            colours: TagFilter::from_set(colours),
            usages: TagFilter::from_set(usages),
        }
    }

    pub fn matches(&self, record: &CatalogRecord, vocabulary: &TagVocabulary) -> bool {
        if let Some(gender) = self.gender {
            if record.gender != gender {
                return false;
            }
        }

        let first_of = |kind: TagKind| {
            record
                .tags
                .iter()
                .copied()
                .find(|&c| vocabulary.kind(c) == Some(kind))
        };

        self.colours.accepts(first_of(TagKind::BaseColour))
            && self.usages.accepts(first_of(TagKind::Usage))
            && self.categories.accepts_any(
                record
                    .tags
                    .iter()
                    .copied()
                    .filter(|&c| vocabulary.kind(c).is_some_and(|k| k.is_category())),
            )
    }
}

/// Builds a mask from tag names. Unknown names surface as an error from
/// `build`.
pub struct MatchMaskBuilder<'a> {
    vocabulary: &'a TagVocabulary,
    mask: MatchMask,
    categories: TagSet,
    colours: TagSet,
    usages: TagSet,
    error: Option<MatchError>,
}

impl<'a> MatchMaskBuilder<'a> {
    pub fn gender(mut self, gender: Gender) -> Self {
        self.mask.gender = Some(gender);
        self
    }

    /// Accept a category name from any level of the hierarchy. A name
    /// present at several levels accepts all of them.
    pub fn category(mut self, name: &str) -> Self {
        let codes: Vec<TagCode> = [
            TagKind::MasterCategory,
            TagKind::SubCategory,
            TagKind::ArticleType,
        ]
        .into_iter()
        .filter_map(|kind| self.vocabulary.code_of(kind, name))
        .collect();

        if codes.is_empty() {
            self.fail(MatchError::Vocabulary(format!("unknown category {:?}", name)));
        }
        for code in codes {
            self.categories.insert(code);
        }
        self
    }

    pub fn colour(mut self, name: &str) -> Self {
        match self.vocabulary.resolve(TagKind::BaseColour, name) {
            Ok(code) => self.colours.insert(code),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn usage(mut self, name: &str) -> Self {
        match self.vocabulary.resolve(TagKind::Usage, name) {
            Ok(code) => self.usages.insert(code),
            Err(e) => self.fail(e),
        }
        self
    }

    pub fn build(self) -> Result<MatchMask> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(MatchMask {
            categories: TagFilter::from_set(self.categories),
            colours: TagFilter::from_set(self.colours),
            usages: TagFilter::from_set(self.usages),
            ..self.mask
        })
    }

    fn fail(&mut self, error: MatchError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

pub struct TagFilterMatcher {
    store: CatalogStore,
}

impl TagFilterMatcher {
    pub fn new(store: CatalogStore) -> Self {
        Self { store }
    }

    /// All records matching `mask`, or a uniform sample of `limit` of them.
    /// No matches is an empty result, not an error.
    pub fn match_anonymous(
        &self,
        mask: &MatchMask,
        limit: usize,
        rng: &mut dyn RandomSource,
    ) -> Result<Vec<CatalogRecord>> {
        let vocabulary = self.store.vocabulary().clone();
        let mut matched = Vec::new();

        for record in self.store.scan()? {
            let record = record?;
            if mask.matches(&record, &vocabulary) {
                matched.push(record);
            }
        }

        let match_count = matched.len();
        let sampled = sample_bounded(matched, limit, rng);

        info!(
            match_count,
            limit,
            returned = sampled.len(),
            "Anonymous match completed"
        );

        Ok(sampled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{write_catalog, RecordCodec};
    use crate::utils::random::{MockRandomSource, SeededRandom};
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    fn vocabulary() -> Arc<TagVocabulary> {
        Arc::new(TagVocabulary::fashion())
    }

    fn record(vocab: &TagVocabulary, id: u32, gender: Gender, tags: &[(TagKind, &str)], name: &str) -> CatalogRecord {
        CatalogRecord {
            id,
            gender,
            tags: tags
                .iter()
                .map(|(kind, tag)| vocab.code_of(*kind, tag).unwrap())
                .collect(),
            name: name.to_string(),
            image_path: format!("images/{}.jpg", id),
        }
    }

    fn scenario(vocab: &TagVocabulary) -> Vec<CatalogRecord> {
        vec![
            record(vocab, 1, Gender::Men, &[(TagKind::ArticleType, "Shirts")], "Blue Tee"),
            record(vocab, 2, Gender::Women, &[(TagKind::SubCategory, "Dress")], "Red Dress"),
            record(vocab, 3, Gender::Men, &[(TagKind::ArticleType, "Shirts")], "Green Polo"),
        ]
    }

    fn store_with(vocab: Arc<TagVocabulary>, records: &[CatalogRecord]) -> (NamedTempFile, CatalogStore) {
        let codec = RecordCodec::new(vocab);
        let mut file = NamedTempFile::new().unwrap();
        write_catalog(&codec, records, &mut file).unwrap();
        let store = CatalogStore::new(file.path(), codec);
        (file, store)
    }

    #[test]
    fn test_tag_filter_semantics() {
        let mut set = TagSet::new();
        set.insert(4);
        let filter = TagFilter::OneOf(set);
        assert!(filter.accepts(Some(4)));
        assert!(!filter.accepts(Some(5)));
        assert!(!filter.accepts(None));
        assert!(TagFilter::Any.accepts(None));
        assert!(filter.accepts_any([1, 4]));
        assert!(!filter.accepts_any(std::iter::empty()));
    }

    #[test]
    fn test_mask_predicate() {
        let vocab = vocabulary();
        let item = record(
            &vocab,
            1,
            Gender::Men,
            &[
                (TagKind::MasterCategory, "Apparel"),
                (TagKind::ArticleType, "Shirts"),
                (TagKind::BaseColour, "Blue"),
                (TagKind::Usage, "Casual"),
            ],
            "Blue Shirt",
        );

        let mask = MatchMask::builder(&vocab)
            .gender(Gender::Men)
            .category("Shirts")
            .colour("Blue")
            .usage("Casual")
            .build()
            .unwrap();
        assert!(mask.matches(&item, &vocab));

        let wrong_colour = MatchMask::builder(&vocab).colour("Red").build().unwrap();
        assert!(!wrong_colour.matches(&item, &vocab));

        let wrong_gender = MatchMask::builder(&vocab).gender(Gender::Women).build().unwrap();
        assert!(!wrong_gender.matches(&item, &vocab));

        let either_category = MatchMask::builder(&vocab)
            .category("Jeans")
            .category("Apparel")
            .build()
            .unwrap();
        assert!(either_category.matches(&item, &vocab));

        let formal = MatchMask::builder(&vocab).usage("Formal").build().unwrap();
        assert!(!formal.matches(&item, &vocab));
    }

    #[test]
    fn test_required_colour_rejects_untagged_record() {
        let vocab = vocabulary();
        let plain = record(&vocab, 1, Gender::Men, &[(TagKind::ArticleType, "Shirts")], "Plain");
        let mask = MatchMask::builder(&vocab).colour("Blue").build().unwrap();
        assert!(!mask.matches(&plain, &vocab));
        assert!(MatchMask::any().matches(&plain, &vocab));
    }

    #[test]
    fn test_builder_rejects_unknown_names() {
        let vocab = vocabulary();
        assert!(MatchMask::builder(&vocab).colour("Ultraviolet").build().is_err());
        assert!(MatchMask::builder(&vocab).category("Spaceships").build().is_err());
        // A colour name is not a usage
        assert!(MatchMask::builder(&vocab).usage("Blue").build().is_err());
    }

    #[test]
    fn test_from_flags_groups_by_namespace() {
        let vocab = vocabulary();
        let shirts = vocab.code_of(TagKind::ArticleType, "Shirts").unwrap();
        let blue = vocab.code_of(TagKind::BaseColour, "Blue").unwrap();
        let summer = vocab.code_of(TagKind::Season, "Summer").unwrap();
        let flags: TagSet = [shirts, blue, summer].into_iter().collect();

        let mask = MatchMask::from_flags(&vocab, Some(Gender::Men), &flags);
        assert_eq!(mask.gender, Some(Gender::Men));
        assert_eq!(mask.categories, TagFilter::OneOf([shirts].into_iter().collect()));
        assert_eq!(mask.colours, TagFilter::OneOf([blue].into_iter().collect()));
        assert_eq!(mask.usages, TagFilter::Any);
    }

    #[test]
    fn test_zero_flags_accept_everything() {
        let vocab = vocabulary();
        let records = scenario(&vocab);
        let summer = vocab.code_of(TagKind::Season, "Summer").unwrap();

        assert_eq!(MatchMask::from_flags(&vocab, None, &TagSet::new()), MatchMask::any());
        let season_only: TagSet = [summer].into_iter().collect();
        assert_eq!(MatchMask::from_flags(&vocab, None, &season_only), MatchMask::any());

        let nothing = MatchMask {
            categories: TagFilter::OneOf(TagSet::new()),
            ..MatchMask::any()
        };
        assert!(records.iter().all(|r| MatchMask::any().matches(r, &vocab)));
        assert!(records.iter().all(|r| !nothing.matches(r, &vocab)));
    }

    #[test]
    fn test_scenario_men_shirts() {
        let vocab = vocabulary();
        let records = scenario(&vocab);
        let (_file, store) = store_with(vocab.clone(), &records);
        let matcher = TagFilterMatcher::new(store);

        let mask = MatchMask::builder(&vocab)
            .gender(Gender::Men)
            .category("Shirts")
            .build()
            .unwrap();
        let mut rng = SeededRandom::new(3);
        let mut names: Vec<String> = matcher
            .match_anonymous(&mask, 10, &mut rng)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Blue Tee", "Green Polo"]);
    }

    #[test]
    fn test_no_matches_is_empty() {
        let vocab = vocabulary();
        let (_file, store) = store_with(vocab.clone(), &scenario(&vocab));
        let matcher = TagFilterMatcher::new(store);

        let mask = MatchMask::builder(&vocab).gender(Gender::Girls).build().unwrap();
        let mut rng = MockRandomSource::new();
        rng.expect_sample_indices().never();
        let result = matcher.match_anonymous(&mask, 5, &mut rng).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_sample_bounded_by_limit() {
        let vocab = vocabulary();
        let records: Vec<CatalogRecord> = (1..=12)
            .map(|id| record(&vocab, id, Gender::Men, &[(TagKind::ArticleType, "Shirts")], "Tee"))
            .collect();
        let (_file, store) = store_with(vocab.clone(), &records);
        let matcher = TagFilterMatcher::new(store);

        let mut rng = MockRandomSource::new();
        rng.expect_sample_indices()
            .withf(|n, k| *n == 12 && *k == 3)
            .times(1)
            .returning(|_, _| vec![11, 0, 5]);

        let picked: Vec<u32> = matcher
            .match_anonymous(&MatchMask::any(), 3, &mut rng)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(picked, vec![12, 1, 6]);
    }
}
