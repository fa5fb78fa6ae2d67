// ============================================
// Preference Aggregation
// ============================================
//
// Reduces a user's interaction history into weighted attribute values.
// Liked items count more than items that were only viewed.

mod store;

pub use store::{InteractionSource, PreferenceStore};

#[cfg(test)]
pub use store::MockInteractionSource;

use crate::config::PreferencesConfig;
use crate::models::{Attribute, Interaction};
use crate::utils::extract_colour_from_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Accumulated weight per attribute value. Values keep insertion order,
/// which is the tie-break between equal weights.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceCounter {
    entries: BTreeMap<Attribute, Vec<(String, u32)>>,
}

impl PreferenceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `value`. Blank values and zero weights are ignored.
    /// Values compare ASCII case-insensitively; the first spelling seen is
    /// the one kept.
    pub fn add(&mut self, attribute: Attribute, value: &str, weight: u32) {
        let value = value.trim();
        if value.is_empty() || weight == 0 {
            return;
        }

        let values = self.entries.entry(attribute).or_default();
        match values
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(value))
        {
            Some((_, total)) => *total = total.saturating_add(weight),
            None => values.push((value.to_string(), weight)),
        }
    }

    pub fn weight(&self, attribute: Attribute, value: &str) -> u32 {
        self.entries
            .get(&attribute)
            .and_then(|values| {
                let value = value.trim();
                values.iter().find(|(v, _)| v.eq_ignore_ascii_case(value))
            })
            .map_or(0, |(_, w)| *w)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Attributes with at least one recorded value.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.entries.keys().copied()
    }

    /// Highest-weighted value for `attribute`; the earliest inserted wins ties.
    pub fn preferred(&self, attribute: Attribute) -> Option<&str> {
        let values = self.entries.get(&attribute)?;
        let mut best: Option<&(String, u32)> = None;
        for entry in values {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(value, _)| value.as_str())
    }

    /// The `n` highest-weighted values, stable on ties.
    pub fn top(&self, attribute: Attribute, n: usize) -> Vec<(String, u32)> {
        let mut values = self.entries.get(&attribute).cloned().unwrap_or_default();
        values.sort_by(|a, b| b.1.cmp(&a.1));
        values.truncate(n);
        values
    }

    /// Top values per attribute. Gender only steers filtering and is left out.
    pub fn summary(&self, top_n: usize) -> PreferenceSummary {
        PreferenceSummary {
            attributes: self
                .attributes()
                .filter(|attribute| *attribute != Attribute::Gender)
                .map(|attribute| (attribute, self.top(attribute, top_n)))
                .collect(),
        }
    }
}

/// Top values per attribute, as shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreferenceSummary {
    pub attributes: BTreeMap<Attribute, Vec<(String, u32)>>,
}

#[derive(Debug, Clone)]
pub struct PreferenceAggregator {
    liked_weight: u32,
    viewed_weight: u32,
    infer_colour: bool,
}

impl PreferenceAggregator {
    pub fn new(config: &PreferencesConfig) -> Self {
        Self {
            liked_weight: config.liked_weight,
            viewed_weight: config.viewed_weight,
            infer_colour: config.infer_colour,
        }
    }

    pub fn weight_of(&self, interaction: &Interaction) -> u32 {
        if interaction.liked {
            self.liked_weight
        } else {
            self.viewed_weight
        }
    }

    pub fn aggregate(&self, interactions: &[Interaction]) -> PreferenceCounter {
        let mut counter = PreferenceCounter::new();
        for interaction in interactions {
            self.accumulate(&mut counter, interaction);
        }
        counter
    }

    pub fn accumulate(&self, counter: &mut PreferenceCounter, interaction: &Interaction) {
        let weight = self.weight_of(interaction);
        let item = &interaction.item;

        counter.add(Attribute::Category, &item.category, weight);
        counter.add(Attribute::Season, &item.season, weight);
        counter.add(Attribute::Usage, &item.usage, weight);

        let colour = if item.base_colour.trim().is_empty() && self.infer_colour {
            extract_colour_from_name(&item.name).unwrap_or_default()
        } else {
            item.base_colour.as_str()
        };
        counter.add(Attribute::BaseColour, colour, weight);
    }
}

impl Default for PreferenceAggregator {
    fn default() -> Self {
        Self::new(&PreferencesConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemAttributes;
    use chrono::Utc;

    fn interaction(category: &str, colour: &str, liked: bool) -> Interaction {
        Interaction {
            item: ItemAttributes {
                id: 1,
                name: "Navy Blue Polo".to_string(),
                category: category.to_string(),
                base_colour: colour.to_string(),
                season: "Summer".to_string(),
                usage: String::new(),
                ..Default::default()
            },
            viewed: true,
            liked,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_liked_plus_viewed_weighting() {
        let aggregator = PreferenceAggregator::default();
        let counter = aggregator.aggregate(&[
            interaction("Apparel", "Blue", true),
            interaction("Apparel", "Blue", false),
        ]);
        assert_eq!(counter.weight(Attribute::Category, "Apparel"), 4);
        assert_eq!(counter.weight(Attribute::BaseColour, "Blue"), 4);
        assert_eq!(counter.weight(Attribute::Season, "Summer"), 4);
    }

    #[test]
    fn test_empty_values_not_recorded() {
        let aggregator = PreferenceAggregator::default();
        let counter = aggregator.aggregate(&[interaction("", "", true)]);
        assert_eq!(counter.attributes().collect::<Vec<_>>(), vec![Attribute::Season]);
        assert_eq!(counter.weight(Attribute::Usage, ""), 0);
    }

    #[test]
    fn test_colour_inference_when_enabled() {
        let aggregator = PreferenceAggregator::new(&PreferencesConfig {
            infer_colour: true,
            ..PreferencesConfig::default()
        });
        let counter = aggregator.aggregate(&[interaction("Apparel", "", false)]);
        assert_eq!(counter.weight(Attribute::BaseColour, "Navy Blue"), 1);

        let off = PreferenceAggregator::default().aggregate(&[interaction("Apparel", "", false)]);
        assert_eq!(off.preferred(Attribute::BaseColour), None);
    }

    #[test]
    fn test_preferred_and_top_tie_break() {
        let mut counter = PreferenceCounter::new();
        counter.add(Attribute::Usage, "Casual", 2);
        counter.add(Attribute::Usage, "Sports", 3);
        counter.add(Attribute::Usage, "Formal", 3);
        counter.add(Attribute::Usage, "Ethnic", 0);

        assert_eq!(counter.preferred(Attribute::Usage), Some("Sports"));
        assert_eq!(
            counter.top(Attribute::Usage, 2),
            vec![("Sports".to_string(), 3), ("Formal".to_string(), 3)]
        );
        assert_eq!(counter.top(Attribute::Usage, 10).len(), 3);
        assert_eq!(counter.preferred(Attribute::Season), None);
    }

    #[test]
    fn test_summary_serialises_by_attribute_key() {
        let mut counter = PreferenceCounter::new();
        counter.add(Attribute::BaseColour, "Black", 6);
        counter.add(Attribute::Category, "Footwear", 1);

        let json = serde_json::to_value(counter.summary(10)).unwrap();
        assert_eq!(json["baseColour"][0][0], "Black");
        assert_eq!(json["baseColour"][0][1], 6);
        assert_eq!(json["category"][0][0], "Footwear");
    }

    #[test]
    fn test_values_merge_ignoring_case() {
        let mut counter = PreferenceCounter::new();
        for _ in 0..3 {
            counter.add(Attribute::Category, "Apparel", 1);
        }
        counter.add(Attribute::Category, "apparel", 1);
        counter.add(Attribute::Category, " APPAREL ", 2);

        assert_eq!(counter.weight(Attribute::Category, "Apparel"), 6);
        assert_eq!(counter.weight(Attribute::Category, "apparel"), 6);
        assert_eq!(
            counter.top(Attribute::Category, 10),
            vec![("Apparel".to_string(), 6)]
        );
    }

    #[test]
    fn test_summary_leaves_out_gender() {
        let mut counter = PreferenceCounter::new();
        counter.add(Attribute::Gender, "male", 1);
        counter.add(Attribute::Usage, "Casual", 3);

        let summary = counter.summary(5);
        assert!(!summary.attributes.contains_key(&Attribute::Gender));
        assert_eq!(
            summary.attributes.get(&Attribute::Usage),
            Some(&vec![("Casual".to_string(), 3)])
        );
        assert_eq!(counter.preferred(Attribute::Gender), Some("male"));

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("gender").is_none());
    }
}
