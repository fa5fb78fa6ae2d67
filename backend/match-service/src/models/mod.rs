use crate::vocabulary::{TagCode, TagKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verified user identity handed over by the authentication layer.
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    Unisex,
    Men,
    Women,
    Boys,
    Girls,
}

impl Gender {
    pub const ALL: [Gender; 5] = [
        Gender::Unisex,
        Gender::Men,
        Gender::Women,
        Gender::Boys,
        Gender::Girls,
    ];

    pub fn code(self) -> u8 {
        match self {
            Gender::Unisex => 0,
            Gender::Men => 1,
            Gender::Women => 2,
            Gender::Boys => 3,
            Gender::Girls => 4,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Unisex => "Unisex",
            Gender::Men => "Men",
            Gender::Women => "Women",
            Gender::Boys => "Boys",
            Gender::Girls => "Girls",
        }
    }

    /// Resolve a gender name from any of the source vocabularies
    /// ("Male" and "Men" both mean `Men`). Case-insensitive.
    pub fn canonicalize(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unisex" => Some(Gender::Unisex),
            "men" | "man" | "male" => Some(Gender::Men),
            "women" | "woman" | "female" => Some(Gender::Women),
            "boys" | "boy" => Some(Gender::Boys),
            "girls" | "girl" => Some(Gender::Girls),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preference attribute keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Attribute {
    #[serde(rename = "gender")]
    Gender,
    #[serde(rename = "category")]
    Category,
    #[serde(rename = "subCategory")]
    SubCategory,
    #[serde(rename = "articleType")]
    ArticleType,
    #[serde(rename = "baseColour")]
    BaseColour,
    #[serde(rename = "season")]
    Season,
    #[serde(rename = "usage")]
    Usage,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Gender => "gender",
            Attribute::Category => "category",
            Attribute::SubCategory => "subCategory",
            Attribute::ArticleType => "articleType",
            Attribute::BaseColour => "baseColour",
            Attribute::Season => "season",
            Attribute::Usage => "usage",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "gender" => Some(Attribute::Gender),
            "category" | "masterCategory" => Some(Attribute::Category),
            "subCategory" => Some(Attribute::SubCategory),
            "articleType" => Some(Attribute::ArticleType),
            "baseColour" | "color" | "colour" => Some(Attribute::BaseColour),
            "season" => Some(Attribute::Season),
            "usage" | "context" => Some(Attribute::Usage),
            _ => None,
        }
    }

    /// Tag namespace holding this attribute's values. `Gender` lives outside
    /// the tag vocabulary.
    pub fn tag_kind(&self) -> Option<TagKind> {
        match self {
            Attribute::Gender => None,
            Attribute::Category => Some(TagKind::MasterCategory),
            Attribute::SubCategory => Some(TagKind::SubCategory),
            Attribute::ArticleType => Some(TagKind::ArticleType),
            Attribute::BaseColour => Some(TagKind::BaseColour),
            Attribute::Season => Some(TagKind::Season),
            Attribute::Usage => Some(TagKind::Usage),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded catalog entry. Transient: produced by a scan, never retained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    /// 1-based ordinal position in the catalog file
    pub id: u32,
    pub gender: Gender,
    /// Tag codes in slot order (at most five)
    pub tags: Vec<TagCode>,
    pub name: String,
    pub image_path: String,
}

/// Item as handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedItem {
    pub id: u32,
    pub gender: String,
    pub tags: Vec<String>,
    pub name: String,
    pub image_url: String,
}

/// Item metadata attached to an interaction by the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemAttributes {
    pub id: i64,
    #[serde(alias = "productDisplayName")]
    pub name: String,
    #[serde(alias = "masterCategory")]
    pub category: String,
    pub sub_category: String,
    pub article_type: String,
    pub base_colour: String,
    pub season: String,
    pub usage: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub item: ItemAttributes,
    pub viewed: bool,
    pub liked: bool,
    pub timestamp: DateTime<Utc>,
}
