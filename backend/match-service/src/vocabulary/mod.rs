// ============================================
// Tag Vocabulary
// ============================================
//
// Read-only mapping from one-byte tag codes to tag names, partitioned
// into namespaces. Codes are assigned sequentially over the namespaces
// in `TagKind::ALL` order, and in listed order within a namespace.
//
// Built once at startup and shared as Arc<TagVocabulary>.

mod fashion;

use crate::error::{MatchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::info;

pub type TagCode = u8;

/// Reserved code marking an unused tag slot. Never assigned to a tag.
pub const EMPTY_TAG: TagCode = 0xFF;

/// Largest number of tags a vocabulary can hold.
pub const MAX_TAGS: usize = EMPTY_TAG as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagKind {
    #[serde(rename = "masterCategory")]
    MasterCategory,
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

impl TagKind {
    pub const ALL: [TagKind; 6] = [
        TagKind::MasterCategory,
        TagKind::SubCategory,
        TagKind::ArticleType,
        TagKind::BaseColour,
        TagKind::Season,
        TagKind::Usage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::MasterCategory => "masterCategory",
            TagKind::SubCategory => "subCategory",
            TagKind::ArticleType => "articleType",
            TagKind::BaseColour => "baseColour",
            TagKind::Season => "season",
            TagKind::Usage => "usage",
        }
    }

    /// Category hierarchy namespaces (the "any of N category tags" group).
    pub fn is_category(&self) -> bool {
        matches!(
            self,
            TagKind::MasterCategory | TagKind::SubCategory | TagKind::ArticleType
        )
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct TagEntry {
    kind: TagKind,
    name: String,
}

/// On-disk vocabulary format: one list of names per namespace.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct VocabularyFile {
    #[serde(default, rename = "masterCategory")]
    master_category: Vec<String>,
    #[serde(default, rename = "subCategory")]
    sub_category: Vec<String>,
    #[serde(default, rename = "articleType")]
    article_type: Vec<String>,
    #[serde(default, rename = "baseColour")]
    base_colour: Vec<String>,
    #[serde(default)]
    season: Vec<String>,
    #[serde(default)]
    usage: Vec<String>,
}

impl VocabularyFile {
    fn into_namespaces(self) -> Vec<(TagKind, Vec<String>)> {
        vec![
            (TagKind::MasterCategory, self.master_category),
            (TagKind::SubCategory, self.sub_category),
            (TagKind::ArticleType, self.article_type),
            (TagKind::BaseColour, self.base_colour),
            (TagKind::Season, self.season),
            (TagKind::Usage, self.usage),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct TagVocabulary {
    entries: Vec<TagEntry>,
    index: HashMap<(TagKind, String), TagCode>,
}

impl TagVocabulary {
    /// Build from namespaces. Namespaces are reordered into `TagKind::ALL`
    /// order so the same content always yields the same codes.
    pub fn from_namespaces<I, S>(namespaces: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TagKind, Vec<S>)>,
        S: Into<String>,
    {
        let mut grouped: Vec<(TagKind, Vec<String>)> = namespaces
            .into_iter()
            .map(|(kind, names)| (kind, names.into_iter().map(Into::into).collect()))
            .collect();
        grouped.sort_by_key(|(kind, _)| *kind);

        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (kind, names) in grouped {
            for name in names {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(MatchError::Vocabulary(format!(
                        "empty tag name in namespace {}",
                        kind
                    )));
                }
                if entries.len() >= MAX_TAGS {
                    return Err(MatchError::Vocabulary(format!(
                        "vocabulary exceeds {} tags",
                        MAX_TAGS
                    )));
                }

                let code = entries.len() as TagCode;
                if index.insert((kind, name.to_lowercase()), code).is_some() {
                    return Err(MatchError::Vocabulary(format!(
                        "duplicate tag {:?} in namespace {}",
                        name, kind
                    )));
                }
                entries.push(TagEntry { kind, name });
            }
        }

        Ok(Self { entries, index })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: VocabularyFile = serde_json::from_str(json)?;
        Self::from_namespaces(file.into_namespaces())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            MatchError::Vocabulary(format!("failed to read {}: {}", path.display(), e))
        })?;
        let vocabulary = Self::from_json_str(&json)?;

        info!(
            path = %path.display(),
            tags = vocabulary.len(),
            "Tag vocabulary loaded"
        );

        Ok(vocabulary)
    }

    /// Built-in fashion catalog vocabulary.
    pub fn fashion() -> Self {
        Self::from_namespaces(fashion::namespaces())
            .expect("built-in fashion vocabulary is valid")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn name(&self, code: TagCode) -> Option<&str> {
        self.entries.get(code as usize).map(|e| e.name.as_str())
    }

    pub fn kind(&self, code: TagCode) -> Option<TagKind> {
        self.entries.get(code as usize).map(|e| e.kind)
    }

    pub fn contains(&self, code: TagCode) -> bool {
        (code as usize) < self.entries.len()
    }

    /// Case-insensitive name lookup within one namespace.
    pub fn code_of(&self, kind: TagKind, name: &str) -> Option<TagCode> {
        self.index
            .get(&(kind, name.trim().to_lowercase()))
            .copied()
    }

    /// Like `code_of`, but unknown names are an error.
    pub fn resolve(&self, kind: TagKind, name: &str) -> Result<TagCode> {
        self.code_of(kind, name).ok_or_else(|| {
            MatchError::Vocabulary(format!("unknown {} tag {:?}", kind, name))
        })
    }

    pub fn codes_of_kind(&self, kind: TagKind) -> impl Iterator<Item = TagCode> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| e.kind == kind)
            .map(|(code, _)| code as TagCode)
    }
}
