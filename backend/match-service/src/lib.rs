pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;
pub mod vocabulary;

pub use catalog::{CatalogStore, RecordCodec};
pub use config::Config;
pub use error::{MatchError, Result};
pub use models::{Attribute, CatalogRecord, Gender, Interaction, ItemAttributes, MatchedItem, UserId};
pub use services::{
    InteractionSource, MatchEngine, MatchMask, MatchService, MatchTier, PreferenceAggregator,
    PreferenceCounter, PreferenceStore,
};
pub use vocabulary::{TagKind, TagVocabulary};
