use crate::error::{MatchError, Result};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub catalog: CatalogConfig,
    pub sampler: SamplerConfig,
    pub preferences: PreferencesConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// JSON vocabulary file; the built-in fashion vocabulary when unset
    #[serde(default)]
    pub vocabulary_path: Option<PathBuf>,
    /// Prefix joined onto record image paths
    #[serde(default)]
    pub image_base_url: Option<String>,
}

/// Tier thresholds and key ratios for the preference sampler. These are
/// product heuristics, kept here so they can be tuned without a rebuild.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_strong_below")]
    pub strong_below: f64,
    #[serde(default = "default_weak_below")]
    pub weak_below: f64,
    #[serde(default = "default_strong_ratio")]
    pub strong_ratio: f64,
    #[serde(default = "default_weak_ratio")]
    pub weak_ratio: f64,
    /// Memoized filters kept at once; 0 disables the cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default = "default_liked_weight")]
    pub liked_weight: u32,
    #[serde(default = "default_viewed_weight")]
    pub viewed_weight: u32,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub infer_colour: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_limit")]
    pub default: usize,
    #[serde(default = "default_min_limit")]
    pub min: usize,
    #[serde(default = "default_max_limit")]
    pub max: usize,
}

fn default_service_name() -> String {
    "match-service".to_string()
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/items")
}
fn default_strong_below() -> f64 {
    0.80
}
fn default_weak_below() -> f64 {
    0.95
}
fn default_strong_ratio() -> f64 {
    0.8
}
fn default_weak_ratio() -> f64 {
    0.6
}
fn default_cache_capacity() -> u64 {
    256
}
fn default_liked_weight() -> u32 {
    3
}
fn default_viewed_weight() -> u32 {
    1
}
fn default_top_n() -> usize {
    10
}
fn default_limit() -> usize {
    5
}
fn default_min_limit() -> usize {
    1
}
fn default_max_limit() -> usize {
    50
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            vocabulary_path: None,
            image_base_url: None,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            strong_below: default_strong_below(),
            weak_below: default_weak_below(),
            strong_ratio: default_strong_ratio(),
            weak_ratio: default_weak_ratio(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            liked_weight: default_liked_weight(),
            viewed_weight: default_viewed_weight(),
            top_n: default_top_n(),
            infer_colour: false,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            default: default_limit(),
            min: default_min_limit(),
            max: default_max_limit(),
        }
    }
}

impl Config {
    /// Load from the process environment (and `.env` when present).
    ///
    /// Variables are grouped by prefix: `SERVICE_`, `CATALOG_`, `SAMPLER_`,
    /// `PREFERENCES_`, `LIMITS_`, e.g. `CATALOG_PATH=data/items`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: Vec<(String, String)> = vars.into_iter().collect();

        let config = Config {
            service: envy::prefixed("SERVICE_").from_iter(vars.clone())?,
            catalog: envy::prefixed("CATALOG_").from_iter(vars.clone())?,
            sampler: envy::prefixed("SAMPLER_").from_iter(vars.clone())?,
            preferences: envy::prefixed("PREFERENCES_").from_iter(vars.clone())?,
            limits: envy::prefixed("LIMITS_").from_iter(vars)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let sampler = &self.sampler;
        let unit = 0.0..=1.0;
        if !unit.contains(&sampler.strong_below) || !unit.contains(&sampler.weak_below) {
            return Err(MatchError::Configuration(format!(
                "tier thresholds must lie in [0, 1], got {} and {}",
                sampler.strong_below, sampler.weak_below
            )));
        }
        if sampler.strong_below > sampler.weak_below {
            return Err(MatchError::Configuration(format!(
                "strong tier threshold {} exceeds weak tier threshold {}",
                sampler.strong_below, sampler.weak_below
            )));
        }
        for (name, ratio) in [
            ("strong_ratio", sampler.strong_ratio),
            ("weak_ratio", sampler.weak_ratio),
        ] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(MatchError::Configuration(format!(
                    "{} must lie in (0, 1], got {}",
                    name, ratio
                )));
            }
        }

        let limits = &self.limits;
        if limits.min > limits.max {
            return Err(MatchError::Configuration(format!(
                "limit range is empty: min {} > max {}",
                limits.min, limits.max
            )));
        }
        if limits.default < limits.min || limits.default > limits.max {
            return Err(MatchError::Configuration(format!(
                "default limit {} outside [{}, {}]",
                limits.default, limits.min, limits.max
            )));
        }

        Ok(())
    }
}
