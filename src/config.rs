use crate::core::{ModelKind, RankingConfig, Recommender, TrainingConfig};
use crate::models::BonusWeights;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub model_cache: ModelCacheSettings,
    #[serde(default)]
    pub mail: MailSettings,
    #[serde(default)]
    pub jsearch: JSearchSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }

#[derive(Debug, Clone, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_profiles_file")]
    pub profiles_file: PathBuf,
    #[serde(default = "default_jobs_file")]
    pub jobs_file: PathBuf,
    #[serde(default = "default_export_file")]
    pub export_file: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            profiles_file: default_profiles_file(),
            jobs_file: default_jobs_file(),
            export_file: default_export_file(),
        }
    }
}

fn default_profiles_file() -> PathBuf { PathBuf::from("data/sample_profiles.json") }
fn default_jobs_file() -> PathBuf { PathBuf::from("data/sample_jobs.json") }
fn default_export_file() -> PathBuf { PathBuf::from("recommendations_export.json") }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_match_score")]
    pub min_match_score: f64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_match_score: default_min_match_score(),
            top_n: default_top_n(),
        }
    }
}

fn default_min_match_score() -> f64 { 0.3 }
fn default_top_n() -> usize { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub model: ModelKind,
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    #[serde(default = "default_negative")]
    pub negative: usize,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            dimensions: default_dimensions(),
            window: default_window(),
            min_count: default_min_count(),
            negative: default_negative(),
            epochs: default_epochs(),
            learning_rate: default_learning_rate(),
            seed: default_seed(),
        }
    }
}

fn default_dimensions() -> usize { 300 }
fn default_window() -> usize { 5 }
fn default_min_count() -> usize { 2 }
fn default_negative() -> usize { 5 }
fn default_epochs() -> usize { 5 }
fn default_learning_rate() -> f32 { 0.025 }
fn default_seed() -> u64 { 1 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub bonuses: BonusWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelCacheSettings {
    #[serde(default = "default_cache_capacity")]
    pub capacity: u64,
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
}

impl Default for ModelCacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> u64 { 4 }
fn default_cache_ttl() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    #[serde(default = "default_mail_endpoint")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_sender")]
    pub default_sender: String,
    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            api_url: default_mail_endpoint(),
            api_key: String::new(),
            default_sender: default_sender(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

fn default_mail_endpoint() -> String { "http://localhost:8025/api/send".to_string() }
fn default_sender() -> String { "noreply@jobmatch.local".to_string() }
fn default_mail_timeout() -> u64 { 15 }

#[derive(Debug, Clone, Deserialize)]
pub struct JSearchSettings {
    #[serde(default = "default_jsearch_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_jsearch_host")]
    pub api_host: String,
    #[serde(default = "default_jsearch_timeout")]
    pub timeout_secs: u64,
}

impl Default for JSearchSettings {
    fn default() -> Self {
        Self {
            base_url: default_jsearch_url(),
            api_key: String::new(),
            api_host: default_jsearch_host(),
            timeout_secs: default_jsearch_timeout(),
        }
    }
}

fn default_jsearch_url() -> String { "https://jsearch.p.rapidapi.com".to_string() }
fn default_jsearch_host() -> String { "jsearch.p.rapidapi.com".to_string() }
fn default_jsearch_timeout() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default)]
    pub enabled: bool,
    /// Daily run time, `HH:MM` local time
    #[serde(default = "default_scheduler_time")]
    pub time: String,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            time: default_scheduler_time(),
        }
    }
}

fn default_scheduler_time() -> String { "08:00".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JOBMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JOBMATCH__MATCHING__TOP_N -> matching.top_n
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?
            .try_deserialize()
    }

    /// Build the recommendation pipeline described by this configuration
    pub fn recommender(&self) -> Recommender {
        Recommender::new(
            self.embedding.model,
            self.training_config(),
            self.scoring.bonuses,
            RankingConfig {
                min_match_score: self.matching.min_match_score,
                top_n: self.matching.top_n,
            },
        )
    }

    pub fn training_config(&self) -> TrainingConfig {
        TrainingConfig {
            dimensions: self.embedding.dimensions,
            window: self.embedding.window,
            min_count: self.embedding.min_count,
            negative: self.embedding.negative,
            epochs: self.embedding.epochs,
            learning_rate: self.embedding.learning_rate,
            seed: self.embedding.seed,
            ..TrainingConfig::default()
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("JOBMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}
