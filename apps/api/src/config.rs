use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON vocabulary file. `None` uses the vocabulary compiled into the binary.
    pub skill_vocabulary_path: Option<PathBuf>,
    pub default_max_results: i64,
    pub max_results_limit: i64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            skill_vocabulary_path: None,
            default_max_results: 20,
            max_results_limit: 100,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            port: parse_or("PORT", &lookup, defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            skill_vocabulary_path: lookup("SKILL_VOCABULARY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            default_max_results: parse_or(
                "DEFAULT_MAX_RESULTS",
                &lookup,
                defaults.default_max_results,
            )?,
            max_results_limit: parse_or("MAX_RESULTS_LIMIT", &lookup, defaults.max_results_limit)?,
            max_upload_bytes: parse_or("MAX_UPLOAD_BYTES", &lookup, defaults.max_upload_bytes)?,
        };

        if config.default_max_results < 0 || config.max_results_limit < 0 {
            bail!("DEFAULT_MAX_RESULTS and MAX_RESULTS_LIMIT must not be negative");
        }
        if config.default_max_results > config.max_results_limit {
            bail!(
                "DEFAULT_MAX_RESULTS ({}) exceeds MAX_RESULTS_LIMIT ({})",
                config.default_max_results,
                config.max_results_limit
            );
        }

        Ok(config)
    }

    /// Applies the default to an omitted `max_results` and caps it at the limit.
    /// Negative values pass through so the ranker can reject them.
    pub fn effective_max_results(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_max_results)
            .min(self.max_results_limit)
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
