use anyhow::{bail, Context, Result};

pub const DEFAULT_AIRTABLE_API_URL: &str = "https://api.airtable.com/v0";
pub const DEFAULT_AIRTABLE_TABLE: &str = "ResHelp2";

/// Which backend receives uploaded resume text.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeStoreConfig {
    Airtable(AirtableConfig),
    /// In-process table; nothing leaves the server.
    Memory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AirtableConfig {
    pub api_key: String,
    pub base_id: String,
    pub table: String,
    pub api_url: String,
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub resume_store: ResumeStoreConfig,
    pub optimize_delay_ms: u64,
    /// Idle drafts older than this are dropped by the sweeper.
    pub draft_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("RESUME_STORE").unwrap_or_else(|| "airtable".to_string());
        let resume_store = match backend.to_lowercase().as_str() {
            "airtable" => ResumeStoreConfig::Airtable(AirtableConfig {
                api_key: require(&lookup, "AIRTABLE_API_KEY")?,
                base_id: require(&lookup, "AIRTABLE_BASE_ID")?,
                table: lookup("AIRTABLE_TABLE")
                    .unwrap_or_else(|| DEFAULT_AIRTABLE_TABLE.to_string()),
                api_url: lookup("AIRTABLE_API_URL")
                    .unwrap_or_else(|| DEFAULT_AIRTABLE_API_URL.to_string()),
            }),
            "memory" => ResumeStoreConfig::Memory,
            other => bail!("RESUME_STORE must be 'airtable' or 'memory', got '{other}'"),
        };

        Ok(Config {
            resume_store,
            optimize_delay_ms: lookup("OPTIMIZE_DELAY_MS")
                .unwrap_or_else(|| "2000".to_string())
                .parse::<u64>()
                .context("OPTIMIZE_DELAY_MS must be a number of milliseconds")?,
            draft_ttl_secs: lookup("DRAFT_TTL_SECS")
                .unwrap_or_else(|| "7200".to_string())
                .parse::<u64>()
                .context("DRAFT_TTL_SECS must be a number of seconds")?,
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_airtable_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("AIRTABLE_API_KEY", "key123"),
            ("AIRTABLE_BASE_ID", "appXYZ"),
        ]))
        .unwrap();

        assert_eq!(
            config.resume_store,
            ResumeStoreConfig::Airtable(AirtableConfig {
                api_key: "key123".to_string(),
                base_id: "appXYZ".to_string(),
                table: "ResHelp2".to_string(),
                api_url: "https://api.airtable.com/v0".to_string(),
            })
        );
        assert_eq!(config.port, 8080);
        assert_eq!(config.optimize_delay_ms, 2000);
        assert_eq!(config.draft_ttl_secs, 7200);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_missing_airtable_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("AIRTABLE_BASE_ID", "appXYZ")])).unwrap_err();
        assert!(err.to_string().contains("AIRTABLE_API_KEY"));
    }

    #[test]
    fn test_memory_store_needs_no_credentials() {
        let config = Config::from_lookup(lookup_from(&[
            ("RESUME_STORE", "memory"),
            ("PORT", "3000"),
            ("OPTIMIZE_DELAY_MS", "0"),
            ("DRAFT_TTL_SECS", "600"),
        ]))
        .unwrap();
        assert_eq!(config.resume_store, ResumeStoreConfig::Memory);
        assert_eq!(config.port, 3000);
        assert_eq!(config.optimize_delay_ms, 0);
        assert_eq!(config.draft_ttl_secs, 600);
    }

    #[test]
    fn test_rejects_unknown_store_and_bad_port() {
        assert!(Config::from_lookup(lookup_from(&[("RESUME_STORE", "postgres")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[
            ("RESUME_STORE", "memory"),
            ("PORT", "not-a-port"),
        ]))
        .is_err());
    }
}
