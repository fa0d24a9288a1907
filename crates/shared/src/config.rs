//! Application configuration management.

use serde::Deserialize;

use crate::error::{AppError, AppResult};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Aggregation engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Live feed configuration.
    #[serde(default)]
    pub feed: FeedConfig,
}

/// Aggregation engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Responsibility labels that mark a transaction as split between partners.
    #[serde(default = "default_shared_synonyms")]
    pub shared_synonyms: Vec<String>,
    /// The two parties that each receive half of a shared transaction.
    #[serde(default = "default_partners")]
    pub partners: Vec<PartyConfig>,
    /// Additional parties whose balances are reported.
    #[serde(default)]
    pub other_parties: Vec<PartyConfig>,
    /// Bucket used for expenses without a category.
    #[serde(default = "default_uncategorized_label")]
    pub uncategorized_label: String,
    /// Bucket used for expenses without a responsibility.
    #[serde(default = "default_unassigned_label")]
    pub unassigned_label: String,
}

/// A party transactions can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PartyConfig {
    /// Display name, also matched against responsibility labels.
    pub name: String,
    /// Alternative spellings matched case-insensitively.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl PartyConfig {
    /// Creates a party without aliases.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }
}

/// Live feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Buffer size of the channel feeding asynchronous sources.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_shared_synonyms() -> Vec<String> {
    ["shared", "both", "couple", "split", "joint"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_partners() -> Vec<PartyConfig> {
    vec![PartyConfig::named("primary"), PartyConfig::named("partner")]
}

fn default_uncategorized_label() -> String {
    "uncategorized".to_string()
}

fn default_unassigned_label() -> String {
    "general".to_string()
}

fn default_channel_capacity() -> usize {
    16
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shared_synonyms: default_shared_synonyms(),
            partners: default_partners(),
            other_parties: Vec::new(),
            uncategorized_label: default_uncategorized_label(),
            unassigned_label: default_unassigned_label(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or fails validation.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("FLUXO")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("engine.shared_synonyms")
                    .try_parsing(true),
            )
            .build()?;

        let loaded: Self = config.try_deserialize()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks invariants the deserializer cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` describing the first violated rule.
    pub fn validate(&self) -> AppResult<()> {
        let engine = &self.engine;

        if engine.shared_synonyms.iter().all(|s| s.trim().is_empty()) {
            return Err(AppError::Validation(
                "engine.shared_synonyms must contain at least one label".into(),
            ));
        }

        if engine.partners.len() != 2 {
            return Err(AppError::Validation(format!(
                "engine.partners must list exactly two parties, got {}",
                engine.partners.len()
            )));
        }

        let all_parties = engine.partners.iter().chain(&engine.other_parties);
        for party in all_parties {
            if party.name.trim().is_empty() {
                return Err(AppError::Validation("party name cannot be empty".into()));
            }
        }

        if engine.partners[0].name.eq_ignore_ascii_case(&engine.partners[1].name) {
            return Err(AppError::Validation(format!(
                "engine.partners must be distinct, both are '{}'",
                engine.partners[0].name
            )));
        }

        if self.feed.channel_capacity == 0 {
            return Err(AppError::Validation(
                "feed.channel_capacity must be positive".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.shared_synonyms.len(), 5);
        assert_eq!(config.engine.uncategorized_label, "uncategorized");
        assert_eq!(config.feed.channel_capacity, 16);
    }

    #[test]
    fn test_rejects_identical_partners() {
        let mut config = AppConfig::default();
        config.engine.partners = vec![PartyConfig::named("Ana"), PartyConfig::named("ana")];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_wrong_partner_count() {
        let mut config = AppConfig::default();
        config.engine.partners.pop();
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_rejects_blank_synonyms() {
        let mut config = AppConfig::default();
        config.engine.shared_synonyms = vec!["  ".into()];
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_load_reads_environment() {
        temp_env::with_vars(
            [
                ("FLUXO__ENGINE__UNCATEGORIZED_LABEL", Some("misc")),
                ("FLUXO__ENGINE__SHARED_SYNONYMS", Some("shared,joint")),
                ("FLUXO__FEED__CHANNEL_CAPACITY", Some("4")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.engine.uncategorized_label, "misc");
                assert_eq!(config.engine.shared_synonyms, vec!["shared", "joint"]);
                assert_eq!(config.feed.channel_capacity, 4);
            },
        );
    }

    #[test]
    fn test_load_rejects_invalid_environment() {
        temp_env::with_var("FLUXO__FEED__CHANNEL_CAPACITY", Some("0"), || {
            assert!(matches!(AppConfig::load(), Err(AppError::Validation(_))));
        });
    }
}
