pub mod app_config;
pub mod availability;
pub mod config;
pub mod rules;
pub mod rules_file;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, OfflineConfig, RendererKind};
pub use availability::AvailabilityState;
pub use config::{load_app_config, load_app_config_from_env, load_offline_config};
pub use rules::{DomainRuleSet, DomainRuleTable};
pub use rules_file::{load_rule_table, RuleFileEntry, RulesFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("rules validation failed: {0}")]
    Validation(String),
}
