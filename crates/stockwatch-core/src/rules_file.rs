use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rules::{DomainRuleSet, DomainRuleTable};
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleFileEntry {
    pub domain: String,
    #[serde(default)]
    pub positives: Vec<String>,
    #[serde(default)]
    pub negatives: Vec<String>,
    /// Replace the built-in entry for this domain instead of extending it.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub replace: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RulesFile {
    pub domains: Vec<RuleFileEntry>,
}

impl From<&DomainRuleTable> for RulesFile {
    /// Dumps a table in the same shape the loader reads back.
    fn from(table: &DomainRuleTable) -> Self {
        let domains = table
            .iter()
            .map(|(domain, set)| RuleFileEntry {
                domain: domain.to_owned(),
                positives: set.positives.iter().cloned().collect(),
                negatives: set.negatives.iter().cloned().collect(),
                replace: false,
            })
            .collect();
        Self { domains }
    }
}

/// Builds the effective rule table: the built-in table, merged with the YAML
/// rules file at `path` when one is given.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_rule_table(path: Option<&Path>) -> Result<DomainRuleTable, ConfigError> {
    let builtin = DomainRuleTable::builtin().clone();
    let Some(path) = path else {
        return Ok(builtin);
    };

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::RulesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;
    let rules_file = parse_rules_file(&content)?;

    tracing::info!(
        path = %path.display(),
        domains = rules_file.domains.len(),
        "loaded domain rules file"
    );

    Ok(merge_rules(builtin, rules_file))
}

fn parse_rules_file(content: &str) -> Result<RulesFile, ConfigError> {
    let rules_file: RulesFile = serde_yaml::from_str(content)?;
    validate_rules(&rules_file)?;
    Ok(rules_file)
}

fn merge_rules(base: DomainRuleTable, rules_file: RulesFile) -> DomainRuleTable {
    rules_file.domains.into_iter().fold(base, |table, entry| {
        let set = DomainRuleSet::new(&entry.positives, &entry.negatives);
        table.merged(&entry.domain, set, entry.replace)
    })
}

fn validate_rules(rules_file: &RulesFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for entry in &rules_file.domains {
        let domain = entry.domain.trim().to_lowercase();
        if domain.is_empty() {
            return Err(ConfigError::Validation(
                "domain must be non-empty".to_string(),
            ));
        }
        if domain.contains('/') || domain.contains(':') {
            return Err(ConfigError::Validation(format!(
                "domain '{}' must be a bare host without scheme, port, or path",
                entry.domain
            )));
        }
        if !seen.insert(domain) {
            return Err(ConfigError::Validation(format!(
                "duplicate domain: '{}'",
                entry.domain
            )));
        }
        if entry
            .positives
            .iter()
            .chain(&entry.negatives)
            .any(|phrase| phrase.trim().is_empty())
        {
            return Err(ConfigError::Validation(format!(
                "domain '{}' has an empty phrase",
                entry.domain
            )));
        }
    }

    Ok(())
}
