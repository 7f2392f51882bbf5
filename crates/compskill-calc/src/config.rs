//! Configuration types for the calculators

use compskill_skills::ExtractOptions;
use serde::Deserialize;

/// Ordering among complementary contributions with equal ranks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Ascending by source label (locale order)
    #[default]
    SourceLabel,
    /// Keep the order in which contributions were gathered
    Insertion,
}

/// Calculator configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalcConfig {
    /// Re-extract skills of participants that are added again
    #[serde(default)]
    pub force_reload: bool,

    /// Offer and count non-rollable skills as complementary sources
    #[serde(default)]
    pub allow_ineligible_complements: bool,

    /// Ordering among equal-rank contributions
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl CalcConfig {
    /// Options passed to the skill extractor
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            force_reload: self.force_reload,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CalcConfig::default();
        assert!(!config.force_reload);
        assert!(!config.allow_ineligible_complements);
        assert_eq!(config.tie_break, TieBreak::SourceLabel);
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_str = r#"
            force_reload = true
            tie_break = "insertion"
        "#;

        let config: CalcConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
        assert!(config.force_reload);
        assert!(!config.allow_ineligible_complements);
        assert_eq!(config.tie_break, TieBreak::Insertion);
        assert!(config.extract_options().force_reload);
    }

    #[test]
    fn test_empty_table_uses_defaults() {
        let config: CalcConfig = toml::from_str("").expect("Failed to parse TOML");
        assert_eq!(config.tie_break, TieBreak::SourceLabel);
    }
}
