//! Dashboard Configuration Module
//! Fixed allow-lists, target years and the WB -> SDG region dictionary.

use serde::Deserialize;
use std::collections::HashSet;
use thiserror::Error;

const BUILTIN_CONFIG: &str = include_str!("../config/dashboard.json");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One entry of the region dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegionPair {
    pub source: String,
    pub target: String,
}

/// Ordered dictionary translating one region vocabulary into another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct RegionMapping {
    pairs: Vec<RegionPair>,
}

impl RegionMapping {
    pub fn new<S: Into<String>>(pairs: impl IntoIterator<Item = (S, S)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(source, target)| RegionPair {
                    source: source.into(),
                    target: target.into(),
                })
                .collect(),
        }
    }

    /// Look up the target name for a source region.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|p| p.source == source)
            .map(|p| p.target.as_str())
    }

    pub fn sources(&self) -> HashSet<String> {
        self.pairs.iter().map(|p| p.source.clone()).collect()
    }

    pub fn targets(&self) -> HashSet<String> {
        self.pairs.iter().map(|p| p.target.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Immutable configuration, parsed once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Year shown on the under-five mortality map.
    pub map_year: i64,
    /// Period used for the leading causes of death.
    pub causes_period: i64,
    /// Year used when comparing attendance with mortality.
    pub comparison_year: i64,
    pub african_countries: HashSet<String>,
    /// Country spelling used by the causes-of-death dataset.
    pub cause_locations: HashSet<String>,
    pub age_groups: HashSet<String>,
    pub region_mapping: RegionMapping,
}

impl DashboardConfig {
    /// Parse the configuration compiled into the binary.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json_str(BUILTIN_CONFIG)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let lists = [
            ("african_countries", &self.african_countries),
            ("cause_locations", &self.cause_locations),
            ("age_groups", &self.age_groups),
        ];
        for (name, list) in lists {
            if list.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", name)));
            }
        }

        if self.region_mapping.is_empty() {
            return Err(ConfigError::Invalid("region_mapping must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for pair in &self.region_mapping.pairs {
            if !seen.insert(pair.source.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate region_mapping source '{}'",
                    pair.source
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = DashboardConfig::builtin().unwrap();
        assert_eq!(config.map_year, 2022);
        assert_eq!(config.causes_period, 2017);
        assert_eq!(config.comparison_year, 2019);
        assert_eq!(config.region_mapping.len(), 7);
        assert_eq!(config.age_groups.len(), 3);
        assert!(config.african_countries.contains("Kenya"));
        assert!(config.cause_locations.contains("São Tomé and Príncipe"));
    }

    #[test]
    fn region_mapping_lookup() {
        let config = DashboardConfig::builtin().unwrap();
        let mapping = &config.region_mapping;
        assert_eq!(mapping.get("North America (WB)"), Some("Northern America (SDG)"));
        assert_eq!(mapping.get("Antarctica (WB)"), None);
        assert!(mapping.targets().contains("Europe (SDG)"));
        assert!(mapping.sources().contains("South Asia (WB)"));
    }

    #[test]
    fn duplicate_mapping_source_is_rejected() {
        let json = r#"{
            "map_year": 2022, "causes_period": 2017, "comparison_year": 2019,
            "african_countries": ["Kenya"], "cause_locations": ["Kenya"],
            "age_groups": ["0-4 years"],
            "region_mapping": [
                {"source": "A (WB)", "target": "A (SDG)"},
                {"source": "A (WB)", "target": "B (SDG)"}
            ]
        }"#;
        let err = DashboardConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_allow_list_is_rejected() {
        let json = r#"{
            "map_year": 2022, "causes_period": 2017, "comparison_year": 2019,
            "african_countries": [], "cause_locations": ["Kenya"],
            "age_groups": ["0-4 years"],
            "region_mapping": [{"source": "A (WB)", "target": "A (SDG)"}]
        }"#;
        assert!(DashboardConfig::from_json_str(json).is_err());
    }
}
