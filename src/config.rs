//! Report configuration

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classification::{ClassificationPreset, ClassificationTable};
use crate::mapping::AccountMapper;
use crate::types::{ReportError, ReportResult};

fn default_currency() -> String {
    "BRL".to_string()
}

fn default_only_active() -> bool {
    true
}

fn default_opening_equity_account() -> String {
    "Equity:Abertura".to_string()
}

/// Settings controlling classification and rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Built-in classification preset
    pub preset: ClassificationPreset,
    /// Prefix→category overrides merged on top of the preset
    pub overrides: HashMap<String, String>,
    /// Currency label used in rendered ledger files
    pub currency: String,
    /// Drop inactive chart rows before mapping
    pub only_active: bool,
    /// Residual account of the opening transaction
    pub opening_equity_account: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preset: ClassificationPreset::default(),
            overrides: HashMap::new(),
            currency: default_currency(),
            only_active: default_only_active(),
            opening_equity_account: default_opening_equity_account(),
        }
    }
}

impl ReportConfig {
    /// Parse a JSON configuration document; absent fields take defaults.
    pub fn from_json(raw: &str) -> ReportResult<Self> {
        serde_json::from_str(raw).map_err(|e| ReportError::Config(e.to_string()))
    }

    /// Classification table for this configuration.
    pub fn classification_table(&self) -> ClassificationTable {
        if self.overrides.is_empty() {
            ClassificationTable::preset(self.preset)
        } else {
            ClassificationTable::preset_with_overrides(self.preset, &self.overrides)
        }
    }

    /// Account mapper for this configuration.
    pub fn mapper(&self) -> AccountMapper {
        AccountMapper::with_table(self.classification_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.preset, ClassificationPreset::Standard);
        assert_eq!(config.currency, "BRL");
        assert!(config.only_active);
        assert_eq!(config.opening_equity_account, "Equity:Abertura");
    }

    #[test]
    fn test_from_json_partial() {
        let config = ReportConfig::from_json(
            r#"{"preset": "ifrs", "currency": "USD", "overrides": {"6": "Expenses:Extra"}}"#,
        )
        .unwrap();
        assert_eq!(config.preset, ClassificationPreset::Ifrs);
        assert_eq!(config.currency, "USD");
        assert_eq!(
            config.classification_table().lookup("601"),
            Some("Expenses:Extra")
        );
        // defaulted fields
        assert!(config.only_active);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = ReportConfig::from_json("{preset:").unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_mapper_uses_overrides() {
        let mut overrides = HashMap::new();
        overrides.insert("11".to_string(), "Assets:Disponivel".to_string());
        let config = ReportConfig {
            overrides,
            ..Default::default()
        };
        let mapper = config.mapper();
        assert_eq!(mapper.classifier().classify("1101", None), "Assets:Disponivel");
    }
}
