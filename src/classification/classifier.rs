//! Account classifier: classification code → hierarchical category label

use std::collections::HashMap;

use crate::classification::table::{ClassificationPreset, ClassificationTable};
use crate::types::{AccountKind, CATEGORY_UNKNOWN};

/// Classifies accounts into hierarchical categories by their classification
/// code, using longest-prefix matching over a rule table.
#[derive(Debug, Clone, Default)]
pub struct AccountClassifier {
    table: ClassificationTable,
}

impl AccountClassifier {
    /// Classifier over the standard preset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier over a prepared table.
    pub fn with_table(table: ClassificationTable) -> Self {
        Self { table }
    }

    /// Classifier over a preset.
    pub fn with_preset(preset: ClassificationPreset) -> Self {
        Self {
            table: ClassificationTable::preset(preset),
        }
    }

    /// Classifier over a verbatim rule map, discarding every preset rule.
    pub fn with_rules(rules: HashMap<String, String>) -> Self {
        Self {
            table: ClassificationTable::from_rules(rules),
        }
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Category for a classification code.
    ///
    /// The code is trimmed before matching; an empty code or one matching no
    /// rule prefix yields `"Unknown"`. The `kind` flag is accepted for callers
    /// that carry it but does not influence the result.
    pub fn classify(&self, code: &str, _kind: Option<AccountKind>) -> &str {
        let code = code.trim();
        if code.is_empty() {
            return CATEGORY_UNKNOWN;
        }
        self.table.lookup(code).unwrap_or(CATEGORY_UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_prefix_wins() {
        let classifier = AccountClassifier::new();
        assert_eq!(classifier.classify("311203", None), "Expenses:Custos");
        assert_eq!(classifier.classify("501", None), "Equity:Contas-Transitorias");
        assert_eq!(
            classifier.classify("110203004", None),
            "Assets:Ativo-Circulante"
        );
    }

    #[test]
    fn test_kind_does_not_influence_result() {
        let classifier = AccountClassifier::new();
        let plain = classifier.classify("21010", None);
        let synthetic = classifier.classify("21010", Some(AccountKind::Synthetic));
        let analytic = classifier.classify("21010", Some(AccountKind::Analytic));
        assert_eq!(plain, synthetic);
        assert_eq!(plain, analytic);
        assert_eq!(plain, "Liabilities:Passivo-Circulante");
    }

    #[test]
    fn test_unknown_fallback() {
        let classifier = AccountClassifier::new();
        assert_eq!(classifier.classify("", None), "Unknown");
        assert_eq!(classifier.classify("   ", None), "Unknown");
        assert_eq!(classifier.classify("8", None), "Unknown");
    }

    #[test]
    fn test_verbatim_rules_discard_presets() {
        let mut rules = HashMap::new();
        rules.insert("7".to_string(), "Assets:Especial".to_string());
        let classifier = AccountClassifier::with_rules(rules);
        assert_eq!(classifier.classify("701", None), "Assets:Especial");
        // preset rules are gone
        assert_eq!(classifier.classify("11", None), "Unknown");
    }
}
