//! Chart-of-accounts mapping into hierarchical ledger paths

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::classification::{AccountClassifier, ClassificationTable};
use crate::mapping::normalize::normalize_name;
use crate::types::{AccountStatus, ChartAccount, ReportError, ReportResult};

/// A chart row after classification and path construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedAccount {
    pub code: String,
    pub name: String,
    pub classification: String,
    /// Category label, either pre-computed or derived from the classification
    pub category: String,
    /// Normalized name segment appended under the category
    pub name_segment: String,
    /// Full hierarchical ledger path
    pub path: String,
}

/// Lookup indices over a mapped chart
///
/// Built once per chart; when several rows share a key the last one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountIndices {
    /// classification code → ledger path
    pub by_classification: HashMap<String, String>,
    /// account code → ledger path
    pub by_code: HashMap<String, String>,
}

impl AccountIndices {
    /// Ledger path for an account code, if the chart knows it.
    pub fn path_for_code(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    /// Ledger path for a classification code, if the chart knows it.
    pub fn path_for_classification(&self, classification: &str) -> Option<&str> {
        self.by_classification.get(classification).map(String::as_str)
    }
}

/// Maps chart accounts into classified, normalized ledger paths
#[derive(Debug, Clone, Default)]
pub struct AccountMapper {
    classifier: AccountClassifier,
}

impl AccountMapper {
    /// Mapper over the standard classification preset.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(classifier: AccountClassifier) -> Self {
        Self { classifier }
    }

    pub fn with_table(table: ClassificationTable) -> Self {
        Self {
            classifier: AccountClassifier::with_table(table),
        }
    }

    pub fn classifier(&self) -> &AccountClassifier {
        &self.classifier
    }

    /// Full ledger path for a category and a normalized name segment.
    ///
    /// Compound categories are used verbatim; flat ones (no ':') are
    /// normalized first so the path stays ledger-safe.
    pub fn account_path(&self, category: &str, name_segment: &str) -> String {
        if category.contains(':') {
            format!("{}:{}", category, name_segment)
        } else {
            format!("{}:{}", normalize_name(category), name_segment)
        }
    }

    /// Map a chart of accounts into ledger paths.
    ///
    /// With `only_active` set, inactive rows are dropped before mapping.
    /// An empty chart is a data error.
    pub fn map_chart(
        &self,
        chart: &[ChartAccount],
        only_active: bool,
    ) -> ReportResult<Vec<MappedAccount>> {
        if chart.is_empty() {
            return Err(ReportError::EmptyInput(
                "chart of accounts has no rows".to_string(),
            ));
        }

        let mapped = chart
            .iter()
            .filter(|account| !only_active || account.status == AccountStatus::Active)
            .map(|account| {
                let category = match account.category.as_deref().map(str::trim) {
                    Some(precomputed) if !precomputed.is_empty() => precomputed.to_string(),
                    _ => self
                        .classifier
                        .classify(&account.classification, account.kind)
                        .to_string(),
                };
                let name_segment = normalize_name(&account.name);
                let path = self.account_path(&category, &name_segment);
                MappedAccount {
                    code: account.code.trim().to_string(),
                    name: account.name.clone(),
                    classification: account.classification.trim().to_string(),
                    category,
                    name_segment,
                    path,
                }
            })
            .collect();
        Ok(mapped)
    }

    /// Build the lookup indices for a mapped chart. Later rows overwrite
    /// earlier ones sharing a code.
    pub fn build_indices(&self, mapped: &[MappedAccount]) -> AccountIndices {
        let mut indices = AccountIndices::default();
        for account in mapped {
            indices
                .by_classification
                .insert(account.classification.clone(), account.path.clone());
            indices.by_code.insert(account.code.clone(), account.path.clone());
        }
        indices
    }
}
