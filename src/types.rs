//! Core types and data structures for the reporting engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder category for accounts whose classification code matches no rule.
pub const CATEGORY_UNKNOWN: &str = "Unknown";

/// Placeholder display name for journal legs referencing a code absent from the chart.
pub const NAME_NOT_FOUND: &str = "Conta não encontrada";

/// Account kind flag from the chart of accounts
///
/// Synthetic accounts are grouping nodes; analytic accounts are postable leaves.
/// The classifier accepts the kind for interface parity but never uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountKind {
    /// Grouping account ("S" in the source chart)
    #[serde(rename = "S")]
    Synthetic,
    /// Postable leaf account ("A" in the source chart)
    #[serde(rename = "A")]
    Analytic,
}

impl AccountKind {
    /// Parse the single-letter flag used by the source chart of accounts.
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            f if f.eq_ignore_ascii_case("S") => Some(AccountKind::Synthetic),
            f if f.eq_ignore_ascii_case("A") => Some(AccountKind::Analytic),
            _ => None,
        }
    }
}

/// Account status in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    /// Parse the source flag: "A" means active, anything else inactive.
    pub fn from_flag(flag: &str) -> Self {
        if flag.trim().eq_ignore_ascii_case("A") {
            AccountStatus::Active
        } else {
            AccountStatus::Inactive
        }
    }
}

/// One row of the chart of accounts as delivered by the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartAccount {
    /// Company the chart belongs to
    pub company_id: Option<i64>,
    /// Opaque account code used by balances and journal entries
    pub code: String,
    /// Free-text display name
    pub name: String,
    /// Classification code used for longest-prefix category lookup
    pub classification: String,
    /// Synthetic/analytic flag
    pub kind: Option<AccountKind>,
    /// Active/inactive status
    pub status: AccountStatus,
    /// Pre-computed category, kept verbatim when present
    pub category: Option<String>,
}

impl ChartAccount {
    /// Create an active analytic account with no pre-computed category.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        classification: impl Into<String>,
    ) -> Self {
        Self {
            company_id: None,
            code: code.into(),
            name: name.into(),
            classification: classification.into(),
            kind: Some(AccountKind::Analytic),
            status: AccountStatus::Active,
            category: None,
        }
    }

    /// Set the synthetic/analytic flag.
    pub fn with_kind(mut self, kind: AccountKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the account status.
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach a pre-computed category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Point-in-time signed balance for one account
///
/// Positive amounts sit on the debit side; movements increase the balance via
/// debits and decrease it via credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub account_code: String,
    pub amount: BigDecimal,
}

impl Balance {
    pub fn new(account_code: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            account_code: account_code.into(),
            amount,
        }
    }
}

/// Signed movement of one account within a period: debits minus credits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub account_code: String,
    /// Period label, present only for period-bucketed reporting
    pub period: Option<String>,
    pub amount: BigDecimal,
}

impl Movement {
    pub fn new(account_code: impl Into<String>, amount: BigDecimal) -> Self {
        Self {
            account_code: account_code.into(),
            period: None,
            amount,
        }
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }
}

/// One journal-entry leg pairing as stored by the source system
///
/// Each row pairs a debit account with a credit account for one amount; a lot
/// groups the rows that must balance together. A code of "0" or an empty
/// string means "no leg on this side".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub lot_id: String,
    pub entry_no: i64,
    pub date: NaiveDate,
    pub debit_code: String,
    pub credit_code: String,
    pub amount: BigDecimal,
    pub history: String,
    pub document: String,
    pub user_id: String,
}

/// Hierarchical category label parsed from its colon-delimited string form
///
/// The string encoding is kept for output compatibility; matching logic goes
/// through this parsed form instead of rescanning substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    raw: String,
}

impl Category {
    pub fn parse(label: &str) -> Self {
        Self {
            raw: label.to_string(),
        }
    }

    /// The full colon-delimited label.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Top-level segment, e.g. "Assets" for "Assets:Ativo-Circulante".
    pub fn root(&self) -> &str {
        self.raw.split(':').next().unwrap_or("")
    }

    /// Whether any segment of the label contains the given fragment.
    pub fn has_segment_containing(&self, fragment: &str) -> bool {
        self.raw.split(':').any(|seg| seg.contains(fragment))
    }

    /// Whether the label is a compound hierarchical path ("Assets:Ativo").
    pub fn is_compound(&self) -> bool {
        self.raw.contains(':')
    }
}

/// Errors that can occur while producing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Data source error: {0}")]
    Source(String),
    #[error("Empty input: {0}")]
    EmptyInput(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Data-quality signals surfaced to the operator instead of raised as errors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReportWarning {
    /// A movement or journal leg referenced an account that resolved to "Unknown"
    UnmappedAccount {
        code: String,
        name: String,
        classification: String,
        amount: BigDecimal,
    },
    /// A lot whose debit and credit totals differ beyond the tolerance
    UnbalancedLot {
        lot_id: String,
        date: NaiveDate,
        debit_total: BigDecimal,
        credit_total: BigDecimal,
        unmapped_debits: Vec<String>,
        unmapped_credits: Vec<String>,
    },
    /// Sum of opening balances far from zero
    OpeningImbalance { total: BigDecimal },
}

impl std::fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportWarning::UnmappedAccount {
                code,
                name,
                classification,
                amount,
            } => write!(
                f,
                "account {} ({}) with classification '{}' is unclassified, amount {}",
                code, name, classification, amount
            ),
            ReportWarning::UnbalancedLot {
                lot_id,
                date,
                debit_total,
                credit_total,
                unmapped_debits,
                unmapped_credits,
            } => {
                write!(
                    f,
                    "lot {} on {} is unbalanced: debits={}, credits={}",
                    lot_id, date, debit_total, credit_total
                )?;
                if !unmapped_debits.is_empty() {
                    write!(f, " | unmapped debit code(s): {}", unmapped_debits.join(", "))?;
                }
                if !unmapped_credits.is_empty() {
                    write!(f, " | unmapped credit code(s): {}", unmapped_credits.join(", "))?;
                }
                Ok(())
            }
            ReportWarning::OpeningImbalance { total } => {
                write!(f, "opening balances sum to {} (expected ~0)", total)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_parsing() {
        assert_eq!(AccountKind::from_flag("S"), Some(AccountKind::Synthetic));
        assert_eq!(AccountKind::from_flag(" a "), Some(AccountKind::Analytic));
        assert_eq!(AccountKind::from_flag("X"), None);
        assert_eq!(AccountKind::from_flag(""), None);
    }

    #[test]
    fn test_account_status_defaults_to_inactive() {
        assert_eq!(AccountStatus::from_flag("A"), AccountStatus::Active);
        assert_eq!(AccountStatus::from_flag("I"), AccountStatus::Inactive);
        assert_eq!(AccountStatus::from_flag(""), AccountStatus::Inactive);
    }

    #[test]
    fn test_category_parsing() {
        let cat = Category::parse("Assets:Ativo-Circulante");
        assert_eq!(cat.root(), "Assets");
        assert!(cat.is_compound());
        assert!(cat.has_segment_containing("Ativo-Circulante"));
        assert!(!cat.has_segment_containing("Passivo"));

        let flat = Category::parse("Assets");
        assert_eq!(flat.root(), "Assets");
        assert!(!flat.is_compound());
    }
}
