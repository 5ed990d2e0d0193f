//! Account classification, hierarchical mapping, and financial statement
//! builders for double-entry bookkeeping data.
//!
//! The crate takes a chart of accounts, balances, and journal entries from a
//! [`DataSource`](traits::DataSource) and produces:
//!
//! - a classified chart mapped to hierarchical ledger paths
//! - trial balance, balance sheet, and income statement tables
//! - a plain-text ledger file with balanced, lot-batched transactions
//!
//! Classification matches the longest rule prefix of an account's
//! classification code against a preset table (standard, simplified, or
//! IFRS-like), optionally merged with user overrides:
//!
//! ```
//! use contabil_core::classification::AccountClassifier;
//! use contabil_core::mapping::AccountMapper;
//! use contabil_core::types::ChartAccount;
//!
//! let classifier = AccountClassifier::new();
//! assert_eq!(classifier.classify("311203", None), "Expenses:Custos");
//!
//! let mapper = AccountMapper::new();
//! let chart = vec![ChartAccount::new("101", "CAIXA GERAL", "11")];
//! let mapped = mapper.map_chart(&chart, true).unwrap();
//! assert_eq!(mapped[0].path, "Assets:Ativo-Circulante:Caixa-Geral");
//! ```
//!
//! End-to-end runs go through [`pipeline::ReportPipeline`], which loads the
//! chart once and shares it across the statements while collecting
//! data-quality warnings.

pub mod classification;
pub mod config;
pub mod export;
pub mod mapping;
pub mod pipeline;
pub mod statements;
pub mod traits;
pub mod types;
pub mod utils;

pub use classification::{AccountClassifier, ClassificationPreset, ClassificationTable};
pub use config::ReportConfig;
pub use export::{
    batch_journal_entries, map_opening_balances, BatchOutcome, LedgerLeg, LedgerTransaction,
    TextLedgerWriter,
};
pub use mapping::{normalize_name, AccountIndices, AccountMapper, MappedAccount};
pub use pipeline::ReportPipeline;
pub use statements::{
    build_balance_sheet, build_income_statement, build_ledger_extract, build_trial_balance,
    BalanceSheetRow, IncomeStatement, IncomeStatementRow, LedgerExtractRow, PeriodGrouping,
    TrialBalanceRow,
};
pub use traits::DataSource;
pub use types::{
    AccountKind, AccountStatus, Balance, Category, ChartAccount, JournalEntry, Movement,
    ReportError, ReportResult, ReportWarning,
};
pub use utils::MemorySource;
