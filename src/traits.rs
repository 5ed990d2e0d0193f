//! Data-access abstraction for the reporting pipeline

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::statements::PeriodGrouping;
use crate::types::{Balance, ChartAccount, JournalEntry, Movement, ReportResult};

/// Source of bookkeeping data for one or more companies.
///
/// Implementations wrap a database or an in-memory store; the pipeline only
/// reads, so a shared reference is enough and implementations decide their
/// own interior locking.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full chart of accounts for a company.
    async fn chart_of_accounts(&self, company_id: i64) -> ReportResult<Vec<ChartAccount>>;

    /// Signed account balances accumulated up to and including `as_of`.
    async fn balances_as_of(&self, company_id: i64, as_of: NaiveDate)
        -> ReportResult<Vec<Balance>>;

    /// Per-account signed movements (debits minus credits) within the period,
    /// bucketed per `grouping`.
    async fn period_movements(
        &self,
        company_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        grouping: PeriodGrouping,
    ) -> ReportResult<Vec<Movement>>;

    /// Journal entries dated within the period.
    async fn journal_entries(
        &self,
        company_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ReportResult<Vec<JournalEntry>>;
}
