//! Report pipeline: loads data, maps the chart, and produces the statements

use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::config::ReportConfig;
use crate::export::{batch_journal_entries, map_opening_balances, TextLedgerWriter};
use crate::mapping::{AccountIndices, AccountMapper, MappedAccount};
use crate::statements::{
    build_balance_sheet, build_income_statement, build_ledger_extract, build_trial_balance,
    BalanceSheetRow, IncomeStatement, LedgerExtractRow, PeriodGrouping, TrialBalanceRow,
};
use crate::traits::DataSource;
use crate::types::{ReportResult, ReportWarning};
use crate::utils::{imbalance_tolerance, round2};

/// Produces every report of one company over one period from a `DataSource`.
///
/// The chart of accounts is loaded and mapped once, then reused by all
/// statements. Data-quality findings accumulate in `warnings` instead of
/// failing the run.
pub struct ReportPipeline<S: DataSource> {
    source: S,
    mapper: AccountMapper,
    config: ReportConfig,
    company_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    chart: Option<Vec<MappedAccount>>,
    indices: AccountIndices,
    warnings: Vec<ReportWarning>,
}

impl<S: DataSource> ReportPipeline<S> {
    pub fn new(
        source: S,
        config: ReportConfig,
        company_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self {
            source,
            mapper: config.mapper(),
            config,
            company_id,
            start,
            end,
            chart: None,
            indices: AccountIndices::default(),
            warnings: Vec::new(),
        }
    }

    fn opening_date(&self) -> NaiveDate {
        self.start.pred_opt().unwrap_or(self.start)
    }

    fn chart(&self) -> &[MappedAccount] {
        self.chart.as_deref().unwrap_or(&[])
    }

    /// Load and map the chart of accounts, building the lookup indices.
    /// Subsequent calls reuse the cached result.
    pub async fn load_chart(&mut self) -> ReportResult<()> {
        if self.chart.is_some() {
            return Ok(());
        }
        let raw = self.source.chart_of_accounts(self.company_id).await?;
        let mapped = self.mapper.map_chart(&raw, self.config.only_active)?;
        self.indices = self.mapper.build_indices(&mapped);
        log::debug!(
            "mapped {} chart accounts for company {}",
            mapped.len(),
            self.company_id
        );
        self.chart = Some(mapped);
        Ok(())
    }

    /// Lookup indices over the mapped chart; empty until the chart loads.
    pub fn indices(&self) -> &AccountIndices {
        &self.indices
    }

    /// Trial balance of the period: opening balances up to the day before
    /// the period start plus the period's debit and credit totals.
    pub async fn trial_balance(&mut self) -> ReportResult<Vec<TrialBalanceRow>> {
        self.load_chart().await?;
        let opening = self
            .source
            .balances_as_of(self.company_id, self.opening_date())
            .await?;
        let entries = self
            .source
            .journal_entries(self.company_id, self.start, self.end)
            .await?;
        Ok(build_trial_balance(self.chart(), &opening, &entries))
    }

    /// Balance sheet at the period end.
    pub async fn balance_sheet(&mut self) -> ReportResult<Vec<BalanceSheetRow>> {
        self.load_chart().await?;
        let balances = self.source.balances_as_of(self.company_id, self.end).await?;
        Ok(build_balance_sheet(&balances, self.chart()))
    }

    /// Income statement over the period, optionally bucketed into period
    /// columns. Unmapped-account findings also land in the pipeline warnings.
    pub async fn income_statement(
        &mut self,
        grouping: PeriodGrouping,
    ) -> ReportResult<IncomeStatement> {
        self.load_chart().await?;
        let movements = self
            .source
            .period_movements(self.company_id, self.start, self.end, grouping)
            .await?;
        let statement = build_income_statement(&movements, self.chart(), grouping);
        self.warnings.extend(statement.warnings.iter().cloned());
        Ok(statement)
    }

    /// Journal entries of the period with both legs resolved to ledger paths.
    pub async fn ledger_extract(&mut self) -> ReportResult<Vec<LedgerExtractRow>> {
        self.load_chart().await?;
        let entries = self
            .source
            .journal_entries(self.company_id, self.start, self.end)
            .await?;
        Ok(build_ledger_extract(&entries, &self.indices))
    }

    /// Render the period as a plain-text ledger file at `path`.
    ///
    /// Opening balances whose sum strays from zero beyond the tolerance are
    /// flagged, as are unbalanced lots dropped by the batcher.
    pub async fn export_text_ledger(&mut self, path: &Path) -> ReportResult<PathBuf> {
        self.load_chart().await?;
        let opening = self
            .source
            .balances_as_of(self.company_id, self.opening_date())
            .await?;

        let total: BigDecimal = opening.iter().map(|balance| &balance.amount).sum();
        if total.abs() > imbalance_tolerance() {
            let warning = ReportWarning::OpeningImbalance {
                total: round2(&total),
            };
            log::warn!("{}", warning);
            self.warnings.push(warning);
        }

        let entries = self
            .source
            .journal_entries(self.company_id, self.start, self.end)
            .await?;
        let outcome = batch_journal_entries(&entries, &self.indices);
        self.warnings.extend(outcome.warnings);

        let writer = TextLedgerWriter {
            company_id: self.company_id,
            start: self.start,
            end: self.end,
            currency: self.config.currency.clone(),
            opening_equity_account: self.config.opening_equity_account.clone(),
        };
        let legs = map_opening_balances(&opening, &self.indices);
        writer.write_to(path, &legs, &outcome.transactions)
    }

    /// Data-quality findings accumulated so far.
    pub fn warnings(&self) -> &[ReportWarning] {
        &self.warnings
    }

    /// Drain the accumulated findings.
    pub fn take_warnings(&mut self) -> Vec<ReportWarning> {
        std::mem::take(&mut self.warnings)
    }
}
