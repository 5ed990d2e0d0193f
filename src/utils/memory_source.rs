//! In-memory `DataSource` for tests and examples

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;

use crate::statements::PeriodGrouping;
use crate::traits::DataSource;
use crate::types::{
    Balance, ChartAccount, JournalEntry, Movement, ReportError, ReportResult,
};
use crate::utils::clean_account_code;

#[derive(Debug, Default)]
struct Inner {
    accounts: Vec<ChartAccount>,
    /// Balance snapshots: (snapshot date, balance), later entries win
    opening: Vec<(NaiveDate, Balance)>,
    entries: Vec<JournalEntry>,
}

/// Single-tenant in-memory bookkeeping store.
///
/// Balances are derived on demand: the latest snapshot at or before the
/// requested date, plus every journal leg dated after the snapshot. The
/// `company_id` arguments of `DataSource` are ignored.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    inner: Arc<RwLock<Inner>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> ReportResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| ReportError::Source("memory source lock poisoned".to_string()))
    }

    fn write(&self) -> ReportResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| ReportError::Source("memory source lock poisoned".to_string()))
    }

    pub fn add_account(&self, account: ChartAccount) -> ReportResult<()> {
        self.write()?.accounts.push(account);
        Ok(())
    }

    /// Record the signed balance of an account as of a snapshot date.
    pub fn set_opening_balance(
        &self,
        account_code: impl Into<String>,
        amount: BigDecimal,
        as_of: NaiveDate,
    ) -> ReportResult<()> {
        self.write()?
            .opening
            .push((as_of, Balance::new(account_code, amount)));
        Ok(())
    }

    pub fn add_entry(&self, entry: JournalEntry) -> ReportResult<()> {
        self.write()?.entries.push(entry);
        Ok(())
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn chart_of_accounts(&self, _company_id: i64) -> ReportResult<Vec<ChartAccount>> {
        Ok(self.read()?.accounts.clone())
    }

    async fn balances_as_of(
        &self,
        _company_id: i64,
        as_of: NaiveDate,
    ) -> ReportResult<Vec<Balance>> {
        let inner = self.read()?;

        // amount plus the snapshot date already folded in, if any
        let mut balances: BTreeMap<String, (BigDecimal, Option<NaiveDate>)> = BTreeMap::new();
        for (snapshot, balance) in &inner.opening {
            if *snapshot <= as_of {
                balances.insert(
                    balance.account_code.clone(),
                    (balance.amount.clone(), Some(*snapshot)),
                );
            }
        }

        for entry in &inner.entries {
            if entry.date > as_of {
                continue;
            }
            if let Some(code) = clean_account_code(&entry.debit_code) {
                let slot = balances
                    .entry(code.to_string())
                    .or_insert_with(|| (BigDecimal::from(0), None));
                if slot.1.map(|snapshot| entry.date > snapshot).unwrap_or(true) {
                    slot.0 += &entry.amount;
                }
            }
            if let Some(code) = clean_account_code(&entry.credit_code) {
                let slot = balances
                    .entry(code.to_string())
                    .or_insert_with(|| (BigDecimal::from(0), None));
                if slot.1.map(|snapshot| entry.date > snapshot).unwrap_or(true) {
                    slot.0 -= &entry.amount;
                }
            }
        }

        Ok(balances
            .into_iter()
            .filter(|(_, (amount, _))| !amount.is_zero())
            .map(|(code, (amount, _))| Balance::new(code, amount))
            .collect())
    }

    async fn period_movements(
        &self,
        _company_id: i64,
        from: NaiveDate,
        to: NaiveDate,
        grouping: PeriodGrouping,
    ) -> ReportResult<Vec<Movement>> {
        let inner = self.read()?;

        let mut sums: BTreeMap<(String, Option<String>), BigDecimal> = BTreeMap::new();
        for entry in &inner.entries {
            if entry.date < from || entry.date > to {
                continue;
            }
            let period = grouping.label(entry.date);
            if let Some(code) = clean_account_code(&entry.debit_code) {
                *sums
                    .entry((code.to_string(), period.clone()))
                    .or_insert_with(|| BigDecimal::from(0)) += &entry.amount;
            }
            if let Some(code) = clean_account_code(&entry.credit_code) {
                *sums
                    .entry((code.to_string(), period.clone()))
                    .or_insert_with(|| BigDecimal::from(0)) -= &entry.amount;
            }
        }

        Ok(sums
            .into_iter()
            .map(|((code, period), amount)| Movement {
                account_code: code,
                period,
                amount,
            })
            .collect())
    }

    async fn journal_entries(
        &self,
        _company_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ReportResult<Vec<JournalEntry>> {
        let inner = self.read()?;
        let mut entries: Vec<JournalEntry> = inner
            .entries
            .iter()
            .filter(|entry| entry.date >= from && entry.date <= to)
            .cloned()
            .collect();
        entries.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.lot_id.cmp(&b.lot_id))
                .then_with(|| a.entry_no.cmp(&b.entry_no))
        });
        Ok(entries)
    }
}
