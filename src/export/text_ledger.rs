//! Lot batching and plain-text ledger file rendering

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mapping::AccountIndices;
use crate::types::{Balance, JournalEntry, ReportResult, ReportWarning};
use crate::utils::{clean_account_code, imbalance_tolerance, round2};

/// One posting of a ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLeg {
    pub account: String,
    pub amount: BigDecimal,
}

/// One balanced transaction assembled from a journal lot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub date: NaiveDate,
    pub history: String,
    /// "Doc N Lote L Usu U" metadata string, possibly empty
    pub meta: String,
    /// Per-account debit sums, positive
    pub debits: Vec<LedgerLeg>,
    /// Per-account credit sums, stored positive and rendered negated
    pub credits: Vec<LedgerLeg>,
}

/// Result of batching a journal: transactions that balanced, plus warnings
/// for the lots that did not
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    pub transactions: Vec<LedgerTransaction>,
    pub warnings: Vec<ReportWarning>,
}

fn push_unique(list: &mut Vec<String>, code: &str) {
    if !list.iter().any(|c| c == code) {
        list.push(code.to_string());
    }
}

/// Group journal entries into balanced transactions, one per (lot, date).
///
/// Each side of a lot is summed per mapped account; legs on placeholder or
/// unmapped codes contribute nothing. A lot whose two sides come out empty is
/// skipped silently; a lot whose debit and credit totals differ by more than
/// 0.01 is skipped with an `UnbalancedLot` warning listing the codes that
/// failed to map. History and metadata come from the lot's first entry.
pub fn batch_journal_entries(
    entries: &[JournalEntry],
    indices: &AccountIndices,
) -> BatchOutcome {
    let mut groups: BTreeMap<(String, NaiveDate), Vec<&JournalEntry>> = BTreeMap::new();
    for entry in entries {
        if clean_account_code(&entry.debit_code).is_none()
            && clean_account_code(&entry.credit_code).is_none()
        {
            continue;
        }
        groups
            .entry((entry.lot_id.clone(), entry.date))
            .or_default()
            .push(entry);
    }

    let tolerance = imbalance_tolerance();
    let mut outcome = BatchOutcome::default();

    for ((lot_id, date), group) in groups {
        let mut debits: BTreeMap<String, BigDecimal> = BTreeMap::new();
        let mut credits: BTreeMap<String, BigDecimal> = BTreeMap::new();
        let mut unmapped_debits: Vec<String> = Vec::new();
        let mut unmapped_credits: Vec<String> = Vec::new();

        for entry in &group {
            if let Some(code) = clean_account_code(&entry.debit_code) {
                match indices.path_for_code(code) {
                    Some(path) => {
                        *debits
                            .entry(path.to_string())
                            .or_insert_with(|| BigDecimal::from(0)) += &entry.amount
                    }
                    None => push_unique(&mut unmapped_debits, code),
                }
            }
            if let Some(code) = clean_account_code(&entry.credit_code) {
                match indices.path_for_code(code) {
                    Some(path) => {
                        *credits
                            .entry(path.to_string())
                            .or_insert_with(|| BigDecimal::from(0)) += &entry.amount
                    }
                    None => push_unique(&mut unmapped_credits, code),
                }
            }
        }

        if debits.is_empty() && credits.is_empty() {
            continue;
        }

        let debit_total: BigDecimal = debits.values().sum();
        let credit_total: BigDecimal = credits.values().sum();
        if (&debit_total - &credit_total).abs() > tolerance {
            let warning = ReportWarning::UnbalancedLot {
                lot_id,
                date,
                debit_total: round2(&debit_total),
                credit_total: round2(&credit_total),
                unmapped_debits,
                unmapped_credits,
            };
            log::warn!("{}", warning);
            outcome.warnings.push(warning);
            continue;
        }

        let first = group[0];
        let history = first.history.replace('\n', " ").trim().to_string();
        let meta = [
            ("Doc", first.document.trim()),
            ("Lote", lot_id.trim()),
            ("Usu", first.user_id.trim()),
        ]
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{} {}", label, value))
        .collect::<Vec<_>>()
        .join(" ");

        outcome.transactions.push(LedgerTransaction {
            date,
            history,
            meta,
            debits: debits
                .into_iter()
                .map(|(account, amount)| LedgerLeg { account, amount })
                .collect(),
            credits: credits
                .into_iter()
                .map(|(account, amount)| LedgerLeg { account, amount })
                .collect(),
        });
    }

    outcome
}

/// Resolve opening balances into ledger legs, dropping codes the chart does
/// not map and sorting by account path.
pub fn map_opening_balances(balances: &[Balance], indices: &AccountIndices) -> Vec<LedgerLeg> {
    let mut legs: Vec<LedgerLeg> = balances
        .iter()
        .filter_map(|balance| {
            let code = clean_account_code(&balance.account_code)?;
            let path = indices.path_for_code(code)?;
            Some(LedgerLeg {
                account: path.to_string(),
                amount: balance.amount.clone(),
            })
        })
        .collect();
    legs.sort_by(|a, b| a.account.cmp(&b.account));
    legs
}

/// Renders a period of bookkeeping as a plain-text ledger file
#[derive(Debug, Clone)]
pub struct TextLedgerWriter {
    pub company_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub currency: String,
    pub opening_equity_account: String,
}

impl TextLedgerWriter {
    fn fmt_amount(&self, amount: &BigDecimal) -> String {
        format!("{} {}", round2(amount), self.currency)
    }

    fn posting(&self, account: &str, amount: &BigDecimal) -> String {
        format!("  {:<60} {}\n", account, self.fmt_amount(amount))
    }

    /// Render the full file: header, open declarations for every used
    /// account, the opening transaction dated at period start with balances
    /// up to the previous day, then one block per transaction.
    pub fn render(&self, opening: &[LedgerLeg], transactions: &[LedgerTransaction]) -> String {
        let day_before = self.start.pred_opt().unwrap_or(self.start);

        let mut used: BTreeSet<&str> = BTreeSet::new();
        for leg in opening {
            used.insert(&leg.account);
        }
        for tx in transactions {
            for leg in tx.debits.iter().chain(&tx.credits) {
                used.insert(&leg.account);
            }
        }
        used.insert(&self.opening_equity_account);

        let mut out = String::new();
        out.push_str(&format!(
            "; Empresa {} | periodo {} a {}\n",
            self.company_id, self.start, self.end
        ));
        out.push_str(&format!(
            "option \"operating_currency\" \"{}\"\n",
            self.currency
        ));
        out.push_str("option \"title\" \"Contabilidade\"\n\n");

        for account in &used {
            out.push_str(&format!(
                "{} open {} {}\n",
                self.start, account, self.currency
            ));
        }
        out.push('\n');

        if !opening.is_empty() {
            out.push_str(&format!(
                "{} * \"Abertura de saldos\" \"Saldo até {}\"\n",
                self.start, day_before
            ));
            for leg in opening {
                out.push_str(&self.posting(&leg.account, &leg.amount));
            }
            // residual leg, amount left for the ledger tool to infer
            out.push_str(&format!("  {}\n\n", self.opening_equity_account));
        }

        for tx in transactions {
            out.push_str(&format!(
                "{} * \"{}\" \"{}\"\n",
                tx.date, tx.history, tx.meta
            ));
            for leg in &tx.debits {
                out.push_str(&self.posting(&leg.account, &leg.amount));
            }
            for leg in &tx.credits {
                out.push_str(&self.posting(&leg.account, &(-&leg.amount)));
            }
            out.push('\n');
        }

        out
    }

    /// Render and write to `path`, creating parent directories as needed.
    pub fn write_to(
        &self,
        path: &Path,
        opening: &[LedgerLeg],
        transactions: &[LedgerTransaction],
    ) -> ReportResult<PathBuf> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(self.render(opening, transactions).as_bytes())?;
        writer.flush()?;
        Ok(path.to_path_buf())
    }
}
