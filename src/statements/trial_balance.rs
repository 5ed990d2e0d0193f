//! Trial balance builder

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::mapping::MappedAccount;
use crate::types::{Balance, JournalEntry};
use crate::utils::{clean_account_code, round2};

/// One account row of the trial balance, amounts rounded to two places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub classification: String,
    pub opening: BigDecimal,
    pub debits: BigDecimal,
    pub credits: BigDecimal,
    pub closing: BigDecimal,
}

/// Build the trial balance for a mapped chart over a period.
///
/// Every chart row appears exactly once. Opening balances join by account
/// code (last one wins on duplicates); period debits and credits come from
/// the journal legs referencing the account. Closing is
/// opening + debits − credits.
pub fn build_trial_balance(
    chart: &[MappedAccount],
    opening: &[Balance],
    entries: &[JournalEntry],
) -> Vec<TrialBalanceRow> {
    let mut opening_by_code: HashMap<&str, &BigDecimal> = HashMap::new();
    for balance in opening {
        opening_by_code.insert(balance.account_code.trim(), &balance.amount);
    }

    let mut debits_by_code: HashMap<&str, BigDecimal> = HashMap::new();
    let mut credits_by_code: HashMap<&str, BigDecimal> = HashMap::new();
    for entry in entries {
        if let Some(code) = clean_account_code(&entry.debit_code) {
            *debits_by_code.entry(code).or_insert_with(|| BigDecimal::from(0)) += &entry.amount;
        }
        if let Some(code) = clean_account_code(&entry.credit_code) {
            *credits_by_code.entry(code).or_insert_with(|| BigDecimal::from(0)) += &entry.amount;
        }
    }

    let zero = BigDecimal::from(0);
    let mut rows: Vec<TrialBalanceRow> = chart
        .iter()
        .map(|account| {
            let code = account.code.as_str();
            let opening = opening_by_code.get(code).copied().unwrap_or(&zero);
            let debits = debits_by_code.get(code).unwrap_or(&zero);
            let credits = credits_by_code.get(code).unwrap_or(&zero);
            let closing = opening + debits - credits;
            TrialBalanceRow {
                code: account.code.clone(),
                name: account.name.clone(),
                classification: account.classification.clone(),
                opening: round2(opening),
                debits: round2(debits),
                credits: round2(credits),
                closing: round2(&closing),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.classification.cmp(&b.classification));
    rows
}
