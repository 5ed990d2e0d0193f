//! Ledger extract: journal entries reshaped for review

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::mapping::AccountIndices;
use crate::types::JournalEntry;
use crate::utils::clean_account_code;

/// One journal row with both legs resolved to ledger paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerExtractRow {
    pub date: NaiveDate,
    pub debit_code: String,
    pub debit_account: String,
    pub credit_code: String,
    pub credit_account: String,
    pub history: String,
    pub document: String,
    pub lot_id: String,
    pub amount: BigDecimal,
}

/// Reshape journal entries into review rows.
///
/// Placeholder codes ("0", empty) come out as empty strings; codes missing
/// from the index leave the account column empty. Rows sort by (date, lot).
pub fn build_ledger_extract(
    entries: &[JournalEntry],
    indices: &AccountIndices,
) -> Vec<LedgerExtractRow> {
    let mut rows: Vec<LedgerExtractRow> = entries
        .iter()
        .map(|entry| {
            let debit_code = clean_account_code(&entry.debit_code).unwrap_or("");
            let credit_code = clean_account_code(&entry.credit_code).unwrap_or("");
            LedgerExtractRow {
                date: entry.date,
                debit_code: debit_code.to_string(),
                debit_account: indices.path_for_code(debit_code).unwrap_or("").to_string(),
                credit_code: credit_code.to_string(),
                credit_account: indices.path_for_code(credit_code).unwrap_or("").to_string(),
                history: entry.history.clone(),
                document: entry.document.clone(),
                lot_id: entry.lot_id.clone(),
                amount: entry.amount.clone(),
            }
        })
        .collect();

    rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.lot_id.cmp(&b.lot_id)));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::AccountMapper;
    use crate::types::ChartAccount;
    use std::str::FromStr;

    fn entry(lot: &str, day: u32, debit: &str, credit: &str) -> JournalEntry {
        JournalEntry {
            lot_id: lot.to_string(),
            entry_no: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            debit_code: debit.to_string(),
            credit_code: credit.to_string(),
            amount: BigDecimal::from_str("10.00").unwrap(),
            history: "pagamento".to_string(),
            document: "NF 1".to_string(),
            user_id: "7".to_string(),
        }
    }

    #[test]
    fn test_paths_resolved_and_sorted() {
        let mapper = AccountMapper::new();
        let chart = vec![
            ChartAccount::new("101", "CAIXA", "11"),
            ChartAccount::new("201", "FORNECEDORES", "21"),
        ];
        let mapped = mapper.map_chart(&chart, true).unwrap();
        let indices = mapper.build_indices(&mapped);

        let entries = vec![
            entry("9", 20, "101", "201"),
            entry("2", 5, "999", "0"),
            entry("1", 5, "101", "0"),
        ];
        let rows = build_ledger_extract(&entries, &indices);

        assert_eq!(rows[0].lot_id, "1");
        assert_eq!(rows[1].lot_id, "2");
        assert_eq!(rows[2].lot_id, "9");

        assert_eq!(rows[2].debit_account, "Assets:Ativo-Circulante:Caixa");
        assert_eq!(rows[2].credit_account, "Liabilities:Passivo-Circulante:Fornecedores");

        // unknown code keeps the code but leaves the account empty
        assert_eq!(rows[1].debit_code, "999");
        assert_eq!(rows[1].debit_account, "");
        // placeholder code clears both columns
        assert_eq!(rows[1].credit_code, "");
        assert_eq!(rows[1].credit_account, "");
    }
}
