//! CSV rendering of the report tables

use bigdecimal::BigDecimal;

use crate::mapping::MappedAccount;
use crate::statements::{BalanceSheetRow, IncomeStatement, TrialBalanceRow};

const SEPARATOR: char = ';';

fn field(value: &str) -> String {
    if value.contains(SEPARATOR) || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn amount_field(value: &Option<BigDecimal>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn line(fields: &[String]) -> String {
    let mut out = fields.join(&SEPARATOR.to_string());
    out.push('\n');
    out
}

/// Render the mapped chart as CSV, sorted by classification code.
pub fn account_map_to_csv(mapped: &[MappedAccount]) -> String {
    let mut sorted: Vec<&MappedAccount> = mapped.iter().collect();
    sorted.sort_by(|a, b| a.classification.cmp(&b.classification));

    let mut out = line(&[
        "Código".to_string(),
        "Nome".to_string(),
        "Classificação".to_string(),
        "Categoria".to_string(),
        "Conta".to_string(),
    ]);
    for account in sorted {
        out.push_str(&line(&[
            field(&account.code),
            field(&account.name),
            field(&account.classification),
            field(&account.category),
            field(&account.path),
        ]));
    }
    out
}

/// Render the trial balance as CSV.
pub fn trial_balance_to_csv(rows: &[TrialBalanceRow]) -> String {
    let mut out = line(&[
        "Código".to_string(),
        "Nome".to_string(),
        "Classificação".to_string(),
        "Saldo Inicial".to_string(),
        "Total Débitos".to_string(),
        "Total Créditos".to_string(),
        "Saldo Final".to_string(),
    ]);
    for row in rows {
        out.push_str(&line(&[
            field(&row.code),
            field(&row.name),
            field(&row.classification),
            row.opening.to_string(),
            row.debits.to_string(),
            row.credits.to_string(),
            row.closing.to_string(),
        ]));
    }
    out
}

/// Render the balance sheet as CSV; header and spacer rows leave the amount
/// column empty.
pub fn balance_sheet_to_csv(rows: &[BalanceSheetRow]) -> String {
    let mut out = line(&["Conta/Categoria".to_string(), "Saldo".to_string()]);
    for row in rows {
        out.push_str(&line(&[field(&row.label), amount_field(&row.amount)]));
    }
    out
}

/// Render the income statement as CSV with one column per statement column.
pub fn income_statement_to_csv(statement: &IncomeStatement) -> String {
    let mut header = vec!["Item".to_string()];
    header.extend(statement.columns.iter().map(|c| field(c)));
    let mut out = line(&header);

    for row in &statement.rows {
        let mut fields = vec![field(&row.label)];
        fields.extend(row.values.iter().map(amount_field));
        out.push_str(&line(&fields));
    }
    out
}
