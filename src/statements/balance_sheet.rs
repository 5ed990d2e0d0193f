//! Balance sheet builder

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mapping::MappedAccount;
use crate::types::{Balance, Category, CATEGORY_UNKNOWN, NAME_NOT_FOUND};
use crate::utils::round2;

/// One display row of the balance sheet; headers and spacers carry no amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSheetRow {
    pub label: String,
    pub amount: Option<BigDecimal>,
}

impl BalanceSheetRow {
    fn header(label: &str) -> Self {
        Self {
            label: label.to_string(),
            amount: None,
        }
    }

    fn valued(label: String, amount: &BigDecimal) -> Self {
        Self {
            label,
            amount: Some(round2(amount)),
        }
    }

    fn blank() -> Self {
        Self {
            label: String::new(),
            amount: None,
        }
    }
}

struct SheetLine<'a> {
    name: &'a str,
    code: &'a str,
    category: Category,
    amount: &'a BigDecimal,
}

fn section_total(lines: &[&SheetLine<'_>]) -> BigDecimal {
    lines.iter().map(|line| line.amount).sum()
}

fn push_subsection(
    rows: &mut Vec<BalanceSheetRow>,
    header: &str,
    lines: &[&SheetLine<'_>],
) {
    if lines.is_empty() {
        return;
    }
    rows.push(BalanceSheetRow::valued(
        header.to_string(),
        &section_total(lines),
    ));
    for line in lines {
        rows.push(BalanceSheetRow::valued(
            format!("    {} ({})", line.name, line.code),
            line.amount,
        ));
    }
}

/// Build the balance sheet from point-in-time balances and a mapped chart.
///
/// Balances join the chart by account code; codes missing from the chart are
/// shown under "Unknown" with a placeholder name and still count in totals.
/// Sections appear only when they have at least one balance. Memorandum and
/// transitory equity groups ("Contas-") are excluded from the itemized equity
/// rows but included in its total.
pub fn build_balance_sheet(
    balances: &[Balance],
    chart: &[MappedAccount],
) -> Vec<BalanceSheetRow> {
    if balances.is_empty() {
        return Vec::new();
    }

    let by_code: HashMap<&str, &MappedAccount> = chart
        .iter()
        .map(|account| (account.code.as_str(), account))
        .collect();

    let lines: Vec<SheetLine<'_>> = balances
        .iter()
        .map(|balance| {
            let code = balance.account_code.trim();
            match by_code.get(code) {
                Some(account) => SheetLine {
                    name: &account.name,
                    code,
                    category: Category::parse(&account.category),
                    amount: &balance.amount,
                },
                None => SheetLine {
                    name: NAME_NOT_FOUND,
                    code,
                    category: Category::parse(CATEGORY_UNKNOWN),
                    amount: &balance.amount,
                },
            }
        })
        .collect();

    let assets: Vec<&SheetLine<'_>> = lines
        .iter()
        .filter(|line| line.category.root() == "Assets")
        .collect();
    let liabilities: Vec<&SheetLine<'_>> = lines
        .iter()
        .filter(|line| line.category.root() == "Liabilities")
        .collect();
    let equity: Vec<&SheetLine<'_>> = lines
        .iter()
        .filter(|line| line.category.root() == "Equity")
        .collect();

    let mut rows = Vec::new();

    if !assets.is_empty() {
        rows.push(BalanceSheetRow::header("ATIVO"));
        let current: Vec<&SheetLine<'_>> = assets
            .iter()
            .filter(|line| line.category.has_segment_containing("Ativo-Circulante"))
            .copied()
            .collect();
        push_subsection(&mut rows, "  Ativo Circulante", &current);
        let non_current: Vec<&SheetLine<'_>> = assets
            .iter()
            .filter(|line| line.category.has_segment_containing("Ativo-Nao-Circulante"))
            .copied()
            .collect();
        push_subsection(&mut rows, "  Ativo Não Circulante", &non_current);
        rows.push(BalanceSheetRow::valued(
            "TOTAL ATIVO".to_string(),
            &section_total(&assets),
        ));
        rows.push(BalanceSheetRow::blank());
    }

    if !liabilities.is_empty() {
        rows.push(BalanceSheetRow::header("PASSIVO"));
        let current: Vec<&SheetLine<'_>> = liabilities
            .iter()
            .filter(|line| line.category.has_segment_containing("Passivo-Circulante"))
            .copied()
            .collect();
        push_subsection(&mut rows, "  Passivo Circulante", &current);
        let non_current: Vec<&SheetLine<'_>> = liabilities
            .iter()
            .filter(|line| line.category.has_segment_containing("Passivo-Nao-Circulante"))
            .copied()
            .collect();
        push_subsection(&mut rows, "  Passivo Não Circulante", &non_current);
        rows.push(BalanceSheetRow::valued(
            "TOTAL PASSIVO".to_string(),
            &section_total(&liabilities),
        ));
        rows.push(BalanceSheetRow::blank());
    }

    if !equity.is_empty() {
        rows.push(BalanceSheetRow::header("PATRIMÔNIO LÍQUIDO"));
        // memorandum/transitory groups are totalled but not itemized
        for line in equity
            .iter()
            .filter(|line| !line.category.has_segment_containing("Contas-"))
        {
            rows.push(BalanceSheetRow::valued(
                format!("  {} ({})", line.name, line.code),
                line.amount,
            ));
        }
        let total_equity = section_total(&equity);
        rows.push(BalanceSheetRow::valued(
            "TOTAL PATRIMÔNIO LÍQUIDO".to_string(),
            &total_equity,
        ));
        rows.push(BalanceSheetRow::blank());

        let total: BigDecimal =
            section_total(&assets) + section_total(&liabilities) + total_equity;
        rows.push(BalanceSheetRow::valued("TOTAL GERAL".to_string(), &total));
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::AccountMapper;
    use crate::types::ChartAccount;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn mapped(chart: Vec<ChartAccount>) -> Vec<MappedAccount> {
        AccountMapper::new().map_chart(&chart, true).unwrap()
    }

    fn label_of(rows: &[BalanceSheetRow], label: &str) -> Option<BigDecimal> {
        rows.iter()
            .find(|r| r.label == label)
            .and_then(|r| r.amount.clone())
    }

    #[test]
    fn test_sections_and_totals() {
        let chart = mapped(vec![
            ChartAccount::new("101", "CAIXA", "11"),
            ChartAccount::new("151", "IMOBILIZADO", "12"),
            ChartAccount::new("201", "FORNECEDORES", "21"),
            ChartAccount::new("301", "CAPITAL SOCIAL", "23"),
        ]);
        let balances = vec![
            Balance::new("101", dec("1000.00")),
            Balance::new("151", dec("500.00")),
            Balance::new("201", dec("-700.00")),
            Balance::new("301", dec("-800.00")),
        ];

        let rows = build_balance_sheet(&balances, &chart);
        assert_eq!(rows[0].label, "ATIVO");
        assert_eq!(rows[0].amount, None);
        assert_eq!(label_of(&rows, "  Ativo Circulante"), Some(dec("1000.00")));
        assert_eq!(
            label_of(&rows, "  Ativo Não Circulante"),
            Some(dec("500.00"))
        );
        assert_eq!(label_of(&rows, "TOTAL ATIVO"), Some(dec("1500.00")));
        assert_eq!(label_of(&rows, "TOTAL PASSIVO"), Some(dec("-700.00")));
        assert_eq!(
            label_of(&rows, "TOTAL PATRIMÔNIO LÍQUIDO"),
            Some(dec("-800.00"))
        );
        assert_eq!(label_of(&rows, "TOTAL GERAL"), Some(dec("0.00")));
        assert!(rows.iter().any(|r| r.label == "    CAIXA (101)"));
        assert!(rows.iter().any(|r| r.label == "  CAPITAL SOCIAL (301)"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let chart = mapped(vec![ChartAccount::new("101", "CAIXA", "11")]);
        let balances = vec![Balance::new("101", dec("10.00"))];
        let rows = build_balance_sheet(&balances, &chart);
        assert!(rows.iter().all(|r| r.label != "PASSIVO"));
        assert!(rows.iter().all(|r| r.label != "TOTAL GERAL"));
    }

    #[test]
    fn test_unknown_code_counts_but_is_placeholdered() {
        let chart = mapped(vec![ChartAccount::new("301", "CAPITAL", "23")]);
        let balances = vec![
            Balance::new("301", dec("-50.00")),
            Balance::new("999", dec("50.00")),
        ];
        let rows = build_balance_sheet(&balances, &chart);
        // unmatched code lands in no section but the sheet still renders equity
        assert_eq!(
            label_of(&rows, "TOTAL PATRIMÔNIO LÍQUIDO"),
            Some(dec("-50.00"))
        );
        assert!(rows.iter().all(|r| !r.label.contains("999")));
    }

    #[test]
    fn test_memorandum_equity_totalled_not_itemized() {
        let chart = mapped(vec![
            ChartAccount::new("301", "CAPITAL", "23"),
            ChartAccount::new("901", "COMPENSACAO", "9"),
        ]);
        let balances = vec![
            Balance::new("301", dec("-100.00")),
            Balance::new("901", dec("-5.00")),
        ];
        let rows = build_balance_sheet(&balances, &chart);
        assert!(rows.iter().all(|r| !r.label.contains("COMPENSACAO")));
        assert_eq!(
            label_of(&rows, "TOTAL PATRIMÔNIO LÍQUIDO"),
            Some(dec("-105.00"))
        );
    }

    #[test]
    fn test_no_balances_means_no_rows() {
        let chart = mapped(vec![ChartAccount::new("101", "CAIXA", "11")]);
        assert!(build_balance_sheet(&[], &chart).is_empty());
    }
}
