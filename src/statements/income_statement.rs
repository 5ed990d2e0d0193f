//! Income statement builder with optional period bucketing

use bigdecimal::{BigDecimal, Zero};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mapping::MappedAccount;
use crate::types::{Category, Movement, ReportWarning, CATEGORY_UNKNOWN, NAME_NOT_FOUND};
use crate::utils::round2;

/// How period movements are bucketed into statement columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodGrouping {
    /// Single value column covering the whole period
    #[default]
    None,
    /// One column per calendar year, labelled "2025"
    Annual,
    /// One column per month, labelled "Jan/25"
    Monthly,
    /// One column per quarter, labelled "1T/25"
    Quarterly,
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

impl PeriodGrouping {
    /// Column label for a date, `None` for the ungrouped mode.
    pub fn label(&self, date: NaiveDate) -> Option<String> {
        match self {
            PeriodGrouping::None => None,
            PeriodGrouping::Annual => Some(date.year().to_string()),
            PeriodGrouping::Monthly => Some(format!(
                "{}/{:02}",
                MONTH_ABBREV[date.month0() as usize],
                date.year() % 100
            )),
            PeriodGrouping::Quarterly => Some(format!(
                "{}T/{:02}",
                (date.month0() / 3) + 1,
                date.year() % 100
            )),
        }
    }

    /// Order period labels chronologically. Labels that do not parse keep
    /// their incoming relative order, after the parseable ones for monthly
    /// and at the front for annual/quarterly.
    pub fn sort_periods(&self, periods: Vec<String>) -> Vec<String> {
        match self {
            PeriodGrouping::None => periods,
            PeriodGrouping::Annual => {
                let mut periods = periods;
                periods.sort_by_key(|p| p.parse::<i32>().unwrap_or(0));
                periods
            }
            PeriodGrouping::Monthly => {
                let mut dated: Vec<(i32, u32, String)> = Vec::new();
                let mut undated: Vec<String> = Vec::new();
                for p in periods {
                    match parse_month_label(&p) {
                        Some((year, month)) => dated.push((year, month, p)),
                        None => undated.push(p),
                    }
                }
                dated.sort_by_key(|(year, month, _)| (*year, *month));
                dated
                    .into_iter()
                    .map(|(_, _, p)| p)
                    .chain(undated)
                    .collect()
            }
            PeriodGrouping::Quarterly => {
                let mut periods = periods;
                periods.sort_by_key(|p| parse_quarter_label(p).unwrap_or((0, 0)));
                periods
            }
        }
    }
}

fn parse_month_label(label: &str) -> Option<(i32, u32)> {
    let (month_part, year_part) = label.split_once('/')?;
    let month = MONTH_ABBREV
        .iter()
        .position(|abbrev| abbrev.eq_ignore_ascii_case(month_part))? as u32
        + 1;
    let year: i32 = year_part.parse().ok()?;
    Some((year, month))
}

fn parse_quarter_label(label: &str) -> Option<(i32, u32)> {
    let (quarter_part, year_part) = label.split_once("T/")?;
    let quarter: u32 = quarter_part.parse().ok()?;
    let year: i32 = year_part.parse().ok()?;
    Some((year, quarter))
}

/// One display row; headers and spacers carry all-`None` values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatementRow {
    pub label: String,
    pub values: Vec<Option<BigDecimal>>,
}

/// Income statement table: value column names plus the rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub columns: Vec<String>,
    pub rows: Vec<IncomeStatementRow>,
    pub warnings: Vec<ReportWarning>,
}

struct StatementLine {
    code: String,
    name: String,
    category: Category,
    /// One value per column, raw sign as delivered by the source
    values: Vec<BigDecimal>,
}

impl StatementLine {
    fn negate(&mut self) {
        for value in &mut self.values {
            *value = -std::mem::take(value);
        }
    }
}

fn blank_row(width: usize) -> IncomeStatementRow {
    IncomeStatementRow {
        label: String::new(),
        values: vec![None; width],
    }
}

fn header_row(label: &str, width: usize) -> IncomeStatementRow {
    IncomeStatementRow {
        label: label.to_string(),
        values: vec![None; width],
    }
}

fn leaf_row(line: &StatementLine) -> IncomeStatementRow {
    IncomeStatementRow {
        label: format!("    {} ({})", line.name, line.code),
        values: line.values.iter().map(|v| Some(round2(v))).collect(),
    }
}

fn column_sums(lines: &[&StatementLine], width: usize) -> Vec<BigDecimal> {
    let mut sums = vec![BigDecimal::from(0); width];
    for line in lines {
        for (sum, value) in sums.iter_mut().zip(&line.values) {
            *sum += value;
        }
    }
    sums
}

fn subtotal_row(label: &str, lines: &[&StatementLine], width: usize) -> IncomeStatementRow {
    IncomeStatementRow {
        label: label.to_string(),
        values: column_sums(lines, width)
            .iter()
            .map(|v| Some(round2(v)))
            .collect(),
    }
}

/// A sub-bucket of a section: header label, total label, and the category
/// fragment that claims a line. `None` catches everything left over.
struct Bucket {
    header: &'static str,
    total: &'static str,
    fragment: Option<&'static str>,
}

const INCOME_BUCKETS: [Bucket; 3] = [
    Bucket {
        header: "  Receitas Operacionais",
        total: "  Total Receitas Operacionais",
        fragment: Some("Operacionais"),
    },
    Bucket {
        header: "  Receitas Financeiras",
        total: "  Total Receitas Financeiras",
        fragment: Some("Financeiras"),
    },
    Bucket {
        header: "  Outras Receitas",
        total: "  Total Outras Receitas",
        fragment: None,
    },
];

const EXPENSE_BUCKETS: [Bucket; 4] = [
    Bucket {
        header: "  (-) Custos",
        total: "  Total Custos",
        fragment: Some("Custos"),
    },
    Bucket {
        header: "  (-) Despesas Operacionais",
        total: "  Total Despesas Operacionais",
        fragment: Some("Despesas-Operacionais"),
    },
    Bucket {
        header: "  (-) Despesas Financeiras",
        total: "  Total Despesas Financeiras",
        fragment: Some("Despesas-Financeiras"),
    },
    Bucket {
        header: "  (-) Outras Despesas",
        total: "  Total Outras Despesas",
        fragment: None,
    },
];

/// Append one section (income or expenses): title, buckets with leaves and
/// per-bucket totals, then the section total. Each line lands in exactly one
/// bucket, the first whose fragment its category contains.
fn emit_section(
    rows: &mut Vec<IncomeStatementRow>,
    title: &str,
    total_label: &str,
    lines: &[StatementLine],
    buckets: &[Bucket],
    width: usize,
) {
    rows.push(header_row(title, width));

    let mut assigned: Vec<Vec<&StatementLine>> = vec![Vec::new(); buckets.len()];
    for line in lines {
        let slot = buckets
            .iter()
            .position(|bucket| match bucket.fragment {
                Some(fragment) => line.category.has_segment_containing(fragment),
                None => true,
            })
            .unwrap_or(buckets.len() - 1);
        assigned[slot].push(line);
    }

    for (bucket, members) in buckets.iter().zip(&assigned) {
        if members.is_empty() {
            continue;
        }
        rows.push(subtotal_row(bucket.header, members, width));
        for line in members.iter() {
            rows.push(leaf_row(line));
        }
        rows.push(subtotal_row(bucket.total, members, width));
        rows.push(blank_row(width));
    }

    let all: Vec<&StatementLine> = lines.iter().collect();
    rows.push(subtotal_row(total_label, &all, width));
    rows.push(blank_row(width));
}

/// Build the income statement from period movements and a mapped chart.
///
/// Income rows (credited, negative movements) and expense rows (debited,
/// positive movements) are sign-inverted for display, so revenue shows
/// positive and expenses negative; the result line is their plain sum.
/// Movements on codes outside the chart or classified "Unknown" are excluded
/// from the sections and reported as warnings. With a grouping other than
/// `None`, accounts are pivoted into one column per period plus a `Total`
/// column, and accounts whose total is exactly zero are dropped.
pub fn build_income_statement(
    movements: &[Movement],
    chart: &[MappedAccount],
    grouping: PeriodGrouping,
) -> IncomeStatement {
    if movements.is_empty() {
        return IncomeStatement {
            columns: match grouping {
                PeriodGrouping::None => vec!["Valor".to_string()],
                _ => Vec::new(),
            },
            rows: Vec::new(),
            warnings: Vec::new(),
        };
    }

    let by_code: HashMap<&str, &MappedAccount> = chart
        .iter()
        .map(|account| (account.code.as_str(), account))
        .collect();

    let resolve = |code: &str| -> (String, String, String) {
        match by_code.get(code.trim()) {
            Some(account) => (
                account.name.clone(),
                account.classification.clone(),
                account.category.clone(),
            ),
            None => (
                NAME_NOT_FOUND.to_string(),
                String::new(),
                CATEGORY_UNKNOWN.to_string(),
            ),
        }
    };

    let mut warnings = Vec::new();
    let (columns, lines) = match grouping {
        PeriodGrouping::None => {
            let lines: Vec<StatementLine> = movements
                .iter()
                .map(|movement| {
                    let (name, classification, category) = resolve(&movement.account_code);
                    if category == CATEGORY_UNKNOWN {
                        warnings.push(ReportWarning::UnmappedAccount {
                            code: movement.account_code.clone(),
                            name: name.clone(),
                            classification,
                            amount: movement.amount.clone(),
                        });
                    }
                    StatementLine {
                        code: movement.account_code.trim().to_string(),
                        name,
                        category: Category::parse(&category),
                        values: vec![movement.amount.clone()],
                    }
                })
                .collect();
            (vec!["Valor".to_string()], lines)
        }
        _ => {
            let periods = grouping.sort_periods({
                let mut seen = Vec::new();
                for movement in movements {
                    let label = movement.period.clone().unwrap_or_default();
                    if !seen.contains(&label) {
                        seen.push(label);
                    }
                }
                seen
            });
            let period_index: HashMap<&str, usize> = periods
                .iter()
                .enumerate()
                .map(|(i, p)| (p.as_str(), i))
                .collect();

            // pivot: accounts keep first-appearance order
            let mut order: Vec<String> = Vec::new();
            let mut pivot: HashMap<String, StatementLine> = HashMap::new();
            for movement in movements {
                let code = movement.account_code.trim().to_string();
                let line = pivot.entry(code.clone()).or_insert_with(|| {
                    order.push(code.clone());
                    let (name, classification, category) = resolve(&movement.account_code);
                    if category == CATEGORY_UNKNOWN {
                        warnings.push(ReportWarning::UnmappedAccount {
                            code: code.clone(),
                            name: name.clone(),
                            classification,
                            amount: movement.amount.clone(),
                        });
                    }
                    StatementLine {
                        code,
                        name,
                        category: Category::parse(&category),
                        // one slot per period plus the trailing total
                        values: vec![BigDecimal::from(0); periods.len() + 1],
                    }
                });
                let label = movement.period.as_deref().unwrap_or_default();
                if let Some(&slot) = period_index.get(label) {
                    line.values[slot] += &movement.amount;
                }
                let last = line.values.len() - 1;
                line.values[last] += &movement.amount;
            }

            let lines: Vec<StatementLine> = order
                .into_iter()
                .filter_map(|code| pivot.remove(&code))
                .filter(|line| !line.values.last().map(Zero::is_zero).unwrap_or(true))
                .collect();

            let mut columns = periods;
            columns.push("Total".to_string());
            (columns, lines)
        }
    };
    let width = columns.len();

    let mut income: Vec<StatementLine> = Vec::new();
    let mut expenses: Vec<StatementLine> = Vec::new();
    for mut line in lines {
        match line.category.root() {
            "Income" => {
                line.negate();
                income.push(line);
            }
            "Expenses" => {
                line.negate();
                expenses.push(line);
            }
            _ => {}
        }
    }

    let mut rows = Vec::new();
    if !income.is_empty() {
        emit_section(
            &mut rows,
            "RECEITAS",
            "TOTAL RECEITAS",
            &income,
            &INCOME_BUCKETS,
            width,
        );
    }
    if !expenses.is_empty() {
        emit_section(
            &mut rows,
            "(-) CUSTOS E DESPESAS",
            "TOTAL DESPESAS",
            &expenses,
            &EXPENSE_BUCKETS,
            width,
        );
    }

    // expenses are already negative, so the result is a plain sum
    let income_refs: Vec<&StatementLine> = income.iter().collect();
    let expense_refs: Vec<&StatementLine> = expenses.iter().collect();
    let income_sums = column_sums(&income_refs, width);
    let expense_sums = column_sums(&expense_refs, width);
    rows.push(IncomeStatementRow {
        label: "RESULTADO DO PERÍODO".to_string(),
        values: income_sums
            .iter()
            .zip(&expense_sums)
            .map(|(a, b)| Some(round2(&(a + b))))
            .collect(),
    });

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    IncomeStatement {
        columns,
        rows,
        warnings,
    }
}
