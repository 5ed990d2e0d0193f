use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::str::FromStr;

use contabil_core::{
    ChartAccount, JournalEntry, MemorySource, PeriodGrouping, ReportConfig, ReportPipeline,
    ReportWarning,
};

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn entry(
    lot: &str,
    when: NaiveDate,
    debit: &str,
    credit: &str,
    amount: &str,
    history: &str,
) -> JournalEntry {
    JournalEntry {
        lot_id: lot.to_string(),
        entry_no: 1,
        date: when,
        debit_code: debit.to_string(),
        credit_code: credit.to_string(),
        amount: dec(amount),
        history: history.to_string(),
        document: "12".to_string(),
        user_id: "5".to_string(),
    }
}

/// Cash company: balanced opening, one purchase and one sale in January 2025.
fn seeded_source() -> MemorySource {
    let source = MemorySource::new();
    source
        .add_account(ChartAccount::new("101", "CAIXA GERAL", "11"))
        .unwrap();
    source
        .add_account(ChartAccount::new("201", "FORNECEDORES", "21"))
        .unwrap();
    source
        .add_account(ChartAccount::new("301", "CAPITAL SOCIAL", "23"))
        .unwrap();
    source
        .add_account(ChartAccount::new("311", "MATERIA PRIMA", "31"))
        .unwrap();
    source
        .add_account(ChartAccount::new("401", "VENDAS", "41"))
        .unwrap();

    let snapshot = date(2024, 12, 31);
    source
        .set_opening_balance("101", dec("500.00"), snapshot)
        .unwrap();
    source
        .set_opening_balance("301", dec("-500.00"), snapshot)
        .unwrap();

    source
        .add_entry(entry(
            "1",
            date(2025, 1, 10),
            "311",
            "101",
            "400.00",
            "compra de material",
        ))
        .unwrap();
    source
        .add_entry(entry(
            "2",
            date(2025, 1, 20),
            "101",
            "401",
            "1000.00",
            "venda a vista",
        ))
        .unwrap();
    source
}

fn pipeline(source: MemorySource) -> ReportPipeline<MemorySource> {
    ReportPipeline::new(
        source,
        ReportConfig::default(),
        1,
        date(2025, 1, 1),
        date(2025, 12, 31),
    )
}

#[tokio::test]
async fn trial_balance_closes_opening_plus_movement() {
    let mut pipeline = pipeline(seeded_source());
    let rows = pipeline.trial_balance().await.unwrap();

    let caixa = rows.iter().find(|r| r.code == "101").unwrap();
    assert_eq!(caixa.opening, dec("500.00"));
    assert_eq!(caixa.debits, dec("1000.00"));
    assert_eq!(caixa.credits, dec("400.00"));
    assert_eq!(caixa.closing, dec("1100.00"));

    let vendas = rows.iter().find(|r| r.code == "401").unwrap();
    assert_eq!(vendas.opening, dec("0.00"));
    assert_eq!(vendas.closing, dec("-1000.00"));

    // rows come back ordered by classification code
    let classifications: Vec<&str> = rows.iter().map(|r| r.classification.as_str()).collect();
    let mut sorted = classifications.clone();
    sorted.sort();
    assert_eq!(classifications, sorted);
}

#[tokio::test]
async fn income_statement_shows_revenue_positive_and_costs_negative() {
    let mut pipeline = pipeline(seeded_source());
    let statement = pipeline.income_statement(PeriodGrouping::None).await.unwrap();

    let value = |label: &str| {
        statement
            .rows
            .iter()
            .find(|r| r.label == label)
            .and_then(|r| r.values[0].clone())
    };
    assert_eq!(statement.columns, vec!["Valor"]);
    assert_eq!(value("TOTAL RECEITAS"), Some(dec("1000.00")));
    assert_eq!(value("  Total Custos"), Some(dec("-400.00")));
    assert_eq!(value("TOTAL DESPESAS"), Some(dec("-400.00")));
    assert_eq!(value("RESULTADO DO PERÍODO"), Some(dec("600.00")));
    assert!(pipeline.warnings().is_empty());
}

#[tokio::test]
async fn income_statement_pivots_by_quarter() {
    let source = seeded_source();
    source
        .add_entry(entry(
            "3",
            date(2025, 5, 2),
            "101",
            "401",
            "250.00",
            "venda a vista",
        ))
        .unwrap();

    let mut pipeline = pipeline(source);
    let statement = pipeline
        .income_statement(PeriodGrouping::Quarterly)
        .await
        .unwrap();
    assert_eq!(statement.columns, vec!["1T/25", "2T/25", "Total"]);

    let vendas = statement
        .rows
        .iter()
        .find(|r| r.label.contains("(401)"))
        .unwrap();
    assert_eq!(
        vendas.values,
        vec![
            Some(dec("1000.00")),
            Some(dec("250.00")),
            Some(dec("1250.00"))
        ]
    );
}

#[tokio::test]
async fn balance_sheet_balances_to_zero_at_period_end() {
    let mut pipeline = pipeline(seeded_source());
    let rows = pipeline.balance_sheet().await.unwrap();

    let amount = |label: &str| {
        rows.iter()
            .find(|r| r.label == label)
            .and_then(|r| r.amount.clone())
    };
    // cash 500 + 1000 - 400, capital -500, result accounts carry the rest
    assert_eq!(amount("TOTAL ATIVO"), Some(dec("1100.00")));
    assert_eq!(amount("TOTAL PATRIMÔNIO LÍQUIDO"), Some(dec("-500.00")));
    // income and expense balances stay off the sheet, so the grand total is
    // the open result of the period
    assert_eq!(amount("TOTAL GERAL"), Some(dec("600.00")));
}

#[tokio::test]
async fn ledger_extract_resolves_both_legs() {
    let mut pipeline = pipeline(seeded_source());
    let rows = pipeline.ledger_extract().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].debit_account, "Expenses:Custos:Materia-Prima");
    assert_eq!(rows[0].credit_account, "Assets:Ativo-Circulante:Caixa-Geral");
    assert_eq!(rows[1].credit_account, "Income:Receitas-Operacionais:Vendas");
}

#[tokio::test]
async fn text_ledger_file_round() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empresa1.beancount");

    let mut pipeline = pipeline(seeded_source());
    let written = pipeline.export_text_ledger(&path).await.unwrap();
    assert_eq!(written, path);
    assert!(pipeline.warnings().is_empty());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("option \"operating_currency\" \"BRL\""));
    assert!(text.contains("2025-01-01 open Assets:Ativo-Circulante:Caixa-Geral BRL"));
    assert!(text.contains("2025-01-01 open Equity:Abertura BRL"));
    assert!(text.contains("2025-01-01 * \"Abertura de saldos\" \"Saldo até 2024-12-31\""));
    assert!(text.contains("2025-01-10 * \"compra de material\" \"Doc 12 Lote 1 Usu 5\""));
    assert!(text.contains("-400.00 BRL"));
}

#[tokio::test]
async fn unbalanced_lot_is_excluded_and_warned() {
    let source = seeded_source();
    source
        .add_entry(entry(
            "99",
            date(2025, 3, 1),
            "101",
            "0",
            "1000.00",
            "lote quebrado",
        ))
        .unwrap();
    source
        .add_entry(entry(
            "99",
            date(2025, 3, 1),
            "0",
            "201",
            "999.00",
            "lote quebrado",
        ))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empresa1.beancount");

    let mut pipeline = pipeline(source);
    pipeline.export_text_ledger(&path).await.unwrap();

    let warnings = pipeline.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(matches!(
        &warnings[0],
        ReportWarning::UnbalancedLot { lot_id, .. } if lot_id == "99"
    ));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains("lote quebrado"));
}

#[tokio::test]
async fn unmapped_movement_reaches_pipeline_warnings() {
    let source = seeded_source();
    // sale on a code missing from the chart
    source
        .add_entry(entry(
            "50",
            date(2025, 2, 1),
            "101",
            "888",
            "10.00",
            "venda sem conta",
        ))
        .unwrap();

    let mut pipeline = pipeline(source);
    let statement = pipeline.income_statement(PeriodGrouping::None).await.unwrap();
    assert_eq!(statement.warnings.len(), 1);
    assert!(pipeline
        .warnings()
        .iter()
        .any(|w| matches!(w, ReportWarning::UnmappedAccount { code, .. } if code == "888")));
}

#[tokio::test]
async fn custom_config_changes_classification() {
    let config = ReportConfig::from_json(
        r#"{"preset": "standard", "overrides": {"11": "Assets:Disponivel"}, "currency": "USD"}"#,
    )
    .unwrap();

    let mut pipeline = ReportPipeline::new(
        seeded_source(),
        config,
        1,
        date(2025, 1, 1),
        date(2025, 12, 31),
    );
    let rows = pipeline.ledger_extract().await.unwrap();
    assert_eq!(rows[0].credit_account, "Assets:Disponivel:Caixa-Geral");
}
