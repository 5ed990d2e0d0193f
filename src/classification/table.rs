//! Prefix→category rule tables and the built-in classification presets

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::types::ReportError;

/// Built-in classification models
///
/// Each preset is a fixed prefix→category table; user overrides merge on top
/// of a preset, replacing entries with the same prefix key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationPreset {
    /// Traditional Brazilian chart-of-accounts structure
    #[default]
    Standard,
    /// Basic structure for small companies
    Simplified,
    /// IFRS-like classification
    Ifrs,
}

impl FromStr for ClassificationPreset {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ClassificationPreset::Standard),
            "simplified" => Ok(ClassificationPreset::Simplified),
            "ifrs" => Ok(ClassificationPreset::Ifrs),
            other => Err(ReportError::Config(format!(
                "unknown classification preset '{}'",
                other
            ))),
        }
    }
}

const STANDARD_RULES: &[(&str, &str)] = &[
    // 1 - assets
    ("1", "Assets:Ativo"),
    ("11", "Assets:Ativo-Circulante"),
    ("12", "Assets:Ativo-Nao-Circulante"),
    // 2 - liabilities and equity
    ("2", "Liabilities:Passivo"),
    ("21", "Liabilities:Passivo-Circulante"),
    ("22", "Liabilities:Passivo-Nao-Circulante"),
    ("23", "Equity:Patrimonio-Liquido"),
    // 3 - costs and expenses
    ("3", "Expenses:Custos-Despesas"),
    ("31", "Expenses:Custos"),
    ("32", "Expenses:Despesas-Operacionais"),
    ("33", "Expenses:Despesas-Financeiras"),
    ("34", "Expenses:Outras-Despesas"),
    // 4 - income
    ("4", "Income:Receitas"),
    ("41", "Income:Receitas-Operacionais"),
    ("42", "Income:Receitas-Financeiras"),
    ("43", "Income:Outras-Receitas"),
    // 5 - closing accounts
    ("5", "Equity:Contas-Transitorias"),
    // 9 - memorandum accounts
    ("9", "Equity:Contas-Compensacao"),
];

const SIMPLIFIED_RULES: &[(&str, &str)] = &[
    ("1", "Assets:Ativo"),
    ("11", "Assets:Ativo-Circulante"),
    ("12", "Assets:Ativo-Nao-Circulante"),
    ("2", "Liabilities"),
    ("21", "Liabilities:Passivo-Circulante"),
    ("22", "Liabilities:Passivo-Nao-Circulante"),
    ("23", "Equity:Patrimonio-Liquido"),
    ("9", "Income:Receitas"),
    ("91", "Income:Receitas-Operacionais"),
    ("92", "Income:Abatimentos-Receitas"),
    ("93", "Expenses:Custos-dos-Bens-e-Servicos-Vendidos"),
    ("94", "Expenses:Despesas-Operacionais"),
    ("95", "Expenses:Resultado-Nao-Operacional"),
    ("96", "Expenses:Provisao-Imposto-de-Renda"),
    ("97", "Expenses:Provisao-Contribuicao-Social"),
    ("98", "Expenses:Provisao-Outras"),
    ("99", "Expenses:Apuracao-Resultado"),
];

const IFRS_RULES: &[(&str, &str)] = &[
    // assets
    ("1", "Assets"),
    ("11", "Assets:Current"),
    ("111", "Assets:Current:CashAndCashEquivalents"),
    ("112", "Assets:Current:AccountsReceivable"),
    ("113", "Assets:Current:Inventories"),
    ("114", "Assets:Current:OtherCurrentAssets"),
    ("12", "Assets:Non-Current"),
    ("121", "Assets:Non-Current:PropertyPlantAndEquipment"),
    ("122", "Assets:Non-Current:IntangibleAssets"),
    ("123", "Assets:Non-Current:Investments"),
    ("124", "Assets:Non-Current:DeferredTaxAssets"),
    // liabilities
    ("2", "Liabilities"),
    ("21", "Liabilities:Current"),
    ("211", "Liabilities:Current:Suppliers"),
    ("212", "Liabilities:Current:LoansAndFinancing"),
    ("213", "Liabilities:Current:TaxesPayable"),
    ("214", "Liabilities:Current:Provisions"),
    ("22", "Liabilities:Non-Current"),
    ("221", "Liabilities:Non-Current:LoansAndFinancing"),
    ("222", "Liabilities:Non-Current:Provisions"),
    ("223", "Liabilities:Non-Current:DeferredTaxLiabilities"),
    // equity
    ("3", "Equity"),
    ("31", "Equity:CapitalStock"),
    ("32", "Equity:Reserves"),
    ("33", "Equity:RetainedEarnings"),
    // result
    ("4", "Income"),
    ("41", "Income:SalesRevenue"),
    ("42", "Income:OtherOperatingIncome"),
    ("43", "Income:FinancialIncome"),
    ("5", "Expenses"),
    ("51", "Expenses:CostOfGoodsSold"),
    ("52", "Expenses:OperatingExpenses"),
    ("53", "Expenses:AdministrativeExpenses"),
    ("54", "Expenses:FinancialExpenses"),
    ("55", "Expenses:TaxesAndContributions"),
];

fn preset_rules(preset: ClassificationPreset) -> &'static [(&'static str, &'static str)] {
    match preset {
        ClassificationPreset::Standard => STANDARD_RULES,
        ClassificationPreset::Simplified => SIMPLIFIED_RULES,
        ClassificationPreset::Ifrs => IFRS_RULES,
    }
}

/// Immutable longest-prefix lookup table over classification rules
///
/// Prefixes are checked from longest to shortest so that "31" beats "3" for
/// code "311203". Constructed once per reporting context.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTable {
    rules: HashMap<String, String>,
    /// Prefixes ordered by length (longest first), then lexicographically
    prefixes: Vec<String>,
}

impl ClassificationTable {
    /// Build a table from an arbitrary rule map, used verbatim.
    pub fn from_rules(rules: HashMap<String, String>) -> Self {
        let mut prefixes: Vec<String> = rules.keys().cloned().collect();
        prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Self { rules, prefixes }
    }

    /// Build a table with the rules of a built-in preset.
    pub fn preset(preset: ClassificationPreset) -> Self {
        let rules = preset_rules(preset)
            .iter()
            .map(|(prefix, category)| (prefix.to_string(), category.to_string()))
            .collect();
        Self::from_rules(rules)
    }

    /// Build a preset table with user overrides merged in.
    ///
    /// An override replaces the preset entry with the same prefix; preset
    /// entries not mentioned in the overrides survive unchanged.
    pub fn preset_with_overrides(
        preset: ClassificationPreset,
        overrides: &HashMap<String, String>,
    ) -> Self {
        let mut rules: HashMap<String, String> = preset_rules(preset)
            .iter()
            .map(|(prefix, category)| (prefix.to_string(), category.to_string()))
            .collect();
        for (prefix, category) in overrides {
            rules.insert(prefix.clone(), category.trim().to_string());
        }
        Self::from_rules(rules)
    }

    /// Longest-prefix lookup: the category of the longest rule prefix that is
    /// a string-prefix of `code`, or `None` when nothing matches.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| code.starts_with(prefix.as_str()))
            .and_then(|prefix| self.rules.get(prefix))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self::preset(ClassificationPreset::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_parsing() {
        assert_eq!(
            "standard".parse::<ClassificationPreset>().unwrap(),
            ClassificationPreset::Standard
        );
        assert_eq!(
            " IFRS ".parse::<ClassificationPreset>().unwrap(),
            ClassificationPreset::Ifrs
        );
        assert!("brazilian".parse::<ClassificationPreset>().is_err());
    }

    #[test]
    fn test_longest_prefix_lookup() {
        let table = ClassificationTable::preset(ClassificationPreset::Standard);
        assert_eq!(table.lookup("311203"), Some("Expenses:Custos"));
        assert_eq!(table.lookup("3"), Some("Expenses:Custos-Despesas"));
        assert_eq!(table.lookup("11210100708"), Some("Assets:Ativo-Circulante"));
        assert_eq!(table.lookup("7"), None);
    }

    #[test]
    fn test_override_replaces_preset_entry() {
        let mut overrides = HashMap::new();
        overrides.insert("11".to_string(), "Assets:Caixa-e-Bancos".to_string());
        overrides.insert("6".to_string(), "Expenses:Extra".to_string());

        let table =
            ClassificationTable::preset_with_overrides(ClassificationPreset::Standard, &overrides);
        assert_eq!(table.lookup("1101"), Some("Assets:Caixa-e-Bancos"));
        assert_eq!(table.lookup("601"), Some("Expenses:Extra"));
        // untouched preset entries survive
        assert_eq!(table.lookup("21"), Some("Liabilities:Passivo-Circulante"));
    }

    #[test]
    fn test_ifrs_preset_depth() {
        let table = ClassificationTable::preset(ClassificationPreset::Ifrs);
        assert_eq!(
            table.lookup("1110023"),
            Some("Assets:Current:CashAndCashEquivalents")
        );
        assert_eq!(table.lookup("19"), Some("Assets"));
    }
}
