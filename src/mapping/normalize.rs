//! Account-name normalization into ledger-safe hierarchical segments

/// Segment used when a name normalizes to nothing.
pub const NO_NAME: &str = "Sem-Nome";

/// Strip a leading contra-entry marker of the form "( - )", tolerating inner
/// whitespace, e.g. "(-) DEPRECIAÇÃO" or "( -  ) ...".
fn strip_contra_marker(name: &str) -> &str {
    let rest = name.trim_start();
    let Some(rest) = rest.strip_prefix('(') else {
        return name;
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix('-') else {
        return name;
    };
    let rest = rest.trim_start();
    match rest.strip_prefix(')') {
        Some(rest) => rest,
        None => name,
    }
}

/// Replace accented Latin letters with their ASCII base letter.
fn transliterate(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ç' => 'c',
        'Ç' => 'C',
        'ñ' => 'n',
        'Ñ' => 'N',
        other => other,
    }
}

/// Capitalize one sub-token: first letter upper, rest lower (ASCII).
fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
        }
        None => String::new(),
    }
}

/// Normalize a free-text account name into a ledger-safe segment.
///
/// The output contains only `[A-Za-z0-9-]`, has every sub-token capitalized,
/// and never starts or ends with a hyphen or contains "--". Empty or
/// unsalvageable input yields `"Sem-Nome"`. The function is idempotent.
pub fn normalize_name(name: &str) -> String {
    let name = strip_contra_marker(name.trim());

    let chars: Vec<char> = name.chars().map(transliterate).collect();
    let mut cleaned = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '(' | ')' => cleaned.push(' '),
            '_' | '/' => cleaned.push('-'),
            '.' => cleaned.push('-'),
            d if d.is_ascii_digit() => {
                // digit '.' digit collapses to the two digits, so "10.833"
                // becomes "10833" while a lone dot still maps to '-'
                if i + 2 < chars.len() && chars[i + 1] == '.' && chars[i + 2].is_ascii_digit() {
                    cleaned.push(d);
                    cleaned.push(chars[i + 2]);
                    i += 3;
                    continue;
                }
                cleaned.push(d);
            }
            c if c.is_ascii_alphanumeric() || c == '-' || c == ' ' => cleaned.push(c),
            _ => cleaned.push(' '),
        }
        i += 1;
    }

    let tokens: Vec<String> = cleaned
        .split_whitespace()
        .flat_map(|word| word.split('-'))
        .filter(|sub| !sub.is_empty())
        .map(capitalize)
        .collect();

    if tokens.is_empty() {
        NO_NAME.to_string()
    } else {
        tokens.join("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accents_and_contra_marker() {
        assert_eq!(
            normalize_name("( - ) DEPRECIAÇÃO ACUMULADA MOVEIS E UTENS"),
            "Depreciacao-Acumulada-Moveis-E-Utens"
        );
        assert_eq!(normalize_name("(-) PROVISÕES"), "Provisoes");
    }

    #[test]
    fn test_separators_become_hyphens() {
        assert_eq!(normalize_name("caixa geral"), "Caixa-Geral");
        assert_eq!(normalize_name("ICMS_a/recolher"), "Icms-A-Recolher");
        assert_eq!(normalize_name("ADIANT. FORNECEDORES"), "Adiant-Fornecedores");
    }

    #[test]
    fn test_decimal_number_collapse() {
        assert_eq!(normalize_name("IRRF 10.833"), "Irrf-10833");
        assert_eq!(normalize_name("LEI 1.2.3"), "Lei-12-3");
        // trailing dot is a plain separator
        assert_eq!(normalize_name("CONTA 10."), "Conta-10");
    }

    #[test]
    fn test_empty_and_symbol_only_names() {
        assert_eq!(normalize_name(""), "Sem-Nome");
        assert_eq!(normalize_name("   "), "Sem-Nome");
        assert_eq!(normalize_name("@#$%"), "Sem-Nome");
    }

    #[test]
    fn test_no_hyphen_runs_or_edges() {
        for raw in [
            "--custos--",
            "  - despesas -  ",
            "a  --  b",
            "(A) (B)",
            "Caixa — Geral",
        ] {
            let out = normalize_name(raw);
            assert!(!out.contains("--"), "'{}' -> '{}'", raw, out);
            assert!(!out.starts_with('-'), "'{}' -> '{}'", raw, out);
            assert!(!out.ends_with('-'), "'{}' -> '{}'", raw, out);
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "( - ) DEPRECIAÇÃO ACUMULADA",
            "ADIANT. FORNECEDORES",
            "IRRF 10.833",
            "caixa geral",
        ] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once);
        }
    }
}
