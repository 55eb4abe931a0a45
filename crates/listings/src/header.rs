//! Header normalisation

/// Normalise a raw CSV header into a snake_case column name.
///
/// Lowercases, turns spaces into `_` and drops everything that is not an
/// ASCII letter, `_` or `|`, so `"ADR (USD)"` becomes `"adr_usd"`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '|'))
        .collect()
}
