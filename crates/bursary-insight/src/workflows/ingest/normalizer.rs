/// Canonical form used to compare spreadsheet headers.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let spaced = cleaned.replace(['_', '-'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Trimmed cell text, `None` for blank cells.
pub(crate) fn clean_text(value: &str) -> Option<String> {
    let cleaned = value.replace(['\u{feff}', '\u{200b}', '\u{a0}'], " ");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Lenient numeric coercion: anything that does not parse as a finite number is missing.
pub(crate) fn coerce_number(value: &str) -> Option<f64> {
    let text = clean_text(value)?;
    text.parse::<f64>().ok().filter(|number| number.is_finite())
}
