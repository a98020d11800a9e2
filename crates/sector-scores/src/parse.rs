//! Cleaning of scraped performance strings.

/// Parse a scraped figure such as `"+1,234.5 B INR"`, `"−3.2%"` or `"12"`.
///
/// Unicode minus signs (and their mis-decoded UTF-8 form) become `-`;
/// percent signs, thousands separators, plus signs and the `T INR` / `B INR`
/// unit suffixes are dropped. Anything still unparsable is `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned = raw
        .replace("\u{2212}", "-")
        .replace("âˆ’", "-")
        .replace('%', "")
        .replace(',', "")
        .replace("T INR", "")
        .replace("B INR", "")
        .replace('+', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
