//! Best-effort salary normalization into a `SalaryRange`.
//!
//! Structured numeric fields win; free text is parsed only when it carries a
//! currency marker (a symbol such as `$` or an ISO code such as `USD`).
//! Anything unparseable yields `None`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::jobs::models::SalaryRange;

const DEFAULT_CURRENCY: &str = "USD";

static SYMBOL_AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([$€£])\s*(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)\s*(k)?").unwrap()
});

/// `GBP 45,000` or `USD 90k - 110k`: code, amount, optional second bound.
static CODE_FIRST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b({CODES})\s*{AMOUNT}(?:\s*{RANGE_SEPARATOR}\s*{AMOUNT})?"
    ))
    .unwrap()
});

/// `100000-130000 USD` or `45k USD`: amount, optional second bound, code.
static CODE_LAST_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b{AMOUNT}(?:\s*{RANGE_SEPARATOR}\s*{AMOUNT})?\s*({CODES})\b"
    ))
    .unwrap()
});

const CODES: &str = "USD|EUR|GBP|CAD|AUD|INR";
const AMOUNT: &str = r"(\d{1,3}(?:,\d{3})+|\d+(?:\.\d+)?)(?:\s*([kK])\b)?";
const RANGE_SEPARATOR: &str = r"(?:-|–|—|to)";

/// Builds a range from structured fields. A single bound is used for both ends.
pub fn from_fields(min: Option<f64>, max: Option<f64>, currency: Option<&str>) -> Option<SalaryRange> {
    let currency = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CURRENCY)
        .to_ascii_uppercase();

    match (min, max) {
        (Some(a), Some(b)) => SalaryRange::new(a, b, currency),
        (Some(v), None) | (None, Some(v)) => SalaryRange::new(v, v, currency),
        (None, None) => None,
    }
    .filter(|range| range.max > 0.0)
}

/// Parses free text such as `$80,000 - $120,000`, `$90K`, `€50k–€70k` or
/// `100000-130000 USD`.
pub fn parse_salary_text(text: &str) -> Option<SalaryRange> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let symbol_amounts: Vec<(String, f64)> = SYMBOL_AMOUNT_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let currency = symbol_currency(caps.get(1)?.as_str())?;
            let amount = parse_amount(caps.get(2)?.as_str(), caps.get(3).is_some())?;
            Some((currency.to_string(), amount))
        })
        .collect();

    let (currency, amounts) = if let Some((currency, _)) = symbol_amounts.first() {
        let currency = currency.clone();
        let amounts = symbol_amounts.into_iter().map(|(_, v)| v).collect::<Vec<_>>();
        (currency, amounts)
    } else {
        code_amounts(text)?
    };

    match amounts.as_slice() {
        [] => None,
        [single] => SalaryRange::new(*single, *single, currency),
        [first, second, ..] => SalaryRange::new(*first, *second, currency),
    }
    .filter(|range| range.max > 0.0)
}

/// Amounts written next to an ISO currency code. Numbers elsewhere in the
/// text (hours, years) are never picked up.
fn code_amounts(text: &str) -> Option<(String, Vec<f64>)> {
    if let Some(caps) = CODE_FIRST_RE.captures(text) {
        return Some((caps.get(1)?.as_str().to_string(), bounds(&caps, 2)));
    }
    let caps = CODE_LAST_RE.captures(text)?;
    Some((caps.get(5)?.as_str().to_string(), bounds(&caps, 1)))
}

/// Reads the `(amount, k)` capture pairs starting at group `first`.
fn bounds(caps: &Captures<'_>, first: usize) -> Vec<f64> {
    [first, first + 2]
        .into_iter()
        .filter_map(|i| parse_amount(caps.get(i)?.as_str(), caps.get(i + 1).is_some()))
        .collect()
}

fn symbol_currency(symbol: &str) -> Option<&'static str> {
    match symbol {
        "$" => Some("USD"),
        "€" => Some("EUR"),
        "£" => Some("GBP"),
        _ => None,
    }
}

fn parse_amount(digits: &str, thousands: bool) -> Option<f64> {
    let value: f64 = digits.replace(',', "").parse().ok()?;
    Some(if thousands { value * 1000.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(min: f64, max: f64, currency: &str) -> Option<SalaryRange> {
        SalaryRange::new(min, max, currency)
    }

    #[test]
    fn test_dollar_range() {
        assert_eq!(
            parse_salary_text("$80,000 - $120,000 a year"),
            range(80_000.0, 120_000.0, "USD")
        );
        assert_eq!(parse_salary_text("$80,000–$120,000"), range(80_000.0, 120_000.0, "USD"));
    }

    #[test]
    fn test_single_value_with_k_suffix() {
        assert_eq!(parse_salary_text("$90K"), range(90_000.0, 90_000.0, "USD"));
    }

    #[test]
    fn test_euro_range_with_k_suffix() {
        assert_eq!(parse_salary_text("€50k–€70k"), range(50_000.0, 70_000.0, "EUR"));
    }

    #[test]
    fn test_currency_code_range() {
        assert_eq!(
            parse_salary_text("100000-130000 USD"),
            range(100_000.0, 130_000.0, "USD")
        );
        assert_eq!(parse_salary_text("GBP 45,000"), range(45_000.0, 45_000.0, "GBP"));
    }

    #[test]
    fn test_currency_code_ignores_unrelated_numbers() {
        assert_eq!(
            parse_salary_text("USD 45,000 per year, 40 hours per week"),
            range(45_000.0, 45_000.0, "USD")
        );
        assert_eq!(
            parse_salary_text("Up to 3 bonuses, 90k - 110k CAD"),
            range(90_000.0, 110_000.0, "CAD")
        );
        assert_eq!(parse_salary_text("Paid in EUR, 40 hours per week"), None);
    }

    #[test]
    fn test_reversed_bounds_are_ordered() {
        assert_eq!(parse_salary_text("$120k - $80k"), range(80_000.0, 120_000.0, "USD"));
    }

    #[test]
    fn test_unparseable_text_is_none() {
        assert_eq!(parse_salary_text(""), None);
        assert_eq!(parse_salary_text("Competitive"), None);
        assert_eq!(parse_salary_text("3-5 years experience"), None);
        assert_eq!(parse_salary_text("$0"), None);
    }

    #[test]
    fn test_structured_fields() {
        assert_eq!(
            from_fields(Some(70_000.0), Some(90_000.0), Some("eur")),
            range(70_000.0, 90_000.0, "EUR")
        );
        assert_eq!(from_fields(None, Some(50.0), None), range(50.0, 50.0, "USD"));
        assert_eq!(from_fields(None, None, Some("USD")), None);
        assert_eq!(from_fields(Some(0.0), Some(0.0), None), None);
    }
}
