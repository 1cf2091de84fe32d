//! Price normalization.

use std::sync::LazyLock;

use regex::Regex;

static PRICE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\$(\d+\.?(?:\d{2})?)").expect("valid regex"));

/// Collapse free-form pricing text into `"40"`, `"39.50"` or `"25-80"`.
///
/// Every `$` amount in the text is considered; only the lowest and highest
/// survive. Text without a dollar amount yields an empty string, which means
/// "unknown", not "free".
pub fn parse_price_range(text: &str) -> String {
  let mut amounts: Vec<f64> = PRICE_RE
    .captures_iter(text)
    .filter_map(|caps| caps[1].trim_end_matches('.').parse().ok())
    .collect();
  amounts.sort_by(f64::total_cmp);

  let (Some(low), Some(high)) = (amounts.first(), amounts.last()) else {
    return String::new();
  };
  let (low, high) = (render_amount(*low), render_amount(*high));
  if low == high { low } else { format!("{low}-{high}") }
}

fn render_amount(amount: f64) -> String {
  if amount.fract() == 0.0 {
    format!("{amount:.0}")
  } else {
    format!("{amount:.2}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whole_dollars_drop_cents() {
    assert_eq!(parse_price_range("$40.00"), "40");
    assert_eq!(parse_price_range("Tickets: $40"), "40");
  }

  #[test]
  fn cents_keep_two_places() {
    assert_eq!(parse_price_range("$39.50"), "39.50");
  }

  #[test]
  fn range_uses_min_and_max_only() {
    assert_eq!(parse_price_range("$40-$80"), "40-80");
    assert_eq!(parse_price_range("$80 orchestra, $25 balcony, $40 mezzanine"), "25-80");
    assert_eq!(parse_price_range("$12.50 to $15"), "12.50-15");
  }

  #[test]
  fn equal_amounts_collapse() {
    assert_eq!(parse_price_range("$20 advance / $20.00 door"), "20");
  }

  #[test]
  fn no_amounts_is_empty() {
    assert_eq!(parse_price_range("no price listed"), "");
    assert_eq!(parse_price_range("Free"), "");
    assert_eq!(parse_price_range("$"), "");
  }

  #[test]
  fn zero_is_a_price() {
    assert_eq!(parse_price_range("$0"), "0");
    assert_eq!(parse_price_range("$0-$25"), "0-25");
  }

  #[test]
  fn single_cent_digit_is_ignored() {
    // Only two-digit cents count; "$39.5" reads as $39.
    assert_eq!(parse_price_range("$39.5"), "39");
  }
}
