//! Shared value formatting for report and CLI output.

/// "$1,234,567.89", negative sign before the dollar sign.
pub fn fmt_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}${}.{frac_part}", group_thousands(int_part))
}

/// Fraction as a percentage: 0.1234 -> "12.34%".
pub fn fmt_pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn fmt_ratio(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn fmt_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
