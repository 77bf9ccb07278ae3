//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use chrono::{DateTime, Utc};

/// Formats an amount in rupees with thousands separators.
///
/// Usage in templates: `{{ product.price|money }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn money(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&value.to_string()))
}

/// Shortens an id to its last six characters for display.
///
/// Usage in templates: `#{{ order.id|short_id }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn short_id(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let id = value.to_string();
    let tail = id.len().saturating_sub(6);
    Ok(id.get(tail..).unwrap_or(id.as_str()).to_string())
}

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a timestamp as a short date, e.g. `Aug 5, 2026`.
///
/// Plain helper for view builders; timestamps are optional on most records
/// so the option handling happens where the view is assembled.
#[must_use]
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}

fn format_money(raw: &str) -> String {
    let (sign, unsigned) = raw
        .strip_prefix('-')
        .map_or(("", raw), |rest| ("-", rest));

    let (int_part, frac_part) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));

    let frac = frac_part
        .map(|f| f.trim_end_matches('0'))
        .filter(|f| !f.is_empty());

    let mut out = format!("{sign}₹{}", group_thousands(int_part));
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
