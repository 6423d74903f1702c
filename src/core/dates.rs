use crate::utils::error::{FeesError, Result};
use chrono::{Days, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%d %b %Y";
pub const CHECKOUT_DATE_FORMAT: &str = "%m/%d/%Y";

fn iso_shape() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").expect("static pattern is valid"))
}

fn checkout_shape() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").expect("static pattern is valid"))
}

/// chrono's `%Y` accepts a sign and any digit count, and skips leading spaces;
/// the shape check pins the year to four digits with nothing around it.
fn parse_with(value: &str, shape: &Regex, format: &'static str) -> Result<NaiveDate> {
    if !shape.is_match(value) {
        tracing::debug!("'{}' does not have the shape of {}", value, format);
        return Err(FeesError::DateFormatError {
            value: value.to_string(),
            expected: format,
            line: None,
        });
    }

    NaiveDate::parse_from_str(value, format).map_err(|e| {
        tracing::debug!("Failed to parse '{}' as {}: {}", value, format, e);
        FeesError::DateFormatError {
            value: value.to_string(),
            expected: format,
            line: None,
        }
    })
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate> {
    parse_with(value, iso_shape(), ISO_DATE_FORMAT)
}

/// Parses a `MM/DD/YYYY` date as found in checkout files.
pub fn parse_checkout_date(value: &str) -> Result<NaiveDate> {
    parse_with(value, checkout_shape(), CHECKOUT_DATE_FORMAT)
}

/// Rewrites `YYYY-MM-DD` dates as `DD Mon YYYY`, keeping order and length.
///
/// Fails on the first element that is not a valid ISO date.
pub fn reformat_dates<S: AsRef<str>>(dates: &[S]) -> Result<Vec<String>> {
    dates
        .iter()
        .map(|date| {
            parse_iso_date(date.as_ref()).map(|d| d.format(DISPLAY_DATE_FORMAT).to_string())
        })
        .collect()
}

/// `n` consecutive calendar days starting at `start` (`YYYY-MM-DD`).
pub fn date_range(start: &str, n: usize) -> Result<Vec<NaiveDate>> {
    let first = parse_iso_date(start)?;

    if n > 0 {
        let span = Days::new((n - 1) as u64);
        if first.checked_add_days(span).is_none() {
            return Err(FeesError::InvalidArgument {
                message: format!("{} days from {} runs past the last supported date", n, start),
            });
        }
    }

    Ok(first.iter_days().take(n).collect())
}

/// Pairs each value with a date, counting up one day at a time from `start_date`.
pub fn add_date_range<V>(values: Vec<V>, start_date: &str) -> Result<Vec<(NaiveDate, V)>> {
    let dates = date_range(start_date, values.len())?;
    Ok(dates.into_iter().zip(values).collect())
}
