// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{FieldKey, ValidationErrors};
use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;

const ISO_DATE: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Whether a text value is empty after trimming.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Checks an address against the simple `local@domain.tld` pattern.
///
/// The address must contain exactly one `@`, no whitespace, a non-empty
/// local part, and a domain with a `.` that has characters on both sides.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}

/// Parses an ISO `YYYY-MM-DD` date string.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), ISO_DATE).ok()
}

/// Records `message` against `key` when the value is blank.
///
/// # Returns
///
/// * `true` if the value is present
pub fn require_text(
    errors: &mut ValidationErrors,
    key: FieldKey,
    value: &str,
    message: &str,
) -> bool {
    if is_blank(value) {
        errors.insert(key, message);
        return false;
    }
    true
}

/// Requires a value and checks it against the email pattern.
pub fn require_email(errors: &mut ValidationErrors, key: FieldKey, value: &str) {
    if !require_text(errors, key, value, "Email required") {
        return;
    }
    if !is_valid_email(value.trim()) {
        errors.insert(key, "Invalid email");
    }
}

/// Requires a value that parses as an ISO date.
///
/// # Returns
///
/// * `Some(date)` if the value is present and valid
pub fn require_date(
    errors: &mut ValidationErrors,
    key: FieldKey,
    value: &str,
    message: &str,
) -> Option<Date> {
    if !require_text(errors, key, value, message) {
        return None;
    }
    let parsed: Option<Date> = parse_iso_date(value);
    if parsed.is_none() {
        errors.insert(key, "Enter a valid date (YYYY-MM-DD)");
    }
    parsed
}

/// Requires a number strictly greater than zero.
///
/// # Returns
///
/// * `true` if the value is present and positive
pub fn require_positive(
    errors: &mut ValidationErrors,
    key: FieldKey,
    value: Option<f64>,
    message: &str,
) -> bool {
    match value {
        Some(number) if number > 0.0 => true,
        _ => {
            errors.insert(key, message);
            false
        }
    }
}

/// Requires a number to be present, with any sign.
///
/// # Returns
///
/// * `Some(number)` if the value is present
pub fn require_number(
    errors: &mut ValidationErrors,
    key: FieldKey,
    value: Option<f64>,
    message: &str,
) -> Option<f64> {
    if value.is_none() {
        errors.insert(key, message);
    }
    value
}
