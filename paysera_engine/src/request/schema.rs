use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{PayseraError, ValidationFailure};

/// Constraints the provider places on one request field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    /// Maximum length in characters
    pub max_len: usize,
    /// Required fields must be present and non-blank.
    pub required: bool,
    /// Only checked for non-blank values.
    pub pattern: Option<&'static str>,
}

const fn rule(name: &'static str, max_len: usize, required: bool, pattern: Option<&'static str>) -> FieldRule {
    FieldRule { name, max_len, required, pattern }
}

// ASCII only. `\d` and `(?i)` classes also match Unicode digits and letters such as the Kelvin sign.
const DIGITS: Option<&str> = Some(r"^[0-9]+$");
const THREE_LETTERS: Option<&str> = Some(r"^[A-Za-z]{3}$");
const TWO_LETTERS: Option<&str> = Some(r"^[A-Za-z]{2}$");

/// Every field the gateway may send. Rules are checked in this order.
pub const FIELD_SCHEMA: &[FieldRule] = &[
    rule("projectid", 11, true, DIGITS),
    rule("orderid", 40, true, None),
    rule("accepturl", 255, true, None),
    rule("cancelurl", 255, true, None),
    rule("callbackurl", 255, true, None),
    rule("version", 9, true, Some(r"^[0-9]+\.[0-9]+$")),
    rule("lang", 3, false, THREE_LETTERS),
    rule("amount", 11, false, DIGITS),
    rule("currency", 3, false, THREE_LETTERS),
    rule("country", 2, false, TWO_LETTERS),
    rule("p_countrycode", 2, false, TWO_LETTERS),
    rule("test", 1, false, Some(r"^[01]$")),
    rule("developerid", 11, false, DIGITS),
    rule("paytext", 255, false, None),
    rule("p_firstname", 255, false, None),
    rule("p_lastname", 255, false, None),
    rule("p_email", 255, false, None),
    rule("p_street", 255, false, None),
    rule("p_city", 255, false, None),
    rule("personcode", 255, false, None),
    rule("p_state", 20, false, None),
    rule("p_zip", 20, false, None),
    rule("payment", 20, false, None),
    // Comma separated payment method codes
    rule("only_payments", 255, false, None),
    rule("disalow_payments", 255, false, None),
    rule("time_limit", 19, false, None),
];

static PATTERNS: Lazy<HashMap<&'static str, Regex>> = Lazy::new(|| {
    FIELD_SCHEMA
        .iter()
        .filter_map(|rule| rule.pattern.and_then(|p| Regex::new(p).ok()).map(|re| (rule.name, re)))
        .collect()
});

/// Checks every field against [`FIELD_SCHEMA`] and reports the first violation.
///
/// Fields that the schema does not know about are rejected, since the provider would refuse to sign them.
pub fn validate_fields(fields: &BTreeMap<String, String>) -> Result<(), PayseraError> {
    for rule in FIELD_SCHEMA {
        let value = fields.get(rule.name).map(String::as_str).unwrap_or_default();
        if value.trim().is_empty() {
            if rule.required {
                return Err(PayseraError::validation(rule.name, ValidationFailure::Missing));
            }
            continue;
        }
        if value.chars().count() > rule.max_len {
            return Err(PayseraError::validation(rule.name, ValidationFailure::TooLong { max: rule.max_len }));
        }
        if let Some(re) = PATTERNS.get(rule.name) {
            if !re.is_match(value) {
                return Err(PayseraError::validation(rule.name, ValidationFailure::PatternMismatch));
            }
        }
    }
    match fields.keys().find(|k| !FIELD_SCHEMA.iter().any(|rule| rule.name == k.as_str())) {
        Some(unknown) => Err(PayseraError::validation(unknown, ValidationFailure::Unknown)),
        None => Ok(()),
    }
}
