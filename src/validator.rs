// SPDX-License-Identifier: PMPL-1.0-or-later

//! Postal code validation against a per-country pattern table.
//!
//! Every pattern is compiled once when the [`Validator`] is built. A
//! pattern that fails to compile does not fail construction; queries for
//! that country return [`ValidationError::InvalidPattern`] instead.
//!
//! Patterns are compiled with Unicode classes off, so `\d` is `[0-9]` and
//! `\s` is ASCII whitespace. A pattern that only compiles with Unicode
//! enabled (`.`, negated classes) is compiled in Unicode mode instead.

use crate::error::{Result, ValidationError};
use crate::overrides::PatternOverrides;
use crate::table::{uppercase, PatternTable};
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Matcher {
    Compiled(Regex),
    Broken(String),
}

/// Validates postal codes for the countries in its table.
#[derive(Debug, Clone)]
pub struct Validator {
    table: PatternTable,
    matchers: BTreeMap<String, Matcher>,
}

/// Result of a single check, shaped for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub country: String,
    pub postal_code: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<&'static str>,
}

impl Validator {
    /// Validator over the built-in table.
    pub fn new() -> Self {
        Self::with_table(PatternTable::builtin())
    }

    pub fn with_table(table: PatternTable) -> Self {
        let matchers: BTreeMap<String, Matcher> = table
            .iter()
            .map(|(code, pattern)| {
                let matcher = match compile(pattern) {
                    Ok(regex) => Matcher::Compiled(regex),
                    Err(e) => {
                        tracing::warn!(country = code, pattern, "pattern does not compile: {e}");
                        Matcher::Broken(e.to_string())
                    }
                };
                (code.to_string(), matcher)
            })
            .collect();
        tracing::debug!(countries = matchers.len(), "compiled postal code patterns");
        Self { table, matchers }
    }

    pub fn from_overrides(overrides: PatternOverrides) -> Result<Self> {
        Ok(Self::with_table(overrides.into_table()?))
    }

    /// Check `postal_code` against the pattern for `country`.
    ///
    /// Both inputs are uppercased first. Matching follows the pattern's own
    /// anchors, so unanchored patterns accept any input containing a match.
    pub fn validate_postal_code(&self, country: &str, postal_code: &str) -> Result<bool> {
        let key = uppercase(country);
        match self.matchers.get(&key) {
            Some(Matcher::Compiled(regex)) => Ok(regex.is_match(&uppercase(postal_code))),
            Some(Matcher::Broken(message)) => {
                Err(ValidationError::invalid_pattern(key, message.clone()))
            }
            None => {
                tracing::debug!(country = %key, "no postal code pattern for country");
                Err(ValidationError::unknown_country(key))
            }
        }
    }

    /// Like [`validate_postal_code`](Self::validate_postal_code), with any
    /// error treated as "no match".
    pub fn is_valid(&self, country: &str, postal_code: &str) -> bool {
        self.validate_postal_code(country, postal_code).unwrap_or(false)
    }

    pub fn check(&self, country: &str, postal_code: &str) -> ValidationOutcome {
        let result = self.validate_postal_code(country, postal_code);
        ValidationOutcome {
            country: uppercase(country),
            postal_code: postal_code.to_string(),
            valid: matches!(result, Ok(true)),
            error: result.as_ref().err().map(ToString::to_string),
            error_kind: result.as_ref().err().map(ValidationError::kind),
        }
    }

    pub fn supports(&self, country: &str) -> bool {
        self.table.contains(country)
    }

    pub fn pattern_for(&self, country: &str) -> Option<&str> {
        self.table.get(country)
    }

    pub fn country_codes(&self) -> Vec<&str> {
        self.table.country_codes()
    }

    pub fn table(&self) -> &PatternTable {
        &self.table
    }

    /// Countries whose pattern failed to compile, with the compiler message.
    pub fn broken_patterns(&self) -> Vec<(&str, &str)> {
        self.matchers
            .iter()
            .filter_map(|(code, matcher)| match matcher {
                Matcher::Broken(message) => Some((code.as_str(), message.as_str())),
                Matcher::Compiled(_) => None,
            })
            .collect()
    }
}

fn compile(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern)
        .unicode(false)
        .build()
        .or_else(|_| Regex::new(pattern))
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_no_broken_patterns() {
        assert!(Validator::new().broken_patterns().is_empty());
    }

    #[test]
    fn us_zip_and_zip_plus_four() {
        let v = Validator::new();
        assert_eq!(v.validate_postal_code("US", "90210"), Ok(true));
        assert_eq!(v.validate_postal_code("US", "90210-1234"), Ok(true));
        assert_eq!(v.validate_postal_code("US", "ABCDE"), Ok(false));
        assert_eq!(v.validate_postal_code("US", ""), Ok(false));
    }

    #[test]
    fn unknown_country() {
        let v = Validator::new();
        assert_eq!(
            v.validate_postal_code("ZZ", "12345"),
            Err(ValidationError::unknown_country("ZZ"))
        );
        assert_eq!(
            v.validate_postal_code("", "12345"),
            Err(ValidationError::unknown_country(""))
        );
    }

    #[test]
    fn unknown_country_reports_uppercased_code() {
        let err = Validator::new().validate_postal_code("zz", "1").unwrap_err();
        assert_eq!(err, ValidationError::unknown_country("ZZ"));
    }

    #[test]
    fn austria_rejects_leading_zero() {
        let v = Validator::new();
        assert_eq!(v.validate_postal_code("AT", "1010"), Ok(true));
        assert_eq!(v.validate_postal_code("AT", "0101"), Ok(false));
    }

    #[test]
    fn broken_pattern_reported_per_query() {
        let table = PatternTable::from_entries([("XX", "([0-9]"), ("YY", r"^\d$")]).unwrap();
        let v = Validator::with_table(table);

        assert!(matches!(
            v.validate_postal_code("xx", "1"),
            Err(ValidationError::InvalidPattern { ref country, .. }) if country == "XX"
        ));
        assert_eq!(v.validate_postal_code("YY", "1"), Ok(true));
        assert!(!v.is_valid("XX", "1"));

        let broken = v.broken_patterns();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].0, "XX");
    }

    #[test]
    fn digit_and_space_classes_are_ascii() {
        let v = Validator::new();
        assert_eq!(v.validate_postal_code("DE", "١٠١١٥"), Ok(false));
        assert_eq!(v.validate_postal_code("CA", "K1A\u{3000}0B1"), Ok(false));
        assert_eq!(v.validate_postal_code("CA", "K1A\t0B1"), Ok(true));
    }

    #[test]
    fn unicode_only_override_still_compiles() {
        let table = PatternTable::from_entries([("XX", r"^[^-]+$"), ("YY", r"^\d$")]).unwrap();
        let v = Validator::with_table(table);
        assert!(v.broken_patterns().is_empty());
        assert_eq!(v.validate_postal_code("XX", "ÄB"), Ok(true));
        assert_eq!(v.validate_postal_code("YY", "٣"), Ok(false));
    }

    #[test]
    fn sharp_s_is_not_expanded() {
        let v = Validator::new();
        assert_eq!(v.validate_postal_code("INTL", "ß"), Ok(false));
        assert_eq!(v.check("intl", "ß").country, "INTL");
    }

    #[test]
    fn check_outcome_fields() {
        let v = Validator::new();
        let ok = v.check("ca", "k1a0b1");
        assert!(ok.valid);
        assert_eq!(ok.country, "CA");
        assert_eq!(ok.postal_code, "k1a0b1");
        assert_eq!(ok.error, None);

        let bad = v.check("ZZ", "1");
        assert!(!bad.valid);
        assert_eq!(bad.error_kind, Some("unknown_country"));
        assert_eq!(bad.error.as_deref(), Some("country code not found: ZZ"));
    }

    #[test]
    fn outcome_serializes_without_empty_error() {
        let json = serde_json::to_value(Validator::new().check("DE", "10115")).unwrap();
        assert_eq!(json["valid"], true);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn introspection() {
        let v = Validator::new();
        assert!(v.supports("gb"));
        assert!(!v.supports("ZZ"));
        assert_eq!(v.pattern_for("jp"), Some(r"^\d{3}-\d{4}$"));
        assert_eq!(v.country_codes().len(), v.table().len());
    }
}
