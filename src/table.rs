// SPDX-License-Identifier: PMPL-1.0-or-later

//! Country code to postal code pattern table.
//!
//! The built-in data covers ISO 3166-1 alpha-2 codes, a few legacy codes
//! (`CS`, `YU`) and the `INTL` fallback for anything without a national
//! format. Patterns are reproduced verbatim from the postcode-validator
//! project, anchoring quirks included: `FR` is unanchored and `LI` only
//! anchors the outer ends of its alternation, so both match substrings.

use crate::error::{Result, ValidationError};
use std::collections::btree_map;
use std::collections::BTreeMap;

/// Key used for international / unspecified postal formats.
pub const INTERNATIONAL: &str = "INTL";

/// Built-in `(country code, pattern)` pairs.
///
/// Several entries accept the empty string (`BB`, `BH`, `EC`, `HN`, `LB`,
/// `MU`, `NG`, `NI`, `INTL`): those countries treat the code as optional.
pub const DEFAULT_PATTERNS: &[(&str, &str)] = &[
    ("GB", r"^(?i)([A-Z]){1}([0-9][0-9]|[0-9]|[A-Z][0-9][A-Z]|[A-Z][0-9][0-9]|[A-Z][0-9]|[0-9][A-Z]){1}([ ])?([0-9][A-z][A-z]){1}$"),
    ("JE", r"^JE\d[\dA-Z]?[ ]?\d[ABD-HJLN-UW-Z]{2}$"),
    ("GG", r"^GY\d[\dA-Z]?[ ]?\d[ABD-HJLN-UW-Z]{2}$"),
    ("IM", r"^IM\d[\dA-Z]?[ ]?\d[ABD-HJLN-UW-Z]{2}$$"),
    ("US", r"^([0-9]{5})(?:-([0-9]{4}))?$"),
    ("CA", r"^([ABCEGHJKLMNPRSTVXY][0-9][ABCEGHJKLMNPRSTVWXYZ])\s*([0-9][ABCEGHJKLMNPRSTVWXYZ][0-9])$"),
    ("IE", r"^([AC-FHKNPRTV-Y][0-9]{2}|D6W)[ -]?[0-9AC-FHKNPRTV-Y]{4}$"),
    ("DE", r"^\d{5}$"),
    ("JP", r"^\d{3}-\d{4}$"),
    ("FR", r"\d{2}[ ]?\d{3}"),
    ("AU", r"^\d{4}$"),
    ("IT", r"^\d{5}$"),
    ("CH", r"^\d{4}$"),
    // ^(?!0)\d{4}$ without look-ahead
    ("AT", r"^[1-9]\d{3}$"),
    ("ES", r"^(?:0[1-9]|[1-4]\d|5[0-2])\d{3}$"),
    ("NL", r"^\d{4}[ ]?[A-Z]{2}$"),
    ("BE", r"^\d{4}$"),
    ("DK", r"^\d{4}$"),
    ("SE", r"^(SE-)?\d{3}[ ]?\d{2}$"),
    ("NO", r"^\d{4}$"),
    ("BR", r"^\d{5}[\-]?\d{3}$"),
    ("PT", r"^\d{4}([\-]\d{3})?$"),
    ("FI", r"^(FI-|AX-)?\d{5}$"),
    ("AX", r"^22\d{3}$"),
    ("KR", r"^\d{5}$"),
    ("CN", r"^\d{6}$"),
    ("TW", r"^\d{3}(\d{2})?$"),
    ("SG", r"^\d{6}$"),
    ("DZ", r"^\d{5}$"),
    ("AD", r"^AD\d{3}$"),
    ("AR", r"^([A-HJ-NP-Z])?\d{4}([A-Z]{3})?$"),
    ("AM", r"^(37)?\d{4}$"),
    ("AZ", r"^\d{4}$"),
    ("BH", r"^((1[0-2]|[2-9])\d{2})?$"),
    ("BD", r"^\d{4}$"),
    ("BB", r"^(BB\d{5})?$"),
    ("BY", r"^\d{6}$"),
    ("BM", r"^[A-Z]{2}[ ]?[A-Z0-9]{2}$"),
    ("BA", r"^\d{5}$"),
    ("IO", r"^BBND 1ZZ$"),
    ("BN", r"^[A-Z]{2}[ ]?\d{4}$"),
    ("BG", r"^\d{4}$"),
    ("KH", r"^\d{5}$"),
    ("CV", r"^\d{4}$"),
    ("CL", r"^\d{7}$"),
    ("CR", r"^(\d{4,5}|\d{3}-\d{4})$"),
    ("HR", r"^(HR-)?\d{5}$"),
    ("CY", r"^\d{4}$"),
    ("CZ", r"^\d{3}[ ]?\d{2}$"),
    ("DO", r"^\d{5}$"),
    ("EC", r"^([A-Z]\d{4}[A-Z]|(?:[A-Z]{2})?\d{6})?$"),
    ("EG", r"^\d{5}$"),
    ("EE", r"^\d{5}$"),
    ("FO", r"^\d{3}$"),
    ("GE", r"^\d{4}$"),
    ("GR", r"^\d{3}[ ]?\d{2}$"),
    ("GL", r"^39\d{2}$"),
    ("GT", r"^\d{5}$"),
    ("HT", r"^\d{4}$"),
    ("HN", r"^(?:\d{5})?$"),
    ("HU", r"^\d{4}$"),
    ("IS", r"^\d{3}$"),
    ("IN", r"^\d{6}$"),
    ("ID", r"^\d{5}$"),
    ("IL", r"^\d{5,7}$"),
    ("JO", r"^\d{5}$"),
    ("KZ", r"^\d{6}$"),
    ("KE", r"^\d{5}$"),
    ("KW", r"^\d{5}$"),
    ("LA", r"^\d{5}$"),
    ("LV", r"^(LV-)?\d{4}$"),
    ("LB", r"^(\d{4}([ ]?\d{4})?)?$"),
    ("LI", r"^(948[5-9])|(949[0-7])$"),
    ("LT", r"^(LT-)?\d{5}$"),
    ("LU", r"^(L-)?\d{4}$"),
    ("MK", r"^\d{4}$"),
    ("MY", r"^\d{5}$"),
    ("MV", r"^\d{5}$"),
    ("MT", r"^[A-Z]{3}[ ]?\d{2,4}$"),
    ("MU", r"^((\d|[A-Z])\d{4})?$"),
    ("MX", r"^\d{5}$"),
    ("MD", r"^\d{4}$"),
    ("MC", r"^980\d{2}$"),
    ("MA", r"^\d{5}$"),
    ("NP", r"^\d{5}$"),
    ("NZ", r"^\d{4}$"),
    ("NI", r"^((\d{4}-)?\d{3}-\d{3}(-\d{1})?)?$"),
    ("NG", r"^(\d{6})?$"),
    ("OM", r"^(PC )?\d{3}$"),
    ("PA", r"^\d{4}$"),
    ("PK", r"^\d{5}$"),
    ("PY", r"^\d{4}$"),
    ("PH", r"^\d{4}$"),
    ("PL", r"^\d{2}-\d{3}$"),
    ("PR", r"^00[679]\d{2}([ \-]\d{4})?$"),
    ("RO", r"^\d{6}$"),
    ("RU", r"^\d{6}$"),
    ("SM", r"^4789\d$"),
    ("SA", r"^\d{5}$"),
    ("SN", r"^\d{5}$"),
    ("SK", r"^\d{3}[ ]?\d{2}$"),
    ("SI", r"^(SI-)?\d{4}$"),
    ("ZA", r"^\d{4}$"),
    ("LK", r"^\d{5}$"),
    ("TJ", r"^\d{6}$"),
    ("TH", r"^\d{5}$"),
    ("TN", r"^\d{4}$"),
    ("TR", r"^\d{5}$"),
    ("TM", r"^\d{6}$"),
    ("UA", r"^\d{5}$"),
    ("UY", r"^\d{5}$"),
    ("UZ", r"^\d{6}$"),
    ("VA", r"^00120$"),
    ("VE", r"^\d{4}$"),
    ("ZM", r"^\d{5}$"),
    ("AS", r"^96799$"),
    ("CC", r"^6799$"),
    ("CK", r"^\d{4}$"),
    ("RS", r"^\d{5,6}$"),
    ("ME", r"^8\d{4}$"),
    ("CS", r"^\d{5}$"),
    ("YU", r"^\d{5}$"),
    ("CX", r"^6798$"),
    ("ET", r"^\d{4}$"),
    ("FK", r"^FIQQ 1ZZ$"),
    ("NF", r"^2899$"),
    ("FM", r"^(9694[1-4])([ \-]\d{4})?$"),
    ("GF", r"^9[78]3\d{2}$"),
    ("GN", r"^\d{3}$"),
    ("GP", r"^9[78][01]\d{2}$"),
    ("GS", r"^SIQQ 1ZZ$"),
    ("GU", r"^969[123]\d([ \-]\d{4})?$"),
    ("GW", r"^\d{4}$"),
    ("HM", r"^\d{4}$"),
    ("IQ", r"^\d{5}$"),
    ("KG", r"^\d{6}$"),
    ("LR", r"^\d{4}$"),
    ("LS", r"^\d{3}$"),
    ("MG", r"^\d{3}$"),
    ("MH", r"^969[67]\d([ \-]\d{4})?$"),
    ("MN", r"^\d{6}$"),
    ("MP", r"^9695[012]([ \-]\d{4})?$"),
    ("MQ", r"^9[78]2\d{2}$"),
    ("NC", r"^988\d{2}$"),
    ("NE", r"^\d{4}$"),
    ("VI", r"^008(([0-4]\d)|(5[01]))([ \-]\d{4})?$"),
    ("VN", r"^\d{6}$"),
    ("PF", r"^987\d{2}$"),
    ("PG", r"^\d{3}$"),
    ("PM", r"^9[78]5\d{2}$"),
    ("PN", r"^PCRN 1ZZ$"),
    ("PW", r"^96940$"),
    ("RE", r"^9[78]4\d{2}$"),
    ("SH", r"^(ASCN|STHL) 1ZZ$"),
    ("SJ", r"^\d{4}$"),
    ("SO", r"^\d{5}$"),
    ("SZ", r"^[HLMS]\d{3}$"),
    ("TC", r"^TKCA 1ZZ$"),
    ("WF", r"^986\d{2}$"),
    ("XK", r"^\d{5}$"),
    ("YT", r"^976\d{2}$"),
    ("INTL", r"^(?:[A-Z0-9]+([- ]?[A-Z0-9]+)*)?$"),
];

/// Immutable mapping from uppercase country code to pattern text.
///
/// Built up front and handed to a [`Validator`](crate::Validator); no API
/// mutates a table after that.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternTable {
    entries: BTreeMap<String, String>,
}

impl PatternTable {
    /// Table with the built-in patterns.
    pub fn builtin() -> Self {
        let entries = DEFAULT_PATTERNS
            .iter()
            .map(|(code, pattern)| ((*code).to_string(), (*pattern).to_string()))
            .collect();
        Self { entries }
    }

    /// Table with no entries. Every lookup against it is an unknown country.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from arbitrary pairs. Keys are trimmed and uppercased;
    /// later duplicates win.
    pub fn from_entries<I, K, V>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        Self::empty().with_overrides(entries)
    }

    /// Insert or replace entries, consuming the table. Later duplicates win.
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (code, pattern) in overrides {
            let key = normalize_key(code.as_ref())?;
            self.entries.insert(key, pattern.into());
        }
        Ok(self)
    }

    /// Pattern text for a country code, case-insensitive.
    pub fn get(&self, country: &str) -> Option<&str> {
        self.entries.get(&uppercase(country)).map(String::as_str)
    }

    pub fn contains(&self, country: &str) -> bool {
        self.get(country).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All country codes, sorted.
    pub fn country_codes(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// `(code, pattern)` pairs in code order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }
}

impl<'a> IntoIterator for &'a PatternTable {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over `(code, pattern)` pairs of a [`PatternTable`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(code, pattern)| (code.as_str(), pattern.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

fn normalize_key(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidCountryCode(code.to_string()));
    }
    Ok(uppercase(trimmed))
}

/// Uppercase one character at a time. Characters whose uppercase form is
/// longer than one character (`ß`, `ﬁ`) are left as they are.
pub fn uppercase(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtin_keys_are_unique() {
        let unique: HashSet<_> = DEFAULT_PATTERNS.iter().map(|(code, _)| code).collect();
        assert_eq!(unique.len(), DEFAULT_PATTERNS.len());
        assert_eq!(PatternTable::builtin().len(), DEFAULT_PATTERNS.len());
    }

    #[test]
    fn builtin_keys_are_uppercase() {
        for (code, _) in DEFAULT_PATTERNS {
            assert!(!code.is_empty());
            assert_eq!(*code, code.to_uppercase(), "{code} should be uppercase");
        }
    }

    #[test]
    fn builtin_patterns_compile() {
        for (code, pattern) in DEFAULT_PATTERNS {
            assert!(
                regex::RegexBuilder::new(pattern)
                    .unicode(false)
                    .build()
                    .is_ok(),
                "pattern for {code} should compile: {pattern}"
            );
        }
    }

    #[test]
    fn legacy_and_fallback_codes_present() {
        let table = PatternTable::builtin();
        for code in ["CS", "YU", "XK", INTERNATIONAL] {
            assert!(table.contains(code), "{code} missing");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let table = PatternTable::builtin();
        assert_eq!(table.get("de"), Some(r"^\d{5}$"));
        assert_eq!(table.get("De"), table.get("DE"));
        assert_eq!(table.get("intl"), table.get(INTERNATIONAL));
    }

    #[test]
    fn french_pattern_is_unanchored() {
        let table = PatternTable::builtin();
        assert_eq!(table.get("FR"), Some(r"\d{2}[ ]?\d{3}"));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let table = PatternTable::builtin()
            .with_overrides([("de", r"^\d{4}$"), ("qq", r"^Q$")])
            .unwrap();
        assert_eq!(table.get("DE"), Some(r"^\d{4}$"));
        assert_eq!(table.get("QQ"), Some("^Q$"));
        assert_eq!(table.len(), DEFAULT_PATTERNS.len() + 1);
    }

    #[test]
    fn override_keys_are_trimmed_and_uppercased() {
        let table = PatternTable::from_entries([(" nz ", r"^\d{4}$")]).unwrap();
        assert_eq!(table.country_codes(), vec!["NZ"]);
    }

    #[test]
    fn blank_override_key_rejected() {
        let err = PatternTable::from_entries([("  ", "x")]).unwrap_err();
        assert_eq!(err, ValidationError::InvalidCountryCode("  ".into()));
    }

    #[test]
    fn uppercase_maps_one_to_one() {
        assert_eq!(uppercase("k1a 0b1"), "K1A 0B1");
        assert_eq!(uppercase("äöü"), "ÄÖÜ");
        assert_eq!(uppercase("ß"), "ß");
        assert_eq!(uppercase("ﬁq"), "ﬁQ");
        assert_eq!(uppercase(""), "");
    }

    #[test]
    fn lookup_does_not_expand_characters() {
        let table = PatternTable::from_entries([("SS", "^x$")]).unwrap();
        assert_eq!(table.get("ss"), Some("^x$"));
        assert_eq!(table.get("ß"), None);
    }

    #[test]
    fn country_codes_sorted() {
        let table = PatternTable::builtin();
        let codes = table.country_codes();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        assert_eq!(codes, sorted);
    }
}
