// SPDX-License-Identifier: PMPL-1.0-or-later

//! postcode-check — per-country postal code format validation.
//!
//! A static table maps ISO 3166-1 alpha-2 country codes (plus `INTL`) to
//! regular expressions. [`Validator`] compiles that table once and answers
//! "does this string look like a postal code for that country?".
//!
//! ```
//! use postcode_check::Validator;
//!
//! let validator = Validator::new();
//! assert_eq!(validator.validate_postal_code("US", "90210"), Ok(true));
//! assert_eq!(validator.validate_postal_code("ca", "k1a 0b1"), Ok(true));
//! assert!(validator.validate_postal_code("ZZ", "12345").is_err());
//! ```
//!
//! Country codes and postal codes are both uppercased before use. The
//! patterns are the table's own; no normalization beyond case is applied.

pub mod error;
pub mod overrides;
pub mod table;
pub mod validator;

pub use error::{Result, ValidationError};
pub use overrides::PatternOverrides;
pub use table::{PatternTable, DEFAULT_PATTERNS, INTERNATIONAL};
pub use validator::{ValidationOutcome, Validator};

use once_cell::sync::Lazy;

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::new);

/// Shared validator over the built-in table, compiled on first use.
pub fn default_validator() -> &'static Validator {
    &DEFAULT_VALIDATOR
}

/// Validate against the built-in table.
pub fn validate_postal_code(country: &str, postal_code: &str) -> Result<bool> {
    DEFAULT_VALIDATOR.validate_postal_code(country, postal_code)
}
