// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for postal code validation

use thiserror::Error;

/// Result type alias for validation operations
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors returned by the validator and table builders.
///
/// Any error from a validation query implies "no match".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The (uppercased) country code has no entry in the table
    #[error("country code not found: {country}")]
    UnknownCountry { country: String },

    /// The pattern stored for a country failed to compile
    #[error("regex does not compile for {country}: {message}")]
    InvalidPattern { country: String, message: String },

    /// A table key was blank
    #[error("invalid country code: {0:?}")]
    InvalidCountryCode(String),
}

impl ValidationError {
    pub fn unknown_country(country: impl Into<String>) -> Self {
        Self::UnknownCountry {
            country: country.into(),
        }
    }

    pub fn invalid_pattern(country: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            country: country.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownCountry { .. } => "unknown_country",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::InvalidCountryCode(_) => "invalid_country_code",
        }
    }
}
