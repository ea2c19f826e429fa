// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pattern override files.
//!
//! An override file augments (or, with `replace_defaults`, replaces) the
//! built-in table at construction time:
//!
//! ```yaml
//! replace_defaults: false
//! patterns:
//!   GB: '^[A-Z]{1,2}\d[A-Z\d]? ?\d[A-Z]{2}$'
//!   QQ: '^\d{3}$'
//! ```

use crate::error::ValidationError;
use crate::table::{uppercase, PatternTable};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOverrides {
    /// Start from an empty table instead of the built-in one.
    #[serde(default)]
    pub replace_defaults: bool,
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
}

impl PatternOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading pattern overrides {}", path.display()))?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("parsing json pattern overrides {}", path.display())),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml pattern overrides {}", path.display())),
            _ => Err(anyhow!(
                "unsupported pattern override extension for {}",
                path.display()
            )),
        }
    }

    /// Resolve into the table a validator should own.
    ///
    /// Keys that collide once trimmed and uppercased (`gb` and `GB`) are
    /// rejected rather than silently merged.
    pub fn into_table(self) -> crate::Result<PatternTable> {
        let mut seen = HashSet::new();
        for code in self.patterns.keys() {
            if !seen.insert(uppercase(code.trim())) {
                return Err(ValidationError::InvalidCountryCode(code.clone()));
            }
        }

        let base = if self.replace_defaults {
            PatternTable::empty()
        } else {
            PatternTable::builtin()
        };
        base.with_overrides(self.patterns)
    }
}
