//! # Config — Verification Limits from TOML
//!
//! A run's process-wide limits and the catalog location, read from a TOML
//! file:
//!
//! ```toml
//! catalog = "stripped"
//!
//! [limits.default]
//! timeout_ms = 1000
//!
//! [limits.u64]
//! max_abs_value = "18446744073709551615"
//! max_index = 10000
//! ```
//!
//! Each `[limits.<tag>]` table applies to every sequence with that element
//! type. `default` covers element types without a table of their own.
//! `max_abs_value` is a decimal string so bounds beyond 64 bits can be
//! written; a bound too large for the element type leaves it unbounded.

use anyhow::{bail, Context, Result};
use rug::Integer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::sequence::{Term, VerificationLimit};
use crate::verify::LimitRegistry;

/// Table name that applies to element types without their own table.
pub const DEFAULT_TABLE: &str = "default";

/// Element-type tags accepted as `[limits.<tag>]` tables.
pub const VALID_TAGS: [&str; 10] = [
    DEFAULT_TABLE,
    "u8",
    "u16",
    "u32",
    "u64",
    "u128",
    "i32",
    "i64",
    "i128",
    "integer",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// OEIS stripped file; the command line takes precedence.
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub limits: BTreeMap<String, LimitConfig>,
}

/// One `[limits.<tag>]` table. Missing keys mean unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitConfig {
    pub max_abs_value: Option<String>,
    pub max_index: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl LimitConfig {
    fn to_limit<T: Term>(&self) -> Result<VerificationLimit<T>> {
        let max_abs_value = match &self.max_abs_value {
            Some(text) => T::from_integer(&parse_bound(text)?),
            None => None,
        };
        Ok(VerificationLimit {
            max_abs_value,
            max_index: self.max_index,
            timeout: self.timeout_ms.map(Duration::from_millis),
        })
    }
}

fn parse_bound(text: &str) -> Result<Integer> {
    let bound: Integer = text
        .trim()
        .parse()
        .with_context(|| format!("max_abs_value '{}' is not an integer", text))?;
    if bound < 0 {
        bail!("max_abs_value must not be negative, got {}", bound);
    }
    Ok(bound)
}

impl Config {
    /// The table for element type `T`, falling back to `default`.
    pub fn table_for<T: Term>(&self) -> Option<&LimitConfig> {
        self.limits
            .get(T::TAG)
            .or_else(|| self.limits.get(DEFAULT_TABLE))
    }

    /// Build the registry a [`crate::verify::Verifier`] runs under.
    pub fn limit_registry(&self) -> Result<LimitRegistry> {
        let mut registry = LimitRegistry::new();
        register::<u8>(self, &mut registry)?;
        register::<u16>(self, &mut registry)?;
        register::<u32>(self, &mut registry)?;
        register::<u64>(self, &mut registry)?;
        register::<u128>(self, &mut registry)?;
        register::<i32>(self, &mut registry)?;
        register::<i64>(self, &mut registry)?;
        register::<i128>(self, &mut registry)?;
        register::<Integer>(self, &mut registry)?;
        Ok(registry)
    }
}

fn register<T: Term>(config: &Config, registry: &mut LimitRegistry) -> Result<()> {
    if let Some(table) = config.table_for::<T>() {
        let limit = table
            .to_limit::<T>()
            .with_context(|| format!("in [limits.{}]", T::TAG))?;
        registry.set(limit);
    }
    Ok(())
}

// ── TOML Parsing ────────────────────────────────────────────────

/// Parse a configuration from a TOML string.
pub fn parse_toml(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a configuration from a TOML file path.
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_toml(&content).with_context(|| format!("invalid config {}", path.display()))
}

fn validate_config(config: &Config) -> Result<()> {
    for (tag, table) in &config.limits {
        if !VALID_TAGS.contains(&tag.as_str()) {
            bail!(
                "Unknown element type '{}' in [limits]. Valid types: {}",
                tag,
                VALID_TAGS.join(", ")
            );
        }
        if let Some(text) = &table.max_abs_value {
            parse_bound(text).with_context(|| format!("in [limits.{}]", tag))?;
        }
    }
    Ok(())
}
