use anyhow::{bail, Context, Result};
use bell_curve::DistributionOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    // Storage
    pub database_url: String,   // sqlite:funds.db
    pub backup_dir: PathBuf,    // backups
    pub output_dir: PathBuf,    // .

    // Bell curve
    pub jitter_fraction: f64,     // 0.25 sigma, standardized
    pub jitter_max_attempts: u32, // 64
    pub jitter_seed: Option<u64>, // entropy when unset
    pub highlight_top_n: usize,   // 3
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:funds.db".to_string(),
            backup_dir: PathBuf::from("backups"),
            output_dir: PathBuf::from("."),
            jitter_fraction: bell_curve::model::DEFAULT_JITTER_FRACTION,
            jitter_max_attempts: bell_curve::model::DEFAULT_MAX_ATTEMPTS,
            jitter_seed: None,
            highlight_top_n: bell_curve::model::DEFAULT_TOP_N,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            backup_dir: lookup("BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.backup_dir),
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),

            jitter_fraction: match lookup("JITTER_FRACTION") {
                Some(v) => v.trim().parse().context("JITTER_FRACTION must be a number")?,
                None => defaults.jitter_fraction,
            },
            jitter_max_attempts: match lookup("JITTER_MAX_ATTEMPTS") {
                Some(v) => v
                    .trim()
                    .parse()
                    .context("JITTER_MAX_ATTEMPTS must be a non-negative integer")?,
                None => defaults.jitter_max_attempts,
            },
            jitter_seed: lookup("JITTER_SEED")
                .map(|v| v.trim().parse())
                .transpose()
                .context("JITTER_SEED must be an unsigned integer")?,
            highlight_top_n: match lookup("HIGHLIGHT_TOP_N") {
                Some(v) => v
                    .trim()
                    .parse()
                    .context("HIGHLIGHT_TOP_N must be a non-negative integer")?,
                None => defaults.highlight_top_n,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            bail!("DATABASE_URL must not be empty");
        }
        if !(self.jitter_fraction > 0.0 && self.jitter_fraction <= bell_curve::model::MAX_JITTER_FRACTION)
        {
            bail!(
                "JITTER_FRACTION must be in (0, {}], got {}",
                bell_curve::model::MAX_JITTER_FRACTION,
                self.jitter_fraction
            );
        }
        Ok(())
    }

    pub fn distribution_options(&self) -> DistributionOptions {
        DistributionOptions {
            jitter_fraction: self.jitter_fraction,
            max_attempts: self.jitter_max_attempts,
            top_n: self.highlight_top_n,
            seed: self.jitter_seed,
            ..DistributionOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.database_url, "sqlite:funds.db");
        assert_eq!(config.highlight_top_n, 3);
        assert!(config.jitter_seed.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BACKUP_DIR", "/tmp/fund-backups"),
            ("JITTER_FRACTION", "0.1"),
            ("JITTER_SEED", "42"),
            ("HIGHLIGHT_TOP_N", "5"),
        ]))
        .unwrap();
        assert_eq!(config.backup_dir, PathBuf::from("/tmp/fund-backups"));
        assert_eq!(config.jitter_seed, Some(42));

        let options = config.distribution_options();
        assert!((options.jitter_fraction - 0.1).abs() < 1e-10);
        assert_eq!(options.top_n, 5);
        assert_eq!(options.seed, Some(42));
        assert_eq!(options.curve_points, 100);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("JITTER_FRACTION", "abc")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("JITTER_FRACTION", "0.9")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("JITTER_SEED", "-1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("DATABASE_URL", " ")])).is_err());
    }
}
