use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::aggregate::DEFAULT_TOP_N;

pub const MARKET_PATH_VAR: &str = "HOUSING_MARKET_PATH";
pub const COORDS_PATH_VAR: &str = "HOUSING_COORDS_PATH";
pub const TOP_N_VAR: &str = "HOUSING_TOP_N";
pub const TITLE_VAR: &str = "HOUSING_TITLE";

const DEFAULT_MARKET_PATH: &str = "Data/sfo_neighborhoods_census_data.csv";
const DEFAULT_COORDS_PATH: &str = "Data/neighborhoods_coordinates.csv";
const DEFAULT_TITLE: &str = "San Francisco Real Estate Analysis";

/// Startup settings, read from the environment (and an optional `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub market_path: PathBuf,
    pub coords_path: PathBuf,
    pub top_n: usize,
    pub title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            market_path: PathBuf::from(DEFAULT_MARKET_PATH),
            coords_path: PathBuf::from(DEFAULT_COORDS_PATH),
            top_n: DEFAULT_TOP_N,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("reading .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(MARKET_PATH_VAR) {
            config.market_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(COORDS_PATH_VAR) {
            config.coords_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(TOP_N_VAR) {
            config.top_n = raw
                .trim()
                .parse()
                .with_context(|| format!("{TOP_N_VAR}='{raw}' is not a non-negative integer"))?;
        }
        if let Some(title) = lookup(TITLE_VAR) {
            config.title = title;
        }
        Ok(config)
    }

    /// Whether both default input files exist, so they can be loaded at startup.
    pub fn inputs_present(&self) -> bool {
        self.market_path.is_file() && self.coords_path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn overrides_from_environment() {
        let config = AppConfig::from_lookup(lookup(&[
            (MARKET_PATH_VAR, "/data/market.parquet"),
            (TOP_N_VAR, " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.market_path, PathBuf::from("/data/market.parquet"));
        assert_eq!(config.top_n, 5);
        assert_eq!(config.coords_path, PathBuf::from(DEFAULT_COORDS_PATH));
    }

    #[test]
    fn rejects_bad_top_n() {
        let err = AppConfig::from_lookup(lookup(&[(TOP_N_VAR, "ten")])).unwrap_err();
        assert!(err.to_string().contains(TOP_N_VAR));
    }
}
