use crate::domain::DEFAULT_PAGE_SIZE;
use crate::loader::DEFAULT_DATA_PATH;
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DATA_PATH_VAR: &str = "DASHBOARD_DATA_PATH";
pub const PAGE_SIZE_VAR: &str = "DASHBOARD_PAGE_SIZE";
pub const LOG_FILE_VAR: &str = "DASHBOARD_LOG_FILE";
pub const DEBUG_VAR: &str = "DEBUG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub page_size: usize,
    pub log_file: Option<PathBuf>,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            page_size: DEFAULT_PAGE_SIZE,
            log_file: None,
            debug: false,
        }
    }
}

/// Loads `.env`, then reads the dashboard settings from the environment.
pub fn init_app_config() -> Result<AppConfig> {
    dotenv().ok();
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds the config from any key lookup, so tests need not touch the
/// process environment.
pub fn config_from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let data_path = lookup(DATA_PATH_VAR)
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_DATA_PATH), PathBuf::from);

    let page_size = match lookup(PAGE_SIZE_VAR) {
        Some(raw) => parse_page_size(&raw)?,
        None => DEFAULT_PAGE_SIZE,
    };

    let log_file = lookup(LOG_FILE_VAR)
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from);

    let debug = lookup(DEBUG_VAR).is_some_and(|value| is_truthy(&value));

    Ok(AppConfig {
        data_path,
        page_size,
        log_file,
        debug,
    })
}

fn parse_page_size(raw: &str) -> Result<usize> {
    let page_size: usize = raw
        .trim()
        .parse()
        .map_err(|e| eyre!("{PAGE_SIZE_VAR} must be a positive integer, got {raw:?}: {e}"))?;
    if page_size == 0 {
        return Err(eyre!("{PAGE_SIZE_VAR} must be greater than zero"));
    }
    Ok(page_size)
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from_lookup(lookup(&[
            (DATA_PATH_VAR, "/tmp/data.json"),
            (PAGE_SIZE_VAR, " 25 "),
            (LOG_FILE_VAR, "dashboard.log"),
            (DEBUG_VAR, "1"),
        ]))
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("/tmp/data.json"));
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_file, Some(PathBuf::from("dashboard.log")));
        assert!(config.debug);
    }

    #[test]
    fn rejects_zero_or_garbage_page_size() {
        assert!(config_from_lookup(lookup(&[(PAGE_SIZE_VAR, "0")])).is_err());
        assert!(config_from_lookup(lookup(&[(PAGE_SIZE_VAR, "lots")])).is_err());
    }

    #[test]
    fn debug_accepts_common_false_values() {
        for value in ["0", "false", "OFF", ""] {
            let config = config_from_lookup(lookup(&[(DEBUG_VAR, value)])).unwrap();
            assert!(!config.debug, "{value:?} should disable debug");
        }
    }
}
