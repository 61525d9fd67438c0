//! Default locations for configuration and data

use std::path::{Path, PathBuf};

use host_services::constants::defaults;

const APP_DIR: &str = "miniboard";

/// `<config dir>/miniboard/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// `<data dir>/miniboard`, or `.miniboard` when the platform has none
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".miniboard"))
}

pub fn apps_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("apps")
}

pub fn store_file(data_dir: &Path) -> PathBuf {
    data_dir.join(defaults::STORE_FILE)
}
