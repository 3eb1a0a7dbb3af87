use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("dayboard")
}

/// User configuration, read from a JSON file in the platform config
/// directory. Missing or unparsable config falls back to defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct DayboardConfig {
    pub data_dir: PathBuf,
    /// Fixed coordinates for the weather widget when no other location
    /// source is available.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather_api_key: Option<String>,
}

impl Default for DayboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            latitude: None,
            longitude: None,
            weather_api_key: None,
        }
    }
}

impl DayboardConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("dayboard")
            .join("config.json")
    }

    /// Load the config file, falling back to defaults when it is missing or
    /// does not parse.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring unparsable config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}
