use config::{Config, Environment, File};
use serde::Deserialize;

use crate::CLIENT_NAME;

const CONFIG_NAME: &str = "config.toml";
const DEFAULT_LISTEN: &str = "127.0.0.1:4545";
const DEFAULT_API_TIMEOUT_SECS: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Backend base url. Without one the app runs against an in-memory store.
    pub api_url: Option<String>,
    /// Seconds a backend request may take before it is abandoned.
    pub api_timeout_secs: u64,
    /// Local storage file holding the session user.
    pub data_file: String,
    pub listen: String,
}

impl Settings {
    pub fn new(config_path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut s = Config::builder()
            .set_default("data_file", default_data_path())?
            .set_default("listen", DEFAULT_LISTEN)?
            .set_default("api_timeout_secs", DEFAULT_API_TIMEOUT_SECS)?;

        s = match config_path {
            Some(path) => s.add_source(File::with_name(path)),
            None => s.add_source(File::with_name(&default_config_path()).required(false)),
        };

        s.add_source(Environment::with_prefix("BILLED"))
            .build()?
            .try_deserialize()
    }
}

fn default_data_path() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir()))
        .join(CLIENT_NAME)
        .join("storage.json")
        .display()
        .to_string()
}

pub(crate) fn default_config_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir()))
        .join(CLIENT_NAME)
        .join(CONFIG_NAME)
        .display()
        .to_string()
}
