use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.github.com/users/{username}/events";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Url template with a `{username}` placeholder.
    pub api_url: String,
    /// Env variable the token is read from. The header is skipped when it is unset.
    pub token_var: String,
    pub response_file: String,
    pub snapshot_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_var: "GITHUB_TOKEN".to_string(),
            response_file: "api_response.json".to_string(),
            snapshot_file: "event_counts.json".to_string(),
        }
    }
}

impl Config {
    pub fn create_or_load(toml_path: PathBuf) -> Self {
        if toml_path.exists() {
            return Self::read_toml(toml_path);
        }
        let config = Self::default();
        config.write_back(&toml_path);
        config
    }

    fn read_toml(toml_path: PathBuf) -> Self {
        let content = fs::read_to_string(toml_path).expect("Unable to read toml file");
        toml::from_str(&content).expect("Invalid config file")
    }

    fn write_back(&self, toml_path: &PathBuf) {
        let toml_data = toml::to_string(self).expect("Unable to convert to TOML format");
        fs::write(toml_path, toml_data).expect("Unable to write to file");
    }

    pub fn response_path(&self) -> PathBuf {
        PathBuf::from(&self.response_file)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        PathBuf::from(&self.snapshot_file)
    }
}
