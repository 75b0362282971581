use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Process-wide configuration, loaded once at startup from a YAML file and
/// passed by reference from then on.
///
/// Only the credential and the SSH key name are required; the creation
/// payload fields fall back to the standard node shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub ssh_key_name: String,

    #[serde(default = "default_basic_configuration")]
    pub basic_configuration: String,
    #[serde(default = "default_datacenter_countries")]
    pub datacenter_countries: Vec<String>,
    #[serde(default = "default_storage_gib")]
    pub storage_gib: u32,
    #[serde(default = "default_os_image")]
    pub os_image: String,
    #[serde(default = "default_open_ports")]
    pub open_ports: Vec<u16>,
}

fn default_basic_configuration() -> String {
    "cpu-16-ram-32gb-storage-25gb".to_string()
}

fn default_datacenter_countries() -> Vec<String> {
    vec!["BE".to_string()]
}

fn default_storage_gib() -> u32 {
    1975
}

fn default_os_image() -> String {
    "https://cloud-images.ubuntu.com/releases/24.04/release/ubuntu-24.04-server-cloudimg-amd64.img"
        .to_string()
}

fn default_open_ports() -> Vec<u16> {
    vec![80, 443, 3000]
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path} not found")]
    Missing { path: String },

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("error parsing config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| {
            let path = path.display().to_string();
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::Missing { path }
            } else {
                ConfigError::Io { path, source }
            }
        })?;

        Ok(serde_yaml::from_str(&text)?)
    }
}
