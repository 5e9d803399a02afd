use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::protocol::DeviceId;

pub static CONFIG: Lazy<LinkConfig> =
    Lazy::new(|| LinkConfig::load_config("link").expect("Failed to load configuration"));

#[derive(Debug, Deserialize)]
pub struct LinkConfig {
    pub log_level: String,
    pub link: LinkSettings,
    pub mavlink: MavlinkConfig,
    pub web: WebConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LinkSettings {
    /// Identity this process uses as frame source
    pub device: DeviceId,
    pub bind: SocketAddr,
    pub peer: SocketAddr,
    pub peer_device: DeviceId,
    pub heartbeat_interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MavlinkConfig {
    pub enabled: bool,
    pub connection_string: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

pub trait LoadConfig {
    fn load_config(service_name: &str) -> Result<Self, ConfigError>
    where
        Self: Sized + serde::de::DeserializeOwned,
    {
        // Try development path first
        let dev_path = PathBuf::from("config");
        let prod_path = PathBuf::from("/etc/luffy");

        let config_dir = if dev_path.join(format!("{}.toml", service_name)).exists() {
            dev_path
        } else if prod_path.join(format!("{}.toml", service_name)).exists() {
            prod_path
        } else {
            return Err(ConfigError::NotFound(format!(
                "Config file not found in {:?}",
                prod_path.join(format!("{}.toml", service_name))
            )));
        };

        Self::load_from_dir(&config_dir, service_name)
    }

    fn load_from_dir(config_dir: &Path, service_name: &str) -> Result<Self, ConfigError>
    where
        Self: Sized + serde::de::DeserializeOwned,
    {
        let config = Config::builder()
            // Base config first (if it exists)
            .add_source(File::from(config_dir.join("base.toml")).required(false))
            // Service-specific config (required)
            .add_source(File::from(
                config_dir.join(format!("{}.toml", service_name)),
            ))
            // Environment variables override, e.g. LUFFY__LINK__PEER
            .add_source(Environment::with_prefix("LUFFY").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

impl LoadConfig for LinkConfig {}
