// Copyright 2026 Daniel Pelikan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration module.
//!
//! Handles loading and saving the peer and link settings. Control values
//! (color, brightness, ...) are never stored.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::bluetooth::{
    LinkOptions, MacAddress, PeerAddress, DEFAULT_DEVICE_ADDRESS, DEFAULT_DEVICE_NAME, SPP_UUID,
};

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The strip controller.
    pub device: DeviceConfig,

    /// Local Bluetooth settings.
    pub bluetooth: BluetoothConfig,

    /// Application behavior.
    pub app: AppConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name shown in status messages.
    pub name: String,

    /// Hardware address of the HC-05 module.
    pub address: MacAddress,

    /// Service to open on the module.
    pub service_uuid: Uuid,

    /// Fixed RFCOMM channel. When unset the channel is looked up from
    /// `service_uuid`.
    pub rfcomm_channel: Option<u8>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_DEVICE_NAME.to_string(),
            address: DEFAULT_DEVICE_ADDRESS,
            service_uuid: SPP_UUID,
            rfcomm_channel: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BluetoothConfig {
    /// Adapter to use, e.g. "hci0". Empty means the default adapter.
    pub adapter: Option<String>,

    /// Power the adapter on when it is off.
    pub auto_power: bool,

    /// Connection handshake timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for BluetoothConfig {
    fn default() -> Self {
        Self {
            adapter: None,
            auto_power: false,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Connect once when the tray starts.
    pub connect_on_start: bool,
}

impl Config {
    /// Default location of the config file.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ledstrip-remote")
            .join("config.toml")
    }

    /// Load configuration from the default file or create it.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from `path`, writing defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            info!("Wrote default configuration to {}", path.display());
            config
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.bluetooth.connect_timeout_secs > 0,
            "bluetooth.connect_timeout_secs must be greater than zero"
        );
        if let Some(channel) = self.device.rfcomm_channel {
            ensure!(
                (1..=30).contains(&channel),
                "device.rfcomm_channel must be between 1 and 30, got {}",
                channel
            );
        }
        Ok(())
    }

    /// The peer to connect to.
    pub fn peer(&self) -> PeerAddress {
        PeerAddress::new(self.device.address, self.device.service_uuid)
    }

    /// Options for the platform link.
    pub fn link_options(&self) -> LinkOptions {
        LinkOptions {
            adapter: self
                .bluetooth
                .adapter
                .clone()
                .filter(|name| !name.trim().is_empty()),
            auto_power: self.bluetooth.auto_power,
            channel: self.device.rfcomm_channel,
            connect_timeout: Duration::from_secs(self.bluetooth.connect_timeout_secs),
        }
    }
}
