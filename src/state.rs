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

//! Application state management.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::commands::{Brightness, Color, Press, UiIntent, Zone};

/// Connection status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "Disconnected",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Error => "Error",
        }
    }

    pub fn icon_name(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "network-offline",
            ConnectionStatus::Connecting => "network-idle",
            ConnectionStatus::Connected => "network-transmit-receive",
            ConnectionStatus::Error => "network-error",
        }
    }
}

/// Last value sent for each control, for rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub sound: bool,
    pub brightness: Option<Brightness>,
    pub zone: Option<Zone>,
    pub color: Option<Color>,
    pub rainbow: Option<Press>,
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Current connection status.
    pub connection_status: RwLock<ConnectionStatus>,

    /// Connected device name.
    pub connected_device: RwLock<Option<String>>,

    /// Human readable outcome of the last action.
    pub status_message: RwLock<String>,

    /// Control values.
    pub controls: RwLock<Controls>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            connection_status: RwLock::new(ConnectionStatus::Disconnected),
            connected_device: RwLock::new(None),
            status_message: RwLock::new(ConnectionStatus::Disconnected.as_str().to_string()),
            controls: RwLock::new(Controls::default()),
        }
    }
}

impl AppState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_connecting(&self) {
        *self.connection_status.write() = ConnectionStatus::Connecting;
        self.set_message(ConnectionStatus::Connecting.as_str());
    }

    pub fn set_connected(&self, device_name: String) {
        *self.connection_status.write() = ConnectionStatus::Connected;
        self.set_message(format!("Connected to {}", device_name));
        *self.connected_device.write() = Some(device_name);
    }

    pub fn set_disconnected(&self) {
        *self.connection_status.write() = ConnectionStatus::Disconnected;
        *self.connected_device.write() = None;
        self.set_message(ConnectionStatus::Disconnected.as_str());
    }

    /// Record a failure. A connected link stays connected.
    pub fn set_error(&self, message: impl Into<String>) {
        {
            let mut status = self.connection_status.write();
            if *status != ConnectionStatus::Connected {
                *status = ConnectionStatus::Error;
            }
        }
        self.set_message(message);
    }

    pub fn set_message(&self, message: impl Into<String>) {
        *self.status_message.write() = message.into();
    }

    pub fn get_status(&self) -> ConnectionStatus {
        *self.connection_status.read()
    }

    pub fn get_device_name(&self) -> Option<String> {
        self.connected_device.read().clone()
    }

    pub fn get_message(&self) -> String {
        self.status_message.read().clone()
    }

    /// Remember a control value after it was sent.
    pub fn record(&self, intent: UiIntent) {
        let mut controls = self.controls.write();
        match intent {
            UiIntent::Sound(on) => controls.sound = on,
            UiIntent::Brightness(level) => controls.brightness = Some(level),
            UiIntent::Zone(zone) => controls.zone = Some(zone),
            UiIntent::Color(color) => {
                controls.color = Some(color);
                controls.rainbow = None;
            }
            UiIntent::Rainbow(press) => {
                controls.rainbow = Some(press);
                controls.color = None;
            }
        }
    }

    pub fn get_controls(&self) -> Controls {
        *self.controls.read()
    }
}
