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

//! Single outbound connection to the strip controller.

use std::io;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::link::{AdapterState, Link};
use super::peer::{PeerAddress, DEFAULT_DEVICE_NAME};
use crate::commands::Command;

/// Events emitted on connection state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Connection established.
    Connected { device_name: String },
    /// Connection closed, either on request or after a write failure.
    Disconnected,
    /// Error occurred.
    Error(String),
}

/// State of the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Failure to establish the connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Bluetooth is not available")]
    AdapterUnavailable,
    #[error("Bluetooth is turned off")]
    AdapterDisabled,
    #[error("Bluetooth permission denied")]
    PermissionDenied,
    #[error("Connection failed: {0}")]
    Io(#[source] io::Error),
}

/// Failure to deliver bytes.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("Not connected")]
    NotConnected,
    #[error("Send failed: {0}")]
    Io(#[source] io::Error),
}

/// Owns the one stream to the peer.
pub struct ConnectionManager<L: Link> {
    link: L,
    peer: PeerAddress,
    device_name: String,
    stream: Option<L::Stream>,
    event_tx: Option<mpsc::UnboundedSender<ConnectionEvent>>,
}

impl<L: Link> ConnectionManager<L> {
    /// Create a manager for the given peer. Starts disconnected.
    pub fn new(link: L, peer: PeerAddress) -> Self {
        Self {
            link,
            peer,
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            stream: None,
            event_tx: None,
        }
    }

    /// Name used in status messages.
    pub fn with_device_name(mut self, name: impl Into<String>) -> Self {
        self.device_name = name.into();
        self
    }

    /// Report state changes on this channel.
    pub fn with_events(mut self, event_tx: mpsc::UnboundedSender<ConnectionEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn peer(&self) -> &PeerAddress {
        &self.peer
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// Emit an event.
    fn emit(&self, event: ConnectionEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Open the stream to the peer.
    ///
    /// Checks the adapter, then the permission gate, then performs the
    /// handshake. An already open stream is closed first.
    pub async fn connect(&mut self) -> Result<(), ConnectError> {
        if self.stream.is_some() {
            info!("Already connected to {}, reconnecting", self.peer.address);
            self.close().await;
        }

        match self.try_connect().await {
            Ok(stream) => {
                self.stream = Some(stream);
                info!("Connected to {} at {}", self.device_name, self.peer);
                self.emit(ConnectionEvent::Connected {
                    device_name: self.device_name.clone(),
                });
                Ok(())
            }
            Err(e) => {
                error!("Connect to {} failed: {}", self.peer.address, e);
                self.emit(ConnectionEvent::Error(e.to_string()));
                Err(e)
            }
        }
    }

    async fn try_connect(&self) -> Result<L::Stream, ConnectError> {
        match self.link.adapter_state().await {
            AdapterState::Missing => return Err(ConnectError::AdapterUnavailable),
            AdapterState::PoweredOff => return Err(ConnectError::AdapterDisabled),
            AdapterState::Denied => return Err(ConnectError::PermissionDenied),
            AdapterState::Ready => {}
        }

        if !self.link.authorize().await {
            return Err(ConnectError::PermissionDenied);
        }

        debug!("Opening channel to {}", self.peer);
        self.link.open(self.peer).await.map_err(|e| {
            if e.kind() == io::ErrorKind::PermissionDenied {
                ConnectError::PermissionDenied
            } else {
                ConnectError::Io(e)
            }
        })
    }

    /// Write raw bytes to the open stream.
    ///
    /// Any write failure drops the stream; later sends fail with
    /// [`SendError::NotConnected`] until [`connect`](Self::connect) succeeds.
    pub async fn send(&mut self, bytes: &[u8]) -> Result<(), SendError> {
        let Some(stream) = self.stream.as_mut() else {
            warn!("Send of {} bytes rejected: not connected", bytes.len());
            return Err(SendError::NotConnected);
        };

        let result = async {
            stream.write_all(bytes).await?;
            stream.flush().await
        }
        .await;

        match result {
            Ok(()) => {
                debug!("Sent {} bytes", bytes.len());
                Ok(())
            }
            Err(e) => {
                error!("Write to {} failed: {}", self.peer.address, e);
                self.stream = None;
                self.emit(ConnectionEvent::Error(format!("Send failed: {}", e)));
                self.emit(ConnectionEvent::Disconnected);
                Err(SendError::Io(e))
            }
        }
    }

    /// Encode and send one command.
    pub async fn send_command(&mut self, command: &Command) -> Result<(), SendError> {
        debug!("Sending command: {}", command);
        self.send(&command.to_bytes()).await
    }

    /// Release the stream. Safe to call when already disconnected.
    pub async fn close(&mut self) {
        let Some(mut stream) = self.stream.take() else {
            debug!("Close requested while disconnected");
            return;
        };

        if let Err(e) = stream.shutdown().await {
            debug!("Shutdown error ignored: {}", e);
        }
        drop(stream);

        info!("Disconnected from {}", self.device_name);
        self.emit(ConnectionEvent::Disconnected);
    }
}
