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

//! Platform link abstraction.
//!
//! The connection manager only needs three things from the radio: whether an
//! adapter is usable, whether we are allowed to use it, and a way to open a
//! byte stream to the peer. Everything platform specific lives behind [`Link`].

use futures::future::BoxFuture;
use std::io;
use std::time::Duration;
use tokio::io::AsyncWrite;

use super::peer::PeerAddress;

/// State of the local Bluetooth adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// No adapter present (or the Bluetooth daemon is unreachable).
    Missing,
    /// Adapter present but powered off, or it could not be powered on.
    PoweredOff,
    /// The Bluetooth daemon refused access to the adapter.
    Denied,
    /// Adapter present and powered.
    Ready,
}

/// Options for opening a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOptions {
    /// Adapter name (e.g. "hci0"); the default adapter when unset.
    pub adapter: Option<String>,
    /// Power the adapter on instead of reporting it as off.
    pub auto_power: bool,
    /// Fixed RFCOMM channel; resolved from the service UUID when unset.
    pub channel: Option<u8>,
    /// Upper bound on the connection handshake.
    pub connect_timeout: Duration,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            adapter: None,
            auto_power: false,
            channel: None,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Source of outbound streams to a peer.
pub trait Link: Send + Sync {
    /// Write half of an open channel.
    type Stream: AsyncWrite + Send + Unpin + 'static;

    /// Query the local adapter.
    fn adapter_state(&self) -> BoxFuture<'_, AdapterState>;

    /// Permission gate for link-layer access.
    fn authorize(&self) -> BoxFuture<'_, bool>;

    /// Open a stream to the given peer. Blocks until the handshake completes
    /// or fails.
    fn open(&self, peer: PeerAddress) -> BoxFuture<'_, io::Result<Self::Stream>>;
}
