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

//! Bluetooth RFCOMM client implementation.

use bluer::rfcomm::{Profile, Role, SocketAddr, Stream};
use bluer::{Address, Session};
use futures::future::BoxFuture;
use futures::StreamExt;
use std::io;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use super::link::{AdapterState, Link, LinkOptions};
use super::peer::PeerAddress;

/// RFCOMM link through BlueZ.
pub struct RfcommLink {
    options: LinkOptions,
    session: OnceCell<Session>,
}

impl RfcommLink {
    /// Create a link. The BlueZ session is opened lazily on first use.
    pub fn new(options: LinkOptions) -> Self {
        Self {
            options,
            session: OnceCell::new(),
        }
    }

    async fn session(&self) -> bluer::Result<&Session> {
        self.session.get_or_try_init(Session::new).await
    }

    async fn adapter(&self) -> bluer::Result<bluer::Adapter> {
        let session = self.session().await?;
        match &self.options.adapter {
            Some(name) => session.adapter(name),
            None => session.default_adapter().await,
        }
    }

    async fn probe_adapter(&self) -> AdapterState {
        let adapter = match self.adapter().await {
            Ok(adapter) => adapter,
            Err(e) if is_denied(&e) => {
                warn!("Bluetooth access denied: {}", e);
                return AdapterState::Denied;
            }
            Err(e) => {
                warn!("Bluetooth adapter unavailable: {}", e);
                return AdapterState::Missing;
            }
        };

        match adapter.is_powered().await {
            Ok(true) => return AdapterState::Ready,
            Ok(false) => {}
            Err(e) => {
                warn!("Cannot read power state of {}: {}", adapter.name(), e);
                return unusable(&e);
            }
        }

        if !self.options.auto_power {
            return AdapterState::PoweredOff;
        }

        info!("Powering on Bluetooth adapter {}...", adapter.name());
        match adapter.set_powered(true).await {
            Ok(()) => AdapterState::Ready,
            Err(e) => {
                warn!("Failed to power on {}: {}", adapter.name(), e);
                unusable(&e)
            }
        }
    }

    async fn open_stream(&self, peer: PeerAddress) -> io::Result<Stream> {
        let address = Address::new(peer.address.octets());

        if let Some(channel) = self.options.channel {
            info!("Connecting to {} on RFCOMM channel {}", address, channel);
            return Stream::connect(SocketAddr::new(address, channel)).await;
        }

        // Let BlueZ resolve the channel for the service UUID via SDP.
        let session = self.session().await.map_err(to_io)?;
        let adapter = self.adapter().await.map_err(to_io)?;
        let device = adapter.device(address).map_err(to_io)?;

        let profile = Profile {
            uuid: peer.service,
            role: Some(Role::Client),
            require_authentication: Some(false),
            require_authorization: Some(false),
            auto_connect: Some(false),
            ..Default::default()
        };
        let mut handle = session.register_profile(profile).await.map_err(to_io)?;
        info!("Connecting to {} service {}", address, peer.service);

        let connect = device.connect_profile(&peer.service);
        tokio::pin!(connect);
        let mut requested = false;

        loop {
            tokio::select! {
                result = &mut connect, if !requested => {
                    requested = true;
                    result.map_err(to_io)?;
                    debug!("Profile connect accepted by BlueZ");
                }
                request = handle.next() => {
                    let Some(request) = request else {
                        return Err(io::Error::new(
                            io::ErrorKind::ConnectionAborted,
                            "profile unregistered before connecting",
                        ));
                    };
                    if request.device() != address {
                        warn!("Ignoring connect request from {}", request.device());
                        continue;
                    }
                    return request.accept().map_err(to_io);
                }
            }
        }
    }
}

impl Link for RfcommLink {
    type Stream = Stream;

    fn adapter_state(&self) -> BoxFuture<'_, AdapterState> {
        Box::pin(self.probe_adapter())
    }

    fn authorize(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move {
            let adapter = match self.adapter().await {
                Ok(adapter) => adapter,
                Err(e) => return !is_denied(&e),
            };
            match adapter.address().await {
                Ok(address) => {
                    debug!("Using adapter {} ({})", adapter.name(), address);
                    true
                }
                Err(e) if is_denied(&e) => {
                    warn!("Bluetooth access denied: {}", e);
                    false
                }
                Err(_) => true,
            }
        })
    }

    fn open(&self, peer: PeerAddress) -> BoxFuture<'_, io::Result<Stream>> {
        Box::pin(async move {
            let timeout = self.options.connect_timeout;
            match tokio::time::timeout(timeout, self.open_stream(peer)).await {
                Ok(result) => result,
                Err(_) => Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("no answer from {} within {:?}", peer.address, timeout),
                )),
            }
        })
    }
}

fn is_denied(err: &bluer::Error) -> bool {
    matches!(
        err.kind,
        bluer::ErrorKind::NotAuthorized | bluer::ErrorKind::NotPermitted
    ) || err.message.contains("AccessDenied")
}

/// State for an adapter that exists but cannot be used.
fn unusable(err: &bluer::Error) -> AdapterState {
    if is_denied(err) {
        AdapterState::Denied
    } else {
        AdapterState::PoweredOff
    }
}

fn to_io(err: bluer::Error) -> io::Error {
    let kind = if is_denied(&err) {
        io::ErrorKind::PermissionDenied
    } else {
        io::ErrorKind::Other
    };
    io::Error::new(kind, err)
}
