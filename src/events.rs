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

//! UI action dispatch.
//!
//! Front ends turn button presses into [`UiAction`]s; the [`Dispatcher`] runs
//! them one at a time against the connection and records the outcome in
//! [`AppState`] as a human readable status.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::bluetooth::{ConnectError, ConnectionManager, Link, SendError};
use crate::commands::{Command, UiIntent};
use crate::state::AppState;

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Open the connection to the strip.
    Connect,
    /// Close the connection.
    Disconnect,
    /// Send the command for a control.
    Intent(UiIntent),
    /// Send a literal line.
    Raw(Command),
}

impl From<UiIntent> for UiAction {
    fn from(intent: UiIntent) -> Self {
        Self::Intent(intent)
    }
}

/// Failure of a dispatched action.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Send(#[from] SendError),
}

/// Runs UI actions against the connection.
pub struct Dispatcher<L: Link> {
    manager: ConnectionManager<L>,
    state: Arc<AppState>,
}

impl<L: Link> Dispatcher<L> {
    pub fn new(manager: ConnectionManager<L>, state: Arc<AppState>) -> Self {
        Self { manager, state }
    }

    pub fn manager(&self) -> &ConnectionManager<L> {
        &self.manager
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Run a single action.
    pub async fn dispatch(&mut self, action: UiAction) -> Result<(), DispatchError> {
        debug!("Dispatching {:?}", action);

        match action {
            UiAction::Connect => self.connect().await,
            UiAction::Disconnect => {
                self.manager.close().await;
                self.state.set_disconnected();
                Ok(())
            }
            UiAction::Intent(intent) => {
                self.send(&intent.encode()).await?;
                self.state.record(intent);
                Ok(())
            }
            UiAction::Raw(command) => self.send(&command).await,
        }
    }

    async fn connect(&mut self) -> Result<(), DispatchError> {
        self.state.set_connecting();

        match self.manager.connect().await {
            Ok(()) => {
                self.state
                    .set_connected(self.manager.device_name().to_string());
                Ok(())
            }
            Err(e) => {
                self.state.set_error(e.to_string());
                Err(e.into())
            }
        }
    }

    async fn send(&mut self, command: &Command) -> Result<(), DispatchError> {
        match self.manager.send_command(command).await {
            Ok(()) => {
                info!("Sent: {}", command);
                Ok(())
            }
            Err(e) => {
                warn!("Command {} not delivered: {}", command, e);
                self.state.set_disconnected();
                self.state.set_message(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Close the connection on exit.
    pub async fn shutdown(&mut self) {
        self.manager.close().await;
        self.state.set_disconnected();
    }
}
