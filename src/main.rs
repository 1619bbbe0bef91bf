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

//! LED Strip Remote tray application.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ledstrip_remote::bluetooth::{ConnectionEvent, ConnectionManager, RfcommLink};
use ledstrip_remote::config::Config;
use ledstrip_remote::events::{Dispatcher, UiAction};
use ledstrip_remote::state::AppState;
use ledstrip_remote::ui::{self, TrayAction};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ledstrip_remote=info".parse()?),
        )
        .init();

    info!("Starting LED Strip Remote v{}...", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded, peer {} ({})",
        config.device.name,
        config.peer()
    );

    // Create application state
    let state = AppState::new();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<ConnectionEvent>();
    let link = RfcommLink::new(config.link_options());
    let manager = ConnectionManager::new(link, config.peer())
        .with_device_name(config.device.name.clone())
        .with_events(event_tx);
    let mut dispatcher = Dispatcher::new(manager, state.clone());

    // Start system tray
    let (mut action_rx, tray) = ui::run_tray(state.clone())?;

    if config.app.connect_on_start {
        if let Err(e) = dispatcher.dispatch(UiAction::Connect).await {
            warn!("Initial connection failed: {}", e);
        }
        tray.update(|_| {});
    }

    info!("Ready. System tray active.");

    // Actions run one at a time, in the order the menu produced them.
    loop {
        tokio::select! {
            Some(action) = action_rx.recv() => {
                match action {
                    TrayAction::Ui(action) => {
                        if let Err(e) = dispatcher.dispatch(action).await {
                            warn!("{}", e);
                        }
                        tray.update(|_| {});
                    }
                    TrayAction::Quit => {
                        info!("Quit requested");
                        break;
                    }
                }
            }
            Some(event) = event_rx.recv() => {
                match &event {
                    ConnectionEvent::Connected { device_name } => {
                        info!("Strip connected: {}", device_name);
                    }
                    ConnectionEvent::Disconnected => {
                        info!("Strip disconnected");
                    }
                    ConnectionEvent::Error(e) => {
                        error!("Connection error: {}", e);
                    }
                }
                tray.update(|_| {});
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    dispatcher.shutdown().await;

    info!("LED Strip Remote stopped");
    Ok(())
}
