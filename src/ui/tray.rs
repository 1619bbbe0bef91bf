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

//! System tray implementation using ksni.

use anyhow::Result;
use ksni::{
    self,
    menu::{CheckmarkItem, RadioGroup, RadioItem, StandardItem, SubMenu},
    Handle, MenuItem, Tray, TrayService,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::commands::{Brightness, Color, Press, UiIntent, Zone};
use crate::events::UiAction;
use crate::state::{AppState, ConnectionStatus};

/// Brightness presets offered in the menu, in percent.
const BRIGHTNESS_PRESETS: [u8; 5] = [0, 25, 50, 75, 100];

/// Actions that can be triggered from the tray menu.
#[derive(Debug, Clone)]
pub enum TrayAction {
    /// Forward to the dispatcher.
    Ui(UiAction),
    Quit,
}

/// System tray icon and menu.
pub struct LedStripTray {
    state: Arc<AppState>,
    action_tx: mpsc::UnboundedSender<TrayAction>,
}

impl LedStripTray {
    pub fn new(state: Arc<AppState>, action_tx: mpsc::UnboundedSender<TrayAction>) -> Self {
        Self { state, action_tx }
    }

    fn emit(&self, action: TrayAction) {
        if let Err(e) = self.action_tx.send(action) {
            debug!("Dropped tray action {:?}: main loop has exited", e.0);
        }
    }

    fn send(&self, intent: UiIntent) {
        self.emit(TrayAction::Ui(UiAction::Intent(intent)));
    }

    fn status_line(&self) -> String {
        match self.state.get_status() {
            ConnectionStatus::Connected => {
                let device = self
                    .state
                    .get_device_name()
                    .unwrap_or_else(|| "Unknown".to_string());
                format!("● Connected: {}", device)
            }
            ConnectionStatus::Disconnected => "○ Disconnected".to_string(),
            ConnectionStatus::Connecting => "◐ Connecting...".to_string(),
            ConnectionStatus::Error => "✕ Error".to_string(),
        }
    }

    fn brightness_menu(&self, current: Option<Brightness>) -> MenuItem<Self> {
        let submenu: Vec<MenuItem<Self>> = BRIGHTNESS_PRESETS
            .iter()
            .map(|&percent| {
                let level = Brightness::from_percent(percent);
                MenuItem::Checkmark(CheckmarkItem {
                    label: format!("{}%", percent),
                    checked: current == Some(level),
                    activate: Box::new(move |tray: &mut Self| {
                        tray.send(UiIntent::Brightness(level))
                    }),
                    ..Default::default()
                })
            })
            .collect();

        let label = match current {
            Some(level) => format!("Brightness ({}%)", level.percent()),
            None => "Brightness".to_string(),
        };

        MenuItem::SubMenu(SubMenu {
            label,
            submenu,
            ..Default::default()
        })
    }

    fn color_menu(&self, current: Option<Color>) -> MenuItem<Self> {
        let submenu: Vec<MenuItem<Self>> = Color::ALL
            .iter()
            .map(|&color| {
                MenuItem::Checkmark(CheckmarkItem {
                    label: color.label().to_string(),
                    checked: current == Some(color),
                    activate: Box::new(move |tray: &mut Self| tray.send(UiIntent::Color(color))),
                    ..Default::default()
                })
            })
            .collect();

        MenuItem::SubMenu(SubMenu {
            label: "Color".to_string(),
            submenu,
            ..Default::default()
        })
    }

    fn zone_group(&self, current: Option<Zone>) -> MenuItem<Self> {
        let selected = current
            .and_then(|zone| Zone::ALL.iter().position(|z| *z == zone))
            .unwrap_or(usize::MAX);

        MenuItem::RadioGroup(RadioGroup {
            selected,
            select: Box::new(|tray: &mut Self, index| {
                if let Some(zone) = Zone::ALL.get(index) {
                    tray.send(UiIntent::Zone(*zone));
                }
            }),
            options: Zone::ALL
                .iter()
                .map(|zone| RadioItem {
                    label: format!("Zone: {}", zone.label()),
                    ..Default::default()
                })
                .collect(),
        })
    }
}

impl Tray for LedStripTray {
    fn icon_name(&self) -> String {
        let status = self.state.get_status();
        status.icon_name().to_string()
    }

    fn title(&self) -> String {
        "LED Strip Remote".to_string()
    }

    fn tool_tip(&self) -> ksni::ToolTip {
        ksni::ToolTip {
            icon_name: String::new(),
            icon_pixmap: Vec::new(),
            title: "LED Strip Remote".to_string(),
            description: self.state.get_message(),
        }
    }

    fn menu(&self) -> Vec<MenuItem<Self>> {
        let status = self.state.get_status();
        let connected = status == ConnectionStatus::Connected;
        let controls = self.state.get_controls();

        let mut items = vec![];

        // Status header
        items.push(MenuItem::Standard(StandardItem {
            label: self.status_line(),
            enabled: false,
            ..Default::default()
        }));

        items.push(MenuItem::Standard(StandardItem {
            label: self.state.get_message(),
            enabled: false,
            ..Default::default()
        }));

        items.push(MenuItem::Separator);

        if connected {
            items.push(MenuItem::Standard(StandardItem {
                label: "Disconnect".to_string(),
                activate: Box::new(|tray: &mut Self| {
                    tray.emit(TrayAction::Ui(UiAction::Disconnect));
                }),
                ..Default::default()
            }));
        } else {
            items.push(MenuItem::Standard(StandardItem {
                label: "Connect".to_string(),
                enabled: status != ConnectionStatus::Connecting,
                activate: Box::new(|tray: &mut Self| {
                    tray.emit(TrayAction::Ui(UiAction::Connect));
                }),
                ..Default::default()
            }));
        }

        items.push(MenuItem::Separator);

        // Controls
        let sound = controls.sound;
        items.push(MenuItem::Checkmark(CheckmarkItem {
            label: "Sound reactive".to_string(),
            checked: sound,
            activate: Box::new(move |tray: &mut Self| tray.send(UiIntent::Sound(!sound))),
            ..Default::default()
        }));

        items.push(self.brightness_menu(controls.brightness));

        items.push(MenuItem::Separator);
        items.push(self.zone_group(controls.zone));
        items.push(MenuItem::Separator);

        items.push(self.color_menu(controls.color));

        items.push(MenuItem::Checkmark(CheckmarkItem {
            label: "Rainbow".to_string(),
            checked: controls.rainbow == Some(Press::Short),
            activate: Box::new(|tray: &mut Self| tray.send(UiIntent::Rainbow(Press::Short))),
            ..Default::default()
        }));

        // The menu has no long press, so the direction toggle gets its own item.
        items.push(MenuItem::Checkmark(CheckmarkItem {
            label: "Rainbow (reverse direction)".to_string(),
            checked: controls.rainbow == Some(Press::Long),
            activate: Box::new(|tray: &mut Self| tray.send(UiIntent::Rainbow(Press::Long))),
            ..Default::default()
        }));

        items.push(MenuItem::Separator);

        // Quit
        items.push(MenuItem::Standard(StandardItem {
            label: "Quit".to_string(),
            activate: Box::new(|tray: &mut Self| {
                tray.emit(TrayAction::Quit);
            }),
            ..Default::default()
        }));

        items
    }

    fn id(&self) -> String {
        "ledstrip-remote".to_string()
    }

    fn category(&self) -> ksni::Category {
        ksni::Category::Hardware
    }
}

/// Run the system tray service.
pub fn run_tray(
    state: Arc<AppState>,
) -> Result<(mpsc::UnboundedReceiver<TrayAction>, Handle<LedStripTray>)> {
    let (action_tx, action_rx) = mpsc::unbounded_channel();

    let tray = LedStripTray::new(state, action_tx);
    let service = TrayService::new(tray);
    let handle = service.handle();

    // Spawn the tray service
    std::thread::spawn(move || {
        let _ = service.run();
    });

    info!("System tray started");

    Ok((action_rx, handle))
}
