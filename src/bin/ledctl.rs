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

//! One-shot command line client.
//!
//! Usage: ledctl [--address MAC] [--channel N] <sound|bright|zone|color|rainbow|raw> ...

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

use ledstrip_remote::bluetooth::{ConnectionManager, MacAddress, RfcommLink};
use ledstrip_remote::commands::{Brightness, Color, Command, Press, UiIntent, Zone};
use ledstrip_remote::config::Config;
use ledstrip_remote::events::{Dispatcher, UiAction};
use ledstrip_remote::state::AppState;

#[derive(Parser)]
#[command(
    name = "ledctl",
    version,
    about = "Send a command to an HC-05 LED strip controller"
)]
struct Args {
    /// Hardware address of the strip, overriding the config file
    #[arg(long)]
    address: Option<MacAddress>,

    /// RFCOMM channel to use instead of looking up the serial port service
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=30))]
    channel: Option<u8>,

    /// Config file (default: the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Turn sound reactive mode on or off
    Sound { state: Toggle },
    /// Set brightness (0-255)
    Bright { level: u8 },
    /// Select a zone (all, left, right, center)
    Zone { zone: Zone },
    /// Set a solid color (red, green, blue, white, yellow, cyan, magenta, pink)
    Color { color: Color },
    /// Start the rainbow effect
    Rainbow {
        /// Send the long-press variant, which reverses the direction
        #[arg(long)]
        long: bool,
    },
    /// Send a literal line
    Raw { line: String },
}

impl CliCommand {
    fn into_action(self) -> Result<UiAction> {
        let intent = match self {
            CliCommand::Sound { state } => UiIntent::Sound(matches!(state, Toggle::On)),
            CliCommand::Bright { level } => UiIntent::Brightness(Brightness(level)),
            CliCommand::Zone { zone } => UiIntent::Zone(zone),
            CliCommand::Color { color } => UiIntent::Color(color),
            CliCommand::Rainbow { long } => {
                UiIntent::Rainbow(if long { Press::Long } else { Press::Short })
            }
            CliCommand::Raw { line } => return Ok(UiAction::Raw(Command::raw(line)?)),
        };
        Ok(UiAction::Intent(intent))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ledstrip_remote=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(address) = args.address {
        config.device.address = address;
    }
    if let Some(channel) = args.channel {
        config.device.rfcomm_channel = Some(channel);
    }

    let action = args.command.into_action()?;
    debug!("Peer {}, action {:?}", config.peer(), action);

    let state = AppState::new();
    let manager = ConnectionManager::new(RfcommLink::new(config.link_options()), config.peer())
        .with_device_name(config.device.name.clone());
    let mut dispatcher = Dispatcher::new(manager, state.clone());

    let result = async {
        dispatcher.dispatch(UiAction::Connect).await?;
        dispatcher.dispatch(action.clone()).await
    }
    .await;
    dispatcher.shutdown().await;
    result?;

    match action {
        UiAction::Intent(intent) => println!("{}", intent.encode()),
        UiAction::Raw(command) => println!("{}", command),
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("ledctl").chain(args.iter().copied()))
    }

    /// Wire bytes the given command line would send.
    fn wire(args: &[&str]) -> String {
        let command = match parse(args).unwrap().command.into_action().unwrap() {
            UiAction::Intent(intent) => intent.encode(),
            UiAction::Raw(command) => command,
            other => panic!("unexpected action: {:?}", other),
        };
        String::from_utf8(command.to_bytes()).unwrap()
    }

    #[test]
    fn test_subcommands_encode() {
        assert_eq!(wire(&["sound", "on"]), "SOUND_ON\n");
        assert_eq!(wire(&["sound", "off"]), "SOUND_OFF\n");
        assert_eq!(wire(&["bright", "0"]), "BRIGHT:0\n");
        assert_eq!(wire(&["bright", "255"]), "BRIGHT:255\n");
        assert_eq!(wire(&["zone", "center"]), "CENTER\n");
        assert_eq!(wire(&["color", "pink"]), "COLOR:PINK\n");
        assert_eq!(wire(&["raw", "SPEED:4"]), "SPEED:4\n");
    }

    #[test]
    fn test_rainbow_long_reverses_direction() {
        assert_eq!(wire(&["rainbow"]), "RAINBOW\n");
        assert_eq!(wire(&["rainbow", "--long"]), "RAINBOW DIR\n");
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(wire(&["zone", "LEFT"]), "LEFT\n");
        assert_eq!(wire(&["zone", "Right"]), "RIGHT\n");
        assert_eq!(wire(&["color", "Magenta"]), "COLOR:MAGENTA\n");
    }

    #[test]
    fn test_invalid_arguments_rejected() {
        assert!(parse(&["bright", "300"]).is_err());
        assert!(parse(&["bright", "-1"]).is_err());
        assert!(parse(&["zone", "middle"]).is_err());
        assert!(parse(&["color", "orange"]).is_err());
        assert!(parse(&["sound", "loud"]).is_err());
        assert!(parse(&["--channel", "0", "rainbow"]).is_err());
        assert!(parse(&["--channel", "31", "rainbow"]).is_err());
        assert!(parse(&["--address", "58:56:00:00:CD", "rainbow"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_raw_line_validated() {
        let args = parse(&["raw", "A\nB"]).unwrap();
        assert!(args.command.into_action().is_err());

        let args = parse(&["raw", "CAFÉ"]).unwrap();
        assert!(args.command.into_action().is_err());
    }

    #[test]
    fn test_global_options() {
        let args = parse(&[
            "--address",
            "58:56:00:00:cd:7e",
            "--channel",
            "1",
            "--config",
            "/tmp/ledstrip.toml",
            "color",
            "red",
        ])
        .unwrap();
        assert_eq!(args.address.unwrap().to_string(), "58:56:00:00:CD:7E");
        assert_eq!(args.channel, Some(1));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/ledstrip.toml")));
    }
}
