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

//! Strip command encoding.
//!
//! Maps user intents to the controller's line protocol: one ASCII command per
//! line, terminated by `\n`, no escaping and no reply.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Line delimiter appended to every command.
pub const DELIMITER: u8 = b'\n';

/// Error returned when a name does not match any known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseIntentError {
    pub kind: &'static str,
    pub value: String,
}

/// Error returned for a raw line that cannot go on the wire as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCommand {
    #[error("command is empty")]
    Empty,
    #[error("command contains a line break")]
    LineBreak,
    #[error("command contains non-ASCII characters")]
    NonAscii,
}

/// Strip colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Green,
    Blue,
    White,
    Yellow,
    Cyan,
    Magenta,
    Pink,
}

impl Color {
    pub const ALL: [Color; 8] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::White,
        Self::Yellow,
        Self::Cyan,
        Self::Magenta,
        Self::Pink,
    ];

    /// Parse from name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "RED" => Some(Self::Red),
            "GREEN" => Some(Self::Green),
            "BLUE" => Some(Self::Blue),
            "WHITE" => Some(Self::White),
            "YELLOW" => Some(Self::Yellow),
            "CYAN" => Some(Self::Cyan),
            "MAGENTA" => Some(Self::Magenta),
            "PINK" => Some(Self::Pink),
            _ => None,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "RED",
            Self::Green => "GREEN",
            Self::Blue => "BLUE",
            Self::White => "WHITE",
            Self::Yellow => "YELLOW",
            Self::Cyan => "CYAN",
            Self::Magenta => "MAGENTA",
            Self::Pink => "PINK",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::White => "White",
            Self::Yellow => "Yellow",
            Self::Cyan => "Cyan",
            Self::Magenta => "Magenta",
            Self::Pink => "Pink",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseIntentError {
            kind: "color",
            value: s.to_string(),
        })
    }
}

/// Strip zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    All,
    Left,
    Right,
    Center,
}

impl Zone {
    pub const ALL: [Zone; 4] = [Self::All, Self::Left, Self::Right, Self::Center];

    /// Parse from name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Some(Self::All),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "CENTER" => Some(Self::Center),
            _ => None,
        }
    }

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Center => "CENTER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Center => "Center",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Zone {
    type Err = ParseIntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseIntentError {
            kind: "zone",
            value: s.to_string(),
        })
    }
}

/// How a control was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Press {
    Short,
    Long,
}

/// Brightness level. The wire accepts 0..=255, which `u8` covers exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Brightness(pub u8);

impl Brightness {
    pub const MAX: Brightness = Brightness(u8::MAX);

    /// Saturate an arbitrary integer into range.
    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(0, u8::MAX as i64) as u8)
    }

    /// Level from a percentage, rounded to the nearest step.
    pub fn from_percent(percent: u8) -> Self {
        let percent = u32::from(percent.min(100));
        Self(((percent * 255 + 50) / 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn percent(&self) -> u8 {
        ((u32::from(self.0) * 100 + 127) / 255) as u8
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// A discrete user action on the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiIntent {
    /// Sound-reactive mode on/off.
    Sound(bool),
    /// Brightness slider.
    Brightness(Brightness),
    /// Zone selection.
    Zone(Zone),
    /// Solid color.
    Color(Color),
    /// Rainbow effect; a long press reverses its direction.
    Rainbow(Press),
}

impl UiIntent {
    /// Encode into a wire command.
    pub fn encode(&self) -> Command {
        encode(self)
    }
}

/// A single line of the strip protocol, without its delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command(Cow<'static, str>);

impl Command {
    /// Build a command from an arbitrary line.
    pub fn raw(line: impl Into<String>) -> Result<Self, InvalidCommand> {
        let line = line.into();
        if line.is_empty() {
            return Err(InvalidCommand::Empty);
        }
        if line.contains(|c: char| c == '\n' || c == '\r') {
            return Err(InvalidCommand::LineBreak);
        }
        if !line.is_ascii() {
            return Err(InvalidCommand::NonAscii);
        }
        Ok(Self(Cow::Owned(line)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Bytes to write: the command followed by exactly one delimiter.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.len() + 1);
        bytes.extend_from_slice(self.0.as_bytes());
        bytes.push(DELIMITER);
        bytes
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UiIntent> for Command {
    fn from(intent: UiIntent) -> Self {
        encode(&intent)
    }
}

/// Map an intent to its command.
pub fn encode(intent: &UiIntent) -> Command {
    let line: Cow<'static, str> = match intent {
        UiIntent::Sound(true) => "SOUND_ON".into(),
        UiIntent::Sound(false) => "SOUND_OFF".into(),
        UiIntent::Brightness(level) => format!("BRIGHT:{}", level.value()).into(),
        UiIntent::Zone(zone) => zone.as_str().into(),
        UiIntent::Color(color) => format!("COLOR:{}", color.as_str()).into(),
        UiIntent::Rainbow(Press::Short) => "RAINBOW".into(),
        UiIntent::Rainbow(Press::Long) => "RAINBOW DIR".into(),
    };
    Command(line)
}
