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

//! Peer addressing: the HC-05 hardware address and the service it exposes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Standard SPP UUID.
pub const SPP_UUID: Uuid = Uuid::from_u128(0x00001101_0000_1000_8000_00805F9B34FB);

/// Hardware address of the strip's HC-05 module.
pub const DEFAULT_DEVICE_ADDRESS: MacAddress = MacAddress([0x58, 0x56, 0x00, 0x00, 0xCD, 0x7E]);

/// Name shown in status messages.
pub const DEFAULT_DEVICE_NAME: &str = "HC-05";

/// Error returned when a hardware address string is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hardware address '{0}': expected six hex pairs like 58:56:00:00:CD:7E")]
pub struct AddressParseError(pub String);

/// A 6-byte Bluetooth device address, most significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(pub [u8; 6]);

impl MacAddress {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for MacAddress {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || AddressParseError(s.to_string());
        let mut bytes = [0u8; 6];
        let mut parts = s.trim().split(':');

        for byte in bytes.iter_mut() {
            let part = parts.next().ok_or_else(err)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(err());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| err())?;
        }

        if parts.next().is_some() {
            return Err(err());
        }

        Ok(Self(bytes))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(addr: MacAddress) -> Self {
        addr.to_string()
    }
}

/// Where to connect: the device address plus the service to open on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerAddress {
    pub address: MacAddress,
    pub service: Uuid,
}

impl PeerAddress {
    pub const fn new(address: MacAddress, service: Uuid) -> Self {
        Self { address, service }
    }
}

impl Default for PeerAddress {
    fn default() -> Self {
        Self::new(DEFAULT_DEVICE_ADDRESS, SPP_UUID)
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_peer() {
        let peer = PeerAddress::default();
        assert_eq!(peer.address.to_string(), "58:56:00:00:CD:7E");
        assert_eq!(
            peer.service.to_string(),
            "00001101-0000-1000-8000-00805f9b34fb"
        );
    }

    #[test]
    fn test_parse_address() {
        let addr: MacAddress = "58:56:00:00:cd:7e".parse().unwrap();
        assert_eq!(addr, DEFAULT_DEVICE_ADDRESS);
        assert_eq!(addr.to_string(), "58:56:00:00:CD:7E");
    }

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!("".parse::<MacAddress>().is_err());
        assert!("58:56:00:00:CD".parse::<MacAddress>().is_err());
        assert!("58:56:00:00:CD:7E:01".parse::<MacAddress>().is_err());
        assert!("58:56:00:00:CD:7".parse::<MacAddress>().is_err());
        assert!("58-56-00-00-CD-7E".parse::<MacAddress>().is_err());
        assert!("ZZ:56:00:00:CD:7E".parse::<MacAddress>().is_err());
    }
}
