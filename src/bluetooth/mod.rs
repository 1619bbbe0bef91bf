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

//! Bluetooth communication module.
//!
//! Handles the RFCOMM client connection to the strip's HC-05 module.

pub mod connection;
pub mod link;
pub mod peer;
#[cfg(feature = "bluez")]
pub mod rfcomm;

pub use connection::{
    ConnectError, ConnectionEvent, ConnectionManager, ConnectionState, SendError,
};
pub use link::{AdapterState, Link, LinkOptions};
pub use peer::{
    AddressParseError, MacAddress, PeerAddress, DEFAULT_DEVICE_ADDRESS, DEFAULT_DEVICE_NAME,
    SPP_UUID,
};
#[cfg(feature = "bluez")]
pub use rfcomm::RfcommLink;
