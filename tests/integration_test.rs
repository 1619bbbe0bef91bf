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

//! Integration tests for the full remote flow: UI action, encoding, wire.

use futures::future::BoxFuture;
use ledstrip_remote::bluetooth::{
    AdapterState, ConnectionEvent, ConnectionManager, Link, PeerAddress, SendError,
};
use ledstrip_remote::commands::{Brightness, Color, Command, Press, UiIntent, Zone};
use ledstrip_remote::events::{DispatchError, Dispatcher, UiAction};
use ledstrip_remote::state::{AppState, ConnectionStatus};
use parking_lot::Mutex;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader, DuplexStream};
use tokio::sync::mpsc;

/// In-memory link; every open hands the far end of a pipe to the test.
struct BenchLink {
    adapter: AdapterState,
    authorized: bool,
    device_ends: Mutex<Vec<DuplexStream>>,
}

impl BenchLink {
    fn new() -> Self {
        Self {
            adapter: AdapterState::Ready,
            authorized: true,
            device_ends: Mutex::new(Vec::new()),
        }
    }
}

impl Link for BenchLink {
    type Stream = DuplexStream;

    fn adapter_state(&self) -> BoxFuture<'_, AdapterState> {
        Box::pin(async move { self.adapter })
    }

    fn authorize(&self) -> BoxFuture<'_, bool> {
        Box::pin(async move { self.authorized })
    }

    fn open(&self, _peer: PeerAddress) -> BoxFuture<'_, io::Result<DuplexStream>> {
        Box::pin(async move {
            let (ours, theirs) = tokio::io::duplex(1024);
            self.device_ends.lock().push(theirs);
            Ok(ours)
        })
    }
}

fn bench_dispatcher(
    link: BenchLink,
) -> (Dispatcher<BenchLink>, mpsc::UnboundedReceiver<ConnectionEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::new(link, PeerAddress::default()).with_events(tx);
    (Dispatcher::new(manager, AppState::new()), rx)
}

fn take_device_end(dispatcher: &Dispatcher<BenchLink>) -> DuplexStream {
    dispatcher
        .manager()
        .link()
        .device_ends
        .lock()
        .pop()
        .expect("no channel was opened")
}

#[tokio::test]
async fn test_session_lines_on_wire() {
    let (mut dispatcher, _events) = bench_dispatcher(BenchLink::new());
    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    let device = take_device_end(&dispatcher);

    let intents = [
        UiIntent::Sound(true),
        UiIntent::Brightness(Brightness(200)),
        UiIntent::Zone(Zone::Left),
        UiIntent::Color(Color::Magenta),
        UiIntent::Rainbow(Press::Short),
        UiIntent::Rainbow(Press::Long),
        UiIntent::Sound(false),
    ];
    for intent in intents {
        dispatcher.dispatch(intent.into()).await.unwrap();
    }
    dispatcher.dispatch(UiAction::Disconnect).await.unwrap();

    let mut received = String::new();
    BufReader::new(device)
        .read_to_string(&mut received)
        .await
        .unwrap();
    assert_eq!(
        received,
        "SOUND_ON\nBRIGHT:200\nLEFT\nCOLOR:MAGENTA\nRAINBOW\nRAINBOW DIR\nSOUND_OFF\n"
    );

    let controls = dispatcher.state().get_controls();
    assert!(!controls.sound);
    assert_eq!(controls.zone, Some(Zone::Left));
    assert_eq!(controls.rainbow, Some(Press::Long));
}

#[tokio::test]
async fn test_send_without_connection() {
    let (mut dispatcher, mut events) = bench_dispatcher(BenchLink::new());

    let err = dispatcher
        .dispatch(UiIntent::Color(Color::Red).into())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Send(SendError::NotConnected)));

    let state = dispatcher.state();
    assert_eq!(state.get_status(), ConnectionStatus::Disconnected);
    assert_eq!(state.get_message(), "Not connected");
    assert_eq!(state.get_controls().color, None);
    assert!(dispatcher.manager().link().device_ends.lock().is_empty());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_connect_failures_reported() {
    let cases = [
        (AdapterState::Missing, true, "Bluetooth is not available"),
        (AdapterState::PoweredOff, true, "Bluetooth is turned off"),
        (AdapterState::Denied, true, "Bluetooth permission denied"),
        (AdapterState::Ready, false, "Bluetooth permission denied"),
    ];

    for (adapter, authorized, message) in cases {
        let mut link = BenchLink::new();
        link.adapter = adapter;
        link.authorized = authorized;
        let (mut dispatcher, mut events) = bench_dispatcher(link);

        assert!(dispatcher.dispatch(UiAction::Connect).await.is_err());
        assert_eq!(dispatcher.state().get_status(), ConnectionStatus::Error);
        assert_eq!(dispatcher.state().get_message(), message);
        assert_eq!(
            events.try_recv().unwrap(),
            ConnectionEvent::Error(message.to_string())
        );
        assert!(!dispatcher.manager().is_connected());
    }
}

#[tokio::test]
async fn test_peer_hangup_fails_fast_afterwards() {
    let (mut dispatcher, mut events) = bench_dispatcher(BenchLink::new());
    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    assert_eq!(dispatcher.state().get_status(), ConnectionStatus::Connected);
    assert_eq!(dispatcher.state().get_message(), "Connected to HC-05");

    drop(take_device_end(&dispatcher));

    let err = dispatcher
        .dispatch(UiIntent::Zone(Zone::All).into())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Send(SendError::Io(_))));
    assert_eq!(dispatcher.state().get_status(), ConnectionStatus::Disconnected);
    assert!(dispatcher.state().get_message().starts_with("Send failed"));

    let err = dispatcher
        .dispatch(UiIntent::Zone(Zone::All).into())
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchError::Send(SendError::NotConnected)));

    assert!(matches!(events.try_recv().unwrap(), ConnectionEvent::Connected { .. }));
    assert!(matches!(events.try_recv().unwrap(), ConnectionEvent::Error(_)));
    assert_eq!(events.try_recv().unwrap(), ConnectionEvent::Disconnected);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_reconnect_after_failure() {
    let (mut dispatcher, _events) = bench_dispatcher(BenchLink::new());
    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    drop(take_device_end(&dispatcher));
    assert!(dispatcher.dispatch(UiIntent::Sound(true).into()).await.is_err());

    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    let device = take_device_end(&dispatcher);
    dispatcher
        .dispatch(UiIntent::Sound(true).into())
        .await
        .unwrap();

    let mut line = String::new();
    BufReader::new(device).read_line(&mut line).await.unwrap();
    assert_eq!(line, "SOUND_ON\n");
}

#[tokio::test]
async fn test_disconnect_twice() {
    let (mut dispatcher, mut events) = bench_dispatcher(BenchLink::new());
    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    let mut device = take_device_end(&dispatcher);

    dispatcher.dispatch(UiAction::Disconnect).await.unwrap();
    dispatcher.dispatch(UiAction::Disconnect).await.unwrap();
    assert_eq!(dispatcher.state().get_status(), ConnectionStatus::Disconnected);

    // Device sees end of stream.
    let mut buf = Vec::new();
    assert_eq!(device.read_to_end(&mut buf).await.unwrap(), 0);

    assert!(matches!(events.try_recv().unwrap(), ConnectionEvent::Connected { .. }));
    assert_eq!(events.try_recv().unwrap(), ConnectionEvent::Disconnected);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_raw_line_passthrough() {
    let (mut dispatcher, _events) = bench_dispatcher(BenchLink::new());
    dispatcher.dispatch(UiAction::Connect).await.unwrap();
    let device = take_device_end(&dispatcher);

    let command = Command::raw("SPEED:4").unwrap();
    dispatcher.dispatch(UiAction::Raw(command)).await.unwrap();
    dispatcher.shutdown().await;

    let mut received = String::new();
    BufReader::new(device)
        .read_to_string(&mut received)
        .await
        .unwrap();
    assert_eq!(received, "SPEED:4\n");
}
