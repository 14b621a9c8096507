//! The websocket push channel.
//!
//! Messages are forwarded to the dashboard in arrival order. Delivery is
//! at-most-once and best effort: nothing is buffered across a disconnect,
//! and a closed or failed socket is reported once and never reopened here.
//! While the socket is down the dashboard keeps itself current from the
//! polled report alone.

use std::cell::Cell;
use std::rc::Rc;

use futures_util::StreamExt;
use gloo_console::warn;
use gloo_net::websocket::futures::WebSocket;
use gloo_net::websocket::Message;
use yew::Callback;

use common::model::analytics::PushMessage;

const FALLBACK_ENDPOINT: &str = "ws://localhost:8000/ws";

/// Push endpoint derived from the page location.
pub fn endpoint() -> String {
    web_sys::window()
        .and_then(|window| {
            let location = window.location();
            let scheme = match location.protocol().ok()?.as_str() {
                "https:" => "wss",
                _ => "ws",
            };
            let host = location.host().ok()?;
            Some(format!("{scheme}://{host}/ws"))
        })
        .unwrap_or_else(|| FALLBACK_ENDPOINT.to_string())
}

/// Reads the socket until it closes, the session ends, or an error occurs.
///
/// Decoded messages go to `on_message`; frames that do not decode are
/// logged and skipped so one malformed event cannot stall the stream.
/// `on_closed` fires exactly once, with the failure reason if there was one.
/// When `alive` flips off, the socket is dropped without applying any
/// still-queued frames.
pub async fn pump(
    alive: Rc<Cell<bool>>,
    on_message: Callback<PushMessage>,
    on_closed: Callback<Option<String>>,
) {
    let mut socket = match WebSocket::open(&endpoint()) {
        Ok(socket) => socket,
        Err(err) => {
            on_closed.emit(Some(err.to_string()));
            return;
        }
    };

    while let Some(frame) = socket.next().await {
        if !alive.get() {
            return;
        }
        match frame {
            Ok(Message::Text(raw)) => match serde_json::from_str::<PushMessage>(&raw) {
                Ok(message) => on_message.emit(message),
                Err(err) => warn!(format!("unrecognized push payload: {err}")),
            },
            Ok(Message::Bytes(_)) => {}
            Err(err) => {
                on_closed.emit(Some(err.to_string()));
                return;
            }
        }
    }

    if alive.get() {
        on_closed.emit(None);
    }
}
