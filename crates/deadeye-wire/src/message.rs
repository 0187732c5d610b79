//! Relay message decoding

use crate::error::{Error, Result};
use deadeye_core::DartEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller events that carry a throw
pub const THROW_EVENTS: [&str; 3] = ["dart1-thrown", "dart2-thrown", "dart3-thrown"];

/// Event name the relay re-broadcasts throws under
const BROADCAST_EVENT: &str = "dart_thrown";

/// A decoded throw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayThrow {
    pub dart: DartEvent,
    /// Position in the caller's turn, when reported
    pub dart_number: Option<u8>,
    pub player: Option<String>,
}

/// One message from the relay
#[derive(Debug, Clone, PartialEq)]
pub enum RelayMessage {
    Throw(RelayThrow),
    /// The caller connected to or dropped from the relay
    Status { connected: bool },
    /// Anything else, by event name (empty when unnamed)
    Ignored(String),
}

impl RelayMessage {
    /// The dart, if this is a throw
    pub fn dart(&self) -> Option<DartEvent> {
        match self {
            RelayMessage::Throw(throw) => Some(throw.dart),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    event: Option<String>,
    game: Option<Value>,
    segment: Option<i64>,
    multiplier: Option<i64>,
    value: Option<i64>,
    dart_number: Option<Value>,
    player: Option<Value>,
    connected: Option<bool>,
}

/// The `game` object of a caller throw
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CallerGame {
    field_number: i64,
    field_multiplier: i64,
    dart_value: i64,
    dart_number: Option<Value>,
}

impl Default for CallerGame {
    fn default() -> Self {
        Self {
            field_number: 0,
            field_multiplier: 1,
            dart_value: 0,
            dart_number: None,
        }
    }
}

fn narrow(field: &'static str, value: i64, max: i64) -> Result<i64> {
    if (0..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Error::OutOfRange { field, value })
    }
}

fn dart_event(segment: i64, multiplier: i64, value: i64) -> Result<DartEvent> {
    let segment = narrow("segment", segment, 25)?;
    let multiplier = narrow("multiplier", multiplier, 3)?;
    let value = narrow("value", value, i64::from(u32::MAX))?;
    Ok(DartEvent::new(segment as u8, multiplier as u8, value as u32))
}

/// `dartNumber` arrives as a number, or as `"?"` when unknown
fn dart_number(value: Option<&Value>) -> Option<u8> {
    value
        .and_then(Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
}

fn player(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Decode one relay message
///
/// Out-of-range fields are errors. A throw without a `game` object falls back
/// to segment 0, single, 0 points, as the relay itself does.
pub fn decode(text: &str) -> Result<RelayMessage> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let event = envelope.event.clone().unwrap_or_default();
    let is_throw = THROW_EVENTS.contains(&event.as_str());

    if is_throw {
        if let Some(game) = envelope.game.clone() {
            let game: CallerGame = serde_json::from_value(game)?;
            let dart = dart_event(game.field_number, game.field_multiplier, game.dart_value)?;
            return Ok(RelayMessage::Throw(RelayThrow {
                dart,
                dart_number: dart_number(game.dart_number.as_ref()),
                player: player(envelope.player.as_ref()),
            }));
        }
    }

    if let Some(segment) = envelope.segment {
        if is_throw || event.is_empty() || event == BROADCAST_EVENT {
            let dart = dart_event(
                segment,
                envelope.multiplier.unwrap_or(1),
                envelope.value.unwrap_or(0),
            )?;
            return Ok(RelayMessage::Throw(RelayThrow {
                dart,
                dart_number: dart_number(envelope.dart_number.as_ref()),
                player: player(envelope.player.as_ref()),
            }));
        }
    }

    if is_throw {
        let game = CallerGame::default();
        let dart = dart_event(game.field_number, game.field_multiplier, game.dart_value)?;
        return Ok(RelayMessage::Throw(RelayThrow {
            dart,
            dart_number: None,
            player: player(envelope.player.as_ref()),
        }));
    }

    if let Some(connected) = envelope.connected {
        return Ok(RelayMessage::Status { connected });
    }

    Ok(RelayMessage::Ignored(event))
}
