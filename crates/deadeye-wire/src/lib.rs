//! DeadEye Wire - Dart events from the board relay
//!
//! The dart caller reports each throw as JSON. Two shapes are understood:
//!
//! - caller messages: `{"event": "dart1-thrown", "game": {"fieldNumber": 20,
//!   "fieldMultiplier": 3, "dartValue": 60}}` (`dart2-thrown`, `dart3-thrown`
//!   likewise)
//! - the relay re-broadcast: `{"segment": 20, "multiplier": 3, "value": 60}`
//!
//! Anything else (subscriptions, status pings, board events) decodes to
//! [`RelayMessage::Ignored`].
//!
//! A [`DartSource`] yields events one at a time and [`pump`] feeds them into
//! a session, handing every command to a presenter.
//!
//! # Example
//!
//! ```
//! use deadeye_core::DartEvent;
//! use deadeye_wire::{decode, RelayMessage};
//!
//! let msg = decode(r#"{"event":"dart2-thrown","game":{"fieldNumber":20,"fieldMultiplier":3,"dartValue":60}}"#).unwrap();
//! assert_eq!(msg.dart(), Some(DartEvent::triple(20)));
//! assert_eq!(decode(r#"{"event":"subscribe"}"#).unwrap(), RelayMessage::Ignored("subscribe".into()));
//! ```

mod error;
mod message;
mod source;

pub use error::{Error, Result};
pub use message::{decode, RelayMessage, RelayThrow, THROW_EVENTS};
pub use source::{pump, DartSource, LineSource, PumpStats, ScriptSource};
