// SPDX-License-Identifier: MIT OR Apache-2.0

//! A pure-Rust client for the Meian/Emooz intruder-alarm panel TCP control
//! protocol: a framed, obfuscated, XML-over-TCP command channel plus a
//! separate push channel for unsolicited alarm events.

pub mod cfg;
pub mod codec;
pub mod command;
pub mod contact_id;
pub mod error;
pub mod push;
pub mod timezone;

pub use command::CommandSession;
pub use error::{Error, Result};
pub use push::{AlarmEvent, AlarmHandler, PushSession};
