// SPDX-License-Identifier: MIT OR Apache-2.0

//! The framed command client: login, single in-flight request/response,
//! pagination, and a representative endpoint catalogue.

pub mod endpoints;
pub mod session;

pub use endpoints::{AlarmStatus, PanelTime, SysConfig};
pub use session::CommandSession;
