// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::all)]

mod integration_tests {
    pub mod common;

    pub mod command_session;
    pub mod push_session;
}
