// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire codec: frame header, keystream obfuscation, tagged scalars, the
//! ordered command tree, and the XML serialization connecting them.

pub mod frame;
pub mod keystream;
pub mod scalar;
pub mod tree;
pub mod xml;

pub use frame::{Frame, Magic};
pub use scalar::Scalar;
pub use tree::Node;
