// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged-scalar mini-grammar used inside every XML leaf value, e.g.
//! `STR,4|Home` or `S32,0,0|1`. [`decode_leaf`] mirrors the panel's own
//! `if`/`elif` match order; [`encode`] holds the inverse, one free function
//! per tag.

use chrono::{NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// A decoded tagged-scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    /// `DTA` timestamp, kept as its raw wire text. Use [`Scalar::as_datetime`]
    /// to get a `chrono::NaiveDateTime` out of it.
    DateTime(String),
    /// `HMA` time-of-day, kept as its raw wire text. Use [`Scalar::as_time`].
    Time(String),
    Err(u8),
    Ip(String),
    Mac(String),
    /// `NEA` hex blob, decoded to raw bytes.
    Hex(Vec<u8>),
    Num(String),
    Password(String),
    Signed(i64),
    Str(String),
    Typ(u32),
}

impl Scalar {
    /// Parses a [`Scalar::DateTime`]'s wire text (`YYYY.MM.DD.hh.mm.ss`) into
    /// a `chrono` value. `None` for any other variant or malformed text.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::DateTime(raw) => NaiveDateTime::parse_from_str(raw, "%Y.%m.%d.%H.%M.%S").ok(),
            _ => None,
        }
    }

    /// Parses a [`Scalar::Time`]'s wire text (`hh:mm`) into a `chrono` value.
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Scalar::Time(raw) => NaiveTime::parse_from_str(raw, "%H:%M").ok(),
            _ => None,
        }
    }
}

macro_rules! lazy_re {
    ($name:ident, $pat:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pat).expect("static regex"));
    };
}

lazy_re!(RE_BOL, r"^BOL\|([FT])$");
lazy_re!(RE_DTA, r"^DTA(?:,\d+)*\|(\d{4}\.\d{2}\.\d{2}\.\d{2}\.\d{2}\.\d{2})$");
lazy_re!(RE_ERR, r"^ERR\|(\d{2})$");
lazy_re!(RE_HMA, r"^HMA,\d+\|(\d{2}:\d{2})$");
lazy_re!(RE_IPA, r"^IPA,\d+\|((?:[0-2]?\d{1,2}\.){3}[0-2]?\d{1,2})$");
lazy_re!(RE_MAC, r"^MAC,\d+\|((?:[0-9A-F]{2}[:-]){5}[0-9A-F]{2})$");
lazy_re!(RE_NEA, r"^NEA,\d+\|([0-9A-F]+)$");
lazy_re!(RE_NUM, r"^NUM,\d+,\d+\|(\d*)$");
lazy_re!(RE_PWD, r"^PWD,\d+\|(.*)$");
lazy_re!(RE_S32, r"^S32,\d+,\d+\|(-?\d*)$");
lazy_re!(RE_STR, r"^STR,\d+\|(.*)$");
lazy_re!(RE_TYP, r"^TYP,\w+\|(\d+)$");

/// Decode one leaf value, trying each tag pattern in the panel's own
/// match order. Returns `None` when nothing matches so the caller can
/// decide whether to treat the text as an opaque string or an error.
pub fn decode_leaf(input: &str) -> Option<Scalar> {
    if let Some(c) = RE_BOL.captures(input) {
        return Some(Scalar::Bool(&c[1] == "T"));
    }
    if let Some(c) = RE_DTA.captures(input) {
        return Some(Scalar::DateTime(c[1].to_string()));
    }
    if let Some(c) = RE_ERR.captures(input) {
        return c[1].parse().ok().map(Scalar::Err);
    }
    if let Some(c) = RE_HMA.captures(input) {
        return Some(Scalar::Time(c[1].to_string()));
    }
    if let Some(c) = RE_IPA.captures(input) {
        return Some(Scalar::Ip(c[1].to_string()));
    }
    if let Some(c) = RE_MAC.captures(input) {
        return Some(Scalar::Mac(c[1].to_string()));
    }
    if let Some(c) = RE_NEA.captures(input) {
        return hex::decode(&c[1]).ok().map(Scalar::Hex);
    }
    if let Some(c) = RE_NUM.captures(input) {
        return Some(Scalar::Num(c[1].to_string()));
    }
    if let Some(c) = RE_PWD.captures(input) {
        return Some(Scalar::Password(c[1].to_string()));
    }
    if let Some(c) = RE_S32.captures(input) {
        return c[1].parse().ok().map(Scalar::Signed);
    }
    if let Some(c) = RE_STR.captures(input) {
        return Some(Scalar::Str(c[1].to_string()));
    }
    if let Some(c) = RE_TYP.captures(input) {
        return c[1].parse().ok().map(Scalar::Typ);
    }
    None
}

/// Free encoder functions, one per tag, mirroring the panel's own helpers.
pub mod encode {
    use chrono::{NaiveDateTime, NaiveTime};

    /// `BOL|T` / `BOL|F`.
    pub fn bol(value: bool) -> String {
        format!("BOL|{}", if value { "T" } else { "F" })
    }

    /// `DTA,<len>|<YYYY.MM.DD.hh.mm.ss>`.
    pub fn dta(timestamp: &NaiveDateTime) -> String {
        let text = timestamp.format("%Y.%m.%d.%H.%M.%S").to_string();
        format!("DTA,{}|{}", text.len(), text)
    }

    /// `HMA,<len>|<hh:mm>`.
    pub fn hma(time: &NaiveTime) -> String {
        let text = time.format("%H:%M").to_string();
        format!("HMA,{}|{}", text.len(), text)
    }

    /// `PWD,<len>|<text>`. Never logged or displayed.
    pub fn pwd(text: &str) -> String {
        format!("PWD,{}|{}", text.len(), text)
    }

    /// `S32,<pos>,<pos>|<value>`.
    pub fn s32(value: i64, pos: u32) -> String {
        format!("S32,{pos},{pos}|{value}")
    }

    /// `MAC,<len>|<AA:BB:CC:DD:EE:FF>`.
    pub fn mac(address: &str) -> String {
        format!("MAC,{}|{}", address.len(), address)
    }

    /// `IPA,<len>|<a.b.c.d>`.
    pub fn ipa(address: &str) -> String {
        format!("IPA,{}|{}", address.len(), address)
    }

    /// `STR,<len>|<text>`.
    pub fn str_(text: &str) -> String {
        format!("STR,{}|{}", text.len(), text)
    }

    /// `TYP,<name>|<value>`.
    pub fn typ(name: &str, value: u32) -> String {
        format!("TYP,{name}|{value}")
    }

    /// `TYP,<labels[value]>|<value>` when `value` indexes into `labels`,
    /// else `TYP,NONE|<value>`.
    pub fn typ_labeled(value: u32, labels: &[&str]) -> String {
        match labels.get(value as usize) {
            Some(name) => typ(name, value),
            None => typ("NONE", value),
        }
    }

    /// `NEA,<len>|<HEX>`.
    pub fn nea(bytes: &[u8]) -> String {
        let text = hex::encode_upper(bytes);
        format!("NEA,{}|{}", text.len(), text)
    }
}
