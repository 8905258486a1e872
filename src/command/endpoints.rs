// SPDX-License-Identifier: MIT OR Apache-2.0

//! A representative, hand-written subset of panel endpoints built on top
//! of [`CommandSession::request`]/[`CommandSession::request_list`]. Any
//! endpoint not named here can still be reached through those two generic
//! entry points directly.

use chrono::NaiveDateTime;

use crate::codec::scalar::{encode, Scalar};
use crate::codec::tree::Node;
use crate::error::{Error, Result};

use super::session::CommandSession;

/// `Root/Host/GetTime` / `Root/Host/SetTime` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTime {
    pub enabled: bool,
    pub name: String,
    pub zone_ordinal: u32,
    pub time: NaiveDateTime,
    pub dst: bool,
}

/// The four states `SetAlarmStatus`/`GetAlarmStatus` exchange as a `TYP`
/// scalar ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmStatus {
    Arm,
    Disarm,
    Stay,
    Clear,
}

impl AlarmStatus {
    const ORDER: [&'static str; 4] = ["ARM", "DISARM", "STAY", "CLEAR"];

    fn ordinal(self) -> u32 {
        match self {
            AlarmStatus::Arm => 0,
            AlarmStatus::Disarm => 1,
            AlarmStatus::Stay => 2,
            AlarmStatus::Clear => 3,
        }
    }

    fn from_ordinal(ord: u32) -> Result<Self> {
        match ord {
            0 => Ok(AlarmStatus::Arm),
            1 => Ok(AlarmStatus::Disarm),
            2 => Ok(AlarmStatus::Stay),
            3 => Ok(AlarmStatus::Clear),
            other => Err(Error::Protocol(format!("unknown alarm status ordinal {other}"))),
        }
    }
}

/// `Root/Host/GetSys` / `Root/Host/SetSys` payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysConfig {
    pub in_delay: i64,
    pub out_delay: i64,
    pub alarm_time: i64,
    pub wl_loss: i64,
    pub ac_loss: i64,
    pub com_loss: i64,
    pub arm_voice: bool,
    pub arm_report: bool,
    pub force_arm: bool,
    pub door_check: bool,
    pub break_check: bool,
    pub alarm_limit: bool,
}

fn leaf(node: &Node, field: &str) -> Option<&str> {
    node.get(field).and_then(Node::as_leaf)
}

fn signed(node: &Node, field: &str) -> Result<i64> {
    let raw = leaf(node, field).ok_or_else(|| Error::Protocol(format!("missing field {field}")))?;
    match crate::codec::scalar::decode_leaf(raw) {
        Some(crate::codec::scalar::Scalar::Signed(v)) => Ok(v),
        _ => Err(Error::Protocol(format!("field {field} is not numeric: {raw}"))),
    }
}

fn boolean(node: &Node, field: &str) -> Result<bool> {
    let raw = leaf(node, field).ok_or_else(|| Error::Protocol(format!("missing field {field}")))?;
    match crate::codec::scalar::decode_leaf(raw) {
        Some(crate::codec::scalar::Scalar::Bool(v)) => Ok(v),
        _ => Err(Error::Protocol(format!("field {field} is not boolean: {raw}"))),
    }
}

fn datetime(node: &Node, field: &str) -> Result<NaiveDateTime> {
    let raw = leaf(node, field).ok_or_else(|| Error::Protocol(format!("missing field {field}")))?;
    crate::codec::scalar::decode_leaf(raw)
        .as_ref()
        .and_then(Scalar::as_datetime)
        .ok_or_else(|| Error::Protocol(format!("field {field} is not a DTA timestamp: {raw}")))
}

impl CommandSession {
    /// `Root/Host/GetAlarmStatus`.
    pub async fn get_alarm_status(&self) -> Result<AlarmStatus> {
        let mut cmd = Node::children();
        cmd.push("DevStatus", Node::leaf(""));
        cmd.push("Err", Node::leaf(""));
        let resp = self.request("Root/Host/GetAlarmStatus", cmd).await?;
        let raw = leaf(&resp, "DevStatus").ok_or_else(|| Error::Protocol("missing DevStatus".into()))?;
        match crate::codec::scalar::decode_leaf(raw) {
            Some(crate::codec::scalar::Scalar::Typ(ord)) => AlarmStatus::from_ordinal(ord),
            _ => Err(Error::Protocol(format!("DevStatus is not a TYP scalar: {raw}"))),
        }
    }

    /// `Root/Host/SetAlarmStatus`.
    pub async fn set_alarm_status(&self, status: AlarmStatus) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("DevStatus", Node::leaf(encode::typ_labeled(status.ordinal(), &AlarmStatus::ORDER)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetAlarmStatus", cmd).await?;
        Ok(())
    }

    /// `Root/Host/GetZone`, paginated.
    pub async fn get_zone(&self) -> Result<Vec<Node>> {
        let mut cmd = Node::children();
        cmd.push("Total", Node::leaf(""));
        cmd.push("Offset", Node::leaf(encode::s32(0, 0)));
        cmd.push("Ln", Node::leaf(""));
        cmd.push("Err", Node::leaf(""));
        self.request_list("Root/Host/GetZone", cmd).await
    }

    /// `Root/Host/SetZone`.
    pub async fn set_zone(&self, pos: i64, zone_type: u32, zone: u32, name: &str) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("Pos", Node::leaf(encode::s32(pos, 1)));
        cmd.push("Type", Node::leaf(encode::typ_labeled(zone_type, &[])));
        cmd.push("Zone", Node::leaf(encode::typ_labeled(zone, &[])));
        cmd.push("Name", Node::leaf(encode::str_(name)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetZone", cmd).await?;
        Ok(())
    }

    /// `Root/Host/GetEvents`, paginated.
    pub async fn get_events(&self) -> Result<Vec<Node>> {
        let mut cmd = Node::children();
        cmd.push("Total", Node::leaf(""));
        cmd.push("Offset", Node::leaf(encode::s32(0, 0)));
        cmd.push("Ln", Node::leaf(""));
        cmd.push("Err", Node::leaf(""));
        self.request_list("Root/Host/GetEvents", cmd).await
    }

    /// `Root/Host/GetSensor`, paginated.
    pub async fn get_sensor(&self) -> Result<Vec<Node>> {
        let mut cmd = Node::children();
        cmd.push("Total", Node::leaf(""));
        cmd.push("Offset", Node::leaf(encode::s32(0, 0)));
        cmd.push("Ln", Node::leaf(""));
        cmd.push("Err", Node::leaf(""));
        self.request_list("Root/Host/GetSensor", cmd).await
    }

    /// `Root/Host/GetPhone`, paginated.
    pub async fn get_phone(&self) -> Result<Vec<Node>> {
        let mut cmd = Node::children();
        cmd.push("Total", Node::leaf(""));
        cmd.push("Offset", Node::leaf(encode::s32(0, 0)));
        cmd.push("Ln", Node::leaf(""));
        cmd.push("RepeatCnt", Node::leaf(""));
        cmd.push("Err", Node::leaf(""));
        self.request_list("Root/Host/GetPhone", cmd).await
    }

    /// `Root/Host/SetPhone`.
    pub async fn set_phone(&self, pos: i64, number: &str) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("Type", Node::leaf(encode::typ("F", 1)));
        cmd.push("Pos", Node::leaf(encode::s32(pos, 1)));
        cmd.push("Num", Node::leaf(encode::str_(number)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetPhone", cmd).await?;
        Ok(())
    }

    /// `Root/Host/SetOverlapZone`. The panel's own source writes `Zone1`
    /// twice and never sends `Zone2`; this writes all three fields it
    /// actually declares.
    pub async fn set_overlap_zone(&self, pos: i64, zone1: i64, zone2: i64, time: i64) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("Pos", Node::leaf(encode::s32(pos, 1)));
        cmd.push("Zone1", Node::leaf(encode::s32(zone1, 1)));
        cmd.push("Zone2", Node::leaf(encode::s32(zone2, 1)));
        cmd.push("Time", Node::leaf(encode::s32(time, 1)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetOverlapZone", cmd).await?;
        Ok(())
    }

    /// `Root/Host/GetSys`.
    pub async fn get_sys(&self) -> Result<SysConfig> {
        let mut cmd = Node::children();
        for field in [
            "InDelay", "OutDelay", "AlarmTime", "WlLoss", "AcLoss", "ComLoss", "ArmVoice", "ArmReport", "ForceArm",
            "DoorCheck", "BreakCheck", "AlarmLimit",
        ] {
            cmd.push(field, Node::leaf(""));
        }
        cmd.push("Err", Node::leaf(""));
        let resp = self.request("Root/Host/GetSys", cmd).await?;
        Ok(SysConfig {
            in_delay: signed(&resp, "InDelay")?,
            out_delay: signed(&resp, "OutDelay")?,
            alarm_time: signed(&resp, "AlarmTime")?,
            wl_loss: signed(&resp, "WlLoss")?,
            ac_loss: signed(&resp, "AcLoss")?,
            com_loss: signed(&resp, "ComLoss")?,
            arm_voice: boolean(&resp, "ArmVoice")?,
            arm_report: boolean(&resp, "ArmReport")?,
            force_arm: boolean(&resp, "ForceArm")?,
            door_check: boolean(&resp, "DoorCheck")?,
            break_check: boolean(&resp, "BreakCheck")?,
            alarm_limit: boolean(&resp, "AlarmLimit")?,
        })
    }

    /// `Root/Host/GetTime`.
    pub async fn get_time(&self) -> Result<PanelTime> {
        let mut cmd = Node::children();
        for field in ["En", "Name", "Type", "Time", "Dst"] {
            cmd.push(field, Node::leaf(""));
        }
        cmd.push("Err", Node::leaf(""));
        let resp = self.request("Root/Host/GetTime", cmd).await?;
        let zone_raw = leaf(&resp, "Type").ok_or_else(|| Error::Protocol("missing Type".into()))?;
        let zone_ordinal = match crate::codec::scalar::decode_leaf(zone_raw) {
            Some(Scalar::Typ(ord)) => ord,
            _ => return Err(Error::Protocol(format!("Type is not a TYP scalar: {zone_raw}"))),
        };
        Ok(PanelTime {
            enabled: boolean(&resp, "En")?,
            name: leaf(&resp, "Name").unwrap_or_default().to_string(),
            zone_ordinal,
            time: datetime(&resp, "Time")?,
            dst: boolean(&resp, "Dst")?,
        })
    }

    /// `Root/Host/SetTime`.
    pub async fn set_time(&self, time: &PanelTime) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("En", Node::leaf(encode::bol(time.enabled)));
        cmd.push("Name", Node::leaf(encode::str_(&time.name)));
        cmd.push("Type", Node::leaf(encode::typ("0", time.zone_ordinal)));
        cmd.push("Time", Node::leaf(encode::dta(&time.time)));
        cmd.push("Dst", Node::leaf(encode::bol(time.dst)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetTime", cmd).await?;
        Ok(())
    }

    /// `Root/Host/SetSys`. The panel's own source shadows its `com_loss`
    /// parameter with an undefined local (`comloss`); this passes the
    /// caller's value straight through.
    pub async fn set_sys(&self, config: &SysConfig) -> Result<()> {
        let mut cmd = Node::children();
        cmd.push("InDelay", Node::leaf(encode::s32(config.in_delay, 1)));
        cmd.push("OutDelay", Node::leaf(encode::s32(config.out_delay, 1)));
        cmd.push("AlarmTime", Node::leaf(encode::s32(config.alarm_time, 1)));
        cmd.push("WlLoss", Node::leaf(encode::s32(config.wl_loss, 1)));
        cmd.push("AcLoss", Node::leaf(encode::s32(config.ac_loss, 1)));
        cmd.push("ComLoss", Node::leaf(encode::s32(config.com_loss, 1)));
        cmd.push("ArmVoice", Node::leaf(encode::bol(config.arm_voice)));
        cmd.push("ArmReport", Node::leaf(encode::bol(config.arm_report)));
        cmd.push("ForceArm", Node::leaf(encode::bol(config.force_arm)));
        cmd.push("DoorCheck", Node::leaf(encode::bol(config.door_check)));
        cmd.push("BreakCheck", Node::leaf(encode::bol(config.break_check)));
        cmd.push("AlarmLimit", Node::leaf(encode::bol(config.alarm_limit)));
        cmd.push("Err", Node::leaf(""));
        self.request("Root/Host/SetSys", cmd).await?;
        Ok(())
    }
}
