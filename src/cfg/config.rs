// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Config {
    /// Command-channel endpoint and login credentials.
    pub control: PanelEndpoint,
    /// Optional push-channel endpoint for unsolicited alarm events.
    #[serde(default)]
    pub push: Option<PushEndpoint>,
    /// Logging configuration.
    pub logger: LoggerSection,
}

/// Connection parameters for the command (login + request/response) port.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PanelEndpoint {
    #[serde(rename = "Host")]
    /// Panel hostname or IP literal.
    pub host: String,

    #[serde(rename = "Port", default = "default_control_port")]
    /// TCP port for the command channel. Example default: 18034.
    pub port: u16,

    #[serde(rename = "Id")]
    /// Client identifier presented during login.
    pub uid: String,

    #[serde(rename = "Password")]
    /// Shared panel access code. Never logged or displayed.
    pub password: String,

    #[serde(rename = "Timeout", with = "serde_secs", default = "default_io_timeout")]
    /// Per-operation I/O timeout.
    pub timeout: Duration,
}

fn default_control_port() -> u16 {
    18034
}

fn default_io_timeout() -> Duration {
    Duration::from_secs(10)
}

/// Connection parameters for the push (unsolicited event) port.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PushEndpoint {
    #[serde(rename = "Host")]
    pub host: String,

    #[serde(rename = "Port", default = "default_control_port")]
    pub port: u16,

    #[serde(rename = "Id")]
    /// Client identifier presented during push subscription.
    pub uid: String,

    #[serde(rename = "Timeout", with = "serde_secs", default = "default_io_timeout")]
    pub timeout: Duration,

    #[serde(rename = "Keepalive", with = "serde_secs", default = "default_keepalive")]
    /// Period of the outbound `%maI` keepalive timer.
    pub keepalive: Duration,
}

fn default_keepalive() -> Duration {
    crate::push::DEFAULT_KEEPALIVE_INTERVAL
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoggerSection {
    /// `trace`/`debug`/`info`/`warn`/`error`, or an `EnvFilter` directive.
    pub level: String,
    /// `stdout`, `stderr`, or `file`.
    pub output: LogOutput,
    #[serde(default)]
    pub file: Option<LogFileConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    Stdout,
    Stderr,
    File,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LogFileConfig {
    pub path: String,
    #[serde(default)]
    pub rotation: Option<LogRotation>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

impl Config {
    /// Loads the configuration from YAML, validates it, and returns the
    /// ready-to-use value.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        let mut cfg: Config = serde_yaml::from_str(&s).context("failed to parse config YAML")?;
        cfg.validate_and_normalize()?;
        Ok(cfg)
    }

    /// Validates invariants the wire protocol assumes.
    pub fn validate_and_normalize(&mut self) -> Result<()> {
        ensure!(!self.control.host.is_empty(), "control.Host must not be empty");
        ensure!(!self.control.uid.is_empty(), "control.Id must not be empty");
        ensure!(!self.control.password.is_empty(), "control.Password must not be empty");

        if let Some(push) = &self.push {
            ensure!(!push.host.is_empty(), "push.Host must not be empty");
            ensure!(!push.uid.is_empty(), "push.Id must not be empty");
        }

        if let LogOutput::File = self.logger.output {
            ensure!(self.logger.file.is_some(), "logger.file is required when output=file");
        }

        Ok(())
    }
}

/// Serde helpers for representing `Duration` as a number of seconds.
mod serde_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(d)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            control: PanelEndpoint {
                host: "192.168.1.50".into(),
                port: 18034,
                uid: "android-client".into(),
                password: "secret".into(),
                timeout: Duration::from_secs(10),
            },
            push: None,
            logger: LoggerSection { level: "info".into(), output: LogOutput::Stdout, file: None },
        }
    }

    #[test]
    fn validates_happy_path() {
        let mut cfg = sample();
        assert!(cfg.validate_and_normalize().is_ok());
    }

    #[test]
    fn rejects_empty_host() {
        let mut cfg = sample();
        cfg.control.host.clear();
        assert!(cfg.validate_and_normalize().is_err());
    }

    #[test]
    fn rejects_file_output_without_file_config() {
        let mut cfg = sample();
        cfg.logger.output = LogOutput::File;
        assert!(cfg.validate_and_normalize().is_err());
    }
}
