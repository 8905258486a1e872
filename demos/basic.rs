// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::ToSocketAddrs;

use anyhow::{Context, Result};
use meian_client_rs::cfg::{cli::resolve_config_path, config::Config, logger::init_logger};
use meian_client_rs::command::AlarmStatus;
use meian_client_rs::{CommandSession, PushSession};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = resolve_config_path("demos/config.example.yaml")
        .and_then(Config::load_from_file)
        .context("failed to resolve or load config")?;

    let _guard = init_logger(&cfg.logger)?;

    let addr = (cfg.control.host.as_str(), cfg.control.port)
        .to_socket_addrs()
        .context("resolving control address")?
        .next()
        .context("control address resolved to nothing")?;

    let session = CommandSession::open(addr, &cfg.control.uid, &cfg.control.password, cfg.control.timeout)
        .await
        .context("login failed")?;
    info!("logged in to {}", cfg.control.host);

    let status = session.get_alarm_status().await.context("GetAlarmStatus failed")?;
    info!(?status, "current alarm status");

    let zones = session.get_zone().await.context("GetZone failed")?;
    info!(count = zones.len(), "zones reported");

    if matches!(status, AlarmStatus::Disarm) {
        session.set_alarm_status(AlarmStatus::Arm).await.context("SetAlarmStatus failed")?;
        info!("armed");
    }

    session.close().await;

    if let Some(push_cfg) = &cfg.push {
        let push_addr = (push_cfg.host.as_str(), push_cfg.port)
            .to_socket_addrs()
            .context("resolving push address")?
            .next()
            .context("push address resolved to nothing")?;

        let push = PushSession::open(push_addr, &push_cfg.uid, push_cfg.timeout, push_cfg.keepalive, |event| {
            let cid = event.get("Cid").and_then(meian_client_rs::codec::Node::as_leaf).unwrap_or("");
            info!(cid, "alarm event received");
            Ok(())
        })
        .await
        .context("push subscription failed")?;

        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        push.close().await;
    }

    Ok(())
}
