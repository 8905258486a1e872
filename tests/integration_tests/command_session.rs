// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use anyhow::Result;
use meian_client_rs::codec::tree::{wrap_path, Node};
use meian_client_rs::command::AlarmStatus;
use meian_client_rs::CommandSession;
use serial_test::serial;

use crate::integration_tests::common::{login_ack, start_mock_command_server};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn login_and_get_alarm_status() -> Result<()> {
    let mut status_resp = Node::children();
    status_resp.push("DevStatus", Node::leaf("TYP,ARM|0"));
    status_resp.push("Err", Node::leaf("ERR|00"));
    let status_resp = wrap_path("Root/Host/GetAlarmStatus", status_resp);

    let addr = start_mock_command_server(vec![login_ack(), status_resp]).await?;

    let session = CommandSession::open(addr, "android-client", "1234", Duration::from_secs(5)).await?;
    let status = session.get_alarm_status().await?;
    assert_eq!(status, AlarmStatus::Arm);

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn paginated_list_collects_every_item() -> Result<()> {
    let mut page = Node::children();
    page.push("Total", Node::leaf("S32,0,0|2"));
    page.push("Offset", Node::leaf("S32,0,0|0"));
    page.push("Ln", Node::leaf("S32,0,0|2"));
    page.push("L0", Node::leaf("STR,4|Home"));
    page.push("L1", Node::leaf("STR,4|Away"));
    page.push("Err", Node::leaf("ERR|00"));
    let page = wrap_path("Root/Host/GetSensor", page);

    let addr = start_mock_command_server(vec![login_ack(), page]).await?;

    let session = CommandSession::open(addr, "android-client", "1234", Duration::from_secs(5)).await?;
    let items = session.get_sensor().await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_leaf(), Some("STR,4|Home"));
    assert_eq!(items[1].as_leaf(), Some("STR,4|Away"));

    session.close().await;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn login_error_is_rejected() -> Result<()> {
    let mut client = Node::children();
    client.push("Err", Node::leaf("ERR|01"));
    let mut pair = Node::children();
    pair.push("Client", client);
    let mut root = Node::children();
    root.push("Pair", pair);
    let mut bad_login = Node::children();
    bad_login.push("Root", root);

    let addr = start_mock_command_server(vec![bad_login]).await?;

    let result = CommandSession::open(addr, "android-client", "wrong", Duration::from_secs(5)).await;
    assert!(result.is_err());
    Ok(())
}
