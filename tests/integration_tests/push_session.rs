// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use meian_client_rs::codec::frame::{self, Magic, HEADER_LEN};
use meian_client_rs::codec::tree::{wrap_path, Node};
use meian_client_rs::codec::xml;
use meian_client_rs::PushSession;
use serial_test::serial;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

async fn start_mock_push_server() -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await.expect("read subscribe header");
        let total = frame::declared_frame_len(&header).expect("declared len").expect("framed");
        let mut rest = vec![0u8; total - HEADER_LEN];
        stream.read_exact(&mut rest).await.expect("read subscribe body");

        let mut ack = Node::children();
        ack.push("Err", Node::leaf("ERR|00"));
        let ack = wrap_path("Root/Pair/Push", ack);
        let ack_xml = xml::to_xml_bytes(&ack).expect("serialize ack");
        let wire = frame::encode(Magic::Command, 0, &ack_xml);
        stream.write_all(&wire).await.expect("write ack");

        let mut alarm = Node::children();
        alarm.push("Cid", Node::leaf("STR,4|1132"));
        let alarm = wrap_path("Root/Host/Alarm", alarm);
        let alarm_xml = xml::to_xml_bytes(&alarm).expect("serialize alarm");
        let wire = frame::encode(Magic::Alarm, 0, &alarm_xml);
        stream.write_all(&wire).await.expect("write alarm");

        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    Ok(addr)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn subscribes_and_dispatches_one_alarm() -> Result<()> {
    let addr = start_mock_push_server().await?;

    let received: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let received_in_handler = received.clone();

    let session = PushSession::open(
        addr,
        "android-push",
        Duration::from_secs(5),
        Duration::from_secs(30),
        move |event: Node| {
            let cid = event.get("Cid").and_then(Node::as_leaf).unwrap_or("").to_string();
            received_in_handler.lock().expect("lock").push(cid);
            Ok(())
        },
    )
    .await?;

    tokio::time::sleep(Duration::from_millis(300)).await;
    session.close().await;

    assert_eq!(received.lock().expect("lock").as_slice(), ["STR,4|1132"]);
    Ok(())
}

/// Grounds SPEC_FULL §4.3: a read timeout on an otherwise idle socket must
/// not be treated as fatal, and the keepalive timer must still fire on
/// schedule regardless of how many read timeouts elapsed while waiting for
/// it.
async fn start_mock_quiet_server() -> Result<(SocketAddr, Arc<Mutex<Vec<u8>>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let received: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(Vec::new()));
    let received_in_server = received.clone();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await.expect("read subscribe header");
        let total = frame::declared_frame_len(&header).expect("declared len").expect("framed");
        let mut rest = vec![0u8; total - HEADER_LEN];
        stream.read_exact(&mut rest).await.expect("read subscribe body");

        let mut ack = Node::children();
        ack.push("Err", Node::leaf("ERR|00"));
        let ack = wrap_path("Root/Pair/Push", ack);
        let ack_xml = xml::to_xml_bytes(&ack).expect("serialize ack");
        let wire = frame::encode(Magic::Command, 0, &ack_xml);
        stream.write_all(&wire).await.expect("write ack");

        // Send nothing back: the client must outlast its own read timeout
        // on a quiet socket and still emit a keepalive unprompted.
        let mut keepalive = [0u8; 4];
        stream.read_exact(&mut keepalive).await.expect("read keepalive");
        received_in_server.lock().expect("lock").extend_from_slice(&keepalive);

        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    Ok((addr, received))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
#[serial]
async fn survives_read_timeout_and_emits_keepalive() -> Result<()> {
    let (addr, received) = start_mock_quiet_server().await?;

    // io_timeout is deliberately much shorter than keepalive_interval, so
    // several read timeouts must elapse on the idle socket before the
    // keepalive fires — exactly the scenario that used to kill the loop.
    let io_timeout = Duration::from_millis(150);
    let keepalive_interval = Duration::from_millis(500);

    let session =
        PushSession::open(addr, "android-push", io_timeout, keepalive_interval, |_event: Node| Ok(())).await?;

    tokio::time::sleep(Duration::from_millis(900)).await;

    assert_eq!(received.lock().expect("lock").as_slice(), b"%maI");

    // The loop must still be alive and closeable, not already dead from a
    // spurious read-timeout error.
    session.close().await;
    Ok(())
}
