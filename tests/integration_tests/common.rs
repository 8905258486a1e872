// SPDX-License-Identifier: MIT OR Apache-2.0

use std::net::SocketAddr;

use anyhow::Result;
use meian_client_rs::codec::frame::{self, Magic, HEADER_LEN};
use meian_client_rs::codec::tree::Node;
use meian_client_rs::codec::xml;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Spawns a single-connection mock command server bound to an ephemeral
/// port. For every framed request it receives, it replies with the next
/// entry of `responses`, encoded at the same sequence number. Panics if
/// more requests arrive than responses were scripted.
pub async fn start_mock_command_server(responses: Vec<Node>) -> Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut responses = responses.into_iter();
        loop {
            let Ok(request) = read_frame(&mut stream).await else { return };
            let reply = responses.next().expect("no more scripted responses");
            let xml_bytes = xml::to_xml_bytes(&reply).expect("serialize scripted response");
            let wire = frame::encode(Magic::Command, request.seq, &xml_bytes);
            if stream.write_all(&wire).await.is_err() {
                return;
            }
        }
    });

    Ok(addr)
}

async fn read_frame(stream: &mut TcpStream) -> Result<frame::Frame> {
    let mut header = [0u8; HEADER_LEN];
    stream.read_exact(&mut header).await?;
    let total = frame::declared_frame_len(&header)?.ok_or_else(|| anyhow::anyhow!("bare keepalive unexpected here"))?;
    let mut rest = vec![0u8; total - HEADER_LEN];
    stream.read_exact(&mut rest).await?;
    let mut full = Vec::with_capacity(total);
    full.extend_from_slice(&header);
    full.extend_from_slice(&rest);
    Ok(frame::decode(&full)?)
}

/// Builds the standard successful login response tree for
/// `Root/Pair/Client`.
pub fn login_ack() -> Node {
    let mut client = Node::children();
    client.push("Err", Node::leaf("ERR|00"));
    let mut pair = Node::children();
    pair.push("Client", client);
    let mut root = Node::children();
    root.push("Pair", pair);
    let mut doc = Node::children();
    doc.push("Root", root);
    doc
}
