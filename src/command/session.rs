// SPDX-License-Identifier: MIT OR Apache-2.0

//! The command client: a single in-flight request/response session over a
//! framed TCP connection, plus the iterative paginated-list helper.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::frame::{self, Magic, HEADER_LEN};
use crate::codec::scalar::{decode_leaf, Scalar};
use crate::codec::tree::{wrap_path, Node};
use crate::codec::xml;
use crate::error::{Error, Result};

/// Everything that must move together behind the single-in-flight mutex:
/// the socket and the sequence counter. Request/response pairs hold this
/// lock for their entire round trip, which is what makes "one outstanding
/// request per session" true without a separate scheduler.
struct SessionState {
    stream: TcpStream,
    seq: u32,
}

/// An authenticated session against a panel's command port.
pub struct CommandSession {
    state: Mutex<SessionState>,
    io_timeout: Duration,
    cancel: CancellationToken,
}

async fn io_with_timeout<F, T>(label: &'static str, fut: F, io_timeout: Duration, cancel: &CancellationToken) -> Result<T>
where
    F: std::future::Future<Output = std::io::Result<T>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Connection(std::io::Error::other(format!("{label} cancelled")))),
        res = timeout(io_timeout, fut) => match res {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(Error::Connection(e)),
            Err(_) => Err(Error::Timeout),
        },
    }
}

fn err_leaf(resp: &Node, xpath: &str) -> Option<u8> {
    let raw = resp.select(&format!("{xpath}/Err")).and_then(Node::as_leaf)?;
    match decode_leaf(raw) {
        Some(Scalar::Err(code)) => Some(code),
        _ => None,
    }
}

impl CommandSession {
    /// Connect and perform the login exchange. `uid` identifies this
    /// client to the panel; `pwd` is the panel's shared access code.
    pub async fn open(addr: SocketAddr, uid: &str, pwd: &str, io_timeout: Duration) -> Result<Self> {
        let stream = timeout(io_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::Timeout)??;
        stream.set_nodelay(true)?;

        let session = Self {
            state: Mutex::new(SessionState { stream, seq: 0 }),
            io_timeout,
            cancel: CancellationToken::new(),
        };

        let xpath = "Root/Pair/Client";
        let mut cmd = Node::children();
        cmd.push("Id", Node::leaf(crate::codec::scalar::encode::str_(uid)));
        cmd.push("Pwd", Node::leaf(crate::codec::scalar::encode::pwd(pwd)));
        cmd.push("Type", Node::leaf("TYP,ANDROID|0"));
        cmd.push("Token", Node::leaf(crate::codec::scalar::encode::str_(&uuid::Uuid::new_v4().to_string())));
        cmd.push("Action", Node::leaf("TYP,IN|0"));
        cmd.push("Err", Node::leaf(""));

        let resp = session.exchange(xpath, cmd).await?;
        if let Some(code) = err_leaf(&resp, xpath) {
            if code != 0 {
                return Err(Error::Login { code });
            }
        }
        Ok(session)
    }

    /// Idempotent close: cancels any in-flight I/O and shuts the socket
    /// down. Safe to call more than once.
    pub async fn close(&self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        let mut guard = self.state.lock().await;
        let _ = guard.stream.shutdown().await;
    }

    /// Send `cmd` wrapped at `xpath` and return the decoded response
    /// subtree rooted at the same path. This is the escape hatch for any
    /// endpoint not covered by a named method on this type.
    pub async fn request(&self, xpath: &str, cmd: Node) -> Result<Node> {
        let resp = self.exchange(xpath, cmd).await?;
        if let Some(code) = err_leaf(&resp, xpath) {
            if code != 0 {
                return Err(Error::Panel { code });
            }
        }
        resp.select(xpath).cloned().ok_or_else(|| Error::Protocol(format!("response missing {xpath}")))
    }

    /// Drive the `Total`/`Offset`/`Ln` pagination protocol to completion,
    /// returning every `L<i>` item across all pages. Loops rather than
    /// recurses; guards against a panel that reports `Ln == 0` while more
    /// items remain declared.
    pub async fn request_list(&self, xpath: &str, mut cmd: Node) -> Result<Vec<Node>> {
        let mut items = Vec::new();
        let mut offset: i64 = 0;

        loop {
            if offset > 0 {
                set_child(&mut cmd, "Offset", Node::leaf(crate::codec::scalar::encode::s32(offset, 0)));
            }
            let resp = self.exchange(xpath, cmd.clone()).await?;
            if let Some(code) = err_leaf(&resp, xpath) {
                if code != 0 {
                    return Err(Error::Panel { code });
                }
            }

            let total = read_s32(&resp, xpath, "Total")?;
            let ln = read_s32(&resp, xpath, "Ln")?;

            if ln == 0 && offset < total {
                return Err(Error::Protocol(format!(
                    "{xpath}: panel reported Ln=0 with offset {offset} < Total {total}"
                )));
            }

            for i in 0..ln {
                let item_path = format!("{xpath}/L{i}");
                if let Some(item) = resp.select(&item_path) {
                    items.push(item.clone());
                }
            }

            offset += ln;
            if offset >= total {
                break;
            }
        }

        Ok(items)
    }

    /// Write the framed request and read back the matching framed
    /// response, holding the session mutex for the whole round trip.
    async fn exchange(&self, xpath: &str, cmd: Node) -> Result<Node> {
        let mut guard = self.state.lock().await;
        guard.seq += 1;
        let seq = guard.seq;

        let root = wrap_path(xpath, cmd);
        let xml_bytes = xml::to_xml_bytes(&root)?;
        let wire = frame::encode(Magic::Command, seq, &xml_bytes);

        debug!(seq, xpath, "sending command frame");
        io_with_timeout("write request", guard.stream.write_all(&wire), self.io_timeout, &self.cancel).await?;

        let mut header = [0u8; HEADER_LEN];
        io_with_timeout("read header", guard.stream.read_exact(&mut header), self.io_timeout, &self.cancel).await?;
        let remaining = frame::declared_frame_len(&header)?
            .ok_or_else(|| Error::Frame("command response carried no body".into()))?
            - HEADER_LEN;

        let mut rest = vec![0u8; remaining];
        io_with_timeout("read body", guard.stream.read_exact(&mut rest), self.io_timeout, &self.cancel).await?;

        let mut full = Vec::with_capacity(HEADER_LEN + remaining);
        full.extend_from_slice(&header);
        full.extend_from_slice(&rest);
        let frame = frame::decode(&full)?;

        if frame.seq != seq {
            return Err(Error::Frame(format!("response seq {} does not match request seq {seq}", frame.seq)));
        }

        xml::from_xml_bytes(&frame.body)
    }
}

fn set_child(node: &mut Node, name: &str, value: Node) {
    if let Node::Children(kids) = node {
        if let Some(slot) = kids.iter_mut().find(|(k, _)| k == name) {
            slot.1 = value;
            return;
        }
        kids.push((name.to_string(), value));
    }
}

fn read_s32(resp: &Node, xpath: &str, field: &str) -> Result<i64> {
    let path = format!("{xpath}/{field}");
    let raw = resp
        .select(&path)
        .and_then(Node::as_leaf)
        .ok_or_else(|| Error::Protocol(format!("response missing {path}")))?;
    match decode_leaf(raw) {
        Some(Scalar::Signed(v)) => Ok(v),
        _ => Err(Error::Protocol(format!("{path} is not a signed scalar: {raw}"))),
    }
}
