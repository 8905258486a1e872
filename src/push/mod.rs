// SPDX-License-Identifier: MIT OR Apache-2.0

//! The push client: a single background task that subscribes to
//! unsolicited alarm events and keeps the connection alive.

use std::net::SocketAddr;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::codec::frame::{self, Magic, HEADER_LEN};
use crate::codec::scalar::{decode_leaf, Scalar};
use crate::codec::tree::{wrap_path, Node};
use crate::codec::xml;
use crate::error::{Error, Result};

/// A decoded `Root/Host/Alarm` subtree, handed to [`AlarmHandler`] as-is —
/// the panel's alarm payload shape varies by firmware, so no attempt is
/// made to project it onto a fixed struct. See [`crate::contact_id`] for
/// translating its `Cid` field into a human-readable description.
pub type AlarmEvent = Node;

/// Callback invoked serially, once per unsolicited alarm frame.
#[async_trait]
pub trait AlarmHandler: Send + Sync {
    async fn handle(&self, event: AlarmEvent) -> anyhow::Result<()>;
}

#[async_trait]
impl<F> AlarmHandler for F
where
    F: Fn(AlarmEvent) -> anyhow::Result<()> + Send + Sync,
{
    async fn handle(&self, event: AlarmEvent) -> anyhow::Result<()> {
        self(event)
    }
}

/// Default keepalive cadence when a caller doesn't override it via
/// [`crate::cfg::config::PushEndpoint::keepalive`].
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);
const KEEPALIVE_BYTES: &[u8; 4] = b"%maI";

/// A subscribed push connection. Owns its socket and keepalive deadline
/// inside a single task; `close()` is safe to call from any task and more
/// than once.
pub struct PushSession {
    cancel: CancellationToken,
    task: tokio::task::JoinHandle<()>,
}

impl PushSession {
    /// Connect, subscribe with `uid`, and spawn the event loop. `handler`
    /// is invoked for every alarm frame, one at a time, in arrival order.
    /// `keepalive_interval` is the period of the outbound `%maI` timer;
    /// production callers should pass `PushEndpoint::keepalive`.
    pub async fn open<H>(
        addr: SocketAddr,
        uid: &str,
        io_timeout: Duration,
        keepalive_interval: Duration,
        handler: H,
    ) -> Result<Self>
    where
        H: AlarmHandler + 'static,
    {
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let xpath = "Root/Pair/Push";
        let mut cmd = Node::children();
        cmd.push("Id", Node::leaf(crate::codec::scalar::encode::str_(uid)));
        cmd.push("Err", Node::leaf(""));
        let root = wrap_path(xpath, cmd);
        let xml_bytes = xml::to_xml_bytes(&root)?;
        let wire = frame::encode(Magic::Command, 0, &xml_bytes);
        stream.write_all(&wire).await?;

        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let handler = Box::new(handler);

        let task = tokio::spawn(async move {
            if let Err(e) =
                run(stream, xpath.to_string(), io_timeout, keepalive_interval, task_cancel.clone(), handler).await
            {
                if !task_cancel.is_cancelled() {
                    warn!("push event loop exited: {e}");
                }
            }
        });

        Ok(Self { cancel, task })
    }

    /// Idempotent close: cancels the event loop and waits for the task to
    /// finish tearing down the socket.
    pub async fn close(self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        let _ = self.task.await;
    }
}

async fn run(
    mut stream: TcpStream,
    xpath: String,
    io_timeout: Duration,
    keepalive_interval: Duration,
    cancel: CancellationToken,
    handler: Box<dyn AlarmHandler>,
) -> Result<()> {
    let mut subscribed = false;
    let mut deadline = Instant::now() + keepalive_interval;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                let _ = stream.shutdown().await;
                return Ok(());
            }
            _ = time::sleep_until(deadline) => {
                stream.write_all(KEEPALIVE_BYTES).await?;
                deadline = Instant::now() + keepalive_interval;
            }
            header = read_header(&mut stream, io_timeout, &cancel) => {
                // The read timeout only bounds how long we poll the socket
                // before checking the keepalive deadline again; silence on
                // the wire is normal and must not tear the session down.
                let header = match header {
                    Ok(header) => header,
                    Err(Error::Timeout) => continue,
                    Err(e) => return Err(e),
                };
                if &header[0..4] == KEEPALIVE_BYTES.as_slice() {
                    deadline = Instant::now() + keepalive_interval;
                    continue;
                }

                let total = frame::declared_frame_len(&header)?
                    .ok_or_else(|| Error::Frame("push frame declared no body".into()))?;
                let mut rest = vec![0u8; total - HEADER_LEN];
                read_exact_timeout(&mut stream, &mut rest, io_timeout, &cancel).await?;

                let mut full = Vec::with_capacity(total);
                full.extend_from_slice(&header);
                full.extend_from_slice(&rest);
                let frame = frame::decode(&full)?;

                match frame.magic {
                    Magic::Command if !subscribed => {
                        let resp = xml::from_xml_bytes(&frame.body)?;
                        let err = resp
                            .select(&format!("{xpath}/Err"))
                            .and_then(Node::as_leaf)
                            .and_then(decode_leaf);
                        if let Some(Scalar::Err(code)) = err {
                            if code != 0 {
                                return Err(Error::PushSubscription { code });
                            }
                        }
                        subscribed = true;
                        debug!("push subscription acknowledged");
                    }
                    Magic::Command => {
                        return Err(Error::PushSubscription { code: 0 });
                    }
                    Magic::Alarm => {
                        let resp = xml::from_xml_bytes(&frame.body)?;
                        let event = resp.select("Root/Host/Alarm").cloned().unwrap_or(resp);
                        handler.handle(event).await.map_err(Error::Handler)?;
                    }
                    Magic::Keepalive => {}
                }
            }
        }
    }
}

async fn read_header(stream: &mut TcpStream, io_timeout: Duration, cancel: &CancellationToken) -> Result<[u8; HEADER_LEN]> {
    // The keepalive magic has no header/body/trailer at all — read just
    // its 4 bytes and pad so the caller can branch on the magic uniformly.
    let mut probe = [0u8; 4];
    read_exact_timeout(stream, &mut probe, io_timeout, cancel).await?;
    if &probe == KEEPALIVE_BYTES {
        let mut header = [0u8; HEADER_LEN];
        header[0..4].copy_from_slice(&probe);
        return Ok(header);
    }
    let mut header = [0u8; HEADER_LEN];
    header[0..4].copy_from_slice(&probe);
    read_exact_timeout(stream, &mut header[4..], io_timeout, cancel).await?;
    Ok(header)
}

async fn read_exact_timeout(stream: &mut TcpStream, buf: &mut [u8], io_timeout: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(Error::Connection(std::io::Error::other("read cancelled"))),
        res = time::timeout(io_timeout, stream.read_exact(buf)) => match res {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(Error::Connection(e)),
            Err(_) => Err(Error::Timeout),
        },
    }
}
