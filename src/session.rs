//! Transport session: one socket, strict half-duplex request/response.
//!
//! A [`Session`] owns exactly one transport and moves through
//! `Disconnected -> Connecting -> Connected -> (Disconnected | Faulted)`.
//! The protocol has no request ids, so there is never more than one
//! request in flight; the `&mut self` receiver on
//! [`send_and_receive`](Session::send_and_receive) makes pipelining
//! unrepresentable rather than merely forbidden.
//!
//! A response may arrive over any number of socket reads; the session
//! feeds each read into a [`FrameBuffer`] until one frame decodes. Each
//! read is bounded by the profile's read deadline. The legacy stack
//! would hang forever on a dead server; that is treated here as a bug,
//! not a contract.

use std::time::Duration;

use tracing::{debug, trace};

use crate::codec::WireEncoding;
use crate::error::{MvWireError, Result};
use crate::profile::ConnectionProfile;
use crate::protocol::{encode_frame, FrameBuffer, ProtocolDialect};
use crate::transport::{TcpTransport, Transport};

/// Size of each socket read while assembling a response.
const READ_CHUNK: usize = 8 * 1024;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No live socket.
    Disconnected,
    /// Socket opened, grace period not yet passed.
    Connecting,
    /// Ready for requests.
    Connected,
    /// A transport or logon failure occurred; all further operations
    /// fail fast without touching the socket.
    Faulted,
}

/// One live connection to an MV host.
#[derive(Debug)]
pub struct Session<T: Transport> {
    transport: T,
    state: SessionState,
    dialect: ProtocolDialect,
    encoding: WireEncoding,
    read_timeout: Option<Duration>,
    recv: FrameBuffer,
}

impl Session<TcpTransport> {
    /// Connect a database-protocol session per the profile.
    ///
    /// Opens the TCP socket, waits the configured post-connect grace
    /// period (the server historically drops early connections), then
    /// verifies the socket survived.
    pub async fn connect(profile: &ConnectionProfile) -> Result<Self> {
        Self::connect_dialect(profile, ProtocolDialect::Database).await
    }

    /// Connect a gateway-protocol session per the profile.
    pub async fn connect_gateway(profile: &ConnectionProfile) -> Result<Self> {
        Self::connect_dialect(profile, ProtocolDialect::Gateway).await
    }

    async fn connect_dialect(
        profile: &ConnectionProfile,
        dialect: ProtocolDialect,
    ) -> Result<Self> {
        let transport =
            TcpTransport::connect(&profile.host, profile.port, profile.connect_timeout()).await?;
        let mut session = Session {
            transport,
            state: SessionState::Connecting,
            dialect,
            encoding: profile.encoding,
            read_timeout: profile.read_timeout(),
            recv: FrameBuffer::new(dialect, profile.encoding),
        };
        tokio::time::sleep(profile.connect_grace()).await;
        session.transport.verify_alive()?;
        session.state = SessionState::Connected;
        debug!(
            host = %profile.host,
            port = profile.port,
            ?dialect,
            "session connected"
        );
        Ok(session)
    }
}

impl<T: Transport> Session<T> {
    /// Wrap an already-connected transport.
    ///
    /// This is how tests run sessions over in-memory pipes, and how a
    /// caller with its own socket setup hands one over.
    pub fn over(
        transport: T,
        dialect: ProtocolDialect,
        encoding: WireEncoding,
        read_timeout: Option<Duration>,
    ) -> Self {
        Session {
            transport,
            state: SessionState::Connected,
            dialect,
            encoding,
            read_timeout,
            recv: FrameBuffer::new(dialect, encoding),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Dialect this session speaks.
    pub fn dialect(&self) -> ProtocolDialect {
        self.dialect
    }

    /// Wire encoding this session uses.
    pub fn encoding(&self) -> WireEncoding {
        self.encoding
    }

    /// Mark the session unusable. Subsequent operations fail fast.
    pub(crate) fn fault(&mut self) {
        self.state = SessionState::Faulted;
    }

    /// Send one framed request and block until the complete response
    /// frame is reassembled.
    ///
    /// Any transport-level failure (write error, read error, peer close,
    /// deadline expiry, framing violation) faults the session: a
    /// partially delivered frame cannot be safely replayed, so there is
    /// no automatic retry.
    pub async fn send_and_receive(&mut self, tag: &str, args: &[&str]) -> Result<String> {
        if self.state != SessionState::Connected {
            return Err(MvWireError::Connect(format!(
                "session is {:?}; open a fresh session",
                self.state
            )));
        }

        let frame = encode_frame(self.dialect, self.encoding, tag, args)?;
        trace!(tag, frame_bytes = frame.len(), "sending request");
        if let Err(e) = self.transport.write_all(&frame).await {
            self.fault();
            return Err(e);
        }

        let mut buf = vec![0u8; READ_CHUNK];
        loop {
            let read = if let Some(deadline) = self.read_timeout {
                match tokio::time::timeout(deadline, self.transport.read_some(&mut buf)).await {
                    Ok(result) => result,
                    Err(_) => {
                        self.fault();
                        return Err(MvWireError::ConnectionLost(format!(
                            "no response within {deadline:?}"
                        )));
                    }
                }
            } else {
                self.transport.read_some(&mut buf).await
            };

            let n = match read {
                Ok(n) => n,
                Err(e) => {
                    self.fault();
                    return Err(e);
                }
            };
            if n == 0 {
                self.fault();
                return Err(MvWireError::ConnectionLost(
                    "socket closed before the response frame completed".to_string(),
                ));
            }

            match self.recv.push(&buf[..n]) {
                Ok(Some(payload)) => {
                    trace!(chars = payload.chars().count(), "response complete");
                    return Ok(payload);
                }
                Ok(None) => continue,
                Err(e) => {
                    self.fault();
                    return Err(e);
                }
            }
        }
    }

    /// Close the socket. Idempotent; a faulted session can still be
    /// disconnected to release the socket.
    pub async fn disconnect(&mut self) -> Result<()> {
        if self.state == SessionState::Disconnected {
            return Ok(());
        }
        self.transport.close().await?;
        self.state = SessionState::Disconnected;
        debug!("session disconnected");
        Ok(())
    }
}
