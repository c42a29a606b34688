//! TCP transport for production sessions.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{MvWireError, Result};

use super::Transport;

/// A connected TCP socket, exclusively owned by one session.
#[derive(Debug)]
pub struct TcpTransport {
    stream: TcpStream,
    peer: String,
}

impl TcpTransport {
    /// Open a TCP connection to `host:port`, bounded by `connect_timeout`.
    pub async fn connect(host: &str, port: u16, connect_timeout: Duration) -> Result<Self> {
        let peer = format!("{host}:{port}");
        let stream = tokio::time::timeout(connect_timeout, TcpStream::connect(&peer))
            .await
            .map_err(|_| MvWireError::Connect(format!("connection to {peer} timed out")))?
            .map_err(|e| MvWireError::Connect(format!("connection to {peer} failed: {e}")))?;
        // Requests are small and latency-sensitive; never batch them.
        stream.set_nodelay(true)?;
        tracing::debug!(%peer, "tcp connected");
        Ok(Self { stream, peer })
    }

    /// Check that the socket survived the post-connect grace period.
    ///
    /// The server historically drops connections it is not ready for just
    /// after accept; a deferred error shows up here.
    pub fn verify_alive(&self) -> Result<()> {
        match self.stream.take_error() {
            Ok(None) => Ok(()),
            Ok(Some(e)) => Err(MvWireError::Connect(format!(
                "connection to {} died after connect: {e}",
                self.peer
            ))),
            Err(e) => Err(MvWireError::Connect(format!(
                "connection to {} is unusable: {e}",
                self.peer
            ))),
        }
    }

    /// The `host:port` this transport is connected to.
    pub fn peer(&self) -> &str {
        &self.peer
    }
}

impl Transport for TcpTransport {
    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        AsyncWriteExt::write_all(&mut self.stream, buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.stream.read(buf).await?)
    }

    async fn close(&mut self) -> Result<()> {
        // Shutdown on an already-closed socket is not an error worth
        // surfacing; disconnect must stay idempotent.
        let _ = self.stream.shutdown().await;
        Ok(())
    }
}
