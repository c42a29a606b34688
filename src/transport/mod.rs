//! Socket abstraction for sessions.
//!
//! A [`Transport`] is the raw byte pipe a session owns exclusively. The
//! trait exists so the session logic can be exercised against in-memory
//! pipes and scripted mocks; production sessions use [`TcpTransport`].

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use crate::error::Result;

mod tcp;

pub use tcp::TcpTransport;

/// Byte-level operations a session needs from its socket.
///
/// `read_some` returns the number of bytes read; `0` means the peer
/// closed the connection.
pub trait Transport: Send {
    /// Write the whole buffer.
    fn write_all(&mut self, buf: &[u8]) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Read whatever bytes are available, up to `buf.len()`.
    fn read_some(&mut self, buf: &mut [u8]) -> impl std::future::Future<Output = Result<usize>> + Send;

    /// Close the connection. Must be idempotent.
    fn close(&mut self) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// In-memory transport over a tokio duplex pipe.
///
/// Lets integration tests drive a whole session against a scripted peer
/// without a real socket.
impl Transport for DuplexStream {
    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        AsyncWriteExt::write_all(self, buf).await?;
        self.flush().await?;
        Ok(())
    }

    async fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        Ok(self.read(buf).await?)
    }

    async fn close(&mut self) -> Result<()> {
        let _ = self.shutdown().await;
        Ok(())
    }
}
