//! # mvwire-client
//!
//! Async Rust client for the MultiValue database socket protocol: the
//! length-prefixed, delimiter-separated request/response scheme MV hosts
//! expose for editor tooling.
//!
//! ## Architecture
//!
//! - **Protocol** ([`protocol`]): decimal length headers (10 digits for
//!   the database dialect, 6 for the gateway), 0x01-separated payload
//!   fields, and a reassembly buffer that counts decoded *characters*
//!   against the declared length
//! - **Session** ([`Session`]): one exclusively owned socket, strictly
//!   half-duplex; a request blocks until its complete response frame is
//!   reassembled
//! - **Channels** ([`channel::DatabaseChannel`],
//!   [`gateway::GatewayChannel`]): typed operations (logon, execute,
//!   file read/write, select lists) with strict positional reply parsing
//! - **Codec** ([`codec`]): the ISO-8859-1/UTF-8 wire encodings and the
//!   AM/VM/SVM/TM dynamic array format
//!
//! ## Example
//!
//! ```ignore
//! use mvwire_client::channel::DatabaseChannel;
//! use mvwire_client::profile::ConnectionProfile;
//! use mvwire_client::Session;
//!
//! #[tokio::main]
//! async fn main() -> mvwire_client::Result<()> {
//!     let profile = ConnectionProfile::from_json_str(include_str!("profile.json"))?;
//!     let session = Session::connect(&profile).await?;
//!     let mut channel = DatabaseChannel::new(session);
//!     channel.logon(&profile.credentials).await?;
//!
//!     let result = channel.execute("LIST VOC", 5000).await?;
//!     print!("{}", result.delivered_text);
//!     channel.logoff().await
//! }
//! ```

pub mod channel;
pub mod codec;
pub mod error;
pub mod gateway;
pub mod profile;
pub mod protocol;
pub mod session;
pub mod transport;

pub use channel::DatabaseChannel;
pub use error::{MvWireError, Result};
pub use gateway::GatewayChannel;
pub use session::{Session, SessionState};
