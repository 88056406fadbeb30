#![warn(clippy::future_not_send)]

//! Client-side library for the seedbox download manager.
//!
//! Provides the typed data model mirrored from the backend API, an HTTP
//! client for the manager's endpoints, and a reconnecting live-update
//! channel that keeps a local mirror of the torrent collection.
//!
//! ```no_run
//! use seedbox_client::{Seedbox, TorrentChannel, WsTransport};
//!
//! # async fn run() -> seedbox_client::Result<()> {
//! let api = Seedbox::builder()
//!     .endpoint("http://localhost:8080")
//!     .build();
//! let torrents = api.get_torrents().await?;
//!
//! let channel = TorrentChannel::spawn(
//!     "ws://localhost:8080/ws".parse().unwrap(),
//!     WsTransport,
//! );
//! channel.connect();
//! let mut snapshots = channel.snapshots();
//! while snapshots.changed().await.is_ok() {
//!     println!("{} torrents", snapshots.borrow().len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod channel;
mod client;
mod notify;
mod paths;
mod transport;

pub mod model;

pub use builder::SeedboxBuilder;
pub use channel::{retry_delay, ChannelEvent, ChannelState, TorrentChannel};
pub use client::Seedbox;
pub use model::*;
pub use notify::Notifications;
pub use paths::normalize_file_path;
pub use transport::{
    Connection, Frame, Transport, TransportError, WsTransport, ABNORMAL_CLOSURE, NORMAL_CLOSURE,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned unknown status code: {0}")]
    UnknownHttpCode(reqwest::StatusCode),

    #[error(transparent)]
    ApiError(#[from] ApiError),
}

/// Errors defined and returned by the API with status code
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Torrent hash not found: {0}")]
    TorrentHashNotFound(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
