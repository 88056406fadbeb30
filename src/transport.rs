use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::{
    connect_async,
    tungstenite::protocol::{frame::coding::CloseCode, CloseFrame, Message},
    MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};
use url::Url;

/// Status code for an intentional close requested by either side.
pub const NORMAL_CLOSURE: u16 = 1000;

/// Status code reported when a connection dies without a close handshake.
pub const ABNORMAL_CLOSURE: u16 = 1006;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
}

/// Inbound event on a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A text payload pushed by the server.
    Text(String),
    /// The peer closed the connection with the given status code.
    Closed { code: u16 },
}

/// Dialer for the live update channel.
///
/// The channel client only depends on this pair of traits, so tests drive
/// the full state machine with an in-memory implementation and production
/// uses [`WsTransport`].
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn connect(&self, url: &Url) -> Result<Box<dyn Connection>, TransportError>;
}

/// A single live connection handed out by a [`Transport`].
#[async_trait]
pub trait Connection: Send {
    /// Waits for the next inbound frame. `None` means the stream ended
    /// without a close handshake.
    async fn next(&mut self) -> Option<Frame>;

    /// Starts the close handshake with the given status code. The handshake
    /// may complete after this call returns.
    async fn close(&mut self, code: u16);
}

/// WebSocket transport on `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsTransport;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

#[async_trait]
impl Transport for WsTransport {
    async fn connect(&self, url: &Url) -> Result<Box<dyn Connection>, TransportError> {
        let (stream, _) = connect_async(url.as_str())
            .await
            .map_err(|err| TransportError::ConnectionFailed(err.to_string()))?;

        Ok(Box::new(WsConnection { stream }))
    }
}

struct WsConnection {
    stream: WsStream,
}

#[async_trait]
impl Connection for WsConnection {
    async fn next(&mut self) -> Option<Frame> {
        loop {
            match self.stream.next().await? {
                Ok(Message::Text(text)) => return Some(Frame::Text(text)),
                Ok(Message::Close(frame)) => {
                    let code = frame.map_or(ABNORMAL_CLOSURE, |f| f.code.into());
                    return Some(Frame::Closed { code });
                }
                // binary and ping/pong keepalive frames carry no snapshots
                Ok(_) => continue,
                // errors are logged only; the closure that follows drives
                // any reconnect
                Err(err) => {
                    warn!(%err, "channel transport error");
                    continue;
                }
            }
        }
    }

    async fn close(&mut self, code: u16) {
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: "".into(),
        };

        if let Err(err) = self.stream.close(Some(frame)).await {
            debug!(%err, "close handshake failed");
        }
    }
}
