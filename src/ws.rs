//! WebSocket transport for feed sessions.
//!
//! LiveChess exchanges JSON documents in data frames. [`connect`] splits the
//! connection so the feed router can own the [`WsWriter`] and the feed reader
//! the [`WsReader`]. Control frames never reach callers: tungstenite answers
//! pings itself while the read half is polled.

use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::{self, Message};

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Write half of a feed connection.
#[derive(Debug)]
pub struct WsWriter {
    sink: futures_util::stream::SplitSink<WsStream, Message>,
}

impl WsWriter {
    /// Sends one JSON document as a text frame.
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.sink
            .send(Message::Text(text.to_owned()))
            .await
            .context("WebSocket send_text failed")
    }

    /// Sends a close frame and shuts the write side down.
    pub async fn close(&mut self) -> Result<()> {
        self.sink.close().await.context("WebSocket close failed")
    }
}

/// Read half of a feed connection.
#[derive(Debug)]
pub struct WsReader {
    stream: futures_util::stream::SplitStream<WsStream>,
}

impl WsReader {
    /// Payload of the next text or binary frame.
    ///
    /// # Errors
    ///
    /// Fails once the connection is over: read error, close frame (with its
    /// code and reason) or end of stream.
    pub async fn next_payload(&mut self) -> Result<Vec<u8>> {
        while let Some(msg) = self.stream.next().await {
            match msg.context("WebSocket read failed")? {
                Message::Text(text) => return Ok(text.into_bytes()),
                Message::Binary(data) => return Ok(data),
                Message::Close(frame) => {
                    let detail = frame.map_or_else(
                        || "no status".to_string(),
                        |f| format!("{} {}", u16::from(f.code), f.reason),
                    );
                    anyhow::bail!("connection closed by server ({})", detail.trim_end());
                }
                Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
            }
        }
        anyhow::bail!("connection closed")
    }
}

/// Opens a WebSocket connection to `url` and splits it.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the WebSocket handshake fails.
pub async fn connect(url: &str) -> Result<(WsWriter, WsReader)> {
    use tungstenite::client::IntoClientRequest;

    let request = url
        .into_client_request()
        .with_context(|| format!("invalid WebSocket URL: {url}"))?;

    let (ws_stream, _response) = tokio_tungstenite::connect_async(request)
        .await
        .with_context(|| format!("WebSocket connect to {url} failed"))?;

    let (sink, stream) = ws_stream.split();
    Ok((WsWriter { sink }, WsReader { stream }))
}
