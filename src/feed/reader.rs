//! Reader/demultiplexer task.
//!
//! Owns the read half of the connection for the session lifetime. Feed
//! events go to the bounded event channel; `call` and `error` responses go
//! to the router for correlation.
//!
//! ```text
//! WsReader ──▶ Response ──┬── feed ─────────▶ events (bounded)
//!                         ├── call | error ─▶ router queue
//!                         └── other ────────▶ log + ignore
//! ```

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::FeedError;
use super::messages::{EBoardEvent, Response, ResponseKind};
use super::router::RouterEvent;
use crate::ws::WsReader;

/// Reads and decodes the next protocol message.
pub(crate) async fn read_response(reader: &mut WsReader) -> Result<Response, FeedError> {
    let payload = reader
        .next_payload()
        .await
        .map_err(|e| FeedError::Transport(format!("{e:#}")))?;
    log::debug!("<< {}", String::from_utf8_lossy(&payload));
    Response::from_slice(&payload)
}

/// Reader task state.
#[derive(Debug)]
pub(crate) struct FeedReader {
    pub(crate) reader: WsReader,
    pub(crate) events: mpsc::Sender<EBoardEvent>,
    pub(crate) router: mpsc::Sender<RouterEvent>,
    pub(crate) shutdown: CancellationToken,
}

impl FeedReader {
    /// Runs until teardown or a read/decode failure. Always cancels the
    /// session on exit; dropping `events` closes the consumer's stream.
    pub(crate) async fn run(mut self) {
        if let Err(e) = self.read_loop().await {
            if !self.shutdown.is_cancelled() {
                log::warn!("Feed reader stopped: {}", e);
            }
        }
        self.shutdown.cancel();
        log::debug!("Feed reader exited");
    }

    async fn read_loop(&mut self) -> Result<(), FeedError> {
        let mut consumer_gone = false;

        loop {
            let resp = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => return Ok(()),
                resp = read_response(&mut self.reader) => resp?,
            };

            match resp.response {
                ResponseKind::Feed => {
                    let event = resp.into_event()?;
                    if consumer_gone {
                        continue;
                    }
                    tokio::select! {
                        biased;
                        () = self.shutdown.cancelled() => return Ok(()),
                        sent = self.events.send(event) => {
                            if sent.is_err() {
                                log::debug!("Event stream dropped; discarding further events");
                                consumer_gone = true;
                            }
                        }
                    }
                }
                ResponseKind::Call | ResponseKind::Error => {
                    tokio::select! {
                        biased;
                        () = self.shutdown.cancelled() => return Ok(()),
                        sent = self.router.send(RouterEvent::Inbound(resp)) => {
                            if sent.is_err() {
                                return Err(FeedError::Closed);
                            }
                        }
                    }
                }
                ResponseKind::Unknown => {
                    log::warn!("Unexpected response type for id {}: {:?}", resp.id, resp.param);
                }
            }
        }
    }
}
