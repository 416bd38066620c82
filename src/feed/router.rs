//! Writer/router task.
//!
//! The only task that writes to the connection and the only owner of the
//! pending-call table. Submissions from the facade and responses from the
//! reader arrive on one queue and are handled in arrival order.

use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::error::FeedError;
use super::ids::Id;
use super::messages::{Call, Response};
use crate::ws::WsWriter;

/// Completion handle for one call.
pub(crate) type Reply = oneshot::Sender<Result<Response, FeedError>>;

/// Work items for the router.
#[derive(Debug)]
pub(crate) enum RouterEvent {
    /// Write `call` and remember `reply` until its response arrives.
    Submit {
        /// Call to write.
        call: Call,
        /// Where the correlated response goes.
        reply: Reply,
    },
    /// Response read from the connection.
    Inbound(Response),
}

/// Router task state.
#[derive(Debug)]
pub(crate) struct FeedRouter {
    pub(crate) writer: WsWriter,
    pub(crate) queue: mpsc::Receiver<RouterEvent>,
    pub(crate) shutdown: CancellationToken,
    pub(crate) pending: HashMap<Id, Reply>,
}

impl FeedRouter {
    pub(crate) fn new(
        writer: WsWriter,
        queue: mpsc::Receiver<RouterEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            writer,
            queue,
            shutdown,
            pending: HashMap::new(),
        }
    }

    /// Runs until teardown or a write failure, then closes the connection.
    ///
    /// Calls still pending at exit are not completed here: their senders are
    /// dropped with the table and each waiter reports [`FeedError::Closed`].
    pub(crate) async fn run(mut self) {
        loop {
            let event = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                event = self.queue.recv() => event,
            };

            let Some(event) = event else {
                break;
            };

            match event {
                RouterEvent::Submit { call, reply } => {
                    if let Err(e) = self.submit(call, reply).await {
                        if !self.shutdown.is_cancelled() {
                            log::warn!("Feed write failed: {}", e);
                        }
                        break;
                    }
                }
                RouterEvent::Inbound(resp) => self.complete(resp),
            }
        }

        self.shutdown.cancel();
        self.queue.close();
        if !self.pending.is_empty() {
            log::debug!("Releasing {} pending feed call(s)", self.pending.len());
        }
        self.pending.clear();
        if let Err(e) = self.writer.close().await {
            log::debug!("Feed close: {:#}", e);
        }
        log::debug!("Feed router exited");
    }

    /// Writes one call. A write failure completes that caller and is
    /// returned so the router can end the session.
    async fn submit(&mut self, call: Call, reply: Reply) -> Result<(), FeedError> {
        let text = match serde_json::to_string(&call) {
            Ok(text) => text,
            Err(e) => {
                let _ = reply.send(Err(FeedError::Protocol(format!("unencodable call: {e}"))));
                return Ok(());
            }
        };

        log::debug!(">> {}", text);

        let written = tokio::select! {
            biased;
            () = self.shutdown.cancelled() => Err(FeedError::Closed),
            res = self.writer.send_text(&text) => {
                res.map_err(|e| FeedError::Transport(format!("{e:#}")))
            }
        };

        match written {
            Ok(()) => {
                self.pending.insert(call.id, reply);
                Ok(())
            }
            Err(e) => {
                let _ = reply.send(Err(e.clone()));
                Err(e)
            }
        }
    }

    fn complete(&mut self, resp: Response) {
        match self.pending.remove(&resp.id) {
            Some(reply) => {
                let _ = reply.send(Ok(resp));
            }
            None => {
                log::debug!("Dropping response for unknown call id {}", resp.id);
            }
        }
    }
}
