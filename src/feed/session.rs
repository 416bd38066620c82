//! Feed session facade.
//!
//! [`FeedSession`] owns the two worker tasks of a live subscription and is
//! the entry point for `setup`/`flip` commands. [`FeedHandle`] is a cloneable
//! view for issuing commands from other tasks. [`EventStream`] delivers the
//! board events.
//!
//! # Usage
//!
//! ```ignore
//! let (mut session, mut events) = FeedSession::builder(config.ws_url(), "7425")
//!     .connect()
//!     .await?;
//!
//! let cancel = CancellationToken::new();
//! session.setup(&cancel, INITIAL_FEN).await?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event.san);
//! }
//! session.close().await;
//! ```
//!
//! # Shutdown
//!
//! Every teardown path (server close, read/write failure, [`FeedSession::close`],
//! drop) cancels one shared token, then:
//!
//! 1. new calls are refused with [`FeedError::Closed`];
//! 2. the router closes the write half and the reader drops the read half;
//! 3. callers still waiting for a response are released with
//!    [`FeedError::Closed`], and the event stream ends.

use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::error::FeedError;
use super::handshake;
use super::ids::{Id, IdGenerator};
use super::messages::{Call, EBoardEvent, Response};
use super::reader::FeedReader;
use super::router::{FeedRouter, RouterEvent};
use crate::api::types::EBoardSerial;
use crate::constants;

/// Builder for [`FeedSession`].
#[derive(Debug)]
pub struct FeedSessionBuilder {
    url: String,
    serial: EBoardSerial,
    ids: Option<IdGenerator>,
    event_buffer: usize,
}

impl FeedSessionBuilder {
    /// Create a builder for a feed on `serial` at WebSocket `url`.
    pub fn new(url: impl Into<String>, serial: impl Into<EBoardSerial>) -> Self {
        Self {
            url: url.into(),
            serial: serial.into(),
            ids: None,
            event_buffer: constants::FEED_EVENT_BUFFER,
        }
    }

    /// Draw call and feed ids from `ids` instead of a fresh generator.
    #[must_use]
    pub fn ids(mut self, ids: IdGenerator) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Capacity of the event stream (at least 1).
    #[must_use]
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity.max(1);
        self
    }

    /// Connects, subscribes and starts the session tasks.
    ///
    /// # Errors
    ///
    /// [`FeedError::Connect`] if the server cannot be reached,
    /// [`FeedError::Remote`] if the subscription is rejected, and
    /// [`FeedError::Transport`]/[`FeedError::Protocol`] if the handshake
    /// breaks down.
    pub async fn connect(self) -> Result<(FeedSession, EventStream), FeedError> {
        let ids = self.ids.unwrap_or_default();
        let subscribed = handshake::connect(&self.url, &self.serial, &ids).await?;

        let shutdown = CancellationToken::new();
        let (events_tx, events_rx) = mpsc::channel(self.event_buffer);
        let (queue_tx, queue_rx) = mpsc::channel(constants::ROUTER_QUEUE_CAPACITY);

        let router = FeedRouter::new(subscribed.writer, queue_rx, shutdown.clone());
        let reader = FeedReader {
            reader: subscribed.reader,
            events: events_tx,
            router: queue_tx.clone(),
            shutdown: shutdown.clone(),
        };

        let router_task = tokio::spawn(router.run());
        let reader_task = tokio::spawn(reader.run());

        let session = FeedSession {
            handle: FeedHandle {
                feed: subscribed.feed,
                ids,
                queue: queue_tx,
                shutdown,
            },
            serial: self.serial,
            reader_task: Some(reader_task),
            router_task: Some(router_task),
        };

        Ok((session, EventStream { rx: events_rx }))
    }
}

/// Cloneable command handle for a live feed.
///
/// All clones share the session's teardown; a handle outliving its session
/// fails every call with [`FeedError::Closed`].
#[derive(Clone, Debug)]
pub struct FeedHandle {
    feed: Id,
    ids: IdGenerator,
    queue: mpsc::Sender<RouterEvent>,
    shutdown: CancellationToken,
}

impl FeedHandle {
    /// Sets the position move reconstruction starts from.
    ///
    /// Resolves with the server's answer, [`FeedError::Closed`] on teardown,
    /// or [`FeedError::Cancelled`] once `cancel` fires, whichever comes first.
    pub async fn setup(&self, cancel: &CancellationToken, fen: &str) -> Result<(), FeedError> {
        let call = Call::setup(self.ids.next_id(), self.feed, fen);
        self.call(cancel, call).await.map(drop)
    }

    /// Sets the board orientation. Same outcomes as [`FeedHandle::setup`].
    pub async fn flip(&self, cancel: &CancellationToken, flipped: bool) -> Result<(), FeedError> {
        let call = Call::flip(self.ids.next_id(), self.feed, flipped);
        self.call(cancel, call).await.map(drop)
    }

    /// Feed id of the subscription.
    pub fn feed_id(&self) -> Id {
        self.feed
    }

    /// Returns `true` once the session has been torn down.
    pub fn is_closed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Waits until the session is torn down.
    pub async fn closed(&self) {
        self.shutdown.cancelled().await;
    }

    async fn call(&self, cancel: &CancellationToken, call: Call) -> Result<Response, FeedError> {
        if self.shutdown.is_cancelled() {
            return Err(FeedError::Closed);
        }

        let (reply, done) = oneshot::channel();
        let submit = RouterEvent::Submit { call, reply };

        tokio::select! {
            biased;
            () = self.shutdown.cancelled() => return Err(FeedError::Closed),
            () = cancel.cancelled() => return Err(FeedError::Cancelled),
            sent = self.queue.send(submit) => {
                if sent.is_err() {
                    return Err(FeedError::Closed);
                }
            }
        }

        let outcome = tokio::select! {
            biased;
            resp = done => resp.unwrap_or(Err(FeedError::Closed)),
            () = self.shutdown.cancelled() => Err(FeedError::Closed),
            () = cancel.cancelled() => Err(FeedError::Cancelled),
        };

        outcome?.into_result()
    }
}

/// Live subscription to one eboard feed.
///
/// Dropping the session tears it down without waiting for the tasks;
/// [`FeedSession::close`] also joins them.
#[derive(Debug)]
pub struct FeedSession {
    handle: FeedHandle,
    serial: EBoardSerial,
    reader_task: Option<JoinHandle<()>>,
    router_task: Option<JoinHandle<()>>,
}

impl FeedSession {
    /// Create a new session builder.
    pub fn builder(url: impl Into<String>, serial: impl Into<EBoardSerial>) -> FeedSessionBuilder {
        FeedSessionBuilder::new(url, serial)
    }

    /// Connects with default options.
    ///
    /// # Errors
    ///
    /// See [`FeedSessionBuilder::connect`].
    pub async fn connect(
        url: impl Into<String>,
        serial: impl Into<EBoardSerial>,
    ) -> Result<(Self, EventStream), FeedError> {
        Self::builder(url, serial).connect().await
    }

    /// Cloneable command handle for other tasks.
    pub fn handle(&self) -> FeedHandle {
        self.handle.clone()
    }

    /// See [`FeedHandle::setup`].
    pub async fn setup(&self, cancel: &CancellationToken, fen: &str) -> Result<(), FeedError> {
        self.handle.setup(cancel, fen).await
    }

    /// See [`FeedHandle::flip`].
    pub async fn flip(&self, cancel: &CancellationToken, flipped: bool) -> Result<(), FeedError> {
        self.handle.flip(cancel, flipped).await
    }

    /// Serial of the subscribed eboard.
    pub fn serial(&self) -> &EBoardSerial {
        &self.serial
    }

    /// Feed id of the subscription.
    pub fn feed_id(&self) -> Id {
        self.handle.feed
    }

    /// Returns `true` once the session has been torn down.
    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    /// Waits until the session is torn down by any path.
    pub async fn closed(&self) {
        self.handle.closed().await;
    }

    /// Tears the session down and waits for both tasks to exit. Idempotent.
    pub async fn close(&mut self) {
        self.handle.shutdown.cancel();

        for task in [self.router_task.take(), self.reader_task.take()]
            .into_iter()
            .flatten()
        {
            if let Err(e) = task.await {
                log::warn!("Feed task for eboard {} failed: {}", self.serial, e);
            }
        }
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        self.handle.shutdown.cancel();
    }
}

/// Bounded stream of feed events. Ends once the session is torn down.
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::Receiver<EBoardEvent>,
}

impl EventStream {
    /// Receive the next event, or `None` once the session has ended.
    pub async fn recv(&mut self) -> Option<EBoardEvent> {
        self.rx.recv().await
    }
}

impl futures_util::Stream for EventStream {
    type Item = EBoardEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
