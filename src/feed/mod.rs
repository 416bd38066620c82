//! Streaming feed client for LiveChess eboards.
//!
//! One WebSocket connection per session, subscribed to the `eboardevent`
//! feed of a single eboard.
//!
//! # Architecture
//!
//! ```text
//! FeedHandle::setup/flip ──▶ router queue ──▶ FeedRouter ──▶ WsWriter
//!                                 ▲              (pending table)
//!                                 │ call | error
//! EventStream ◀── feed ───── FeedReader ◀──────────────────── WsReader
//! ```
//!
//! - [`ids`] - Correlation ids
//! - [`messages`] - Wire envelopes
//! - [`handshake`] - Dial + subscribe
//! - [`reader`] - Demultiplexer task
//! - [`router`] - Single writer, owner of pending calls
//! - [`session`] - Public facade
//!
//! A session never reconnects. Once the event stream ends the caller builds
//! a new session.

pub mod error;
mod handshake;
pub mod ids;
pub mod messages;
mod reader;
mod router;
pub mod session;

pub use error::FeedError;
pub use ids::{Id, IdGenerator};
pub use messages::{Call, EBoardEvent, Response, ResponseKind};
pub use session::{EventStream, FeedHandle, FeedSession, FeedSessionBuilder};
