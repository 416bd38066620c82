//! LiveChess client - eboard discovery and live board feeds.
//!
//! This crate talks to DGT LiveChess, the local service that exposes
//! electronic chess boards, over its REST and WebSocket APIs.
//!
//! # Modules
//!
//! - [`api`] - REST listing client, eboard types and auto-selection
//! - [`feed`] - Streaming feed sessions (subscribe, events, setup/flip)
//! - [`ws`] - WebSocket transport halves
//! - [`config`] - Endpoint configuration
//! - [`constants`] - Defaults and wire identifiers

pub mod api;
pub mod config;
pub mod constants;
pub mod feed;
pub mod ws;

// Re-export commonly used types
pub use api::{autodetect, ApiClient, EBoardResponse, EBoardSerial, EBoardSource, EBoardState};
pub use config::Config;
pub use feed::{EBoardEvent, EventStream, FeedError, FeedHandle, FeedSession};
