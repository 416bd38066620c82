//! LiveChess REST API.
//!
//! - [`types`] - Eboard listing data types (also used by feed events)
//! - [`client`] - HTTP client for the listing endpoint
//! - [`select`] - Eboard auto-selection on top of the listing

pub mod client;
pub mod select;
pub mod types;

pub use client::{ApiClient, EBoardSource};
pub use select::{autodetect, select_eboard, SelectError};
pub use types::{ClockResponse, EBoardResponse, EBoardSerial, EBoardState};
