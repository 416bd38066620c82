//! Application-wide constants for livechess.
//!
//! Centralizes the LiveChess endpoint defaults, wire identifiers and
//! buffer sizes so they are discoverable in one place.
//!
//! # Categories
//!
//! - **Endpoint**: Where the LiveChess service listens
//! - **Wire**: Identifiers the LiveChess protocol expects verbatim
//! - **Feed**: Session buffering
//! - **Timeouts**: HTTP request limits

use std::time::Duration;

// ============================================================================
// Endpoint
// ============================================================================

/// Default `host:port` of the LiveChess service.
pub const DEFAULT_ENDPOINT: &str = "localhost:1982";

/// Default API path prefix, shared by the REST and WebSocket endpoints.
pub const DEFAULT_API_PATH: &str = "api/v1.0";

// ============================================================================
// Wire
// ============================================================================

/// Feed name used when subscribing to eboard events.
pub const EBOARD_EVENT_FEED: &str = "eboardevent";

/// Standard chess starting position, used as the default `watch --start`.
pub const INITIAL_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// ============================================================================
// Feed
// ============================================================================

/// Capacity of the event stream handed to feed consumers.
///
/// Once full, the reader waits for the consumer (or teardown) instead of
/// dropping events.
pub const FEED_EVENT_BUFFER: usize = 20;

/// Capacity of the router's internal queue (submissions + inbound responses).
pub const ROUTER_QUEUE_CAPACITY: usize = 64;

// ============================================================================
// Timeouts
// ============================================================================

/// HTTP client request timeout for REST calls (eboard listing).
pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
