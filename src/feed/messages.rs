//! LiveChess WebSocket message envelopes.
//!
//! Field names match the LiveChess protocol exactly. A subscription looks
//! like this on the wire:
//!
//! ```text
//! >> {"call":"subscribe","id":42,
//!     "param":{"feed":"eboardevent","id":7,"param":{"serialnr":"7425"}}}
//! << {"response":"call","id":42,"param":null,"time":1503849460753}
//! << {"response":"feed","id":7,
//!     "param":{"serialnr":"7425","flipped":false,...},"time":1503849460756}
//! ```
//!
//! Commands against the feed are `call` messages naming the feed id:
//!
//! ```text
//! >> {"call":"call","id":2,"param":{"method":"setup","id":7,"param":{"fen":"..."}}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::FeedError;
use super::ids::Id;
use crate::api::types::{ClockResponse, EBoardSerial};
use crate::constants;

/// Kind tag of an outgoing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    /// Subscribe to a feed.
    Subscribe,
    /// Invoke a method on an existing feed.
    Call,
}

/// Outgoing request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    /// Kind tag.
    pub call: CallKind,
    /// Correlation id of this call.
    pub id: Id,
    /// Kind-specific parameters.
    pub param: CallParam,
}

/// Parameters of a [`Call`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CallParam {
    /// Parameters of a `subscribe` call.
    Subscribe(FeedParam),
    /// Parameters of a method invocation.
    Method(MethodParam),
}

/// Subscription target: which feed, under which id, for which board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedParam {
    /// Feed name, always `eboardevent` here.
    pub feed: String,
    /// Feed id the server tags events with.
    pub id: Id,
    /// Feed parameters.
    pub param: SerialParam,
}

/// Names the eboard a feed is for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialParam {
    /// Eboard serial number.
    pub serialnr: EBoardSerial,
}

/// Feed methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Set the reconstruction start position.
    Setup,
    /// Set the board orientation.
    Flip,
}

/// Method invocation against a feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodParam {
    /// Method name.
    pub method: Method,
    /// Feed id the method applies to.
    pub id: Id,
    /// Method arguments.
    pub param: MethodArgs,
}

/// Method arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MethodArgs {
    /// `setup` arguments.
    Setup(FenParam),
    /// `flip` arguments.
    Flip(FlipParam),
}

/// `setup` arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FenParam {
    /// Start position in FEN.
    pub fen: String,
}

/// `flip` arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipParam {
    /// Whether the board is flipped.
    pub flip: bool,
}

impl Call {
    /// Subscribes feed `feed` to events of eboard `serial`.
    pub fn subscribe(id: Id, feed: Id, serial: EBoardSerial) -> Self {
        Self {
            call: CallKind::Subscribe,
            id,
            param: CallParam::Subscribe(FeedParam {
                feed: constants::EBOARD_EVENT_FEED.to_string(),
                id: feed,
                param: SerialParam { serialnr: serial },
            }),
        }
    }

    /// Sets the start position of feed `feed`.
    pub fn setup(id: Id, feed: Id, fen: impl Into<String>) -> Self {
        Self::method(id, feed, Method::Setup, MethodArgs::Setup(FenParam { fen: fen.into() }))
    }

    /// Sets the orientation of feed `feed`.
    pub fn flip(id: Id, feed: Id, flipped: bool) -> Self {
        Self::method(id, feed, Method::Flip, MethodArgs::Flip(FlipParam { flip: flipped }))
    }

    fn method(id: Id, feed: Id, method: Method, param: MethodArgs) -> Self {
        Self {
            call: CallKind::Call,
            id,
            param: CallParam::Method(MethodParam {
                method,
                id: feed,
                param,
            }),
        }
    }
}

/// Kind tag of an incoming response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// Confirmation of a call.
    Call,
    /// Unsolicited feed event.
    Feed,
    /// Failure of a call.
    Error,
    /// Any kind this client does not know.
    #[serde(other)]
    Unknown,
}

/// Incoming message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Kind tag.
    pub response: ResponseKind,
    /// Id of the call or feed this message belongs to.
    pub id: Id,
    /// Kind-specific payload.
    #[serde(default)]
    pub param: Option<Value>,
    /// Server timestamp in milliseconds.
    #[serde(default)]
    pub time: i64,
}

/// Payload of an `error` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorParam {
    /// Human-readable failure.
    #[serde(default)]
    pub message: String,
}

/// Board and clock change reported by an `eboardevent` feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EBoardEvent {
    /// Board generating the event.
    pub serialnr: EBoardSerial,
    /// Whether the board is flipped.
    #[serde(default)]
    pub flipped: bool,
    /// Current position; omitted when the board did not change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    /// Clock value; omitted when the clock did not change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockResponse>,
    /// FEN from which moves are reconstructed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    /// Detected moves in SAN.
    #[serde(default)]
    pub san: Vec<String>,
    /// Whether the board exactly matches the reconstructed moves.
    #[serde(rename = "match", default)]
    pub matched: bool,
}

impl Response {
    /// Decodes a response from a text or binary frame payload.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FeedError> {
        serde_json::from_slice(bytes)
            .map_err(|e| FeedError::Protocol(format!("invalid response: {e}")))
    }

    /// Message of an `error` response. Empty if the payload has none.
    pub fn error_message(&self) -> String {
        self.param
            .clone()
            .and_then(|p| serde_json::from_value::<ErrorParam>(p).ok())
            .map(|p| p.message)
            .unwrap_or_default()
    }

    /// Turns an `error` response into [`FeedError::Remote`].
    pub fn into_result(self) -> Result<Self, FeedError> {
        if self.response == ResponseKind::Error {
            Err(FeedError::Remote(self.error_message()))
        } else {
            Ok(self)
        }
    }

    /// Decodes the payload of a `feed` response.
    pub fn into_event(self) -> Result<EBoardEvent, FeedError> {
        let param = self.param.unwrap_or(Value::Null);
        serde_json::from_value(param)
            .map_err(|e| FeedError::Protocol(format!("invalid feed event: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscribe_call_wire_format() {
        let call = Call::subscribe(Id(42), Id(7), "7425".into());
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "call": "subscribe",
                "id": 42,
                "param": {"feed": "eboardevent", "id": 7, "param": {"serialnr": "7425"}}
            })
        );
    }

    #[test]
    fn test_setup_call_wire_format() {
        let fen = "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w QKqk - 2 3";
        let call = Call::setup(Id(2), Id(7), fen);
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "call": "call",
                "id": 2,
                "param": {"method": "setup", "id": 7, "param": {"fen": fen}}
            })
        );
    }

    #[test]
    fn test_flip_call_uses_flip_method() {
        let call = Call::flip(Id(4), Id(7), true);
        assert_eq!(
            serde_json::to_value(&call).unwrap(),
            json!({
                "call": "call",
                "id": 4,
                "param": {"method": "flip", "id": 7, "param": {"flip": true}}
            })
        );
    }

    #[test]
    fn test_call_decodes_back_into_method() {
        let call: Call = serde_json::from_value(json!({
            "call": "call",
            "id": 4,
            "param": {"method": "flip", "id": 7, "param": {"flip": false}}
        }))
        .unwrap();
        assert_eq!(call, Call::flip(Id(4), Id(7), false));
    }

    #[test]
    fn test_confirmation_with_null_param() {
        let resp = Response::from_slice(
            br#"{"id": 42, "response": "call", "param": null, "time": 1503849460753}"#,
        )
        .unwrap();
        assert_eq!(resp.response, ResponseKind::Call);
        assert_eq!(resp.id, Id(42));
        assert_eq!(resp.param, None);
        assert_eq!(resp.time, 1_503_849_460_753);
        assert!(resp.into_result().is_ok());
    }

    #[test]
    fn test_error_response_becomes_remote_error() {
        let resp = Response::from_slice(
            br#"{"response": "error", "id": 3, "param": {"message": "bad fen"}, "time": 1}"#,
        )
        .unwrap();
        assert_eq!(resp.error_message(), "bad fen");
        assert_eq!(
            resp.into_result().unwrap_err(),
            FeedError::Remote("bad fen".to_string())
        );
    }

    #[test]
    fn test_unknown_kind_is_not_a_decode_error() {
        let resp =
            Response::from_slice(br#"{"response": "heartbeat", "id": 0, "time": 5}"#).unwrap();
        assert_eq!(resp.response, ResponseKind::Unknown);
    }

    #[test]
    fn test_garbage_is_protocol_error() {
        let err = Response::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, FeedError::Protocol(_)));
    }

    #[test]
    fn test_feed_event_decodes() {
        let resp = Response::from_slice(
            br#"{
                "response": "feed",
                "id": 7,
                "param": {
                    "serialnr": "7425",
                    "flipped": false,
                    "board": "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R",
                    "clock": {"white": 5676, "black": 7190, "run": true, "time": 1503845105357},
                    "start": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
                    "san": ["e4", "e5", "Nf3", "Nc6"],
                    "match": true
                },
                "time": 1503849460756
            }"#,
        )
        .unwrap();

        let event = resp.into_event().unwrap();
        assert_eq!(event.serialnr, EBoardSerial::from("7425"));
        assert_eq!(event.san, vec!["e4", "e5", "Nf3", "Nc6"]);
        assert!(event.matched);
        assert_eq!(event.clock.unwrap().black, 7190);
    }

    #[test]
    fn test_partial_feed_event_defaults() {
        let resp = Response::from_slice(
            br#"{"response": "feed", "id": 7,
                 "param": {"serialnr": "7425", "flipped": true}, "time": 0}"#,
        )
        .unwrap();
        let event = resp.into_event().unwrap();
        assert!(event.flipped);
        assert!(event.board.is_none());
        assert!(event.san.is_empty());
        assert!(!event.matched);
    }

    #[test]
    fn test_feed_without_payload_is_protocol_error() {
        let resp =
            Response::from_slice(br#"{"response": "feed", "id": 7, "param": null, "time": 0}"#)
                .unwrap();
        assert!(matches!(resp.into_event(), Err(FeedError::Protocol(_))));
    }
}
