//! Eboard data types shared by the REST listing and the feed.
//!
//! Field names match the LiveChess JSON API exactly.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Eboard serial number. Unique key of a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EBoardSerial(pub String);

impl std::fmt::Display for EBoardSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EBoardSerial {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EBoardSerial {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EBoardSerial {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Liveness state reported for an eboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EBoardState {
    /// `null` or empty: the board has not been activated yet.
    #[default]
    NotActivated,
    /// `ACTIVE`: alive and well.
    Active,
    /// `INACTIVE`: deactivated by operator action.
    Inactive,
    /// `NOTRESPONDING`: the board does not answer requests.
    NotResponding,
    /// `DELAYED`: present, but board information lags the real board.
    /// Only occurs in wireless Caissa setups.
    Delayed,
    /// Any value this client does not know about.
    Other(String),
}

impl EBoardState {
    /// Wire representation of the state.
    pub fn as_str(&self) -> &str {
        match self {
            Self::NotActivated => "",
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::NotResponding => "NOTRESPONDING",
            Self::Delayed => "DELAYED",
            Self::Other(s) => s,
        }
    }

    /// Returns `true` for a board that never reported a state.
    pub fn is_not_activated(&self) -> bool {
        matches!(self, Self::NotActivated)
    }
}

impl From<&str> for EBoardState {
    fn from(s: &str) -> Self {
        match s {
            "" => Self::NotActivated,
            "ACTIVE" => Self::Active,
            "INACTIVE" => Self::Inactive,
            "NOTRESPONDING" => Self::NotResponding,
            "DELAYED" => Self::Delayed,
            other => Self::Other(other.to_string()),
        }
    }
}

impl Serialize for EBoardState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EBoardState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(Self::from).unwrap_or_default())
    }
}

/// Clock snapshot, present when a clock is attached to the board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClockResponse {
    /// Seconds remaining for white.
    #[serde(default)]
    pub white: i64,
    /// Seconds remaining for black.
    #[serde(default)]
    pub black: i64,
    /// `None` if the clock is stopped, `Some(true)` while white's clock runs,
    /// `Some(false)` while black's clock runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<bool>,
    /// Millisecond timestamp at which the clock was read.
    #[serde(default)]
    pub time: i64,
}

/// One entry of the `GET /eboards` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EBoardResponse {
    /// Serial number of the board.
    pub serialnr: EBoardSerial,
    /// Source the board is attached through; `None` if the board is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Liveness state; omitted when the board was never activated.
    #[serde(default, skip_serializing_if = "EBoardState::is_not_activated")]
    pub state: EBoardState,
    /// Battery level, e.g. `"87%"` (bluetooth) or `"4.1V"` (Caissa).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
    /// Operator comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Board part of a FEN string with the detected pieces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    /// Whether the board is flipped.
    #[serde(default)]
    pub flipped: bool,
    /// Clock snapshot when a clock is present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<ClockResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_parses_known_and_null_values() {
        let boards: Vec<EBoardResponse> = serde_json::from_str(
            r#"[
                {"serialnr": "1", "state": "ACTIVE", "flipped": false},
                {"serialnr": "2", "state": null, "flipped": true},
                {"serialnr": "3", "state": "", "flipped": false},
                {"serialnr": "4", "flipped": false},
                {"serialnr": "5", "state": "DELAYED", "flipped": false}
            ]"#,
        )
        .unwrap();

        assert_eq!(boards[0].state, EBoardState::Active);
        assert_eq!(boards[1].state, EBoardState::NotActivated);
        assert!(boards[1].flipped);
        assert_eq!(boards[2].state, EBoardState::NotActivated);
        assert_eq!(boards[3].state, EBoardState::NotActivated);
        assert_eq!(boards[4].state, EBoardState::Delayed);
    }

    #[test]
    fn test_unknown_state_is_preserved() {
        let board: EBoardResponse =
            serde_json::from_str(r#"{"serialnr": "9", "state": "CHARGING", "flipped": false}"#)
                .unwrap();
        assert_eq!(board.state, EBoardState::Other("CHARGING".to_string()));
        assert_eq!(board.state.as_str(), "CHARGING");
    }

    #[test]
    fn test_full_listing_entry() {
        let board: EBoardResponse = serde_json::from_str(
            r#"{
                "serialnr": "7425",
                "source": "COM3",
                "state": "ACTIVE",
                "battery": "87%",
                "comment": null,
                "board": "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
                "flipped": false,
                "clock": {"white": 5676, "black": 7190, "run": true, "time": 1503845105357}
            }"#,
        )
        .unwrap();

        assert_eq!(board.serialnr, EBoardSerial::from("7425"));
        assert_eq!(board.source.as_deref(), Some("COM3"));
        assert_eq!(board.comment, None);
        let clock = board.clock.unwrap();
        assert_eq!(clock.white, 5676);
        assert_eq!(clock.run, Some(true));
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let board = EBoardResponse {
            serialnr: "12".into(),
            source: None,
            state: EBoardState::Inactive,
            battery: None,
            comment: None,
            board: None,
            flipped: true,
            clock: None,
        };
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"serialnr": "12", "state": "INACTIVE", "flipped": true})
        );
    }

    #[test]
    fn test_not_activated_state_is_omitted() {
        let board: EBoardResponse =
            serde_json::from_str(r#"{"serialnr": "3", "state": "", "flipped": false}"#).unwrap();
        assert!(board.state.is_not_activated());

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json, serde_json::json!({"serialnr": "3", "flipped": false}));
    }
}
