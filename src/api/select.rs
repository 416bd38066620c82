//! Eboard auto-selection.
//!
//! Picks the eboard a user most likely means when they did not name one:
//! the only board listed, or the only `ACTIVE` board among several.
//! Ambiguity is always an error, never a silent default.

use anyhow::Result;

use super::client::EBoardSource;
use super::types::{EBoardResponse, EBoardSerial, EBoardState};

/// Reasons auto-selection can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// The service lists no eboards at all.
    NoEBoards,
    /// Several eboards are listed but none is `ACTIVE`.
    NoneActive,
    /// Several eboards are `ACTIVE`.
    MultipleActive(Vec<EBoardSerial>),
}

impl std::fmt::Display for SelectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEBoards => write!(f, "no eboards"),
            Self::NoneActive => write!(f, "multiple eboards, but none active"),
            Self::MultipleActive(serials) => {
                let list: Vec<&str> = serials.iter().map(AsRef::as_ref).collect();
                write!(f, "multiple active eboards: {}", list.join(", "))
            }
        }
    }
}

impl std::error::Error for SelectError {}

/// Selects the likely eboard from a listing.
pub fn select_eboard(boards: &[EBoardResponse]) -> Result<EBoardSerial, SelectError> {
    match boards {
        [] => Err(SelectError::NoEBoards),
        [only] => Ok(only.serialnr.clone()),
        _ => {
            let mut active: Vec<EBoardSerial> = boards
                .iter()
                .filter(|b| b.state == EBoardState::Active)
                .map(|b| b.serialnr.clone())
                .collect();

            match active.len() {
                0 => Err(SelectError::NoneActive),
                1 => Ok(active.remove(0)),
                _ => Err(SelectError::MultipleActive(active)),
            }
        }
    }
}

/// Lists eboards from `source` and selects the likely one.
///
/// # Errors
///
/// Returns the listing error, or a [`SelectError`] if the choice is not
/// unambiguous.
pub async fn autodetect(source: &dyn EBoardSource) -> Result<EBoardSerial> {
    let boards = source.eboards().await?;
    let serial = select_eboard(&boards)?;
    log::info!("Auto-selected eboard {} of {}", serial, boards.len());
    Ok(serial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn board(serial: &str, state: &str) -> EBoardResponse {
        EBoardResponse {
            serialnr: serial.into(),
            source: None,
            state: EBoardState::from(state),
            battery: None,
            comment: None,
            board: None,
            flipped: false,
            clock: None,
        }
    }

    struct StaticSource(Vec<EBoardResponse>);

    #[async_trait]
    impl EBoardSource for StaticSource {
        async fn eboards(&self) -> Result<Vec<EBoardResponse>> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl EBoardSource for FailingSource {
        async fn eboards(&self) -> Result<Vec<EBoardResponse>> {
            anyhow::bail!("connection refused")
        }
    }

    #[test]
    fn test_no_boards_is_error() {
        assert_eq!(select_eboard(&[]), Err(SelectError::NoEBoards));
    }

    #[test]
    fn test_single_board_selected_regardless_of_state() {
        let boards = [board("1234", "NOTRESPONDING")];
        assert_eq!(select_eboard(&boards), Ok(EBoardSerial::from("1234")));
    }

    #[test]
    fn test_unique_active_board_selected() {
        let boards = [board("7425", "ACTIVE"), board("1001", "")];
        assert_eq!(select_eboard(&boards), Ok(EBoardSerial::from("7425")));
    }

    #[test]
    fn test_multiple_active_boards_is_ambiguous() {
        let boards = [board("7425", "ACTIVE"), board("1001", "ACTIVE")];
        let err = select_eboard(&boards).unwrap_err();
        assert_eq!(
            err,
            SelectError::MultipleActive(vec!["7425".into(), "1001".into()])
        );
        assert_eq!(err.to_string(), "multiple active eboards: 7425, 1001");
    }

    #[test]
    fn test_multiple_boards_none_active() {
        let boards = [board("7425", "INACTIVE"), board("1001", "DELAYED")];
        assert_eq!(select_eboard(&boards), Err(SelectError::NoneActive));
    }

    #[tokio::test]
    async fn test_autodetect_uses_source() {
        let source = StaticSource(vec![board("1001", ""), board("7425", "ACTIVE")]);
        let serial = autodetect(&source).await.unwrap();
        assert_eq!(serial, EBoardSerial::from("7425"));
    }

    #[tokio::test]
    async fn test_autodetect_propagates_selection_error() {
        let source = StaticSource(vec![]);
        let err = autodetect(&source).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SelectError>(),
            Some(&SelectError::NoEBoards)
        );
    }

    #[tokio::test]
    async fn test_autodetect_propagates_lookup_error() {
        let err = autodetect(&FailingSource).await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
