//! Connection and subscribe handshake.
//!
//! LiveChess confirms a subscription with a `call` response, then starts
//! pushing `feed` messages under the feed id:
//!
//! ```text
//! >> {"call":"subscribe","id":42,
//!     "param":{"feed":"eboardevent","id":7,"param":{"serialnr":"7425"}}}
//! << {"id":42,"response":"call","param":null,"time":1503849460753}
//! ```

use super::error::FeedError;
use super::ids::{Id, IdGenerator};
use super::messages::{Call, ResponseKind};
use super::reader::read_response;
use crate::api::types::EBoardSerial;
use crate::ws::{self, WsReader, WsWriter};

/// Live connection produced by a successful handshake.
#[derive(Debug)]
pub(crate) struct Subscribed {
    pub(crate) writer: WsWriter,
    pub(crate) reader: WsReader,
    pub(crate) feed: Id,
}

/// Dials `url` and subscribes to the event feed of `serial`.
///
/// The transport is closed before any error is returned.
pub(crate) async fn connect(
    url: &str,
    serial: &EBoardSerial,
    ids: &IdGenerator,
) -> Result<Subscribed, FeedError> {
    log::debug!("Connecting to LiveChess feed: {}", url);

    let (mut writer, mut reader) = ws::connect(url)
        .await
        .map_err(|e| FeedError::Connect(format!("{e:#}")))?;

    match subscribe(&mut writer, &mut reader, serial, ids).await {
        Ok(feed) => {
            log::info!("Subscribed to eboard {} as feed {}", serial, feed);
            Ok(Subscribed {
                writer,
                reader,
                feed,
            })
        }
        Err(e) => {
            let _ = writer.close().await;
            Err(e)
        }
    }
}

async fn subscribe(
    writer: &mut WsWriter,
    reader: &mut WsReader,
    serial: &EBoardSerial,
    ids: &IdGenerator,
) -> Result<Id, FeedError> {
    let feed = ids.next_id();
    let call = Call::subscribe(ids.next_id(), feed, serial.clone());

    let text = serde_json::to_string(&call)
        .map_err(|e| FeedError::Protocol(format!("unencodable subscribe call: {e}")))?;
    log::debug!(">> {}", text);
    writer
        .send_text(&text)
        .await
        .map_err(|e| FeedError::Transport(format!("failed to subscribe: {e:#}")))?;

    let resp = read_response(reader).await?;
    match resp.response {
        ResponseKind::Call => {
            if resp.id != call.id {
                log::warn!(
                    "Subscribe confirmation id {} does not match call {}",
                    resp.id,
                    call.id
                );
            }
            Ok(feed)
        }
        ResponseKind::Error => Err(FeedError::Remote(resp.error_message())),
        kind => Err(FeedError::Protocol(format!(
            "expected subscribe confirmation, got {kind:?} for id {}",
            resp.id
        ))),
    }
}
