use dioxus::logger::tracing::{info, warn};
use futures::stream::SplitSink;
use futures_util::StreamExt;
use gloo_net::websocket::{futures::WebSocket, Message};
use serde::Deserialize;
use tokio::sync::mpsc::Sender;

use crate::utils::server::{ApiError, Snapshot};

pub const WS_URL: &str = env!("WS_URL");

/* Server push events */
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
  StockUpdate { data: Snapshot },
  Error { message: String },
  Info { message: String },
}

/// Read the live quote feed and fan batches into the page over the channel.
/// Returns when the socket closes; the dashboard keeps showing the last
/// snapshot it has.
pub async fn stream_quotes(update_tx: Sender<Snapshot>) -> Result<(), ApiError> {
  let ws = WebSocket::open(WS_URL).map_err(|e| ApiError::WsConnection(e.to_string()))?;
  // the feed is one-way; the write half is kept only so the socket stays open
  let (_write, mut read): (SplitSink<WebSocket, Message>, _) = ws.split();

  while let Some(Ok(server_msg)) = read.next().await {
    let Message::Text(raw) = server_msg else {
      continue;
    };
    match serde_json::from_str::<StreamEvent>(&raw) {
      Ok(StreamEvent::StockUpdate { data }) => {
        update_tx.send(data).await.map_err(|e| ApiError::WsChannel(e.to_string()))?;
      }
      Ok(StreamEvent::Error { message }) => warn!("stream error from server: {}", message),
      Ok(StreamEvent::Info { message }) => info!("stream info: {}", message),
      Err(e) => warn!("undecodable stream frame: {}", e)
    }
  }
  info!("quote stream closed");
  Ok(())
}

/// Fold a push batch into the snapshot map, last write wins per symbol.
/// Push payloads often omit the display name, so a known name survives.
pub fn apply_update(snapshot: &mut Snapshot, batch: Snapshot) {
  for (symbol, mut quote) in batch {
    if quote.name.is_none() {
      if let Some(previous) = snapshot.get(&symbol) {
        quote.name = previous.name.clone();
      }
    }
    snapshot.insert(symbol, quote);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn decode(raw: &str) -> StreamEvent {
    serde_json::from_str(raw).unwrap()
  }

  #[test]
  fn decodes_stock_update_batches() {
    let event = decode(
      r#"{"type": "stock_update", "data": {"AAPL": {"symbol": "AAPL", "price": 187.2, "change": 0.4, "timestamp": 1700000000, "market_open": true}}}"#
    );
    let StreamEvent::StockUpdate { data } = event else {
      panic!("expected a stock update");
    };
    assert_eq!(data["AAPL"].price, 187.2);
    assert_eq!(data["AAPL"].market_open, Some(true));
  }

  #[test]
  fn last_write_wins_and_names_survive() {
    let mut snapshot: Snapshot = serde_json::from_str(
      r#"{"AAPL": {"symbol": "AAPL", "name": "Apple Inc.", "price": 180.0, "change": 0.0}}"#
    ).unwrap();

    let batch: Snapshot = serde_json::from_str(
      r#"{"AAPL": {"symbol": "AAPL", "price": 187.2, "change": 0.4}}"#
    ).unwrap();
    apply_update(&mut snapshot, batch);

    assert_eq!(snapshot["AAPL"].price, 187.2);
    assert_eq!(snapshot["AAPL"].name.as_deref(), Some("Apple Inc."));
  }
}
