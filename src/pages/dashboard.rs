use std::collections::HashMap;
use dioxus::{logger::tracing::error, prelude::*};
use tokio::sync::mpsc;

use crate::Route;
use crate::components::toast::{show_toast, ErrorToast};
use crate::utils::api::client_for;
use crate::utils::quotes::{apply_update, stream_quotes};
use crate::utils::server::{MarketStatus, Snapshot};

#[component]
pub fn Dashboard() -> Element {
  static CSS: Asset = asset!("/assets/dashboard.css");

  let mut snapshot: Signal<Snapshot> = use_signal(HashMap::new);
  let mut status: Signal<Option<MarketStatus>> = use_signal(|| None);
  let nav = use_navigator();

  // initial snapshot + market status over plain HTTP
  use_future(move || async move {
    let client = client_for(None);
    match client.snapshot().await {
      Ok(quotes) => snapshot.set(quotes),
      Err(e) => {
        error!("snapshot fetch failed: {}", e);
        show_toast("server-down-toast");
      }
    }
    match client.market_status().await {
      Ok(ms) => status.set(Some(ms)),
      Err(e) => error!("market status fetch failed: {}", e)
    }
  });

  // live updates: socket reader feeds the page through a channel
  use_future(move || async move {
    let (update_tx, mut update_rx) = mpsc::channel::<Snapshot>(1024);

    spawn(async move {
      if let Err(ws_err) = stream_quotes(update_tx).await {
        error!("quote stream failed: {}", ws_err);
        show_toast("stream-down-toast");
      }
    });

    while let Some(batch) = update_rx.recv().await {
      apply_update(&mut snapshot.write(), batch);
    }
  });

  // stable row order regardless of which symbols ticked last
  let mut quotes: Vec<_> = snapshot.read().values().cloned().collect();
  quotes.sort_by(|a, b| a.symbol.cmp(&b.symbol));
  let rows: Vec<(String, String, f64, f64)> = quotes
    .into_iter()
    .map(|q| {
      let name = q.name.clone().unwrap_or_else(|| q.symbol.clone());
      (q.symbol, name, q.price, q.change)
    })
    .collect();

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "dashboard-page",
      div {
        class: "dashboard-header",
        h1 { "Markets" },
        if let Some(ms) = status() {
          span {
            class: if ms.market_open { "market-status open" } else { "market-status closed" },
            "{ms.status}"
          }
        }
      },
      if rows.is_empty() {
        p { class: "dashboard-empty", "Waiting for market data…" }
      } else {
        table {
          class: "quotes-table",
          thead {
            tr {
              th { scope: "col", "Symbol" },
              th { scope: "col", "Name" },
              th { scope: "col", "Price" },
              th { scope: "col", "Change" },
            }
          },
          tbody {
            for (symbol, name, price, change) in rows {
              tr {
                key: "{symbol}",
                onclick: {
                  let symbol = symbol.clone();
                  move |_evt| {
                    nav.push(Route::Trade { symbol: symbol.clone() });
                  }
                },
                td { class: "cell-symbol", "{symbol}" },
                td { "{name}" },
                td { "${price:.2}" },
                td {
                  class: if change >= 0.0 { "cell-change positive" } else { "cell-change negative" },
                  if change >= 0.0 { "+{change:.2}%" } else { "{change:.2}%" }
                }
              }
            }
          }
        }
      },
      ErrorToast { id: "server-down-toast", content: "SERVER IS DOWN! Try again later." },
      ErrorToast { id: "stream-down-toast", content: "Live updates unavailable. Showing last snapshot." }
    }
  }
}
