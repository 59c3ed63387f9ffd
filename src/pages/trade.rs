use std::time::Duration;
use dioxus::{logger::tracing::error, prelude::*};
use futures_util::StreamExt;
use js_sys::wasm_bindgen::JsValue;
use rust_decimal::Decimal;

use crate::components::toast::SuccessToast;
use crate::components::trade_panel::TradePanel;
use crate::utils::api::client_for;
use crate::utils::server::{HistoryPoint, Quote};
use crate::utils::trade_form::Side;

const CHART_PERIODS: [&str; 4] = ["1d", "5d", "1mo", "3mo"];
const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 240.0;

// Scale the series into viewBox coordinates, oldest point on the left.
// A flat series still draws (pinned to the bottom edge).
fn polyline_points(data: &[HistoryPoint], width: f64, height: f64) -> String {
  if data.len() < 2 {
    return String::new();
  }
  let (min, max) = data.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));
  let span = if (max - min).abs() < f64::EPSILON { 1.0 } else { max - min };
  let step = width / (data.len() - 1) as f64;

  data
    .iter()
    .enumerate()
    .map(|(i, p)| {
      let x = i as f64 * step;
      let y = height - ((p.value - min) / span) * height;
      format!("{:.1},{:.1}", x, y)
    })
    .collect::<Vec<_>>()
    .join(" ")
}

#[component]
pub fn Trade(symbol: String) -> Element {
  static CSS: Asset = asset!("/assets/trade.css");

  let mut quote: Signal<Option<Quote>> = use_signal(|| None);
  let mut chart_data: Signal<Vec<HistoryPoint>> = use_signal(|| vec![]);
  let mut chart_period: Signal<String> = use_signal(|| "1d".to_string());
  let mut clock: Signal<String> = use_signal(String::new);
  let mut panel_open: Signal<bool> = use_signal(|| false);
  let mut panel_side: Signal<Side> = use_signal(|| Side::Buy);

  // name/price/change come from the shared snapshot route
  use_future({
    let symbol = symbol.clone();
    move || {
      let symbol = symbol.clone();
      async move {
        match client_for(None).snapshot().await {
          Ok(snapshot) => {
            if let Some(q) = snapshot.get(&symbol.to_uppercase()) {
              quote.set(Some(q.clone()));
            }
          }
          Err(e) => error!("snapshot fetch failed: {}", e)
        }
      }
    }
  });

  // history loads through a coroutine so the period buttons and the
  // refresh loop share one in-flight path
  let history_loader = use_coroutine({
    let symbol = symbol.clone();
    move |mut rx: UnboundedReceiver<String>| {
      let symbol = symbol.clone();
      async move {
        while let Some(period) = rx.next().await {
          match client_for(None).history(&symbol, &period).await {
            Ok(resp) => {
              let mut points = resp.data;
              points.sort_by_key(|p| p.time);
              chart_data.set(points);
            }
            Err(e) => error!("history fetch failed for {}/{}: {}", symbol, period, e)
          }
        }
      }
    }
  });

  use_effect(move || {
    history_loader.send(chart_period.peek().clone());
  });

  // periodic refetch of the active period, like the ticking quote views
  use_future(move || async move {
    loop {
      async_std::task::sleep(Duration::from_secs(60)).await;
      history_loader.send(chart_period.peek().clone());
    }
  });

  // 1s wall clock next to the price
  use_future(move || async move {
    loop {
      let now = js_sys::Date::new_0();
      clock.set(String::from(now.to_locale_string("en-US", &JsValue::UNDEFINED)));
      async_std::task::sleep(Duration::from_secs(1)).await;
    }
  });

  let price = quote.read().as_ref().map(|q| q.price).unwrap_or(0.0);
  let change = quote.read().as_ref().map(|q| q.change).unwrap_or(0.0);
  let display_name = quote
    .read()
    .as_ref()
    .and_then(|q| q.name.clone())
    .unwrap_or_else(|| "Loading…".to_string());
  let points = polyline_points(&chart_data.read(), CHART_WIDTH, CHART_HEIGHT);

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "trade-page",
      div {
        class: "trade-header",
        div {
          h1 { "{symbol.to_uppercase()}" },
          p { class: "stock-name", "{display_name}" }
        },
        div {
          class: "trade-actions",
          button {
            class: "button button-buy",
            onclick: move |_evt| {
              panel_side.set(Side::Buy);
              panel_open.set(true);
            },
            "Buy"
          },
          button {
            class: "button button-sell",
            onclick: move |_evt| {
              panel_side.set(Side::Sell);
              panel_open.set(true);
            },
            "Sell"
          }
        }
      },
      div {
        class: "trade-price",
        span { class: "price", "${price:.2}" },
        span {
          class: if change >= 0.0 { "change positive" } else { "change negative" },
          if change >= 0.0 { "+{change:.2}%" } else { "{change:.2}%" }
        }
      },
      p { class: "trade-clock", "{clock}" },
      div {
        class: "period-selector",
        for period in CHART_PERIODS {
          button {
            key: "{period}",
            class: if *chart_period.read() == period { "period-button active" } else { "period-button" },
            onclick: move |_evt| {
              chart_period.set(period.to_string());
              history_loader.send(period.to_string());
            },
            "{period}"
          }
        }
      },
      div {
        class: "chart-card",
        if points.is_empty() {
          p { class: "chart-empty", "No price history for this period yet." }
        } else {
          svg {
            class: "price-line",
            view_box: "0 0 {CHART_WIDTH} {CHART_HEIGHT}",
            preserve_aspect_ratio: "none",
            polyline {
              fill: "none",
              stroke: "currentcolor",
              stroke_width: "2",
              points: "{points}"
            }
          }
        }
      },
      if panel_open() {
        TradePanel {
          symbol: symbol.to_uppercase(),
          price: Decimal::from_f64_retain(price).unwrap_or_default().round_dp(2),
          change,
          initial_side: panel_side(),
          on_close: move |_| panel_open.set(false)
        }
      },
      SuccessToast { id: "trade-success-toast", content: "Order filled. Balance updated." }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn series(values: &[f64]) -> Vec<HistoryPoint> {
    values
      .iter()
      .enumerate()
      .map(|(i, v)| HistoryPoint { time: i as i64, value: *v })
      .collect()
  }

  #[test]
  fn needs_two_points_to_draw() {
    assert_eq!(polyline_points(&series(&[]), 600.0, 240.0), "");
    assert_eq!(polyline_points(&series(&[100.0]), 600.0, 240.0), "");
  }

  #[test]
  fn spans_the_full_width_and_height() {
    let points = polyline_points(&series(&[100.0, 150.0, 200.0]), 600.0, 240.0);
    let coords: Vec<&str> = points.split(' ').collect();
    assert_eq!(coords.len(), 3);
    assert_eq!(coords[0], "0.0,240.0");   // min pinned to the bottom
    assert_eq!(coords[1], "300.0,120.0");
    assert_eq!(coords[2], "600.0,0.0");   // max at the top
  }

  #[test]
  fn flat_series_stays_on_one_line() {
    let points = polyline_points(&series(&[42.0, 42.0, 42.0]), 600.0, 240.0);
    for pair in points.split(' ') {
      let y = pair.split(',').nth(1).unwrap();
      assert_eq!(y, "240.0");
    }
  }
}
