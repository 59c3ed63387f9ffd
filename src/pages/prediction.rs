use dioxus::{logger::tracing::error, prelude::*};
use futures_util::StreamExt;

use crate::utils::api::client_for;
use crate::utils::server::PredictResponse;

const SYMBOLS: [&str; 8] = ["AAPL", "MSFT", "NVDA", "AMZN", "META", "TSLA", "GOOGL", "AMD"];
const TIMEFRAMES: [(&str, &str); 5] = [
  ("3 Days", "3d"),
  ("1 Week", "1w"),
  ("1 Month", "1mo"),
  ("3 Months", "3mo"),
  ("6 Months", "6mo"),
];

#[component]
pub fn Prediction() -> Element {
  static CSS: Asset = asset!("/assets/prediction.css");

  let mut symbol: Signal<String> = use_signal(|| SYMBOLS[0].to_string());
  let mut timeframe: Signal<String> = use_signal(|| "1mo".to_string());
  let mut result: Signal<Option<PredictResponse>> = use_signal(|| None);
  let mut load_error: Signal<Option<String>> = use_signal(|| None);
  let mut loading: Signal<bool> = use_signal(|| false);

  let predictor = use_coroutine(move |mut rx: UnboundedReceiver<(String, String)>| async move {
    while let Some((sym, tf)) = rx.next().await {
      loading.set(true);
      load_error.set(None);
      match client_for(None).predict(&sym, &tf).await {
        Ok(resp) => result.set(Some(resp)),
        Err(e) => {
          error!("predict failed for {}: {}", sym, e);
          result.set(None);
          load_error.set(Some(e.surface_message()));
        }
      }
      loading.set(false);
    }
  });

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "prediction-page",
      h1 { "AI Price Forecasts" },
      p { class: "prediction-subtitle", "Model-generated price targets from the last 60 trading days" },
      div {
        class: "prediction-controls",
        select {
          class: "form-input",
          value: "{symbol}",
          onchange: move |evt| symbol.set(evt.value()),
          for s in SYMBOLS {
            option { value: "{s}", "{s}" }
          }
        },
        div {
          class: "timeframe-buttons",
          for (label, value) in TIMEFRAMES {
            button {
              key: "{value}",
              class: if *timeframe.read() == value { "period-button active" } else { "period-button" },
              onclick: move |_evt| timeframe.set(value.to_string()),
              "{label}"
            }
          }
        },
        button {
          class: "button button-primary",
          disabled: loading(),
          onclick: move |_evt| predictor.send((symbol(), timeframe())),
          if loading() { "Predicting…" } else { "Predict" }
        }
      },
      if let Some(message) = load_error() {
        div { class: "form-error", "{message}" }
      },
      if let Some(forecast) = result() {
        div {
          class: "prediction-results",
          div {
            class: "forecast-cards",
            ForecastCard { label: "Next Day", value: forecast.predictions.next_day },
            ForecastCard { label: "One Week", value: forecast.predictions.one_week },
            ForecastCard { label: "One Month", value: forecast.predictions.one_month },
            ForecastCard { label: "Three Months", value: forecast.predictions.three_months },
          },
          h3 { "Recent closes" },
          table {
            class: "closes-table",
            tbody {
              tr {
                th { scope: "col", "Date" },
                th { scope: "col", "Close" },
              }
              // just the tail; the full series is for charting backends
              for (date, price) in forecast.historical_dates.iter().zip(forecast.historical_prices.iter()).rev().take(10) {
                tr {
                  key: "{date}",
                  td { "{date}" },
                  td { "${price:.2}" },
                }
              }
            }
          }
        }
      }
    }
  }
}

#[component]
fn ForecastCard(label: String, value: Option<f64>) -> Element {
  rsx! {
    div {
      class: "forecast-card",
      label { "{label}" },
      {match value {
        Some(v) => rsx! { span { class: "value", "${v:.2}" } },
        None => rsx! { span { class: "value muted", "—" } }
      }}
    }
  }
}
