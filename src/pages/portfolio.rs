use dioxus::prelude::*;

use crate::Route;
use crate::utils::api::client_for;
use crate::utils::server::PortfolioResponse;
use crate::utils::session::AuthSession;

#[component]
pub fn Portfolio() -> Element {
  static CSS: Asset = asset!("/assets/portfolio.css");
  let session = use_context::<Signal<Option<AuthSession>>>();
  let mut data: Signal<Option<PortfolioResponse>> = use_signal(|| None);
  let mut load_error: Signal<Option<String>> = use_signal(|| None);

  use_future(move || async move {
    let Some(token) = session.peek().as_ref().map(|s| s.token.clone()) else {
      return;
    };
    match client_for(Some(&token)).portfolio().await {
      Ok(resp) => data.set(Some(resp)),
      Err(e) => load_error.set(Some(e.surface_message()))
    }
  });

  if session.read().is_none() {
    return rsx! {
      document::Stylesheet { href: CSS },
      div {
        class: "portfolio-page",
        div {
          class: "portfolio-guard",
          h1 { "Portfolio" },
          p { "Log in to see your balance and holdings." },
          Link { class: "button button-primary", to: Route::Login {}, "Log in" }
        }
      }
    };
  }

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "portfolio-page",
      h1 { "Portfolio" },
      if let Some(message) = load_error() {
        div { class: "form-error", "{message}" }
      },
      if let Some(summary) = data() {
        div {
          class: "summary-cards",
          div {
            class: "summary-card",
            label { "Total Value" },
            span { class: "value", "${summary.total_value:.2}" }
          },
          div {
            class: "summary-card",
            label { "Available Balance" },
            span { class: "value", "${summary.available_balance:.2}" }
          },
          div {
            class: "summary-card",
            label { "Daily Profit" },
            span {
              class: if summary.daily_profit >= 0.0 { "value positive" } else { "value negative" },
              if summary.daily_profit >= 0.0 { "+${summary.daily_profit:.2}" } else { "-${summary.daily_profit.abs():.2}" }
            }
          },
          div {
            class: "summary-card",
            label { "Overall Return" },
            span {
              class: if summary.overall_return >= 0.0 { "value positive" } else { "value negative" },
              if summary.overall_return >= 0.0 { "+{summary.overall_return:.2}%" } else { "{summary.overall_return:.2}%" }
            }
          }
        },
        if summary.holdings.is_empty() {
          p { class: "portfolio-empty", "No holdings yet. Buy your first shares from the markets page." }
        } else {
          table {
            class: "holdings-table",
            thead {
              tr {
                th { scope: "col", "Symbol" },
                th { scope: "col", "Name" },
                th { scope: "col", "Shares" },
                th { scope: "col", "Avg Price" },
                th { scope: "col", "Price" },
                th { scope: "col", "Value" },
              }
            },
            tbody {
              for holding in summary.holdings {
                tr {
                  key: "{holding.stock_symbol}",
                  td { class: "cell-symbol", "{holding.stock_symbol}" },
                  td { "{holding.stock_name}" },
                  td { "{holding.quantity}" },
                  td { "${holding.average_price:.2}" },
                  td {
                    class: if holding.current_price >= holding.average_price { "positive" } else { "negative" },
                    "${holding.current_price:.2}"
                  },
                  td { "${holding.total_value:.2}" },
                }
              }
            }
          }
        }
      } else {
        p { class: "portfolio-empty", "Loading portfolio…" }
      }
    }
  }
}
