use dioxus::prelude::*;
use crate::Route;

#[component]
pub fn Home() -> Element {
  static CSS: Asset = asset!("/assets/home.css");
  rsx! {
    document::Stylesheet {href: CSS},
    div {
      class: "home-page",
      section {
        class: "hero",
        h1 { "Trade Smarter with Live Market Data" },
        p { "Follow the market in real time, manage a virtual portfolio and place paper trades against live prices. AI-backed forecasts and a portfolio-aware assistant are built in." },
        Link {
          class: "cta-button",
          to: Route::Dashboard { },
          "Open the Markets"
        }
      },
      section {
        class: "features",
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"📈"}
            "Live Market Overview"
          }
          p { "Streaming quotes for the most traded US stocks, with daily change and market status at a glance. Jump into any symbol for its price history." }
        },
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"💼"}
            "Paper Trading Portfolio" }
          p { "Buy and sell whole shares from a virtual cash balance. Holdings, daily profit and overall return are valued against live prices on every visit." }
        },
        div {
          class: "feature-card",
          h3 {
            class: "feature-card-title",
            span {"🤖"}
            "AI Price Forecasts"
          }
          p { "Model-generated forecasts for the next day, week and month, plotted against recent closes. Ask the assistant anything about your positions." }
        }
      }
    }
  }
}
