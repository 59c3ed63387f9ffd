#![allow(non_snake_case)]

use std::time::Duration;
use dioxus::{logger::tracing::info, prelude::*};
use futures_util::StreamExt;
use rust_decimal::Decimal;

use crate::components::toast::show_toast;
use crate::utils::api::client_for;
use crate::utils::session::AuthSession;
use crate::utils::trade_form::{FormPhase, Side, TradeForm, SHAKE_MILLIS};

enum PanelAction {
  Open { side: Side },
  Submit,
}

/// Buy/sell order panel. All form rules live in [`TradeForm`]; this shell
/// wires signals and the two async calls (balance fetch on open, trade
/// submission) through a coroutine, one request in flight at a time.
#[component]
pub fn TradePanel(symbol: String, price: Decimal, change: f64, initial_side: Side, on_close: EventHandler<()>) -> Element {
  let session = use_context::<Signal<Option<AuthSession>>>();
  let mut form = use_signal(TradeForm::new);
  // bumped when a shake expires so the class comes back off
  let mut shake_epoch: Signal<u32> = use_signal(|| 0);

  let panel = use_coroutine({
    let symbol = symbol.clone();
    move |mut rx: UnboundedReceiver<PanelAction>| {
      let symbol = symbol.clone();
      async move {
        while let Some(action) = rx.next().await {
          match action {
            PanelAction::Open { side } => {
              let epoch = form.write().open(&symbol, side, price);
              let token = session.peek().as_ref().map(|s| s.token.clone());
              let client = client_for(token.as_deref());
              match client.balance().await {
                Ok(resp) => form.write().balance_loaded(epoch, resp.into()),
                Err(e) => form.write().balance_failed(epoch, &e.surface_message())
              }
            }
            PanelAction::Submit => {
              let ticket = form.write().begin_submit();
              // None: out-of-bound quantity or already submitting, no call made
              let Some(ticket) = ticket else {
                continue;
              };
              let epoch = form.peek().epoch();
              info!("submitting {} {} x{}", ticket.side, ticket.symbol, ticket.quantity);

              let token = session.peek().as_ref().map(|s| s.token.clone());
              let client = client_for(token.as_deref());
              match client.submit_trade(&ticket).await {
                Ok(resp) => {
                  form.write().submit_succeeded(epoch, resp.into());
                  if form.peek().phase() == FormPhase::Closed {
                    show_toast("trade-success-toast");
                    on_close.call(());
                  }
                }
                Err(e) => form.write().submit_failed(epoch, &e.surface_message())
              }
            }
          }
        }
      }
    }
  });

  // kick off the balance fetch once the panel mounts
  use_effect(move || {
    panel.send(PanelAction::Open { side: initial_side });
  });

  let mut step = move |down: bool| {
    let now = js_sys::Date::now();
    if down {
      form.write().decrement(now);
    } else {
      form.write().increment(now);
    }
    if form.peek().shake_active(now) {
      spawn(async move {
        async_std::task::sleep(Duration::from_millis(SHAKE_MILLIS as u64)).await;
        *shake_epoch.write() += 1;
      });
    }
  };

  // plain view values so the render below owns everything it shows
  let (phase, side, quantity_text, validation, cash, max_quantity, submitting, can_submit) = {
    let state = form.read();
    (
      state.phase(),
      state.side(),
      state.quantity_text().to_string(),
      state.validation_message().map(String::from),
      state.balance().map(|b| b.cash_available),
      state.max_quantity(),
      state.is_submitting(),
      state.can_submit(),
    )
  };
  let shaking = {
    // subscribe to the expiry bump as well as the form itself
    let _ = shake_epoch();
    form.read().shake_active(js_sys::Date::now())
  };
  let ticker = symbol.to_uppercase();
  let price_display = price.round_dp(2).to_string();
  let cash_display = cash.map(|c| c.round_dp(2).to_string());

  rsx! {
    div {
      class: "trade-panel",
      div {
        class: "trade-panel-header",
        h2 { "Trade" },
        button {
          class: "panel-close",
          onclick: move |_evt| {
            form.write().close();
            on_close.call(());
          },
          "✕"
        }
      },
      div {
        class: "trade-panel-symbol",
        span { class: "symbol", "{ticker}" },
        span {
          class: if change >= 0.0 { "change positive" } else { "change negative" },
          if change >= 0.0 { "+{change:.2}%" } else { "{change:.2}%" }
        }
      },
      div {
        class: "side-tabs",
        button {
          class: if side == Side::Buy { "side-tab active" } else { "side-tab" },
          onclick: move |_evt| form.write().set_side(Side::Buy),
          "Buy"
        },
        button {
          class: if side == Side::Sell { "side-tab active" } else { "side-tab" },
          onclick: move |_evt| form.write().set_side(Side::Sell),
          "Sell"
        }
      },
      if phase == FormPhase::Loading {
        p { class: "panel-loading", "Loading balance…" }
      } else {
        div {
          class: "field-row",
          label { "Market Price" },
          div {
            class: "field-value",
            input { r#type: "text", readonly: true, value: "{price_display}" },
            span { class: "unit", "USD" }
          }
        },
        div {
          class: if shaking { "field-row qty-row shake" } else { "field-row qty-row" },
          label { "Shares" },
          div {
            class: "field-value",
            button {
              class: "stepper",
              onclick: move |_evt| step(true),
              "−"
            },
            input {
              r#type: "text",
              inputmode: "numeric",
              placeholder: "0",
              value: "{quantity_text}",
              oninput: move |evt| form.write().set_quantity(&evt.value())
            },
            button {
              class: "stepper",
              onclick: move |_evt| step(false),
              "+"
            }
          }
        },
        div {
          class: "avbl-info",
          if side == Side::Buy {
            if let Some(cash) = cash_display {
              div {
                class: "avbl-line",
                span { "Avbl" },
                span { "{cash} USD" }
              }
            },
            div {
              class: "avbl-line",
              span { "Max Buy" },
              span { "{max_quantity} {ticker}" }
            }
          } else {
            div {
              class: "avbl-line",
              span { "Avbl" },
              span { "{max_quantity} {ticker}" }
            },
            div {
              class: "avbl-line",
              span { "Max Sell" },
              span { "{max_quantity} shares" }
            }
          }
        },
        if let Some(message) = validation {
          div { class: "form-error", "{message}" }
        },
        button {
          class: "button button-primary submit-trade",
          disabled: !can_submit,
          onclick: move |_evt| panel.send(PanelAction::Submit),
          if submitting {
            "Placing order…"
          } else if side == Side::Buy {
            "Buy {ticker}"
          } else {
            "Sell {ticker}"
          }
        }
      }
    }
  }
}
