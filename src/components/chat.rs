#![allow(non_snake_case)]

use dioxus::{logger::tracing::error, prelude::*};
use futures_util::StreamExt;
use uuid::Uuid;

use crate::utils::api::client_for;
use crate::utils::session::AuthSession;

#[derive(Debug, Clone, PartialEq)]
struct ChatMessage {
  id: Uuid,
  from_user: bool,
  text: String,
}

/// Floating assistant widget. The backend answers with the user's portfolio
/// in context, so the widget only appears with an active session.
#[component]
pub fn ChatWidget() -> Element {
  let session = use_context::<Signal<Option<AuthSession>>>();
  let mut open: Signal<bool> = use_signal(|| false);
  let mut draft: Signal<String> = use_signal(String::new);
  let mut waiting: Signal<bool> = use_signal(|| false);
  let mut messages: Signal<Vec<ChatMessage>> = use_signal(|| vec![]);

  let chat = use_coroutine(move |mut rx: UnboundedReceiver<String>| async move {
    while let Some(question) = rx.next().await {
      messages.write().push(ChatMessage { id: Uuid::new_v4(), from_user: true, text: question.clone() });
      waiting.set(true);

      let token = session.peek().as_ref().map(|s| s.token.clone());
      let client = client_for(token.as_deref());
      let text = match client.chat(&question).await {
        Ok(resp) => resp.reply,
        Err(e) => {
          error!("chat request failed: {}", e);
          e.surface_message()
        }
      };
      messages.write().push(ChatMessage { id: Uuid::new_v4(), from_user: false, text });
      waiting.set(false);
    }
  });

  if session.read().is_none() {
    return rsx! {};
  }

  rsx! {
    div {
      class: "chat-widget",
      if open() {
        div {
          class: "chat-panel",
          div {
            class: "chat-header",
            span { "Assistant" },
            button {
              class: "panel-close",
              onclick: move |_evt| open.set(false),
              "✕"
            }
          },
          div {
            class: "chat-messages",
            for msg in messages() {
              div {
                key: "{msg.id}",
                class: if msg.from_user { "chat-bubble user" } else { "chat-bubble bot" },
                "{msg.text}"
              }
            }
            if waiting() {
              div { class: "chat-bubble bot pending", "…" }
            }
          },
          form {
            class: "chat-input-row",
            onsubmit: move |_evt| {
              let question = draft().trim().to_string();
              if question.is_empty() || waiting() {
                return;
              }
              draft.set(String::new());
              chat.send(question);
            },
            input {
              r#type: "text",
              placeholder: "Ask about your portfolio…",
              value: "{draft}",
              oninput: move |evt| draft.set(evt.value())
            },
            button { r#type: "submit", class: "button button-primary", "Send" }
          }
        }
      },
      button {
        class: "chat-toggle",
        onclick: move |_evt| open.set(!open()),
        if open() { "✕" } else { "💬" }
      }
    }
  }
}
