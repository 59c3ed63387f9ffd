use dioxus::{logger::tracing::error, prelude::*};

use crate::Route;
use crate::utils::api::client_for;
use crate::utils::session::{AuthSession, SessionStore};

#[component]
pub fn Login() -> Element {
  static CSS: Asset = asset!("/assets/auth.css");
  let mut session = use_context::<Signal<Option<AuthSession>>>();
  let nav = use_navigator();

  let mut email: Signal<String> = use_signal(String::new);
  let mut password: Signal<String> = use_signal(String::new);
  let mut form_error: Signal<Option<String>> = use_signal(|| None);
  let mut busy: Signal<bool> = use_signal(|| false);

  rsx! {
    document::Stylesheet { href: CSS },
    div {
      class: "auth-page",
      form {
        class: "auth-card",
        onsubmit: move |_evt| async move {
          if busy() {
            return;
          }
          if email().trim().is_empty() || password().is_empty() {
            form_error.set(Some("Email and password are required".to_string()));
            return;
          }
          form_error.set(None);
          busy.set(true);

          match client_for(None).login(email().trim(), &password()).await {
            Ok(resp) => {
              let active = AuthSession::from(resp);
              if let Err(e) = SessionStore::save(&active) {
                // a failed persist still leaves this tab logged in
                error!("could not persist session: {}", e);
              }
              session.set(Some(active));
              nav.push(Route::Dashboard {});
            }
            Err(e) => form_error.set(Some(e.surface_message()))
          }
          busy.set(false);
        },
        h1 { "Welcome back" },
        p { class: "auth-subtitle", "Log in to trade and track your portfolio" },
        div {
          class: "form-group",
          label { class: "form-label", "Email" },
          input {
            class: "form-input",
            r#type: "email",
            name: "email",
            value: "{email}",
            oninput: move |evt| email.set(evt.value())
          }
        },
        div {
          class: "form-group",
          label { class: "form-label", "Password" },
          input {
            class: "form-input",
            r#type: "password",
            name: "password",
            value: "{password}",
            oninput: move |evt| password.set(evt.value())
          }
        },
        if let Some(message) = form_error() {
          div { class: "form-error", "{message}" }
        },
        button {
          r#type: "submit",
          class: "button button-primary auth-submit",
          disabled: busy(),
          if busy() { "Logging in…" } else { "Log in" }
        },
        p {
          class: "auth-switch",
          "New here? ",
          Link { to: Route::Signup {}, "Create an account" }
        }
      }
    }
  }
}
