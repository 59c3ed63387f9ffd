use dioxus::prelude::*;

use crate::Route;
use crate::utils::api::client_for;

#[component]
pub fn Signup() -> Element {
  static CSS: Asset = asset!("/assets/auth.css");
  let nav = use_navigator();

  let mut name: Signal<String> = use_signal(String::new);
  let mut email: Signal<String> = use_signal(String::new);
  let mut password: Signal<String> = use_signal(String::new);
  let mut confirm: Signal<String> = use_signal(String::new);
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
          if name().trim().is_empty() || email().trim().is_empty() {
            form_error.set(Some("Name and email are required".to_string()));
            return;
          }
          if password().len() < 6 {
            form_error.set(Some("Password must be at least 6 characters".to_string()));
            return;
          }
          if password() != confirm() {
            form_error.set(Some("Passwords do not match".to_string()));
            return;
          }
          form_error.set(None);
          busy.set(true);

          match client_for(None).signup(name().trim(), email().trim(), &password()).await {
            Ok(_resp) => {
              nav.push(Route::Login {});
            }
            Err(e) => form_error.set(Some(e.surface_message()))
          }
          busy.set(false);
        },
        h1 { "Create your account" },
        p { class: "auth-subtitle", "Start with a virtual cash balance and trade live markets" },
        div {
          class: "form-group",
          label { class: "form-label", "Name" },
          input {
            class: "form-input",
            r#type: "text",
            name: "name",
            value: "{name}",
            oninput: move |evt| name.set(evt.value())
          }
        },
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
        div {
          class: "form-group",
          label { class: "form-label", "Confirm password" },
          input {
            class: "form-input",
            r#type: "password",
            name: "confirm",
            value: "{confirm}",
            oninput: move |evt| confirm.set(evt.value())
          }
        },
        if let Some(message) = form_error() {
          div { class: "form-error", "{message}" }
        },
        button {
          r#type: "submit",
          class: "button button-primary auth-submit",
          disabled: busy(),
          if busy() { "Creating account…" } else { "Sign up" }
        },
        p {
          class: "auth-switch",
          "Already registered? ",
          Link { to: Route::Login {}, "Log in" }
        }
      }
    }
  }
}
