#![allow(non_snake_case)]

use dioxus::prelude::*;

use crate::Route;
use crate::utils::session::{AuthSession, SessionStore};

#[component]
pub fn NavBar() -> Element {
  static CSS: Asset = asset!("/assets/main.css");
  let mut session = use_context::<Signal<Option<AuthSession>>>();
  let nav = use_navigator();

  rsx! {
    document::Stylesheet { href: CSS },
    header {
      class: "navbar",
      Link { class: "brand", to: Route::Home {}, "TradeBoard" },
      nav {
        class: "nav-links",
        Link { to: Route::Dashboard {}, "Markets" },
        Link { to: Route::Portfolio {}, "Portfolio" },
        Link { to: Route::Prediction {}, "Predictions" },
      },
      div {
        class: "nav-session",
        if let Some(active) = session() {
          span { class: "nav-user", "{active.user.name}" },
          button {
            class: "button button-ghost",
            onclick: move |_evt| {
              SessionStore::clear();
              session.set(None);
              nav.push(Route::Home {});
            },
            "Log out"
          }
        } else {
          Link { class: "button button-ghost", to: Route::Login {}, "Log in" },
          Link { class: "button button-primary", to: Route::Signup {}, "Sign up" }
        }
      }
    },
    Outlet::<Route> {}
  }
}
