#![allow(non_snake_case)]
mod pages;
mod components;
mod utils;

use components::chat::ChatWidget;
use components::navbar::NavBar;
use dioxus::prelude::*;
use pages::{
  dashboard::Dashboard, home::Home, login::Login, portfolio::Portfolio, prediction::Prediction,
  signup::Signup, trade::Trade
};
use utils::session::SessionStore;

#[derive(Routable, PartialEq, Clone)]
enum Route {
    #[layout(NavBar)]
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/signup")]
    Signup {},
    #[route("/dashboard")]
    Dashboard {},
    #[route("/trade/:symbol")]
    Trade { symbol: String },
    #[route("/portfolio")]
    Portfolio {},
    #[route("/prediction")]
    Prediction {},
    #[route("/:..route")]
    PageNotFound { route: Vec<String> }
}

fn main() {
    dioxus::launch(App);
}

fn App() -> Element {
    // one session signal for the whole tree, restored from storage on boot
    use_context_provider(|| Signal::new(SessionStore::load()));
    rsx! {
        Router::<Route> {},
        ChatWidget {}
    }
}

#[component]
fn PageNotFound(route: Vec<String>) -> Element {
    rsx! {
        h1 { "Page not found" }
        p { "We are terribly sorry, but the page you requested doesn't exist." }
        pre { color: "red", "log:\nattemped to navigate to: {route:?}" }
    }
}
