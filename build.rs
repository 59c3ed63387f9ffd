use dotenvy::dotenv;

fn main() {
   // Tell Cargo that if the env file changes, to rerun this build script.
  println!("cargo::rerun-if-changed=.env");

  // .env is optional: a missing file means localhost defaults
  let _ = dotenv();

  let api_base = std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:5008".to_string());
  println!("cargo::rustc-env=API_BASE_URL={}", api_base);

  let ws_url = std::env::var("WS_URL").unwrap_or_else(|_| "ws://localhost:5008/ws/stocks".to_string());
  println!("cargo::rustc-env=WS_URL={}", ws_url);
}
