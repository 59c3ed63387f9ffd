use std::{collections::HashMap, fmt};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::trade_form::Side;

/* Server Requests */
#[derive(Debug, Serialize)]
pub struct LoginRequest {
  pub email: String,
  pub password: String
}

#[derive(Debug, Serialize)]
pub struct SignupRequest {
  pub name: String,
  pub email: String,
  pub password: String
}

#[derive(Debug, Serialize)]
pub struct TradeRequest {
  pub symbol: String,
  #[serde(rename = "tradeType")]
  pub trade_type: Side,
  pub quantity: u64,
  pub price: Decimal
}

#[derive(Debug, Serialize)]
pub struct PredictRequest {
  pub symbol: String,
  pub timeframe: String
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
  pub message: String
}

/* Server Responses */
// Serialize as well: the profile is embedded in the persisted session
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
  pub id: String,
  pub name: String,
  pub email: String,
  #[serde(default)]
  pub role: String,
  #[serde(default)]
  pub nickname: Option<String>,
  #[serde(default)]
  pub avatar: Option<String>
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
  pub token: String,
  pub user: UserProfile
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
  pub message: String
}

// Returned by both /api/balance and a successful /api/trade. The whole
// payload replaces the client's cached copy, fields are never merged.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BalanceResponse {
  pub usd: Decimal,
  pub shares: HashMap<String, u64>
}

impl From<BalanceResponse> for crate::utils::trade_form::BalanceSnapshot {
  fn from(resp: BalanceResponse) -> Self {
    Self { cash_available: resp.usd, holdings: resp.shares }
  }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Quote {
  pub symbol: String,
  #[serde(default)]
  pub name: Option<String>,
  pub price: f64,
  #[serde(default)]
  pub change: f64,
  #[serde(default)]
  pub volume: Option<f64>,
  #[serde(default)]
  pub market_open: Option<bool>,
  #[serde(default)]
  pub timestamp: Option<i64>
}

pub type Snapshot = HashMap<String, Quote>;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MarketStatus {
  pub market_open: bool,
  pub status: String
}

// intraday periods carry `value`, daily bars carry `close`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistoryPoint {
  pub time: i64,
  #[serde(alias = "close")]
  pub value: f64
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistoryResponse {
  #[serde(default)]
  pub symbol: String,
  #[serde(default)]
  pub period: String,
  pub data: Vec<HistoryPoint>
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PredictedPoints {
  pub next_day: Option<f64>,
  pub one_week: Option<f64>,
  pub one_month: Option<f64>,
  pub three_months: Option<f64>
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PredictResponse {
  pub historical_dates: Vec<String>,
  pub historical_prices: Vec<f64>,
  pub predictions: PredictedPoints
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  pub reply: String
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Holding {
  pub stock_symbol: String,
  pub stock_name: String,
  pub quantity: u64,
  pub average_price: f64,
  pub current_price: f64,
  #[serde(default)]
  pub previous_close: f64,
  pub total_value: f64
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PortfolioResponse {
  pub holdings: Vec<Holding>,
  #[serde(rename = "totalValue")]
  pub total_value: f64,
  #[serde(rename = "dailyProfit")]
  pub daily_profit: f64,
  #[serde(rename = "overallReturn")]
  pub overall_return: f64,
  #[serde(rename = "availableBalance")]
  pub available_balance: f64
}

// error bodies vary between {"error": ..} and {"message": ..} by endpoint
#[derive(Debug, Deserialize, Default)]
pub struct ErrorBody {
  #[serde(default)]
  pub error: Option<String>,
  #[serde(default)]
  pub message: Option<String>
}

// App Errors
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
  Transport(String),
  Status { code: u16, message: String },
  Decode(String),
  WsConnection(String),
  WsChannel(String),
  SessionStorage(String),
}

impl ApiError {
  // What the inline message box shows. Server-reported business errors are
  // surfaced verbatim, transport/decode failures get a generic line.
  pub fn surface_message(&self) -> String {
    match self {
      ApiError::Status { message, .. } => message.clone(),
      ApiError::Transport(_) | ApiError::Decode(_) => "Unable to reach the server. Please try again.".to_string(),
      ApiError::WsConnection(_) | ApiError::WsChannel(_) => "Live updates unavailable.".to_string(),
      ApiError::SessionStorage(_) => "Session unavailable. Please log in again.".to_string()
    }
  }
}

impl std::error::Error for ApiError {}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Transport(msg) => write!(f, "Transport error: {}", msg),
      ApiError::Status { code, message } => write!(f, "Server error ({}): {}", code, message),
      ApiError::Decode(msg) => write!(f, "Decode error: {}", msg),
      ApiError::WsConnection(msg) => write!(f, "Websocket connection error: {}", msg),
      ApiError::WsChannel(msg) => write!(f, "Websocket update channel error: {}", msg),
      ApiError::SessionStorage(msg) => write!(f, "Session storage error: {}", msg)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn trade_request_uses_backend_field_names() {
    let req = TradeRequest {
      symbol: "AAPL".to_string(),
      trade_type: Side::Buy,
      quantity: 3,
      price: dec!(187.20)
    };
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["tradeType"], "BUY");
    assert_eq!(json["quantity"], 3);
    assert_eq!(json["symbol"], "AAPL");
  }

  #[test]
  fn balance_response_decodes_shares_map() {
    let body = r#"{"usd": 700.05, "shares": {"AAPL": 5, "TSLA": 2}}"#;
    let parsed: BalanceResponse = serde_json::from_str(body).unwrap();
    assert_eq!(parsed.usd, dec!(700.05));
    assert_eq!(parsed.shares.get("AAPL"), Some(&5));
    assert_eq!(parsed.shares.get("MSFT"), None);
  }

  #[test]
  fn history_point_accepts_close_alias_from_daily_bars() {
    let intraday: HistoryPoint = serde_json::from_str(r#"{"time": 1700000000, "value": 187.2}"#).unwrap();
    let daily: HistoryPoint = serde_json::from_str(
      r#"{"time": 1700000000, "open": 180.0, "high": 190.0, "low": 179.5, "close": 187.2, "volume": 1000.0}"#
    ).unwrap();
    assert_eq!(intraday.value, daily.value);
  }

  #[test]
  fn status_errors_surface_server_text_verbatim() {
    let err = ApiError::Status { code: 400, message: "Insufficient balance".to_string() };
    assert_eq!(err.surface_message(), "Insufficient balance");

    let transport = ApiError::Transport("dns failure".to_string());
    assert!(!transport.surface_message().contains("dns"));
  }
}
