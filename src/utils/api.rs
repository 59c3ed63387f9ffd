use serde::{de::DeserializeOwned, Serialize};

use crate::utils::server::{
  ApiError, BalanceResponse, ChatRequest, ChatResponse, ErrorBody, HistoryResponse, LoginRequest,
  LoginResponse, MarketStatus, MessageResponse, PortfolioResponse, PredictRequest, PredictResponse,
  SignupRequest, Snapshot, TradeRequest
};
use crate::utils::trade_form::OrderTicket;

pub const API_BASE_URL: &str = env!("API_BASE_URL");

/// Typed client for the dashboard backend. Holds the bearer token it was
/// built with; nothing here reads ambient storage, callers inject the
/// session token when they have one.
pub struct ApiClient {
  client: reqwest::Client,
  base_url: String,
  token: Option<String>
}

impl ApiClient {
  pub fn new(client: reqwest::Client, base_url: &str) -> Self {
    Self {
      client,
      base_url: base_url.trim_end_matches('/').to_string(),
      token: None
    }
  }

  pub fn with_token(mut self, token: &str) -> Self {
    self.token = Some(token.to_string());
    self
  }

  /* auth */
  pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    let req = LoginRequest { email: email.to_string(), password: password.to_string() };
    self.post_json("/api/login", &req).await
  }

  pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<MessageResponse, ApiError> {
    let req = SignupRequest { name: name.to_string(), email: email.to_string(), password: password.to_string() };
    self.post_json("/api/signup", &req).await
  }

  /* portfolio & trading */
  pub async fn balance(&self) -> Result<BalanceResponse, ApiError> {
    self.get_json("/api/balance").await
  }

  pub async fn submit_trade(&self, ticket: &OrderTicket) -> Result<BalanceResponse, ApiError> {
    let req = TradeRequest {
      symbol: ticket.symbol.clone(),
      trade_type: ticket.side,
      quantity: ticket.quantity,
      price: ticket.limit_price
    };
    self.post_json("/api/trade", &req).await
  }

  pub async fn portfolio(&self) -> Result<PortfolioResponse, ApiError> {
    self.get_json("/api/portfolio").await
  }

  /* market data */
  pub async fn snapshot(&self) -> Result<Snapshot, ApiError> {
    self.get_json("/api/snapshot").await
  }

  pub async fn market_status(&self) -> Result<MarketStatus, ApiError> {
    self.get_json("/api/market-status").await
  }

  pub async fn history(&self, symbol: &str, period: &str) -> Result<HistoryResponse, ApiError> {
    self.get_json(&format!("/api/history/{}/{}", symbol, period)).await
  }

  /* assistants */
  pub async fn predict(&self, symbol: &str, timeframe: &str) -> Result<PredictResponse, ApiError> {
    let req = PredictRequest { symbol: symbol.to_string(), timeframe: timeframe.to_string() };
    self.post_json("/api/predict", &req).await
  }

  pub async fn chat(&self, message: &str) -> Result<ChatResponse, ApiError> {
    let req = ChatRequest { message: message.to_string() };
    self.post_json("/api/chat", &req).await
  }

  /* plumbing */
  async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
    let mut req = self.client.get(format!("{}{}", self.base_url, path));
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }
    let resp = req.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    Self::decode(resp).await
  }

  async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
    let mut req = self.client.post(format!("{}{}", self.base_url, path)).json(body);
    if let Some(token) = &self.token {
      req = req.bearer_auth(token);
    }
    let resp = req.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    Self::decode(resp).await
  }

  async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(error_from_body(status.as_u16(), &body));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
  }
}

/// Client against the configured backend, with the bearer token attached
/// when the caller has a session.
pub fn client_for(token: Option<&str>) -> ApiClient {
  let client = ApiClient::new(reqwest::Client::new(), API_BASE_URL);
  match token {
    Some(t) => client.with_token(t),
    None => client
  }
}

// Non-2xx bodies are {"error": ..} or {"message": ..} depending on the
// endpoint; anything else falls back to a status line.
pub fn error_from_body(status: u16, body: &str) -> ApiError {
  let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
  let message = parsed
    .error
    .or(parsed.message)
    .unwrap_or_else(|| format!("Request failed ({})", status));
  ApiError::Status { code: status, message }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn prefers_error_field_then_message_field() {
    let err = error_from_body(400, r#"{"error": "Insufficient shares"}"#);
    assert_eq!(err, ApiError::Status { code: 400, message: "Insufficient shares".to_string() });

    let err = error_from_body(401, r#"{"message": "Invalid email or password"}"#);
    assert_eq!(err, ApiError::Status { code: 401, message: "Invalid email or password".to_string() });
  }

  #[test]
  fn falls_back_to_status_line_for_opaque_bodies() {
    let err = error_from_body(502, "<html>Bad Gateway</html>");
    assert_eq!(err, ApiError::Status { code: 502, message: "Request failed (502)".to_string() });

    let err = error_from_body(500, "");
    assert_eq!(err, ApiError::Status { code: 500, message: "Request failed (500)".to_string() });
  }
}
