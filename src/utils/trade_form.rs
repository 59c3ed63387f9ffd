use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
  Buy,
  Sell,
}

impl fmt::Display for Side {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Buy => write!(f, "BUY"),
      Self::Sell => write!(f, "SELL"),
    }
  }
}

impl FromStr for Side {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_lowercase().as_str() {
      "buy" => Ok(Side::Buy),
      "sell" => Ok(Side::Sell),
      _ => Err(format!("invalid trade side: {}", s))
    }
  }
}

// The client's cached copy of server-authoritative cash and holdings.
// Only ever replaced wholesale with a server payload, never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSnapshot {
  pub cash_available: Decimal,
  pub holdings: HashMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
  Idle,
  Loading,
  Ready,
  Submitting,
  Closed,
}

// One of these exists per submission attempt and dies with the response
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTicket {
  pub symbol: String,
  pub side: Side,
  pub quantity: u64,
  pub limit_price: Decimal,
}

// how long the bound-reached shake stays visible
pub const SHAKE_MILLIS: f64 = 400.0;

const EXCEEDS_BALANCE: &str = "Exceeds available balance";
const EXCEEDS_HOLDING: &str = "Exceeds current holding";

/// Order-entry state machine for the trade panel. Owns everything the form
/// shows: the active side, the typed quantity, the derived max, the inline
/// message, and the request phase. Async completions must present the epoch
/// they were issued under; results from a superseded open are dropped.
pub struct TradeForm {
  phase: FormPhase,
  epoch: u64,
  symbol: String,
  side: Side,
  limit_price: Decimal,
  quantity_text: String,
  validation_message: Option<String>,
  balance: Option<BalanceSnapshot>,
  shake_until: Option<f64>,
}

impl TradeForm {
  pub fn new() -> Self {
    Self {
      phase: FormPhase::Idle,
      epoch: 0,
      symbol: String::new(),
      side: Side::Buy,
      limit_price: Decimal::ZERO,
      quantity_text: String::new(),
      validation_message: None,
      balance: None,
      shake_until: None,
    }
  }

  /* accessors */

  pub fn phase(&self) -> FormPhase {
    self.phase
  }

  // tag for in-flight async completions
  pub fn epoch(&self) -> u64 {
    self.epoch
  }

  pub fn side(&self) -> Side {
    self.side
  }

  pub fn symbol(&self) -> &str {
    &self.symbol
  }

  pub fn limit_price(&self) -> Decimal {
    self.limit_price
  }

  pub fn quantity_text(&self) -> &str {
    &self.quantity_text
  }

  pub fn validation_message(&self) -> Option<&str> {
    self.validation_message.as_deref()
  }

  pub fn balance(&self) -> Option<&BalanceSnapshot> {
    self.balance.as_ref()
  }

  pub fn is_submitting(&self) -> bool {
    self.phase == FormPhase::Submitting
  }

  // typed value, when it is valid integer text
  pub fn quantity(&self) -> Option<u64> {
    if self.quantity_text.is_empty() {
      return None;
    }
    self.quantity_text.parse::<u64>().ok()
  }

  // Derived on every read, never stored.
  pub fn max_quantity(&self) -> u64 {
    let Some(balance) = &self.balance else {
      return 0;
    };
    match self.side {
      Side::Buy => {
        if self.limit_price <= Decimal::ZERO {
          return 0;
        }
        // floor: an order's cost must never exceed available cash
        (balance.cash_available / self.limit_price).floor().to_u64().unwrap_or(0)
      }
      Side::Sell => balance.holdings.get(&self.symbol).copied().unwrap_or(0),
    }
  }

  pub fn can_submit(&self) -> bool {
    if self.phase != FormPhase::Ready {
      return false;
    }
    match self.quantity() {
      Some(q) => q > 0 && q <= self.max_quantity(),
      None => false
    }
  }

  /* transitions */

  /// Open the panel for a symbol. Any state from a previous session is
  /// cleared and the returned epoch tags the balance fetch this open expects.
  pub fn open(&mut self, symbol: &str, side: Side, limit_price: Decimal) -> u64 {
    self.epoch += 1;
    self.phase = FormPhase::Loading;
    self.symbol = symbol.to_string();
    self.side = side;
    self.limit_price = limit_price;
    self.quantity_text.clear();
    self.validation_message = None;
    self.balance = None;
    self.shake_until = None;
    self.epoch
  }

  pub fn balance_loaded(&mut self, epoch: u64, snapshot: BalanceSnapshot) {
    if epoch != self.epoch || self.phase != FormPhase::Loading {
      return;
    }
    self.balance = Some(snapshot);
    self.phase = FormPhase::Ready;
  }

  pub fn balance_failed(&mut self, epoch: u64, message: &str) {
    if epoch != self.epoch || self.phase != FormPhase::Loading {
      return;
    }
    // no snapshot means max derives to 0, so submit stays disabled
    self.validation_message = Some(message.to_string());
    self.phase = FormPhase::Ready;
  }

  /// Buy/sell bounds differ, so a quantity typed under one side must not
  /// survive a switch to the other.
  pub fn set_side(&mut self, side: Side) {
    if self.phase != FormPhase::Ready && self.phase != FormPhase::Loading {
      return;
    }
    self.side = side;
    self.quantity_text.clear();
    self.validation_message = None;
  }

  pub fn set_limit_price(&mut self, price: Decimal) {
    self.limit_price = price;
    self.refresh_validation();
  }

  /// Whole shares only: anything but ASCII digits is dropped at the input
  /// level, for both sides. Over-max input is recorded as typed (with a
  /// warning), not clamped, so the user sees and corrects their own number.
  pub fn set_quantity(&mut self, text: &str) {
    if self.phase != FormPhase::Ready {
      return;
    }
    if !text.chars().all(|c| c.is_ascii_digit()) {
      return;
    }
    self.quantity_text = text.to_string();
    self.refresh_validation();
  }

  pub fn increment(&mut self, now: f64) {
    if self.phase != FormPhase::Ready {
      return;
    }
    let current = self.quantity().unwrap_or(0);
    if current >= self.max_quantity() {
      self.shake_until = Some(now + SHAKE_MILLIS);
      return;
    }
    self.quantity_text = (current + 1).to_string();
    self.refresh_validation();
  }

  pub fn decrement(&mut self, now: f64) {
    if self.phase != FormPhase::Ready {
      return;
    }
    let current = self.quantity().unwrap_or(0);
    if current == 0 {
      self.shake_until = Some(now + SHAKE_MILLIS);
      return;
    }
    self.quantity_text = (current - 1).to_string();
    self.refresh_validation();
  }

  pub fn shake_active(&self, now: f64) -> bool {
    match self.shake_until {
      Some(until) => now < until,
      None => false
    }
  }

  /// Guarded submission start. Yields the order ticket to send, or None when
  /// the quantity is absent/zero/out-of-bound or a request is already in
  /// flight — in which case no network call may be made.
  pub fn begin_submit(&mut self) -> Option<OrderTicket> {
    if !self.can_submit() {
      return None;
    }
    let quantity = self.quantity()?;
    self.phase = FormPhase::Submitting;
    Some(OrderTicket {
      symbol: self.symbol.clone(),
      side: self.side,
      quantity,
      limit_price: self.limit_price,
    })
  }

  pub fn submit_succeeded(&mut self, epoch: u64, snapshot: BalanceSnapshot) {
    if epoch != self.epoch || self.phase != FormPhase::Submitting {
      return;
    }
    self.balance = Some(snapshot);
    self.quantity_text.clear();
    self.validation_message = None;
    self.phase = FormPhase::Closed;
  }

  pub fn submit_failed(&mut self, epoch: u64, message: &str) {
    if epoch != self.epoch || self.phase != FormPhase::Submitting {
      return;
    }
    // quantity preserved so the user can correct and re-submit
    self.validation_message = Some(message.to_string());
    self.phase = FormPhase::Ready;
  }

  /// Closing bumps the epoch, so a fetch still in flight resolves into the
  /// void instead of mutating a panel the user already dismissed.
  pub fn close(&mut self) {
    self.epoch += 1;
    self.phase = FormPhase::Idle;
    self.quantity_text.clear();
    self.validation_message = None;
    self.shake_until = None;
  }

  fn refresh_validation(&mut self) {
    if self.quantity_text.is_empty() {
      self.validation_message = None;
      return;
    }
    let over = match self.quantity_text.parse::<u64>() {
      Ok(q) => q > self.max_quantity(),
      // all-digit text that overflows u64 is over any possible max
      Err(_) => true
    };
    self.validation_message = if over {
      match self.side {
        Side::Buy => Some(EXCEEDS_BALANCE.to_string()),
        Side::Sell => Some(EXCEEDS_HOLDING.to_string()),
      }
    } else {
      None
    };
  }
}

impl Default for TradeForm {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  fn snapshot(cash: Decimal, holdings: &[(&str, u64)]) -> BalanceSnapshot {
    BalanceSnapshot {
      cash_available: cash,
      holdings: holdings.iter().map(|(s, q)| (s.to_string(), *q)).collect(),
    }
  }

  fn ready_form(symbol: &str, side: Side, price: Decimal, snap: BalanceSnapshot) -> TradeForm {
    let mut form = TradeForm::new();
    let epoch = form.open(symbol, side, price);
    form.balance_loaded(epoch, snap);
    assert_eq!(form.phase(), FormPhase::Ready);
    form
  }

  #[test]
  fn buy_max_floors_cash_over_price() {
    let form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    assert_eq!(form.max_quantity(), 2);
  }

  #[test]
  fn buy_max_is_zero_when_price_is_zero() {
    let form = ready_form("AAPL", Side::Buy, dec!(0), snapshot(dec!(500), &[]));
    assert_eq!(form.max_quantity(), 0);
  }

  #[test]
  fn sell_max_is_holding_or_zero() {
    let snap = snapshot(dec!(1000), &[("AAPL", 5)]);
    let form = ready_form("AAPL", Side::Sell, dec!(50), snap.clone());
    assert_eq!(form.max_quantity(), 5);

    let form = ready_form("TSLA", Side::Sell, dec!(50), snap);
    assert_eq!(form.max_quantity(), 0);
  }

  #[test]
  fn submit_enabled_only_inside_bounds() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));

    assert!(!form.can_submit()); // empty quantity
    form.set_quantity("0");
    assert!(!form.can_submit());
    form.set_quantity("1");
    assert!(form.can_submit());
    form.set_quantity("2");
    assert!(form.can_submit());
    form.set_quantity("3");
    assert!(!form.can_submit());
    assert_eq!(form.begin_submit(), None);
  }

  #[test]
  fn rejects_fractional_and_signed_input() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(10), snapshot(dec!(100), &[]));
    form.set_quantity("3");
    form.set_quantity("3.5");
    assert_eq!(form.quantity_text(), "3");
    form.set_quantity("-2");
    assert_eq!(form.quantity_text(), "3");
    form.set_quantity("abc");
    assert_eq!(form.quantity_text(), "3");
  }

  #[test]
  fn over_max_input_is_recorded_with_warning_not_clamped() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.set_quantity("9");
    assert_eq!(form.quantity_text(), "9");
    assert_eq!(form.validation_message(), Some("Exceeds available balance"));
    assert!(!form.can_submit());

    let mut form = ready_form("AAPL", Side::Sell, dec!(50), snapshot(dec!(0), &[("AAPL", 2)]));
    form.set_quantity("3");
    assert_eq!(form.validation_message(), Some("Exceeds current holding"));
  }

  #[test]
  fn overflowing_digit_string_warns_instead_of_panicking() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(1), snapshot(dec!(100), &[]));
    form.set_quantity("99999999999999999999999999");
    assert_eq!(form.validation_message(), Some("Exceeds available balance"));
    assert!(!form.can_submit());
  }

  #[test]
  fn side_switch_resets_quantity_and_message() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[("AAPL", 5)]));
    form.set_quantity("9");
    assert!(form.validation_message().is_some());

    form.set_side(Side::Sell);
    assert_eq!(form.quantity_text(), "");
    assert_eq!(form.validation_message(), None);
    assert_eq!(form.max_quantity(), 5);
  }

  #[test]
  fn increment_clamps_and_shakes_at_bound() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.increment(1000.0);
    form.increment(1000.0);
    assert_eq!(form.quantity(), Some(2));
    assert!(!form.shake_active(1000.0));

    form.increment(1000.0);
    assert_eq!(form.quantity(), Some(2));
    assert!(form.shake_active(1000.0));
    // transient: gone once the expiry passes
    assert!(!form.shake_active(1000.0 + SHAKE_MILLIS));
  }

  #[test]
  fn decrement_stops_at_zero_with_shake() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.decrement(5.0);
    assert_eq!(form.quantity(), None);
    assert!(form.shake_active(5.0));

    form.set_quantity("1");
    form.decrement(5.0);
    assert_eq!(form.quantity(), Some(0));
  }

  #[test]
  fn successful_submit_replaces_snapshot_and_clears_form() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.set_quantity("2");
    let ticket = form.begin_submit().unwrap();
    assert_eq!(ticket.quantity, 2);
    assert_eq!(ticket.side, Side::Buy);
    assert_eq!(ticket.limit_price, dec!(50));

    let fresh = snapshot(dec!(1), &[("AAPL", 2)]);
    form.submit_succeeded(1, fresh.clone());
    assert_eq!(form.phase(), FormPhase::Closed);
    assert_eq!(form.balance(), Some(&fresh));
    assert_eq!(form.quantity_text(), "");
  }

  #[test]
  fn failed_submit_keeps_quantity_and_surfaces_message() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.set_quantity("2");
    let before = form.balance().cloned();
    assert!(form.begin_submit().is_some());

    form.submit_failed(1, "Insufficient balance");
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.quantity_text(), "2");
    assert_eq!(form.validation_message(), Some("Insufficient balance"));
    assert_eq!(form.balance().cloned(), before);
  }

  #[test]
  fn second_submit_while_in_flight_is_a_noop() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.set_quantity("1");
    assert!(form.begin_submit().is_some());
    assert!(form.is_submitting());
    // no second ticket, so no second network call can be issued
    assert_eq!(form.begin_submit(), None);
  }

  #[test]
  fn stale_balance_results_are_dropped() {
    let mut form = TradeForm::new();
    let first = form.open("AAPL", Side::Buy, dec!(50));
    let second = form.open("TSLA", Side::Buy, dec!(200));

    form.balance_loaded(first, snapshot(dec!(101), &[]));
    assert_eq!(form.phase(), FormPhase::Loading);
    assert!(form.balance().is_none());

    form.balance_loaded(second, snapshot(dec!(400), &[]));
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.max_quantity(), 2);
  }

  #[test]
  fn results_after_close_are_ignored() {
    let mut form = TradeForm::new();
    let epoch = form.open("AAPL", Side::Buy, dec!(50));
    form.close();
    form.balance_loaded(epoch, snapshot(dec!(101), &[]));
    assert_eq!(form.phase(), FormPhase::Idle);
    assert!(form.balance().is_none());
  }

  #[test]
  fn balance_fetch_failure_lands_ready_with_message_and_zero_max() {
    let mut form = TradeForm::new();
    let epoch = form.open("AAPL", Side::Buy, dec!(50));
    form.balance_failed(epoch, "Invalid token");
    assert_eq!(form.phase(), FormPhase::Ready);
    assert_eq!(form.validation_message(), Some("Invalid token"));
    assert_eq!(form.max_quantity(), 0);
    assert!(!form.can_submit());
  }

  #[test]
  fn reopen_clears_previous_session_state() {
    let mut form = ready_form("AAPL", Side::Buy, dec!(50), snapshot(dec!(101), &[]));
    form.set_quantity("9");
    assert!(form.validation_message().is_some());

    let epoch = form.open("AAPL", Side::Sell, dec!(50));
    assert_eq!(form.phase(), FormPhase::Loading);
    assert_eq!(form.quantity_text(), "");
    assert_eq!(form.validation_message(), None);
    assert!(form.balance().is_none());
    let _ = epoch;
  }
}
