use dioxus::logger::tracing::warn;
use serde::{Deserialize, Serialize};
use web_sys::{window, Storage};

use crate::utils::server::{ApiError, LoginResponse, UserProfile};

const SESSION_KEY: &str = "tradeboard.session";

/// The authenticated session, created at login and handed to whoever needs
/// it (via Dioxus context). Pages never read storage ad hoc; this is the
/// single owner of the persisted token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
  pub token: String,
  pub user: UserProfile,
}

impl From<LoginResponse> for AuthSession {
  fn from(resp: LoginResponse) -> Self {
    Self { token: resp.token, user: resp.user }
  }
}

// pure so it can be exercised without a browser
pub fn parse_session(raw: &str) -> Option<AuthSession> {
  serde_json::from_str(raw).ok()
}

pub struct SessionStore;

impl SessionStore {
  fn storage() -> Result<Storage, ApiError> {
    window()
      .and_then(|w| w.local_storage().ok().flatten())
      .ok_or_else(|| ApiError::SessionStorage("localStorage unavailable".to_string()))
  }

  /// A stored session that no longer parses (older layout, manual edits) is
  /// treated as absent, not as an error.
  pub fn load() -> Option<AuthSession> {
    let storage = Self::storage().ok()?;
    let raw = storage.get_item(SESSION_KEY).ok().flatten()?;
    let session = parse_session(&raw);
    if session.is_none() {
      warn!("discarding unreadable persisted session");
      let _ = storage.remove_item(SESSION_KEY);
    }
    session
  }

  pub fn save(session: &AuthSession) -> Result<(), ApiError> {
    let storage = Self::storage()?;
    let raw = serde_json::to_string(session).map_err(|e| ApiError::SessionStorage(e.to_string()))?;
    storage
      .set_item(SESSION_KEY, &raw)
      .map_err(|_| ApiError::SessionStorage("failed to persist session".to_string()))
  }

  pub fn clear() {
    if let Ok(storage) = Self::storage() {
      let _ = storage.remove_item(SESSION_KEY);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn roundtrips_through_the_persisted_layout() {
    let raw = r#"{
      "token": "eyJhbGciOi.fake.token",
      "user": {"id": "u1", "name": "Ada", "email": "ada@example.com", "role": "student"}
    }"#;
    let session = parse_session(raw).unwrap();
    assert_eq!(session.user.name, "Ada");
    assert_eq!(session.user.nickname, None);

    let reencoded = serde_json::to_string(&session).unwrap();
    assert_eq!(parse_session(&reencoded), Some(session));
  }

  #[test]
  fn unreadable_sessions_are_treated_as_absent() {
    assert_eq!(parse_session("not json"), None);
    assert_eq!(parse_session(r#"{"token": "t"}"#), None);
  }
}
