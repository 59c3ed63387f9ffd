pub mod chat;
pub mod navbar;
pub mod toast;
pub mod trade_panel;
