//! Application services and ports.

#![forbid(unsafe_code)]

mod access_gate;
mod session_ports;
mod session_service;
mod view_router;

pub use access_gate::{GateDecision, gate_view};
pub use session_ports::{AuthGateway, CredentialStore, LoginGrant, NewAccount, ProfileUpdate};
pub use session_service::{SessionService, SessionState};
pub use view_router::{RoutedView, navigation, route, select_view};
