//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod session;
mod user;
mod view;

pub use access::is_allowed;
pub use session::Session;
pub use user::{Role, User, UserId};
pub use view::ViewId;
