//! Render decision for role-gated views.

use staffdeck_domain::{Role, User, ViewId, is_allowed};

/// Outcome of gating a view against the current user.
///
/// Denial is a normal renderable state, never an error. This is UI-layer
/// gating, not a trust boundary: the backend authorizes every request on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render the protected content.
    Granted,
    /// Render nothing. No user is signed in, and the caller is expected to
    /// route to the login screen instead of a gated view.
    Hidden,
    /// Render the access-denied panel in place of the protected content.
    Denied {
        /// Role held by the signed-in user.
        current_role: Role,
        /// Roles the view requires.
        required_roles: &'static [Role],
    },
}

/// Gates a view's content against the current user.
///
/// Views without role requirements render for any signed-in user; the
/// decision for everything else comes from [`is_allowed`].
#[must_use]
pub fn gate_view(user: Option<&User>, view: ViewId) -> GateDecision {
    let Some(user) = user else {
        return GateDecision::Hidden;
    };

    let required_roles = view.required_roles();
    if is_allowed(Some(user), required_roles) {
        GateDecision::Granted
    } else {
        GateDecision::Denied {
            current_role: user.role(),
            required_roles,
        }
    }
}
