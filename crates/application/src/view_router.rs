//! Selection-to-view resolution with per-view gating.

use std::str::FromStr;

use staffdeck_domain::{User, ViewId, is_allowed};

use crate::access_gate::{GateDecision, gate_view};

/// A resolved selection: the view that will render and its gate decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutedView {
    /// The view the selection resolved to.
    pub view: ViewId,
    /// Whether the view's content may render.
    pub decision: GateDecision,
}

/// Resolves a raw selection string to a registered view.
///
/// Unknown or stale identifiers fall back to the dashboard; an invalid
/// selection is non-fatal by contract.
#[must_use]
pub fn select_view(selection: &str) -> ViewId {
    ViewId::from_str(selection).unwrap_or(ViewId::Dashboard)
}

/// Routes a selection for the current user, applying the access gate.
#[must_use]
pub fn route(user: Option<&User>, selection: &str) -> RoutedView {
    let view = select_view(selection);
    RoutedView {
        view,
        decision: gate_view(user, view),
    }
}

/// Lists the views the user may open, in navigation order.
///
/// The navigation menu and the per-view gate share [`is_allowed`], so a
/// view never appears in the menu only to deny on open.
#[must_use]
pub fn navigation(user: &User) -> Vec<ViewId> {
    ViewId::all()
        .iter()
        .copied()
        .filter(|view| is_allowed(Some(user), view.required_roles()))
        .collect()
}

#[cfg(test)]
mod tests {
    use staffdeck_domain::{Role, User, UserId, ViewId};

    use super::{GateDecision, navigation, route, select_view};

    fn user_with_role(role: Role) -> User {
        let id = UserId::new("8").unwrap_or_else(|_| panic!("test id"));
        User::new(id, "Tomas Abel", "tomas@example.com", role, "Sales", None)
    }

    #[test]
    fn unknown_selection_falls_back_to_dashboard() {
        assert_eq!(select_view("not-a-view"), ViewId::Dashboard);
        assert_eq!(select_view(""), ViewId::Dashboard);
    }

    #[test]
    fn known_selection_resolves_to_its_view() {
        assert_eq!(select_view("salary-calculator"), ViewId::SalaryCalculator);
    }

    #[test]
    fn routed_admin_view_denies_manager() {
        let manager = user_with_role(Role::Manager);

        let routed = route(Some(&manager), "tax-budget");

        assert_eq!(routed.view, ViewId::TaxBudget);
        assert_eq!(
            routed.decision,
            GateDecision::Denied {
                current_role: Role::Manager,
                required_roles: &[Role::Admin],
            }
        );
    }

    #[test]
    fn routing_without_user_hides_content() {
        let routed = route(None, "dashboard");
        assert_eq!(routed.decision, GateDecision::Hidden);
    }

    #[test]
    fn navigation_is_filtered_by_role() {
        let employee = navigation(&user_with_role(Role::Employee));
        let manager = navigation(&user_with_role(Role::Manager));
        let admin = navigation(&user_with_role(Role::Admin));

        assert_eq!(employee.len(), 9);
        assert!(!employee.contains(&ViewId::Payroll));
        assert_eq!(manager.len(), 15);
        assert!(manager.contains(&ViewId::Payroll));
        assert!(!manager.contains(&ViewId::TaxBudget));
        assert_eq!(admin.len(), 16);
    }
}
