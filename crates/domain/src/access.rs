//! Role-based access decisions.

use crate::user::{Role, User};

/// Decides whether a user may access content gated by a required-role set.
///
/// Rules, applied in order:
/// - an absent user is never allowed;
/// - [`Role::Admin`] is allowed regardless of the set. This is the single
///   admin special case in the codebase; callers must not add their own;
/// - an empty set restricts nothing beyond being authenticated;
/// - otherwise the user's role must appear in the set.
///
/// Pure and deterministic: no I/O, no clock, no hidden state.
#[must_use]
pub fn is_allowed(user: Option<&User>, required_roles: &[Role]) -> bool {
    let Some(user) = user else {
        return false;
    };

    if user.role() == Role::Admin {
        return true;
    }

    if required_roles.is_empty() {
        return true;
    }

    required_roles.contains(&user.role())
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::is_allowed;
    use crate::user::{Role, User, UserId};

    fn user_with_role(role: Role) -> User {
        let id = UserId::new("11").unwrap_or_else(|_| panic!("test id"));
        User::new(id, "Mina Park", "mina@example.com", role, "People Ops", None)
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Employee),
            Just(Role::Manager),
            Just(Role::Admin),
        ]
    }

    #[test]
    fn absent_user_is_never_allowed() {
        assert!(!is_allowed(None, &[]));
        assert!(!is_allowed(None, &[Role::Employee]));
        assert!(!is_allowed(None, Role::all()));
    }

    #[test]
    fn manager_follows_explicit_membership() {
        let manager = user_with_role(Role::Manager);
        assert!(is_allowed(Some(&manager), &[]));
        assert!(is_allowed(Some(&manager), &[Role::Manager]));
        assert!(!is_allowed(Some(&manager), &[Role::Employee]));
    }

    #[test]
    fn employee_cannot_enter_manager_views() {
        let employee = user_with_role(Role::Employee);
        assert!(!is_allowed(Some(&employee), &[Role::Admin, Role::Manager]));
        assert!(is_allowed(Some(&employee), &[Role::Employee]));
    }

    proptest! {
        #[test]
        fn admin_is_allowed_for_any_required_set(
            required in proptest::collection::vec(role_strategy(), 0..6)
        ) {
            let admin = user_with_role(Role::Admin);
            prop_assert!(is_allowed(Some(&admin), &required));
        }

        #[test]
        fn absent_user_is_denied_for_any_required_set(
            required in proptest::collection::vec(role_strategy(), 0..6)
        ) {
            prop_assert!(!is_allowed(None, &required));
        }

        #[test]
        fn non_admin_needs_membership_in_non_empty_sets(
            role in prop_oneof![Just(Role::Employee), Just(Role::Manager)],
            required in proptest::collection::vec(role_strategy(), 1..6)
        ) {
            let user = user_with_role(role);
            let decision = is_allowed(Some(&user), &required);
            prop_assert_eq!(decision, required.contains(&role));
        }
    }
}
