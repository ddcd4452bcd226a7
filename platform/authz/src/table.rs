//! The static role → ability mapping.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ability::{Ability, AbilitySet, Action, Subject};

/// The permission table as authored: one row per role, each action paired
/// with the subjects it is granted over. This is configuration, kept as data
/// so it can be audited without reading any check logic.
const PERMISSIONS: &[(&str, &[(Action, &[Subject])])] = &[
    (
        "USER",
        &[
            (Action::Manage, &[Subject::Bookings]),
            (Action::Read, &[Subject::Membership, Subject::Users]),
            (Action::Create, &[Subject::Membership]),
            (Action::Update, &[Subject::Membership]),
        ],
    ),
    (
        "ADMIN",
        &[
            (Action::Manage, &[Subject::Membership]),
            (Action::Delete, &[Subject::Bookings]),
            (Action::Read, &[Subject::Users]),
        ],
    ),
    ("SUPERADMIN", &[(Action::Manage, &[Subject::Users])]),
];

static TABLE: Lazy<HashMap<&'static str, AbilitySet>> = Lazy::new(|| {
    PERMISSIONS
        .iter()
        .map(|(role, rows)| {
            let set = rows
                .iter()
                .flat_map(|(action, subjects)| {
                    subjects.iter().map(|subject| Ability::new(*action, *subject))
                })
                .collect();
            (*role, set)
        })
        .collect()
});

static NO_ABILITIES: AbilitySet = AbilitySet::new();

/// The ability set for a role. Roles absent from the table get the empty
/// set, so every query against them is denied rather than erroring.
pub fn abilities_for(role: &str) -> &'static AbilitySet {
    TABLE.get(role).unwrap_or(&NO_ABILITIES)
}

/// Does `role` hold `action` over `subject`? Pure lookup against static
/// configuration; identical inputs always give identical answers.
pub fn is_permitted(role: &str, action: Action, subject: Subject) -> bool {
    abilities_for(role).allows(action, subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIONS: [Action; 5] = [
        Action::Manage,
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];
    const SUBJECTS: [Subject; 4] = [
        Subject::Bookings,
        Subject::Membership,
        Subject::Users,
        Subject::All,
    ];

    #[test]
    fn unknown_roles_are_denied_everything() {
        for role in ["", "GUEST", "user", "Admin"] {
            assert!(abilities_for(role).is_empty());
            for action in ACTIONS {
                for subject in SUBJECTS {
                    assert!(!is_permitted(role, action, subject), "{role} {action} {subject}");
                }
            }
        }
    }

    #[test]
    fn user_grants_match_the_table() {
        assert!(is_permitted("USER", Action::Manage, Subject::Bookings));
        assert!(is_permitted("USER", Action::Read, Subject::Membership));
        assert!(is_permitted("USER", Action::Read, Subject::Users));
        assert!(is_permitted("USER", Action::Create, Subject::Membership));
        assert!(is_permitted("USER", Action::Update, Subject::Membership));

        // No implicit grant to an unlisted subject.
        assert!(!is_permitted("USER", Action::Delete, Subject::Users));
        assert!(!is_permitted("USER", Action::Create, Subject::Users));
    }

    #[test]
    fn manage_widens_within_its_subject_only() {
        // USER manages bookings, so every bookings action is admitted.
        assert!(is_permitted("USER", Action::Delete, Subject::Bookings));
        assert!(is_permitted("USER", Action::Update, Subject::Bookings));
        // ...but managing bookings says nothing about other subjects.
        assert!(!is_permitted("USER", Action::Update, Subject::Users));
    }

    #[test]
    fn admin_grants_match_the_table() {
        assert!(is_permitted("ADMIN", Action::Manage, Subject::Membership));
        assert!(is_permitted("ADMIN", Action::Update, Subject::Membership));
        assert!(is_permitted("ADMIN", Action::Delete, Subject::Bookings));
        assert!(is_permitted("ADMIN", Action::Read, Subject::Users));

        assert!(!is_permitted("ADMIN", Action::Read, Subject::Bookings));
        assert!(!is_permitted("ADMIN", Action::Create, Subject::Bookings));
        assert!(!is_permitted("ADMIN", Action::Delete, Subject::Users));
    }

    #[test]
    fn superadmin_manages_users_and_nothing_else() {
        for action in ACTIONS {
            assert!(is_permitted("SUPERADMIN", action, Subject::Users), "{action}");
        }
        assert!(!is_permitted("SUPERADMIN", Action::Read, Subject::Bookings));
        assert!(!is_permitted("SUPERADMIN", Action::Read, Subject::Membership));
    }

    #[test]
    fn lookups_are_idempotent() {
        for _ in 0..3 {
            assert!(is_permitted("USER", Action::Read, Subject::Membership));
            assert!(!is_permitted("USER", Action::Delete, Subject::Users));
        }
    }
}
