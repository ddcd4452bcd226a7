//! Actions, subjects, and the ability values a role is granted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation categories that can be granted.
///
/// `manage` is the wildcard action: a grant of `manage` over a subject admits
/// every other action on that subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Manage,
    Read,
    Create,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Manage => "manage",
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "manage" => Some(Action::Manage),
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource categories an action applies to.
///
/// `all` is the wildcard subject: a grant over `all` admits every subject for
/// the granted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Bookings,
    Membership,
    Users,
    All,
}

impl Subject {
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Bookings => "bookings",
            Subject::Membership => "membership",
            Subject::Users => "users",
            Subject::All => "all",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "bookings" => Some(Subject::Bookings),
            "membership" => Some(Subject::Membership),
            "users" => Some(Subject::Users),
            "all" => Some(Subject::All),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single grant: one action over one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub action: Action,
    pub subject: Subject,
}

impl Ability {
    pub fn new(action: Action, subject: Subject) -> Self {
        Self { action, subject }
    }

    /// Whether this grant admits the requested pair.
    ///
    /// Widening is deliberate and limited to the two wildcards: `manage`
    /// stands in for any action, `all` for any subject. Nothing else widens;
    /// in particular `manage` over one subject never reaches another.
    pub fn allows(&self, action: Action, subject: Subject) -> bool {
        let action_ok = self.action == Action::Manage || self.action == action;
        let subject_ok = self.subject == Subject::All || self.subject == subject;
        action_ok && subject_ok
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action, self.subject)
    }
}

/// A role's abilities as an immutable value.
///
/// Built once from the static table and only read afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilitySet {
    abilities: Vec<Ability>,
}

impl AbilitySet {
    pub const fn new() -> Self {
        Self {
            abilities: Vec::new(),
        }
    }

    /// Add a grant, ignoring duplicates.
    pub fn add(&mut self, ability: Ability) {
        if !self.abilities.contains(&ability) {
            self.abilities.push(ability);
        }
    }

    /// Whether any grant in the set admits the requested pair.
    pub fn allows(&self, action: Action, subject: Subject) -> bool {
        self.abilities.iter().any(|a| a.allows(action, subject))
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl FromIterator<Ability> for AbilitySet {
    fn from_iter<T: IntoIterator<Item = Ability>>(iter: T) -> Self {
        let mut set = AbilitySet::new();
        for ability in iter {
            set.add(ability);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_grant_admits_only_its_pair() {
        let grant = Ability::new(Action::Read, Subject::Membership);

        assert!(grant.allows(Action::Read, Subject::Membership));
        assert!(!grant.allows(Action::Update, Subject::Membership));
        assert!(!grant.allows(Action::Read, Subject::Users));
    }

    #[test]
    fn manage_admits_every_action_on_its_subject() {
        let grant = Ability::new(Action::Manage, Subject::Bookings);

        for action in [
            Action::Manage,
            Action::Read,
            Action::Create,
            Action::Update,
            Action::Delete,
        ] {
            assert!(grant.allows(action, Subject::Bookings), "{action}");
        }
        assert!(!grant.allows(Action::Read, Subject::Users));
    }

    #[test]
    fn all_admits_every_subject_for_its_action() {
        let grant = Ability::new(Action::Read, Subject::All);

        for subject in [
            Subject::Bookings,
            Subject::Membership,
            Subject::Users,
            Subject::All,
        ] {
            assert!(grant.allows(Action::Read, subject), "{subject}");
        }
        assert!(!grant.allows(Action::Delete, Subject::Bookings));
    }

    #[test]
    fn set_is_deduplicated_and_deny_by_default() {
        let mut set = AbilitySet::new();
        assert!(!set.allows(Action::Read, Subject::Bookings));

        set.add(Ability::new(Action::Read, Subject::Bookings));
        set.add(Ability::new(Action::Read, Subject::Bookings));
        assert_eq!(set.abilities().len(), 1);
        assert!(set.allows(Action::Read, Subject::Bookings));
        assert!(!set.allows(Action::Create, Subject::Bookings));
    }

    #[test]
    fn closed_sets_round_trip_through_strings() {
        assert_eq!(Action::from_str("delete"), Some(Action::Delete));
        assert_eq!(Subject::from_str("membership"), Some(Subject::Membership));
        assert_eq!(Action::from_str("drop"), None);
        assert_eq!(Subject::from_str("invoices"), None);
        assert_eq!(Action::Manage.to_string(), "manage");
        assert_eq!(
            Ability::new(Action::Update, Subject::Membership).to_string(),
            "update:membership"
        );
    }
}
