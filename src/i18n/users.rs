//! Mock user table
//!
//! Stands in for a user store: four fixed users, keyed by id, read-only after startup.

use std::collections::HashMap;

/// A mocked user profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Preferred locale; may name a locale the server does not support
    pub locale: Option<String>,
    /// Preferred timezone; may not be a valid identifier
    pub timezone: Option<String>,
}

impl User {
    fn new(id: i64, name: &str, locale: Option<&str>, timezone: Option<&str>) -> Self {
        Self {
            id,
            name: name.to_string(),
            locale: locale.map(String::from),
            timezone: timezone.map(String::from),
        }
    }
}

/// Immutable user lookup table
#[derive(Debug, Clone, Default)]
pub struct UserTable {
    users: HashMap<i64, User>,
}

impl UserTable {
    /// Build the fixed table of mocked users
    pub fn builtin() -> Self {
        // "kg" and "Vulcan" are deliberately unsupported/invalid
        Self::from_users(vec![
            User::new(1, "Balou", Some("fr"), Some("Europe/Paris")),
            User::new(2, "Beyonce", Some("en"), Some("US/Central")),
            User::new(3, "Spock", Some("kg"), Some("Vulcan")),
            User::new(4, "Teletubby", None, Some("Europe/London")),
        ])
    }

    pub fn from_users(users: Vec<User>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Resolve the `login_as` query value to a user.
    ///
    /// Absent, non-numeric and unknown ids all resolve to `None`.
    pub fn resolve(&self, login_as: Option<&str>) -> Option<&User> {
        self.get(parse_user_id(login_as?)?)
    }
}

/// Parse an integer id, allowing surrounding whitespace, a sign and
/// single `_` separators between digits (`1_000`)
fn parse_user_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let bytes = raw.as_bytes();
    let separators_ok = bytes.iter().enumerate().all(|(i, &b)| {
        b != b'_'
            || (i > 0
                && bytes[i - 1].is_ascii_digit()
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
    });
    if !separators_ok {
        return None;
    }
    raw.replace('_', "").parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = UserTable::builtin();
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
        assert_eq!(table.get(4).map(|u| u.name.as_str()), Some("Teletubby"));
        assert_eq!(table.get(4).and_then(|u| u.locale.as_deref()), None);
    }

    #[test]
    fn test_resolve_known_user() {
        let table = UserTable::builtin();
        let user = table.resolve(Some("1")).expect("user 1 exists");
        assert_eq!(user.name, "Balou");
        assert_eq!(user.locale.as_deref(), Some("fr"));
        assert_eq!(user.timezone.as_deref(), Some("Europe/Paris"));
    }

    #[test]
    fn test_resolve_missing_or_malformed() {
        let table = UserTable::builtin();
        for raw in [None, Some(""), Some("abc"), Some("1.5"), Some("0x1"), Some("one")] {
            assert!(table.resolve(raw).is_none(), "expected no user for {raw:?}");
        }
    }

    #[test]
    fn test_resolve_unknown_ids() {
        let table = UserTable::builtin();
        for raw in ["0", "5", "-1", "999999", "99999999999999999999999"] {
            assert!(table.resolve(Some(raw)).is_none(), "expected no user for {raw}");
        }
    }

    #[test]
    fn test_resolve_lenient_integer_forms() {
        let table = UserTable::builtin();
        assert_eq!(table.resolve(Some(" 2 ")).map(|u| u.id), Some(2));
        assert_eq!(table.resolve(Some("+3")).map(|u| u.id), Some(3));
        assert_eq!(table.resolve(Some("0_1")).map(|u| u.id), Some(1));
        assert_eq!(table.resolve(Some("\t0_0_4\n")).map(|u| u.id), Some(4));
    }

    #[test]
    fn test_resolve_rejects_misplaced_underscores() {
        let table = UserTable::builtin();
        for raw in ["_1", "1_", "0__1", "+_2", "_"] {
            assert!(table.resolve(Some(raw)).is_none(), "expected no user for {raw}");
        }
    }
}
