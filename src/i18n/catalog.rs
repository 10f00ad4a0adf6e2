//! Compiled-in message catalog
//!
//! Messages are looked up by id per locale. Templates use `%(name)s` placeholders.

/// Locale used when a message is missing for the requested one
pub const SOURCE_LOCALE: &str = "en";

const MESSAGES: &[(&str, &str, &str)] = &[
    ("en", "home_title", "Welcome to Holberton"),
    ("en", "home_header", "Hello world!"),
    ("en", "logged_in_as", "You are logged in as %(username)s."),
    ("en", "not_logged_in", "You are not logged in."),
    ("en", "current_time_is", "The current time is %(current_time)s."),
    ("fr", "home_title", "Bienvenue chez Holberton"),
    ("fr", "home_header", "Bonjour monde!"),
    ("fr", "logged_in_as", "Vous êtes connecté en tant que %(username)s."),
    ("fr", "not_logged_in", "Vous n'êtes pas connecté."),
    ("fr", "current_time_is", "Nous sommes le %(current_time)s."),
];

/// Read-only translation lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog;

impl Catalog {
    /// Look up a message, falling back to the source locale, then to the id itself
    pub fn gettext<'a>(self, locale: &str, id: &'a str) -> &'a str {
        lookup(locale, id)
            .or_else(|| lookup(SOURCE_LOCALE, id))
            .unwrap_or(id)
    }

    /// Look up a message and substitute `%(name)s` placeholders
    pub fn format(self, locale: &str, id: &str, args: &[(&str, &str)]) -> String {
        let mut message = self.gettext(locale, id).to_string();
        for (name, value) in args {
            message = message.replace(&format!("%({name})s"), value);
        }
        message
    }

    /// Whether any message exists for the locale
    pub fn has_locale(self, locale: &str) -> bool {
        MESSAGES.iter().any(|(l, _, _)| *l == locale)
    }
}

fn lookup(locale: &str, id: &str) -> Option<&'static str> {
    MESSAGES
        .iter()
        .find(|(l, i, _)| *l == locale && *i == id)
        .map(|(_, _, text)| *text)
}
