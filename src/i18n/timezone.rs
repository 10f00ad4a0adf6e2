//! Timezone negotiation
//!
//! First valid identifier wins: `timezone` query parameter, user profile, default.
//! Invalid identifiers are skipped silently.

use chrono_tz::Tz;

use super::users::User;
use crate::config::I18nConfig;

/// A timezone accepted for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedTimezone {
    pub tz: Tz,
}

impl NegotiatedTimezone {
    /// IANA identifier, e.g. `Europe/Paris`
    pub fn name(&self) -> &'static str {
        self.tz.name()
    }
}

impl std::fmt::Display for NegotiatedTimezone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse an IANA identifier, ignoring case; empty and unknown names yield `None`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    if name.is_empty() {
        return None;
    }
    Tz::from_str_insensitive(name).ok()
}

/// Select the timezone for a request
pub fn negotiate_timezone(
    query_timezone: Option<&str>,
    user: Option<&User>,
    i18n: &I18nConfig,
) -> NegotiatedTimezone {
    let tz = query_timezone
        .and_then(parse_timezone)
        .or_else(|| user.and_then(|u| u.timezone.as_deref()).and_then(parse_timezone))
        .unwrap_or_else(|| i18n.fallback_timezone());

    NegotiatedTimezone { tz }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::users::UserTable;

    fn negotiate(login_as: Option<&str>, timezone: Option<&str>) -> String {
        let users = UserTable::builtin();
        let user = users.resolve(login_as);
        negotiate_timezone(timezone, user, &I18nConfig::default())
            .name()
            .to_string()
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("Europe/Paris"), Some(Tz::Europe__Paris));
        assert_eq!(parse_timezone("US/Central"), Some(Tz::US__Central));
        assert_eq!(parse_timezone("UTC"), Some(Tz::UTC));
        assert_eq!(parse_timezone("Vulcan"), None);
        assert_eq!(parse_timezone("Invalid/Zone"), None);
        assert_eq!(parse_timezone(""), None);
    }

    #[test]
    fn test_parse_timezone_ignores_case() {
        assert_eq!(parse_timezone("europe/paris"), Some(Tz::Europe__Paris));
        assert_eq!(parse_timezone("US/CENTRAL"), Some(Tz::US__Central));
        assert_eq!(parse_timezone("vulcan"), None);
    }

    #[test]
    fn test_lowercase_query_uses_canonical_name() {
        assert_eq!(negotiate(None, Some("europe/paris")), "Europe/Paris");
        assert_eq!(negotiate(Some("1"), Some("asia/tokyo")), "Asia/Tokyo");
    }

    #[test]
    fn test_query_param_wins() {
        assert_eq!(negotiate(None, Some("Asia/Tokyo")), "Asia/Tokyo");
        assert_eq!(negotiate(Some("1"), Some("US/Central")), "US/Central");
    }

    #[test]
    fn test_invalid_query_falls_through() {
        assert_eq!(negotiate(Some("1"), Some("Invalid/Zone")), "Europe/Paris");
        assert_eq!(negotiate(None, Some("Invalid/Zone")), "UTC");
        assert_eq!(negotiate(Some("2"), Some("Vulcan")), "US/Central");
        assert_eq!(negotiate(Some("4"), Some("")), "Europe/London");
    }

    #[test]
    fn test_user_timezone() {
        assert_eq!(negotiate(Some("1"), None), "Europe/Paris");
        assert_eq!(negotiate(Some("4"), None), "Europe/London");
    }

    #[test]
    fn test_invalid_user_timezone_falls_back() {
        assert_eq!(negotiate(Some("3"), None), "UTC");
        assert_eq!(negotiate(Some("3"), Some("Vulcan")), "UTC");
    }

    #[test]
    fn test_configured_fallback() {
        let i18n = I18nConfig {
            default_timezone: "Europe/Berlin".to_string(),
            ..I18nConfig::default()
        };
        let negotiated = negotiate_timezone(Some("Nowhere"), None, &i18n);
        assert_eq!(negotiated.to_string(), "Europe/Berlin");
    }
}
