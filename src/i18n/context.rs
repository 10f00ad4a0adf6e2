//! Per-request negotiation state
//!
//! Built once before a request is rendered and dropped with the response.

use url::form_urlencoded;

use super::locale::negotiate_locale;
use super::timezone::{negotiate_timezone, NegotiatedTimezone};
use super::users::{User, UserTable};
use crate::config::I18nConfig;

/// Query parameters the negotiators read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiationParams {
    pub login_as: Option<String>,
    pub locale: Option<String>,
    pub timezone: Option<String>,
}

impl NegotiationParams {
    /// Decode a raw query string; the first occurrence of a key wins
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let slot = match &*key {
                "login_as" => &mut params.login_as,
                "locale" => &mut params.locale,
                "timezone" => &mut params.timezone,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// Resolved user, locale and timezone for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user: Option<User>,
    pub locale: String,
    pub timezone: NegotiatedTimezone,
}

impl RequestContext {
    /// Run the user resolver, then the locale and timezone negotiators
    pub fn resolve(
        params: &NegotiationParams,
        accept_language: Option<&str>,
        users: &UserTable,
        i18n: &I18nConfig,
    ) -> Self {
        let user = users.resolve(params.login_as.as_deref());
        let locale = negotiate_locale(params.locale.as_deref(), user, accept_language, i18n);
        let timezone = negotiate_timezone(params.timezone.as_deref(), user, i18n);

        Self {
            user: user.cloned(),
            locale,
            timezone,
        }
    }
}
