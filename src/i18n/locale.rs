//! Locale negotiation
//!
//! First match wins: `locale` query parameter, user profile, Accept-Language, default.
//! Unsupported values are skipped at every step.

use super::accept_language::AcceptLanguage;
use super::users::User;
use crate::config::I18nConfig;

/// Select the locale for a request
pub fn negotiate_locale(
    query_locale: Option<&str>,
    user: Option<&User>,
    accept_language: Option<&str>,
    i18n: &I18nConfig,
) -> String {
    if let Some(locale) = query_locale.filter(|l| i18n.is_supported(l)) {
        return locale.to_string();
    }

    if let Some(locale) = user
        .and_then(|u| u.locale.as_deref())
        .filter(|l| i18n.is_supported(l))
    {
        return locale.to_string();
    }

    if let Some(locale) = accept_language
        .map(AcceptLanguage::parse)
        .filter(|accept| !accept.is_empty())
        .and_then(|accept| {
            accept
                .best_match(i18n.supported_locales.as_slice())
                .map(String::from)
        })
    {
        return locale;
    }

    i18n.default_locale.clone()
}
