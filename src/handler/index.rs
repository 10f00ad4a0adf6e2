//! Index page rendering
//!
//! Pure function of the negotiated request context and the current instant.

use chrono::{DateTime, Datelike, Utc};

use crate::i18n::{Catalog, RequestContext};

const FR_MONTHS: [&str; 12] = [
    "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.", "nov.",
    "déc.",
];

/// Render the page for `GET /`
pub fn render_index(ctx: &RequestContext, catalog: Catalog, now: DateTime<Utc>) -> String {
    let locale = ctx.locale.as_str();
    let title = escape_html(catalog.gettext(locale, "home_title"));
    let header = escape_html(catalog.gettext(locale, "home_header"));

    let login_status = match &ctx.user {
        Some(user) => {
            let name = format!("<b>{}</b>", escape_html(&user.name));
            catalog.format(locale, "logged_in_as", &[("username", name.as_str())])
        }
        None => escape_html(catalog.gettext(locale, "not_logged_in")),
    };

    let current_time = format_local_time(ctx, now);
    let time_line = escape_html(&catalog.format(
        locale,
        "current_time_is",
        &[("current_time", current_time.as_str())],
    ));

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
    <meta charset="utf-8">
    <title>{title}</title>
</head>
<body>
    <h1>{header}</h1>
    <p>{login_status}</p>
    <p>{time_line}</p>
    <footer>locale: {lang} &middot; timezone: {tz}</footer>
</body>
</html>
"#,
        lang = escape_html(locale),
        tz = escape_html(ctx.timezone.name()),
    )
}

/// Format `now` in the negotiated timezone with the locale's medium datetime style
pub fn format_local_time(ctx: &RequestContext, now: DateTime<Utc>) -> String {
    let local = now.with_timezone(&ctx.timezone.tz);
    match ctx.locale.as_str() {
        "fr" => format!(
            "{} {} {} à {}",
            local.day(),
            FR_MONTHS[local.month0() as usize],
            local.year(),
            local.format("%H:%M:%S")
        ),
        _ => local.format("%b %-d, %Y, %-I:%M:%S %p").to_string(),
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
