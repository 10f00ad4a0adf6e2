//! Accept-Language header parsing and best-match selection
//!
//! Matching rules:
//! - Tags compare case-insensitively, with `-` and `_` treated as the same delimiter
//! - `*` matches any supported value but loses ties to a concrete tag
//! - Highest quality wins; remaining ties go to the earlier supported value
//! - Without any match, primary subtags are compared (`fr-CA` against `fr`)

/// One entry of an Accept-Language header
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageRange {
    pub tag: String,
    pub quality: f32,
}

impl LanguageRange {
    fn is_wildcard(&self) -> bool {
        self.tag == "*"
    }

    fn matches(&self, supported: &str) -> bool {
        self.is_wildcard() || normalize(&self.tag) == normalize(supported)
    }
}

/// Parsed client language preferences, ordered by descending quality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcceptLanguage {
    ranges: Vec<LanguageRange>,
}

impl AcceptLanguage {
    /// Parse a raw header value.
    ///
    /// Entries with an unparsable or zero quality are dropped.
    pub fn parse(header: &str) -> Self {
        let mut ranges: Vec<LanguageRange> = header
            .split(',')
            .filter_map(parse_range)
            .filter(|r| r.quality > 0.0)
            .collect();
        // stable: equal qualities keep header order
        ranges.sort_by(|a, b| b.quality.total_cmp(&a.quality));
        Self { ranges }
    }

    #[cfg(test)]
    pub fn ranges(&self) -> &[LanguageRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Pick the supported value the client prefers most
    pub fn best_match<'a, S: AsRef<str>>(&self, supported: &'a [S]) -> Option<&'a str> {
        if let Some(found) = best_exact(&self.ranges, supported) {
            return Some(found);
        }

        // Client asked for a regional variant we only have as a base language
        let primaries: Vec<LanguageRange> = self
            .ranges
            .iter()
            .map(|r| LanguageRange {
                tag: primary_subtag(&r.tag).to_string(),
                quality: r.quality,
            })
            .collect();
        if let Some(found) = best_exact(&primaries, supported) {
            return Some(found);
        }

        // We only have regional variants of what the client asked for
        let supported_primaries: Vec<&str> = supported
            .iter()
            .map(|s| primary_subtag(s.as_ref()))
            .collect();
        let prefix = best_exact(&self.ranges, &supported_primaries)?;
        supported
            .iter()
            .map(|s| s.as_ref())
            .find(|s| s.starts_with(prefix))
    }
}

fn parse_range(item: &str) -> Option<LanguageRange> {
    let mut parts = item.split(';');
    let tag = parts.next()?.trim();
    if tag.is_empty() {
        return None;
    }

    let mut quality = 1.0_f32;
    for param in parts {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        if key.trim().eq_ignore_ascii_case("q") {
            quality = value.trim().parse::<f32>().ok()?;
            if quality.is_nan() {
                return None;
            }
            quality = quality.clamp(0.0, 1.0);
        }
    }

    Some(LanguageRange {
        tag: tag.to_string(),
        quality,
    })
}

#[allow(clippy::float_cmp)]
fn best_exact<'a, S: AsRef<str>>(ranges: &[LanguageRange], supported: &'a [S]) -> Option<&'a str> {
    let mut result = None;
    let mut best_quality = -1.0_f32;
    let mut best_specific = false;

    for candidate in supported {
        let candidate = candidate.as_ref();
        for range in ranges {
            let specific = !range.is_wildcard();
            if range.quality < best_quality {
                continue;
            }
            // equal quality only wins on strictly higher specificity
            if range.quality == best_quality && (!specific || best_specific) {
                continue;
            }
            if range.matches(candidate) {
                best_quality = range.quality;
                best_specific = specific;
                result = Some(candidate);
            }
        }
    }

    result
}

fn normalize(tag: &str) -> String {
    tag.to_ascii_lowercase().replace('_', "-")
}

fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
