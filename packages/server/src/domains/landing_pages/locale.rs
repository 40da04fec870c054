//! Storefront locales and the fallback used when a visitor asks for a
//! country/language pair that has no page.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COUNTRY: &str = "US";
pub const DEFAULT_LANGUAGE: &str = "en";

/// A country (upper case) and a short language code (lower case), e.g. `HK`/`tw`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    pub country: String,
    pub language: String,
}

impl Locale {
    /// Blank parts fall back to the default locale.
    pub fn new(country: Option<&str>, language: Option<&str>) -> Self {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_COUNTRY);
        let language = language
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);

        Self {
            country: country.to_uppercase(),
            language: language.to_lowercase(),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.country, self.language)
    }
}

/// How the served page relates to the requested locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocaleMatch {
    Exact,
    SameCountry,
    SameLanguage,
    Default,
    FirstAvailable,
}

fn position_where(available: &[Locale], pred: impl Fn(&Locale) -> bool) -> Option<usize> {
    available.iter().position(pred)
}

/// Index of the locale to serve for `requested`.
///
/// Order: the exact pair, another language in the same country, the same
/// language in another country, the default locale, then whatever comes
/// first. `available` should already be sorted by country then language.
pub fn choose_locale(requested: &Locale, available: &[Locale]) -> Option<(usize, LocaleMatch)> {
    let default = Locale::default();

    position_where(available, |l| l == requested)
        .map(|i| (i, LocaleMatch::Exact))
        .or_else(|| {
            position_where(available, |l| l.country == requested.country)
                .map(|i| (i, LocaleMatch::SameCountry))
        })
        .or_else(|| {
            position_where(available, |l| l.language == requested.language)
                .map(|i| (i, LocaleMatch::SameLanguage))
        })
        .or_else(|| position_where(available, |l| *l == default).map(|i| (i, LocaleMatch::Default)))
        .or_else(|| (!available.is_empty()).then_some((0, LocaleMatch::FirstAvailable)))
}
