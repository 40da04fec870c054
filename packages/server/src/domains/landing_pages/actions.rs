//! Landing page actions - storefront lookup and admin locale management

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use super::error::LandingPageError;
use super::locale::{choose_locale, Locale, LocaleMatch};
use super::models::{default_content, LandingPage, SaveLandingPage};
use crate::common::{BusinessUnitId, BusinessUnitRef, LandingPageId};
use crate::domains::business_units::BusinessUnit;

#[derive(Debug, Clone, Serialize)]
pub struct BusinessUnitSummary {
    pub id: BusinessUnitId,
    pub name: String,
    pub slug: String,
}

/// What a storefront needs to render one locale of a business unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPageView {
    pub landing_page: Option<LandingPage>,
    pub business_unit: BusinessUnitSummary,
    pub has_landing_page: bool,
    pub available_locales: Vec<Locale>,
    /// Locale of the page actually served (the requested one when nothing is)
    pub current_locale: Locale,
    pub requested_locale: Locale,
    pub locale_match: Option<LocaleMatch>,
    pub is_preview: bool,
}

/// Where a vanity slug points.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugTarget {
    pub business_unit: String,
    pub business_unit_id: BusinessUnitId,
    pub business_unit_name: String,
    pub country: String,
    pub language: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSummary {
    pub id: LandingPageId,
    pub country: String,
    pub language_code: String,
    pub slug: Option<String>,
    pub is_active: bool,
    pub is_published: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<LandingPage> for LocaleSummary {
    fn from(p: LandingPage) -> Self {
        Self {
            id: p.id,
            country: p.country,
            language_code: p.language_code,
            slug: p.slug,
            is_active: p.is_active,
            is_published: p.is_published,
            updated_at: p.updated_at,
        }
    }
}

fn normalize_slug(slug: Option<String>) -> Option<String> {
    slug.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

async fn find_business_unit(
    business_unit: &BusinessUnitRef,
    pool: &PgPool,
) -> Result<BusinessUnit, LandingPageError> {
    let id = BusinessUnit::resolve(business_unit, pool)
        .await?
        .ok_or(LandingPageError::BusinessUnitNotFound)?;
    BusinessUnit::find_by_id(id, pool)
        .await?
        .ok_or(LandingPageError::BusinessUnitNotFound)
}

/// Resolve the page to serve for a requested locale, falling back to the
/// closest active locale when the exact one has no page.
pub async fn get_landing_page(
    business_unit: &BusinessUnitRef,
    requested: Locale,
    preview: bool,
    pool: &PgPool,
) -> Result<LandingPageView, LandingPageError> {
    let unit = find_business_unit(business_unit, pool).await?;
    let pages = LandingPage::find_active(unit.id, pool).await?;
    let available: Vec<Locale> = pages.iter().map(LandingPage::locale).collect();

    let chosen = choose_locale(&requested, &available);
    let locale_match = chosen.map(|(_, m)| m);
    let landing_page = chosen
        .and_then(|(index, _)| pages.into_iter().nth(index))
        .map(|page| page.rendered(preview));

    let current_locale = landing_page
        .as_ref()
        .map(LandingPage::locale)
        .unwrap_or_else(|| requested.clone());

    if let Some(m) = locale_match.filter(|m| *m != LocaleMatch::Exact) {
        info!(
            business_unit_id = %unit.id,
            requested = %requested,
            served = %current_locale,
            fallback = ?m,
            "Landing page locale fallback"
        );
    }

    Ok(LandingPageView {
        has_landing_page: landing_page.is_some(),
        landing_page,
        business_unit: BusinessUnitSummary {
            id: unit.id,
            name: unit.name,
            slug: unit.slug,
        },
        available_locales: available,
        current_locale,
        requested_locale: requested,
        locale_match,
        is_preview: preview,
    })
}

pub async fn find_by_slug(slug: &str, pool: &PgPool) -> Result<SlugTarget, LandingPageError> {
    let page = LandingPage::find_by_slug(slug.trim(), pool)
        .await?
        .ok_or(LandingPageError::NotFound)?;
    let unit = BusinessUnit::find_by_id(page.business_unit_id, pool)
        .await?
        .ok_or(LandingPageError::BusinessUnitNotFound)?;

    Ok(SlugTarget {
        business_unit: unit.slug,
        business_unit_id: unit.id,
        business_unit_name: unit.name,
        country: page.country,
        language: page.language_code,
        slug: page.slug.unwrap_or_default(),
    })
}

/// Save the draft of one locale, creating the page when it does not exist.
pub async fn save_landing_page(
    mut input: SaveLandingPage,
    pool: &PgPool,
) -> Result<LandingPage, LandingPageError> {
    input.slug = normalize_slug(input.slug);

    if let Some(slug) = input.slug.as_deref() {
        if LandingPage::slug_taken(slug, input.business_unit_id, &input.locale, pool).await? {
            return Err(LandingPageError::SlugTaken(slug.to_string()));
        }
    }

    let page = LandingPage::upsert(input, pool).await?;
    info!(landing_page_id = %page.id, locale = %page.locale(), "Landing page saved");
    Ok(page)
}

pub async fn publish(
    business_unit_id: BusinessUnitId,
    locale: &Locale,
    is_published: bool,
    pool: &PgPool,
) -> Result<LandingPage, LandingPageError> {
    let page = LandingPage::set_published(business_unit_id, locale, is_published, pool)
        .await?
        .ok_or(LandingPageError::NotFound)?;
    info!(landing_page_id = %page.id, is_published, "Landing page publish state changed");
    Ok(page)
}

pub async fn list_locales(
    business_unit_id: BusinessUnitId,
    pool: &PgPool,
) -> Result<Vec<LocaleSummary>> {
    let pages = LandingPage::find_by_business_unit(business_unit_id, pool).await?;
    Ok(pages.into_iter().map(LocaleSummary::from).collect())
}

/// Add a locale, either empty or as a copy of another locale's draft.
pub async fn create_locale(
    business_unit_id: BusinessUnitId,
    locale: &Locale,
    copy_from: Option<&Locale>,
    pool: &PgPool,
) -> Result<LandingPage, LandingPageError> {
    let (content, enable_social_login) = match copy_from {
        Some(source) => {
            let source = LandingPage::find_for_locale(business_unit_id, source, pool)
                .await?
                .ok_or(LandingPageError::SourceLocaleNotFound)?;
            (source.content, source.enable_social_login)
        }
        None => (default_content(), false),
    };

    let page = LandingPage::create_locale(business_unit_id, locale, content, enable_social_login, pool)
        .await?
        .ok_or(LandingPageError::LocaleExists)?;
    info!(landing_page_id = %page.id, locale = %locale, copied = copy_from.is_some(), "Locale created");
    Ok(page)
}

pub async fn delete_locale(
    business_unit_id: BusinessUnitId,
    locale: &Locale,
    pool: &PgPool,
) -> Result<(), LandingPageError> {
    if !LandingPage::delete_locale(business_unit_id, locale, pool).await? {
        return Err(LandingPageError::NotFound);
    }
    info!(business_unit_id = %business_unit_id, locale = %locale, "Locale deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_slugs_are_cleared() {
        assert_eq!(normalize_slug(Some("  ".into())), None);
        assert_eq!(normalize_slug(Some(" spring-sale ".into())), Some("spring-sale".into()));
        assert_eq!(normalize_slug(None), None);
    }
}
