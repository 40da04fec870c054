//! `/api/landing-page` - storefront pages (public reads, admin writes)

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::common::{BusinessUnitId, BusinessUnitRef};
use crate::domains::business_units::BusinessUnit;
use crate::domains::landing_pages::actions as landing_actions;
use crate::domains::landing_pages::{LandingPageError, Locale, SaveLandingPage};
use crate::server::app::AxumAppState;
use crate::server::error::ApiError;
use crate::server::middleware::{require_admin, require_staff, AuthUser};

#[derive(Debug, Deserialize)]
pub struct LandingPageQuery {
    #[serde(rename = "businessUnit", alias = "businessUnitId")]
    pub business_unit: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "language")]
    pub lang: Option<String>,
    #[serde(default)]
    pub preview: bool,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocaleQuery {
    #[serde(rename = "businessUnit", alias = "businessUnitId")]
    pub business_unit: Option<String>,
    pub country: Option<String>,
    #[serde(alias = "lang")]
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveLandingPageRequest {
    pub business_unit_id: Option<String>,
    pub country: Option<String>,
    pub language_code: Option<String>,
    pub slug: Option<String>,
    pub content: Option<serde_json::Value>,
    pub enable_social_login: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub business_unit_id: Option<String>,
    pub country: Option<String>,
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocale {
    pub country: Option<String>,
    pub language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocaleRequest {
    pub business_unit_id: Option<String>,
    pub country: Option<String>,
    pub language_code: Option<String>,
    pub copy_from: Option<SourceLocale>,
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn required_business_unit(raw: Option<&str>) -> Result<BusinessUnitRef, ApiError> {
    non_blank(raw)
        .map(BusinessUnitRef::parse)
        .ok_or_else(|| ApiError::bad_request("businessUnit parameter required"))
}

async fn resolve_business_unit(state: &AxumAppState, raw: Option<&str>) -> Result<BusinessUnitId, ApiError> {
    let reference = required_business_unit(raw)?;
    BusinessUnit::resolve(&reference, &state.db_pool)
        .await?
        .ok_or_else(|| LandingPageError::BusinessUnitNotFound.into())
}

/// GET /api/landing-page - the page for a locale, or the closest one
///
/// `preview=true` shows drafts and needs a staff token.
pub async fn get_landing_page_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Query(query): Query<LandingPageQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if query.preview {
        require_staff(auth_user.as_deref())?;
    }

    let business_unit = required_business_unit(query.business_unit.as_deref())?;
    let locale = Locale::new(query.country.as_deref(), query.lang.as_deref());

    let view =
        landing_actions::get_landing_page(&business_unit, locale, query.preview, &state.db_pool)
            .await?;
    Ok(Json(json!(view)))
}

/// GET /api/landing-page/by-slug
pub async fn landing_page_by_slug_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<SlugQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let slug = non_blank(query.slug.as_deref())
        .ok_or_else(|| ApiError::bad_request("slug parameter required"))?;

    let target = landing_actions::find_by_slug(slug, &state.db_pool).await?;
    Ok(Json(json!(target)))
}

/// POST /api/landing-page (admin) - save the draft of one locale
pub async fn save_landing_page_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<SaveLandingPageRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, body.business_unit_id.as_deref()).await?;
    if body.content.as_ref().is_some_and(|c| !c.is_object()) {
        return Err(ApiError::bad_request("content must be a JSON object"));
    }

    let page = landing_actions::save_landing_page(
        SaveLandingPage {
            business_unit_id,
            locale: Locale::new(body.country.as_deref(), body.language_code.as_deref()),
            slug: body.slug,
            content: body.content,
            enable_social_login: body.enable_social_login,
        },
        &state.db_pool,
    )
    .await?;

    Ok(Json(json!({ "success": true, "landingPage": page })))
}

/// POST /api/landing-page/publish (admin)
pub async fn publish_landing_page_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<PublishRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, body.business_unit_id.as_deref()).await?;
    let locale = Locale::new(body.country.as_deref(), body.language_code.as_deref());

    let page =
        landing_actions::publish(business_unit_id, &locale, body.is_published, &state.db_pool)
            .await?;
    Ok(Json(json!({ "success": true, "landingPage": page })))
}

/// GET /api/landing-pages/locales (admin)
pub async fn list_locales_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, query.business_unit.as_deref()).await?;
    let locales = landing_actions::list_locales(business_unit_id, &state.db_pool).await?;
    Ok(Json(json!({ "locales": locales })))
}

/// POST /api/landing-pages/locales (admin) - add a locale, optionally copying another
pub async fn create_locale_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Json(body): Json<CreateLocaleRequest>,
) -> Result<Response, ApiError> {
    require_admin(auth_user.as_deref())?;

    let business_unit_id = resolve_business_unit(&state, body.business_unit_id.as_deref()).await?;
    let (Some(country), Some(language)) = (
        non_blank(body.country.as_deref()),
        non_blank(body.language_code.as_deref()),
    ) else {
        return Err(ApiError::bad_request("country and languageCode are required"));
    };

    let locale = Locale::new(Some(country), Some(language));
    let source = body
        .copy_from
        .map(|s| Locale::new(s.country.as_deref(), s.language_code.as_deref()));

    let page =
        landing_actions::create_locale(business_unit_id, &locale, source.as_ref(), &state.db_pool)
            .await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "landingPage": page }))).into_response())
}

/// DELETE /api/landing-pages/locales (admin)
pub async fn delete_locale_handler(
    Extension(state): Extension<AxumAppState>,
    auth_user: Option<Extension<AuthUser>>,
    Query(query): Query<LocaleQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_admin(auth_user.as_deref())?;

    let (Some(_), Some(country), Some(language)) = (
        non_blank(query.business_unit.as_deref()),
        non_blank(query.country.as_deref()),
        non_blank(query.language.as_deref()),
    ) else {
        return Err(ApiError::bad_request(
            "businessUnit, country and language are required",
        ));
    };

    let business_unit_id = resolve_business_unit(&state, query.business_unit.as_deref()).await?;
    let locale = Locale::new(Some(country), Some(language));
    landing_actions::delete_locale(business_unit_id, &locale, &state.db_pool).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Landing page deleted for {}", locale),
    })))
}
