//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{Extension, Request},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domains::auth::JwtService;
use crate::kernel::ServerDeps;
use crate::server::graphql::{create_schema, GraphQLContext};
use crate::server::middleware::{jwt_auth_middleware, AuthUser};
use crate::server::routes::{
    create_locale_handler, delete_locale_handler, generate_recommendations_handler,
    get_landing_page_handler, get_llm_config_handler, get_quiz_handler, graphql_handler,
    graphql_playground, health_handler, landing_page_by_slug_handler, list_locales_handler,
    list_recommendations_handler, publish_landing_page_handler, record_lesson_handler,
    revise_handler, roleplay_handler, save_landing_page_handler, save_quiz_handler,
    send_message_handler, session_messages_handler, start_session_handler,
    update_concerns_handler, update_llm_config_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub db_pool: PgPool,
    pub server_deps: Arc<ServerDeps>,
    pub jwt_service: Arc<JwtService>,
}

/// Router options that differ between production and tests
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    /// Per-IP rate limiting (needs a peer address or forwarding headers)
    pub rate_limit: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            rate_limit: true,
        }
    }
}

/// Middleware to create GraphQLContext per-request
async fn create_graphql_context(
    Extension(state): Extension<AxumAppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Populated by jwt_auth_middleware
    let auth_user = request.extensions().get::<AuthUser>().cloned();

    let context = GraphQLContext::new(state.server_deps.clone(), auth_user);
    request.extensions_mut().insert(Arc::new(context));

    next.run(request).await
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

/// Build the Axum application router
pub fn build_app(server_deps: Arc<ServerDeps>, options: AppOptions) -> Router {
    // GraphQL schema (singleton)
    let schema = Arc::new(create_schema());

    let jwt_service = server_deps.jwt_service.clone();
    let app_state = AxumAppState {
        db_pool: server_deps.db_pool.clone(),
        server_deps: server_deps.clone(),
        jwt_service: jwt_service.clone(),
    };

    let mut router = Router::new()
        // Admin GraphQL
        .route("/graphql", post(graphql_handler))
        // Public quiz + recommendations
        .route(
            "/api/quiz",
            get(get_quiz_handler)
                .post(save_quiz_handler)
                .put(update_concerns_handler),
        )
        .route(
            "/api/recommendations",
            get(list_recommendations_handler).post(generate_recommendations_handler),
        )
        // Sales assistant
        .route("/api/chat/sessions", post(start_session_handler))
        .route(
            "/api/chat/sessions/:id/messages",
            get(session_messages_handler).post(send_message_handler),
        )
        .route("/api/chat/roleplay", post(roleplay_handler))
        .route("/api/chat/revise", post(revise_handler))
        .route("/api/chat/lessons", post(record_lesson_handler))
        // Storefront landing pages
        .route(
            "/api/landing-page",
            get(get_landing_page_handler).post(save_landing_page_handler),
        )
        .route("/api/landing-page/by-slug", get(landing_page_by_slug_handler))
        .route("/api/landing-page/publish", post(publish_landing_page_handler))
        .route(
            "/api/landing-pages/locales",
            get(list_locales_handler)
                .post(create_locale_handler)
                .delete(delete_locale_handler),
        )
        // Runtime LLM switch (admin)
        .route(
            "/api/llm-config",
            get(get_llm_config_handler).post(update_llm_config_handler),
        );

    // GraphQL playground only in debug builds (development)
    #[cfg(debug_assertions)]
    {
        router = router.route("/graphql", get(graphql_playground));
    }

    router = router
        .layer(middleware::from_fn(create_graphql_context))
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service.clone(), req, next)
        }));

    // Rate limiting: 10 req/sec per IP with bursts of 20
    if options.rate_limit {
        match GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .use_headers()
            .finish()
        {
            Some(config) => {
                router = router.layer(GovernorLayer {
                    config: Arc::new(config),
                });
            }
            None => warn!("Invalid rate limiter configuration, rate limiting disabled"),
        }
    }

    router
        // Health check (no rate limit, no auth)
        .route("/health", get(health_handler))
        .layer(Extension(app_state)) // Shared state (must be after middlewares that need it)
        .layer(cors_layer(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(schema)
}

