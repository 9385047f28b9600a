/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use storefront_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, Next},
    response::Response,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use storefront_shared::auth::middleware::authenticate;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through `State`; the pool and `Arc` make that
/// cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health                            (public)
/// ├── POST   /register                          (public)
/// ├── POST   /login                             (public)
/// ├── GET    /userDetails                       (bearer)
/// ├── PUT    /userDetails                       (bearer)
/// ├── GET    /cities                            (bearer)
/// ├── GET    /products                          (bearer)
/// ├── GET    /products/:id                      (bearer)
/// └── /orders                                   (bearer)
///     ├── GET    /?filter=<status>
///     ├── POST   /addToCart/:productId
///     ├── PATCH  /:orderId/complete
///     ├── PATCH  /lines/:orderDetailsId
///     └── DELETE /lines/:orderDetailsId
/// ```
///
/// Layers, outermost first: security headers, CORS, request tracing, then
/// bearer authentication on the protected routes.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let order_routes = Router::new()
        .route("/", get(routes::orders::list_order))
        .route("/addToCart/:product_id", post(routes::orders::add_to_cart))
        .route("/:order_id/complete", patch(routes::orders::complete_order))
        .route(
            "/lines/:order_detail_id",
            patch(routes::orders::update_cart_line).delete(routes::orders::delete_cart_line),
        );

    let protected_routes = Router::new()
        .route(
            "/userDetails",
            get(routes::users::get_user_details).put(routes::users::update_user_details),
        )
        .route("/cities", get(routes::cities::list_cities))
        .route("/products", get(routes::products::list_products))
        .route("/products/:id", get(routes::products::get_product))
        .nest("/orders", order_routes)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}

/// Bearer authentication for protected routes
///
/// Validates the token against the configured secret, confirms the user
/// still exists and stores an `AuthContext` in request extensions.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth = authenticate(&state.db, state.jwt_secret(), req.headers())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, path = %req.uri().path(), "Rejected request");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}
