use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{JwtError, TokenService};
use crate::config::{AppConfig, SecurityConfig};
use crate::database::models::{Category, Device, UserSession, Zone};
use crate::database::{DatabaseManager, HealthProbe, PgRepository};
use crate::handlers::{protected, public};
use crate::identity::{PasswordHasher, PasswordPolicy, PgIdentityProvider};
use crate::middleware::{
    jwt_auth_middleware, require_admin, require_authenticated_role, session_middleware,
};
use crate::services::{
    CategoryService, DeviceQueryService, DeviceService, SecurityService, ZoneService,
};

/// Shared, cheaply clonable handles to every service
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<CategoryService>,
    pub zones: Arc<ZoneService>,
    pub devices: Arc<DeviceService>,
    pub device_queries: Arc<DeviceQueryService>,
    pub security: Arc<SecurityService>,
    pub tokens: Arc<TokenService>,
    pub health: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Wire the PostgreSQL-backed stores and identity provider
    pub fn from_database(database: &DatabaseManager, config: &AppConfig) -> Result<Self, JwtError> {
        let pool = database.pool().clone();
        let retries = config.database.max_retries;

        let devices = Arc::new(PgRepository::<Device>::new(pool.clone(), retries));
        let sessions = Arc::new(PgRepository::<UserSession>::new(pool.clone(), retries));
        let identity = Arc::new(PgIdentityProvider::new(
            pool.clone(),
            PasswordHasher::default(),
            PasswordPolicy::default(),
            retries,
        ));
        let tokens = Arc::new(TokenService::new(&config.security)?);

        Ok(Self {
            categories: Arc::new(CategoryService::new(Arc::new(PgRepository::<Category>::new(
                pool.clone(),
                retries,
            )))),
            zones: Arc::new(ZoneService::new(Arc::new(PgRepository::<Zone>::new(pool, retries)))),
            devices: Arc::new(DeviceService::new(devices.clone())),
            device_queries: Arc::new(DeviceQueryService::new(devices)),
            security: Arc::new(SecurityService::new(identity, sessions, tokens.clone())),
            tokens,
            health: Arc::new(database.clone()),
        })
    }
}

/// Full application router. The bearer-token layer runs first, then the
/// session gate, then the per-router role guard.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        .route("/", get(public::home::root))
        .route("/health", get(public::home::health))
        .nest("/api/categories", category_routes())
        .nest("/api/devices", device_routes())
        .nest("/api/zones", zone_routes())
        .nest("/api/security", security_routes())
        .layer(from_fn_with_state(state.clone(), session_middleware))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors(&config.security));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn cors(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers(Any)
}

fn category_routes() -> Router<AppState> {
    use protected::categories;

    Router::new()
        .route("/get-all", get(categories::get_all))
        .route("/get-by-id/:id", get(categories::get_by_id))
        .route("/get-num-of-zones-by-category/:id", get(categories::get_num_of_zones))
        .route("/create", post(categories::create))
        .route("/update/:id", put(categories::update).patch(categories::update))
        .route("/delete/:id", delete(categories::delete))
        .route_layer(from_fn(require_admin))
}

fn device_routes() -> Router<AppState> {
    use protected::devices;

    Router::new()
        .route("/get-all", get(devices::get_all))
        .route("/get-all-by-zone/:zone_id", get(devices::get_all_by_zone))
        .route("/get-all-by-category/:category_id", get(devices::get_all_by_category))
        .route("/get-by-id/:id", get(devices::get_by_id))
        .route("/create", post(devices::create))
        .route("/update/:id", put(devices::update).patch(devices::update))
        .route("/delete/:id", delete(devices::delete))
        .route_layer(from_fn(require_admin))
}

fn zone_routes() -> Router<AppState> {
    use protected::zones;

    Router::new()
        .route("/get-all", get(zones::get_all))
        .route("/get-by-id/:id", get(zones::get_by_id))
        .route("/create", post(zones::create))
        .route("/update/:id", put(zones::update).patch(zones::update))
        .route("/delete/:id", delete(zones::delete))
        .route_layer(from_fn(require_admin))
}

fn security_routes() -> Router<AppState> {
    let signed_in = Router::new()
        .route("/logout", delete(protected::security::logout))
        .route("/get-user-by-id/:id", get(protected::security::get_user_by_id))
        .route_layer(from_fn(require_authenticated_role));

    Router::new()
        .route("/login", post(public::security::login))
        .route("/register-admin", post(public::security::register_admin))
        .route("/register-user", post(public::security::register_user))
        .merge(signed_in)
}
