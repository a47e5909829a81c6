//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::MessageResponse;
use super::error::ErrorBody;
use super::modules::{auth, data, health, metrics, request_id, users};
use crate::application::{AccountService, AuthService, TelemetryService};
use crate::config::{AppConfig, CorsConfig};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::CredentialCodec;

/// Everything the handlers need. Each module extracts its own slice of it
/// via `FromRef`.
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub accounts: Arc<AccountService>,
    pub auth: Arc<AuthService>,
    pub telemetry: Arc<TelemetryService>,
    pub channel: data::ChannelDto,
}

impl AppState {
    pub fn new(repos: Arc<dyn RepositoryProvider>, config: &AppConfig) -> Self {
        let codec = CredentialCodec::new(config.security.bcrypt_cost);
        Self {
            accounts: Arc::new(AccountService::new(repos.clone(), codec)),
            auth: Arc::new(AuthService::new(repos.clone(), codec)),
            telemetry: Arc::new(TelemetryService::new(
                repos.clone(),
                config.telemetry.default_limit,
            )),
            channel: data::ChannelDto {
                id: config.telemetry.channel_id.clone(),
                name: config.telemetry.channel_name.clone(),
            },
            repos,
        }
    }
}

impl FromRef<AppState> for health::HealthState {
    fn from_ref(s: &AppState) -> Self {
        health::HealthState {
            repos: Arc::clone(&s.repos),
            telemetry: Arc::clone(&s.telemetry),
        }
    }
}

impl FromRef<AppState> for data::DataState {
    fn from_ref(s: &AppState) -> Self {
        data::DataState {
            telemetry: Arc::clone(&s.telemetry),
            channel: s.channel.clone(),
        }
    }
}

impl FromRef<AppState> for users::UsersState {
    fn from_ref(s: &AppState) -> Self {
        users::UsersState {
            accounts: Arc::clone(&s.accounts),
        }
    }
}

impl FromRef<AppState> for auth::AuthState {
    fn from_ref(s: &AppState) -> Self {
        auth::AuthState {
            auth: Arc::clone(&s.auth),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        data::get_sensor_data,
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        auth::login,
    ),
    components(
        schemas(
            ErrorBody,
            MessageResponse,
            health::HealthResponse,
            health::HealthFailure,
            data::DataResponse,
            data::FeedDto,
            data::ChannelDto,
            data::StatsDto,
            data::FiltersAppliedDto,
            users::AccountDto,
            users::CreateAccountRequest,
            users::UpdateAccountRequest,
            auth::LoginRequest,
            auth::LoginResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service and store health"),
        (name = "Telemetry", description = "Sensor readings with date-range filtering"),
        (name = "Users", description = "Account management"),
        (name = "Authentication", description = "Email and password login"),
    ),
    info(
        title = "AgroWatch API",
        version = "1.0.0",
        description = "Sensor telemetry and account management"
    )
)]
pub struct ApiDoc;

/// Paths printed at startup.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/health"),
    ("GET", "/api/data"),
    ("GET", "/api/users"),
    ("POST", "/api/users"),
    ("PUT", "/api/users/{id}"),
    ("DELETE", "/api/users/{id}"),
    ("POST", "/api/login"),
];

pub fn cors_layer(config: &CorsConfig, debug: bool) -> CorsLayer {
    if config.allowed_origins.is_empty() && debug {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            // AllowOrigin::list panics on a wildcard
            Ok(value) if value != "*" => Some(value),
            _ => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create the API router with all routes
pub fn create_api_router(
    state: AppState,
    config: &AppConfig,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/data", get(data::get_sensor_data))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .route("/login", post(auth::login))
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .nest("/api", api_routes);

    if let Some(handle) = prometheus {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors_layer(&config.cors, config.server.debug))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app(origins: &[&str]) -> Router {
        let config = CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        Router::new()
            .route("/", get(|| async { StatusCode::OK }))
            .layer(cors_layer(&config, false))
    }

    async fn allowed_origin(app: Router, origin: &str) -> Option<String> {
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn wildcard_entry_is_skipped_instead_of_panicking() {
        let app = app(&["*", "https://farm.example"]);
        assert_eq!(
            allowed_origin(app.clone(), "https://farm.example").await.as_deref(),
            Some("https://farm.example")
        );
        assert_eq!(allowed_origin(app, "https://evil.example").await, None);
    }
}
