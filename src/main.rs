//! MedTrack Server - clinical equipment maintenance
//!
//! Binary entry point: configuration, logging, database, router.

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medtrack_server::{
    api,
    config::{AppConfig, LoggingConfig},
    lifecycle::SystemClock,
    repository::Repository,
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.logging);

    tracing::info!("Starting MedTrack Server v{}", env!("CARGO_PKG_VERSION"));

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    let repository = Repository::new(pool);
    let services = Services::new(repository, &config, Arc::new(SystemClock));
    services
        .users
        .ensure_bootstrap_admin()
        .await
        .context("Failed to create bootstrap administrator")?;

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Pretty or JSON output, filtered by RUST_LOG or the configured level
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("medtrack_server={},tower_http=debug", logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/refresh", post(api::auth::refresh))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/me", get(api::auth::me))
        // Equipment
        .route(
            "/equipment",
            get(api::equipment::list_equipment).post(api::equipment::create_equipment),
        )
        .route("/equipment/search", get(api::equipment::search_equipment))
        .route("/equipment/department/:department_id", get(api::equipment::by_department))
        .route("/equipment/status/:status", get(api::equipment::by_status))
        .route(
            "/equipment/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::update_equipment)
                .delete(api::equipment::delete_equipment),
        )
        .route("/equipment/:id/history", get(api::equipment::get_history))
        .route("/equipment/:id/qr-code", post(api::equipment::generate_qr_code))
        // Maintenance
        .route(
            "/maintenance",
            get(api::maintenance::list_maintenance).post(api::maintenance::create_maintenance),
        )
        .route("/maintenance/period", get(api::maintenance::by_period))
        .route("/maintenance/equipment/:equipment_id", get(api::maintenance::by_equipment))
        .route("/maintenance/technician/:technician_id", get(api::maintenance::by_technician))
        .route(
            "/maintenance/:id",
            get(api::maintenance::get_maintenance)
                .put(api::maintenance::update_maintenance)
                .delete(api::maintenance::delete_maintenance),
        )
        .route("/maintenance/:id/status", put(api::maintenance::update_status))
        // Service orders
        .route(
            "/service-orders",
            get(api::service_orders::list_orders).post(api::service_orders::create_order),
        )
        .route("/service-orders/requester/:requester_id", get(api::service_orders::by_requester))
        .route("/service-orders/department/:department_id", get(api::service_orders::by_department))
        .route("/service-orders/equipment/:equipment_id", get(api::service_orders::by_equipment))
        .route("/service-orders/status/:status", get(api::service_orders::by_status))
        .route(
            "/service-orders/:id",
            get(api::service_orders::get_order)
                .put(api::service_orders::update_order)
                .delete(api::service_orders::delete_order),
        )
        .route("/service-orders/:id/status", put(api::service_orders::update_status))
        .route("/service-orders/:id/rating", post(api::service_orders::rate_order))
        // Departments
        .route(
            "/departments",
            get(api::departments::list_departments).post(api::departments::create_department),
        )
        .route(
            "/departments/:id",
            get(api::departments::get_department)
                .put(api::departments::update_department)
                .delete(api::departments::delete_department),
        )
        // Technicians and external providers
        .route(
            "/technicians",
            get(api::technicians::list_technicians).post(api::technicians::create_technician),
        )
        .route(
            "/technicians/:id",
            get(api::technicians::get_technician)
                .put(api::technicians::update_technician)
                .delete(api::technicians::delete_technician),
        )
        .route(
            "/external-companies",
            get(api::technicians::list_companies).post(api::technicians::create_company),
        )
        .route(
            "/external-companies/:id",
            get(api::technicians::get_company)
                .put(api::technicians::update_company)
                .delete(api::technicians::delete_company),
        )
        .route(
            "/external-technicians",
            get(api::technicians::list_external).post(api::technicians::create_external),
        )
        .route(
            "/external-technicians/:id",
            get(api::technicians::get_external)
                .put(api::technicians::update_external)
                .delete(api::technicians::delete_external),
        )
        // Suppliers
        .route(
            "/suppliers",
            get(api::suppliers::list_suppliers).post(api::suppliers::create_supplier),
        )
        .route(
            "/suppliers/:id",
            get(api::suppliers::get_supplier)
                .put(api::suppliers::update_supplier)
                .delete(api::suppliers::delete_supplier),
        )
        // Certificates
        .route(
            "/certificates",
            get(api::certificates::list_certificates).post(api::certificates::create_certificate),
        )
        .route("/certificates/expiring", get(api::certificates::expiring_certificates))
        .route(
            "/certificates/:id",
            get(api::certificates::get_certificate)
                .put(api::certificates::update_certificate)
                .delete(api::certificates::delete_certificate),
        )
        // Users
        .route("/users", get(api::users::list_users).post(api::users::create_user))
        .route(
            "/users/:id",
            get(api::users::get_user)
                .put(api::users::update_user)
                .delete(api::users::delete_user),
        )
        .with_state(state);

    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
