use axum::{response::IntoResponse, Json, Router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use utoipa::{Modify, OpenApi};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::database::sqlite::{SqliteDatabase, GLOBAL_DB};
use crate::utils::middleware::global_rate_limiter;
use hyper::Method;
use tower_http::cors::{Any, CorsLayer};

pub mod docs;
pub mod routes;
pub mod types;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        routes::register,
        routes::login,
        routes::validate,
        routes::refresh,
        routes::logout,
        routes::logout_all,
        routes::delete_account,
        // Profile
        routes::get_profile,
        routes::update_profile,
        routes::change_password,
        routes::my_verification,
        routes::submit_identity_documents,
        // Properties
        routes::search_properties,
        routes::create_property,
        routes::my_properties,
        routes::get_property,
        routes::update_property,
        routes::delete_property,
        routes::upload_property_images,
        routes::property_verification,
        routes::submit_property_documents,
        // Bookings
        routes::create_booking,
        routes::my_bookings,
        routes::owner_bookings,
        routes::confirm_booking,
        routes::cancel_booking,
        // Reports
        routes::file_report,
        // Notifications
        routes::list_notifications,
        routes::mark_notification_read,
        routes::mark_all_notifications_read,
        // Admin
        routes::admin_list_users,
        routes::admin_block_user,
        routes::admin_unblock_user,
        routes::admin_list_properties,
        routes::admin_pending_users,
        routes::admin_pending_properties,
        routes::admin_decide_user,
        routes::admin_decide_property,
        routes::admin_list_reports,
        routes::admin_update_report_status,
        routes::admin_stats,
    ),
    components(
        schemas(
            types::RegisterRequest,
            types::LoginRequest,
            types::TokenRequest,
            types::UpdateProfileRequest,
            types::ChangePasswordRequest,
            types::DeleteAccountRequest,
            types::CreatePropertyRequest,
            types::UpdatePropertyRequest,
            types::CreateBookingRequest,
            types::FileReportRequest,
            types::DecisionRequest,
            types::ReportStatusRequest,
            types::AuthData,
            types::SessionData,
            types::RefreshData,
            types::PendingUserView,
            types::PendingPropertyView,
            types::ReportResponse,
            types::ReportView,
            types::PagedUsers,
            types::PagedProperties,
            types::PagedReports,
            types::AuthEnvelope,
            types::SessionEnvelope,
            types::RefreshEnvelope,
            types::UserEnvelope,
            types::VerificationEnvelope,
            types::PendingUsersEnvelope,
            types::PendingPropertiesEnvelope,
            types::PropertyEnvelope,
            types::PropertiesEnvelope,
            types::PagedPropertiesEnvelope,
            types::ImagesEnvelope,
            types::BookingEnvelope,
            types::BookingsEnvelope,
            types::ReportEnvelope,
            types::PagedReportsEnvelope,
            types::PagedUsersEnvelope,
            types::NotificationsEnvelope,
            types::StatsEnvelope,
            types::MessageEnvelope,
            crate::models::user::UserResponse,
            crate::models::user::UserRole,
            crate::models::property::PropertyResponse,
            crate::models::property::PropertyType,
            crate::models::property::PropertyImage,
            crate::models::verification::VerificationState,
            crate::models::verification::VerificationStatus,
            crate::models::verification::VerificationDocument,
            crate::models::verification::DocumentKind,
            crate::models::booking::Booking,
            crate::models::booking::BookingStatus,
            crate::models::notification::Notification,
            crate::services::admin_service::PlatformStats,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Profile", description = "Profile management endpoints"),
        (name = "Verification", description = "Identity and ownership verification. Submit documents, then wait for an admin decision."),
        (name = "Property", description = "Listing management and public search. Only approved, active listings are publicly visible."),
        (name = "Booking", description = "Reservations between tenants and owners"),
        (name = "Report", description = "Flag a user or listing for moderation"),
        (name = "Notification", description = "In-app notifications"),
        (name = "Admin", description = "Moderation console endpoints. ⚠️ All endpoints require an admin JWT. Use the Authorize button and paste your token as 'Bearer <token>'!")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
        openapi.components.as_mut().unwrap().add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
        openapi.security = Some(vec![utoipa::openapi::security::SecurityRequirement::new(
            "bearerAuth",
            Vec::<String>::new(),
        )]);
    }
}

pub async fn request_id_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use tracing::Instrument;

    let request_id = Uuid::new_v4().to_string();
    req.extensions_mut().insert(request_id.clone());
    let span = tracing::info_span!("request", request_id = %request_id, method = %req.method(), uri = %req.uri());
    next.run(req).instrument(span).await
}

/// Main entry point for the RoomGi API server.
/// Sets up all routes, middleware, and documentation endpoints.
pub async fn start_http_server() {
    let openapi = ApiDoc::openapi();
    let db = Arc::new(
        SqliteDatabase::new(&SqliteDatabase::default_path())
            .await
            .unwrap(),
    );
    let _ = GLOBAL_DB.set(db);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/auth", routes::auth_router())
        .nest("/api/profile", routes::profile_router())
        .nest("/api/properties", routes::property_router())
        .nest("/api/bookings", routes::booking_router())
        .nest("/api/reports", routes::report_router())
        .nest("/api/notifications", routes::notification_router())
        .nest("/api/admin", routes::admin_router())
        .route("/health", axum::routing::get(health_check))
        // OpenAPI Documentation Routes
        .route("/docs/openapi.json", axum::routing::get(openapi_json))
        .route("/docs/redoc", axum::routing::get(redoc_ui))
        .route("/docs/markdown", axum::routing::get(api_markdown))
        .route("/docs", axum::routing::get(api_documentation))
        // Swagger UI
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", openapi.clone()))
        // Redoc UI
        .merge(Redoc::with_url("/api/redoc", openapi))
        .layer(cors)
        .layer(axum::middleware::from_fn(global_rate_limiter))
        .layer(axum::middleware::from_fn(request_id_middleware));

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse().unwrap();

    println!("🚀 HTTP API running at http://{}/health", addr);
    println!("📚 API Documentation available at: http://{}/api/docs", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Export OpenAPI specification as JSON
async fn openapi_json() -> Json<Value> {
    let openapi = ApiDoc::openapi();
    Json(serde_json::to_value(openapi).unwrap())
}

/// Serves the Redoc UI for API documentation.
async fn redoc_ui() -> impl IntoResponse {
    let html = r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>RoomGi API Documentation</title>
        <meta charset="utf-8"/>
        <meta name="viewport" content="width=device-width, initial-scale=1">
        <style>
            body {
                margin: 0;
                padding: 0;
            }
        </style>
    </head>
    <body>
        <redoc spec-url="/docs/openapi.json"></redoc>
        <script src="https://cdn.redoc.ly/redoc/latest/bundles/redoc.standalone.js"></script>
    </body>
    </html>
    "#;
    axum::response::Html(html)
}

/// Serves the API documentation as downloadable Markdown.
async fn api_markdown() -> impl IntoResponse {
    let markdown = docs::generate_markdown_docs();
    axum::response::Response::builder()
        .header("Content-Type", "text/markdown")
        .header(
            "Content-Disposition",
            "attachment; filename=\"API_DOCUMENTATION.md\"",
        )
        .body(axum::body::Body::from(markdown))
        .unwrap()
}

/// Serves the main API documentation HTML page.
async fn api_documentation() -> impl IntoResponse {
    let html = docs::generate_documentation_html();
    axum::response::Html(html)
}
