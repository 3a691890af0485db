use axum::extract::{Multipart, Path, Query};
use axum::http::{header::AUTHORIZATION, request::Parts, StatusCode};
use axum::routing::{delete, get, post, put};
use axum::{extract::FromRequestParts, Json, Router};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::types::*;
use crate::database::sqlite::{
    PropertyFilter, PropertySearch, ReportFilter, SqliteDatabase, UserFilter, GLOBAL_DB,
};
use crate::errors::{AppError, Result};
use crate::models::property::{PropertyResponse, PropertyType};
use crate::models::report::{ReportReason, ReportStatus, ReportTarget};
use crate::models::user::UserRole;
use crate::models::verification::{DocumentKind, ReviewDecision, VerificationStatus};
use crate::services::admin_service::AdminService;
use crate::services::auth::AuthService;
use crate::services::booking_service::BookingService;
use crate::services::geocoding_service::GeocodingService;
use crate::services::jwt::{AdminContext, AuthenticatedUser};
use crate::services::notification_service::NotificationService;
use crate::services::property_service::{ImageUpload, ListingUpdate, NewListing, PropertyService};
use crate::services::report_service::ReportService;
use crate::services::storage_service::{HttpStorageService, ObjectStorage};
use crate::services::user_service::UserService;
use crate::services::verification_service::{DocumentUpload, VerificationService};

// JWT extractor for Authorization: Bearer ...
pub struct AuthBearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthBearer
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, String);
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        if let Some(auth) = parts.headers.get(AUTHORIZATION) {
            if let Ok(auth_str) = auth.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    return Ok(AuthBearer(token.to_string()));
                }
            }
        }
        Err((
            StatusCode::UNAUTHORIZED,
            "Missing or invalid Authorization header".to_string(),
        ))
    }
}

fn error_status(err: &AppError) -> StatusCode {
    match err {
        AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        AppError::AuthenticationError(_) | AppError::JwtError(_) => StatusCode::UNAUTHORIZED,
        AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
        AppError::NotFoundError(_) => StatusCode::NOT_FOUND,
        AppError::StorageError(_) | AppError::GeocodingError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn current_user(token: &str, db: Arc<SqliteDatabase>) -> Result<AuthenticatedUser> {
    let auth_service = AuthService::new(db);
    auth_service.validate_token(token).await
}

/// Admin routes turn the bearer token into an explicit capability; the
/// stored record is re-read so a blocked or demoted admin loses access
/// immediately, not at token expiry.
async fn admin_context(token: &str, db: Arc<SqliteDatabase>) -> Result<AdminContext> {
    let user = current_user(token, db.clone()).await?;
    let record = db.get_user_by_id(&user.user_id).await?;
    AdminContext::for_user(&record)
}

fn storage() -> Arc<dyn ObjectStorage> {
    Arc::new(HttpStorageService::from_env())
}

fn verification_service(db: Arc<SqliteDatabase>) -> VerificationService {
    VerificationService::new(db, storage())
}

fn property_service(db: Arc<SqliteDatabase>) -> PropertyService {
    PropertyService::new(db, storage(), Some(GeocodingService::from_env()))
}

/// Multipart body with `documents[]` file parts and parallel
/// `documentTypes[]` labels.
async fn read_document_uploads(mut multipart: Multipart) -> Result<Vec<DocumentUpload>> {
    let mut files: Vec<(String, String, Vec<u8>)> = Vec::new();
    let mut kinds: Vec<DocumentKind> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "documents" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {}", e)))?
                    .to_vec();
                files.push((filename, content_type, bytes));
            }
            "documentTypes" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Failed to read field: {}", e)))?;
                kinds.push(DocumentKind::parse(text.trim())?);
            }
            _ => {}
        }
    }

    if files.len() != kinds.len() {
        return Err(AppError::ValidationError(
            "Each document needs a matching documentTypes entry".to_string(),
        ));
    }

    Ok(files
        .into_iter()
        .zip(kinds)
        .map(|((filename, content_type, bytes), kind)| DocumentUpload {
            kind,
            filename,
            content_type,
            bytes,
        })
        .collect())
}

async fn read_image_uploads(mut multipart: Multipart) -> Result<Vec<ImageUpload>> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "images" {
            continue;
        }
        let filename = field.file_name().unwrap_or("image").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::ValidationError(format!("Failed to read upload: {}", e)))?
            .to_vec();
        uploads.push(ImageUpload {
            filename,
            content_type,
            bytes,
        });
    }
    Ok(uploads)
}

// ---- routers ----

pub fn auth_router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/validate", post(validate))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .route("/logout-all", post(logout_all))
        .route("/delete-account", post(delete_account))
}

pub fn profile_router() -> Router {
    Router::new()
        .route("/", get(get_profile))
        .route("/", put(update_profile))
        .route("/change-password", post(change_password))
        .route("/verification", get(my_verification))
        .route("/verification/documents", post(submit_identity_documents))
}

pub fn property_router() -> Router {
    Router::new()
        .route("/", get(search_properties))
        .route("/", post(create_property))
        .route("/mine", get(my_properties))
        .route("/:id", get(get_property))
        .route("/:id", put(update_property))
        .route("/:id", delete(delete_property))
        .route("/:id/images", post(upload_property_images))
        .route("/:id/verification", get(property_verification))
        .route("/:id/verification/documents", post(submit_property_documents))
}

pub fn booking_router() -> Router {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(my_bookings))
        .route("/owner", get(owner_bookings))
        .route("/:id/confirm", post(confirm_booking))
        .route("/:id/cancel", post(cancel_booking))
}

pub fn report_router() -> Router {
    Router::new().route("/", post(file_report))
}

pub fn notification_router() -> Router {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/mark-read", post(mark_notification_read))
        .route("/mark-all-read", post(mark_all_notifications_read))
}

pub fn admin_router() -> Router {
    Router::new()
        .route("/users", get(admin_list_users))
        .route("/users/:id/block", post(admin_block_user))
        .route("/users/:id/unblock", post(admin_unblock_user))
        .route("/properties", get(admin_list_properties))
        .route("/verification/users", get(admin_pending_users))
        .route("/verification/users/:id/decide", post(admin_decide_user))
        .route("/verification/properties", get(admin_pending_properties))
        .route(
            "/verification/properties/:id/decide",
            post(admin_decide_property),
        )
        .route("/reports", get(admin_list_reports))
        .route("/reports/:id/status", post(admin_update_report_status))
        .route("/stats", get(admin_stats))
}

// ---- auth ----

#[utoipa::path(post, path = "/api/auth/register", request_body = RegisterRequest, responses((status = 200, body = UserEnvelope), (status = 400, body = UserEnvelope)), tag = "Auth")]
pub async fn register(Json(req): Json<RegisterRequest>) -> (StatusCode, Json<UserEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let role = match UserRole::parse(req.role.trim()) {
        Ok(role) => role,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(UserEnvelope::err(e.to_string()))),
    };

    let user_service = UserService::new(db);
    match user_service
        .register_user(
            &req.email,
            &req.full_name,
            &req.password,
            role,
            req.phone_number,
            req.city,
        )
        .await
    {
        Ok(user) => {
            info!(action = "register_success", user_id = %user.id);
            (
                StatusCode::OK,
                Json(UserEnvelope::ok(user.into(), "Account created successfully")),
            )
        }
        Err(e) => {
            error!(action = "register_failed", user = %req.email, error = %e);
            (error_status(&e), Json(UserEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(post, path = "/api/auth/login", request_body = LoginRequest, responses((status = 200, body = AuthEnvelope), (status = 401, body = AuthEnvelope)), tag = "Auth")]
pub async fn login(Json(req): Json<LoginRequest>) -> (StatusCode, Json<AuthEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let auth_service = AuthService::new(db);
    match auth_service
        .login_and_generate_token(&req.email, &req.password)
        .await
    {
        Ok((token, user)) => {
            info!(action = "login_success", user_id = %user.id);
            (
                StatusCode::OK,
                Json(AuthEnvelope::ok(
                    AuthData {
                        token,
                        expires_in: 86400,
                        user: user.into(),
                    },
                    "Login successful",
                )),
            )
        }
        Err(e) => {
            error!(action = "login_failed", user = %req.email, error = %e);
            (error_status(&e), Json(AuthEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(post, path = "/api/auth/validate", request_body = TokenRequest, responses((status = 200, body = SessionEnvelope), (status = 401, body = SessionEnvelope)), tag = "Auth")]
pub async fn validate(Json(req): Json<TokenRequest>) -> (StatusCode, Json<SessionEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    match current_user(&req.token, db).await {
        Ok(user) => (
            StatusCode::OK,
            Json(SessionEnvelope::ok(
                SessionData {
                    user_id: user.user_id,
                    email: user.email,
                    role: user.role,
                },
                "Token is valid",
            )),
        ),
        Err(e) => (error_status(&e), Json(SessionEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/auth/refresh", request_body = TokenRequest, responses((status = 200, body = RefreshEnvelope), (status = 401, body = RefreshEnvelope)), tag = "Auth")]
pub async fn refresh(Json(req): Json<TokenRequest>) -> (StatusCode, Json<RefreshEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let auth_service = AuthService::new(db);
    match auth_service.refresh_token(&req.token).await {
        Ok(token) => (
            StatusCode::OK,
            Json(RefreshEnvelope::ok(
                RefreshData {
                    token,
                    expires_in: 86400,
                },
                "Token refreshed",
            )),
        ),
        Err(e) => (error_status(&e), Json(RefreshEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/auth/logout", request_body = TokenRequest, responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Auth")]
pub async fn logout(Json(req): Json<TokenRequest>) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let auth_service = AuthService::new(db);
    match auth_service.logout(&req.token).await {
        Ok(()) => (StatusCode::OK, Json(MessageEnvelope::ok("Logged out successfully"))),
        Err(e) => (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/auth/logout-all", request_body = TokenRequest, responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Auth")]
pub async fn logout_all(Json(req): Json<TokenRequest>) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let auth_service = AuthService::new(db);
    match auth_service.logout_all_devices(&req.token).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageEnvelope::ok("Logged out of all sessions")),
        ),
        Err(e) => (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/auth/delete-account", request_body = DeleteAccountRequest, responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Auth")]
pub async fn delete_account(
    AuthBearer(token): AuthBearer,
    Json(req): Json<DeleteAccountRequest>,
) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    };
    let user_service = UserService::new(db);
    match user_service.delete_account(&user.user_id, &req.password).await {
        Ok(()) => (StatusCode::OK, Json(MessageEnvelope::ok("Account deleted"))),
        Err(e) => {
            error!(action = "delete_account_failed", user_id = %user.user_id, error = %e);
            (error_status(&e), Json(MessageEnvelope::err(e.to_string())))
        }
    }
}

// ---- profile ----

#[utoipa::path(get, path = "/api/profile", responses((status = 200, body = UserEnvelope), (status = 401, body = UserEnvelope)), tag = "Profile")]
pub async fn get_profile(AuthBearer(token): AuthBearer) -> (StatusCode, Json<UserEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(UserEnvelope::err(e.to_string()))),
    };
    let user_service = UserService::new(db);
    match user_service.get_user(&user.user_id).await {
        Ok(profile) => (StatusCode::OK, Json(UserEnvelope::ok(profile, "OK"))),
        Err(e) => (error_status(&e), Json(UserEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(put, path = "/api/profile", request_body = UpdateProfileRequest, responses((status = 200, body = UserEnvelope), (status = 401, body = UserEnvelope)), tag = "Profile")]
pub async fn update_profile(
    AuthBearer(token): AuthBearer,
    Json(req): Json<UpdateProfileRequest>,
) -> (StatusCode, Json<UserEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(UserEnvelope::err(e.to_string()))),
    };
    let user_service = UserService::new(db);
    match user_service
        .update_profile(&user.user_id, req.full_name, req.phone_number, req.city)
        .await
    {
        Ok(profile) => (
            StatusCode::OK,
            Json(UserEnvelope::ok(profile, "Profile updated")),
        ),
        Err(e) => {
            error!(action = "update_profile_failed", user_id = %user.user_id, error = %e);
            (error_status(&e), Json(UserEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(post, path = "/api/profile/change-password", request_body = ChangePasswordRequest, responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Profile")]
pub async fn change_password(
    AuthBearer(token): AuthBearer,
    Json(req): Json<ChangePasswordRequest>,
) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    };
    let user_service = UserService::new(db);
    match user_service
        .change_user_password(&user.user_id, &req.current_password, &req.new_password)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(MessageEnvelope::ok("Password changed"))),
        Err(e) => {
            error!(action = "change_password_failed", user_id = %user.user_id, error = %e);
            (error_status(&e), Json(MessageEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(get, path = "/api/profile/verification", responses((status = 200, body = VerificationEnvelope), (status = 401, body = VerificationEnvelope)), tag = "Verification")]
pub async fn my_verification(
    AuthBearer(token): AuthBearer,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    match db.get_user_by_id(&user.user_id).await {
        Ok(record) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(record.verification, "OK")),
        ),
        Err(e) => (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    }
}

/// Multipart body: `documents` file parts with parallel `documentTypes`
/// labels (government_id, student_id, selfie).
#[utoipa::path(post, path = "/api/profile/verification/documents", responses((status = 200, body = VerificationEnvelope), (status = 400, body = VerificationEnvelope), (status = 401, body = VerificationEnvelope)), tag = "Verification")]
pub async fn submit_identity_documents(
    AuthBearer(token): AuthBearer,
    multipart: Multipart,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    let uploads = match read_document_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    match verification_service(db)
        .submit_user_documents(&user, uploads)
        .await
    {
        Ok(state) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(
                state,
                "Documents submitted for review",
            )),
        ),
        Err(e) => {
            error!(action = "identity_submission_failed", user_id = %user.user_id, error = %e);
            (error_status(&e), Json(VerificationEnvelope::err(e.to_string())))
        }
    }
}

// ---- properties ----

#[utoipa::path(get, path = "/api/properties", params(PropertySearchQuery), responses((status = 200, body = PagedPropertiesEnvelope)), tag = "Property")]
pub async fn search_properties(
    Query(query): Query<PropertySearchQuery>,
) -> (StatusCode, Json<PagedPropertiesEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let property_type = match query.property_type.as_deref() {
        Some(value) => match PropertyType::parse(value) {
            Ok(t) => Some(t),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(PagedPropertiesEnvelope::err(e.to_string())),
                )
            }
        },
        None => None,
    };
    let search = PropertySearch {
        city: query.city,
        property_type,
        min_rent: query.min_rent,
        max_rent: query.max_rent,
    };
    match property_service(db)
        .search(&search, query.page.unwrap_or(1), query.limit.unwrap_or(20))
        .await
    {
        Ok(page) => {
            let page = crate::services::Page {
                items: page
                    .items
                    .into_iter()
                    .map(PropertyResponse::from)
                    .collect::<Vec<_>>(),
                page: page.page,
                limit: page.limit,
                total_count: page.total_count,
                total_pages: page.total_pages,
            };
            (
                StatusCode::OK,
                Json(PagedPropertiesEnvelope::ok(page.into(), "OK")),
            )
        }
        Err(e) => (
            error_status(&e),
            Json(PagedPropertiesEnvelope::err(e.to_string())),
        ),
    }
}

#[utoipa::path(post, path = "/api/properties", request_body = CreatePropertyRequest, responses((status = 200, body = PropertyEnvelope), (status = 403, body = PropertyEnvelope)), tag = "Property")]
pub async fn create_property(
    AuthBearer(token): AuthBearer,
    Json(req): Json<CreatePropertyRequest>,
) -> (StatusCode, Json<PropertyEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(PropertyEnvelope::err(e.to_string()))),
    };
    let property_type = match PropertyType::parse(req.property_type.trim()) {
        Ok(t) => t,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(PropertyEnvelope::err(e.to_string()))),
    };
    let input = NewListing {
        title: req.title,
        description: req.description,
        property_type,
        city: req.city,
        address: req.address,
        monthly_rent: req.monthly_rent,
        security_deposit: req.security_deposit,
        bedrooms: req.bedrooms,
        amenities: req.amenities.unwrap_or_default(),
    };
    match property_service(db).create_listing(&user, input).await {
        Ok(property) => (
            StatusCode::OK,
            Json(PropertyEnvelope::ok(
                property.into(),
                "Listing created. Submit ownership documents to make it visible.",
            )),
        ),
        Err(e) => {
            error!(action = "create_listing_failed", user_id = %user.user_id, error = %e);
            (error_status(&e), Json(PropertyEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(get, path = "/api/properties/mine", responses((status = 200, body = PropertiesEnvelope), (status = 401, body = PropertiesEnvelope)), tag = "Property")]
pub async fn my_properties(AuthBearer(token): AuthBearer) -> (StatusCode, Json<PropertiesEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(PropertiesEnvelope::err(e.to_string()))),
    };
    match property_service(db).list_own(&user).await {
        Ok(properties) => (
            StatusCode::OK,
            Json(PropertiesEnvelope::ok(
                properties.into_iter().map(PropertyResponse::from).collect(),
                "OK",
            )),
        ),
        Err(e) => (error_status(&e), Json(PropertiesEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/properties/{id}", params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = PropertyEnvelope), (status = 404, body = PropertyEnvelope)), tag = "Property")]
pub async fn get_property(Path(property_id): Path<Uuid>) -> (StatusCode, Json<PropertyEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    match property_service(db).get_visible_listing(&property_id).await {
        Ok(property) => (StatusCode::OK, Json(PropertyEnvelope::ok(property.into(), "OK"))),
        Err(e) => (error_status(&e), Json(PropertyEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(put, path = "/api/properties/{id}", request_body = UpdatePropertyRequest, params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = PropertyEnvelope), (status = 403, body = PropertyEnvelope)), tag = "Property")]
pub async fn update_property(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
    Json(req): Json<UpdatePropertyRequest>,
) -> (StatusCode, Json<PropertyEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(PropertyEnvelope::err(e.to_string()))),
    };
    let update = ListingUpdate {
        title: req.title,
        description: req.description,
        city: req.city,
        address: req.address,
        monthly_rent: req.monthly_rent,
        security_deposit: req.security_deposit,
        bedrooms: req.bedrooms,
        amenities: req.amenities,
        is_active: req.is_active,
    };
    match property_service(db)
        .update_listing(&user, &property_id, update)
        .await
    {
        Ok(property) => (
            StatusCode::OK,
            Json(PropertyEnvelope::ok(property.into(), "Listing updated")),
        ),
        Err(e) => (error_status(&e), Json(PropertyEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(delete, path = "/api/properties/{id}", params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = MessageEnvelope), (status = 403, body = MessageEnvelope)), tag = "Property")]
pub async fn delete_property(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    };
    match property_service(db).delete_listing(&user, &property_id).await {
        Ok(()) => (StatusCode::OK, Json(MessageEnvelope::ok("Listing deleted"))),
        Err(e) => (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    }
}

/// Multipart body: `images` file parts.
#[utoipa::path(post, path = "/api/properties/{id}/images", params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = ImagesEnvelope), (status = 403, body = ImagesEnvelope)), tag = "Property")]
pub async fn upload_property_images(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
    multipart: Multipart,
) -> (StatusCode, Json<ImagesEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(ImagesEnvelope::err(e.to_string()))),
    };
    let uploads = match read_image_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(e) => return (error_status(&e), Json(ImagesEnvelope::err(e.to_string()))),
    };
    match property_service(db)
        .add_images(&user, &property_id, uploads)
        .await
    {
        Ok(images) => (StatusCode::OK, Json(ImagesEnvelope::ok(images, "Images uploaded"))),
        Err(e) => {
            error!(action = "image_upload_failed", property_id = %property_id, error = %e);
            (error_status(&e), Json(ImagesEnvelope::err(e.to_string())))
        }
    }
}

#[utoipa::path(get, path = "/api/properties/{id}/verification", params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = VerificationEnvelope), (status = 403, body = VerificationEnvelope)), tag = "Verification")]
pub async fn property_verification(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    match property_service(db).get_owned_listing(&user, &property_id).await {
        Ok(property) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(property.verification, "OK")),
        ),
        Err(e) => (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    }
}

/// Multipart body: `documents` file parts with parallel `documentTypes`
/// labels (ownership_proof, government_id, utility_bill).
#[utoipa::path(post, path = "/api/properties/{id}/verification/documents", params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = VerificationEnvelope), (status = 400, body = VerificationEnvelope), (status = 403, body = VerificationEnvelope)), tag = "Verification")]
pub async fn submit_property_documents(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
    multipart: Multipart,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    let uploads = match read_document_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    match verification_service(db)
        .submit_property_documents(&user, &property_id, uploads)
        .await
    {
        Ok(state) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(
                state,
                "Documents submitted for review",
            )),
        ),
        Err(e) => {
            error!(action = "property_submission_failed", property_id = %property_id, error = %e);
            (error_status(&e), Json(VerificationEnvelope::err(e.to_string())))
        }
    }
}

// ---- bookings ----

#[utoipa::path(post, path = "/api/bookings", request_body = CreateBookingRequest, responses((status = 200, body = BookingEnvelope), (status = 400, body = BookingEnvelope)), tag = "Booking")]
pub async fn create_booking(
    AuthBearer(token): AuthBearer,
    Json(req): Json<CreateBookingRequest>,
) -> (StatusCode, Json<BookingEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    };
    let booking_service = BookingService::new(db);
    match booking_service
        .create_booking(&user, &req.property_id, req.check_in, req.check_out)
        .await
    {
        Ok(booking) => (
            StatusCode::OK,
            Json(BookingEnvelope::ok(booking, "Booking requested")),
        ),
        Err(e) => (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/bookings", responses((status = 200, body = BookingsEnvelope), (status = 401, body = BookingsEnvelope)), tag = "Booking")]
pub async fn my_bookings(AuthBearer(token): AuthBearer) -> (StatusCode, Json<BookingsEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(BookingsEnvelope::err(e.to_string()))),
    };
    let booking_service = BookingService::new(db);
    match booking_service.list_for_tenant(&user).await {
        Ok(bookings) => (StatusCode::OK, Json(BookingsEnvelope::ok(bookings, "OK"))),
        Err(e) => (error_status(&e), Json(BookingsEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/bookings/owner", responses((status = 200, body = BookingsEnvelope), (status = 401, body = BookingsEnvelope)), tag = "Booking")]
pub async fn owner_bookings(AuthBearer(token): AuthBearer) -> (StatusCode, Json<BookingsEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(BookingsEnvelope::err(e.to_string()))),
    };
    let booking_service = BookingService::new(db);
    match booking_service.list_for_owner(&user).await {
        Ok(bookings) => (StatusCode::OK, Json(BookingsEnvelope::ok(bookings, "OK"))),
        Err(e) => (error_status(&e), Json(BookingsEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/bookings/{id}/confirm", params(("id" = Uuid, Path, description = "Booking ID")), responses((status = 200, body = BookingEnvelope), (status = 403, body = BookingEnvelope)), tag = "Booking")]
pub async fn confirm_booking(
    AuthBearer(token): AuthBearer,
    Path(booking_id): Path<Uuid>,
) -> (StatusCode, Json<BookingEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    };
    let booking_service = BookingService::new(db);
    match booking_service.confirm(&user, &booking_id).await {
        Ok(booking) => (
            StatusCode::OK,
            Json(BookingEnvelope::ok(booking, "Booking confirmed")),
        ),
        Err(e) => (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/bookings/{id}/cancel", params(("id" = Uuid, Path, description = "Booking ID")), responses((status = 200, body = BookingEnvelope), (status = 403, body = BookingEnvelope)), tag = "Booking")]
pub async fn cancel_booking(
    AuthBearer(token): AuthBearer,
    Path(booking_id): Path<Uuid>,
) -> (StatusCode, Json<BookingEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    };
    let booking_service = BookingService::new(db);
    match booking_service.cancel(&user, &booking_id).await {
        Ok(booking) => (
            StatusCode::OK,
            Json(BookingEnvelope::ok(booking, "Booking cancelled")),
        ),
        Err(e) => (error_status(&e), Json(BookingEnvelope::err(e.to_string()))),
    }
}

// ---- reports ----

#[utoipa::path(post, path = "/api/reports", request_body = FileReportRequest, responses((status = 200, body = ReportEnvelope), (status = 404, body = ReportEnvelope)), tag = "Report")]
pub async fn file_report(
    AuthBearer(token): AuthBearer,
    Json(req): Json<FileReportRequest>,
) -> (StatusCode, Json<ReportEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(ReportEnvelope::err(e.to_string()))),
    };
    let target = match ReportTarget::from_parts(req.target_model.trim(), req.target_id) {
        Ok(target) => target,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ReportEnvelope::err(e.to_string()))),
    };
    let reason = match ReportReason::parse(req.reason.trim()) {
        Ok(reason) => reason,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ReportEnvelope::err(e.to_string()))),
    };
    let report_service = ReportService::new(db);
    match report_service
        .file_report(&user, target, reason, &req.message)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ReportEnvelope::ok(report.into(), "Report submitted")),
        ),
        Err(e) => (error_status(&e), Json(ReportEnvelope::err(e.to_string()))),
    }
}

// ---- notifications ----

#[utoipa::path(get, path = "/api/notifications", responses((status = 200, body = NotificationsEnvelope), (status = 401, body = NotificationsEnvelope)), tag = "Notification")]
pub async fn list_notifications(
    AuthBearer(token): AuthBearer,
) -> (StatusCode, Json<NotificationsEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(NotificationsEnvelope::err(e.to_string()))),
    };
    let notification_service = NotificationService::new(db);
    match notification_service.list_for_user(&user.user_id, Some(50)).await {
        Ok(notifications) => (
            StatusCode::OK,
            Json(NotificationsEnvelope::ok(notifications, "OK")),
        ),
        Err(e) => (
            error_status(&e),
            Json(NotificationsEnvelope::err(e.to_string())),
        ),
    }
}

#[utoipa::path(post, path = "/api/notifications/{id}/mark-read", params(("id" = Uuid, Path, description = "Notification ID")), responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Notification")]
pub async fn mark_notification_read(
    AuthBearer(token): AuthBearer,
    Path(notification_id): Path<Uuid>,
) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    };
    let notification_service = NotificationService::new(db);
    match notification_service
        .mark_read(&user.user_id, &notification_id)
        .await
    {
        Ok(()) => (StatusCode::OK, Json(MessageEnvelope::ok("Notification marked as read"))),
        Err(e) => (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/notifications/mark-all-read", responses((status = 200, body = MessageEnvelope), (status = 401, body = MessageEnvelope)), tag = "Notification")]
pub async fn mark_all_notifications_read(
    AuthBearer(token): AuthBearer,
) -> (StatusCode, Json<MessageEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let user = match current_user(&token, db.clone()).await {
        Ok(u) => u,
        Err(e) => return (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    };
    let notification_service = NotificationService::new(db);
    match notification_service.mark_all_read(&user.user_id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageEnvelope::ok("All notifications marked as read")),
        ),
        Err(e) => (error_status(&e), Json(MessageEnvelope::err(e.to_string()))),
    }
}

// ---- admin ----

#[utoipa::path(get, path = "/api/admin/users", params(AdminUserQuery), responses((status = 200, body = PagedUsersEnvelope), (status = 403, body = PagedUsersEnvelope)), tag = "Admin")]
pub async fn admin_list_users(
    AuthBearer(token): AuthBearer,
    Query(query): Query<AdminUserQuery>,
) -> (StatusCode, Json<PagedUsersEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(PagedUsersEnvelope::err(e.to_string()))),
    };
    let role = match query.role.as_deref() {
        Some(value) => match UserRole::parse(value) {
            Ok(role) => Some(role),
            Err(e) => return (StatusCode::BAD_REQUEST, Json(PagedUsersEnvelope::err(e.to_string()))),
        },
        None => None,
    };
    let verification_status = match query.verification_status.as_deref() {
        Some(value) => match VerificationStatus::parse(value) {
            Ok(status) => Some(status),
            Err(e) => return (StatusCode::BAD_REQUEST, Json(PagedUsersEnvelope::err(e.to_string()))),
        },
        None => None,
    };
    let filter = UserFilter {
        search: query.search,
        role,
        verification_status,
        blocked: query.blocked,
    };
    let admin_service = AdminService::new(db);
    match admin_service
        .list_users(&admin, &filter, query.page.unwrap_or(1), query.limit.unwrap_or(20))
        .await
    {
        Ok(page) => (StatusCode::OK, Json(PagedUsersEnvelope::ok(page.into(), "OK"))),
        Err(e) => (error_status(&e), Json(PagedUsersEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/admin/users/{id}/block", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, body = UserEnvelope), (status = 403, body = UserEnvelope)), tag = "Admin")]
pub async fn admin_block_user(
    AuthBearer(token): AuthBearer,
    Path(user_id): Path<Uuid>,
) -> (StatusCode, Json<UserEnvelope>) {
    set_blocked(token, user_id, true).await
}

#[utoipa::path(post, path = "/api/admin/users/{id}/unblock", params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, body = UserEnvelope), (status = 403, body = UserEnvelope)), tag = "Admin")]
pub async fn admin_unblock_user(
    AuthBearer(token): AuthBearer,
    Path(user_id): Path<Uuid>,
) -> (StatusCode, Json<UserEnvelope>) {
    set_blocked(token, user_id, false).await
}

async fn set_blocked(token: String, user_id: Uuid, blocked: bool) -> (StatusCode, Json<UserEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(UserEnvelope::err(e.to_string()))),
    };
    let admin_service = AdminService::new(db);
    match admin_service.set_user_blocked(&admin, &user_id, blocked).await {
        Ok(user) => (
            StatusCode::OK,
            Json(UserEnvelope::ok(
                user,
                if blocked { "User blocked" } else { "User unblocked" },
            )),
        ),
        Err(e) => (error_status(&e), Json(UserEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/admin/properties", params(AdminPropertyQuery), responses((status = 200, body = PagedPropertiesEnvelope), (status = 403, body = PagedPropertiesEnvelope)), tag = "Admin")]
pub async fn admin_list_properties(
    AuthBearer(token): AuthBearer,
    Query(query): Query<AdminPropertyQuery>,
) -> (StatusCode, Json<PagedPropertiesEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => {
            return (
                error_status(&e),
                Json(PagedPropertiesEnvelope::err(e.to_string())),
            )
        }
    };
    let verification_status = match query.verification_status.as_deref() {
        Some(value) => match VerificationStatus::parse(value) {
            Ok(status) => Some(status),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(PagedPropertiesEnvelope::err(e.to_string())),
                )
            }
        },
        None => None,
    };
    let filter = PropertyFilter {
        search: query.search,
        city: query.city,
        verification_status,
    };
    let admin_service = AdminService::new(db);
    match admin_service
        .list_properties(&admin, &filter, query.page.unwrap_or(1), query.limit.unwrap_or(20))
        .await
    {
        Ok(page) => (
            StatusCode::OK,
            Json(PagedPropertiesEnvelope::ok(page.into(), "OK")),
        ),
        Err(e) => (
            error_status(&e),
            Json(PagedPropertiesEnvelope::err(e.to_string())),
        ),
    }
}

#[utoipa::path(get, path = "/api/admin/verification/users", responses((status = 200, body = PendingUsersEnvelope), (status = 403, body = PendingUsersEnvelope)), tag = "Admin")]
pub async fn admin_pending_users(
    AuthBearer(token): AuthBearer,
) -> (StatusCode, Json<PendingUsersEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(PendingUsersEnvelope::err(e.to_string()))),
    };
    match verification_service(db).list_pending_users(&admin).await {
        Ok(users) => {
            let views = users
                .into_iter()
                .map(|user| PendingUserView {
                    verification: user.verification.clone(),
                    user: user.into(),
                })
                .collect();
            (StatusCode::OK, Json(PendingUsersEnvelope::ok(views, "OK")))
        }
        Err(e) => (error_status(&e), Json(PendingUsersEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/admin/verification/properties", responses((status = 200, body = PendingPropertiesEnvelope), (status = 403, body = PendingPropertiesEnvelope)), tag = "Admin")]
pub async fn admin_pending_properties(
    AuthBearer(token): AuthBearer,
) -> (StatusCode, Json<PendingPropertiesEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => {
            return (
                error_status(&e),
                Json(PendingPropertiesEnvelope::err(e.to_string())),
            )
        }
    };
    match verification_service(db).list_pending_properties(&admin).await {
        Ok(pending) => {
            let views = pending
                .into_iter()
                .map(|entry| PendingPropertyView {
                    verification: entry.property.verification.clone(),
                    property: entry.property.into(),
                    owner: entry.owner,
                })
                .collect();
            (
                StatusCode::OK,
                Json(PendingPropertiesEnvelope::ok(views, "OK")),
            )
        }
        Err(e) => (
            error_status(&e),
            Json(PendingPropertiesEnvelope::err(e.to_string())),
        ),
    }
}

#[utoipa::path(post, path = "/api/admin/verification/users/{id}/decide", request_body = DecisionRequest, params(("id" = Uuid, Path, description = "User ID")), responses((status = 200, body = VerificationEnvelope), (status = 400, body = VerificationEnvelope), (status = 403, body = VerificationEnvelope)), tag = "Admin")]
pub async fn admin_decide_user(
    AuthBearer(token): AuthBearer,
    Path(user_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    let decision = match ReviewDecision::parse(req.status.trim()) {
        Ok(decision) => decision,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(VerificationEnvelope::err(e.to_string()))),
    };
    match verification_service(db)
        .decide_user(&admin, &user_id, decision, req.reason.as_deref())
        .await
    {
        Ok(state) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(state, "Decision recorded")),
        ),
        Err(e) => (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/admin/verification/properties/{id}/decide", request_body = DecisionRequest, params(("id" = Uuid, Path, description = "Property ID")), responses((status = 200, body = VerificationEnvelope), (status = 400, body = VerificationEnvelope), (status = 403, body = VerificationEnvelope)), tag = "Admin")]
pub async fn admin_decide_property(
    AuthBearer(token): AuthBearer,
    Path(property_id): Path<Uuid>,
    Json(req): Json<DecisionRequest>,
) -> (StatusCode, Json<VerificationEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    };
    let decision = match ReviewDecision::parse(req.status.trim()) {
        Ok(decision) => decision,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(VerificationEnvelope::err(e.to_string()))),
    };
    match verification_service(db)
        .decide_property(&admin, &property_id, decision, req.reason.as_deref())
        .await
    {
        Ok(state) => (
            StatusCode::OK,
            Json(VerificationEnvelope::ok(state, "Decision recorded")),
        ),
        Err(e) => (error_status(&e), Json(VerificationEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/admin/reports", params(AdminReportQuery), responses((status = 200, body = PagedReportsEnvelope), (status = 403, body = PagedReportsEnvelope)), tag = "Admin")]
pub async fn admin_list_reports(
    AuthBearer(token): AuthBearer,
    Query(query): Query<AdminReportQuery>,
) -> (StatusCode, Json<PagedReportsEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(PagedReportsEnvelope::err(e.to_string()))),
    };
    if let Some(model) = query.target_model.as_deref() {
        if model != "User" && model != "Property" {
            return (
                StatusCode::BAD_REQUEST,
                Json(PagedReportsEnvelope::err(format!(
                    "Target model must be 'User' or 'Property', got '{}'",
                    model
                ))),
            );
        }
    }
    let status = match query.status.as_deref() {
        Some(value) => match ReportStatus::parse(value) {
            Ok(status) => Some(status),
            Err(e) => return (StatusCode::BAD_REQUEST, Json(PagedReportsEnvelope::err(e.to_string()))),
        },
        None => None,
    };
    let filter = ReportFilter {
        target_model: query.target_model,
        status,
    };
    let report_service = ReportService::new(db);
    match report_service
        .list_reports(&admin, &filter, query.page.unwrap_or(1), query.limit.unwrap_or(20))
        .await
    {
        Ok(page) => (StatusCode::OK, Json(PagedReportsEnvelope::ok(page.into(), "OK"))),
        Err(e) => (error_status(&e), Json(PagedReportsEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(post, path = "/api/admin/reports/{id}/status", request_body = ReportStatusRequest, params(("id" = Uuid, Path, description = "Report ID")), responses((status = 200, body = ReportEnvelope), (status = 400, body = ReportEnvelope), (status = 403, body = ReportEnvelope)), tag = "Admin")]
pub async fn admin_update_report_status(
    AuthBearer(token): AuthBearer,
    Path(report_id): Path<Uuid>,
    Json(req): Json<ReportStatusRequest>,
) -> (StatusCode, Json<ReportEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(ReportEnvelope::err(e.to_string()))),
    };
    let status = match ReportStatus::parse(req.status.trim()) {
        Ok(status) => status,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(ReportEnvelope::err(e.to_string()))),
    };
    let report_service = ReportService::new(db);
    match report_service.update_status(&admin, &report_id, status).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ReportEnvelope::ok(report.into(), "Report updated")),
        ),
        Err(e) => (error_status(&e), Json(ReportEnvelope::err(e.to_string()))),
    }
}

#[utoipa::path(get, path = "/api/admin/stats", responses((status = 200, body = StatsEnvelope), (status = 403, body = StatsEnvelope)), tag = "Admin")]
pub async fn admin_stats(AuthBearer(token): AuthBearer) -> (StatusCode, Json<StatsEnvelope>) {
    let db = GLOBAL_DB.get().unwrap().clone();
    let admin = match admin_context(&token, db.clone()).await {
        Ok(a) => a,
        Err(e) => return (error_status(&e), Json(StatsEnvelope::err(e.to_string()))),
    };
    let admin_service = AdminService::new(db);
    match admin_service.platform_stats(&admin).await {
        Ok(stats) => (StatusCode::OK, Json(StatsEnvelope::ok(stats, "OK"))),
        Err(e) => (error_status(&e), Json(StatsEnvelope::err(e.to_string()))),
    }
}
