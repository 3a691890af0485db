use crate::errors::{AppError, Result};
use crate::models::booking::{Booking, BookingStatus};
use crate::models::notification::Notification;
use crate::models::property::{Property, PropertyImage, PropertyType};
use crate::models::report::{Report, ReportReason, ReportStatus, ReportTarget};
use crate::models::user::{User, UserRole};
use crate::models::verification::{VerificationState, VerificationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::OnceCell;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

pub static GLOBAL_DB: OnceCell<Arc<SqliteDatabase>> = OnceCell::new();

#[derive(Debug)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

/// Admin console filters over the user directory.
#[derive(Debug, Default, Clone)]
pub struct UserFilter {
    pub search: Option<String>,
    pub role: Option<UserRole>,
    pub verification_status: Option<VerificationStatus>,
    pub blocked: Option<bool>,
}

/// Admin console filters over listings.
#[derive(Debug, Default, Clone)]
pub struct PropertyFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub verification_status: Option<VerificationStatus>,
}

/// Admin console filters over reports.
#[derive(Debug, Default, Clone)]
pub struct ReportFilter {
    pub target_model: Option<String>,
    pub status: Option<ReportStatus>,
}

/// Tenant-facing search over publicly visible listings.
#[derive(Debug, Default, Clone)]
pub struct PropertySearch {
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
}

impl SqliteDatabase {
    pub fn default_path() -> String {
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "roomgi.db".to_string())
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        if let Some(parent) = Path::new(database_path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::DatabaseError(format!("Failed to create database directory: {}", e))
            })?;
        }

        if !Path::new(database_path).exists() {
            std::fs::File::create(database_path).map_err(|e| {
                AppError::DatabaseError(format!("Failed to create database file: {}", e))
            })?;
            println!("📁 Created new database file: {}", database_path);
        }
        let database_url = format!("sqlite:{}", database_path);

        let pool = SqlitePool::connect(&database_url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))?;

        let db = Self { pool };
        db.create_tables().await?;

        println!("✅ Connected to SQLite database: {}", database_path);
        Ok(db)
    }

    /// Test-only pool. A single connection keeps every query on the same
    /// in-memory database.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to open in-memory db: {}", e)))?;
        let db = Self { pool };
        db.create_tables().await?;
        Ok(db)
    }

    async fn create_tables(&self) -> Result<()> {
        let query = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                full_name TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                phone_number TEXT,
                city TEXT,
                is_blocked BOOLEAN DEFAULT FALSE,
                verification_status TEXT NOT NULL DEFAULT 'unverified',
                rejection_reason TEXT,
                verification_documents TEXT NOT NULL DEFAULT '[]',
                is_deleted BOOLEAN DEFAULT FALSE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_tokens (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                token_id TEXT UNIQUE NOT NULL,
                token_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                is_active BOOLEAN DEFAULT TRUE,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS properties (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                property_type TEXT NOT NULL,
                city TEXT NOT NULL,
                address TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                monthly_rent REAL NOT NULL,
                security_deposit REAL NOT NULL,
                bedrooms INTEGER NOT NULL,
                amenities TEXT NOT NULL DEFAULT '[]',
                images TEXT NOT NULL DEFAULT '[]',
                is_active BOOLEAN DEFAULT TRUE,
                verification_status TEXT NOT NULL DEFAULT 'unverified',
                rejection_reason TEXT,
                verification_documents TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (owner_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS reports (
                id TEXT PRIMARY KEY,
                reporter_id TEXT NOT NULL,
                target_model TEXT NOT NULL,
                target_id TEXT NOT NULL,
                reason TEXT NOT NULL,
                message TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                resolved_at TEXT,
                FOREIGN KEY (reporter_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                tenant_id TEXT NOT NULL,
                property_id TEXT NOT NULL,
                check_in TEXT NOT NULL,
                check_out TEXT NOT NULL,
                monthly_rent REAL NOT NULL,
                security_deposit REAL NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (tenant_id) REFERENCES users (id) ON DELETE CASCADE,
                FOREIGN KEY (property_id) REFERENCES properties (id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS notifications (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                message TEXT NOT NULL,
                is_read BOOLEAN DEFAULT FALSE,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);
            CREATE INDEX IF NOT EXISTS idx_users_verification ON users(verification_status);
            CREATE INDEX IF NOT EXISTS idx_tokens_user_id ON user_tokens(user_id);
            CREATE INDEX IF NOT EXISTS idx_tokens_token_id ON user_tokens(token_id);
            CREATE INDEX IF NOT EXISTS idx_properties_owner ON properties(owner_id);
            CREATE INDEX IF NOT EXISTS idx_properties_city ON properties(city);
            CREATE INDEX IF NOT EXISTS idx_properties_verification ON properties(verification_status);
            CREATE INDEX IF NOT EXISTS idx_reports_status ON reports(status);
            CREATE INDEX IF NOT EXISTS idx_reports_target ON reports(target_model, target_id);
            CREATE INDEX IF NOT EXISTS idx_bookings_tenant ON bookings(tenant_id);
            CREATE INDEX IF NOT EXISTS idx_bookings_property ON bookings(property_id);
            CREATE INDEX IF NOT EXISTS idx_notifications_user ON notifications(user_id);
        "#;

        sqlx::query(query)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create tables: {}", e)))?;

        Ok(())
    }

    fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::DatabaseError(format!("Invalid {} date: {}", column, e)))
    }

    fn parse_date(value: &str, column: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|e| AppError::DatabaseError(format!("Invalid {} date: {}", column, e)))
    }

    fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
        Uuid::parse_str(value)
            .map_err(|e| AppError::DatabaseError(format!("Invalid {} id: {}", column, e)))
    }

    fn verification_from_row(row: &SqliteRow) -> Result<VerificationState> {
        let status = VerificationStatus::parse(&row.get::<String, _>("verification_status"))?;
        let documents = serde_json::from_str(&row.get::<String, _>("verification_documents"))
            .map_err(|e| {
                AppError::SerializationError(format!("Invalid verification documents: {}", e))
            })?;
        Ok(VerificationState::from_parts(
            status,
            row.get("rejection_reason"),
            documents,
        ))
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: Self::parse_uuid(&row.get::<String, _>("id"), "user")?,
            email: row.get("email"),
            full_name: row.get("full_name"),
            password_hash: row.get("password_hash"),
            role: UserRole::parse(&row.get::<String, _>("role"))?,
            phone_number: row.get("phone_number"),
            city: row.get("city"),
            is_blocked: row.get("is_blocked"),
            verification: Self::verification_from_row(row)?,
            is_deleted: row.get("is_deleted"),
            created_at: Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
            updated_at: Self::parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
        })
    }

    fn row_to_property(row: &SqliteRow) -> Result<Property> {
        let amenities: Vec<String> = serde_json::from_str(&row.get::<String, _>("amenities"))
            .map_err(|e| AppError::SerializationError(format!("Invalid amenities: {}", e)))?;
        let images: Vec<PropertyImage> = serde_json::from_str(&row.get::<String, _>("images"))
            .map_err(|e| AppError::SerializationError(format!("Invalid images: {}", e)))?;
        Ok(Property {
            id: Self::parse_uuid(&row.get::<String, _>("id"), "property")?,
            owner_id: Self::parse_uuid(&row.get::<String, _>("owner_id"), "owner")?,
            title: row.get("title"),
            description: row.get("description"),
            property_type: PropertyType::parse(&row.get::<String, _>("property_type"))?,
            city: row.get("city"),
            address: row.get("address"),
            latitude: row.get("latitude"),
            longitude: row.get("longitude"),
            monthly_rent: row.get("monthly_rent"),
            security_deposit: row.get("security_deposit"),
            bedrooms: row.get("bedrooms"),
            amenities,
            images,
            is_active: row.get("is_active"),
            verification: Self::verification_from_row(row)?,
            created_at: Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
            updated_at: Self::parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
        })
    }

    fn row_to_report(row: &SqliteRow) -> Result<Report> {
        let target = ReportTarget::from_parts(
            &row.get::<String, _>("target_model"),
            Self::parse_uuid(&row.get::<String, _>("target_id"), "target")?,
        )?;
        Ok(Report::from_parts(
            Self::parse_uuid(&row.get::<String, _>("id"), "report")?,
            Self::parse_uuid(&row.get::<String, _>("reporter_id"), "reporter")?,
            target,
            ReportReason::parse(&row.get::<String, _>("reason"))?,
            row.get("message"),
            ReportStatus::parse(&row.get::<String, _>("status"))?,
            Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
            row.get::<Option<String>, _>("resolved_at")
                .map(|s| Self::parse_timestamp(&s, "resolved_at"))
                .transpose()?,
        ))
    }

    fn row_to_booking(row: &SqliteRow) -> Result<Booking> {
        Ok(Booking {
            id: Self::parse_uuid(&row.get::<String, _>("id"), "booking")?,
            tenant_id: Self::parse_uuid(&row.get::<String, _>("tenant_id"), "tenant")?,
            property_id: Self::parse_uuid(&row.get::<String, _>("property_id"), "property")?,
            check_in: Self::parse_date(&row.get::<String, _>("check_in"), "check_in")?,
            check_out: Self::parse_date(&row.get::<String, _>("check_out"), "check_out")?,
            monthly_rent: row.get("monthly_rent"),
            security_deposit: row.get("security_deposit"),
            status: BookingStatus::parse(&row.get::<String, _>("status"))?,
            created_at: Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
            updated_at: Self::parse_timestamp(&row.get::<String, _>("updated_at"), "updated_at")?,
        })
    }

    fn row_to_notification(row: &SqliteRow) -> Result<Notification> {
        Ok(Notification {
            id: Self::parse_uuid(&row.get::<String, _>("id"), "notification")?,
            user_id: Self::parse_uuid(&row.get::<String, _>("user_id"), "user")?,
            title: row.get("title"),
            message: row.get("message"),
            is_read: row.get("is_read"),
            created_at: Self::parse_timestamp(&row.get::<String, _>("created_at"), "created_at")?,
        })
    }

    // ---- users ----

    pub async fn create_user(&self, user: &User) -> Result<()> {
        let query = r#"
            INSERT INTO users (id, email, full_name, password_hash, role, phone_number, city, is_blocked, verification_status, rejection_reason, verification_documents, is_deleted, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
        "#;

        sqlx::query(query)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(&user.phone_number)
            .bind(&user.city)
            .bind(user.is_blocked)
            .bind(user.verification.status().as_str())
            .bind(user.verification.rejection_reason())
            .bind(serde_json::to_string(user.verification.documents())?)
            .bind(user.is_deleted)
            .bind(user.created_at.to_rfc3339())
            .bind(user.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.to_string().contains("UNIQUE constraint failed") {
                    AppError::ValidationError("Email already registered".to_string())
                } else {
                    AppError::DatabaseError(format!("Failed to create user: {}", e))
                }
            })?;

        Ok(())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?1 AND is_deleted = FALSE")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user by email: {}", e)))?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    pub async fn get_user_by_id(&self, user_id: &Uuid) -> Result<User> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?1 AND is_deleted = FALSE")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or_else(|| AppError::NotFoundError("User not found".to_string()))?;

        Self::row_to_user(&row)
    }

    pub async fn update_user_profile(&self, user: &User) -> Result<()> {
        sqlx::query("UPDATE users SET full_name = ?1, phone_number = ?2, city = ?3, updated_at = ?4 WHERE id = ?5")
            .bind(&user.full_name)
            .bind(&user.phone_number)
            .bind(&user.city)
            .bind(Utc::now().to_rfc3339())
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update profile: {}", e)))?;
        Ok(())
    }

    pub async fn update_user_password(&self, user_id: &Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(password_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update password: {}", e)))?;
        Ok(())
    }

    pub async fn set_user_blocked(&self, user_id: &Uuid, blocked: bool) -> Result<()> {
        sqlx::query("UPDATE users SET is_blocked = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(blocked)
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update blocked flag: {}", e)))?;
        Ok(())
    }

    pub async fn soft_delete_user(&self, user_id: &Uuid) -> Result<()> {
        sqlx::query("UPDATE users SET is_deleted = TRUE, updated_at = ?1 WHERE id = ?2")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete user: {}", e)))?;
        Ok(())
    }

    pub async fn update_user_verification(
        &self,
        user_id: &Uuid,
        state: &VerificationState,
    ) -> Result<()> {
        sqlx::query("UPDATE users SET verification_status = ?1, rejection_reason = ?2, verification_documents = ?3, updated_at = ?4 WHERE id = ?5")
            .bind(state.status().as_str())
            .bind(state.rejection_reason())
            .bind(serde_json::to_string(state.documents())?)
            .bind(Utc::now().to_rfc3339())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update user verification: {}", e)))?;
        Ok(())
    }

    pub async fn list_pending_user_verifications(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT * FROM users WHERE verification_status = 'pending' AND is_deleted = FALSE ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list pending users: {}", e)))?;

        rows.iter().map(Self::row_to_user).collect()
    }

    fn user_filter_clauses(filter: &UserFilter) -> (String, Vec<String>) {
        let mut sql = String::from(" WHERE is_deleted = FALSE");
        let mut binds: Vec<String> = Vec::new();
        if let Some(role) = filter.role {
            sql.push_str(" AND role = ?");
            binds.push(role.as_str().to_string());
        }
        if let Some(status) = filter.verification_status {
            sql.push_str(" AND verification_status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(blocked) = filter.blocked {
            sql.push_str(if blocked {
                " AND is_blocked = TRUE"
            } else {
                " AND is_blocked = FALSE"
            });
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(" AND (full_name LIKE ? OR email LIKE ?)");
            let pattern = format!("%{}%", search.trim());
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        (sql, binds)
    }

    pub async fn list_users_filtered(
        &self,
        filter: &UserFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>> {
        let (clauses, binds) = Self::user_filter_clauses(filter);
        let sql = format!(
            "SELECT * FROM users{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            clauses, limit, offset
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list users: {}", e)))?;
        rows.iter().map(Self::row_to_user).collect()
    }

    pub async fn count_users_filtered(&self, filter: &UserFilter) -> Result<i64> {
        let (clauses, binds) = Self::user_filter_clauses(filter);
        let sql = format!("SELECT COUNT(*) as count FROM users{}", clauses);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {}", e)))?;
        Ok(row.get("count"))
    }

    // ---- session tokens ----

    pub async fn store_user_token(
        &self,
        user_id: &Uuid,
        token_id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        let query = r#"
            INSERT INTO user_tokens (user_id, token_id, token_hash, created_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
        "#;

        sqlx::query(query)
            .bind(user_id.to_string())
            .bind(token_id)
            .bind(token_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(expires_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to store token: {}", e)))?;

        Ok(())
    }

    pub async fn is_token_valid(&self, token_id: &str) -> Result<bool> {
        let query = r#"
            SELECT COUNT(*) as count FROM user_tokens
            WHERE token_id = ?1 AND is_active = TRUE AND expires_at > ?2
        "#;

        let row = sqlx::query(query)
            .bind(token_id)
            .bind(Utc::now().to_rfc3339())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to validate token: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    pub async fn revoke_token(&self, token_id: &str) -> Result<()> {
        sqlx::query("UPDATE user_tokens SET is_active = FALSE WHERE token_id = ?1")
            .bind(token_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to revoke token: {}", e)))?;
        Ok(())
    }

    pub async fn revoke_all_user_tokens(&self, user_id: &Uuid) -> Result<()> {
        sqlx::query("UPDATE user_tokens SET is_active = FALSE WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to revoke tokens: {}", e)))?;
        Ok(())
    }

    pub async fn cleanup_expired_tokens(&self) -> Result<()> {
        sqlx::query("DELETE FROM user_tokens WHERE expires_at <= ?1")
            .bind(Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to clean up tokens: {}", e)))?;
        Ok(())
    }

    // ---- properties ----

    pub async fn create_property(&self, property: &Property) -> Result<()> {
        let query = r#"
            INSERT INTO properties (id, owner_id, title, description, property_type, city, address, latitude, longitude, monthly_rent, security_deposit, bedrooms, amenities, images, is_active, verification_status, rejection_reason, verification_documents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
        "#;

        sqlx::query(query)
            .bind(property.id.to_string())
            .bind(property.owner_id.to_string())
            .bind(&property.title)
            .bind(&property.description)
            .bind(property.property_type.as_str())
            .bind(&property.city)
            .bind(&property.address)
            .bind(property.latitude)
            .bind(property.longitude)
            .bind(property.monthly_rent)
            .bind(property.security_deposit)
            .bind(property.bedrooms)
            .bind(serde_json::to_string(&property.amenities)?)
            .bind(serde_json::to_string(&property.images)?)
            .bind(property.is_active)
            .bind(property.verification.status().as_str())
            .bind(property.verification.rejection_reason())
            .bind(serde_json::to_string(property.verification.documents())?)
            .bind(property.created_at.to_rfc3339())
            .bind(property.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create property: {}", e)))?;

        Ok(())
    }

    pub async fn get_property_by_id(&self, property_id: &Uuid) -> Result<Property> {
        let row = sqlx::query("SELECT * FROM properties WHERE id = ?1")
            .bind(property_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch property: {}", e)))?
            .ok_or_else(|| AppError::NotFoundError("Property not found".to_string()))?;

        Self::row_to_property(&row)
    }

    pub async fn update_property(&self, property: &Property) -> Result<()> {
        let query = r#"
            UPDATE properties SET title = ?1, description = ?2, property_type = ?3, city = ?4, address = ?5, latitude = ?6, longitude = ?7, monthly_rent = ?8, security_deposit = ?9, bedrooms = ?10, amenities = ?11, is_active = ?12, updated_at = ?13
            WHERE id = ?14
        "#;

        sqlx::query(query)
            .bind(&property.title)
            .bind(&property.description)
            .bind(property.property_type.as_str())
            .bind(&property.city)
            .bind(&property.address)
            .bind(property.latitude)
            .bind(property.longitude)
            .bind(property.monthly_rent)
            .bind(property.security_deposit)
            .bind(property.bedrooms)
            .bind(serde_json::to_string(&property.amenities)?)
            .bind(property.is_active)
            .bind(Utc::now().to_rfc3339())
            .bind(property.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update property: {}", e)))?;
        Ok(())
    }

    pub async fn update_property_images(
        &self,
        property_id: &Uuid,
        images: &[PropertyImage],
    ) -> Result<()> {
        sqlx::query("UPDATE properties SET images = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(serde_json::to_string(images)?)
            .bind(Utc::now().to_rfc3339())
            .bind(property_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update images: {}", e)))?;
        Ok(())
    }

    pub async fn update_property_verification(
        &self,
        property_id: &Uuid,
        state: &VerificationState,
    ) -> Result<()> {
        sqlx::query("UPDATE properties SET verification_status = ?1, rejection_reason = ?2, verification_documents = ?3, updated_at = ?4 WHERE id = ?5")
            .bind(state.status().as_str())
            .bind(state.rejection_reason())
            .bind(serde_json::to_string(state.documents())?)
            .bind(Utc::now().to_rfc3339())
            .bind(property_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update property verification: {}", e)))?;
        Ok(())
    }

    pub async fn delete_property(&self, property_id: &Uuid) -> Result<()> {
        sqlx::query("DELETE FROM properties WHERE id = ?1")
            .bind(property_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete property: {}", e)))?;
        Ok(())
    }

    pub async fn list_properties_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Property>> {
        let rows = sqlx::query("SELECT * FROM properties WHERE owner_id = ?1 ORDER BY created_at DESC")
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list owner properties: {}", e)))?;
        rows.iter().map(Self::row_to_property).collect()
    }

    pub async fn list_pending_property_verifications(&self) -> Result<Vec<Property>> {
        let rows = sqlx::query(
            "SELECT * FROM properties WHERE verification_status = 'pending' ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list pending properties: {}", e)))?;
        rows.iter().map(Self::row_to_property).collect()
    }

    fn public_search_clauses(search: &PropertySearch) -> (String, Vec<String>) {
        let mut sql =
            String::from(" WHERE verification_status = 'approved' AND is_active = TRUE");
        let mut binds: Vec<String> = Vec::new();
        if let Some(city) = search.city.as_deref().filter(|c| !c.trim().is_empty()) {
            sql.push_str(" AND city LIKE ?");
            binds.push(format!("%{}%", city.trim()));
        }
        if let Some(property_type) = search.property_type {
            sql.push_str(" AND property_type = ?");
            binds.push(property_type.as_str().to_string());
        }
        if let Some(min_rent) = search.min_rent {
            sql.push_str(&format!(" AND monthly_rent >= {}", min_rent));
        }
        if let Some(max_rent) = search.max_rent {
            sql.push_str(&format!(" AND monthly_rent <= {}", max_rent));
        }
        (sql, binds)
    }

    pub async fn search_public_properties(
        &self,
        search: &PropertySearch,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Property>> {
        let (clauses, binds) = Self::public_search_clauses(search);
        let sql = format!(
            "SELECT * FROM properties{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            clauses, limit, offset
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to search properties: {}", e)))?;
        rows.iter().map(Self::row_to_property).collect()
    }

    pub async fn count_public_properties(&self, search: &PropertySearch) -> Result<i64> {
        let (clauses, binds) = Self::public_search_clauses(search);
        let sql = format!("SELECT COUNT(*) as count FROM properties{}", clauses);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count properties: {}", e)))?;
        Ok(row.get("count"))
    }

    fn property_filter_clauses(filter: &PropertyFilter) -> (String, Vec<String>) {
        let mut sql = String::from(" WHERE 1 = 1");
        let mut binds: Vec<String> = Vec::new();
        if let Some(status) = filter.verification_status {
            sql.push_str(" AND verification_status = ?");
            binds.push(status.as_str().to_string());
        }
        if let Some(city) = filter.city.as_deref().filter(|c| !c.trim().is_empty()) {
            sql.push_str(" AND city LIKE ?");
            binds.push(format!("%{}%", city.trim()));
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            sql.push_str(" AND (title LIKE ? OR city LIKE ?)");
            let pattern = format!("%{}%", search.trim());
            binds.push(pattern.clone());
            binds.push(pattern);
        }
        (sql, binds)
    }

    pub async fn list_properties_filtered(
        &self,
        filter: &PropertyFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Property>> {
        let (clauses, binds) = Self::property_filter_clauses(filter);
        let sql = format!(
            "SELECT * FROM properties{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            clauses, limit, offset
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list properties: {}", e)))?;
        rows.iter().map(Self::row_to_property).collect()
    }

    pub async fn count_properties_filtered(&self, filter: &PropertyFilter) -> Result<i64> {
        let (clauses, binds) = Self::property_filter_clauses(filter);
        let sql = format!("SELECT COUNT(*) as count FROM properties{}", clauses);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count properties: {}", e)))?;
        Ok(row.get("count"))
    }

    // ---- reports ----

    pub async fn create_report(&self, report: &Report) -> Result<()> {
        let query = r#"
            INSERT INTO reports (id, reporter_id, target_model, target_id, reason, message, status, created_at, resolved_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#;

        sqlx::query(query)
            .bind(report.id.to_string())
            .bind(report.reporter_id.to_string())
            .bind(report.target.model())
            .bind(report.target.id().to_string())
            .bind(report.reason.as_str())
            .bind(&report.message)
            .bind(report.status().as_str())
            .bind(report.created_at.to_rfc3339())
            .bind(report.resolved_at().map(|dt| dt.to_rfc3339()))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create report: {}", e)))?;
        Ok(())
    }

    pub async fn get_report_by_id(&self, report_id: &Uuid) -> Result<Report> {
        let row = sqlx::query("SELECT * FROM reports WHERE id = ?1")
            .bind(report_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch report: {}", e)))?
            .ok_or_else(|| AppError::NotFoundError("Report not found".to_string()))?;

        Self::row_to_report(&row)
    }

    pub async fn update_report_status(&self, report: &Report) -> Result<()> {
        sqlx::query("UPDATE reports SET status = ?1, resolved_at = ?2 WHERE id = ?3")
            .bind(report.status().as_str())
            .bind(report.resolved_at().map(|dt| dt.to_rfc3339()))
            .bind(report.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update report: {}", e)))?;
        Ok(())
    }

    fn report_filter_clauses(filter: &ReportFilter) -> (String, Vec<String>) {
        let mut sql = String::from(" WHERE 1 = 1");
        let mut binds: Vec<String> = Vec::new();
        if let Some(model) = filter.target_model.as_deref() {
            sql.push_str(" AND target_model = ?");
            binds.push(model.to_string());
        }
        if let Some(status) = filter.status {
            sql.push_str(" AND status = ?");
            binds.push(status.as_str().to_string());
        }
        (sql, binds)
    }

    pub async fn list_reports_filtered(
        &self,
        filter: &ReportFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Report>> {
        let (clauses, binds) = Self::report_filter_clauses(filter);
        let sql = format!(
            "SELECT * FROM reports{} ORDER BY created_at DESC LIMIT {} OFFSET {}",
            clauses, limit, offset
        );
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list reports: {}", e)))?;
        rows.iter().map(Self::row_to_report).collect()
    }

    pub async fn count_reports_filtered(&self, filter: &ReportFilter) -> Result<i64> {
        let (clauses, binds) = Self::report_filter_clauses(filter);
        let sql = format!("SELECT COUNT(*) as count FROM reports{}", clauses);
        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }
        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count reports: {}", e)))?;
        Ok(row.get("count"))
    }

    // ---- bookings ----

    pub async fn create_booking(&self, booking: &Booking) -> Result<()> {
        let query = r#"
            INSERT INTO bookings (id, tenant_id, property_id, check_in, check_out, monthly_rent, security_deposit, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#;

        sqlx::query(query)
            .bind(booking.id.to_string())
            .bind(booking.tenant_id.to_string())
            .bind(booking.property_id.to_string())
            .bind(booking.check_in.format("%Y-%m-%d").to_string())
            .bind(booking.check_out.format("%Y-%m-%d").to_string())
            .bind(booking.monthly_rent)
            .bind(booking.security_deposit)
            .bind(booking.status.as_str())
            .bind(booking.created_at.to_rfc3339())
            .bind(booking.updated_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create booking: {}", e)))?;
        Ok(())
    }

    pub async fn get_booking_by_id(&self, booking_id: &Uuid) -> Result<Booking> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?1")
            .bind(booking_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch booking: {}", e)))?
            .ok_or_else(|| AppError::NotFoundError("Booking not found".to_string()))?;

        Self::row_to_booking(&row)
    }

    pub async fn list_bookings_by_tenant(&self, tenant_id: &Uuid) -> Result<Vec<Booking>> {
        let rows = sqlx::query("SELECT * FROM bookings WHERE tenant_id = ?1 ORDER BY created_at DESC")
            .bind(tenant_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list bookings: {}", e)))?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    pub async fn list_bookings_by_owner(&self, owner_id: &Uuid) -> Result<Vec<Booking>> {
        let query = r#"
            SELECT b.* FROM bookings b
            JOIN properties p ON b.property_id = p.id
            WHERE p.owner_id = ?1
            ORDER BY b.created_at DESC
        "#;
        let rows = sqlx::query(query)
            .bind(owner_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list owner bookings: {}", e)))?;
        rows.iter().map(Self::row_to_booking).collect()
    }

    pub async fn update_booking_status(
        &self,
        booking_id: &Uuid,
        status: BookingStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(status.as_str())
            .bind(Utc::now().to_rfc3339())
            .bind(booking_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update booking: {}", e)))?;
        Ok(())
    }

    // ---- notifications ----

    pub async fn create_notification(&self, notification: &Notification) -> Result<()> {
        let query = r#"
            INSERT INTO notifications (id, user_id, title, message, is_read, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        sqlx::query(query)
            .bind(notification.id.to_string())
            .bind(notification.user_id.to_string())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.is_read)
            .bind(notification.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to create notification: {}", e)))?;
        Ok(())
    }

    pub async fn get_user_notifications(
        &self,
        user_id: &Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<Notification>> {
        let sql = if let Some(limit) = limit {
            format!(
                "SELECT * FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC LIMIT {}",
                limit
            )
        } else {
            "SELECT * FROM notifications WHERE user_id = ?1 ORDER BY created_at DESC".to_string()
        };
        let rows = sqlx::query(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list notifications: {}", e)))?;
        rows.iter().map(Self::row_to_notification).collect()
    }

    pub async fn mark_notification_read(
        &self,
        user_id: &Uuid,
        notification_id: &Uuid,
    ) -> Result<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = ?1 AND user_id = ?2")
            .bind(notification_id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to mark notification: {}", e)))?;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, user_id: &Uuid) -> Result<()> {
        sqlx::query("UPDATE notifications SET is_read = TRUE WHERE user_id = ?1")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to mark notifications: {}", e)))?;
        Ok(())
    }

    // ---- counters for the admin console ----

    pub async fn count_users(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM users WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count users: {}", e)))?;
        Ok(row.get("count"))
    }

    pub async fn count_properties(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM properties")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count properties: {}", e)))?;
        Ok(row.get("count"))
    }

    pub async fn count_pending_user_verifications(&self) -> Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM users WHERE verification_status = 'pending' AND is_deleted = FALSE",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to count pending users: {}", e)))?;
        Ok(row.get("count"))
    }

    pub async fn count_pending_property_verifications(&self) -> Result<i64> {
        let row =
            sqlx::query("SELECT COUNT(*) as count FROM properties WHERE verification_status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to count pending properties: {}", e))
                })?;
        Ok(row.get("count"))
    }

    pub async fn count_open_reports(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM reports WHERE status = 'pending'")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to count reports: {}", e)))?;
        Ok(row.get("count"))
    }
}
