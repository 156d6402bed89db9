use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::time::Duration;
use thiserror::Error;

use crate::core::lookup::{ListingLookup, ListingQuery, LookupError};
use crate::models::{
    retention_rate, AdminMetrics, Listing, Neighborhood, NewListing, NewUser, ProfileUpdate, RecentProperty,
    Region, TypeCount, User, UserSummary, UserUpdate,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),
}

const LISTING_SELECT: &str = r#"
    SELECT h.id, h.title, h.description, h.property_type, h.price,
           h.region_id, r.name AS region_name,
           h.neighborhood_id, n.name AS neighborhood_name,
           h.exact_location, h.completion_status, h.months_left, h.is_featured,
           h.image_paths, h.contact_name, h.contact_phone, h.contact_email,
           h.created_by, u.username AS created_by_name,
           h.created_at, h.updated_at
    FROM houses h
    LEFT JOIN regions r ON h.region_id = r.id
    LEFT JOIN neighborhoods n ON h.neighborhood_id = n.id
    LEFT JOIN users u ON h.created_by = u.id
"#;

const USER_SELECT: &str = r#"
    SELECT id, username, email, password_hash, full_name, phone, role,
           is_active, created_at, last_login
    FROM users
"#;

fn decode_error(column: &str, err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(err),
    }
}

fn listing_from_row(row: &PgRow) -> Result<Listing, sqlx::Error> {
    let property_type: String = row.try_get("property_type")?;
    let completion_status: String = row.try_get("completion_status")?;
    let image_paths: Option<Json<Vec<String>>> = row.try_get("image_paths")?;

    Ok(Listing {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        property_type: property_type
            .parse()
            .map_err(|e| decode_error("property_type", e))?,
        price: row.try_get("price")?,
        region_id: row.try_get("region_id")?,
        region_name: row.try_get("region_name")?,
        neighborhood_id: row.try_get("neighborhood_id")?,
        neighborhood_name: row.try_get("neighborhood_name")?,
        exact_location: row.try_get("exact_location")?,
        completion_status: completion_status
            .parse()
            .map_err(|e| decode_error("completion_status", e))?,
        months_left: row.try_get("months_left")?,
        is_featured: row.try_get("is_featured")?,
        image_paths: image_paths.map(|paths| paths.0).unwrap_or_default(),
        contact_name: row.try_get("contact_name")?,
        contact_phone: row.try_get("contact_phone")?,
        contact_email: row.try_get("contact_email")?,
        created_by: row.try_get("created_by")?,
        created_by_name: row.try_get("created_by_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        full_name: row.try_get("full_name")?,
        phone: row.try_get("phone")?,
        role: row.try_get("role")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        last_login: row.try_get("last_login")?,
    })
}

/// Append the WHERE/ORDER/LIMIT part of a listing query; every value is bound
fn push_listing_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ListingQuery) {
    builder.push(" WHERE 1=1");

    if let Some(region_id) = query.region_id {
        builder.push(" AND h.region_id = ").push_bind(region_id);
    }
    if let Some(fragment) = &query.region_name_contains {
        builder.push(" AND r.name ILIKE ").push_bind(format!("%{}%", fragment));
    }
    match query.property_types.as_slice() {
        [] => {}
        [single] => {
            builder.push(" AND h.property_type = ").push_bind(single.code());
        }
        many => {
            builder.push(" AND h.property_type IN (");
            let mut separated = builder.separated(", ");
            for property_type in many {
                separated.push_bind(property_type.code());
            }
            separated.push_unseparated(")");
        }
    }
    if let Some(min_price) = query.min_price {
        builder.push(" AND h.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = query.max_price {
        builder.push(" AND h.price <= ").push_bind(max_price);
    }
    if let Some(owner) = query.created_by {
        builder.push(" AND h.created_by = ").push_bind(owner);
    }

    builder.push(" ORDER BY h.created_at DESC, h.id DESC");

    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit);
    }
}

/// Build the full listing SELECT for `query`
pub fn listing_query_builder(query: &ListingQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(LISTING_SELECT);
    push_listing_filters(&mut builder, query);
    builder
}

/// Whether a failure means the database could not be reached at all
fn is_unavailable(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)
    )
}

/// PostgreSQL store for listings, regions and accounts
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect and run pending migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    async fn query_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, sqlx::Error> {
        let rows = listing_query_builder(query).build().fetch_all(&self.pool).await?;
        rows.iter().map(listing_from_row).collect()
    }

    /// Listings matching `query`, newest first
    pub async fn find_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, PostgresError> {
        let listings = self.query_listings(query).await?;
        tracing::debug!("Listing query returned {} rows", listings.len());
        Ok(listings)
    }

    pub async fn get_listing(&self, id: i64) -> Result<Option<Listing>, PostgresError> {
        let query = format!("{} WHERE h.id = $1", LISTING_SELECT);
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(listing_from_row).transpose()?)
    }

    /// A listing only if `owner` created it
    pub async fn get_owned_listing(&self, id: i64, owner: i64) -> Result<Option<Listing>, PostgresError> {
        let query = format!("{} WHERE h.id = $1 AND h.created_by = $2", LISTING_SELECT);
        let row = sqlx::query(&query)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(listing_from_row).transpose()?)
    }

    /// Insert a listing and return its id
    pub async fn create_listing(&self, listing: &NewListing, created_by: i64) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO houses
                (title, description, region_id, neighborhood_id, exact_location,
                 property_type, completion_status, months_left, price, created_by, is_featured,
                 image_paths, contact_name, contact_phone, contact_email)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id
        "#;

        let id: i64 = sqlx::query_scalar(query)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.region_id)
            .bind(listing.neighborhood_id)
            .bind(&listing.exact_location)
            .bind(listing.property_type.code())
            .bind(listing.completion_status.code())
            .bind(listing.months_left)
            .bind(listing.price)
            .bind(created_by)
            .bind(listing.is_featured)
            .bind(Json(&listing.image_paths))
            .bind(&listing.contact_name)
            .bind(&listing.contact_phone)
            .bind(&listing.contact_email)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Created listing {} for user {}", id, created_by);
        Ok(id)
    }

    /// Replace a listing's fields. With `owner` set, only that user's listing
    /// is touched. Returns whether a row was updated.
    pub async fn update_listing(
        &self,
        id: i64,
        listing: &NewListing,
        owner: Option<i64>,
    ) -> Result<bool, PostgresError> {
        let query = r#"
            UPDATE houses
            SET title = $1, description = $2, region_id = $3, neighborhood_id = $4,
                exact_location = $5, property_type = $6, completion_status = $7,
                months_left = $8, price = $9, is_featured = $10,
                image_paths = $11, updated_at = NOW(),
                contact_name = $12, contact_phone = $13, contact_email = $14
            WHERE id = $15 AND ($16::BIGINT IS NULL OR created_by = $16)
        "#;

        let result = sqlx::query(query)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(listing.region_id)
            .bind(listing.neighborhood_id)
            .bind(&listing.exact_location)
            .bind(listing.property_type.code())
            .bind(listing.completion_status.code())
            .bind(listing.months_left)
            .bind(listing.price)
            .bind(listing.is_featured)
            .bind(Json(&listing.image_paths))
            .bind(&listing.contact_name)
            .bind(&listing.contact_phone)
            .bind(&listing.contact_email)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a listing, optionally restricted to its owner
    pub async fn delete_listing(&self, id: i64, owner: Option<i64>) -> Result<bool, PostgresError> {
        let query = r#"
            DELETE FROM houses
            WHERE id = $1 AND ($2::BIGINT IS NULL OR created_by = $2)
        "#;

        let result = sqlx::query(query)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_regions(&self) -> Result<Vec<Region>, PostgresError> {
        let rows = sqlx::query("SELECT id, name FROM regions ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let regions = rows
            .iter()
            .map(|row| {
                Ok(Region {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(regions)
    }

    pub async fn list_neighborhoods(&self) -> Result<Vec<Neighborhood>, PostgresError> {
        let rows = sqlx::query("SELECT id, region_id, name FROM neighborhoods ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        let neighborhoods = rows
            .iter()
            .map(|row| {
                Ok(Neighborhood {
                    id: row.try_get("id")?,
                    region_id: row.try_get("region_id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        Ok(neighborhoods)
    }

    /// Look up an account by username or email
    pub async fn find_user_by_login(&self, login: &str) -> Result<Option<User>, PostgresError> {
        let query = format!("{} WHERE username = $1 OR email = $1", USER_SELECT);
        let row = sqlx::query(&query).bind(login).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    /// An existing account that already uses `username` or `email`
    pub async fn find_conflicting_user(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, PostgresError> {
        let query = format!("{} WHERE username = $1 OR email = $2 LIMIT 1", USER_SELECT);
        let row = sqlx::query(&query)
            .bind(username)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<i64, PostgresError> {
        let query = r#"
            INSERT INTO users (username, email, password_hash, full_name, phone, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        "#;

        let id: i64 = sqlx::query_scalar(query)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(&user.phone)
            .bind(user.role)
            .fetch_one(&self.pool)
            .await?;

        tracing::info!("Registered user {} ({}) as {}", id, user.username, user.role);
        Ok(id)
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>, PostgresError> {
        let query = format!("{} WHERE id = $1", USER_SELECT);
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, PostgresError> {
        let query = format!("{} ORDER BY created_at DESC", USER_SELECT);
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(user_from_row).collect::<Result<Vec<_>, _>>()?)
    }

    /// Whether another account already uses `email`
    pub async fn email_taken_by_other(&self, email: &str, user_id: i64) -> Result<bool, PostgresError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
        )
        .bind(email)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    pub async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), PostgresError> {
        let query = r#"
            UPDATE users
            SET email = $1, full_name = $2, phone = $3,
                password_hash = COALESCE($4, password_hash)
            WHERE id = $5
        "#;

        let result = sqlx::query(query)
            .bind(&update.email)
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(&update.password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PostgresError::NotFound(format!("user {}", user_id)));
        }
        Ok(())
    }

    /// Admin edit; returns whether the account existed
    pub async fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<bool, PostgresError> {
        let query = r#"
            UPDATE users
            SET email = $1, full_name = $2, phone = $3, role = $4, is_active = $5
            WHERE id = $6
        "#;

        let result = sqlx::query(query)
            .bind(&update.email)
            .bind(&update.full_name)
            .bind(&update.phone)
            .bind(update.role)
            .bind(update.is_active)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn record_login(&self, user_id: i64) -> Result<(), PostgresError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Figures for the admin dashboard
    pub async fn admin_metrics(&self) -> Result<AdminMetrics, PostgresError> {
        let users = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_users,
                COUNT(*) FILTER (WHERE role = 'landlord') AS landlords_count,
                COUNT(*) FILTER (WHERE role = 'tenant') AS tenants_count,
                COUNT(*) FILTER (WHERE is_active) AS active_users,
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '7 days') AS weekly_signups,
                COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '30 days') AS monthly_signups,
                COUNT(*) FILTER (
                    WHERE last_login >= NOW() - INTERVAL '30 days'
                      AND created_at <= NOW() - INTERVAL '30 days'
                ) AS retained_users,
                COUNT(*) FILTER (WHERE created_at <= NOW() - INTERVAL '30 days') AS old_users
            FROM users
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let houses = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total_properties,
                COUNT(*) FILTER (WHERE is_featured) AS featured_properties
            FROM houses
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let property_types = sqlx::query(
            r#"
            SELECT property_type, COUNT(*) AS count
            FROM houses
            GROUP BY property_type
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(TypeCount {
                property_type: row.try_get("property_type")?,
                count: row.try_get("count")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let recent_signups = sqlx::query(
            r#"
            SELECT username, email, role, created_at, is_active, last_login
            FROM users
            ORDER BY created_at DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(UserSummary {
                username: row.try_get("username")?,
                email: row.try_get("email")?,
                role: row.try_get("role")?,
                created_at: row.try_get("created_at")?,
                is_active: row.try_get("is_active")?,
                last_login: row.try_get("last_login")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let recent_properties = sqlx::query(
            r#"
            SELECT h.title, h.created_at, u.username AS created_by, r.name AS region_name
            FROM houses h
            LEFT JOIN users u ON h.created_by = u.id
            LEFT JOIN regions r ON h.region_id = r.id
            ORDER BY h.created_at DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| {
            Ok(RecentProperty {
                title: row.try_get("title")?,
                created_at: row.try_get("created_at")?,
                created_by: row.try_get("created_by")?,
                region_name: row.try_get("region_name")?,
            })
        })
        .collect::<Result<Vec<_>, sqlx::Error>>()?;

        let total_users: i64 = users.try_get("total_users")?;
        let active_users: i64 = users.try_get("active_users")?;

        Ok(AdminMetrics {
            total_users,
            landlords_count: users.try_get("landlords_count")?,
            tenants_count: users.try_get("tenants_count")?,
            active_users,
            inactive_users: total_users - active_users,
            weekly_signups: users.try_get("weekly_signups")?,
            monthly_signups: users.try_get("monthly_signups")?,
            retention_rate: retention_rate(users.try_get("retained_users")?, users.try_get("old_users")?),
            total_properties: houses.try_get("total_properties")?,
            featured_properties: houses.try_get("featured_properties")?,
            property_types,
            recent_signups,
            recent_properties,
        })
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

#[async_trait]
impl ListingLookup for PostgresClient {
    async fn find_listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, LookupError> {
        self.query_listings(query).await.map_err(|e| {
            if is_unavailable(&e) {
                LookupError::Unavailable(e.to_string())
            } else {
                LookupError::Query(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyType;

    #[test]
    fn test_unfiltered_query_sql() {
        let sql = listing_query_builder(&ListingQuery::recent(6)).into_sql();
        assert!(sql.contains("WHERE 1=1 ORDER BY h.created_at DESC, h.id DESC LIMIT $1"));
    }

    #[test]
    fn test_filters_are_bound_not_inlined() {
        let query = ListingQuery {
            region_name_contains: Some("Accra".to_string()),
            property_types: vec![
                PropertyType::TwoBedroom,
                PropertyType::ThreeBedroom,
                PropertyType::SelfContained,
            ],
            max_price: Some(5000),
            limit: Some(5),
            ..ListingQuery::default()
        };
        let sql = listing_query_builder(&query).into_sql();

        assert!(sql.contains("r.name ILIKE $1"));
        assert!(sql.contains("h.property_type IN ($2, $3, $4)"));
        assert!(sql.contains("h.price <= $5"));
        assert!(sql.contains("LIMIT $6"));
        assert!(!sql.contains("Accra"));
    }

    #[test]
    fn test_single_type_uses_equality() {
        let query = ListingQuery {
            property_types: vec![PropertyType::SingleRoom],
            ..ListingQuery::default()
        };
        let sql = listing_query_builder(&query).into_sql();
        assert!(sql.contains("h.property_type = $1"));
    }

    #[test]
    fn test_pool_errors_count_as_unavailable() {
        assert!(is_unavailable(&sqlx::Error::PoolTimedOut));
        assert!(!is_unavailable(&sqlx::Error::RowNotFound));
    }
}
