use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;

use crate::models::{BloodType, BoundingBox, DonorCandidate, DonorProfile, GeoPoint, OrganPledge};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Invalid data in column {column}: {message}")]
    InvalidData { column: &'static str, message: String },
}

/// PostgreSQL client for the donor directory and registry tables
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client from a connection string
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

    /// Find available donors inside a bounding box with one of the given blood types
    ///
    /// Boxes that wrap across the antimeridian are matched on both sides.
    /// Exact distances are computed later by the router.
    pub async fn find_donors(
        &self,
        bbox: &BoundingBox,
        blood_types: &[BloodType],
    ) -> Result<Vec<DonorCandidate>, PostgresError> {
        let query = r#"
            SELECT donor_id, blood_type, latitude, longitude
            FROM donors
            WHERE available
              AND blood_type = ANY($1)
              AND latitude BETWEEN $2 AND $3
              AND CASE
                    WHEN $4 <= $5 THEN longitude BETWEEN $4 AND $5
                    ELSE longitude >= $4 OR longitude <= $5
                  END
        "#;

        let types: Vec<String> = blood_types.iter().map(|bt| bt.as_str().to_string()).collect();

        let rows = sqlx::query(query)
            .bind(&types)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        let donors = rows
            .iter()
            .map(|row| {
                Ok(DonorCandidate {
                    donor_id: row.get("donor_id"),
                    blood_type: parse_blood_type(row.get("blood_type"))?,
                    location: GeoPoint::new(row.get("latitude"), row.get("longitude")),
                })
            })
            .collect::<Result<Vec<_>, PostgresError>>()?;

        tracing::debug!("Found {} donors in bounding box", donors.len());

        Ok(donors)
    }

    /// Record an organ pledge, or return the existing pledge for that e-mail
    pub async fn record_pledge(
        &self,
        pledge_id: &str,
        full_name: &str,
        email: &str,
    ) -> Result<OrganPledge, PostgresError> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let query = r#"
            INSERT INTO organ_pledges (pledge_id, full_name, email, pledged_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (email)
            DO UPDATE SET email = EXCLUDED.email
            RETURNING pledge_id, full_name, email, pledged_at
        "#;

        let row = sqlx::query(query)
            .bind(pledge_id)
            .bind(full_name)
            .bind(email.to_lowercase())
            .fetch_one(&self.pool)
            .await?;

        Ok(OrganPledge {
            pledge_id: row.get("pledge_id"),
            full_name: row.get("full_name"),
            email: row.get("email"),
            pledged_at: row.get("pledged_at"),
        })
    }

    /// Fetch a donor profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<DonorProfile>, PostgresError> {
        let query = r#"
            SELECT user_id, name, blood_type, last_donation, donations, avatar_url
            FROM donor_profiles
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let donations: i32 = row.get("donations");
            Ok(DonorProfile {
                user_id: row.get("user_id"),
                name: row.get("name"),
                blood_type: parse_blood_type(row.get("blood_type"))?,
                last_donation: row.get("last_donation"),
                donations: u32::try_from(donations).map_err(|_| PostgresError::InvalidData {
                    column: "donations",
                    message: format!("negative count {}", donations),
                })?,
                avatar_url: row.get("avatar_url"),
            })
        })
        .transpose()
    }

    /// Insert or replace a donor profile
    pub async fn save_profile(&self, profile: &DonorProfile) -> Result<(), PostgresError> {
        let query = r#"
            INSERT INTO donor_profiles (user_id, name, blood_type, last_donation, donations, avatar_url, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET
                name = EXCLUDED.name,
                blood_type = EXCLUDED.blood_type,
                last_donation = EXCLUDED.last_donation,
                donations = EXCLUDED.donations,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = EXCLUDED.updated_at
        "#;

        let donations = i32::try_from(profile.donations).map_err(|_| PostgresError::InvalidData {
            column: "donations",
            message: format!("count {} out of range", profile.donations),
        })?;

        sqlx::query(query)
            .bind(&profile.user_id)
            .bind(&profile.name)
            .bind(profile.blood_type.as_str())
            .bind(profile.last_donation)
            .bind(donations)
            .bind(&profile.avatar_url)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Saved profile for {}", profile.user_id);

        Ok(())
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

fn parse_blood_type(value: String) -> Result<BloodType, PostgresError> {
    value.parse().map_err(|e: crate::models::domain::ParseBloodTypeError| {
        PostgresError::InvalidData {
            column: "blood_type",
            message: e.to_string(),
        }
    })
}
