//! House repository
//!
//! Handles the `houses` root table:
//! - create: house + details + amenities + price (+ image) in one transaction
//! - update: allow-listed columns only, built with QueryBuilder
//! - delete: removes dependent rows in the same transaction

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::DbError;
use crate::models::{Changes, NewListing};

/// House record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct House {
    pub house_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub full_address: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// House repository
pub struct HouseRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> HouseRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a house with its details, amenities, price, and optional image.
    ///
    /// All inserts share one transaction: a failure at any stage leaves no
    /// new rows behind. Returns the generated house_id.
    pub async fn create(&self, listing: NewListing) -> Result<i32, DbError> {
        let NewListing {
            house,
            details,
            amenities,
            price,
            image_url,
        } = listing;

        let mut tx = self.pool.begin().await?;

        let house_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO houses (title, description, full_address, country, state, zip, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING house_id
            "#,
        )
        .bind(house.title)
        .bind(house.description)
        .bind(house.full_address)
        .bind(house.country)
        .bind(house.state)
        .bind(house.zip)
        .bind(house.user_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO house_details (
                type, status, property_area, bedrooms, bathrooms, rooms, year_build,
                neighborhood, latitude, longitude, label, land_area, garage_size, house_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(details.kind)
        .bind(details.status)
        .bind(details.property_area)
        .bind(details.bedrooms)
        .bind(details.bathrooms)
        .bind(details.rooms)
        .bind(details.year_build)
        .bind(details.neighborhood)
        .bind(details.latitude)
        .bind(details.longitude)
        .bind(details.label)
        .bind(details.land_area)
        .bind(details.garage_size)
        .bind(house_id)
        .execute(&mut *tx)
        .await?;

        let mut amenity_insert = sqlx::query(
            r#"
            INSERT INTO amenities (
                air_condition, cable_tv, elevator, wifi, pet_friendly, furnished, garden,
                swimming_pool, intercom, disabled_access, fireplace, garage, heating,
                security, parking, house_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        );
        for flag in amenities.stored() {
            amenity_insert = amenity_insert.bind(flag);
        }
        amenity_insert.bind(house_id).execute(&mut *tx).await?;

        sqlx::query(
            r#"
            INSERT INTO prices (price, before_price_label, after_price_label, house_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(price.price)
        .bind(price.before_price_label)
        .bind(price.after_price_label)
        .bind(house_id)
        .execute(&mut *tx)
        .await?;

        if let Some(url) = image_url {
            sqlx::query("INSERT INTO images (house_id, image_url) VALUES ($1, $2)")
                .bind(house_id)
                .bind(url)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(house_id)
    }

    /// List every house.
    pub async fn list(&self) -> Result<Vec<House>, DbError> {
        let houses: Vec<House> = sqlx::query_as(
            r#"
            SELECT house_id, title, description, full_address, country, state, zip,
                   user_id, created_at
            FROM houses
            ORDER BY house_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(houses)
    }

    /// Get a single house by ID.
    pub async fn get(&self, house_id: i32) -> Result<House, DbError> {
        let house: House = sqlx::query_as(
            r#"
            SELECT house_id, title, description, full_address, country, state, zip,
                   user_id, created_at
            FROM houses
            WHERE house_id = $1
            "#,
        )
        .bind(house_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("House", house_id))?;

        Ok(house)
    }

    /// Apply allow-listed column changes and return the updated row.
    pub async fn update(&self, house_id: i32, changes: Changes) -> Result<House, DbError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE houses SET ");
        changes.push_assignments(&mut builder);
        builder.push(" WHERE house_id = ").push_bind(house_id);
        builder.push(
            " RETURNING house_id, title, description, full_address, country, state, zip, \
             user_id, created_at",
        );

        let house = builder
            .build_query_as::<House>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("House", house_id))?;

        Ok(house)
    }

    /// Delete a house and its dependent rows.
    pub async fn delete(&self, house_id: i32) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        for statement in [
            "DELETE FROM images WHERE house_id = $1",
            "DELETE FROM prices WHERE house_id = $1",
            "DELETE FROM amenities WHERE house_id = $1",
            "DELETE FROM house_details WHERE house_id = $1",
        ] {
            sqlx::query(statement)
                .bind(house_id)
                .execute(&mut *tx)
                .await?;
        }

        let deleted = sqlx::query("DELETE FROM houses WHERE house_id = $1")
            .bind(house_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Err(DbError::not_found("House", house_id));
        }

        tx.commit().await?;
        Ok(())
    }

    /// List houses owned by a user.
    pub async fn list_for_owner(&self, user_id: i32) -> Result<Vec<House>, DbError> {
        let houses: Vec<House> = sqlx::query_as(
            r#"
            SELECT house_id, title, description, full_address, country, state, zip,
                   user_id, created_at
            FROM houses
            WHERE user_id = $1
            ORDER BY house_id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(houses)
    }
}
