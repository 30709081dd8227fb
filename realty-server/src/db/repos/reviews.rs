//! Review repository
//!
//! Plain CRUD over `reviews`; no joins against houses or users.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::DbError;
use crate::models::{Changes, NewReview};

/// Review record from database
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Review {
    pub review_id: i32,
    pub house_id: Option<i32>,
    pub user_id: Option<i32>,
    pub rating: Option<i32>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review repository
pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, review: NewReview) -> Result<Review, DbError> {
        let review: Review = sqlx::query_as(
            r#"
            INSERT INTO reviews (house_id, user_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING review_id, house_id, user_id, rating, comment, created_at, updated_at
            "#,
        )
        .bind(review.house_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(review.comment)
        .fetch_one(self.pool)
        .await?;

        Ok(review)
    }

    pub async fn list(&self) -> Result<Vec<Review>, DbError> {
        let reviews: Vec<Review> = sqlx::query_as(
            r#"
            SELECT review_id, house_id, user_id, rating, comment, created_at, updated_at
            FROM reviews
            ORDER BY review_id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn get(&self, review_id: i32) -> Result<Review, DbError> {
        let review: Review = sqlx::query_as(
            r#"
            SELECT review_id, house_id, user_id, rating, comment, created_at, updated_at
            FROM reviews
            WHERE review_id = $1
            "#,
        )
        .bind(review_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Review", review_id))?;

        Ok(review)
    }

    /// Apply allow-listed changes; `updated_at` is always bumped.
    pub async fn update(&self, review_id: i32, changes: Changes) -> Result<Review, DbError> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE reviews SET ");
        changes.push_assignments(&mut builder);
        builder.push(", updated_at = NOW() WHERE review_id = ");
        builder.push_bind(review_id);
        builder.push(
            " RETURNING review_id, house_id, user_id, rating, comment, created_at, updated_at",
        );

        let review = builder
            .build_query_as::<Review>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Review", review_id))?;

        Ok(review)
    }

    pub async fn delete(&self, review_id: i32) -> Result<(), DbError> {
        let deleted = sqlx::query("DELETE FROM reviews WHERE review_id = $1")
            .bind(review_id)
            .execute(self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DbError::not_found("Review", review_id));
        }

        Ok(())
    }
}
