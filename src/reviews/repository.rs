// Persistence for review rows.

use sqlx::PgPool;
use uuid::Uuid;

use crate::reviews::error::ReviewError;
use crate::reviews::models::{Review, ReviewView};

const REVIEW_COLUMNS: &str =
    "review_id, appointment_id, rating, comment, reply, compensation, created_at";

/// Repository for review operations
#[derive(Clone)]
pub struct ReviewsRepository {
    pool: PgPool,
}

impl ReviewsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, ReviewError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            "SELECT {REVIEW_COLUMNS} FROM review WHERE review_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn exists_for_appointment(&self, appointment_id: Uuid) -> Result<bool, ReviewError> {
        let exists: Option<bool> =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM review WHERE appointment_id = $1)")
                .bind(appointment_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.unwrap_or(false))
    }

    pub async fn insert(
        &self,
        appointment_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        let review = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO review (appointment_id, rating, comment)
            VALUES ($1, $2, $3)
            RETURNING {REVIEW_COLUMNS}
            "#
        ))
        .bind(appointment_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    pub async fn set_reply(&self, review_id: Uuid, reply: &str) -> Result<(), ReviewError> {
        let result = sqlx::query("UPDATE review SET reply = $1 WHERE review_id = $2")
            .bind(reply)
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ReviewError::NotFound);
        }

        Ok(())
    }

    pub async fn set_compensation(&self, review_id: Uuid, title: &str) -> Result<(), ReviewError> {
        sqlx::query("UPDATE review SET compensation = $1 WHERE review_id = $2")
            .bind(title)
            .bind(review_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// The customer user id behind a review, for reply notifications.
    pub async fn customer_for_review(
        &self,
        review_id: Uuid,
    ) -> Result<Option<Uuid>, ReviewError> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT c.user_id FROM review r \
             JOIN appointment a ON a.appointment_id = r.appointment_id \
             JOIN customer c ON c.customer_id = a.customer_id \
             WHERE r.review_id = $1",
        )
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    pub async fn list_all(&self) -> Result<Vec<ReviewView>, ReviewError> {
        let views = sqlx::query_as::<_, ReviewView>(
            r#"
            SELECT r.review_id, r.rating, r.comment, r.reply, r.compensation, r.created_at,
                   c.name AS customer_name,
                   st.name AS staff_name,
                   s.service_name
            FROM review r
            JOIN appointment a ON a.appointment_id = r.appointment_id
            JOIN customer c ON c.customer_id = a.customer_id
            JOIN staff st ON st.staff_id = a.staff_id
            LEFT JOIN appointment_service aps ON aps.appointment_id = a.appointment_id
            LEFT JOIN service s ON s.service_id = aps.service_id
            ORDER BY r.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }
}
