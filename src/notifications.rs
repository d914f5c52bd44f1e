// Notification feed: closed kind variant, append/list/mark-read repository,
// and the structured once-per-appointment reminder insert.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::middleware::{SessionUser, StaffUser};
use crate::error::ApiError;

/// Closed set of notification kinds. Interpretation sites match exhaustively;
/// there is no catch-all string type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Info,
    Receipt,
    Promo,
    Reminder,
    Review,
    System,
    Booking,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Info => "info",
            NotificationKind::Receipt => "receipt",
            NotificationKind::Promo => "promo",
            NotificationKind::Reminder => "reminder",
            NotificationKind::Review => "review",
            NotificationKind::System => "system",
            NotificationKind::Booking => "booking",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification row. `user_id` is None for staff-facing broadcasts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub appointment_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Parameters for appending a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub appointment_id: Option<Uuid>,
    pub data: Option<serde_json::Value>,
}

impl NewNotification {
    pub fn for_user(user_id: Uuid, kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            user_id: Some(user_id),
            title: title.to_string(),
            message,
            kind,
            appointment_id: None,
            data: None,
        }
    }

    pub fn broadcast(kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            user_id: None,
            title: title.to_string(),
            message,
            kind,
            appointment_id: None,
            data: None,
        }
    }
}

/// Repository for notification rows
#[derive(Clone)]
pub struct NotificationsRepository {
    pool: PgPool,
}

impl NotificationsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, new: NewNotification) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO notification (user_id, title, message, kind, appointment_id, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(new.user_id)
        .bind(&new.title)
        .bind(&new.message)
        .bind(new.kind)
        .bind(new.appointment_id)
        .bind(&new.data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a reminder for an appointment at most once.
    ///
    /// Idempotency comes from the partial unique index on
    /// (appointment_id, kind); repeated sweeps hit the conflict arm and
    /// report false.
    pub async fn insert_reminder_once(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        message: String,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO notification (user_id, title, message, kind, appointment_id)
            VALUES ($1, 'Appointment Reminder', $2, 'reminder', $3)
            ON CONFLICT (appointment_id, kind) WHERE kind = 'reminder'
            DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(&message)
        .bind(appointment_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, read, appointment_id, data, created_at
            FROM notification
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Staff feed: broadcast rows of the operational kinds.
    pub async fn list_broadcast(&self) -> Result<Vec<Notification>, sqlx::Error> {
        sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, title, message, kind, read, appointment_id, data, created_at
            FROM notification
            WHERE user_id IS NULL AND kind IN ('booking', 'system', 'review')
            ORDER BY created_at DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE notification SET read = TRUE WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notification SET read = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

/// Handler for GET /api/notifications
pub async fn list_notifications_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state
        .notifications_repo
        .list_for_user(session.user_id)
        .await?;

    Ok(Json(notifications))
}

/// Handler for POST /api/notifications/read — marks everything read
pub async fn mark_all_read_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
) -> Result<StatusCode, ApiError> {
    state
        .notifications_repo
        .mark_all_read(session.user_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST /api/notifications/:id/read
pub async fn mark_read_handler(
    State(state): State<crate::AppState>,
    session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let updated = state
        .notifications_repo
        .mark_read(id, session.user_id)
        .await?;

    if !updated {
        return Err(ApiError::NotFound {
            resource: "Notification".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/staff/notifications — the staff operational feed
pub async fn staff_feed_handler(
    State(state): State<crate::AppState>,
    StaffUser(_session): StaffUser,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let notifications = state.notifications_repo.list_broadcast().await?;
    Ok(Json(notifications))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip_strings() {
        let kinds = [
            NotificationKind::Info,
            NotificationKind::Receipt,
            NotificationKind::Promo,
            NotificationKind::Reminder,
            NotificationKind::Review,
            NotificationKind::System,
            NotificationKind::Booking,
        ];

        for kind in kinds {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: NotificationKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_builders_set_recipients() {
        let user_id = Uuid::new_v4();
        let personal = NewNotification::for_user(
            user_id,
            NotificationKind::Receipt,
            "Booking Confirmed",
            "Your appointment has been successfully booked.".to_string(),
        );
        assert_eq!(personal.user_id, Some(user_id));

        let broadcast = NewNotification::broadcast(
            NotificationKind::Booking,
            "New Booking",
            "A client booked a service.".to_string(),
        );
        assert!(broadcast.user_id.is_none());
    }
}
