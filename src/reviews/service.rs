// Review service: submission (with the RM5 reward), staff replies, and
// compensation grants.

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::repository::CustomersRepository;
use crate::bookings::repository::AppointmentsRepository;
use crate::notifications::{NewNotification, NotificationKind, NotificationsRepository};
use crate::reviews::error::ReviewError;
use crate::reviews::models::{Review, ReviewView};
use crate::reviews::repository::ReviewsRepository;
use crate::rewards::{CompensationKind, RewardsService};

/// Service for review business logic
#[derive(Clone)]
pub struct ReviewsService {
    reviews: ReviewsRepository,
    appointments: AppointmentsRepository,
    customers: CustomersRepository,
    rewards: RewardsService,
    notifications: NotificationsRepository,
}

impl ReviewsService {
    pub fn new(
        reviews: ReviewsRepository,
        appointments: AppointmentsRepository,
        customers: CustomersRepository,
        rewards: RewardsService,
        notifications: NotificationsRepository,
    ) -> Self {
        Self {
            reviews,
            appointments,
            customers,
            rewards,
            notifications,
        }
    }

    /// Submit a review for the caller's own completed appointment.
    ///
    /// Awards the fixed RM5 voucher and raises a staff-facing notification;
    /// neither failure rolls back the review itself.
    pub async fn submit(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Review, ReviewError> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?
            .ok_or(ReviewError::AppointmentNotFound)?;

        let customer = self
            .customers
            .find_by_user_id(user_id)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ReviewError::Validation("No customer profile".to_string()))?;

        if appointment.customer_id != customer.customer_id {
            return Err(ReviewError::Ownership(
                "This appointment belongs to another customer".to_string(),
            ));
        }

        if appointment.status != crate::bookings::AppointmentStatus::Completed {
            return Err(ReviewError::State(
                "Only completed appointments can be reviewed".to_string(),
            ));
        }

        if self.reviews.exists_for_appointment(appointment_id).await? {
            return Err(ReviewError::State(
                "This appointment has already been reviewed".to_string(),
            ));
        }

        let review = self.reviews.insert(appointment_id, rating, comment).await?;
        info!("Review {} submitted for {}", review.review_id, appointment_id);

        if let Err(e) = self.rewards.grant_review_reward(user_id).await {
            warn!("Failed to grant review reward to {}: {}", user_id, e);
        }

        if let Err(e) = self
            .notifications
            .insert(NewNotification::broadcast(
                NotificationKind::Review,
                "New Review Submitted",
                format!("A client left a {}-star review.", rating),
            ))
            .await
        {
            warn!("Failed to raise review notification: {}", e);
        }

        Ok(review)
    }

    pub async fn list_all(&self) -> Result<Vec<ReviewView>, ReviewError> {
        self.reviews.list_all().await
    }

    /// Staff reply; the customer is notified with the reply text.
    pub async fn reply(&self, review_id: Uuid, reply: &str) -> Result<(), ReviewError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        self.reviews.set_reply(review_id, reply).await?;

        if let Some(user_id) = self.reviews.customer_for_review(review_id).await? {
            let mut notification = NewNotification::for_user(
                user_id,
                NotificationKind::Review,
                "Salon Replied to Review",
                format!("The salon management replied: \"{}\"", reply),
            );
            notification.data = Some(serde_json::json!({
                "original_comment": review.comment,
            }));

            if let Err(e) = self.notifications.insert(notification).await {
                warn!("Failed to notify customer of reply: {}", e);
            }
        }

        Ok(())
    }

    /// Grant a compensation voucher from a review and record it on the row.
    pub async fn compensate(
        &self,
        review_id: Uuid,
        kind: CompensationKind,
    ) -> Result<(), ReviewError> {
        let user_id = self
            .reviews
            .customer_for_review(review_id)
            .await?
            .ok_or(ReviewError::NotFound)?;

        self.rewards
            .grant_compensation(user_id, kind)
            .await
            .map_err(|e| ReviewError::DatabaseError(e.to_string()))?;

        self.reviews.set_compensation(review_id, kind.title()).await
    }
}
