use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::pricing::Quote;
use crate::validation::validate_slot_format;

/// Appointment status enum representing the booking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text")]
pub enum AppointmentStatus {
    #[sqlx(rename = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sqlx(rename = "confirmed")]
    #[serde(rename = "confirmed")]
    Confirmed,
    #[sqlx(rename = "checked-in")]
    #[serde(rename = "checked-in")]
    CheckedIn,
    #[sqlx(rename = "completed")]
    #[serde(rename = "completed")]
    Completed,
    #[sqlx(rename = "cancelled")]
    #[serde(rename = "cancelled")]
    Cancelled,
    #[sqlx(rename = "absence")]
    #[serde(rename = "absence")]
    Absence,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::CheckedIn => "checked-in",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Absence => "absence",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment method captured at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Tng,
}

impl PaymentMethod {
    /// Receipt label shown to the customer.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit Card",
            PaymentMethod::Tng => "Touch 'n Go",
        }
    }
}

/// Payment state of an order record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Paid,
    Refunded,
}

/// An appointment row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub appointment_id: Uuid,
    pub ref_id: String,
    pub customer_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub reschedule_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }
}

/// The immutable payment record created with a booking
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRecord {
    pub order_id: Uuid,
    pub appointment_id: Uuid,
    pub service_price_cents: i64,
    pub surcharge_cents: i64,
    pub discount_cents: i64,
    pub sst_cents: i64,
    pub rounding_cents: i64,
    pub total_payable_cents: i64,
    pub payment_method: PaymentMethod,
    pub transaction_ref: Option<String>,
    pub status: OrderStatus,
    pub refund_cents: i64,
    pub created_at: DateTime<Utc>,
}

/// Joined appointment row for schedule and history listings
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct AppointmentView {
    pub appointment_id: Uuid,
    pub ref_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub reschedule_count: i32,
    pub service_name: Option<String>,
    pub duration_minutes: Option<i32>,
    pub staff_name: String,
    pub customer_name: String,
    pub price_paid_cents: Option<i64>,
    pub reviewed: bool,
}

/// Customer schedule split into display sections
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingsOverview {
    pub upcoming: Vec<AppointmentView>,
    pub history: Vec<AppointmentView>,
}

/// Request DTO for previewing checkout pricing
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub voucher_id: Option<Uuid>,
}

/// Summary of the promotion auto-applied to a quote
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedPromotionSummary {
    pub id: Uuid,
    pub title: String,
    pub discount_display: String,
}

/// Summary of the voucher applied to a quote
#[derive(Debug, Serialize, ToSchema)]
pub struct AppliedVoucherSummary {
    pub id: Uuid,
    pub title: String,
}

/// Response DTO for the quote preview
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: Quote,
    pub applied_promotion: Option<AppliedPromotionSummary>,
    pub applied_voucher: Option<AppliedVoucherSummary>,
}

/// Request DTO for creating a booking. Payment has already been confirmed
/// at the gateway boundary; `transaction_ref` is its opaque reference.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub staff_id: Option<Uuid>,
    pub date: NaiveDate,
    #[validate(custom = "validate_slot_format")]
    pub start_time: String,
    pub voucher_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub transaction_ref: Option<String>,
}

/// Request DTO for rescheduling
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RescheduleRequest {
    pub date: NaiveDate,
    #[validate(custom = "validate_slot_format")]
    pub start_time: String,
    pub staff_id: Option<Uuid>,
}

/// Receipt projection joined from the order and its appointment
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Receipt {
    pub order_id: Uuid,
    pub ref_id: String,
    pub service_name: String,
    pub staff_name: String,
    pub customer_name: String,
    pub service_price_cents: i64,
    pub surcharge_cents: i64,
    pub discount_cents: i64,
    pub sst_cents: i64,
    pub rounding_cents: i64,
    pub total_payable_cents: i64,
    /// Serialized as the human-facing label ("Credit Card", "Touch 'n Go")
    #[serde(serialize_with = "serialize_payment_label")]
    pub payment_method: PaymentMethod,
    pub transaction_ref: Option<String>,
    pub status: OrderStatus,
    pub refund_cents: i64,
    pub appointment_status: AppointmentStatus,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub booking_date: DateTime<Utc>,
}

fn serialize_payment_label<S>(method: &PaymentMethod, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(method.label())
}

/// Response DTO returned on booking creation
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub appointment_id: Uuid,
    pub ref_id: String,
    pub order_id: Uuid,
    pub receipt: Receipt,
}

/// Response DTO for cancellation
#[derive(Debug, Serialize, ToSchema)]
pub struct CancelResponse {
    pub appointment_id: Uuid,
    pub refund_cents: i64,
}

/// Response DTO for staff check-in
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckInResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_uses_hyphenated_form() {
        let json = serde_json::to_string(&AppointmentStatus::CheckedIn).unwrap();
        assert_eq!(json, "\"checked-in\"");

        let back: AppointmentStatus = serde_json::from_str("\"checked-in\"").unwrap();
        assert_eq!(back, AppointmentStatus::CheckedIn);
    }

    #[test]
    fn test_payment_method_labels() {
        assert_eq!(PaymentMethod::Card.label(), "Credit Card");
        assert_eq!(PaymentMethod::Tng.label(), "Touch 'n Go");
    }

    #[test]
    fn test_appointment_start_end() {
        let appt = Appointment {
            appointment_id: Uuid::new_v4(),
            ref_id: "A1234".to_string(),
            customer_id: Uuid::new_v4(),
            staff_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            status: AppointmentStatus::Confirmed,
            reschedule_count: 0,
            created_at: Utc::now(),
        };

        assert_eq!(appt.end() - appt.start(), chrono::Duration::hours(1));
    }

}
