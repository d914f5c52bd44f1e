// Persistence for appointments and orders.
//
// Every multi-step write here is a single sqlx transaction: the booking
// unit (appointment + service link + order + discount + voucher + points +
// ledger + notifications), the reschedule, and the cancel-with-refund are
// each all-or-nothing.

use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::bookings::availability::BookedSlot;
use crate::bookings::error::BookingError;
use crate::bookings::lifecycle::{self, StatusMachine, MAX_RESCHEDULES};
use crate::bookings::models::{
    Appointment, AppointmentStatus, AppointmentView, OrderRecord, PaymentMethod, Receipt,
};
use crate::bookings::pricing::Quote;
use crate::models::{DiscountSpec, Promotion, Service, Staff};

const APPOINTMENT_COLUMNS: &str = "appointment_id, ref_id, customer_id, staff_id, date, \
                                   start_time, end_time, status, reschedule_count, created_at";

const ORDER_COLUMNS: &str = "order_id, appointment_id, service_price_cents, surcharge_cents, \
                             discount_cents, sst_cents, rounding_cents, total_payable_cents, \
                             payment_method, transaction_ref, status, refund_cents, created_at";

const VIEW_QUERY: &str = r#"
    SELECT a.appointment_id, a.ref_id, a.date, a.start_time, a.end_time, a.status,
           a.reschedule_count,
           s.service_name, s.duration_minutes,
           st.name AS staff_name,
           c.name AS customer_name,
           o.total_payable_cents AS price_paid_cents,
           (r.review_id IS NOT NULL) AS reviewed
    FROM appointment a
    JOIN customer c ON c.customer_id = a.customer_id
    JOIN staff st ON st.staff_id = a.staff_id
    LEFT JOIN appointment_service aps ON aps.appointment_id = a.appointment_id
    LEFT JOIN service s ON s.service_id = aps.service_id
    LEFT JOIN order_table o ON o.appointment_id = a.appointment_id
    LEFT JOIN review r ON r.appointment_id = a.appointment_id
"#;

const RECEIPT_QUERY: &str = r#"
    SELECT o.order_id, a.ref_id,
           COALESCE(s.service_name, 'Service') AS service_name,
           st.name AS staff_name,
           c.name AS customer_name,
           o.service_price_cents, o.surcharge_cents, o.discount_cents, o.sst_cents,
           o.rounding_cents, o.total_payable_cents, o.payment_method, o.transaction_ref,
           o.status, o.refund_cents,
           a.status AS appointment_status,
           a.date AS appointment_date,
           a.start_time AS appointment_time,
           o.created_at AS booking_date
    FROM order_table o
    JOIN appointment a ON a.appointment_id = o.appointment_id
    JOIN customer c ON c.customer_id = a.customer_id
    JOIN staff st ON st.staff_id = a.staff_id
    LEFT JOIN appointment_service aps ON aps.appointment_id = a.appointment_id
    LEFT JOIN service s ON s.service_id = aps.service_id
"#;

/// Repository for reference data the booking flow needs
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_service(&self, id: Uuid) -> Result<Option<Service>, BookingError> {
        let service = sqlx::query_as::<_, Service>(
            "SELECT service_id, service_name, description, duration_minutes, price_cents, \
             category, image_url FROM service WHERE service_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    pub async fn find_staff(&self, id: Uuid) -> Result<Option<Staff>, BookingError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT staff_id, name, email, rank, rating, specialties, avatar_url \
             FROM staff WHERE staff_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    pub async fn find_staff_by_email(&self, email: &str) -> Result<Option<Staff>, BookingError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT staff_id, name, email, rank, rating, specialties, avatar_url \
             FROM staff WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// Fallback assignment when the customer picks no stylist.
    pub async fn first_staff(&self) -> Result<Option<Staff>, BookingError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT staff_id, name, email, rank, rating, specialties, avatar_url \
             FROM staff ORDER BY created_at, staff_id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(staff)
    }

    /// The service linked to an appointment (bookings hold exactly one).
    pub async fn service_for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<Service>, BookingError> {
        let service = sqlx::query_as::<_, Service>(
            "SELECT s.service_id, s.service_name, s.description, s.duration_minutes, \
             s.price_cents, s.category, s.image_url \
             FROM appointment_service aps \
             JOIN service s ON s.service_id = aps.service_id \
             WHERE aps.appointment_id = $1",
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Owning customer's (user_id, display name) for an appointment.
    pub async fn customer_for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<(Uuid, String)>, BookingError> {
        let row: Option<(Uuid, String)> = sqlx::query_as(
            "SELECT c.user_id, c.name FROM appointment a \
             JOIN customer c ON c.customer_id = a.customer_id \
             WHERE a.appointment_id = $1",
        )
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_promotions(&self) -> Result<Vec<Promotion>, BookingError> {
        let promotions = sqlx::query_as::<_, Promotion>(
            "SELECT id, title, description, discount_display, image_url, active, start_date, \
             end_date, applicable_services FROM promotions ORDER BY start_date",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(promotions)
    }
}

/// Everything the booking transaction persists, computed up front by the
/// orchestrator.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub ref_id: String,
    pub customer_id: Uuid,
    pub user_id: Uuid,
    pub customer_name: String,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub quote: Quote,
    pub payment_method: PaymentMethod,
    pub transaction_ref: Option<String>,
    pub voucher: Option<(Uuid, DiscountSpec)>,
    pub promotion: Option<(Uuid, DiscountSpec)>,
}

/// Parameters for the reschedule transaction
#[derive(Debug, Clone)]
pub struct RescheduleCmd {
    pub appointment_id: Uuid,
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub user_id: Uuid,
    pub service_name: String,
}

/// A row due for an absence/completion sweep
#[derive(Debug, Clone, FromRow)]
pub struct SweepCandidate {
    pub appointment_id: Uuid,
    pub date: NaiveDate,
    pub end_time: NaiveTime,
}

/// A confirmed appointment eligible for the 24h reminder
#[derive(Debug, Clone, FromRow)]
pub struct ReminderCandidate {
    pub appointment_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub service_name: Option<String>,
    pub staff_name: String,
}

/// Repository for appointment rows and the booking transactions
#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: PgPool,
}

impl AppointmentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, BookingError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE appointment_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    pub async fn find_by_ref(&self, ref_id: &str) -> Result<Option<Appointment>, BookingError> {
        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE ref_id = $1"
        ))
        .bind(ref_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    /// Live slots for a stylist on a date, for the advisory availability view.
    pub async fn booked_slots(
        &self,
        staff_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<BookedSlot>, BookingError> {
        let rows: Vec<(Uuid, NaiveDate, NaiveTime, AppointmentStatus)> = sqlx::query_as(
            "SELECT staff_id, date, start_time, status FROM appointment \
             WHERE staff_id = $1 AND date = $2 AND status <> 'cancelled'",
        )
        .bind(staff_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(staff_id, date, start_time, status)| BookedSlot {
                staff_id,
                date,
                start_time,
                status,
            })
            .collect())
    }

    pub async fn views_for_customer(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<AppointmentView>, BookingError> {
        let views = sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_QUERY} WHERE c.user_id = $1 ORDER BY a.date, a.start_time"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    pub async fn views_for_staff(
        &self,
        staff_id: Uuid,
    ) -> Result<Vec<AppointmentView>, BookingError> {
        let views = sqlx::query_as::<_, AppointmentView>(&format!(
            "{VIEW_QUERY} WHERE a.staff_id = $1 AND a.status <> 'cancelled' \
             ORDER BY a.date, a.start_time"
        ))
        .bind(staff_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(views)
    }

    /// Create the booking as one atomic unit.
    ///
    /// Re-checks the slot inside the transaction (the advisory check at
    /// selection time is not authoritative), then writes the appointment,
    /// frozen order, optional discount, voucher consumption, points accrual,
    /// ledger entry, and the two notifications. Any failure rolls back the
    /// whole set.
    pub async fn create_booked(
        &self,
        new: NewBooking,
    ) -> Result<(Appointment, OrderRecord), BookingError> {
        let mut tx = self.pool.begin().await?;

        let conflict: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM appointment \
             WHERE staff_id = $1 AND date = $2 AND start_time = $3 AND status <> 'cancelled')",
        )
        .bind(new.staff_id)
        .bind(new.date)
        .bind(new.start_time)
        .fetch_one(&mut *tx)
        .await?;

        if conflict.unwrap_or(false) {
            return Err(BookingError::SlotConflict);
        }

        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            INSERT INTO appointment (ref_id, customer_id, staff_id, date, start_time, end_time, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'confirmed')
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(&new.ref_id)
        .bind(new.customer_id)
        .bind(new.staff_id)
        .bind(new.date)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO appointment_service (appointment_id, service_id, quantity, price_cents) \
             VALUES ($1, $2, 1, $3)",
        )
        .bind(appointment.appointment_id)
        .bind(new.service_id)
        .bind(new.quote.service_price_cents)
        .execute(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, OrderRecord>(&format!(
            r#"
            INSERT INTO order_table (appointment_id, service_price_cents, surcharge_cents,
                                     discount_cents, sst_cents, rounding_cents,
                                     total_payable_cents, payment_method, transaction_ref, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'paid')
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(appointment.appointment_id)
        .bind(new.quote.service_price_cents)
        .bind(new.quote.surcharge_cents)
        .bind(new.quote.discount_cents)
        .bind(new.quote.sst_cents)
        .bind(new.quote.rounding_cents)
        .bind(new.quote.total_payable_cents)
        .bind(new.payment_method)
        .bind(&new.transaction_ref)
        .fetch_one(&mut *tx)
        .await?;

        if let Some((voucher_id, spec)) = new.voucher {
            let (kind, value) = spec.to_columns();
            sqlx::query(
                "INSERT INTO order_discount (order_id, voucher_id, discount_kind, discount_value) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.order_id)
            .bind(voucher_id)
            .bind(kind)
            .bind(value)
            .execute(&mut *tx)
            .await?;

            let consumed = sqlx::query(
                "UPDATE user_rewards SET used = TRUE WHERE id = $1 AND used = FALSE",
            )
            .bind(voucher_id)
            .execute(&mut *tx)
            .await?;

            if consumed.rows_affected() != 1 {
                return Err(BookingError::Validation(
                    "Voucher has already been used".to_string(),
                ));
            }
        } else if let Some((promotion_id, spec)) = new.promotion {
            let (kind, value) = spec.to_columns();
            sqlx::query(
                "INSERT INTO order_discount (order_id, promotion_id, discount_kind, discount_value) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order.order_id)
            .bind(promotion_id)
            .bind(kind)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }

        // 1 point per RM1 paid, floored
        let points = new.quote.total_payable_cents / 100;

        sqlx::query(
            "UPDATE customer SET total_points = total_points + $1, \
             lifetime_points = lifetime_points + $1 WHERE customer_id = $2",
        )
        .bind(points)
        .bind(new.customer_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO point_history (user_id, title, points, type) \
             VALUES ($1, 'Service Earned', $2, 'earn')",
        )
        .bind(new.user_id)
        .bind(points)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO notification (user_id, title, message, kind, appointment_id) \
             VALUES ($1, 'Booking Confirmed', \
                     'Your appointment has been successfully booked.', 'receipt', $2)",
        )
        .bind(new.user_id)
        .bind(appointment.appointment_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO notification (user_id, title, message, kind, appointment_id) \
             VALUES (NULL, 'New Booking', $1, 'booking', $2)",
        )
        .bind(format!(
            "{} booked a service for {} {}.",
            new.customer_name,
            new.date.format("%Y-%m-%d"),
            new.start_time.format("%H:%M")
        ))
        .bind(appointment.appointment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((appointment, order))
    }

    /// Reschedule atomically: re-validates status, the reschedule cap, and
    /// the target slot inside the transaction, then moves the appointment
    /// and notifies the customer with the remaining allowance.
    pub async fn reschedule(&self, cmd: RescheduleCmd) -> Result<Appointment, BookingError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE appointment_id = $1 FOR UPDATE"
        ))
        .bind(cmd.appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::NotFound)?;

        if !matches!(
            current.status,
            AppointmentStatus::Pending | AppointmentStatus::Confirmed
        ) {
            return Err(BookingError::State(format!(
                "A {} appointment cannot be rescheduled",
                current.status
            )));
        }

        if current.reschedule_count >= MAX_RESCHEDULES {
            return Err(BookingError::RescheduleLimit);
        }

        let conflict: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM appointment \
             WHERE staff_id = $1 AND date = $2 AND start_time = $3 \
               AND status <> 'cancelled' AND appointment_id <> $4)",
        )
        .bind(cmd.staff_id)
        .bind(cmd.date)
        .bind(cmd.start_time)
        .bind(cmd.appointment_id)
        .fetch_one(&mut *tx)
        .await?;

        if conflict.unwrap_or(false) {
            return Err(BookingError::SlotConflict);
        }

        let updated = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            UPDATE appointment
            SET staff_id = $1, date = $2, start_time = $3, end_time = $4,
                reschedule_count = reschedule_count + 1
            WHERE appointment_id = $5
            RETURNING {APPOINTMENT_COLUMNS}
            "#
        ))
        .bind(cmd.staff_id)
        .bind(cmd.date)
        .bind(cmd.start_time)
        .bind(cmd.end_time)
        .bind(cmd.appointment_id)
        .fetch_one(&mut *tx)
        .await?;

        let remaining = MAX_RESCHEDULES - updated.reschedule_count;
        sqlx::query(
            "INSERT INTO notification (user_id, title, message, kind, appointment_id) \
             VALUES ($1, 'Appointment Rescheduled', $2, 'info', $3)",
        )
        .bind(cmd.user_id)
        .bind(format!(
            "{} rescheduled from {} {} to {} {}. {} reschedule(s) left.",
            cmd.service_name,
            current.date.format("%Y-%m-%d"),
            current.start_time.format("%H:%M"),
            cmd.date.format("%Y-%m-%d"),
            cmd.start_time.format("%H:%M"),
            remaining
        ))
        .bind(cmd.appointment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Cancel atomically with the refund computation.
    ///
    /// The refund decision and the status/order writes happen inside one
    /// transaction so a cancelled-but-unrefunded state cannot exist.
    pub async fn cancel_with_refund(
        &self,
        appointment_id: Uuid,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<i64, BookingError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, Appointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointment WHERE appointment_id = $1 FOR UPDATE"
        ))
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(BookingError::NotFound)?;

        StatusMachine::transition(current.status, AppointmentStatus::Cancelled)
            .map_err(BookingError::State)?;

        let paid: Option<i64> = sqlx::query_scalar(
            "SELECT total_payable_cents FROM order_table WHERE appointment_id = $1 FOR UPDATE",
        )
        .bind(appointment_id)
        .fetch_optional(&mut *tx)
        .await?;

        let paid = paid.ok_or_else(|| {
            BookingError::Database(format!("No order recorded for appointment {}", appointment_id))
        })?;

        let refund = lifecycle::refund_cents(paid, current.date, today);

        sqlx::query("UPDATE appointment SET status = 'cancelled' WHERE appointment_id = $1")
            .bind(appointment_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE order_table SET refund_cents = $1, \
             status = CASE WHEN $1 > 0 THEN 'refunded' ELSE status END \
             WHERE appointment_id = $2",
        )
        .bind(refund)
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

        let message = if refund > 0 {
            format!(
                "Your appointment {} was cancelled. RM {}.{:02} will be refunded.",
                current.ref_id,
                refund / 100,
                refund % 100
            )
        } else {
            format!(
                "Your appointment {} was cancelled. Cancellations within 3 days are non-refundable.",
                current.ref_id
            )
        };

        sqlx::query(
            "INSERT INTO notification (user_id, title, message, kind, appointment_id) \
             VALUES ($1, 'Appointment Cancelled', $2, 'info', $3)",
        )
        .bind(user_id)
        .bind(message)
        .bind(appointment_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(refund)
    }

    pub async fn update_status(
        &self,
        appointment_id: Uuid,
        status: AppointmentStatus,
    ) -> Result<(), BookingError> {
        sqlx::query("UPDATE appointment SET status = $1 WHERE appointment_id = $2")
            .bind(status)
            .bind(appointment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Rows in `status` whose date is on or before `today`, for the sweeps.
    pub async fn sweep_candidates(
        &self,
        status: AppointmentStatus,
        today: NaiveDate,
    ) -> Result<Vec<SweepCandidate>, BookingError> {
        let rows = sqlx::query_as::<_, SweepCandidate>(
            "SELECT appointment_id, date, end_time FROM appointment \
             WHERE status = $1 AND date <= $2",
        )
        .bind(status)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Advance a batch of rows, guarded on the source status so a repeated
    /// sweep cannot double-transition.
    pub async fn mark_swept(
        &self,
        ids: &[Uuid],
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<u64, BookingError> {
        let result = sqlx::query(
            "UPDATE appointment SET status = $1 \
             WHERE appointment_id = ANY($2) AND status = $3",
        )
        .bind(to)
        .bind(ids)
        .bind(from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Confirmed appointments on `date`, joined for reminder composition.
    pub async fn reminder_candidates(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ReminderCandidate>, BookingError> {
        let rows = sqlx::query_as::<_, ReminderCandidate>(
            r#"
            SELECT a.appointment_id, c.user_id, a.date, a.start_time,
                   s.service_name, st.name AS staff_name
            FROM appointment a
            JOIN customer c ON c.customer_id = a.customer_id
            JOIN staff st ON st.staff_id = a.staff_id
            LEFT JOIN appointment_service aps ON aps.appointment_id = a.appointment_id
            LEFT JOIN service s ON s.service_id = aps.service_id
            WHERE a.status = 'confirmed' AND a.date = $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Repository for receipt reads
#[derive(Clone)]
pub struct OrdersRepository {
    pool: PgPool,
}

impl OrdersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn receipt_for_appointment(
        &self,
        appointment_id: Uuid,
    ) -> Result<Option<Receipt>, BookingError> {
        let receipt = sqlx::query_as::<_, Receipt>(&format!(
            "{RECEIPT_QUERY} WHERE a.appointment_id = $1"
        ))
        .bind(appointment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(receipt)
    }

    pub async fn receipts_for_customer(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<Receipt>, BookingError> {
        let receipts = sqlx::query_as::<_, Receipt>(&format!(
            "{RECEIPT_QUERY} WHERE c.user_id = $1 ORDER BY o.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(receipts)
    }
}

#[cfg(test)]
mod tests {
    // Repository methods execute against PostgreSQL and are covered by the
    // service-layer integration suite, which requires a live database.
}
