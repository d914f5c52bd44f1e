// Booking orchestrator: composes the pricing engine, availability checker,
// and lifecycle rules into the create / reschedule / cancel / check-in
// operations. All failures surface as BookingError; nothing is thrown past
// this boundary.

use chrono::{Duration, Local, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::auth::repository::CustomersRepository;
use crate::bookings::availability::{
    self, date_in_blackout, lunch_break, parse_slot, slot_grid, SlotStatus,
};
use crate::bookings::error::BookingError;
use crate::bookings::lifecycle::{self, StatusMachine};
use crate::bookings::models::{
    AppliedPromotionSummary, AppliedVoucherSummary, Appointment, AppointmentStatus,
    AppointmentView, BookingResponse, BookingsOverview, CancelResponse, CheckInResponse,
    CreateBookingRequest, QuoteRequest, QuoteResponse, Receipt, RescheduleRequest,
};
use crate::bookings::pricing::{self, AppliedDiscount};
use crate::bookings::repository::{
    AppointmentsRepository, CatalogRepository, NewBooking, OrdersRepository, RescheduleCmd,
};
use crate::models::{Customer, Promotion, Service, Staff};
use crate::rewards::{RewardsError, Voucher, VouchersRepository};

/// Attempts at drawing an unused reference id before giving up.
const REF_ID_ATTEMPTS: u32 = 5;

/// A priced (service, stylist, discount) selection, shared by the quote
/// preview and the booking write.
struct PricedSelection {
    service: Service,
    staff: Staff,
    quote: pricing::Quote,
    voucher: Option<Voucher>,
    promotion: Option<Promotion>,
}

/// Service for booking business logic
#[derive(Clone)]
pub struct BookingService {
    appointments: AppointmentsRepository,
    orders: OrdersRepository,
    catalog: CatalogRepository,
    customers: CustomersRepository,
    vouchers: VouchersRepository,
}

impl BookingService {
    pub fn new(
        appointments: AppointmentsRepository,
        orders: OrdersRepository,
        catalog: CatalogRepository,
        customers: CustomersRepository,
        vouchers: VouchersRepository,
    ) -> Self {
        Self {
            appointments,
            orders,
            catalog,
            customers,
            vouchers,
        }
    }

    /// Preview checkout pricing for a selection.
    ///
    /// An explicitly selected voucher wins; otherwise the first active
    /// in-window promotion is auto-applied. Never both.
    pub async fn quote(
        &self,
        user_id: Uuid,
        request: QuoteRequest,
    ) -> Result<QuoteResponse, BookingError> {
        let today = Local::now().date_naive();
        let selection = self
            .price_selection(user_id, request.service_id, request.staff_id, request.voucher_id, today)
            .await?;

        Ok(QuoteResponse {
            quote: selection.quote,
            applied_promotion: selection.promotion.map(|p| AppliedPromotionSummary {
                id: p.id,
                title: p.title,
                discount_display: p.discount_display,
            }),
            applied_voucher: selection.voucher.map(|v| AppliedVoucherSummary {
                id: v.id,
                title: v.title,
            }),
        })
    }

    /// Create a booking. Payment has been captured upstream; this persists
    /// the appointment, the frozen receipt, and every coupled side effect
    /// as one unit, re-checking the slot inside the transaction.
    pub async fn create(
        &self,
        user_id: Uuid,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, BookingError> {
        let today = Local::now().date_naive();

        let start_time = self.validate_slot(&request.start_time, request.date, today)?;

        let customer = self.require_customer(user_id).await?;

        let selection = self
            .price_selection(user_id, request.service_id, request.staff_id, request.voucher_id, today)
            .await?;

        let end_time = start_time
            + Duration::minutes(i64::from(selection.service.duration_minutes));

        let ref_id = self.generate_ref_id().await?;

        let voucher = selection
            .voucher
            .as_ref()
            .and_then(|v| v.discount_spec().map(|spec| (v.id, spec)));
        let promotion = selection
            .promotion
            .as_ref()
            .and_then(|p| p.discount_spec().map(|spec| (p.id, spec)));

        let (appointment, order) = self
            .appointments
            .create_booked(NewBooking {
                ref_id,
                customer_id: customer.customer_id,
                user_id,
                customer_name: customer.name.clone(),
                staff_id: selection.staff.id,
                service_id: selection.service.id,
                date: request.date,
                start_time,
                end_time,
                quote: selection.quote,
                payment_method: request.payment_method,
                transaction_ref: request.transaction_ref.clone(),
                voucher,
                promotion,
            })
            .await?;

        info!(
            "Booked appointment {} ({}) for customer {}",
            appointment.ref_id, appointment.appointment_id, customer.customer_id
        );

        let receipt = self
            .orders
            .receipt_for_appointment(appointment.appointment_id)
            .await?
            .ok_or_else(|| {
                BookingError::Database("Receipt missing after booking".to_string())
            })?;

        Ok(BookingResponse {
            appointment_id: appointment.appointment_id,
            ref_id: appointment.ref_id,
            order_id: order.order_id,
            receipt,
        })
    }

    /// The customer's schedule, split into upcoming and history sections.
    pub async fn list_for_customer(&self, user_id: Uuid) -> Result<BookingsOverview, BookingError> {
        let now = Local::now().naive_local();
        let views = self.appointments.views_for_customer(user_id).await?;

        let mut upcoming = Vec::new();
        let mut history = Vec::new();
        for view in views {
            let start = view.date.and_time(view.start_time);
            if lifecycle::is_upcoming(view.status, start, now) {
                upcoming.push(view);
            } else if lifecycle::history_visible(view.status, start, now) {
                history.push(view);
            }
        }
        history.reverse();

        Ok(BookingsOverview { upcoming, history })
    }

    /// Per-slot availability for a stylist and date. Advisory only.
    pub async fn availability(
        &self,
        staff_id: Option<Uuid>,
        date: NaiveDate,
    ) -> Result<Vec<SlotStatus>, BookingError> {
        let today = Local::now().date_naive();

        let existing = match staff_id {
            Some(id) => self.appointments.booked_slots(id, date).await?,
            None => Vec::new(),
        };

        Ok(slot_grid(staff_id, date, today, &existing))
    }

    /// Reschedule an appointment to a new slot (and optionally stylist).
    pub async fn reschedule(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
        request: RescheduleRequest,
    ) -> Result<Appointment, BookingError> {
        let today = Local::now().date_naive();

        let start_time = self.validate_slot(&request.start_time, request.date, today)?;

        let appointment = self.require_owned(user_id, appointment_id).await?;

        if appointment.reschedule_count >= lifecycle::MAX_RESCHEDULES {
            return Err(BookingError::RescheduleLimit);
        }

        let staff_id = request.staff_id.unwrap_or(appointment.staff_id);
        if self.catalog.find_staff(staff_id).await?.is_none() {
            return Err(BookingError::Validation("Unknown stylist".to_string()));
        }

        let service = self
            .catalog
            .service_for_appointment(appointment_id)
            .await?;
        let duration = service
            .as_ref()
            .map(|s| i64::from(s.duration_minutes))
            .unwrap_or(60);
        let service_name = service
            .map(|s| s.name)
            .unwrap_or_else(|| "Appointment".to_string());

        self.appointments
            .reschedule(RescheduleCmd {
                appointment_id,
                staff_id,
                date: request.date,
                start_time,
                end_time: start_time + Duration::minutes(duration),
                user_id,
                service_name,
            })
            .await
    }

    /// Cancel an appointment, computing the refund atomically with the
    /// status write.
    pub async fn cancel(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<CancelResponse, BookingError> {
        let today = Local::now().date_naive();

        self.require_owned(user_id, appointment_id).await?;

        let refund_cents = self
            .appointments
            .cancel_with_refund(appointment_id, user_id, today)
            .await?;

        info!(
            "Cancelled appointment {} with refund {} cents",
            appointment_id, refund_cents
        );

        Ok(CancelResponse {
            appointment_id,
            refund_cents,
        })
    }

    /// Staff check-in by reference id, with the precondition ladder giving a
    /// distinct message per rejection.
    pub async fn check_in(
        &self,
        staff_email: &str,
        ref_id: &str,
    ) -> Result<CheckInResponse, BookingError> {
        let staff = self
            .catalog
            .find_staff_by_email(staff_email)
            .await?
            .ok_or_else(|| {
                BookingError::Ownership("No stylist profile for this account".to_string())
            })?;

        let appointment = self
            .appointments
            .find_by_ref(ref_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if appointment.staff_id != staff.id {
            return Err(BookingError::Ownership(
                "Appointment belongs to another stylist.".to_string(),
            ));
        }

        match appointment.status {
            AppointmentStatus::Completed => {
                return Err(BookingError::State("Appointment already completed.".to_string()))
            }
            AppointmentStatus::CheckedIn => {
                return Err(BookingError::State("Customer already checked in.".to_string()))
            }
            AppointmentStatus::Cancelled => {
                return Err(BookingError::State("Appointment was cancelled.".to_string()))
            }
            AppointmentStatus::Absence => {
                return Err(BookingError::State("Appointment marked as Absence.".to_string()))
            }
            _ => {}
        }

        StatusMachine::transition(appointment.status, AppointmentStatus::CheckedIn)
            .map_err(BookingError::State)?;

        self.appointments
            .update_status(appointment.appointment_id, AppointmentStatus::CheckedIn)
            .await?;

        let customer_name = self
            .catalog
            .customer_for_appointment(appointment.appointment_id)
            .await?
            .map(|(_, name)| name)
            .unwrap_or_else(|| "Customer".to_string());

        Ok(CheckInResponse {
            message: format!("{} Checked-In Successfully.", customer_name),
        })
    }

    /// A stylist's schedule (their non-cancelled appointments).
    pub async fn staff_schedule(
        &self,
        staff_email: &str,
    ) -> Result<Vec<AppointmentView>, BookingError> {
        let staff = self
            .catalog
            .find_staff_by_email(staff_email)
            .await?
            .ok_or_else(|| {
                BookingError::Ownership("No stylist profile for this account".to_string())
            })?;

        self.appointments.views_for_staff(staff.id).await
    }

    pub async fn receipts(&self, user_id: Uuid) -> Result<Vec<Receipt>, BookingError> {
        self.orders.receipts_for_customer(user_id).await
    }

    /// Vouchers the customer may select for a given service/stylist pair.
    ///
    /// Fixed-value vouchers whose value meets or exceeds the order value are
    /// filtered out, not offered and rejected later.
    pub async fn selectable_vouchers(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        staff_id: Option<Uuid>,
    ) -> Result<Vec<Voucher>, BookingError> {
        let service = self
            .catalog
            .find_service(service_id)
            .await?
            .ok_or_else(|| BookingError::Validation("Unknown service".to_string()))?;

        let staff = match staff_id {
            Some(id) => self
                .catalog
                .find_staff(id)
                .await?
                .ok_or_else(|| BookingError::Validation("Unknown stylist".to_string()))?,
            None => self
                .catalog
                .first_staff()
                .await?
                .ok_or_else(|| BookingError::Validation("No stylists available".to_string()))?,
        };

        let vouchers = self
            .vouchers
            .list_active(user_id, Utc::now())
            .await
            .map_err(map_rewards_err)?;

        Ok(vouchers
            .into_iter()
            .filter(|v| {
                v.discount_spec()
                    .map(|spec| pricing::voucher_applicable(&spec, service.price_cents, staff.rank))
                    .unwrap_or(false)
            })
            .collect())
    }

    /// Validate a requested slot against the grid, the lunch break, and the
    /// 5-day booking blackout.
    fn validate_slot(
        &self,
        slot: &str,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<NaiveTime, BookingError> {
        let time = parse_slot(slot).ok_or_else(|| {
            BookingError::Validation(format!("'{}' is not a bookable time slot", slot))
        })?;

        if time == lunch_break() {
            return Err(BookingError::Validation(
                "The 13:00 slot is reserved".to_string(),
            ));
        }

        if date_in_blackout(date, today) {
            return Err(BookingError::Validation(format!(
                "Bookings open {} days in advance",
                availability::MIN_LEAD_DAYS
            )));
        }

        Ok(time)
    }

    async fn require_customer(&self, user_id: Uuid) -> Result<Customer, BookingError> {
        self.customers
            .find_by_user_id(user_id)
            .await
            .map_err(|e| BookingError::Database(e.to_string()))?
            .ok_or_else(|| BookingError::Validation("No customer profile".to_string()))
    }

    async fn require_owned(
        &self,
        user_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<Appointment, BookingError> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        let customer = self.require_customer(user_id).await?;
        if appointment.customer_id != customer.customer_id {
            return Err(BookingError::Ownership(
                "This appointment belongs to another customer".to_string(),
            ));
        }

        Ok(appointment)
    }

    /// Resolve and price the selection, enforcing voucher rules and the
    /// promotion/voucher mutual exclusion.
    async fn price_selection(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        staff_id: Option<Uuid>,
        voucher_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<PricedSelection, BookingError> {
        let service = self
            .catalog
            .find_service(service_id)
            .await?
            .ok_or_else(|| BookingError::Validation("Unknown service".to_string()))?;

        let staff = match staff_id {
            Some(id) => self
                .catalog
                .find_staff(id)
                .await?
                .ok_or_else(|| BookingError::Validation("Unknown stylist".to_string()))?,
            // No preference: assign the first stylist on the roster
            None => self
                .catalog
                .first_staff()
                .await?
                .ok_or_else(|| BookingError::Validation("No stylists available".to_string()))?,
        };

        let voucher = match voucher_id {
            Some(id) => Some(self.usable_voucher(user_id, id, &service, &staff).await?),
            None => None,
        };

        let promotion = if voucher.is_none() {
            self.active_promotion(&service, today).await?
        } else {
            None
        };

        let discount = if let Some(ref v) = voucher {
            v.discount_spec().map(AppliedDiscount::Voucher)
        } else {
            promotion
                .as_ref()
                .and_then(|p| p.discount_spec())
                .map(AppliedDiscount::Promotion)
        };

        let quote = pricing::quote(service.price_cents, staff.rank, discount);

        Ok(PricedSelection {
            service,
            staff,
            quote,
            voucher,
            promotion,
        })
    }

    async fn usable_voucher(
        &self,
        user_id: Uuid,
        voucher_id: Uuid,
        service: &Service,
        staff: &Staff,
    ) -> Result<Voucher, BookingError> {
        let voucher = self
            .vouchers
            .find_by_id(voucher_id)
            .await
            .map_err(map_rewards_err)?
            .ok_or_else(|| BookingError::Validation("Unknown voucher".to_string()))?;

        if voucher.user_id != user_id {
            return Err(BookingError::Validation(
                "Voucher belongs to another account".to_string(),
            ));
        }
        if voucher.used {
            return Err(BookingError::Validation(
                "Voucher has already been used".to_string(),
            ));
        }
        if voucher.expired(Utc::now()) {
            return Err(BookingError::Validation("Voucher has expired".to_string()));
        }

        let spec = voucher.discount_spec().ok_or_else(|| {
            BookingError::Validation("Voucher has no usable discount".to_string())
        })?;

        if !pricing::voucher_applicable(&spec, service.price_cents, staff.rank) {
            return Err(BookingError::Validation(
                "Voucher value meets or exceeds the order value".to_string(),
            ));
        }

        Ok(voucher)
    }

    /// First active in-window promotion applicable to the service.
    async fn active_promotion(
        &self,
        service: &Service,
        today: NaiveDate,
    ) -> Result<Option<Promotion>, BookingError> {
        let promotions = self.catalog.list_promotions().await?;

        Ok(promotions.into_iter().find(|p| {
            p.in_window(today)
                && p.discount_spec().is_some()
                && (p.applicable_services.is_empty()
                    || p.applicable_services.contains(&service.id))
        }))
    }

    /// Draw an `A####` reference id not currently assigned. The unique
    /// constraint on ref_id backstops the residual race.
    async fn generate_ref_id(&self) -> Result<String, BookingError> {
        for _ in 0..REF_ID_ATTEMPTS {
            let candidate = format!("A{:04}", rand::thread_rng().gen_range(0..10_000));
            if self.appointments.find_by_ref(&candidate).await?.is_none() {
                return Ok(candidate);
            }
        }

        Err(BookingError::Database(
            "Could not allocate a booking reference".to_string(),
        ))
    }
}

fn map_rewards_err(err: RewardsError) -> BookingError {
    BookingError::Database(err.to_string())
}

#[cfg(test)]
mod tests {
    // BookingService orchestrates repositories over PostgreSQL; its flows
    // are exercised by the integration suite against a live database. The
    // pure pieces it composes (pricing, availability, lifecycle) carry
    // their own unit and property tests.
}
