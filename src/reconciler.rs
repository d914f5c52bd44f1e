// Background reconciler: advances overdue appointments and raises 24h
// reminders. Triggered from schedule-read paths rather than a timer, and
// strictly best-effort: a failed sweep is logged and never blocks the
// request that triggered it.

use chrono::{Duration, Local, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::bookings::models::AppointmentStatus;
use crate::bookings::repository::{AppointmentsRepository, ReminderCandidate, SweepCandidate};
use crate::notifications::NotificationsRepository;

/// Reminders fire for appointments starting within this window around
/// exactly 24 hours from now.
const REMINDER_WINDOW_HOURS: i64 = 1;

/// Whether a candidate's scheduled end has passed.
pub fn past_end(candidate: &SweepCandidate, now: NaiveDateTime) -> bool {
    candidate.date.and_time(candidate.end_time) < now
}

/// Ids due to advance, from rows already filtered to the source status.
/// Rows already advanced by an earlier sweep are not selected again, which
/// is what makes repeated sweeps no-ops.
pub fn due_ids(candidates: &[SweepCandidate], now: NaiveDateTime) -> Vec<Uuid> {
    candidates
        .iter()
        .filter(|c| past_end(c, now))
        .map(|c| c.appointment_id)
        .collect()
}

/// Whether a start time sits within ±1 hour of exactly 24 hours from now.
pub fn within_reminder_window(start: NaiveDateTime, now: NaiveDateTime) -> bool {
    let target = now + Duration::hours(24);
    let distance = (start - target).num_minutes().abs();
    distance <= REMINDER_WINDOW_HOURS * 60
}

/// Compose the reminder message for a candidate.
fn reminder_message(candidate: &ReminderCandidate) -> String {
    format!(
        "You have a booking for {} with {} tomorrow at {}.",
        candidate.service_name.as_deref().unwrap_or("Service"),
        candidate.staff_name,
        candidate.start_time.format("%H:%M")
    )
}

/// Best-effort sweeps over the appointment book
#[derive(Clone)]
pub struct Reconciler {
    appointments: AppointmentsRepository,
    notifications: NotificationsRepository,
}

impl Reconciler {
    pub fn new(
        appointments: AppointmentsRepository,
        notifications: NotificationsRepository,
    ) -> Self {
        Self {
            appointments,
            notifications,
        }
    }

    /// Run all three sweeps. Each failure is logged and swallowed.
    pub async fn run_sweeps(&self) {
        if let Err(e) = self.sweep_absences().await {
            warn!("Absence sweep failed: {}", e);
        }
        if let Err(e) = self.sweep_completions().await {
            warn!("Completion sweep failed: {}", e);
        }
        if let Err(e) = self.sweep_reminders().await {
            warn!("Reminder sweep failed: {}", e);
        }
    }

    /// Confirmed appointments past their end time were never checked in:
    /// mark them absent.
    async fn sweep_absences(&self) -> Result<(), crate::bookings::BookingError> {
        let now = Local::now().naive_local();
        let candidates = self
            .appointments
            .sweep_candidates(AppointmentStatus::Confirmed, now.date())
            .await?;

        let ids = due_ids(&candidates, now);
        if ids.is_empty() {
            return Ok(());
        }

        let moved = self
            .appointments
            .mark_swept(&ids, AppointmentStatus::Confirmed, AppointmentStatus::Absence)
            .await?;
        info!("Absence sweep moved {} appointment(s)", moved);

        Ok(())
    }

    /// Checked-in appointments past their end time are done: complete them.
    async fn sweep_completions(&self) -> Result<(), crate::bookings::BookingError> {
        let now = Local::now().naive_local();
        let candidates = self
            .appointments
            .sweep_candidates(AppointmentStatus::CheckedIn, now.date())
            .await?;

        let ids = due_ids(&candidates, now);
        if ids.is_empty() {
            return Ok(());
        }

        let moved = self
            .appointments
            .mark_swept(&ids, AppointmentStatus::CheckedIn, AppointmentStatus::Completed)
            .await?;
        info!("Completion sweep moved {} appointment(s)", moved);

        Ok(())
    }

    /// Remind customers of confirmed appointments roughly 24 hours out.
    /// The (appointment_id, kind) uniqueness in the notification table keeps
    /// this to exactly one reminder per appointment across repeated sweeps.
    async fn sweep_reminders(&self) -> Result<(), crate::bookings::BookingError> {
        let now = Local::now().naive_local();
        let tomorrow = (now + Duration::hours(24)).date();

        let candidates = self.appointments.reminder_candidates(tomorrow).await?;

        for candidate in candidates {
            let start = candidate.date.and_time(candidate.start_time);
            if !within_reminder_window(start, now) {
                continue;
            }

            let inserted = self
                .notifications
                .insert_reminder_once(
                    candidate.appointment_id,
                    candidate.user_id,
                    reminder_message(&candidate),
                )
                .await
                .map_err(|e| crate::bookings::BookingError::Database(e.to_string()))?;

            if inserted {
                info!(
                    "Reminder raised for appointment {}",
                    candidate.appointment_id
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn dt(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn candidate(d: u32, end_h: u32) -> SweepCandidate {
        SweepCandidate {
            appointment_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, d).unwrap(),
            end_time: NaiveTime::from_hms_opt(end_h, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_past_end_detection() {
        let now = dt(7, 12);

        assert!(past_end(&candidate(7, 11), now));
        assert!(past_end(&candidate(6, 17), now));
        assert!(!past_end(&candidate(7, 12), now));
        assert!(!past_end(&candidate(7, 14), now));
    }

    #[test]
    fn test_due_ids_filters_only_overdue() {
        let now = dt(7, 12);
        let overdue = candidate(7, 10);
        let pending = candidate(7, 15);
        let overdue_id = overdue.appointment_id;

        let ids = due_ids(&[overdue, pending], now);
        assert_eq!(ids, vec![overdue_id]);
    }

    #[test]
    fn test_due_ids_empty_input_is_noop() {
        // A second sweep sees no rows in the source status and does nothing
        assert!(due_ids(&[], dt(7, 12)).is_empty());
    }

    #[test]
    fn test_reminder_window_edges() {
        let now = dt(7, 12);

        // Exactly 24h out
        assert!(within_reminder_window(dt(8, 12), now));
        // Edges of the ±1h window
        assert!(within_reminder_window(dt(8, 11), now));
        assert!(within_reminder_window(dt(8, 13), now));
        // Outside
        assert!(!within_reminder_window(dt(8, 14), now));
        assert!(!within_reminder_window(dt(8, 10), now));
        assert!(!within_reminder_window(dt(7, 13), now));
        assert!(!within_reminder_window(dt(9, 12), now));
    }

    #[test]
    fn test_reminder_message_includes_names_and_time() {
        let candidate = ReminderCandidate {
            appointment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            service_name: Some("Wash & Cut".to_string()),
            staff_name: "Sarah Jenkins".to_string(),
        };

        let message = reminder_message(&candidate);
        assert!(message.contains("Wash & Cut"));
        assert!(message.contains("Sarah Jenkins"));
        assert!(message.contains("14:00"));
    }

    #[test]
    fn test_reminder_message_defaults_service_name() {
        let candidate = ReminderCandidate {
            appointment_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2026, 8, 8).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            service_name: None,
            staff_name: "Jessica Alva".to_string(),
        };

        assert!(reminder_message(&candidate).contains("Service"));
    }
}
