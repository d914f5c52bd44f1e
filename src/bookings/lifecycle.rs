// Appointment lifecycle: the status transition table, the cancellation
// refund policy, and the upcoming/history membership rules.

use chrono::{NaiveDate, NaiveDateTime};

use crate::bookings::models::AppointmentStatus;

/// Hard cap on reschedules per appointment.
pub const MAX_RESCHEDULES: i32 = 3;

/// Cancellations fewer than this many days ahead of the appointment date
/// forfeit the refund.
pub const REFUND_CUTOFF_DAYS: i64 = 3;

/// Governs valid appointment status transitions
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Confirmed, Cancelled (legacy rows only; new bookings are
    ///   created confirmed)
    /// - Confirmed → CheckedIn, Cancelled, Absence (absence is sweep-only)
    /// - CheckedIn → Completed (sweep-only)
    /// - Completed, Cancelled, Absence → terminal
    pub fn is_valid_transition(from: AppointmentStatus, to: AppointmentStatus) -> bool {
        use AppointmentStatus::*;

        matches!(
            (from, to),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (Confirmed, Absence)
                | (CheckedIn, Completed)
        )
    }

    /// Attempt a transition, returning the new status or a rejection message
    pub fn transition(
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<AppointmentStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }

    pub fn is_terminal(status: AppointmentStatus) -> bool {
        matches!(
            status,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::Absence
        )
    }
}

/// Refund for a cancellation decided today against the appointment date.
///
/// Less than three days ahead is non-refundable; otherwise 80% of the amount
/// paid, rounded to the nearest cent (halves up).
pub fn refund_cents(paid_cents: i64, appointment_date: NaiveDate, today: NaiveDate) -> i64 {
    let days_ahead = (appointment_date - today).num_days();
    if days_ahead < REFUND_CUTOFF_DAYS {
        0
    } else {
        (paid_cents * 4 + 2) / 5
    }
}

/// Whether an appointment belongs in the "upcoming" section.
pub fn is_upcoming(status: AppointmentStatus, start: NaiveDateTime, now: NaiveDateTime) -> bool {
    matches!(
        status,
        AppointmentStatus::Pending | AppointmentStatus::Confirmed | AppointmentStatus::CheckedIn
    ) && start > now
}

/// Whether an appointment is still visible in the history section.
///
/// Completed appointments linger for 7 days, cancelled ones for 1 day;
/// absences and legacy rows show while their date-time is in the past.
pub fn history_visible(
    status: AppointmentStatus,
    start: NaiveDateTime,
    now: NaiveDateTime,
) -> bool {
    let days_since = (now - start).num_days();
    match status {
        AppointmentStatus::Completed => days_since <= 7,
        AppointmentStatus::Cancelled => days_since <= 1,
        _ => start < now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_confirmed_to_checked_in() {
        assert!(StatusMachine::is_valid_transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::CheckedIn
        ));
    }

    #[test]
    fn test_checked_in_to_completed() {
        assert!(StatusMachine::is_valid_transition(
            AppointmentStatus::CheckedIn,
            AppointmentStatus::Completed
        ));
    }

    #[test]
    fn test_confirmed_to_absence() {
        assert!(StatusMachine::is_valid_transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::Absence
        ));
    }

    #[test]
    fn test_confirmed_cannot_complete_directly() {
        assert!(!StatusMachine::is_valid_transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed
        ));
    }

    #[test]
    fn test_pending_cannot_check_in() {
        assert!(!StatusMachine::is_valid_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::CheckedIn
        ));
    }

    #[test]
    fn test_cancel_from_pending_and_confirmed_only() {
        assert!(StatusMachine::is_valid_transition(
            AppointmentStatus::Pending,
            AppointmentStatus::Cancelled
        ));
        assert!(StatusMachine::is_valid_transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            AppointmentStatus::CheckedIn,
            AppointmentStatus::Cancelled
        ));
        assert!(!StatusMachine::is_valid_transition(
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled
        ));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        let all = [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::CheckedIn,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Absence,
        ];

        for terminal in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Absence,
        ] {
            assert!(StatusMachine::is_terminal(terminal));
            for to in all {
                assert!(
                    !StatusMachine::is_valid_transition(terminal, to),
                    "{} must not transition to {}",
                    terminal,
                    to
                );
            }
        }
    }

    #[test]
    fn test_same_status_is_not_a_transition() {
        for status in [
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::CheckedIn,
        ] {
            assert!(!StatusMachine::is_valid_transition(status, status));
        }
    }

    #[test]
    fn test_transition_error_message() {
        let result = StatusMachine::transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::Completed,
        );
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid status transition"));
    }

    #[test]
    fn test_refund_two_days_ahead_is_zero() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let appt = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert_eq!(refund_cents(11340, appt, today), 0);
    }

    #[test]
    fn test_refund_five_days_ahead_is_eighty_percent() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let appt = NaiveDate::from_ymd_opt(2026, 8, 12).unwrap();
        assert_eq!(refund_cents(11340, appt, today), 9072);
    }

    #[test]
    fn test_refund_boundary_exactly_three_days() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let appt = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        // 3 or more days ahead refunds
        assert_eq!(refund_cents(10000, appt, today), 8000);
    }

    #[test]
    fn test_refund_rounds_to_nearest_cent() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let appt = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        // 11335 * 0.8 = 9068.0 exactly
        assert_eq!(refund_cents(11335, appt, today), 9068);
        // 4860 * 0.8 = 3888
        assert_eq!(refund_cents(4860, appt, today), 3888);
        // 11 * 0.8 = 8.8 → 9
        assert_eq!(refund_cents(11, appt, today), 9);
        // 12 * 0.8 = 9.6 → 10
        assert_eq!(refund_cents(12, appt, today), 10);
        // 13 * 0.8 = 10.4 → 10
        assert_eq!(refund_cents(13, appt, today), 10);
    }

    #[test]
    fn test_upcoming_membership() {
        let now = dt(2026, 8, 7, 12);

        assert!(is_upcoming(
            AppointmentStatus::Confirmed,
            dt(2026, 8, 12, 10),
            now
        ));
        assert!(is_upcoming(
            AppointmentStatus::CheckedIn,
            dt(2026, 8, 7, 14),
            now
        ));
        // Past date-times are never upcoming
        assert!(!is_upcoming(
            AppointmentStatus::Confirmed,
            dt(2026, 8, 7, 11),
            now
        ));
        // Terminal statuses are never upcoming
        assert!(!is_upcoming(
            AppointmentStatus::Cancelled,
            dt(2026, 8, 12, 10),
            now
        ));
        assert!(!is_upcoming(
            AppointmentStatus::Completed,
            dt(2026, 8, 12, 10),
            now
        ));
    }

    #[test]
    fn test_history_visibility_windows() {
        let now = dt(2026, 8, 7, 12);

        // Completed: 7-day window
        assert!(history_visible(
            AppointmentStatus::Completed,
            dt(2026, 8, 1, 10),
            now
        ));
        assert!(!history_visible(
            AppointmentStatus::Completed,
            dt(2026, 7, 28, 10),
            now
        ));

        // Cancelled: 1-day window
        assert!(history_visible(
            AppointmentStatus::Cancelled,
            dt(2026, 8, 6, 13),
            now
        ));
        assert!(!history_visible(
            AppointmentStatus::Cancelled,
            dt(2026, 8, 4, 10),
            now
        ));

        // Absence: visible once past
        assert!(history_visible(
            AppointmentStatus::Absence,
            dt(2026, 8, 6, 10),
            now
        ));
        assert!(!history_visible(
            AppointmentStatus::Absence,
            dt(2026, 8, 9, 10),
            now
        ));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn status_strategy() -> impl Strategy<Value = AppointmentStatus> {
        prop_oneof![
            Just(AppointmentStatus::Pending),
            Just(AppointmentStatus::Confirmed),
            Just(AppointmentStatus::CheckedIn),
            Just(AppointmentStatus::Completed),
            Just(AppointmentStatus::Cancelled),
            Just(AppointmentStatus::Absence),
        ]
    }

    /// Terminal states never transition anywhere.
    #[test]
    fn prop_terminal_states_are_absorbing() {
        proptest!(|(from in status_strategy(), to in status_strategy())| {
            if StatusMachine::is_terminal(from) {
                prop_assert!(!StatusMachine::is_valid_transition(from, to));
            }
        });
    }

    /// transition() agrees with is_valid_transition().
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(from in status_strategy(), to in status_strategy())| {
            let valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);
            prop_assert_eq!(valid, result.is_ok());
        });
    }

    /// Only completed arises from checked-in; nothing else reaches completed.
    #[test]
    fn prop_completed_only_from_checked_in() {
        proptest!(|(from in status_strategy())| {
            let valid = StatusMachine::is_valid_transition(from, AppointmentStatus::Completed);
            prop_assert_eq!(valid, from == AppointmentStatus::CheckedIn);
        });
    }

    /// Refund is 0 or exactly 80% (rounded); never more than paid.
    #[test]
    fn prop_refund_bounds() {
        proptest!(|(paid in 0i64..=1_000_000, days_ahead in -10i64..=60)| {
            let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
            let appt = today + chrono::Duration::days(days_ahead);
            let refund = refund_cents(paid, appt, today);

            if days_ahead < 3 {
                prop_assert_eq!(refund, 0);
            } else {
                prop_assert!(refund <= paid);
                prop_assert!((refund * 10 - paid * 8).abs() <= 5);
            }
        });
    }

    /// Upcoming and history sections never overlap.
    #[test]
    fn prop_upcoming_and_history_disjoint() {
        proptest!(|(status in status_strategy(), offset_hours in -400i64..=400)| {
            let now = NaiveDate::from_ymd_opt(2026, 8, 7)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap();
            let start = now + chrono::Duration::hours(offset_hours);

            let upcoming = is_upcoming(status, start, now);
            let history = history_visible(status, start, now);
            prop_assert!(!(upcoming && history));
        });
    }
}
