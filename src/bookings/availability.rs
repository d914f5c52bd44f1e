// Slot availability: the hourly grid, the standing lunch break, the 5-day
// booking blackout, and the advisory taken-slot check.
//
// This check is advisory at selection time; the authoritative conflict
// re-check runs inside the create/reschedule transaction, backed by the
// partial unique index on (staff_id, date, start_time).

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::bookings::models::AppointmentStatus;

/// Bookable start times. 13:00 sits in the grid but is the standing lunch
/// break and always reported taken.
pub const SLOT_TIMES: [&str; 9] = [
    "09:00", "10:00", "11:00", "12:00", "13:00", "14:00", "15:00", "16:00", "17:00",
];

/// Bookings open this many days from today.
pub const MIN_LEAD_DAYS: i64 = 5;

/// The standing lunch break, always unavailable.
pub fn lunch_break() -> NaiveTime {
    NaiveTime::from_hms_opt(13, 0, 0).expect("13:00 is a valid time")
}

/// First date bookable from `today`.
pub fn earliest_bookable_date(today: NaiveDate) -> NaiveDate {
    today + chrono::Duration::days(MIN_LEAD_DAYS)
}

/// Whether a date falls inside the booking blackout window.
pub fn date_in_blackout(date: NaiveDate, today: NaiveDate) -> bool {
    date < earliest_bookable_date(today)
}

/// Parse an HH:MM slot string into a time on the bookable grid.
pub fn parse_slot(slot: &str) -> Option<NaiveTime> {
    if !SLOT_TIMES.contains(&slot) {
        return None;
    }
    NaiveTime::parse_from_str(slot, "%H:%M").ok()
}

/// A live (non-cancelled) booked slot, as loaded for comparison.
#[derive(Debug, Clone)]
pub struct BookedSlot {
    pub staff_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub status: AppointmentStatus,
}

/// Whether a candidate slot is taken.
///
/// Taken iff the lunch break, or an existing non-cancelled appointment for
/// the same stylist at the same date and start time. With no stylist chosen
/// there is no conflict to report.
pub fn is_slot_taken(
    staff_id: Option<Uuid>,
    date: NaiveDate,
    time: NaiveTime,
    existing: &[BookedSlot],
) -> bool {
    if time == lunch_break() {
        return true;
    }

    let Some(staff_id) = staff_id else {
        return false;
    };

    existing.iter().any(|slot| {
        slot.staff_id == staff_id
            && slot.date == date
            && slot.start_time == time
            && slot.status != AppointmentStatus::Cancelled
    })
}

/// Availability of one slot in the grid, as returned to the client.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SlotStatus {
    pub time: String,
    pub available: bool,
}

/// Compute the slot grid for a stylist and date.
///
/// A blacked-out date disables every slot.
pub fn slot_grid(
    staff_id: Option<Uuid>,
    date: NaiveDate,
    today: NaiveDate,
    existing: &[BookedSlot],
) -> Vec<SlotStatus> {
    let blacked_out = date_in_blackout(date, today);

    SLOT_TIMES
        .iter()
        .map(|slot| {
            let available = !blacked_out
                && parse_slot(slot)
                    .map(|time| !is_slot_taken(staff_id, date, time, existing))
                    .unwrap_or(false);
            SlotStatus {
                time: (*slot).to_string(),
                available,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn booked(staff_id: Uuid, d: NaiveDate, h: u32, status: AppointmentStatus) -> BookedSlot {
        BookedSlot {
            staff_id,
            date: d,
            start_time: time(h),
            status,
        }
    }

    #[test]
    fn test_lunch_slot_always_taken() {
        assert!(is_slot_taken(None, date(2026, 8, 20), time(13), &[]));
        assert!(is_slot_taken(
            Some(Uuid::new_v4()),
            date(2026, 8, 20),
            time(13),
            &[]
        ));
    }

    #[test]
    fn test_free_slot_without_staff_constraint() {
        assert!(!is_slot_taken(None, date(2026, 8, 20), time(10), &[]));
    }

    #[test]
    fn test_conflicting_appointment_takes_slot() {
        let staff_id = Uuid::new_v4();
        let d = date(2026, 8, 20);
        let existing = vec![booked(staff_id, d, 10, AppointmentStatus::Confirmed)];

        assert!(is_slot_taken(Some(staff_id), d, time(10), &existing));
        // Different hour, different staff, different date: all free
        assert!(!is_slot_taken(Some(staff_id), d, time(11), &existing));
        assert!(!is_slot_taken(Some(Uuid::new_v4()), d, time(10), &existing));
        assert!(!is_slot_taken(
            Some(staff_id),
            date(2026, 8, 21),
            time(10),
            &existing
        ));
    }

    #[test]
    fn test_cancelled_appointment_frees_slot() {
        let staff_id = Uuid::new_v4();
        let d = date(2026, 8, 20);
        let existing = vec![booked(staff_id, d, 10, AppointmentStatus::Cancelled)];

        assert!(!is_slot_taken(Some(staff_id), d, time(10), &existing));
    }

    #[test]
    fn test_completed_and_absence_still_occupy() {
        let staff_id = Uuid::new_v4();
        let d = date(2026, 8, 20);

        for status in [AppointmentStatus::Completed, AppointmentStatus::Absence] {
            let existing = vec![booked(staff_id, d, 10, status)];
            assert!(is_slot_taken(Some(staff_id), d, time(10), &existing));
        }
    }

    #[test]
    fn test_blackout_window() {
        let today = date(2026, 8, 7);

        assert!(date_in_blackout(date(2026, 8, 7), today));
        assert!(date_in_blackout(date(2026, 8, 11), today));
        assert!(!date_in_blackout(date(2026, 8, 12), today));
        assert_eq!(earliest_bookable_date(today), date(2026, 8, 12));
    }

    #[test]
    fn test_parse_slot_only_accepts_grid() {
        assert_eq!(parse_slot("09:00"), Some(time(9)));
        assert_eq!(parse_slot("17:00"), Some(time(17)));
        assert_eq!(parse_slot("08:00"), None);
        assert_eq!(parse_slot("09:30"), None);
        assert_eq!(parse_slot("18:00"), None);
    }

    #[test]
    fn test_slot_grid_marks_lunch_and_conflicts() {
        let staff_id = Uuid::new_v4();
        let today = date(2026, 8, 7);
        let target = date(2026, 8, 20);
        let existing = vec![booked(staff_id, target, 10, AppointmentStatus::Confirmed)];

        let grid = slot_grid(Some(staff_id), target, today, &existing);
        assert_eq!(grid.len(), SLOT_TIMES.len());

        for slot in &grid {
            let expected = match slot.time.as_str() {
                "10:00" | "13:00" => false,
                _ => true,
            };
            assert_eq!(slot.available, expected, "slot {}", slot.time);
        }
    }

    #[test]
    fn test_slot_grid_blacked_out_date_fully_disabled() {
        let today = date(2026, 8, 7);
        let grid = slot_grid(None, date(2026, 8, 9), today, &[]);

        assert!(grid.iter().all(|slot| !slot.available));
    }
}
