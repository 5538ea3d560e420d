use crate::types::{BookingError, Day, Month, Slot, SlotState};
use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use std::sync::{Arc, Mutex, MutexGuard};

pub const SLOTS_PER_DAY: u32 = 7;
pub const FIRST_SLOT_HOUR: u32 = 10;
pub const SLOT_STEP_MINUTES: u32 = 90;

/// The fixed daily schedule: 7 slots, 90 minutes apart, starting at 10:00.
/// Every seeded day carries exactly these slot times.
pub fn slot_template() -> Vec<NaiveTime> {
    (0..SLOTS_PER_DAY)
        .map(|i| {
            let minutes = FIRST_SLOT_HOUR * 60 + SLOT_STEP_MINUTES * i;
            NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0).unwrap()
        })
        .collect()
}

/// One seeded calendar year, dense by construction: month index 0-11,
/// day index 0-30, so date lookup is plain indexing instead of chained
/// key lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    year: i32,
    months: Vec<Month>,
}

impl Calendar {
    pub fn new(year: i32, months: Vec<Month>) -> Self {
        Self { year, months }
    }

    /// Fresh year with the full slot template on every day. Business days
    /// (Monday through Saturday) start out free, Sundays unavailable.
    /// Nothing is ever seeded as booked.
    pub fn seed(year: i32) -> Self {
        let template = slot_template();
        let months = (1..=12)
            .map(|month| {
                let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
                let days = first
                    .iter_days()
                    .take_while(|d| d.month() == month)
                    .map(|date| {
                        let is_business_day = date.weekday() != Weekday::Sun;
                        let state = if is_business_day {
                            SlotState::Free
                        } else {
                            SlotState::Unavailable
                        };
                        Day {
                            date,
                            weekday: date.weekday(),
                            is_business_day,
                            slots: template.iter().map(|&time| Slot { time, state }).collect(),
                        }
                    })
                    .collect();
                Month {
                    name: first.format("%B").to_string(),
                    days,
                }
            })
            .collect();
        Self { year, months }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn lookup_day(&self, date: NaiveDate) -> Option<&Day> {
        if date.year() != self.year {
            return None;
        }
        self.months
            .get(date.month0() as usize)?
            .days
            .get(date.day0() as usize)
    }

    fn lookup_day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        if date.year() != self.year {
            return None;
        }
        self.months
            .get_mut(date.month0() as usize)?
            .days
            .get_mut(date.day0() as usize)
    }

    pub fn slot_state(&self, date: NaiveDate, time: NaiveTime) -> Result<SlotState, BookingError> {
        let day = self.lookup_day(date).ok_or(BookingError::NotFound)?;
        day.slots
            .iter()
            .find(|slot| slot.time == time)
            .map(|slot| slot.state)
            .ok_or(BookingError::NotFound)
    }

    /// Overwrites the slot unconditionally. Whether the transition is legal
    /// is the booking engine's concern, not the store's.
    pub fn set_slot_state(
        &mut self,
        date: NaiveDate,
        time: NaiveTime,
        state: SlotState,
    ) -> Result<(), BookingError> {
        let day = self.lookup_day_mut(date).ok_or(BookingError::NotFound)?;
        let slot = day
            .slots
            .iter_mut()
            .find(|slot| slot.time == time)
            .ok_or(BookingError::NotFound)?;
        slot.state = state;
        Ok(())
    }

    /// Up to `window_days` consecutive days starting at `start`, ascending.
    /// Dates outside the seeded year are skipped.
    pub fn days_from(
        &self,
        start: NaiveDate,
        window_days: u32,
    ) -> impl Iterator<Item = &Day> + '_ {
        (0..u64::from(window_days))
            .filter_map(move |offset| start.checked_add_days(Days::new(offset)))
            .filter_map(|date| self.lookup_day(date))
    }
}

/// Shared handle over the calendar. Engine operations take the guard once
/// and perform their whole read-check-write sequence under it, which is what
/// keeps concurrent bookings of the same slot from both observing `Free`.
#[derive(Debug, Clone)]
pub struct CalendarStore {
    inner: Arc<Mutex<Calendar>>,
}

impl CalendarStore {
    pub fn new(calendar: Calendar) -> Self {
        Self {
            inner: Arc::new(Mutex::new(calendar)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Calendar> {
        self.inner.lock().unwrap()
    }

    /// Clone of the live calendar for the persistence snapshot.
    pub fn snapshot(&self) -> Calendar {
        self.inner.lock().unwrap().clone()
    }
}
