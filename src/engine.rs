use crate::backend::BookingBackend;
use crate::calendar::{Calendar, CalendarStore};
use crate::filters::{is_future_instant, DayFilter, SlotFilter};
use crate::session::SessionStore;
use crate::types::{
    format_date, parse_date, parse_time, BookingError, Day, DaySummary, SlotState,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

/// Orchestrates the booking flow: validates raw input, tracks per-user
/// selections and performs the free-to-booked transition against the
/// calendar store. Every operation takes the current instant from the
/// caller, captured once per external request, so a day filter and the
/// final slot guard within one request can never disagree about "now".
#[derive(Debug, Clone)]
pub struct BookingEngine {
    calendar: CalendarStore,
    sessions: SessionStore,
    recent_bookers: Arc<Mutex<HashSet<i64>>>,
}

impl BookingEngine {
    pub fn new(calendar: CalendarStore) -> Self {
        Self {
            calendar,
            sessions: SessionStore::default(),
            recent_bookers: Arc::default(),
        }
    }

    /// The live calendar handle, kept reachable so the host can snapshot it.
    pub fn calendar(&self) -> &CalendarStore {
        &self.calendar
    }
}

impl BookingBackend for BookingEngine {
    /// Parses `raw_date` (dd.mm.yyyy), checks it exists in the calendar and
    /// is not before today, then records it as the user's selection. Any
    /// previous selection is dropped first; on failure no session remains.
    fn select_date(
        &self,
        user_id: i64,
        raw_date: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveDate, BookingError> {
        // re-selecting is always observed as clear-then-set
        if self.sessions.is_set(user_id) {
            self.sessions.clear(user_id);
        }
        let date = parse_date(raw_date)?;
        if self.calendar.lock().lookup_day(date).is_none() {
            return Err(BookingError::NotFound);
        }
        if date < now.date() {
            return Err(BookingError::NotInFuture);
        }
        self.sessions.set(user_id, date);
        tracing::debug!(user_id, date = %format_date(date), "date selected");
        Ok(date)
    }

    /// Today plus the following `window_days - 1` days that still have a
    /// bookable slot, in calendar order.
    fn available_dates(&self, window_days: u32, now: NaiveDateTime) -> Vec<DaySummary> {
        let calendar = self.calendar.lock();
        calendar
            .days_from(now.date(), window_days)
            .filter(|day| DayFilter::HasFreeSlot.matches(day, now))
            .map(|day| summarize(day, now))
            .collect()
    }

    /// Free slot times of the user's selected day, in template order. A
    /// selected day with nothing left yields an empty list, which is a
    /// different answer than having no selection at all.
    fn available_times(
        &self,
        user_id: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>, BookingError> {
        let date = self
            .sessions
            .get(user_id)
            .ok_or(BookingError::NoActiveSession)?;
        let calendar = self.calendar.lock();
        let day = calendar.lookup_day(date).ok_or(BookingError::NotFound)?;
        Ok(day
            .slots
            .iter()
            .filter(|slot| SlotFilter::Free.matches(date, slot, now))
            .map(|slot| slot.time)
            .collect())
    }

    /// Fails closed: any guard failure answers `false`.
    fn is_slot_bookable(&self, user_id: i64, raw_time: &str, now: NaiveDateTime) -> bool {
        let Some(date) = self.sessions.get(user_id) else {
            return false;
        };
        let Ok(time) = parse_time(raw_time) else {
            return false;
        };
        slot_guard(&self.calendar.lock(), date, time, now).is_ok()
    }

    /// Books the slot at `raw_time` on the user's selected date. The guards
    /// run again under the calendar lock together with the write, so two
    /// concurrent bookings of the same slot serialize and the loser sees
    /// `NotFree`. On success the slot is tagged with the booking user and
    /// the user's session is cleared.
    fn book(
        &self,
        user_id: i64,
        raw_time: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveTime, BookingError> {
        let date = self
            .sessions
            .get(user_id)
            .ok_or(BookingError::NoActiveSession)?;
        let time = parse_time(raw_time)?;
        {
            let mut calendar = self.calendar.lock();
            slot_guard(&calendar, date, time, now)?;
            calendar.set_slot_state(date, time, SlotState::Booked { user_id })?;
        }
        self.recent_bookers.lock().unwrap().insert(user_id);
        self.sessions.clear(user_id);
        tracing::info!(user_id, date = %format_date(date), time = %raw_time, "slot booked");
        Ok(time)
    }

    /// Drops the user's selection. Safe to call at any point in the flow.
    fn reset_session(&self, user_id: i64) {
        self.sessions.clear(user_id);
    }

    /// Users who completed a booking since startup, for the operator to
    /// contact.
    fn recent_bookers(&self) -> Vec<i64> {
        let mut bookers: Vec<i64> = self.recent_bookers.lock().unwrap().iter().copied().collect();
        bookers.sort_unstable();
        bookers
    }
}

fn slot_guard(
    calendar: &Calendar,
    date: NaiveDate,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Result<(), BookingError> {
    let state = calendar.slot_state(date, time)?;
    if !is_future_instant(date, time, now) {
        return Err(BookingError::NotInFuture);
    }
    if !state.is_free() {
        return Err(BookingError::NotFree);
    }
    Ok(())
}

fn summarize(day: &Day, now: NaiveDateTime) -> DaySummary {
    DaySummary {
        date: format_date(day.date),
        weekday: day.weekday.to_string(),
        free_slots: day
            .slots
            .iter()
            .filter(|slot| SlotFilter::Free.matches(day.date, slot, now))
            .count(),
        total_slots: day
            .slots
            .iter()
            .filter(|slot| SlotFilter::Any.matches(day.date, slot, now))
            .count(),
    }
}
