use crate::backend::BookingBackend;
use crate::types::{BookingError, DaySummary};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

pub struct MockBookingBackendInner {
    pub success: AtomicBool,
    pub calls_to_available_dates: AtomicU64,
    pub calls_to_select_date: AtomicU64,
    pub calls_to_available_times: AtomicU64,
    pub calls_to_is_slot_bookable: AtomicU64,
    pub calls_to_book: AtomicU64,
    pub calls_to_reset_session: AtomicU64,
    pub calls_to_recent_bookers: AtomicU64,
    pub dates: Mutex<Vec<DaySummary>>,
    pub times: Mutex<Vec<NaiveTime>>,
    pub bookers: Mutex<Vec<i64>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner {
            success: AtomicBool::new(true),
            calls_to_available_dates: AtomicU64::default(),
            calls_to_select_date: AtomicU64::default(),
            calls_to_available_times: AtomicU64::default(),
            calls_to_is_slot_bookable: AtomicU64::default(),
            calls_to_book: AtomicU64::default(),
            calls_to_reset_session: AtomicU64::default(),
            calls_to_recent_bookers: AtomicU64::default(),
            dates: Mutex::default(),
            times: Mutex::default(),
            bookers: Mutex::default(),
        }))
    }

    fn succeeds(&self) -> bool {
        self.0.success.load(Ordering::SeqCst)
    }
}

impl BookingBackend for MockBookingBackend {
    fn available_dates(&self, _window_days: u32, _now: NaiveDateTime) -> Vec<DaySummary> {
        self.0
            .calls_to_available_dates
            .fetch_add(1, Ordering::SeqCst);
        self.0.dates.lock().unwrap().clone()
    }

    fn select_date(
        &self,
        _user_id: i64,
        _raw_date: &str,
        _now: NaiveDateTime,
    ) -> Result<NaiveDate, BookingError> {
        self.0.calls_to_select_date.fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()),
            false => Err(BookingError::NotFound),
        }
    }

    fn available_times(
        &self,
        _user_id: i64,
        _now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>, BookingError> {
        self.0
            .calls_to_available_times
            .fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(self.0.times.lock().unwrap().clone()),
            false => Err(BookingError::NoActiveSession),
        }
    }

    fn is_slot_bookable(&self, _user_id: i64, _raw_time: &str, _now: NaiveDateTime) -> bool {
        self.0
            .calls_to_is_slot_bookable
            .fetch_add(1, Ordering::SeqCst);
        self.succeeds()
    }

    fn book(
        &self,
        _user_id: i64,
        _raw_time: &str,
        _now: NaiveDateTime,
    ) -> Result<NaiveTime, BookingError> {
        self.0.calls_to_book.fetch_add(1, Ordering::SeqCst);
        match self.succeeds() {
            true => Ok(NaiveTime::from_hms_opt(10, 0, 0).unwrap()),
            false => Err(BookingError::NotFree),
        }
    }

    fn reset_session(&self, _user_id: i64) {
        self.0.calls_to_reset_session.fetch_add(1, Ordering::SeqCst);
    }

    fn recent_bookers(&self) -> Vec<i64> {
        self.0
            .calls_to_recent_bookers
            .fetch_add(1, Ordering::SeqCst);
        self.0.bookers.lock().unwrap().clone()
    }
}
