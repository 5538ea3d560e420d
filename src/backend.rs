use crate::types::{BookingError, DaySummary};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// The booking operations the transport layer drives. Only primitive and
/// structured values cross this boundary: an opaque user id, raw strings as
/// typed by the user and the instant the request was received.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    fn available_dates(&self, window_days: u32, now: NaiveDateTime) -> Vec<DaySummary>;
    fn select_date(
        &self,
        user_id: i64,
        raw_date: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveDate, BookingError>;
    fn available_times(
        &self,
        user_id: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<NaiveTime>, BookingError>;
    fn is_slot_bookable(&self, user_id: i64, raw_time: &str, now: NaiveDateTime) -> bool;
    fn book(
        &self,
        user_id: i64,
        raw_time: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveTime, BookingError>;
    fn reset_session(&self, user_id: i64);
    fn recent_bookers(&self) -> Vec<i64>;
}
