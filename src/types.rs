use chrono::{NaiveDate, NaiveTime, Weekday};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%d.%m.%Y";
pub const TIME_FORMAT: &str = "%H:%M";

lazy_static! {
    // chrono accepts unpadded fields, so the wire format is gated by regex first
    static ref DATE_RE: Regex = Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap();
    static ref TIME_RE: Regex = Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotState {
    Free,
    Booked { user_id: i64 },
    Unavailable,
}

impl SlotState {
    pub fn is_free(&self) -> bool {
        matches!(self, SlotState::Free)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub time: NaiveTime,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub is_business_day: bool,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    pub name: String,
    pub days: Vec<Day>,
}

/// What the transport renders for one candidate booking day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: String,
    pub weekday: String,
    pub free_slots: usize,
    pub total_slots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BookingError {
    #[error("input is not a valid date or time")]
    InvalidFormat,
    #[error("date or slot is not part of the calendar")]
    NotFound,
    #[error("requested time is not in the future")]
    NotInFuture,
    #[error("slot is not free")]
    NotFree,
    #[error("no date selected")]
    NoActiveSession,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, BookingError> {
    if !DATE_RE.is_match(raw) {
        return Err(BookingError::InvalidFormat);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| BookingError::InvalidFormat)
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, BookingError> {
    if !TIME_RE.is_match(raw) {
        return Err(BookingError::InvalidFormat);
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| BookingError::InvalidFormat)
}

pub fn is_time_format_valid(raw: &str) -> bool {
    parse_time(raw).is_ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}
