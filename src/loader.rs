use crate::calendar::{slot_template, Calendar};
use crate::types::{format_date, format_time, Day, Month, Slot, SlotState, DATE_FORMAT, TIME_FORMAT};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};
use thiserror::Error;

// Schedule blob layout: {"2024": {"months": [{"name", "days": [...]}]}}.
// Record states: 0 = free, 2 = unavailable, any other positive value is the
// id of the user the slot is booked by.
const STATE_FREE: i64 = 0;
const STATE_UNAVAILABLE: i64 = 2;

#[derive(Debug, Error)]
pub enum ScheduleFileError {
    #[error("cannot read or write schedule file: {0}")]
    Io(#[from] std::io::Error),
    #[error("schedule file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schedule file must contain exactly one year")]
    NotSingleYear,
    #[error("year key {0:?} is not a number")]
    MalformedYear(String),
    #[error("malformed date {0:?}")]
    MalformedDate(String),
    #[error("malformed slot time {0:?}")]
    MalformedTime(String),
    #[error("record state {0} is negative")]
    MalformedState(i64),
    #[error("day {0} is out of calendar position")]
    MisplacedDay(String),
    #[error("month {0} does not cover every calendar day")]
    IncompleteMonth(String),
    #[error("day {0} does not carry the fixed slot template")]
    TemplateMismatch(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct RawYear {
    months: Vec<RawMonth>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawMonth {
    name: String,
    days: Vec<RawDay>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawDay {
    date: String,
    name: String,
    week_day: u8,
    is_workday: bool,
    // keys are zero-padded HH:MM, so the lexicographic map order is
    // the template order
    records: BTreeMap<String, i64>,
}

pub fn load_schedule(path: &Path) -> Result<Calendar, ScheduleFileError> {
    let contents = fs::read_to_string(path)?;
    let raw: BTreeMap<String, RawYear> = serde_json::from_str(&contents)?;
    if raw.len() != 1 {
        return Err(ScheduleFileError::NotSingleYear);
    }
    let (year_key, raw_year) = raw.into_iter().next().unwrap();
    let year: i32 = year_key
        .parse()
        .map_err(|_| ScheduleFileError::MalformedYear(year_key.clone()))?;

    let template = slot_template();
    let mut months = Vec::with_capacity(raw_year.months.len());
    for (month_index, raw_month) in raw_year.months.into_iter().enumerate() {
        let month_number = month_index as u32 + 1;
        let first = NaiveDate::from_ymd_opt(year, month_number, 1)
            .ok_or_else(|| ScheduleFileError::MalformedYear(year_key.clone()))?;
        let days_in_month = first
            .iter_days()
            .take_while(|d| d.month() == month_number)
            .count();
        if raw_month.days.len() != days_in_month {
            return Err(ScheduleFileError::IncompleteMonth(raw_month.name));
        }
        let mut days = Vec::with_capacity(raw_month.days.len());
        for (day_index, raw_day) in raw_month.days.into_iter().enumerate() {
            let date = NaiveDate::parse_from_str(&raw_day.date, DATE_FORMAT)
                .map_err(|_| ScheduleFileError::MalformedDate(raw_day.date.clone()))?;
            let expected =
                NaiveDate::from_ymd_opt(year, month_number, day_index as u32 + 1);
            if expected != Some(date) {
                return Err(ScheduleFileError::MisplacedDay(raw_day.date));
            }
            days.push(Day {
                date,
                weekday: date.weekday(),
                is_business_day: raw_day.is_workday,
                slots: convert_records(&raw_day, &template)?,
            });
        }
        months.push(Month {
            name: raw_month.name,
            days,
        });
    }
    if months.len() != 12 {
        return Err(ScheduleFileError::IncompleteMonth(year_key));
    }

    tracing::info!(year, path = %path.display(), "schedule loaded");
    Ok(Calendar::new(year, months))
}

fn convert_records(
    raw_day: &RawDay,
    template: &[NaiveTime],
) -> Result<Vec<Slot>, ScheduleFileError> {
    let mut slots = Vec::with_capacity(raw_day.records.len());
    for (raw_time, raw_state) in &raw_day.records {
        let time = NaiveTime::parse_from_str(raw_time, TIME_FORMAT)
            .map_err(|_| ScheduleFileError::MalformedTime(raw_time.clone()))?;
        let state = match *raw_state {
            STATE_FREE => SlotState::Free,
            STATE_UNAVAILABLE => SlotState::Unavailable,
            user_id if user_id > 0 => SlotState::Booked { user_id },
            other => return Err(ScheduleFileError::MalformedState(other)),
        };
        slots.push(Slot { time, state });
    }
    let times: Vec<NaiveTime> = slots.iter().map(|slot| slot.time).collect();
    if times != template {
        return Err(ScheduleFileError::TemplateMismatch(raw_day.date.clone()));
    }
    Ok(slots)
}

pub fn save_schedule(path: &Path, calendar: &Calendar) -> Result<(), ScheduleFileError> {
    let months = calendar
        .months()
        .iter()
        .map(|month| RawMonth {
            name: month.name.clone(),
            days: month
                .days
                .iter()
                .map(|day| RawDay {
                    date: format_date(day.date),
                    name: day.date.format("%A").to_string(),
                    week_day: day.weekday.num_days_from_monday() as u8,
                    is_workday: day.is_business_day,
                    records: day
                        .slots
                        .iter()
                        .map(|slot| {
                            let state = match slot.state {
                                SlotState::Free => STATE_FREE,
                                SlotState::Unavailable => STATE_UNAVAILABLE,
                                SlotState::Booked { user_id } => user_id,
                            };
                            (format_time(slot.time), state)
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect();

    let mut raw = BTreeMap::new();
    raw.insert(calendar.year().to_string(), RawYear { months });
    fs::write(path, serde_json::to_string_pretty(&raw)?)?;
    tracing::info!(year = calendar.year(), path = %path.display(), "schedule saved");
    Ok(())
}
