use crate::types::{Day, Slot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Strictly-after-now check shared by the day filter, the time listing and
/// the booking guard. Keeping one definition is what prevents the engine
/// from offering a "today" slot that the final guard then rejects.
pub fn is_future_instant(date: NaiveDate, time: NaiveTime, now: NaiveDateTime) -> bool {
    date > now.date() || (date == now.date() && time > now.time())
}

/// Slot-level query predicate. A closed set: the traversal in the engine is
/// shared and only these classifications exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFilter {
    Any,
    Free,
}

impl SlotFilter {
    pub fn matches(&self, date: NaiveDate, slot: &Slot, now: NaiveDateTime) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Free => slot.state.is_free() && is_future_instant(date, slot.time, now),
        }
    }
}

/// Day-level query predicate. `HasNoFreeSlot` is the exact negation of
/// `HasFreeSlot`, future refinement included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    HasFreeSlot,
    HasNoFreeSlot,
}

impl DayFilter {
    pub fn matches(&self, day: &Day, now: NaiveDateTime) -> bool {
        let has_free = day
            .slots
            .iter()
            .any(|slot| SlotFilter::Free.matches(day.date, slot, now));
        match self {
            DayFilter::HasFreeSlot => has_free,
            DayFilter::HasNoFreeSlot => !has_free,
        }
    }
}
