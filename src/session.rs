use chrono::NaiveDate;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Per-user transient booking state: the date a user is currently mid-flow
/// for. Keyed by the caller-supplied user id so independent users never see
/// each other's selection. Absence of an entry means no date selected.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    selected: Arc<Mutex<HashMap<i64, NaiveDate>>>,
}

impl SessionStore {
    /// Stores the user's selected date. The caller validates the date
    /// (exists in the calendar, not in the past) before calling this.
    pub fn set(&self, user_id: i64, date: NaiveDate) {
        self.selected.lock().unwrap().insert(user_id, date);
    }

    /// Idempotent: clearing an absent session is a no-op.
    pub fn clear(&self, user_id: i64) {
        self.selected.lock().unwrap().remove(&user_id);
    }

    pub fn is_set(&self, user_id: i64) -> bool {
        self.selected.lock().unwrap().contains_key(&user_id)
    }

    pub fn get(&self, user_id: i64) -> Option<NaiveDate> {
        self.selected.lock().unwrap().get(&user_id).copied()
    }
}
