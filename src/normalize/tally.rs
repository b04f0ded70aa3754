use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;

/// Hands out distinct timestamps for transactions that share a calendar date.
///
/// The first transaction on a date gets midnight, the next one midnight plus one second, and so
/// on. A tally lives for one parse only.
#[derive(Debug, Default, Clone)]
pub struct DayTally {
    next_offset: HashMap<NaiveDate, i64>,
}

impl DayTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next timestamp for `date` and advances its offset.
    pub fn stamp(&mut self, date: NaiveDate) -> DateTime<Utc> {
        let offset = self.next_offset.entry(date).or_insert(0);
        let stamp = date.and_time(NaiveTime::MIN) + Duration::seconds(*offset);
        *offset += 1;
        stamp.and_utc()
    }
}
