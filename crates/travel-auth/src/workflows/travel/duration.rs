//! Elapsed-hours arithmetic for travel legs.
//!
//! Times carry no date, so an arrival earlier than the departure is read as the next day.
//! Leftover minutes are dropped: payable overtime is counted in whole hours only.

use chrono::{NaiveTime, Timelike};

use super::domain::TravelEntry;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse an `HH:MM` (or `HH:MM:SS`) time of day. Blank or malformed input yields `None`.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .ok()
}

/// Whole hours from `departure` to `arrival`; 0 when either side does not parse.
pub fn elapsed_hours(departure: &str, arrival: &str) -> u32 {
    match (parse_time_of_day(departure), parse_time_of_day(arrival)) {
        (Some(departure), Some(arrival)) => elapsed_hours_between(departure, arrival),
        _ => 0,
    }
}

pub fn elapsed_hours_between(departure: NaiveTime, arrival: NaiveTime) -> u32 {
    let delta = (minutes_since_midnight(arrival) - minutes_since_midnight(departure))
        .rem_euclid(MINUTES_PER_DAY);
    // delta is in 0..1440, so the quotient fits comfortably.
    (delta / 60) as u32
}

/// Sum of per-leg hours, each leg floored independently.
pub fn total_hours<'a, I>(entries: I) -> u32
where
    I: IntoIterator<Item = &'a TravelEntry>,
{
    entries.into_iter().map(TravelEntry::elapsed_hours).sum()
}

/// Render a stored 24-hour value on the 12-hour clock (`17:05` -> `5:05 PM`).
/// Values that do not parse are shown as entered.
pub fn twelve_hour_label(raw: &str) -> String {
    match parse_time_of_day(raw) {
        Some(time) => time.format("%-I:%M %p").to_string(),
        None => raw.trim().to_string(),
    }
}

fn minutes_since_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}
