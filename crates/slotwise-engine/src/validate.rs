//! Record validation.
//!
//! The engine trusts its inputs. These checks run before a record is stored,
//! so that inverted intervals and non-positive durations never reach it.

use chrono::{DateTime, Utc};

use crate::error::{Result, SchedulerError};
use crate::model::{Availability, Event, TimeSlot, User};

/// Longest meeting accepted, one leap year in minutes.
pub const MAX_DURATION_MINUTES: i64 = 366 * 24 * 60;

pub fn validate_event(event: &Event) -> Result<()> {
    if event.title.trim().is_empty() {
        return Err(invalid("event title is required"));
    }
    if event.duration_minutes <= 0 {
        return Err(invalid("event duration must be positive"));
    }
    if event.duration_minutes > MAX_DURATION_MINUTES {
        return Err(SchedulerError::InvalidInput(format!(
            "event duration must not exceed {} minutes",
            MAX_DURATION_MINUTES
        )));
    }
    Ok(())
}

pub fn validate_time_slot(slot: &TimeSlot) -> Result<()> {
    validate_interval(slot.start_time, slot.end_time)
}

pub fn validate_user(user: &User) -> Result<()> {
    if user.name.trim().is_empty() {
        return Err(invalid("user name is required"));
    }
    if !user.email.contains('@') {
        return Err(SchedulerError::InvalidInput(format!(
            "invalid email address: '{}'",
            user.email
        )));
    }
    if user.timezone.trim().is_empty() {
        return Err(invalid("user timezone is required"));
    }
    Ok(())
}

pub fn validate_availability(availability: &Availability) -> Result<()> {
    validate_interval(availability.start_time, availability.end_time)
}

fn validate_interval(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start >= end {
        return Err(SchedulerError::InvalidInput(format!(
            "start time must be before end time ({} >= {})",
            start.to_rfc3339(),
            end.to_rfc3339()
        )));
    }
    Ok(())
}

fn invalid(message: &str) -> SchedulerError {
    SchedulerError::InvalidInput(message.to_string())
}
