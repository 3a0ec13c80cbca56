//! Scheduling records and the recommendation output type.
//!
//! Timestamps are absolute UTC instants; no timezone normalization happens
//! anywhere in the engine. The `timezone` on [`User`] is a descriptive label.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub type EventId = u64;
pub type SlotId = u64;
pub type UserId = u64;
pub type AvailabilityId = u64;

/// A meeting to be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub organizer_id: UserId,
    /// Required meeting length in minutes. Always positive once validated.
    pub duration_minutes: i64,
}

impl Event {
    /// The required length as a `Duration`, or `None` if it is out of range.
    pub fn duration(&self) -> Option<Duration> {
        Duration::try_minutes(self.duration_minutes)
    }
}

/// A candidate window proposed for an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: SlotId,
    pub event_id: EventId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TimeSlot {
    pub fn span(&self) -> Duration {
        self.end_time - self.start_time
    }
}

/// A participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub timezone: String,
}

/// One contiguous interval in which a user is free for a given event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub id: AvailabilityId,
    pub user_id: UserId,
    pub event_id: EventId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Ranked output for a single time slot. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub time_slot: TimeSlot,
    /// Users who fit the best start time(s), in input order.
    #[serde(rename = "matching_users")]
    pub attending: Vec<User>,
    /// Everyone else who submitted availability for the event.
    #[serde(rename = "non_matching_users")]
    pub not_attending: Vec<User>,
    /// `attending / total users with availability * 100`.
    #[serde(rename = "matching_percentage")]
    pub attendance_percentage: f64,
    /// Required meeting length in minutes.
    pub event_duration: i64,
    /// Every start time within the slot that reaches the best attendance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_options: Vec<DateTime<Utc>>,
}

impl Recommendation {
    pub fn total_users(&self) -> usize {
        self.attending.len() + self.not_attending.len()
    }
}
