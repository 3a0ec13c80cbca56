//! The recommendation engine.
//!
//! For every time slot long enough to hold the meeting, candidate start times
//! are walked on a fixed grid from the slot start to the latest start that
//! still ends inside the slot. Each candidate `[start, start + duration]` is
//! checked against every participant's availability; the candidate(s) seating
//! the most participants win. Slots where nobody can attend at any candidate
//! produce nothing.
//!
//! The engine is a pure function over the snapshots it is given. It never
//! fails: a missing event or storage error is the caller's concern (see
//! [`crate::service`]).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{Result, SchedulerError};
use crate::interval;
use crate::model::{Availability, Event, Recommendation, TimeSlot, User, UserId};

/// Default spacing between candidate start times, in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 15;

/// Tuning knobs for the engine.
///
/// The step size decides which start times are discoverable: an optimal start
/// that falls between grid points is never found. Changing it changes the
/// output for identical inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendConfig {
    step_minutes: u32,
}

impl RecommendConfig {
    /// Build a config with a custom step. A zero step is rejected.
    pub fn new(step_minutes: u32) -> Result<Self> {
        if step_minutes == 0 {
            return Err(SchedulerError::InvalidInput(
                "step must be at least one minute".to_string(),
            ));
        }
        Ok(Self { step_minutes })
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes))
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

/// Group availability records by user, keeping record order within each user.
pub fn group_by_user(availability: &[Availability]) -> HashMap<UserId, Vec<Availability>> {
    let mut grouped: HashMap<UserId, Vec<Availability>> = HashMap::new();
    for record in availability {
        grouped.entry(record.user_id).or_default().push(record.clone());
    }
    grouped
}

/// Candidate start times within `slot` for a meeting of `duration`.
///
/// Starts at `slot.start_time` and advances by `step` while the meeting still
/// ends by `slot.end_time`. Empty when the slot is shorter than the meeting.
/// The walk stops early if the next step would leave chrono's timestamp range.
pub fn candidate_starts(slot: &TimeSlot, duration: Duration, step: Duration) -> Vec<DateTime<Utc>> {
    if slot.span() < duration {
        return Vec::new();
    }
    let Some(latest_start) = slot.end_time.checked_sub_signed(duration) else {
        return Vec::new();
    };

    let mut starts = Vec::new();
    let mut start = slot.start_time;
    while start <= latest_start {
        starts.push(start);
        match start.checked_add_signed(step) {
            Some(next) => start = next,
            None => break,
        }
    }
    starts
}

/// Compute ranked recommendations with the default 15-minute grid.
///
/// # Arguments
///
/// * `event` — Supplies the required duration (assumed positive).
/// * `slots` — Every candidate slot for the event. Their order is the tie
///   order among slots with equal attendance.
/// * `availability_by_user` — Each user's intervals for the event. A user with
///   no entry is never available.
/// * `users` — The distinct users who submitted availability for the event.
///   This is the attendance denominator and fixes the order of the user lists
///   in the output.
pub fn compute_recommendations(
    event: &Event,
    slots: &[TimeSlot],
    availability_by_user: &HashMap<UserId, Vec<Availability>>,
    users: &[User],
) -> Vec<Recommendation> {
    compute_recommendations_with(
        &RecommendConfig::default(),
        event,
        slots,
        availability_by_user,
        users,
    )
}

/// Compute ranked recommendations with an explicit [`RecommendConfig`].
///
/// Results are sorted by attendance percentage, highest first. The sort is
/// stable, so slots with equal percentages keep the order of `slots`.
pub fn compute_recommendations_with(
    config: &RecommendConfig,
    event: &Event,
    slots: &[TimeSlot],
    availability_by_user: &HashMap<UserId, Vec<Availability>>,
    users: &[User],
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = slots
        .iter()
        .filter_map(|slot| recommend_slot(config, event, slot, availability_by_user, users))
        .collect();

    recommendations.sort_by(|a, b| b.attendance_percentage.total_cmp(&a.attendance_percentage));

    debug!(
        event_id = event.id,
        slots = slots.len(),
        users = users.len(),
        recommended = recommendations.len(),
        "computed recommendations"
    );

    recommendations
}

/// Best attendance found so far while walking one slot.
struct Best<'a> {
    attending: Vec<&'a User>,
    not_attending: Vec<&'a User>,
    start_options: Vec<DateTime<Utc>>,
}

fn recommend_slot(
    config: &RecommendConfig,
    event: &Event,
    slot: &TimeSlot,
    availability_by_user: &HashMap<UserId, Vec<Availability>>,
    users: &[User],
) -> Option<Recommendation> {
    let Some(duration) = event.duration() else {
        debug!(slot_id = slot.id, "meeting duration out of range, skipped");
        return None;
    };
    if slot.span() < duration {
        debug!(slot_id = slot.id, "slot shorter than meeting, skipped");
        return None;
    }

    let mut best = Best {
        attending: Vec::new(),
        not_attending: Vec::new(),
        start_options: Vec::new(),
    };

    for start in candidate_starts(slot, duration, config.step()) {
        let Some(end) = start.checked_add_signed(duration) else {
            continue;
        };
        let (attending, not_attending): (Vec<&User>, Vec<&User>) = users
            .iter()
            .partition(|user| is_available(availability_by_user, user.id, start, end));

        if attending.len() > best.attending.len() {
            best = Best {
                attending,
                not_attending,
                start_options: vec![start],
            };
        } else if !attending.is_empty() && attending.len() == best.attending.len() {
            best.start_options.push(start);
        }
    }

    if best.attending.is_empty() {
        debug!(slot_id = slot.id, "nobody can attend any start, skipped");
        return None;
    }

    // `users` is non-empty here because someone attends.
    let attendance_percentage = best.attending.len() as f64 / users.len() as f64 * 100.0;

    Some(Recommendation {
        time_slot: slot.clone(),
        attending: best.attending.into_iter().cloned().collect(),
        not_attending: best.not_attending.into_iter().cloned().collect(),
        attendance_percentage,
        event_duration: event.duration_minutes,
        start_options: best.start_options,
    })
}

/// A user attends `[start, end]` if any one of their intervals contains it.
fn is_available(
    availability_by_user: &HashMap<UserId, Vec<Availability>>,
    user_id: UserId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    availability_by_user.get(&user_id).is_some_and(|intervals| {
        intervals
            .iter()
            .any(|a| interval::contains(a.start_time, a.end_time, start, end))
    })
}
