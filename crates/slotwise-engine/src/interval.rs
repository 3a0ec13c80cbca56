//! Inclusive interval containment.
//!
//! A candidate meeting `[inner_start, inner_end]` fits inside a declared
//! availability `[outer_start, outer_end]` when it starts no earlier and ends
//! no later. Equal boundaries count as contained.

use chrono::{DateTime, Utc};

/// Returns `true` when `[inner_start, inner_end]` lies within `[outer_start, outer_end]`.
pub fn contains(
    outer_start: DateTime<Utc>,
    outer_end: DateTime<Utc>,
    inner_start: DateTime<Utc>,
    inner_end: DateTime<Utc>,
) -> bool {
    outer_start <= inner_start && inner_end <= outer_end
}

