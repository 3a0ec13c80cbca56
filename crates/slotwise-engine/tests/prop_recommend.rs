//! Property-based tests for the recommendation engine using proptest.
//!
//! These verify invariants that hold for *any* set of slots and availability,
//! not just the worked examples in `recommend_tests.rs`.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use slotwise_engine::model::{Availability, Event, TimeSlot, User};
use slotwise_engine::recommend::{compute_recommendations, group_by_user};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap()
}

/// An interval as (offset from 08:00, length), both in minutes.
fn arb_interval() -> impl Strategy<Value = (i64, i64)> {
    (0i64..=600, 1i64..=240)
}

fn arb_duration() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), Just(90), 1i64..=180]
}

fn arb_slots() -> impl Strategy<Value = Vec<TimeSlot>> {
    prop::collection::vec(arb_interval(), 0..6).prop_map(|intervals| {
        intervals
            .into_iter()
            .enumerate()
            .map(|(i, (offset, len))| TimeSlot {
                id: i as u64 + 1,
                event_id: 1,
                start_time: base() + Duration::minutes(offset),
                end_time: base() + Duration::minutes(offset + len),
            })
            .collect()
    })
}

/// Up to five users, each with up to three intervals.
fn arb_availability() -> impl Strategy<Value = Vec<Availability>> {
    prop::collection::vec(prop::collection::vec(arb_interval(), 1..4), 0..6).prop_map(|per_user| {
        let mut next_id = 1;
        let mut records = Vec::new();
        for (user_index, intervals) in per_user.into_iter().enumerate() {
            for (offset, len) in intervals {
                records.push(Availability {
                    id: next_id,
                    user_id: user_index as u64 + 1,
                    event_id: 1,
                    start_time: base() + Duration::minutes(offset),
                    end_time: base() + Duration::minutes(offset + len),
                });
                next_id += 1;
            }
        }
        records
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn event(duration_minutes: i64) -> Event {
    Event {
        id: 1,
        title: "Sync".to_string(),
        description: String::new(),
        organizer_id: 1,
        duration_minutes,
    }
}

/// The distinct users behind the availability records, in id order.
fn users_of(availability: &[Availability]) -> Vec<User> {
    let mut ids: Vec<u64> = availability.iter().map(|a| a.user_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter()
        .map(|id| User {
            id,
            name: format!("user-{}", id),
            email: format!("user-{}@example.com", id),
            timezone: "UTC".to_string(),
        })
        .collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn short_slots_never_recommended(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let recs = compute_recommendations(&event(duration), &slots, &group_by_user(&availability), &users);

        for rec in &recs {
            prop_assert!(rec.time_slot.span() >= Duration::minutes(duration));
        }
    }

    #[test]
    fn attendance_partitions_all_users(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let recs = compute_recommendations(&event(duration), &slots, &group_by_user(&availability), &users);

        for rec in &recs {
            prop_assert_eq!(rec.attending.len() + rec.not_attending.len(), users.len());
            let mut seen: Vec<u64> = rec
                .attending
                .iter()
                .chain(rec.not_attending.iter())
                .map(|u| u.id)
                .collect();
            seen.sort_unstable();
            let expected: Vec<u64> = users.iter().map(|u| u.id).collect();
            prop_assert_eq!(seen, expected);
        }
    }

    #[test]
    fn percentage_matches_attending_share(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let recs = compute_recommendations(&event(duration), &slots, &group_by_user(&availability), &users);

        for rec in &recs {
            prop_assert!(!rec.attending.is_empty());
            let expected = 100.0 * rec.attending.len() as f64 / users.len() as f64;
            prop_assert!((rec.attendance_percentage - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn results_sorted_by_percentage(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let recs = compute_recommendations(&event(duration), &slots, &group_by_user(&availability), &users);

        for pair in recs.windows(2) {
            prop_assert!(pair[0].attendance_percentage >= pair[1].attendance_percentage);
        }
    }

    #[test]
    fn start_options_fit_inside_slot_and_seat_everyone_attending(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let recs = compute_recommendations(&event(duration), &slots, &group_by_user(&availability), &users);
        let meeting = Duration::minutes(duration);

        for rec in &recs {
            prop_assert!(!rec.start_options.is_empty());
            for start in &rec.start_options {
                prop_assert!(*start >= rec.time_slot.start_time);
                prop_assert!(*start + meeting <= rec.time_slot.end_time);
            }
            // The reported attendees fit the first option.
            let first = rec.start_options[0];
            for user in &rec.attending {
                let fits = availability.iter().any(|a| {
                    a.user_id == user.id && a.start_time <= first && first + meeting <= a.end_time
                });
                prop_assert!(fits, "user {} does not fit {}", user.id, first);
            }
        }
    }

    #[test]
    fn computation_is_idempotent(
        slots in arb_slots(),
        availability in arb_availability(),
        duration in arb_duration(),
    ) {
        let users = users_of(&availability);
        let by_user = group_by_user(&availability);
        let first = compute_recommendations(&event(duration), &slots, &by_user, &users);
        let second = compute_recommendations(&event(duration), &slots, &by_user, &users);
        prop_assert_eq!(first, second);
    }
}
