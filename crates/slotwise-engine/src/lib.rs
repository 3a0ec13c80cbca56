//! # slotwise-engine
//!
//! Ranks candidate meeting slots by how many participants can attend.
//!
//! Each participant declares one or more availability intervals for an event.
//! For every proposed time slot the engine walks the possible start times on a
//! fixed grid, finds the start(s) that seat the most participants, and reports
//! who can and cannot make it. Slots are then ranked by attendance percentage.
//!
//! ## Modules
//!
//! - [`model`] — Events, time slots, users, availability and recommendations
//! - [`interval`] — Inclusive interval containment
//! - [`recommend`] — The recommendation engine (pure, no I/O)
//! - [`validate`] — Record validation applied before data reaches the engine
//! - [`store`] — Storage seam plus an in-memory store loadable from a JSON snapshot
//! - [`service`] — `get_recommendations(event_id)` over any store
//! - [`error`] — Error types

pub mod error;
pub mod interval;
pub mod model;
pub mod recommend;
pub mod service;
pub mod store;
pub mod validate;

pub use error::SchedulerError;
pub use model::{Availability, Event, Recommendation, TimeSlot, User};
pub use recommend::{compute_recommendations, compute_recommendations_with, RecommendConfig};
pub use service::RecommendationService;
pub use store::{InMemoryStore, SchedulingStore, Snapshot};
