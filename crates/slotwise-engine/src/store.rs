//! Storage seam and an in-memory store.
//!
//! The engine only needs four reads per request, captured by
//! [`SchedulingStore`]. Anything that can answer them (a database, a remote
//! API, a test fixture) can back a [`crate::RecommendationService`].
//!
//! [`InMemoryStore`] is the reference implementation. Besides the reads it
//! offers the create/update/delete operations of the scheduler, validating
//! every record on the way in, and can be loaded from a JSON [`Snapshot`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulerError};
use crate::model::{Availability, AvailabilityId, Event, EventId, SlotId, TimeSlot, User, UserId};
use crate::validate;

/// Page size used by callers that do not pick one.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Read access to the records a recommendation needs.
///
/// Each call is expected to return a point-in-time view; no isolation across
/// the four calls is required.
pub trait SchedulingStore {
    /// Fetch an event, or `NotFound`.
    fn find_event(&self, event_id: EventId) -> Result<Event>;

    /// All candidate slots of an event, possibly empty.
    fn find_time_slots(&self, event_id: EventId) -> Result<Vec<TimeSlot>>;

    /// All availability records submitted for an event, possibly empty.
    fn find_availability(&self, event_id: EventId) -> Result<Vec<Availability>>;

    /// The distinct users with at least one availability record for an event.
    fn find_users_with_availability(&self, event_id: EventId) -> Result<Vec<User>>;
}

impl<S: SchedulingStore + ?Sized> SchedulingStore for &S {
    fn find_event(&self, event_id: EventId) -> Result<Event> {
        (**self).find_event(event_id)
    }

    fn find_time_slots(&self, event_id: EventId) -> Result<Vec<TimeSlot>> {
        (**self).find_time_slots(event_id)
    }

    fn find_availability(&self, event_id: EventId) -> Result<Vec<Availability>> {
        (**self).find_availability(event_id)
    }

    fn find_users_with_availability(&self, event_id: EventId) -> Result<Vec<User>> {
        (**self).find_users_with_availability(event_id)
    }
}

/// Serialized form of a whole store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub time_slots: Vec<TimeSlot>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub availability: Vec<Availability>,
}

/// Rows keyed by id with an auto-increment counter.
#[derive(Debug, Clone)]
struct Table<T> {
    entity: &'static str,
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T> Table<T> {
    fn new(entity: &'static str) -> Self {
        Self {
            entity,
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> Result<u64> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or_else(|| self.exhausted(id))?;
        Ok(id)
    }

    fn insert_with_id(&mut self, id: u64, row: T) -> Result<()> {
        if self.rows.contains_key(&id) {
            return Err(SchedulerError::InvalidInput(format!(
                "duplicate {} id {}",
                self.entity, id
            )));
        }
        let after = id.checked_add(1).ok_or_else(|| self.exhausted(id))?;
        self.rows.insert(id, row);
        self.next_id = self.next_id.max(after);
        Ok(())
    }

    fn exhausted(&self, id: u64) -> SchedulerError {
        SchedulerError::InvalidInput(format!(
            "{} id {} leaves no room for new ids",
            self.entity, id
        ))
    }

    fn get(&self, id: u64) -> Result<&T> {
        self.rows
            .get(&id)
            .ok_or_else(|| SchedulerError::not_found(self.entity, id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut T> {
        let entity = self.entity;
        self.rows
            .get_mut(&id)
            .ok_or_else(|| SchedulerError::not_found(entity, id))
    }

    fn remove(&mut self, id: u64) -> Result<T> {
        self.rows
            .remove(&id)
            .ok_or_else(|| SchedulerError::not_found(self.entity, id))
    }

    fn ensure_exists(&self, id: u64) -> Result<()> {
        self.get(id).map(|_| ())
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// A validating store held entirely in memory. Listings come back in id order.
#[derive(Debug, Clone)]
pub struct InMemoryStore {
    events: Table<Event>,
    time_slots: Table<TimeSlot>,
    users: Table<User>,
    availability: Table<Availability>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            events: Table::new("event"),
            time_slots: Table::new("time slot"),
            users: Table::new("user"),
            availability: Table::new("availability"),
        }
    }

    /// Build a store from a snapshot, keeping the ids it carries.
    ///
    /// Every record is validated; duplicate ids and references to missing
    /// events or users are rejected.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut store = Self::new();

        for event in snapshot.events {
            validate::validate_event(&event)?;
            store.events.insert_with_id(event.id, event)?;
        }
        for user in snapshot.users {
            validate::validate_user(&user)?;
            store.ensure_email_free(&user.email, None)?;
            store.users.insert_with_id(user.id, user)?;
        }
        for slot in snapshot.time_slots {
            validate::validate_time_slot(&slot)?;
            store.events.ensure_exists(slot.event_id)?;
            store.time_slots.insert_with_id(slot.id, slot)?;
        }
        for record in snapshot.availability {
            validate::validate_availability(&record)?;
            store.users.ensure_exists(record.user_id)?;
            store.events.ensure_exists(record.event_id)?;
            store.availability.insert_with_id(record.id, record)?;
        }

        Ok(store)
    }

    /// Parse a JSON snapshot and build a store from it.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Export every record, in id order.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            events: self.events.values().cloned().collect(),
            time_slots: self.time_slots.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            availability: self.availability.values().cloned().collect(),
        }
    }

    // ── Events ──────────────────────────────────────────────────────────────

    /// Store a new event. The incoming `id` is ignored and a fresh one assigned.
    pub fn create_event(&mut self, mut event: Event) -> Result<Event> {
        validate::validate_event(&event)?;
        event.id = self.events.allocate_id()?;
        self.events.insert_with_id(event.id, event.clone())?;
        Ok(event)
    }

    pub fn event(&self, event_id: EventId) -> Result<&Event> {
        self.events.get(event_id)
    }

    /// Events in id order, skipping `offset` and returning at most `limit`.
    pub fn list_events(&self, limit: usize, offset: usize) -> Result<Vec<Event>> {
        if limit == 0 {
            return Err(SchedulerError::InvalidInput(
                "limit must be positive".to_string(),
            ));
        }
        Ok(self.events.values().skip(offset).take(limit).cloned().collect())
    }

    pub fn update_event(&mut self, event_id: EventId, mut event: Event) -> Result<Event> {
        validate::validate_event(&event)?;
        let stored = self.events.get_mut(event_id)?;
        event.id = event_id;
        *stored = event.clone();
        Ok(event)
    }

    /// Remove an event together with its time slots and availability.
    pub fn delete_event(&mut self, event_id: EventId) -> Result<()> {
        self.events.remove(event_id)?;
        self.time_slots.rows.retain(|_, slot| slot.event_id != event_id);
        self.availability.rows.retain(|_, a| a.event_id != event_id);
        Ok(())
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    // ── Time slots ──────────────────────────────────────────────────────────

    pub fn create_time_slot(
        &mut self,
        event_id: EventId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<TimeSlot> {
        self.events.ensure_exists(event_id)?;
        let mut slot = TimeSlot {
            id: 0,
            event_id,
            start_time,
            end_time,
        };
        validate::validate_time_slot(&slot)?;
        slot.id = self.time_slots.allocate_id()?;
        self.time_slots.insert_with_id(slot.id, slot.clone())?;
        Ok(slot)
    }

    pub fn time_slot(&self, slot_id: SlotId) -> Result<&TimeSlot> {
        self.time_slots.get(slot_id)
    }

    pub fn update_time_slot(
        &mut self,
        slot_id: SlotId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<TimeSlot> {
        let stored = self.time_slots.get_mut(slot_id)?;
        let updated = TimeSlot {
            start_time,
            end_time,
            ..stored.clone()
        };
        validate::validate_time_slot(&updated)?;
        *stored = updated.clone();
        Ok(updated)
    }

    pub fn delete_time_slot(&mut self, slot_id: SlotId) -> Result<()> {
        self.time_slots.remove(slot_id).map(|_| ())
    }

    pub fn time_slot_count(&self) -> usize {
        self.time_slots.len()
    }

    // ── Users ───────────────────────────────────────────────────────────────

    /// Store a new user. Emails are unique across the store.
    pub fn create_user(&mut self, mut user: User) -> Result<User> {
        validate::validate_user(&user)?;
        self.ensure_email_free(&user.email, None)?;
        user.id = self.users.allocate_id()?;
        self.users.insert_with_id(user.id, user.clone())?;
        Ok(user)
    }

    pub fn user(&self, user_id: UserId) -> Result<&User> {
        self.users.get(user_id)
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.values().cloned().collect()
    }

    pub fn update_user(&mut self, user_id: UserId, mut user: User) -> Result<User> {
        validate::validate_user(&user)?;
        self.users.ensure_exists(user_id)?;
        self.ensure_email_free(&user.email, Some(user_id))?;
        user.id = user_id;
        *self.users.get_mut(user_id)? = user.clone();
        Ok(user)
    }

    /// Remove a user together with all of their availability.
    pub fn delete_user(&mut self, user_id: UserId) -> Result<()> {
        self.users.remove(user_id)?;
        self.availability.rows.retain(|_, a| a.user_id != user_id);
        Ok(())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn ensure_email_free(&self, email: &str, except: Option<UserId>) -> Result<()> {
        let taken = self
            .users
            .values()
            .any(|u| Some(u.id) != except && u.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(SchedulerError::InvalidInput(format!(
                "email already registered: '{}'",
                email
            )));
        }
        Ok(())
    }

    // ── Availability ────────────────────────────────────────────────────────

    pub fn create_availability(
        &mut self,
        user_id: UserId,
        event_id: EventId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Availability> {
        self.users.ensure_exists(user_id)?;
        self.events.ensure_exists(event_id)?;
        let mut record = Availability {
            id: 0,
            user_id,
            event_id,
            start_time,
            end_time,
        };
        validate::validate_availability(&record)?;
        record.id = self.availability.allocate_id()?;
        self.availability.insert_with_id(record.id, record.clone())?;
        Ok(record)
    }

    /// A single user's availability for one event, in id order.
    pub fn user_availability(&self, user_id: UserId, event_id: EventId) -> Vec<Availability> {
        self.availability
            .values()
            .filter(|a| a.user_id == user_id && a.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn update_availability(
        &mut self,
        availability_id: AvailabilityId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Availability> {
        let stored = self.availability.get_mut(availability_id)?;
        let updated = Availability {
            start_time,
            end_time,
            ..stored.clone()
        };
        validate::validate_availability(&updated)?;
        *stored = updated.clone();
        Ok(updated)
    }

    pub fn delete_availability(&mut self, availability_id: AvailabilityId) -> Result<()> {
        self.availability.remove(availability_id).map(|_| ())
    }

    pub fn availability_count(&self) -> usize {
        self.availability.len()
    }
}

impl SchedulingStore for InMemoryStore {
    fn find_event(&self, event_id: EventId) -> Result<Event> {
        self.events.get(event_id).cloned()
    }

    fn find_time_slots(&self, event_id: EventId) -> Result<Vec<TimeSlot>> {
        Ok(self
            .time_slots
            .values()
            .filter(|slot| slot.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_availability(&self, event_id: EventId) -> Result<Vec<Availability>> {
        Ok(self
            .availability
            .values()
            .filter(|a| a.event_id == event_id)
            .cloned()
            .collect())
    }

    fn find_users_with_availability(&self, event_id: EventId) -> Result<Vec<User>> {
        let user_ids: BTreeSet<UserId> = self
            .availability
            .values()
            .filter(|a| a.event_id == event_id)
            .map(|a| a.user_id)
            .collect();

        Ok(user_ids
            .into_iter()
            .filter_map(|id| self.users.get(id).ok().cloned())
            .collect())
    }
}
