//! `get_recommendations(event_id)` over a [`SchedulingStore`].
//!
//! Fetches the event, its slots, its availability and the users behind that
//! availability, groups the availability by user once, and hands everything to
//! the engine. Store failures are returned unchanged and never retried.

use tracing::{info, instrument};

use crate::error::Result;
use crate::model::{EventId, Recommendation};
use crate::recommend::{self, RecommendConfig};
use crate::store::SchedulingStore;

pub struct RecommendationService<S> {
    store: S,
    config: RecommendConfig,
}

impl<S: SchedulingStore> RecommendationService<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, RecommendConfig::default())
    }

    pub fn with_config(store: S, config: RecommendConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ranked recommendations for an event.
    ///
    /// # Errors
    /// Returns `SchedulerError::NotFound` if the event does not exist, or any
    /// error the store reports while fetching.
    #[instrument(skip(self), fields(step_minutes = self.config.step_minutes()))]
    pub fn get_recommendations(&self, event_id: EventId) -> Result<Vec<Recommendation>> {
        let event = self.store.find_event(event_id)?;
        let slots = self.store.find_time_slots(event_id)?;
        let availability = self.store.find_availability(event_id)?;
        let users = self.store.find_users_with_availability(event_id)?;

        let by_user = recommend::group_by_user(&availability);
        let recommendations =
            recommend::compute_recommendations_with(&self.config, &event, &slots, &by_user, &users);

        info!(
            event_id,
            slots = slots.len(),
            users = users.len(),
            recommendations = recommendations.len(),
            "recommendations ready"
        );

        Ok(recommendations)
    }
}
