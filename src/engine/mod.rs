//! The daily progress tracking and synchronization engine. Owns the canonical
//! progress state, routes every mutation through the validated logger
//! operations and mirrors the store to the remote document after each change.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{
    catalog::{Catalog, MealCategory},
    remote::ProgressStorage,
    utils::percentage::Percentage,
};

pub mod diet;
pub mod goal;
pub mod logger;
pub mod rollover;
pub mod store;

use diet::{DailySelection, SelectionMode};
use goal::{daily_goal_percent, WALKING_GOAL_MINUTES};
use logger::{ActivityError, ActivityLogger};
use store::{DailyRecord, DayKey, ProgressStore};

/// One user session over the progress store. All mutations complete their
/// in-memory effect synchronously, persistence runs as detached tasks.
pub struct TrackerEngine {
    user: Arc<str>,
    catalog: &'static Catalog,
    store: ProgressStore,
    logger: ActivityLogger,
    storage: Arc<dyn ProgressStorage>,
    pending_saves: Vec<JoinHandle<()>>,
    current_key: DayKey,
    selection_mode: SelectionMode,
    diet: DailySelection,
}

impl TrackerEngine {
    /// Starts a session: loads the user's document once and generates the
    /// day's meal selection. A missing document or a failed load degrades to
    /// an empty store, the session itself never fails to start.
    pub async fn start(
        user: Arc<str>,
        storage: Arc<dyn ProgressStorage>,
        catalog: &'static Catalog,
        key: DayKey,
        selection_mode: SelectionMode,
    ) -> Self {
        let store = match storage.load(&user).await {
            Ok(Some(store)) => store,
            Ok(None) => {
                debug!("No remote document for {user} yet");
                ProgressStore::default()
            }
            Err(e) => {
                warn!("Failed to load progress for {user}, starting empty: {e:?}");
                ProgressStore::default()
            }
        };
        let diet = DailySelection::for_day(&key, catalog, selection_mode);

        Self {
            logger: ActivityLogger::new(catalog),
            user,
            catalog,
            store,
            storage,
            pending_saves: Vec::new(),
            current_key: key,
            selection_mode,
            diet,
        }
    }

    pub fn current_key(&self) -> DayKey {
        self.current_key
    }

    /// Read-only snapshot of the progress state.
    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    pub fn catalog(&self) -> &'static Catalog {
        self.catalog
    }

    pub fn diet_selection(&self) -> &DailySelection {
        &self.diet
    }

    pub fn record_for(&self, key: &DayKey) -> DailyRecord {
        self.store.day(key).cloned().unwrap_or_default()
    }

    pub fn daily_goal(&self, key: &DayKey) -> Percentage {
        daily_goal_percent(
            &self.record_for(key),
            self.catalog.total_classes(),
            WALKING_GOAL_MINUTES,
        )
    }

    /// Marks the day's diet as completed. Already completed days stay
    /// untouched and dispatch no save.
    pub fn set_diet_completed(&mut self, key: &DayKey) {
        if self.logger.set_diet_completed(&mut self.store, key) {
            self.dispatch_save();
        }
    }

    pub fn add_walking_minutes(
        &mut self,
        key: &DayKey,
        minutes: u32,
    ) -> Result<(), ActivityError> {
        self.logger
            .add_walking_minutes(&mut self.store, key, minutes)?;
        self.dispatch_save();
        Ok(())
    }

    pub fn toggle_yoga_class(
        &mut self,
        key: &DayKey,
        class_id: u32,
    ) -> Result<(), ActivityError> {
        self.logger
            .toggle_yoga_class(&mut self.store, key, class_id)?;
        self.dispatch_save();
        Ok(())
    }

    /// Rerolls one category of the day's meal plan. The plan is ephemeral so
    /// nothing is persisted.
    pub fn reroll_recipe(&mut self, category: MealCategory) -> bool {
        self.diet.reroll(category, self.catalog, &mut rand::rng())
    }

    /// Swaps the current day key and regenerates the meal selection. The old
    /// day's record stays reachable through its own key.
    pub fn apply_rollover(&mut self, key: DayKey) {
        if key == self.current_key {
            return;
        }
        info!("Session rolled over from {} to {key}", self.current_key);
        self.current_key = key;
        self.diet = DailySelection::for_day(&key, self.catalog, self.selection_mode);
    }

    /// Dispatches a fire-and-forget save of the whole store. The snapshot is
    /// taken at dispatch time, so the most recently dispatched save carries
    /// the most recent state whatever order the tasks finish in.
    fn dispatch_save(&mut self) {
        let snapshot = self.store.clone();
        let storage = self.storage.clone();
        let user = self.user.clone();
        self.pending_saves.push(tokio::spawn(async move {
            if let Err(e) = storage.save(&user, snapshot).await {
                warn!("Failed to sync progress for {user}: {e:?}");
            }
        }));
    }

    /// Awaits in-flight saves. Called before the process exits so a
    /// just-dispatched write isn't dropped; failed saves were already logged
    /// by the tasks themselves.
    pub async fn flush(&mut self) {
        for result in futures::future::join_all(self.pending_saves.drain(..)).await {
            if let Err(e) = result {
                warn!("Sync task panicked: {e:?}");
            }
        }
    }
}
