use std::collections::BTreeSet;

use thiserror::Error;
use tracing::debug;

use crate::catalog::Catalog;

use super::store::{DayKey, ProgressStore};

/// The two synchronous rejection signals the presentation layer can see.
/// Everything else is recovered internally.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActivityError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("the day is already fully completed and stays locked until midnight")]
    Locked,
}

/// Validated mutation entry points for the progress store. All writes go
/// through here so the derived `yoga` flag is recomputed on every change.
pub struct ActivityLogger {
    class_ids: BTreeSet<u32>,
}

impl ActivityLogger {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            class_ids: catalog.classes().iter().map(|c| c.id).collect(),
        }
    }

    /// One-way completion. Returns whether the record actually changed, so
    /// repeated calls stay no-ops all the way down to the sync layer.
    pub fn set_diet_completed(&self, store: &mut ProgressStore, key: &DayKey) -> bool {
        let record = store.day_mut(key);
        if record.diet {
            return false;
        }
        record.diet = true;
        debug!("Diet completed for {key}");
        true
    }

    /// Adds walked minutes to the day's total.
    pub fn add_walking_minutes(
        &self,
        store: &mut ProgressStore,
        key: &DayKey,
        minutes: u32,
    ) -> Result<(), ActivityError> {
        if minutes == 0 {
            return Err(ActivityError::InvalidInput(
                "walked minutes must be positive".into(),
            ));
        }
        let record = store.day_mut(key);
        record.walking_minutes += minutes;
        debug!("Walking total for {key} is now {}", record.walking_minutes);
        Ok(())
    }

    /// Flips completion of a single class and re-derives the day's `yoga`
    /// flag. A day whose flag is already true is sealed and rejects the
    /// toggle, so completion can only be reversed by waiting for rollover.
    pub fn toggle_yoga_class(
        &self,
        store: &mut ProgressStore,
        key: &DayKey,
        class_id: u32,
    ) -> Result<(), ActivityError> {
        if !self.class_ids.contains(&class_id) {
            return Err(ActivityError::InvalidInput(format!(
                "unknown class id {class_id}"
            )));
        }
        if store.day(key).is_some_and(|record| record.yoga) {
            return Err(ActivityError::Locked);
        }

        let record = store.day_mut(key);
        if !record.completed_yoga_classes.remove(&class_id) {
            record.completed_yoga_classes.insert(class_id);
        }
        record.recompute_yoga(self.class_ids.len());
        debug!(
            "Toggled class {class_id} for {key}, {}/{} completed",
            record.completed_yoga_classes.len(),
            self.class_ids.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;

    fn setup() -> (ActivityLogger, ProgressStore, DayKey) {
        (
            ActivityLogger::new(catalog()),
            ProgressStore::default(),
            "2024-03-05".parse().unwrap(),
        )
    }

    #[test]
    fn walking_minutes_accumulate() {
        let (logger, mut store, key) = setup();
        for minutes in [10, 10, 10] {
            logger.add_walking_minutes(&mut store, &key, minutes).unwrap();
        }
        assert_eq!(store.day(&key).unwrap().walking_minutes, 30);
    }

    #[test]
    fn zero_minutes_are_rejected_without_state_change() {
        let (logger, mut store, key) = setup();
        let result = logger.add_walking_minutes(&mut store, &key, 0);
        assert!(matches!(result, Err(ActivityError::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn diet_completion_is_idempotent() {
        let (logger, mut store, key) = setup();
        assert!(logger.set_diet_completed(&mut store, &key));
        let after_first = store.clone();
        assert!(!logger.set_diet_completed(&mut store, &key));
        assert_eq!(store, after_first);
    }

    #[test]
    fn toggle_is_an_involution_while_unsealed() {
        let (logger, mut store, key) = setup();
        logger.toggle_yoga_class(&mut store, &key, 2).unwrap();
        let before = store.day(&key).unwrap().clone();

        logger.toggle_yoga_class(&mut store, &key, 4).unwrap();
        logger.toggle_yoga_class(&mut store, &key, 4).unwrap();

        assert_eq!(store.day(&key).unwrap(), &before);
    }

    #[test]
    fn unchecking_the_last_class_keeps_yoga_false() {
        let (logger, mut store, key) = setup();
        logger.toggle_yoga_class(&mut store, &key, 1).unwrap();
        logger.toggle_yoga_class(&mut store, &key, 1).unwrap();
        let record = store.day(&key).unwrap();
        assert!(!record.yoga);
        assert!(record.completed_yoga_classes.is_empty());
    }

    #[test]
    fn completing_all_classes_seals_the_day() {
        let (logger, mut store, key) = setup();
        for id in 1..=5 {
            logger.toggle_yoga_class(&mut store, &key, id).unwrap();
        }
        assert!(store.day(&key).unwrap().yoga);

        let sealed = store.day(&key).unwrap().clone();
        let result = logger.toggle_yoga_class(&mut store, &key, 1);
        assert_eq!(result, Err(ActivityError::Locked));
        assert_eq!(store.day(&key).unwrap(), &sealed);
        assert_eq!(
            sealed.completed_yoga_classes,
            BTreeSet::from([1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn unknown_class_id_is_rejected() {
        let (logger, mut store, key) = setup();
        let result = logger.toggle_yoga_class(&mut store, &key, 42);
        assert!(matches!(result, Err(ActivityError::InvalidInput(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn days_are_independent() {
        let (logger, mut store, key) = setup();
        let other: DayKey = "2024-03-06".parse().unwrap();
        logger.add_walking_minutes(&mut store, &key, 15).unwrap();
        logger.add_walking_minutes(&mut store, &other, 5).unwrap();
        assert_eq!(store.day(&key).unwrap().walking_minutes, 15);
        assert_eq!(store.day(&other).unwrap().walking_minutes, 5);
    }
}
