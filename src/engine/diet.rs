use chrono::Datelike;
use rand::{rngs::StdRng, seq::IndexedRandom, Rng, SeedableRng};
use tracing::debug;

use crate::catalog::{Catalog, MealCategory, Recipe};

use super::store::DayKey;

/// How the daily meal plan is generated. `PerSession` mirrors the historical
/// behavior: the plan is rerolled from scratch on every engine start, so two
/// sessions on the same day can disagree. `SeededByDay` derives the rng seed
/// from the day key so the plan is stable for the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    PerSession,
    SeededByDay,
}

/// One recipe per meal category, valid for a single day key. Never persisted,
/// discarded and regenerated on rollover.
#[derive(Debug, Clone)]
pub struct DailySelection {
    choices: Vec<Recipe>,
}

impl DailySelection {
    /// Picks one recipe per category, uniformly at random from its pool.
    pub fn pick(catalog: &Catalog, rng: &mut impl Rng) -> Self {
        let choices = MealCategory::ALL
            .iter()
            .filter_map(|&category| {
                let pool = catalog.recipes_in(category);
                pool.choose(rng).map(|r| (*r).clone())
            })
            .collect();
        Self { choices }
    }

    pub fn for_day(key: &DayKey, catalog: &Catalog, mode: SelectionMode) -> Self {
        match mode {
            SelectionMode::PerSession => Self::pick(catalog, &mut rand::rng()),
            SelectionMode::SeededByDay => {
                Self::pick(catalog, &mut StdRng::seed_from_u64(day_seed(key)))
            }
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.choices
    }

    pub fn recipe_for(&self, category: MealCategory) -> Option<&Recipe> {
        self.choices.iter().find(|r| r.category == category)
    }

    /// Replaces the category's recipe with a uniformly random different one.
    /// A pool with a single recipe has nothing else to offer, so the current
    /// choice stays. Returns whether the selection changed.
    pub fn reroll(
        &mut self,
        category: MealCategory,
        catalog: &Catalog,
        rng: &mut impl Rng,
    ) -> bool {
        let Some(current) = self.choices.iter_mut().find(|r| r.category == category) else {
            return false;
        };
        let pool = catalog
            .recipes_in(category)
            .into_iter()
            .filter(|r| r.name != current.name)
            .collect::<Vec<_>>();
        let Some(next) = pool.choose(rng) else {
            return false;
        };
        debug!("Rerolled {category} from {} to {}", current.name, next.name);
        *current = (*next).clone();
        true
    }
}

fn day_seed(key: &DayKey) -> u64 {
    key.date().num_days_from_ce() as u64
}
