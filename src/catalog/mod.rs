//! Static catalogs consumed by the engine: the ordered yoga class sequence and
//! the recipe pool grouped by meal category. Loaded once, never mutated.

use std::sync::{Arc, LazyLock};

use clap::ValueEnum;

#[derive(Debug, Clone)]
pub struct YogaClass {
    pub id: u32,
    pub title: Arc<str>,
    /// Reference to the class video. Playback is up to the presentation layer.
    pub media_ref: Arc<str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

impl MealCategory {
    /// Daily meal order, also the display order of the plan.
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Breakfast,
        MealCategory::Lunch,
        MealCategory::Snack,
        MealCategory::Dinner,
    ];
}

impl std::fmt::Display for MealCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MealCategory::Breakfast => write!(f, "Breakfast"),
            MealCategory::Lunch => write!(f, "Lunch"),
            MealCategory::Snack => write!(f, "Snack"),
            MealCategory::Dinner => write!(f, "Dinner"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Nutrition {
    pub calories: Arc<str>,
    pub protein: Arc<str>,
    pub carbs: Arc<str>,
    pub fat: Arc<str>,
}

#[derive(Debug, Clone)]
pub struct Recipe {
    pub name: Arc<str>,
    pub category: MealCategory,
    pub ingredients: Vec<Arc<str>>,
    pub instructions: Arc<str>,
    pub nutrition: Nutrition,
}

pub struct Catalog {
    classes: Vec<YogaClass>,
    recipes: Vec<Recipe>,
}

impl Catalog {
    pub fn new(classes: Vec<YogaClass>, recipes: Vec<Recipe>) -> Self {
        Self { classes, recipes }
    }

    pub fn classes(&self) -> &[YogaClass] {
        &self.classes
    }

    pub fn total_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn recipes_in(&self, category: MealCategory) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.category == category)
            .collect()
    }
}

/// The built-in catalog. A future version might load this from a file instead.
pub fn catalog() -> &'static Catalog {
    static CATALOG: LazyLock<Catalog> = LazyLock::new(default_catalog);
    &CATALOG
}

fn class(id: u32, title: &str, media_ref: &str) -> YogaClass {
    YogaClass {
        id,
        title: title.into(),
        media_ref: media_ref.into(),
    }
}

fn recipe(
    name: &str,
    category: MealCategory,
    ingredients: &[&str],
    instructions: &str,
    [calories, protein, carbs, fat]: [&str; 4],
) -> Recipe {
    Recipe {
        name: name.into(),
        category,
        ingredients: ingredients.iter().map(|v| Arc::from(*v)).collect(),
        instructions: instructions.into(),
        nutrition: Nutrition {
            calories: calories.into(),
            protein: protein.into(),
            carbs: carbs.into(),
            fat: fat.into(),
        },
    }
}

fn default_catalog() -> Catalog {
    let classes = vec![
        class(
            1,
            "Class 1: Sun Salutation",
            "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4",
        ),
        class(
            2,
            "Class 2: Balancing Poses",
            "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerEscapes.mp4",
        ),
        class(
            3,
            "Class 3: Spine Flexibility",
            "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerFun.mp4",
        ),
        class(
            4,
            "Class 4: Core Strength",
            "https://storage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4",
        ),
        class(
            5,
            "Class 5: Relaxation and Meditation",
            "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
        ),
    ];

    let recipes = vec![
        recipe(
            "Green Energy Smoothie",
            MealCategory::Breakfast,
            &[
                "1 cup of spinach",
                "1/2 frozen banana",
                "1/2 green apple",
                "1/4 avocado",
                "1 tablespoon of chia seeds",
                "1 cup of coconut water",
            ],
            "Blend all ingredients until creamy. Serve immediately.",
            ["250 kcal", "5g", "30g", "12g"],
        ),
        recipe(
            "Scrambled Eggs with Avocado",
            MealCategory::Breakfast,
            &[
                "2 eggs",
                "1/4 avocado, sliced",
                "1 slice of whole grain bread",
                "Salt and pepper to taste",
            ],
            "Whisk and season the eggs. Cook in a non-stick pan. Serve over the \
             toasted bread with the avocado slices.",
            ["320 kcal", "18g", "20g", "18g"],
        ),
        recipe(
            "Quinoa Salad with Chickpeas",
            MealCategory::Lunch,
            &[
                "1 cup of cooked quinoa",
                "1 can of chickpeas, drained",
                "1 chopped cucumber",
                "1 chopped tomato",
                "1/4 cup of chopped red onion",
                "Fresh parsley to taste",
                "Lemon and olive oil dressing",
            ],
            "Mix all ingredients in a large bowl. Dress with the lemon and olive \
             oil, salt and pepper to taste.",
            ["450 kcal", "15g", "60g", "18g"],
        ),
        recipe(
            "Grilled Chicken with Broccoli",
            MealCategory::Lunch,
            &[
                "150g chicken fillet",
                "1 cup of steamed broccoli",
                "1/2 cup of brown rice",
                "Seasoning to taste (garlic, lemon, herbs)",
            ],
            "Season and grill the chicken. Serve with the broccoli and brown rice.",
            ["480 kcal", "40g", "45g", "15g"],
        ),
        recipe(
            "Nut and Dried Fruit Mix",
            MealCategory::Snack,
            &[
                "1/4 cup of almonds",
                "1/4 cup of walnuts",
                "2 tablespoons of raisins",
                "2 chopped dried apricots",
            ],
            "Mix everything in a small container. Great as a quick nutritious snack.",
            ["300 kcal", "8g", "25g", "20g"],
        ),
        recipe(
            "Greek Yogurt with Berries",
            MealCategory::Snack,
            &[
                "1 cup of plain greek yogurt",
                "1/2 cup of berries (strawberries, blueberries)",
                "1 teaspoon of honey (optional)",
            ],
            "Put the yogurt in a bowl and top with the berries. Add honey if you like.",
            ["220 kcal", "20g", "15g", "10g"],
        ),
        recipe(
            "Lentil Soup with Vegetables",
            MealCategory::Dinner,
            &[
                "1 cup of lentils",
                "1 chopped carrot",
                "1 chopped celery stalk",
                "1/2 chopped onion",
                "2 crushed garlic cloves",
                "4 cups of vegetable broth",
                "1 bay leaf",
            ],
            "Saute the onion and garlic in a large pot. Add the carrot and celery \
             and cook for 5 minutes. Add the lentils, broth and bay leaf. Simmer \
             for 30-40 minutes until the lentils are soft.",
            ["350 kcal", "18g", "50g", "5g"],
        ),
        recipe(
            "Baked Salmon with Asparagus",
            MealCategory::Dinner,
            &[
                "150g salmon fillet",
                "1 bunch of fresh asparagus",
                "Olive oil, salt, pepper and lemon to taste",
            ],
            "Season the salmon and asparagus. Bake in a preheated oven at 200°C \
             for 15-20 minutes.",
            ["400 kcal", "35g", "10g", "25g"],
        ),
    ];

    Catalog::new(classes, recipes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_five_ordered_classes() {
        let catalog = catalog();
        assert_eq!(catalog.total_classes(), 5);
        let ids = catalog.classes().iter().map(|c| c.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn every_category_has_recipes() {
        let catalog = catalog();
        for category in MealCategory::ALL {
            assert!(
                !catalog.recipes_in(category).is_empty(),
                "no recipes for {category}"
            );
        }
    }
}
