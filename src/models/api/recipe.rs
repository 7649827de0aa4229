use crate::error::Result;
use crate::scaling::RecipeViewState;

/// Complete recipe with all ingredients for display and scaling
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub base_servings: u32,
    pub calories: Option<u32>,
    pub health_grade: Option<String>,
    pub video_url: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub nutrition: Option<Nutrition>,
    pub created_at: String,
}

/// A single ingredient within a recipe, with its amount for `base_servings`
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    /// Unique within the owning recipe
    pub id: String,
    pub name: String,
    pub base_amount: f64,
    pub unit: String,
    pub has_in_pantry: bool,
}

/// Nutrition facts for a single serving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// One row of the saved-recipes list
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub ingredient_count: i64,
    pub base_servings: u32,
    pub calories: Option<u32>,
}

impl RecipeIngredient {
    pub fn new(id: &str, name: &str, base_amount: f64, unit: &str, has_in_pantry: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            base_amount,
            unit: unit.to_string(),
            has_in_pantry,
        }
    }
}

impl Recipe {
    /// Format the recipe as a human-readable string for the given view state
    pub fn render(&self, state: &RecipeViewState) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Recipe: {}\n", self.title));
        if let Some(calories) = self.calories {
            output.push_str(&format!("{} kcal", calories));
            if let Some(grade) = &self.health_grade {
                output.push_str(&format!(" • Health Grade: {}", grade));
            }
            output.push('\n');
        }
        output.push_str(&format!("Servings: {}\n", state.servings()));
        output.push_str("\nIngredients:\n");

        for row in state.scaled_rows(self)? {
            let mark = if row.selected { "x" } else { " " };
            output.push_str(&format!("  [{}] {} {}\n", mark, row.name, row.quantity));
        }

        if !self.instructions.is_empty() {
            output.push_str("\nInstructions:\n");
            for (i, step) in self.instructions.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, step));
            }
        }

        Ok(output)
    }
}
