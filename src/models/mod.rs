mod ingredient;
mod recipe;
mod recipe_ingredient;
mod seed;
mod video;

pub mod api;

#[cfg(test)]
pub mod test_fixtures;

pub use ingredient::IngredientRecord;
pub use recipe::RecipeRecord;
pub use recipe_ingredient::RecipeIngredientRecord;
pub use seed::{demo_products, demo_recipes};
pub use video::VideoRecord;
