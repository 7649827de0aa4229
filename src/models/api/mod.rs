mod cart;
mod recipe;
mod video;

pub use cart::{CartIngredient, CartRecipe, Product, ProductRecommendation};
pub use recipe::{Nutrition, Recipe, RecipeIngredient, RecipeSummary};
pub use video::VideoMetadata;
