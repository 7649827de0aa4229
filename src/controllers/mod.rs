mod ingredient_controller;
mod recipe_controller;
mod video_controller;

pub use ingredient_controller::{create_ingredient, find_or_create_ingredient, get_all_ingredients};
pub use recipe_controller::{create_recipe, delete_recipe, get_recipe, list_recipes};
pub use video_controller::{get_video, save_video};
