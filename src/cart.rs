//! Shopping cart built from recipes the user wants to cook.

use indexmap::IndexMap;

use crate::error::Result;
use crate::models::api::{CartIngredient, CartRecipe, Product, ProductRecommendation, Recipe};
use crate::scaling::RecipeViewState;

/// Cart entries keyed by recipe id, in the order they were added
///
/// Transitions consume the cart and return the updated one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    recipes: IndexMap<String, CartRecipe>,
}

/// Products on sale, grouped by the ingredient name they stand in for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: IndexMap<String, Vec<Product>>,
}

/// Numeric value of a display price such as "₩2,890"
fn price_value(price: &str) -> Option<u64> {
    let digits: String = price.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product(mut self, ingredient: &str, product: Product) -> Self {
        self.products
            .entry(ingredient.trim().to_string())
            .or_default()
            .push(product);
        self
    }

    /// The best rated product for `ingredient`, plus a cheaper one when there is one
    ///
    /// Ratings tie-break on review count. Products with an unreadable price are
    /// never offered as the budget pick.
    pub fn recommendations_for(&self, ingredient: &str) -> Vec<ProductRecommendation> {
        let Some(candidates) = self.products.get(ingredient.trim()) else {
            return Vec::new();
        };
        let Some(best) = candidates.iter().max_by(|a, b| {
            a.rating
                .total_cmp(&b.rating)
                .then(a.reviews.cmp(&b.reviews))
        }) else {
            return Vec::new();
        };

        let best_price = price_value(&best.price);
        let budget = candidates
            .iter()
            .filter(|product| product.id != best.id)
            .filter_map(|product| price_value(&product.price).map(|price| (price, product)))
            .filter(|(price, _)| best_price.is_none_or(|best_price| *price < best_price))
            .min_by_key(|(price, _)| *price)
            .map(|(_, product)| product);

        let mut recommendations = vec![ProductRecommendation::Best(best.clone())];
        if let Some(product) = budget {
            recommendations.push(ProductRecommendation::Budget(product.clone()));
        }
        recommendations
    }
}

impl CartRecipe {
    /// The ingredients selected in `state`, scaled to its serving count, with
    /// product picks from `catalog`
    pub fn from_view(
        recipe: &Recipe,
        state: &RecipeViewState,
        catalog: &ProductCatalog,
    ) -> Result<Self> {
        let ingredients = state
            .scaled_rows(recipe)?
            .into_iter()
            .filter(|row| row.selected)
            .map(|row| CartIngredient {
                recommendations: catalog.recommendations_for(&row.name),
                name: row.name,
                amount: row.quantity,
            })
            .collect();

        Ok(Self {
            id: recipe.id.to_string(),
            name: recipe.title.clone(),
            servings: state.servings(),
            expanded: false,
            ingredients,
        })
    }

    /// Names of the ingredients in this entry
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|ingredient| ingredient.name.as_str())
    }
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &CartRecipe> {
        self.recipes.values()
    }

    pub fn get(&self, id: &str) -> Option<&CartRecipe> {
        self.recipes.get(id)
    }

    /// Add an entry, replacing any entry for the same recipe in place
    pub fn add(mut self, entry: CartRecipe) -> Self {
        self.recipes.insert(entry.id.clone(), entry);
        self
    }

    pub fn toggle_expanded(mut self, id: &str) -> Self {
        if let Some(entry) = self.recipes.get_mut(id) {
            entry.expanded = !entry.expanded;
        }
        self
    }

    pub fn remove(mut self, id: &str) -> Self {
        self.recipes.shift_remove(id);
        self
    }

    pub fn clear(self) -> Self {
        Self::new()
    }
}
