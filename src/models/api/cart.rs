/// A purchasable product suggested for a cart ingredient
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: String,
    pub weight: String,
    pub rating: f32,
    pub reviews: u32,
    pub image_url: Option<String>,
}

/// Each recommendation class carries its own product
#[derive(Debug, Clone, PartialEq)]
pub enum ProductRecommendation {
    Best(Product),
    Budget(Product),
}

impl ProductRecommendation {
    pub fn product(&self) -> &Product {
        match self {
            ProductRecommendation::Best(product) | ProductRecommendation::Budget(product) => {
                product
            }
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            ProductRecommendation::Best(_) => "BEST MATCH",
            ProductRecommendation::Budget(_) => "Budget Friendly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CartIngredient {
    pub name: String,
    /// Already scaled and formatted, e.g. "100 g"
    pub amount: String,
    pub recommendations: Vec<ProductRecommendation>,
}

/// One recipe's worth of ingredients in the shopping cart
#[derive(Debug, Clone, PartialEq)]
pub struct CartRecipe {
    pub id: String,
    pub name: String,
    pub servings: u32,
    pub expanded: bool,
    pub ingredients: Vec<CartIngredient>,
}

impl CartRecipe {
    /// Format the entry as a shopping list, one ingredient per line
    pub fn to_shopping_list(&self) -> String {
        let mut output = format!("{} ({}인분)\n", self.name, self.servings);

        for ingredient in &self.ingredients {
            output.push_str(&format!("  - {}: {}\n", ingredient.name, ingredient.amount));
            for recommendation in &ingredient.recommendations {
                let product = recommendation.product();
                output.push_str(&format!(
                    "      [{}] {} {} ({})\n",
                    recommendation.badge(),
                    product.name,
                    product.price,
                    product.weight
                ));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrot(id: &str, name: &str, price: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: price.to_string(),
            weight: "500g".to_string(),
            rating: 4.5,
            reviews: 100,
            image_url: None,
        }
    }

    #[test]
    fn test_recommendation_badges() {
        let best = ProductRecommendation::Best(carrot("p1", "Premium 당근", "₩2,890"));
        let budget = ProductRecommendation::Budget(carrot("p2", "Value 당근", "₩1,950"));

        assert_eq!(best.badge(), "BEST MATCH");
        assert_eq!(budget.badge(), "Budget Friendly");
        assert_eq!(budget.product().name, "Value 당근");
    }

    #[test]
    fn test_cart_recipe_to_shopping_list() {
        let entry = CartRecipe {
            id: "1".to_string(),
            name: "비빔밥 (Bibimbap)".to_string(),
            servings: 4,
            expanded: false,
            ingredients: vec![
                CartIngredient {
                    name: "당근".to_string(),
                    amount: "100 g".to_string(),
                    recommendations: vec![ProductRecommendation::Best(carrot(
                        "p1",
                        "Premium 당근",
                        "₩2,890",
                    ))],
                },
                CartIngredient {
                    name: "시금치".to_string(),
                    amount: "150 g".to_string(),
                    recommendations: vec![],
                },
            ],
        };

        let output = entry.to_shopping_list();

        assert!(output.starts_with("비빔밥 (Bibimbap) (4인분)"));
        assert!(output.contains("  - 당근: 100 g"));
        assert!(output.contains("[BEST MATCH] Premium 당근 ₩2,890 (500g)"));
        assert!(output.contains("  - 시금치: 150 g"));
    }
}
