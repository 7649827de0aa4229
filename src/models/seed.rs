use super::api::{Nutrition, Product, Recipe, RecipeIngredient};
use crate::cart::ProductCatalog;

/// Recipes loaded into an empty store so the viewer has something to show
pub fn demo_recipes() -> Vec<Recipe> {
    vec![kimchi_jjigae(), bulgogi()]
}

pub fn kimchi_jjigae() -> Recipe {
    Recipe {
        id: 0,
        title: "김치찌개 (Kimchi Jjigae)".to_string(),
        base_servings: 2,
        calories: Some(320),
        health_grade: Some("A".to_string()),
        video_url: None,
        ingredients: vec![
            RecipeIngredient::new("1", "김치", 200.0, "g", false),
            RecipeIngredient::new("2", "돼지고기", 150.0, "g", false),
            RecipeIngredient::new("3", "두부", 1.0, "모", false),
            RecipeIngredient::new("4", "대파", 1.0, "대", false),
            RecipeIngredient::new("5", "고추가루", 1.0, "큰술", true),
            RecipeIngredient::new("6", "간장", 1.0, "큰술", true),
            RecipeIngredient::new("7", "다진 마늘", 1.0, "큰술", true),
        ],
        instructions: vec![
            "냄비에 김치 200g과 돼지고기 150g을 넣고 중불에서 볶습니다.".to_string(),
            "물 2컵을 붓고 끓입니다.".to_string(),
            "두부 1모를 넣고 5분간 더 끓입니다.".to_string(),
            "대파, 고추가루, 간장, 다진 마늘을 넣고 간을 맞춥니다.".to_string(),
            "2-3분 더 끓인 후 불을 끕니다.".to_string(),
        ],
        nutrition: Some(Nutrition {
            calories: 320.0,
            protein_g: 25.0,
            carbs_g: 15.0,
            fat_g: 18.0,
        }),
        created_at: String::new(),
    }
}

fn bulgogi() -> Recipe {
    Recipe {
        id: 0,
        title: "불고기 (Bulgogi)".to_string(),
        base_servings: 2,
        calories: Some(450),
        health_grade: Some("B".to_string()),
        video_url: None,
        ingredients: vec![
            RecipeIngredient::new("1", "소고기 불고기용", 300.0, "g", false),
            RecipeIngredient::new("2", "양파", 0.5, "개", false),
            RecipeIngredient::new("3", "간장", 3.0, "큰술", true),
            RecipeIngredient::new("4", "설탕", 1.5, "큰술", true),
            RecipeIngredient::new("5", "참기름", 1.0, "큰술", true),
        ],
        instructions: vec![
            "소고기에 간장, 설탕, 참기름을 넣고 30분간 재웁니다.".to_string(),
            "팬에 양파와 고기를 넣고 센불에서 볶습니다.".to_string(),
        ],
        nutrition: None,
        created_at: String::new(),
    }
}

const CARROT_IMAGE: &str = "https://images.unsplash.com/photo-1598170845058-32b9d6a5da37?w=200&q=80";
const SPINACH_IMAGE: &str = "https://images.unsplash.com/photo-1576045057995-568f588f82fb?w=200&q=80";

/// (ingredient, id, name, price, weight, rating, reviews, image)
type ShelfRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f32,
    u32,
    Option<&'static str>,
);

const SHELF: &[ShelfRow] = &[
    ("당근", "carrot-premium", "Premium 당근", "₩2,890", "500g", 4.7, 523, Some(CARROT_IMAGE)),
    ("당근", "carrot-value", "Value 당근", "₩1,950", "500g", 4.2, 187, Some(CARROT_IMAGE)),
    ("시금치", "spinach-premium", "Premium 시금치", "₩3,200", "300g", 4.6, 412, Some(SPINACH_IMAGE)),
    ("시금치", "spinach-value", "Value 시금치", "₩2,100", "300g", 4.1, 156, Some(SPINACH_IMAGE)),
    ("김치", "kimchi-premium", "Premium 포기김치", "₩12,900", "1kg", 4.8, 1024, None),
    ("김치", "kimchi-value", "Value 썰은김치", "₩7,480", "1kg", 4.3, 386, None),
    ("돼지고기", "pork-premium", "Premium 한돈 앞다리", "₩9,900", "500g", 4.6, 640, None),
    ("돼지고기", "pork-value", "Value 수입 돼지고기", "₩6,200", "500g", 4.0, 211, None),
    ("두부", "tofu-premium", "Premium 국산콩 두부", "₩2,500", "300g", 4.7, 802, None),
];

/// Store shelf used by the viewer for cart product picks
pub fn demo_products() -> ProductCatalog {
    SHELF.iter().fold(
        ProductCatalog::new(),
        |catalog, &(ingredient, id, name, price, weight, rating, reviews, image_url)| {
            catalog.with_product(
                ingredient,
                Product {
                    id: id.to_string(),
                    name: name.to_string(),
                    price: price.to_string(),
                    weight: weight.to_string(),
                    rating,
                    reviews,
                    image_url: image_url.map(str::to_string),
                },
            )
        },
    )
}
