use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use yorigo::cart::{Cart, ProductCatalog};
use yorigo::controllers::{
    create_recipe, delete_recipe, get_recipe, get_video, list_recipes, save_video,
};
use yorigo::error::YorigoError;
use yorigo::models::api::{CartRecipe, Nutrition, Product, Recipe, RecipeIngredient};
use yorigo::scaling::RecipeViewState;
use yorigo::video::{FetchError, VideoMetadataSource, resolve_video};

async fn setup() -> SqlitePool {
    // Create an in-memory database with migrations
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn japchae() -> Recipe {
    Recipe {
        id: 0,
        title: "잡채".to_string(),
        base_servings: 4,
        calories: Some(280),
        health_grade: Some("B".to_string()),
        video_url: None,
        ingredients: vec![
            RecipeIngredient::new("1", "당면", 200.0, "g", false),
            RecipeIngredient::new("2", "시금치", 150.0, "g", false),
            RecipeIngredient::new("3", "참기름", 2.0, "큰술", true),
            RecipeIngredient::new("4", "계란", 1.0, "개", true),
        ],
        instructions: vec![
            "당면을 삶아 찬물에 헹군다".to_string(),
            "채소를 볶는다".to_string(),
            "모든 재료를 참기름과 함께 버무린다".to_string(),
        ],
        nutrition: Some(Nutrition {
            calories: 280.0,
            protein_g: 6.0,
            carbs_g: 45.0,
            fat_g: 9.0,
        }),
        created_at: String::new(),
    }
}

#[tokio::test]
async fn test_create_get_and_scale_recipe() {
    let pool = setup().await;

    let recipe_id = create_recipe(&pool, &japchae())
        .await
        .expect("Failed to create recipe");
    let recipe = get_recipe(&pool, recipe_id)
        .await
        .expect("Failed to get recipe");

    assert_eq!(recipe.title, "잡채");
    assert_eq!(recipe.base_servings, 4);
    assert_eq!(recipe.ingredients.len(), 4);
    assert_eq!(recipe.instructions.len(), 3);
    assert_eq!(recipe.nutrition.map(|n| n.protein_g), Some(6.0));

    // Pantry items start selected
    let state = RecipeViewState::new(&recipe);
    let rows = state.scaled_rows(&recipe).expect("Failed to scale rows");
    let selected: Vec<&str> = rows
        .iter()
        .filter(|row| row.selected)
        .map(|row| row.name.as_str())
        .collect();
    assert_eq!(selected, vec!["참기름", "계란"]);

    // Halve the recipe, pick up the noodles and drop the egg
    let state = state.with_servings(2).toggle("1").toggle("4");
    let rows = state.scaled_rows(&recipe).expect("Failed to scale rows");
    let quantities: Vec<&str> = rows.iter().map(|row| row.quantity.as_str()).collect();
    assert_eq!(quantities, vec!["100 g", "75 g", "1 큰술", "0.5 개"]);
    assert!(rows[0].selected);
    assert!(!rows[1].selected);
    assert!(!rows[3].selected);
}

#[tokio::test]
async fn test_scaled_recipe_into_cart() {
    let pool = setup().await;

    let recipe_id = create_recipe(&pool, &japchae())
        .await
        .expect("Failed to create recipe");
    let recipe = get_recipe(&pool, recipe_id)
        .await
        .expect("Failed to get recipe");

    let state = RecipeViewState::new(&recipe).increment().increment();
    let catalog = ProductCatalog::new().with_product(
        "참기름",
        Product {
            id: "oil-1".to_string(),
            name: "국산 참기름".to_string(),
            price: "₩8,900".to_string(),
            weight: "300ml".to_string(),
            rating: 4.6,
            reviews: 120,
            image_url: None,
        },
    );
    let entry =
        CartRecipe::from_view(&recipe, &state, &catalog).expect("Failed to build cart entry");
    let cart = Cart::new().add(entry);

    let entry = cart
        .get(&recipe_id.to_string())
        .expect("Recipe should be in the cart");
    assert_eq!(entry.servings, 6);
    let amounts: Vec<&str> = entry.ingredients.iter().map(|i| i.amount.as_str()).collect();
    assert_eq!(amounts, vec!["3 큰술", "1.5 개"]);
    let shopping_list = entry.to_shopping_list();
    assert!(shopping_list.starts_with("잡채 (6인분)"));
    assert!(shopping_list.contains("[BEST MATCH] 국산 참기름 ₩8,900 (300ml)"));
    assert!(entry.ingredients[1].recommendations.is_empty());
}

#[tokio::test]
async fn test_list_and_delete_recipes() {
    let pool = setup().await;

    let first = create_recipe(&pool, &japchae())
        .await
        .expect("Failed to create first recipe");
    let second = create_recipe(
        &pool,
        &Recipe {
            title: "시금치 나물".to_string(),
            ingredients: vec![
                RecipeIngredient::new("1", "시금치", 300.0, "g", false),
                RecipeIngredient::new("2", "참기름", 1.0, "큰술", true),
            ],
            ..japchae()
        },
    )
    .await
    .expect("Failed to create second recipe");

    let summaries = list_recipes(&pool).await.expect("Failed to list recipes");
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].ingredient_count, 4);
    assert_eq!(summaries[1].ingredient_count, 2);

    delete_recipe(&pool, first)
        .await
        .expect("Failed to delete recipe");

    let summaries = list_recipes(&pool).await.expect("Failed to list recipes");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].id, second);
    assert!(matches!(
        get_recipe(&pool, first).await,
        Err(YorigoError::RecipeNotFound(_))
    ));

    // Shared ingredients survive the delete
    let remaining = get_recipe(&pool, second)
        .await
        .expect("Failed to get remaining recipe");
    assert_eq!(remaining.ingredients[1].name, "참기름");
}

struct OfflineSource;

impl VideoMetadataSource for OfflineSource {
    async fn fetch(&self, _url: &str) -> Result<yorigo::models::api::VideoMetadata, FetchError> {
        Err(FetchError::Unavailable("offline".to_string()))
    }
}

#[tokio::test]
async fn test_offline_video_is_saved_with_fallback() {
    let pool = setup().await;
    let url = "https://youtu.be/dQw4w9WgXcQ";

    let video = resolve_video(&OfflineSource, url)
        .await
        .expect("Fallback should always resolve");
    let row_id = save_video(&pool, &video, url)
        .await
        .expect("Failed to save video");

    let stored = get_video(&pool, "dQw4w9WgXcQ")
        .await
        .expect("Failed to get video")
        .expect("Video should be stored");

    assert!(row_id > 0);
    assert_eq!(stored.title, "Recipe Video dQw4w9Wg");
    assert_eq!(stored.channel_title, "Demo Channel");
    assert_eq!(stored, video);
}
