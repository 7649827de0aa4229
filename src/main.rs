use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use yorigo::{
    config::Config,
    controllers::{create_recipe, delete_recipe, get_recipe, list_recipes, save_video},
    database,
    models::demo_recipes,
    nutrition::estimate_nutrition,
    recommend::{AgentParams, Feedback, PersonalizedAgents, UserPreferences, state_key},
    scaling::RecipeViewState,
    video::{MetadataDir, resolve_video},
};

#[derive(Parser)]
#[command(name = "yorigo", about = "Manage the local recipe store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create the database and load demo recipes into an empty store
    Setup,
    /// List saved recipes
    List,
    /// Print a recipe scaled to a serving count
    Show {
        id: i64,
        #[arg(short, long)]
        servings: Option<u32>,
    },
    /// Estimate nutrition per serving from the ingredient list
    Nutrition { id: i64 },
    /// Delete a saved recipe
    Delete { id: i64 },
    /// Suggest a recipe to cook next
    Recommend {
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Tell the recommender how a suggestion went
    Feedback {
        recipe_id: i64,
        #[arg(value_enum)]
        outcome: Outcome,
        #[arg(long, default_value = "local")]
        user: String,
    },
    /// Resolve a video link and save it
    ImportVideo {
        url: String,
        /// Directory of `<video_id>.json` metadata responses
        #[arg(long, default_value = "video-metadata")]
        metadata_dir: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Outcome {
    Positive,
    Negative,
    Timeout,
}

impl From<Outcome> for Feedback {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Positive => Feedback::Positive,
            Outcome::Negative => Feedback::Negative,
            Outcome::Timeout => Feedback::Timeout,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let pool = database::connect(&config).await?;

    match cli.command.unwrap_or(Command::Setup) {
        Command::Setup => {
            if list_recipes(&pool).await?.is_empty() {
                for recipe in demo_recipes() {
                    create_recipe(&pool, &recipe).await?;
                }
                info!("Loaded demo recipes");
            }
            println!("Database setup complete!");
        }
        Command::List => {
            for summary in list_recipes(&pool).await? {
                let calories = summary
                    .calories
                    .map(|c| format!(" • {} kcal", c))
                    .unwrap_or_default();
                println!(
                    "{:>4}  {}  (재료 {}가지 • {}인분{})",
                    summary.id,
                    summary.title,
                    summary.ingredient_count,
                    summary.base_servings,
                    calories
                );
            }
        }
        Command::Show { id, servings } => {
            let recipe = get_recipe(&pool, id).await?;
            let mut state = RecipeViewState::new(&recipe);
            if let Some(servings) = servings {
                state = state.with_servings(servings);
            }
            print!("{}", recipe.render(&state)?);
        }
        Command::Nutrition { id } => {
            let recipe = get_recipe(&pool, id).await?;
            let estimate = estimate_nutrition(&recipe.ingredients, recipe.base_servings);
            println!("Per serving for {}:", recipe.title);
            println!("  {} kcal", estimate.kcal);
            println!(
                "  protein {}g • fat {}g • carbs {}g",
                estimate.protein_g, estimate.fat_g, estimate.carbs_g
            );
            println!("  sodium {}mg", estimate.sodium_mg);
            for assumption in &estimate.assumptions {
                println!("  - {}", assumption);
            }
        }
        Command::Recommend { user } => {
            let recipes = list_recipes(&pool).await?;
            let ids: Vec<String> = recipes.iter().map(|r| r.id.to_string()).collect();
            // Suggestions from the command line start from an empty cart
            let state = state_key(Vec::<&str>::new(), &UserPreferences::default(), ids.len());

            let mut agents = PersonalizedAgents::new(AgentParams::default(), &config.agent_dir);
            let pick = agents
                .select_action_for_user(&user, &state, &ids, true, &mut rand::thread_rng())
                .await?;

            match pick.and_then(|id| recipes.iter().find(|r| r.id.to_string() == id)) {
                Some(recipe) => println!("Try {} ({})", recipe.title, recipe.id),
                None => println!("No recipes to recommend yet."),
            }
            let agent = agents.agent_for(&user).await?;
            for (id, probability) in agent.policy(&state, &ids) {
                println!("  {:>4}  {:.3}", id, probability);
            }
            println!("{}", serde_json::to_string_pretty(&agent.statistics())?);
        }
        Command::Feedback {
            recipe_id,
            outcome,
            user,
        } => {
            let count = list_recipes(&pool).await?.len();
            let state = state_key(Vec::<&str>::new(), &UserPreferences::default(), count);

            let mut agents = PersonalizedAgents::new(AgentParams::default(), &config.agent_dir);
            let q = agents
                .learn_from_feedback_for_user(
                    &user,
                    &state,
                    &recipe_id.to_string(),
                    outcome.into(),
                    None::<(&str, &[String])>,
                )
                .await?;
            println!("Recipe {} now scores {:.3} for {}", recipe_id, q, user);
        }
        Command::Delete { id } => {
            delete_recipe(&pool, id).await?;
            println!("Deleted recipe {}", id);
        }
        Command::ImportVideo { url, metadata_dir } => {
            let video = resolve_video(&MetadataDir::new(metadata_dir), &url).await?;
            let id = save_video(&pool, &video, url.trim()).await?;
            println!("Saved video {} ({}) as {}", video.title, video.video_id, id);
            println!("{}", serde_json::to_string_pretty(&video.save_payload(url.trim()))?);
        }
    }

    Ok(())
}
