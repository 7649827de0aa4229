use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;
use yorigo::{
    config::Config,
    controllers::{get_recipe, list_recipes},
    database,
    models::demo_products,
    recommend::{AgentParams, PersonalizedAgents, QLearningAgent},
    tui::app::{AppAction, ViewerApp, ViewerContext},
};

#[derive(Parser)]
#[command(name = "recipe_viewer", about = "Browse recipes, scale servings and fill the cart")]
struct Cli {
    /// Open this recipe straight away
    #[arg(long)]
    recipe_id: Option<i64>,

    /// Whose recommendation history to learn from
    #[arg(long, default_value = "local")]
    user: String,
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

    // Load everything up front; the event loop below never touches the database
    let mut recipes = Vec::new();
    for summary in list_recipes(&pool).await? {
        recipes.push(get_recipe(&pool, summary.id).await?);
    }
    info!("Loaded {} recipes", recipes.len());

    let params = AgentParams::default();
    let agent_path = PersonalizedAgents::new(params, &config.agent_dir).path_for(&cli.user);
    let agent = QLearningAgent::load(&agent_path, params).await?;

    let context = ViewerContext::new(recipes, demo_products(), agent);
    let mut app = match cli.recipe_id {
        Some(id) => ViewerApp::open_at(context, id),
        None => ViewerApp::new(context),
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e);
        }

        match event::read() {
            Ok(Event::Key(key)) => match app.handle_key(key.code) {
                AppAction::Continue => {}
                action @ (AppAction::CheckoutAndExit | AppAction::CancelAndExit) => {
                    break Ok(action);
                }
            },
            Ok(_) => {}
            Err(e) => break Err(e),
        }
    };

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let action = result?;
    let context = app.into_context();
    context.agent.save(&agent_path).await?;
    info!("Saved recommendations for {}", cli.user);

    if matches!(action, AppAction::CheckoutAndExit) {
        if context.cart.is_empty() {
            println!("Cart is empty, nothing to buy.");
        } else {
            println!("Shopping list:\n");
            for entry in context.cart.recipes() {
                println!("{}", entry.to_shopping_list());
            }
        }
    } else {
        println!("Cart discarded.");
    }

    Ok(())
}
