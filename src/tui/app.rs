use crossterm::event::KeyCode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::Frame;

use super::screens::RecipeList;
use crate::cart::{Cart, ProductCatalog};
use crate::models::api::{CartRecipe, Recipe};
use crate::recommend::{Feedback, QLearningAgent, UserPreferences, state_key};

pub enum AppAction {
    Continue,        // Keep running
    CheckoutAndExit, // Finished - print the cart
    CancelAndExit,   // Esc pressed - discard the cart
}

pub struct ViewerApp {
    state: Box<dyn ViewerState>,
    context: ViewerContext,
}

/// The recipe highlighted on the list and the state it was picked in
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub state: String,
    pub recipe_id: i64,
}

pub struct ViewerContext {
    pub recipes: Vec<Recipe>,
    pub catalog: ProductCatalog,
    pub cart: Cart,
    pub agent: QLearningAgent,
    pub preferences: UserPreferences,
    pub recommendation: Option<Recommendation>,
    pub status: Option<String>,
    pub finished: bool, // Set to true when ready to check out
    rng: StdRng,
}

impl ViewerContext {
    pub fn new(recipes: Vec<Recipe>, catalog: ProductCatalog, agent: QLearningAgent) -> Self {
        let mut context = Self {
            recipes,
            catalog,
            cart: Cart::new(),
            agent,
            preferences: UserPreferences::default(),
            recommendation: None,
            status: None,
            finished: false,
            rng: StdRng::from_entropy(),
        };
        context.recommend();
        context
    }

    fn current_state(&self) -> String {
        state_key(
            self.cart.recipes().flat_map(CartRecipe::ingredient_names),
            &self.preferences,
            self.recipes.len(),
        )
    }

    fn recipe_ids(&self) -> Vec<String> {
        self.recipes.iter().map(|recipe| recipe.id.to_string()).collect()
    }

    /// Pick the recipe to highlight for the current cart
    pub fn recommend(&mut self) {
        let state = self.current_state();
        let ids = self.recipe_ids();
        self.recommendation = self
            .agent
            .select_action(&state, &ids, true, &mut self.rng)
            .and_then(|id| id.parse().ok())
            .map(|recipe_id| Recommendation { state, recipe_id });
    }

    /// Put `entry` in the cart and score the outstanding recommendation against it
    pub fn add_to_cart(&mut self, recipe_id: i64, entry: CartRecipe) {
        self.cart = std::mem::take(&mut self.cart).add(entry);

        if let Some(recommendation) = self.recommendation.take() {
            let feedback = if recommendation.recipe_id == recipe_id {
                Feedback::Positive
            } else {
                Feedback::Negative
            };
            let next_state = self.current_state();
            let ids = self.recipe_ids();
            self.agent.learn_from_feedback(
                &recommendation.state,
                &recommendation.recipe_id.to_string(),
                feedback,
                Some((next_state.as_str(), &ids[..])),
            );
        }
        self.recommend();
    }

    /// Score a recommendation that was never acted on
    pub fn expire_recommendation(&mut self) {
        if let Some(recommendation) = self.recommendation.take() {
            self.agent.learn_from_feedback(
                &recommendation.state,
                &recommendation.recipe_id.to_string(),
                Feedback::Timeout,
                None::<(&str, &[String])>,
            );
        }
    }
}

pub(crate) trait ViewerState {
    fn render(&self, context: &ViewerContext, frame: &mut Frame);
    fn handle_key(
        &mut self,
        key: KeyCode,
        context: &mut ViewerContext,
    ) -> Option<Box<dyn ViewerState>>;
}

impl ViewerApp {
    pub fn new(context: ViewerContext) -> Self {
        Self {
            state: Box::new(RecipeList::new()),
            context,
        }
    }

    /// Start on the detail screen of `recipe_id` when it is among the loaded recipes
    pub fn open_at(context: ViewerContext, recipe_id: i64) -> Self {
        let mut app = Self::new(context);
        if let Some(index) = app.context.recipes.iter().position(|r| r.id == recipe_id) {
            app.state = RecipeList::open(index, &app.context);
        }
        app
    }

    pub fn render(&self, frame: &mut Frame) {
        self.state.render(&self.context, frame);
    }

    pub fn handle_key(&mut self, key: KeyCode) -> AppAction {
        // global exit behavior
        if key == KeyCode::Esc {
            self.context.expire_recommendation();
            return AppAction::CancelAndExit;
        }

        // otherwise let the state handle it
        if let Some(next_state) = self.state.handle_key(key, &mut self.context) {
            self.state = next_state
        }

        if self.context.finished {
            self.context.expire_recommendation();
            AppAction::CheckoutAndExit
        } else {
            AppAction::Continue
        }
    }

    /// Consume the app and return the viewer context
    pub fn into_context(self) -> ViewerContext {
        self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::demo_products;
    use crate::models::test_fixtures::kimchi_jjigae;
    use crate::recommend::AgentParams;
    use rstest::*;

    fn greedy_agent() -> QLearningAgent {
        QLearningAgent::new(AgentParams {
            epsilon: 0.0,
            ..AgentParams::default()
        })
    }

    fn context(kimchi: Recipe) -> ViewerContext {
        ViewerContext::new(
            vec![Recipe { id: 7, ..kimchi }],
            demo_products(),
            greedy_agent(),
        )
    }

    fn two_recipes(kimchi: Recipe) -> ViewerContext {
        let fried_rice = Recipe {
            id: 8,
            title: "김치볶음밥".to_string(),
            ..kimchi.clone()
        };
        ViewerContext::new(
            vec![Recipe { id: 7, ..kimchi }, fried_rice],
            ProductCatalog::new(),
            greedy_agent(),
        )
    }

    fn press(app: &mut ViewerApp, keys: &[KeyCode]) -> AppAction {
        let mut action = AppAction::Continue;
        for key in keys {
            action = app.handle_key(*key);
        }
        action
    }

    fn empty_cart_state(recipe_count: usize) -> String {
        state_key(Vec::<&str>::new(), &UserPreferences::default(), recipe_count)
    }

    #[rstest]
    fn test_escape_cancels(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::new(context(kimchi_jjigae));

        assert!(matches!(
            app.handle_key(KeyCode::Esc),
            AppAction::CancelAndExit
        ));
    }

    #[rstest]
    fn test_add_scaled_recipe_to_cart_and_checkout(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::new(context(kimchi_jjigae));

        let action = press(
            &mut app,
            &[
                KeyCode::Enter,     // open 김치찌개
                KeyCode::Char('+'), // 3 servings
                KeyCode::Char('+'), // 4 servings
                KeyCode::Char(' '), // select 김치
                KeyCode::Char('a'), // add to cart, back to list
                KeyCode::Char('q'), // check out
            ],
        );

        assert!(matches!(action, AppAction::CheckoutAndExit));
        let context = app.into_context();
        let entry = context.cart.get("7").expect("Recipe should be in the cart");
        assert_eq!(entry.servings, 4);
        assert_eq!(entry.ingredients[0].name, "김치");
        assert_eq!(entry.ingredients[0].amount, "400 g");
        assert_eq!(entry.ingredients.len(), 4);

        let badges: Vec<&str> = entry.ingredients[0]
            .recommendations
            .iter()
            .map(|r| r.badge())
            .collect();
        assert_eq!(badges, vec!["BEST MATCH", "Budget Friendly"]);
    }

    #[rstest]
    fn test_open_at_starts_on_detail(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::open_at(context(kimchi_jjigae), 7);

        // '-' only means something on the detail screen
        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('a')]);

        let context = app.into_context();
        assert_eq!(context.cart.get("7").map(|r| r.servings), Some(1));
    }

    #[rstest]
    fn test_cart_screen_remove(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::new(context(kimchi_jjigae));

        press(
            &mut app,
            &[
                KeyCode::Enter,
                KeyCode::Char('a'),
                KeyCode::Char('c'), // open cart
                KeyCode::Enter,     // expand
                KeyCode::Char('d'), // remove
            ],
        );

        assert!(app.into_context().cart.is_empty());
    }

    #[rstest]
    fn test_adding_recommended_recipe_rewards_it(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::new(two_recipes(kimchi_jjigae));
        assert_eq!(
            app.context.recommendation.as_ref().map(|r| r.recipe_id),
            Some(7)
        );

        press(&mut app, &[KeyCode::Enter, KeyCode::Char('a')]);

        let context = app.into_context();
        assert!((context.agent.q_value(&empty_cart_state(2), "7") - 0.1).abs() < 1e-12);
        // a fresh pick for the new cart
        let next = context.recommendation.expect("Should recommend again");
        assert_ne!(next.state, empty_cart_state(2));
    }

    #[rstest]
    fn test_ignored_recommendation_is_penalised(kimchi_jjigae: Recipe) {
        let mut app = ViewerApp::new(two_recipes(kimchi_jjigae));

        let action = press(
            &mut app,
            &[
                KeyCode::Down,      // skip the recommended 김치찌개
                KeyCode::Enter,     // open 김치볶음밥
                KeyCode::Char('a'), // add it
                KeyCode::Char('q'), // check out without taking the next pick
            ],
        );

        assert!(matches!(action, AppAction::CheckoutAndExit));
        let context = app.into_context();
        assert!(context.cart.get("8").is_some());
        assert!((context.agent.q_value(&empty_cart_state(2), "7") + 0.05).abs() < 1e-12);

        let cart_state = state_key(
            ["고추가루", "간장", "다진 마늘"],
            &UserPreferences::default(),
            2,
        );
        assert!((context.agent.q_value(&cart_state, "7") + 0.01).abs() < 1e-12);
        assert!(context.recommendation.is_none());
    }
}
