//! Q-learning recipe recommender.
//!
//! A state describes what the user is cooking (cart ingredients, taste
//! preferences, how many recipes are on offer); an action is the id of the
//! recipe recommended in that state. Feedback on a recommendation updates its
//! Q-value with the usual one-step rule
//! `Q(s, a) += alpha * (r + gamma * max Q(s', a') - Q(s, a))`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Softmax temperature used by [`QLearningAgent::policy`]
const POLICY_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentParams {
    /// alpha
    pub learning_rate: f64,
    /// gamma
    pub discount_factor: f64,
    /// Starting exploration rate
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub epsilon_min: f64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.95,
            epsilon: 0.1,
            epsilon_decay: 0.995,
            epsilon_min: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// The recommended recipe went into the cart
    Positive,
    /// Another recipe was chosen instead
    Negative,
    /// The session ended without a choice
    Timeout,
}

impl Feedback {
    pub fn reward(self) -> f64 {
        match self {
            Feedback::Positive => 1.0,
            Feedback::Negative => -0.5,
            Feedback::Timeout => -0.1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPreferences {
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cuisine_types: Vec<String>,
    #[serde(default)]
    pub meal_times: Vec<String>,
}

/// Canonical key for a recommendation state
///
/// Ingredient names are trimmed, lowercased and sorted, and tags are sorted, so
/// the same cart in any order maps to the same key.
pub fn state_key<I>(
    cart_ingredients: I,
    preferences: &UserPreferences,
    available_recipes: usize,
) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut ingredients: Vec<String> = cart_ingredients
        .into_iter()
        .map(|name| name.as_ref().trim().to_lowercase())
        .collect();
    ingredients.sort();

    let mut tags = preferences.tags.clone();
    tags.sort();

    format!(
        "{}||{}|{}|{}||{}",
        ingredients.join("|"),
        tags.join(","),
        preferences.cuisine_types.join(","),
        preferences.meal_times.join(","),
        available_recipes
    )
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentStatistics {
    pub total_states: usize,
    pub total_state_action_pairs: usize,
    pub average_q_value: f64,
    pub epsilon: f64,
    pub learning_rate: f64,
    pub discount_factor: f64,
}

/// On-disk form of an agent's learned table
#[derive(Debug, Serialize, Deserialize)]
struct QTableFile {
    q_table: BTreeMap<String, BTreeMap<String, f64>>,
    epsilon: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QLearningAgent {
    params: AgentParams,
    epsilon: f64,
    q_table: BTreeMap<String, BTreeMap<String, f64>>,
}

impl QLearningAgent {
    pub fn new(params: AgentParams) -> Self {
        Self {
            params,
            epsilon: params.epsilon,
            q_table: BTreeMap::new(),
        }
    }

    /// Load the table saved at `path`
    ///
    /// A missing or unreadable table starts the agent from scratch.
    pub async fn load(path: &Path, params: AgentParams) -> Result<Self> {
        let body = match tokio::fs::read_to_string(path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No Q-table at {}, starting fresh", path.display());
                return Ok(Self::new(params));
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<QTableFile>(&body) {
            Ok(file) => {
                info!("Loaded Q-table with {} states", file.q_table.len());
                Ok(Self {
                    params,
                    epsilon: file.epsilon,
                    q_table: file.q_table,
                })
            }
            Err(e) => {
                warn!("Failed to load Q-table from {}: {}", path.display(), e);
                Ok(Self::new(params))
            }
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let file = QTableFile {
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
        };
        tokio::fs::write(path, serde_json::to_string_pretty(&file)?).await?;
        Ok(())
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn q_value(&self, state: &str, action: &str) -> f64 {
        self.q_table
            .get(state)
            .and_then(|actions| actions.get(action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Highest Q-value among `actions` in `state`, 0 when there are none
    pub fn state_value<S: AsRef<str>>(&self, state: &str, actions: &[S]) -> f64 {
        actions
            .iter()
            .map(|action| self.q_value(state, action.as_ref()))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// The action with the highest Q-value; the first one wins ties
    pub fn best_action<'a, S: AsRef<str>>(
        &self,
        state: &str,
        actions: &'a [S],
    ) -> Option<&'a str> {
        let mut best: Option<(&str, f64)> = None;
        for action in actions {
            let q = self.q_value(state, action.as_ref());
            if best.is_none_or(|(_, best_q)| q > best_q) {
                best = Some((action.as_ref(), q));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Epsilon-greedy choice among `actions`; `explore = false` is always greedy
    pub fn select_action<'a, S, R>(
        &self,
        state: &str,
        actions: &'a [S],
        explore: bool,
        rng: &mut R,
    ) -> Option<&'a str>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        if explore && rng.gen_bool(self.epsilon.clamp(0.0, 1.0)) {
            return actions.choose(rng).map(|action| action.as_ref());
        }
        self.best_action(state, actions)
    }

    /// Apply one Q-learning update and decay epsilon; returns the new Q-value
    ///
    /// `next` is the following state and the actions available there, when known.
    pub fn update_q_value<S: AsRef<str>>(
        &mut self,
        state: &str,
        action: &str,
        reward: f64,
        next: Option<(&str, &[S])>,
    ) -> f64 {
        let current = self.q_value(state, action);
        let max_next = next
            .map(|(next_state, next_actions)| self.state_value(next_state, next_actions))
            .unwrap_or(0.0);

        let updated = current
            + self.params.learning_rate
                * (reward + self.params.discount_factor * max_next - current);
        self.q_table
            .entry(state.to_string())
            .or_default()
            .insert(action.to_string(), updated);

        if self.epsilon > self.params.epsilon_min {
            self.epsilon *= self.params.epsilon_decay;
        }
        updated
    }

    pub fn learn_from_feedback<S: AsRef<str>>(
        &mut self,
        state: &str,
        action: &str,
        feedback: Feedback,
        next: Option<(&str, &[S])>,
    ) -> f64 {
        let updated = self.update_q_value(state, action, feedback.reward(), next);
        debug!(action, ?feedback, q = updated, "Updated Q-value");
        updated
    }

    /// Softmax over the Q-values of `actions`, in the order given
    pub fn policy<'a, S: AsRef<str>>(
        &self,
        state: &str,
        actions: &'a [S],
    ) -> Vec<(&'a str, f64)> {
        if actions.is_empty() {
            return Vec::new();
        }

        let max_q = self.state_value(state, actions);
        let weights: Vec<(&str, f64)> = actions
            .iter()
            .map(|action| {
                let q = self.q_value(state, action.as_ref());
                (action.as_ref(), ((q - max_q) / POLICY_TEMPERATURE).exp())
            })
            .collect();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();

        weights
            .into_iter()
            .map(|(action, weight)| (action, weight / total))
            .collect()
    }

    pub fn statistics(&self) -> AgentStatistics {
        let values: Vec<f64> = self
            .q_table
            .values()
            .flat_map(|actions| actions.values().copied())
            .collect();
        let average_q_value = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };

        AgentStatistics {
            total_states: self.q_table.len(),
            total_state_action_pairs: values.len(),
            average_q_value,
            epsilon: self.epsilon,
            learning_rate: self.params.learning_rate,
            discount_factor: self.params.discount_factor,
        }
    }
}

/// One agent per user, each with its own table file under `dir`
pub struct PersonalizedAgents {
    params: AgentParams,
    dir: PathBuf,
    agents: HashMap<String, QLearningAgent>,
}

impl PersonalizedAgents {
    pub fn new(params: AgentParams, dir: impl Into<PathBuf>) -> Self {
        Self {
            params,
            dir: dir.into(),
            agents: HashMap::new(),
        }
    }

    pub fn path_for(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("q_table_{}.json", user_id))
    }

    /// The agent for `user_id`, loading its table on first use
    pub async fn agent_for(&mut self, user_id: &str) -> Result<&mut QLearningAgent> {
        let params = self.params;
        if !self.agents.contains_key(user_id) {
            let agent = QLearningAgent::load(&self.path_for(user_id), params).await?;
            self.agents.insert(user_id.to_string(), agent);
        }
        Ok(self
            .agents
            .entry(user_id.to_string())
            .or_insert_with(|| QLearningAgent::new(params)))
    }

    pub async fn select_action_for_user<S, R>(
        &mut self,
        user_id: &str,
        state: &str,
        actions: &[S],
        explore: bool,
        rng: &mut R,
    ) -> Result<Option<String>>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let agent = self.agent_for(user_id).await?;
        Ok(agent
            .select_action(state, actions, explore, rng)
            .map(str::to_string))
    }

    /// Learn from feedback and persist the user's table
    pub async fn learn_from_feedback_for_user<S: AsRef<str>>(
        &mut self,
        user_id: &str,
        state: &str,
        action: &str,
        feedback: Feedback,
        next: Option<(&str, &[S])>,
    ) -> Result<f64> {
        let path = self.path_for(user_id);
        let agent = self.agent_for(user_id).await?;
        let updated = agent.learn_from_feedback(state, action, feedback, next);
        agent.save(&path).await?;
        info!(user_id, action, ?feedback, "Recorded recommendation feedback");
        Ok(updated)
    }

    pub async fn user_statistics(&mut self, user_id: &str) -> Result<AgentStatistics> {
        Ok(self.agent_for(user_id).await?.statistics())
    }
}
