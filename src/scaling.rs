//! Serving-size scaling of ingredient quantities.
//!
//! Every function here is pure: view state is passed in and a new value is
//! handed back, so a caller can keep the previous state around or drop it.

use indexmap::IndexSet;

use crate::error::{Result, YorigoError};
use crate::models::api::{Recipe, RecipeIngredient};

/// Scale `base_amount`, written for `base_servings`, to `requested_servings`
pub fn scale_amount(base_amount: f64, base_servings: u32, requested_servings: u32) -> Result<f64> {
    if !base_amount.is_finite() || base_amount < 0.0 {
        return Err(YorigoError::InvalidArgument(format!(
            "amount must be a non-negative number, got {}",
            base_amount
        )));
    }
    if base_servings == 0 {
        return Err(YorigoError::InvalidArgument(
            "base servings must be at least 1".to_string(),
        ));
    }
    if requested_servings == 0 {
        return Err(YorigoError::InvalidArgument(
            "requested servings must be at least 1".to_string(),
        ));
    }

    let scale_factor = requested_servings as f64 / base_servings as f64;
    Ok(base_amount * scale_factor)
}

/// Render an amount for display
///
/// Whole numbers get no decimals, anything else below 10 gets one decimal,
/// and larger amounts are rounded to a whole number. This means 9.96 shows
/// as "10.0" while 10.04 shows as "10".
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        to_fixed(amount, 0)
    } else if amount < 10.0 {
        to_fixed(amount, 1)
    } else {
        to_fixed(amount, 0)
    }
}

/// Fixed-point rendering that rounds exact halves up ("0.25" -> "0.3")
fn to_fixed(value: f64, decimals: i32) -> String {
    let precision = decimals as usize;

    // value sits exactly halfway between two candidates iff value * 2^(d+1)
    // is an odd integer; scaling by a power of two is exact.
    let halves = value * 2f64.powi(decimals + 1);
    if halves.fract() == 0.0 && halves % 2.0 == 1.0 {
        let step = 10f64.powi(decimals);
        let rounded_up = (value * step).floor() + 1.0;
        return format!("{:.precision$}", rounded_up / step);
    }

    format!("{:.precision$}", value)
}

/// Scaled and formatted amount, without the unit
pub fn scaled_amount(
    base_amount: f64,
    base_servings: u32,
    requested_servings: u32,
) -> Result<String> {
    scale_amount(base_amount, base_servings, requested_servings).map(format_amount)
}

/// Scaled amount followed by its unit, e.g. "300 g"
pub fn scaled_quantity(
    base_amount: f64,
    unit: &str,
    base_servings: u32,
    requested_servings: u32,
) -> Result<String> {
    let amount = scaled_amount(base_amount, base_servings, requested_servings)?;
    if unit.is_empty() {
        Ok(amount)
    } else {
        Ok(format!("{} {}", amount, unit))
    }
}

/// Apply `delta` to a serving count, never going below one
pub fn adjust_servings(current: u32, delta: i32) -> u32 {
    let next = current as i64 + delta as i64;
    next.clamp(1, u32::MAX as i64) as u32
}

/// Return a copy of `selected` with `id` added if it was absent, removed otherwise
pub fn toggle_selection(selected: &IndexSet<String>, id: &str) -> IndexSet<String> {
    let mut next = selected.clone();
    if !next.shift_remove(id) {
        next.insert(id.to_string());
    }
    next
}

/// Ingredients the user already has in the pantry start out selected
pub fn initial_selection(ingredients: &[RecipeIngredient]) -> IndexSet<String> {
    ingredients
        .iter()
        .filter(|ingredient| ingredient.has_in_pantry)
        .map(|ingredient| ingredient.id.clone())
        .collect()
}

/// An ingredient row as shown at the current serving count
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledIngredient {
    pub id: String,
    pub name: String,
    pub quantity: String,
    pub selected: bool,
    pub has_in_pantry: bool,
}

/// Serving count and ingredient selection for one open recipe
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeViewState {
    servings: u32,
    selected: IndexSet<String>,
}

impl RecipeViewState {
    pub fn new(recipe: &Recipe) -> Self {
        Self {
            servings: recipe.base_servings.max(1),
            selected: initial_selection(&recipe.ingredients),
        }
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn selected(&self) -> &IndexSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn with_servings(self, servings: u32) -> Self {
        Self {
            servings: servings.max(1),
            ..self
        }
    }

    pub fn increment(self) -> Self {
        let servings = adjust_servings(self.servings, 1);
        self.with_servings(servings)
    }

    pub fn decrement(self) -> Self {
        let servings = adjust_servings(self.servings, -1);
        self.with_servings(servings)
    }

    pub fn toggle(self, id: &str) -> Self {
        Self {
            selected: toggle_selection(&self.selected, id),
            ..self
        }
    }

    /// Every ingredient of `recipe`, in order, scaled to the current servings
    pub fn scaled_rows(&self, recipe: &Recipe) -> Result<Vec<ScaledIngredient>> {
        recipe
            .ingredients
            .iter()
            .map(|ingredient| -> Result<ScaledIngredient> {
                Ok(ScaledIngredient {
                    id: ingredient.id.clone(),
                    name: ingredient.name.clone(),
                    quantity: scaled_quantity(
                        ingredient.base_amount,
                        &ingredient.unit,
                        recipe.base_servings,
                        self.servings,
                    )?,
                    selected: self.is_selected(&ingredient.id),
                    has_in_pantry: ingredient.has_in_pantry,
                })
            })
            .collect()
    }
}
