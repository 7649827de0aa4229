//! Rough per-serving nutrition from a small per-100g table.

use crate::models::api::RecipeIngredient;

/// Values per 100 g
#[derive(Debug, Clone, Copy, PartialEq)]
struct Per100g {
    kcal: f64,
    protein_g: f64,
    fat_g: f64,
    carbs_g: f64,
    sodium_mg: f64,
}

const NUTRITION_TABLE: &[(&str, Per100g)] = &[
    (
        "pork belly",
        Per100g {
            kcal: 518.0,
            protein_g: 9.3,
            fat_g: 53.0,
            carbs_g: 0.0,
            sodium_mg: 73.0,
        },
    ),
    (
        "gochujang",
        Per100g {
            kcal: 208.0,
            protein_g: 3.7,
            fat_g: 3.5,
            carbs_g: 43.0,
            sodium_mg: 3000.0,
        },
    ),
    (
        "tofu",
        Per100g {
            kcal: 76.0,
            protein_g: 8.0,
            fat_g: 4.8,
            carbs_g: 1.9,
            sodium_mg: 7.0,
        },
    ),
];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NutritionEstimate {
    pub kcal: f64,
    pub protein_g: f64,
    pub fat_g: f64,
    pub carbs_g: f64,
    pub sodium_mg: f64,
    /// One line per ingredient that contributed
    pub assumptions: Vec<String>,
}

/// Minimum score for a name to count as a table entry
const MATCH_THRESHOLD: f64 = 70.0;

fn ratio(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Best `ratio` of `short` against every same-length window of `long`
fn partial_ratio(short: &str, long: &str) -> f64 {
    let short_len = short.chars().count();
    let long: Vec<char> = long.chars().collect();
    long.windows(short_len)
        .map(|window| ratio(short, &window.iter().collect::<String>()))
        .fold(0.0, f64::max)
}

/// Weighted similarity in 0..=100
///
/// Names of similar length are compared whole. When one is much longer the
/// shorter one is matched against substrings of it, at a discount.
fn weighted_ratio(a: &str, b: &str) -> f64 {
    let (a_len, b_len) = (a.chars().count(), b.chars().count());
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let whole = ratio(a, b);
    let length_ratio = a_len.max(b_len) as f64 / a_len.min(b_len) as f64;
    if length_ratio < 1.5 {
        return whole;
    }

    let scale = if length_ratio < 8.0 { 0.9 } else { 0.6 };
    let partial = if a_len < b_len {
        partial_ratio(a, b)
    } else {
        partial_ratio(b, a)
    };
    whole.max(partial * scale)
}

fn lookup(name: &str) -> Option<(&'static str, Per100g)> {
    let name = name.trim().to_lowercase();
    let mut best: Option<(f64, &(&'static str, Per100g))> = None;
    for entry in NUTRITION_TABLE {
        let score = weighted_ratio(&name, entry.0);
        if best.is_none_or(|(best_score, _)| score > best_score) {
            best = Some((score, entry));
        }
    }

    best.filter(|(score, _)| *score >= MATCH_THRESHOLD)
        .map(|(_, entry)| *entry)
}

/// Grams for an amount in `unit`; liquids count as water and spoons are level
fn to_grams(amount: f64, unit: &str) -> Option<f64> {
    let factor = match unit.to_lowercase().as_str() {
        "g" | "ml" => 1.0,
        "kg" | "l" => 1000.0,
        "tbsp" => 15.0,
        "tsp" => 5.0,
        _ => return None,
    };
    Some(amount * factor)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estimate nutrition per serving for `ingredients` that feed `servings` people
pub fn estimate_nutrition(ingredients: &[RecipeIngredient], servings: u32) -> NutritionEstimate {
    let mut total = NutritionEstimate::default();

    for ingredient in ingredients {
        let Some((canonical, basis)) = lookup(&ingredient.name) else {
            continue;
        };
        if ingredient.base_amount <= 0.0 {
            continue;
        }
        let Some(grams) = to_grams(ingredient.base_amount, &ingredient.unit) else {
            continue;
        };

        let factor = grams / 100.0;
        total.kcal += basis.kcal * factor;
        total.protein_g += basis.protein_g * factor;
        total.fat_g += basis.fat_g * factor;
        total.carbs_g += basis.carbs_g * factor;
        total.sodium_mg += basis.sodium_mg * factor;
        total
            .assumptions
            .push(format!("{} {}g at table values per 100g", canonical, grams as i64));
    }

    let servings = servings.max(1) as f64;
    if total.assumptions.is_empty() {
        total
            .assumptions
            .push("Limited nutrition data available".to_string());
    }

    NutritionEstimate {
        kcal: round2(total.kcal / servings),
        protein_g: round2(total.protein_g / servings),
        fat_g: round2(total.fat_g / servings),
        carbs_g: round2(total.carbs_g / servings),
        sodium_mg: round2(total.sodium_mg / servings),
        assumptions: total.assumptions,
    }
}

/// Spell out unicode fractions and shorten spoon units in free text
pub fn normalize_units(text: &str) -> String {
    text.replace('½', "0.5")
        .replace('¼', "0.25")
        .replace('¾', "0.75")
        .replace("tablespoons", "tbsp")
        .replace("tablespoon", "tbsp")
        .replace("teaspoons", "tsp")
        .replace("teaspoon", "tsp")
}
