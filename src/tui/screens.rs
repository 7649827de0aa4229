use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::app::{ViewerContext, ViewerState};
use crate::models::api::CartRecipe;
use crate::scaling::RecipeViewState;

fn move_cursor(cursor: usize, len: usize, key: KeyCode) -> usize {
    match key {
        KeyCode::Up | KeyCode::Char('k') => cursor.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') if cursor + 1 < len => cursor + 1,
        _ => cursor,
    }
}

fn cursor_style(is_cursor: bool) -> Style {
    if is_cursor {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    }
}

fn status_title(context: &ViewerContext, help: &str) -> String {
    match &context.status {
        Some(status) => format!("{} - {}", help, status),
        None => help.to_string(),
    }
}

pub(crate) struct RecipeList {
    cursor: usize,
}

impl RecipeList {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Detail screen for the recipe at `index`
    pub fn open(index: usize, context: &ViewerContext) -> Box<dyn ViewerState> {
        Box::new(RecipeDetail::new(index, RecipeViewState::new(&context.recipes[index])))
    }
}

impl ViewerState for RecipeList {
    fn render(&self, context: &ViewerContext, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(frame.area());

        let recipe_lines: Vec<Line> = context
            .recipes
            .iter()
            .enumerate()
            .map(|(i, recipe)| {
                let mut details = format!(
                    "재료 {}가지 • {}인분",
                    recipe.ingredients.len(),
                    recipe.base_servings
                );
                if let Some(calories) = recipe.calories {
                    details.push_str(&format!(" • {} kcal", calories));
                }

                let mut spans = vec![
                    Span::styled(recipe.title.clone(), cursor_style(i == self.cursor)),
                    Span::raw("  "),
                    Span::styled(details, Style::default().add_modifier(Modifier::DIM)),
                ];
                let recommended = context
                    .recommendation
                    .as_ref()
                    .is_some_and(|r| r.recipe_id == recipe.id);
                if recommended {
                    spans.push(Span::styled(
                        "  ★ 추천",
                        Style::default().add_modifier(Modifier::BOLD),
                    ));
                }
                Line::from(spans)
            })
            .collect();

        let list = Paragraph::new(recipe_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("저장된 레시피 ({})", context.recipes.len())),
        );
        frame.render_widget(list, chunks[0]);

        let help = Paragraph::new(format!("Cart: {} recipe(s)", context.cart.len())).block(
            Block::default().borders(Borders::ALL).title(status_title(
                context,
                "Enter to open, c for cart, q to check out",
            )),
        );
        frame.render_widget(help, chunks[1]);
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        context: &mut ViewerContext,
    ) -> Option<Box<dyn ViewerState>> {
        match key {
            KeyCode::Enter if self.cursor < context.recipes.len() => {
                context.status = None;
                Some(Self::open(self.cursor, context))
            }
            KeyCode::Char('c') => {
                context.status = None;
                Some(Box::new(CartScreen::new()))
            }
            KeyCode::Char('q') => {
                context.finished = true;
                None
            }
            _ => {
                self.cursor = move_cursor(self.cursor, context.recipes.len(), key);
                None
            }
        }
    }
}

pub(crate) struct RecipeDetail {
    index: usize,
    view: RecipeViewState,
    cursor: usize,
}

impl RecipeDetail {
    pub fn new(index: usize, view: RecipeViewState) -> Self {
        Self {
            index,
            view,
            cursor: 0,
        }
    }
}

impl ViewerState for RecipeDetail {
    fn render(&self, context: &ViewerContext, frame: &mut Frame) {
        let recipe = &context.recipes[self.index];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),      // Servings
                Constraint::Percentage(45), // Ingredients
                Constraint::Min(1),         // Instructions
            ])
            .split(frame.area());

        let mut heading = recipe.title.clone();
        if let Some(calories) = recipe.calories {
            heading.push_str(&format!(" • {} kcal", calories));
        }
        if let Some(grade) = &recipe.health_grade {
            heading.push_str(&format!(" • Health Grade: {}", grade));
        }
        let servings = Paragraph::new(format!("인분 조절: {}", self.view.servings()))
            .block(Block::default().borders(Borders::ALL).title(heading));
        frame.render_widget(servings, chunks[0]);

        let ingredient_lines: Vec<Line> = match self.view.scaled_rows(recipe) {
            Ok(rows) => rows
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let checkbox = if row.selected { "[x] " } else { "[ ] " };
                    let mut spans = vec![
                        Span::styled(
                            format!("{}{}", checkbox, row.name),
                            cursor_style(i == self.cursor),
                        ),
                        Span::raw("  "),
                        Span::styled(
                            row.quantity.clone(),
                            Style::default().add_modifier(Modifier::ITALIC),
                        ),
                    ];
                    if row.has_in_pantry && row.selected {
                        spans.push(Span::raw(" (pantry)"));
                    }
                    Line::from(spans)
                })
                .collect(),
            Err(e) => vec![Line::from(format!("Cannot scale ingredients: {}", e))],
        };

        let ingredient_list = Paragraph::new(ingredient_lines).block(
            Block::default().borders(Borders::ALL).title(status_title(
                context,
                "재료 (+/- servings, space to select, a to add to cart, b to go back)",
            )),
        );
        frame.render_widget(ingredient_list, chunks[1]);

        let mut instruction_lines: Vec<Line> = recipe
            .instructions
            .iter()
            .enumerate()
            .map(|(i, step)| Line::from(format!("{}. {}", i + 1, step)))
            .collect();
        if let Some(nutrition) = &recipe.nutrition {
            instruction_lines.push(Line::from(""));
            instruction_lines.push(Line::from(format!(
                "영양 정보 (1인분): {} kcal • 단백질 {}g • 탄수화물 {}g • 지방 {}g",
                nutrition.calories, nutrition.protein_g, nutrition.carbs_g, nutrition.fat_g
            )));
        }

        let instructions = Paragraph::new(instruction_lines)
            .block(Block::default().borders(Borders::ALL).title("조리 방법"));
        frame.render_widget(instructions, chunks[2]);
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        context: &mut ViewerContext,
    ) -> Option<Box<dyn ViewerState>> {
        let recipe = &context.recipes[self.index];

        match key {
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.view = self.view.clone().increment();
                None
            }
            KeyCode::Char('-') => {
                self.view = self.view.clone().decrement();
                None
            }
            KeyCode::Char(' ') => {
                if let Some(ingredient) = recipe.ingredients.get(self.cursor) {
                    self.view = self.view.clone().toggle(&ingredient.id);
                }
                None
            }
            KeyCode::Char('a') => {
                let recipe_id = recipe.id;
                match CartRecipe::from_view(recipe, &self.view, &context.catalog) {
                    Ok(entry) => {
                        context.status = Some(format!("Added {} to cart", entry.name));
                        context.add_to_cart(recipe_id, entry);
                        Some(Box::new(RecipeList::new()))
                    }
                    Err(e) => {
                        context.status = Some(e.to_string());
                        None
                    }
                }
            }
            KeyCode::Backspace | KeyCode::Char('b') => {
                context.status = None;
                Some(Box::new(RecipeList::new()))
            }
            _ => {
                self.cursor = move_cursor(self.cursor, recipe.ingredients.len(), key);
                None
            }
        }
    }
}

pub(crate) struct CartScreen {
    cursor: usize,
}

impl CartScreen {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }
}

impl ViewerState for CartScreen {
    fn render(&self, context: &ViewerContext, frame: &mut Frame) {
        let mut lines: Vec<Line> = Vec::new();

        if context.cart.is_empty() {
            lines.push(Line::from("장바구니가 비어 있습니다"));
        }

        for (i, entry) in context.cart.recipes().enumerate() {
            let marker = if entry.expanded { "▾" } else { "▸" };
            lines.push(Line::from(Span::styled(
                format!(
                    "{} {} ({}인분, 재료 {}개)",
                    marker,
                    entry.name,
                    entry.servings,
                    entry.ingredients.len()
                ),
                cursor_style(i == self.cursor),
            )));

            if entry.expanded {
                for ingredient in &entry.ingredients {
                    lines.push(Line::from(format!(
                        "    {}  {}",
                        ingredient.name, ingredient.amount
                    )));
                    for recommendation in &ingredient.recommendations {
                        let product = recommendation.product();
                        lines.push(Line::from(vec![
                            Span::raw("      "),
                            Span::styled(
                                format!("[{}]", recommendation.badge()),
                                Style::default().add_modifier(Modifier::BOLD),
                            ),
                            Span::raw(format!(" {} {}", product.name, product.price)),
                        ]));
                    }
                }
            }
        }

        let cart = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(
            "장바구니 (Enter to expand, d to remove, x to clear, b to go back, q to check out)",
        ));
        frame.render_widget(cart, frame.area());
    }

    fn handle_key(
        &mut self,
        key: KeyCode,
        context: &mut ViewerContext,
    ) -> Option<Box<dyn ViewerState>> {
        let selected_id = context
            .cart
            .recipes()
            .nth(self.cursor)
            .map(|entry| entry.id.clone());

        match key {
            KeyCode::Enter => {
                if let Some(id) = selected_id {
                    context.cart = std::mem::take(&mut context.cart).toggle_expanded(&id);
                }
                None
            }
            KeyCode::Char('d') => {
                if let Some(id) = selected_id {
                    context.cart = std::mem::take(&mut context.cart).remove(&id);
                    self.cursor = self.cursor.min(context.cart.len().saturating_sub(1));
                }
                None
            }
            KeyCode::Char('x') => {
                context.cart = std::mem::take(&mut context.cart).clear();
                self.cursor = 0;
                None
            }
            KeyCode::Backspace | KeyCode::Char('b') => Some(Box::new(RecipeList::new())),
            KeyCode::Char('q') => {
                context.finished = true;
                None
            }
            _ => {
                self.cursor = move_cursor(self.cursor, context.cart.len(), key);
                None
            }
        }
    }
}
