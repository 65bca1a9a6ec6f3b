//! Read-only view over the recipe composition graph

use crate::diagnostics::{CompositionIssue, IssueKind, IssueSink};
use rust_decimal::Decimal;
use shared::models::{Ingredient, Recipe, RecipeIngredient, RecipeSubRecipe};
use std::collections::HashMap;

/// Direct ingredient edge, normalized at build time
#[derive(Debug, Clone)]
pub struct IngredientEdge {
    pub ingredient: String,
    /// Quantity per unit of the owning recipe
    pub quantity: Decimal,
}

/// Sub-recipe edge, normalized at build time
#[derive(Debug, Clone)]
pub struct SubRecipeEdge {
    pub child: String,
    /// Units of child per unit of the owning recipe
    pub quantity: Decimal,
}

/// Immutable snapshot of the composition graph
///
/// Built from the rows the persistence collaborator pushes. Every rebuild
/// gets a fresh `epoch`; the cost memo is keyed to one snapshot and dies
/// with it. Edges that cannot be resolved against the snapshot (unknown
/// recipe, unknown ingredient, negative quantity) are dropped here and
/// reported through the issue sink, so downstream resolution runs against
/// a consistent view.
#[derive(Debug, Clone, Default)]
pub struct CompositionGraph {
    epoch: String,
    ingredients: HashMap<String, Ingredient>,
    recipes: HashMap<String, Recipe>,
    direct: HashMap<String, Vec<IngredientEdge>>,
    nested: HashMap<String, Vec<SubRecipeEdge>>,
}

impl CompositionGraph {
    /// Empty snapshot (engine state before the first catalog push)
    pub fn empty() -> Self {
        Self {
            epoch: uuid::Uuid::new_v4().to_string(),
            ..Default::default()
        }
    }

    /// Build a snapshot from pushed catalog rows
    pub fn from_rows(
        ingredients: Vec<Ingredient>,
        recipes: Vec<Recipe>,
        ingredient_edges: Vec<RecipeIngredient>,
        sub_recipe_edges: Vec<RecipeSubRecipe>,
        issues: &IssueSink,
    ) -> Self {
        let mut graph = Self::empty();

        for ing in ingredients {
            if let Some(id) = ing.id.clone() {
                graph.ingredients.insert(id, ing);
            }
        }
        for recipe in recipes {
            if let Some(id) = recipe.id.clone() {
                graph.recipes.insert(id, recipe);
            }
        }

        for edge in ingredient_edges {
            if !graph.recipes.contains_key(&edge.recipe) {
                graph.report_dangling(issues, IssueKind::MissingRecipe, &edge.recipe, &edge.ingredient);
                continue;
            }
            if !graph.ingredients.contains_key(&edge.ingredient) {
                graph.report_dangling(issues, IssueKind::MissingIngredient, &edge.recipe, &edge.ingredient);
                continue;
            }
            if edge.quantity < Decimal::ZERO {
                graph.report_negative(issues, &edge.recipe, &edge.ingredient, edge.quantity);
                continue;
            }
            graph.direct.entry(edge.recipe).or_default().push(IngredientEdge {
                ingredient: edge.ingredient,
                quantity: edge.quantity,
            });
        }

        for edge in sub_recipe_edges {
            if !graph.recipes.contains_key(&edge.parent) {
                graph.report_dangling(issues, IssueKind::MissingRecipe, &edge.parent, &edge.child);
                continue;
            }
            if !graph.recipes.contains_key(&edge.child) {
                graph.report_dangling(issues, IssueKind::MissingSubRecipe, &edge.parent, &edge.child);
                continue;
            }
            if edge.quantity < Decimal::ZERO {
                graph.report_negative(issues, &edge.parent, &edge.child, edge.quantity);
                continue;
            }
            graph.nested.entry(edge.parent).or_default().push(SubRecipeEdge {
                child: edge.child,
                quantity: edge.quantity,
            });
        }

        graph
    }

    fn report_dangling(&self, issues: &IssueSink, kind: IssueKind, source: &str, target: &str) {
        tracing::warn!(%source, %target, ?kind, "Dropping dangling composition edge");
        issues.push(CompositionIssue::new(kind, source).with_target(target));
    }

    fn report_negative(&self, issues: &IssueSink, source: &str, target: &str, quantity: Decimal) {
        tracing::warn!(%source, %target, %quantity, "Dropping negative-quantity composition edge");
        issues.push(
            CompositionIssue::new(IssueKind::NegativeQuantity, source)
                .with_target(target)
                .with_param("quantity", quantity.to_string()),
        );
    }

    /// Snapshot identity, regenerated on every rebuild
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    pub fn direct_edges(&self, recipe_id: &str) -> &[IngredientEdge] {
        self.direct.get(recipe_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn sub_edges(&self, recipe_id: &str) -> &[SubRecipeEdge] {
        self.nested.get(recipe_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ingredients(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredients.values()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn ingredient_count(&self) -> usize {
        self.ingredients.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }
}
