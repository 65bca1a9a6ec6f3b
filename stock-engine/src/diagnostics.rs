//! Composition diagnostics
//!
//! Non-fatal inconsistencies (dangling edges, floored stock) are absorbed
//! where they occur and recorded here so operators can surface them.
//! Nothing in this module aborts a sale flow.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Kind of recorded inconsistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// RecipeIngredient edge names an unknown ingredient
    MissingIngredient,
    /// Edge belongs to an unknown recipe
    MissingRecipe,
    /// RecipeSubRecipe edge names an unknown child recipe
    MissingSubRecipe,
    /// Edge carries a negative quantity
    NegativeQuantity,
    /// A stock movement would have driven on-hand below zero
    StockFloored,
}

/// Non-fatal inconsistency record
#[derive(Debug, Clone, Serialize)]
pub struct CompositionIssue {
    pub kind: IssueKind,
    /// Record that carried the inconsistency (e.g. `"recipe:burger"`)
    pub source: String,
    /// Referenced record, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Context values (quantities, deltas)
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub params: HashMap<String, Value>,
    pub detected_at: DateTime<Utc>,
}

impl CompositionIssue {
    pub fn new(kind: IssueKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            target: None,
            params: HashMap::new(),
            detected_at: Utc::now(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// Shared issue sink
///
/// Engine components push, operators drain. Cloning shares the buffer.
#[derive(Debug, Clone, Default)]
pub struct IssueSink {
    inner: Arc<Mutex<Vec<CompositionIssue>>>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, issue: CompositionIssue) {
        self.inner.lock().push(issue);
    }

    /// Remove and return all recorded issues
    pub fn drain(&self) -> Vec<CompositionIssue> {
        std::mem::take(&mut *self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
