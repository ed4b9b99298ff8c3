//! Plan structures and the copy-on-write override layer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::action::Action;

/// The action/reason sequence assigned to one dataset column.
///
/// `reasons` pairs with `actions` by position and may be shorter; a missing
/// reason reads as an empty explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDirective {
    /// Ordered actions, applied left to right.
    pub actions: Vec<Action>,
    /// Human-readable rationale, parallel to `actions`.
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl ColumnDirective {
    pub fn new(actions: Vec<Action>, reasons: Vec<String>) -> Self {
        Self { actions, reasons }
    }

    /// The reason paired with action `index`, or `""` when absent.
    pub fn reason(&self, index: usize) -> &str {
        self.reasons.get(index).map(|s| s.as_str()).unwrap_or("")
    }
}

/// Advisory dataset-wide defaults a provider may emit.
///
/// Carried for auditability and round-tripping; the engine only executes
/// per-column directives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_engineering: Vec<String>,
}

/// A preprocessing plan: per-column directives in provider-declared order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessingPlan {
    /// Column name -> directive, iterated in declared order.
    pub columns: IndexMap<String, ColumnDirective>,
    /// Advisory global defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_actions: Option<GlobalActions>,
}

impl PreprocessingPlan {
    /// An empty plan.
    pub fn new() -> Self {
        Self {
            columns: IndexMap::new(),
            global_actions: None,
        }
    }

    /// Add a directive for a column, builder style.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        directive: ColumnDirective,
    ) -> Self {
        self.columns.insert(name.into(), directive);
        self
    }

    /// Return a new plan with `column`'s first action replaced.
    ///
    /// This is the override layer: the provider's plan stays untouched so
    /// each run's input remains auditable. A column the plan does not
    /// mention gets a fresh single-action directive.
    pub fn with_override(&self, column: &str, action: Action) -> Self {
        let mut plan = self.clone();
        match plan.columns.get_mut(column) {
            Some(directive) if !directive.actions.is_empty() => {
                directive.actions[0] = action;
            }
            Some(directive) => {
                directive.actions.push(action);
            }
            None => {
                plan.columns.insert(
                    column.to_string(),
                    ColumnDirective::new(vec![action], vec!["user override".to_string()]),
                );
            }
        }
        plan
    }
}

impl Default for PreprocessingPlan {
    fn default() -> Self {
        Self::new()
    }
}
