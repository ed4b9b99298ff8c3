//! The per-run record of intended actions and rationale per column.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::plan::ColumnDirective;

/// What was planned for one column: action tokens and paired reasons,
/// exactly as declared in the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveRecord {
    pub actions: Vec<String>,
    pub reasons: Vec<String>,
}

/// Column name -> planned actions and reasons, recorded before each
/// column's execution begins. Records intent, not per-action outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    pub columns: IndexMap<String, DirectiveRecord>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a column's directive as declared.
    pub fn record(&mut self, column: &str, directive: &ColumnDirective) {
        self.columns.insert(
            column.to_string(),
            DirectiveRecord {
                actions: directive
                    .actions
                    .iter()
                    .map(|a| a.token().to_string())
                    .collect(),
                reasons: directive.reasons.clone(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Action;

    #[test]
    fn test_record_preserves_tokens_and_reasons() {
        let directive = ColumnDirective::new(
            vec![Action::FillMedian, Action::Unknown("frobnicate".to_string())],
            vec!["impute".to_string()],
        );
        let mut log = ActionLog::new();
        log.record("Age", &directive);

        let record = &log.columns["Age"];
        assert_eq!(record.actions, vec!["fill_median", "frobnicate"]);
        // Reasons stay as declared, even when shorter than actions.
        assert_eq!(record.reasons, vec!["impute"]);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut log = ActionLog::new();
        log.record(
            "City",
            &ColumnDirective::new(vec![Action::OneHot], vec!["encode".to_string()]),
        );
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["City"]["actions"][0], "one_hot");
        assert_eq!(json["City"]["reasons"][0], "encode");
    }
}
