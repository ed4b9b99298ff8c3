//! Mock plan provider: deterministic rule-based plans for testing and
//! offline runs.

use crate::error::Result;
use crate::plan::{Action, ColumnDirective, GlobalActions, PreprocessingPlan};
use crate::summary::DatasetSummary;

use super::provider::{PlanProvider, ProviderConfig};

/// Rule-based provider that stands in for a remote model.
///
/// The rules mirror the guidance the real provider is prompted with:
/// impute before scaling, encode categoricals, drop constant or mostly
/// missing columns. Output depends only on the summary, so tests get the
/// same plan every time.
pub struct MockProvider {
    config: ProviderConfig,
    /// Cardinality at or below which categoricals get one-hot encoding.
    one_hot_limit: usize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            config: ProviderConfig {
                model: "mock".to_string(),
                ..ProviderConfig::default()
            },
            one_hot_limit: 10,
        }
    }

    fn directive_for(&self, column: &str, summary: &DatasetSummary) -> ColumnDirective {
        let mut actions = Vec::new();
        let mut reasons = Vec::new();

        if summary.constant_columns.iter().any(|c| c == column) {
            return ColumnDirective::new(
                vec![Action::Drop],
                vec!["Constant column carries no information.".to_string()],
            );
        }

        let missing = summary
            .missing_percent
            .get(column)
            .copied()
            .unwrap_or(0.0);
        if missing > 50.0 {
            return ColumnDirective::new(
                vec![Action::Drop],
                vec![format!("{:.0}% of values are missing.", missing)],
            );
        }

        if summary.numeric_describe.contains_key(column) {
            if missing > 0.0 {
                actions.push(Action::FillMedian);
                reasons.push(format!(
                    "{:.1}% missing numeric values; median is robust to outliers.",
                    missing
                ));
            }
            if summary.outliers.get(column).copied().unwrap_or(0) > 0 {
                actions.push(Action::CapOutliers);
                reasons.push("Cap extreme values to reduce outlier effect.".to_string());
            }
            actions.push(Action::Standard);
            reasons.push("Standardize for downstream modeling.".to_string());
        } else if let Some(&cardinality) = summary.categorical_cardinality.get(column) {
            if missing > 0.0 {
                actions.push(Action::FillUnknown);
                reasons.push("Missing categorical values filled as 'Unknown'.".to_string());
            }
            if cardinality <= self.one_hot_limit {
                actions.push(Action::OneHot);
                reasons.push(format!(
                    "Low cardinality ({}); one-hot keeps categories distinct.",
                    cardinality
                ));
            } else {
                actions.push(Action::Label);
                reasons.push(format!(
                    "High cardinality ({}); label encoding avoids column blow-up.",
                    cardinality
                ));
            }
        } else {
            actions.push(Action::Keep);
            reasons.push("No preprocessing needed.".to_string());
        }

        ColumnDirective::new(actions, reasons)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanProvider for MockProvider {
    fn propose(&self, summary: &DatasetSummary) -> Result<PreprocessingPlan> {
        let mut plan = PreprocessingPlan::new();
        for column in summary.dtypes.keys() {
            let directive = self.directive_for(column, summary);
            plan.columns.insert(column.clone(), directive);
        }
        plan.global_actions = Some(GlobalActions {
            scaling: Some("standard".to_string()),
            feature_engineering: vec!["none".to_string()],
        });
        Ok(plan)
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
