//! The action-sequence interpreter.

use log::{debug, warn};

use crate::input::DataTable;
use crate::plan::{Action, PreprocessingPlan};

use super::actions;
use super::log::ActionLog;

/// Control result of one dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Move on to the next action in the column's sequence.
    Continue,
    /// The column was removed or replaced; skip its remaining actions.
    Halt,
}

/// Interprets a [`PreprocessingPlan`] against a working [`DataTable`].
///
/// The engine owns its working copy (the table is taken by value) and never
/// fails: eligibility-guard mismatches, unknown tokens, and references to
/// columns absent from the current table all degrade to no-ops. Columns are
/// processed in the plan's declared order; within a column, actions run left
/// to right until the list ends or a terminal action (drop, one-hot) fires.
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Apply the plan, returning the transformed table and the action log.
    ///
    /// The log records each column's declared directive before that
    /// column's execution begins.
    pub fn run(&self, table: DataTable, plan: &PreprocessingPlan) -> (DataTable, ActionLog) {
        let mut table = table;
        let mut log = ActionLog::new();

        for (column, directive) in &plan.columns {
            log.record(column, directive);

            for action in &directive.actions {
                if action.is_noop_sentinel() {
                    continue;
                }

                // The column may never have existed, or an earlier run of
                // this loop may have removed it.
                let Some(col) = table.column_index(column) else {
                    debug!(
                        "column '{}' not in working table; skipping '{}'",
                        column, action
                    );
                    continue;
                };

                match self.dispatch(&mut table, column, col, action) {
                    Flow::Halt => break,
                    Flow::Continue => {}
                }
            }
        }

        (table, log)
    }

    fn dispatch(
        &self,
        table: &mut DataTable,
        column: &str,
        col: usize,
        action: &Action,
    ) -> Flow {
        let applied = match action {
            Action::None | Action::Keep => true,

            Action::FillMedian => actions::fill_center(table, col, true),
            Action::FillMean => actions::fill_center(table, col, false),
            Action::FillMode => actions::fill_mode(table, col),
            Action::FillUnknown => actions::fill_unknown(table, col),

            Action::Drop => {
                table.drop_column(col);
                return Flow::Halt;
            }
            Action::OneHot => {
                actions::one_hot(table, col);
                return Flow::Halt;
            }
            Action::Label => actions::label_encode(table, col),

            Action::Standard => actions::scale_standard(table, col),
            Action::MinMax => actions::scale_minmax(table, col),

            Action::DropOutliers => actions::drop_outliers(table, col),
            Action::CapOutliers => actions::cap_outliers(table, col),

            Action::LogTransform => actions::log_transform(table, col),
            Action::SqrtTransform => actions::sqrt_transform(table, col),

            Action::InteractionTerm(token) => {
                debug!("'{}' on '{}' is a recognized no-op", token, column);
                true
            }
            Action::Unknown(token) => {
                warn!("ignoring unrecognized action '{}' on '{}'", token, column);
                true
            }
        };

        if !applied {
            debug!(
                "'{}' skipped on '{}': column failed the eligibility guard",
                action, column
            );
        }

        Flow::Continue
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::ColumnDirective;

    fn make_table(headers: Vec<&str>, rows: Vec<Vec<&str>>) -> DataTable {
        DataTable::new(
            headers.into_iter().map(String::from).collect(),
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            b',',
        )
    }

    fn plan_for(column: &str, tokens: &[&str]) -> PreprocessingPlan {
        PreprocessingPlan::new().with_column(
            column,
            ColumnDirective::new(
                tokens.iter().map(|t| Action::from_token(t)).collect(),
                tokens.iter().map(|t| format!("because {}", t)).collect(),
            ),
        )
    }

    fn cells(table: &DataTable, col: usize) -> Vec<String> {
        table.column_values(col).map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_noop_plan_is_identity() {
        let table = make_table(vec!["a", "b"], vec![vec!["1", "x"], vec!["2", "y"]]);
        let plan = plan_for("a", &["none", "keep"]);

        let (out, log) = Engine::new().run(table.clone(), &plan);

        assert_eq!(out, table);
        assert_eq!(log.columns["a"].actions, vec!["none", "keep"]);
        assert_eq!(
            log.columns["a"].reasons,
            vec!["because none", "because keep"]
        );
    }

    #[test]
    fn test_drop_is_terminal() {
        let table = make_table(
            vec!["a", "b"],
            vec![vec!["1", "x"], vec!["2", "y"]],
        );
        // Actions after drop must have no observable effect.
        let plan = plan_for("a", &["drop", "fill_unknown", "standard"]);

        let (out, _) = Engine::new().run(table, &plan);

        assert_eq!(out.headers, vec!["b"]);
        assert_eq!(out.row_count(), 2);
    }

    #[test]
    fn test_city_scenario_fill_unknown_then_one_hot() {
        let table = make_table(
            vec!["City"],
            vec![vec!["NY"], vec!["LA"], vec!["NY"], vec![""]],
        );
        let plan = plan_for("City", &["fill_unknown", "one_hot"]);

        let (out, _) = Engine::new().run(table, &plan);

        assert_eq!(out.headers, vec!["City_LA", "City_NY", "City_Unknown"]);
        assert_eq!(out.row_count(), 4);
        for col in 0..3 {
            assert!(out.column_values(col).all(|v| v == "0" || v == "1"));
        }
        assert_eq!(cells(&out, 1), vec!["1", "0", "1", "0"]);
        assert_eq!(cells(&out, 2), vec!["0", "0", "0", "1"]);
    }

    #[test]
    fn test_one_hot_is_terminal() {
        let table = make_table(vec!["c"], vec![vec!["a"], vec!["b"]]);
        let plan = plan_for("c", &["one_hot", "standard"]);

        let (out, _) = Engine::new().run(table, &plan);

        // The exploded columns must not be scaled: the original column
        // identity is gone and processing halted.
        assert_eq!(cells(&out, 0), vec!["1", "0"]);
        assert_eq!(cells(&out, 1), vec!["0", "1"]);
    }

    #[test]
    fn test_age_scenario_fill_median_then_cap() {
        let table = make_table(
            vec!["Age"],
            vec![
                vec!["10"],
                vec!["12"],
                vec!["11"],
                vec!["13"],
                vec!["1000"],
                vec![""],
            ],
        );
        let plan = plan_for("Age", &["fill_median", "cap_outliers"]);

        let (out, _) = Engine::new().run(table, &plan);

        // Median of [10,12,11,13,1000] is 12; bounds over the filled
        // column [10,12,11,13,1000,12] are [9.0, 15.0].
        assert_eq!(cells(&out, 0), vec!["10", "12", "11", "13", "15", "12"]);
    }

    #[test]
    fn test_score_scenario_standard_scaling() {
        let table = make_table(
            vec!["Score"],
            vec![vec!["50"], vec!["60"], vec!["70"], vec!["80"], vec!["90"]],
        );
        let plan = plan_for("Score", &["standard"]);

        let (out, _) = Engine::new().run(table, &plan);

        let vals: Vec<f64> = cells(&out, 0).iter().map(|v| v.parse().unwrap()).collect();
        assert_eq!(vals.len(), 5);
        assert!(crate::stats::mean(&vals).abs() < 1e-9);
        assert!((crate::stats::std(&vals, 0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_token_is_lenient() {
        let table = make_table(vec!["a"], vec![vec!["1"], vec!["2"]]);
        let plan = plan_for("a", &["frobnicate"]);

        let (out, log) = Engine::new().run(table.clone(), &plan);

        assert_eq!(out, table);
        assert_eq!(log.columns["a"].actions, vec!["frobnicate"]);
    }

    #[test]
    fn test_numeric_guard_skips_silently() {
        let table = make_table(vec!["name"], vec![vec!["Alice"], vec![""]]);
        let plan = plan_for("name", &["fill_median", "standard", "log_transform"]);

        let (out, _) = Engine::new().run(table.clone(), &plan);

        assert_eq!(out, table);
    }

    #[test]
    fn test_missing_column_is_skipped() {
        let table = make_table(vec!["a"], vec![vec!["1"]]);
        let plan = plan_for("ghost", &["drop"]);

        let (out, log) = Engine::new().run(table.clone(), &plan);

        assert_eq!(out, table);
        // Intent is still logged.
        assert!(log.columns.contains_key("ghost"));
    }

    #[test]
    fn test_within_column_order_matters() {
        // Scaling before imputation sees the unfilled column; the fill then
        // uses post-scaling statistics. This pins the recompute-from-current
        // behavior.
        let table = make_table(
            vec!["v"],
            vec![vec!["1"], vec!["3"], vec![""]],
        );
        let plan = plan_for("v", &["minmax", "fill_median"]);

        let (out, _) = Engine::new().run(table, &plan);

        // minmax over [1,3] -> [0,1]; median of [0,1] = 0.5 fills the hole.
        assert_eq!(cells(&out, 0), vec!["0", "1", "0.5"]);
    }

    #[test]
    fn test_drop_outliers_affects_other_columns() {
        let table = make_table(
            vec!["age", "score"],
            vec![
                vec!["10", "1"],
                vec!["11", "2"],
                vec!["12", "3"],
                vec!["13", "4"],
                vec!["1000", "5"],
            ],
        );
        let plan = PreprocessingPlan::new()
            .with_column(
                "age",
                ColumnDirective::new(vec![Action::DropOutliers], vec![]),
            )
            .with_column(
                "score",
                ColumnDirective::new(vec![Action::MinMax], vec![]),
            );

        let (out, _) = Engine::new().run(table, &plan);

        // The score column is scaled over the filtered rows only.
        assert_eq!(out.row_count(), 4);
        let scores: Vec<f64> = cells(&out, 1).iter().map(|v| v.parse().unwrap()).collect();
        assert!((scores[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cap_outliers_idempotent_on_typical_data() {
        let table = make_table(
            vec!["v"],
            vec![
                vec!["10"],
                vec!["12"],
                vec!["11"],
                vec!["12"],
                vec!["13"],
                vec!["1000"],
            ],
        );
        let once = plan_for("v", &["cap_outliers"]);
        let twice = plan_for("v", &["cap_outliers", "cap_outliers"]);

        let (out_once, _) = Engine::new().run(
            make_table(
                vec!["v"],
                vec![
                    vec!["10"],
                    vec!["12"],
                    vec!["11"],
                    vec!["12"],
                    vec!["13"],
                    vec!["1000"],
                ],
            ),
            &once,
        );
        let (out_twice, _) = Engine::new().run(table, &twice);

        assert_eq!(out_once, out_twice);
    }

    #[test]
    fn test_global_actions_are_ignored() {
        let json = r#"{
            "columns": { "a": { "actions": ["none"], "reasons": [] } },
            "global_actions": { "scaling": "standard" }
        }"#;
        let plan: PreprocessingPlan = serde_json::from_str(json).unwrap();
        let table = make_table(vec!["a", "b"], vec![vec!["1", "2"]]);

        let (out, _) = Engine::new().run(table.clone(), &plan);

        // No default scaling leaks onto any column.
        assert_eq!(out, table);
    }

    #[test]
    fn test_interaction_term_is_recognized_noop() {
        let table = make_table(vec!["a"], vec![vec!["1"]]);
        let plan = plan_for("a", &["interaction_term_a_b"]);
        let (out, _) = Engine::new().run(table.clone(), &plan);
        assert_eq!(out, table);
    }
}
