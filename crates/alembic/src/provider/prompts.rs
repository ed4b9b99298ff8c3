//! Prompt templates for plan providers.

use crate::error::Result;
use crate::summary::DatasetSummary;

/// System prompt for all plan-provider interactions.
pub fn system_prompt() -> &'static str {
    "You are a data preprocessing decision maker for Alembic, a tabular \
     preprocessing pipeline.\n\
     \n\
     Your role is to read a dataset summary and decide, per column, which \
     preprocessing actions to apply and in what order.\n\
     \n\
     Guidelines:\n\
     - Order matters: imputation before scaling, encoding last for a column\n\
     - Prefer conservative choices; dropping a column needs strong evidence\n\
     - Give a short reason for every action\n\
     - Always respond with valid JSON when requested"
}

/// Build the plan-request prompt from a dataset summary.
pub fn plan_prompt(summary: &DatasetSummary) -> Result<String> {
    let summary_json = serde_json::to_string_pretty(summary)?;

    Ok(format!(
        r#"You are given a dataset summary in JSON. Decide preprocessing actions for
each column and explain your reasoning. You may return multiple actions per
column, in the order they should be applied.

Allowed actions:
- Missing value handling: 'fill_median', 'fill_mean', 'fill_mode', 'fill_unknown'
- Encoding: 'one_hot', 'label'
- Scaling: 'standard', 'minmax'
- Outlier handling: 'drop_outliers', 'cap_outliers'
- Feature engineering: 'none', 'log_transform', 'sqrt_transform', 'interaction_term'
- Drop columns: 'drop' (only if constant or >50% missing)
- No change: 'keep'

Return valid JSON like this:

{{
  "columns": {{
    "ColumnName": {{
      "actions": ["fill_mean", "standard", "cap_outliers"],
      "reasons": [
        "5% missing numeric values; suitable for mean imputation.",
        "Scale after imputation for consistency.",
        "Cap extreme values to reduce outlier effect."
      ]
    }},
    "Category": {{
      "actions": ["fill_unknown", "one_hot"],
      "reasons": [
        "Missing categorical values filled as 'Unknown'.",
        "Convert to numerical representation."
      ]
    }}
  }},
  "global_actions": {{
    "scaling": "standard",
    "feature_engineering": ["none"]
  }}
}}

Now analyze this dataset summary and decide accordingly:
{}"#,
        summary_json
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::DataTable;
    use crate::summary::SummaryBuilder;

    #[test]
    fn test_plan_prompt_embeds_summary() {
        let table = DataTable::new(
            vec!["age".to_string()],
            vec![vec!["30".to_string()], vec!["25".to_string()]],
            b',',
        );
        let summary = SummaryBuilder::new().build(&table);
        let prompt = plan_prompt(&summary).unwrap();

        assert!(prompt.contains("\"age\""));
        assert!(prompt.contains("fill_median"));
        assert!(prompt.contains("global_actions"));
    }
}
