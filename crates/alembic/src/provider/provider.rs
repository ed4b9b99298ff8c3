//! Plan provider trait and shared response handling.

use crate::error::{AlembicError, Result};
use crate::plan::PreprocessingPlan;
use crate::summary::DatasetSummary;

/// Configuration for plan providers.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Model identifier (provider-specific).
    pub model: String,
    /// Maximum tokens in the response.
    pub max_tokens: usize,
    /// Sampling temperature (0.0-1.0).
    pub temperature: f64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: "deepseek/deepseek-chat-v3-0324".to_string(),
            max_tokens: 4096,
            temperature: 0.2,
        }
    }
}

/// Trait for preprocessing plan providers.
///
/// Implementations must be thread-safe (Send + Sync) so a single provider
/// can be shared across runs; each run still owns its dataset copy.
pub trait PlanProvider: Send + Sync {
    /// Propose a preprocessing plan for the summarized dataset.
    ///
    /// The returned plan maps column names to ordered action lists with
    /// paired rationale. Structural validity (parseable actions, known
    /// columns) is the provider boundary's job; semantic quality is not
    /// validated here.
    fn propose(&self, summary: &DatasetSummary) -> Result<PreprocessingPlan>;

    /// Get the configuration for this provider.
    fn config(&self) -> &ProviderConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

/// Parse a model response into a plan.
///
/// Markdown code fences are stripped first. If the remainder does not parse,
/// one brace-matching recovery is attempted (first `{` to last `}`); a second
/// failure is a provider error.
pub fn parse_plan_response(response: &str) -> Result<PreprocessingPlan> {
    let body = strip_code_fences(response);

    match serde_json::from_str(body) {
        Ok(plan) => Ok(plan),
        Err(first_err) => {
            let start = body.find('{');
            let end = body.rfind('}');
            if let (Some(start), Some(end)) = (start, end) {
                if start < end {
                    if let Ok(plan) = serde_json::from_str(&body[start..=end]) {
                        return Ok(plan);
                    }
                }
            }
            Err(AlembicError::Provider(format!(
                "unparsable plan response: {}",
                first_err
            )))
        }
    }
}

/// Strip a surrounding ```json ... ``` (or plain ```) fence if present.
fn strip_code_fences(response: &str) -> &str {
    if let Some(rest) = response.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(response).trim()
    } else if response.contains("```") {
        response
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .unwrap_or(response)
    } else {
        response.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Action;

    const PLAN_JSON: &str = r#"{
        "columns": {
            "Age": { "actions": ["fill_mean", "standard"], "reasons": ["a", "b"] }
        }
    }"#;

    #[test]
    fn test_parse_bare_json() {
        let plan = parse_plan_response(PLAN_JSON).unwrap();
        assert_eq!(plan.columns["Age"].actions[0], Action::FillMean);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", PLAN_JSON);
        let plan = parse_plan_response(&fenced).unwrap();
        assert_eq!(plan.columns.len(), 1);
    }

    #[test]
    fn test_parse_with_brace_recovery() {
        let chatty = format!(
            "Here is the preprocessing plan you asked for:\n{}\nLet me know!",
            PLAN_JSON
        );
        let plan = parse_plan_response(&chatty).unwrap();
        assert_eq!(plan.columns["Age"].actions[1], Action::Standard);
    }

    #[test]
    fn test_parse_hopeless_response_is_provider_error() {
        let err = parse_plan_response("I cannot help with that.").unwrap_err();
        assert!(matches!(err, AlembicError::Provider(_)));
    }
}
