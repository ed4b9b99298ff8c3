//! Action tokens understood by the preprocessing engine.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// One preprocessing action on a single column.
///
/// Parsing is total: every string maps to a variant, with unrecognized
/// tokens preserved in [`Action::Unknown`] so plans and logs round-trip
/// byte-for-byte. The engine treats unknown tokens as no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Explicit no-op.
    None,
    /// Explicit no-op (alias the provider may emit).
    Keep,
    /// Replace missing entries with the column median (numeric only).
    FillMedian,
    /// Replace missing entries with the column mean (numeric only).
    FillMean,
    /// Replace missing entries with the most frequent value.
    FillMode,
    /// Replace missing entries with the literal `"Unknown"`.
    FillUnknown,
    /// Remove the column. Terminal.
    Drop,
    /// Explode the column into 0/1 indicator columns. Terminal.
    OneHot,
    /// Map each distinct value to an integer code.
    Label,
    /// Standardize to zero mean, unit variance (numeric only).
    Standard,
    /// Rescale to [0, 1] (numeric only).
    MinMax,
    /// Remove rows outside the IQR bounds (numeric only).
    DropOutliers,
    /// Clip values to the IQR bounds (numeric only).
    CapOutliers,
    /// log(1+x) transform (numeric only).
    LogTransform,
    /// Square-root transform (numeric only).
    SqrtTransform,
    /// Recognized placeholder for cross-column feature synthesis; no-op.
    InteractionTerm(String),
    /// Unrecognized token; no-op, original text preserved.
    Unknown(String),
}

impl Action {
    /// Parse a token. Never fails.
    pub fn from_token(token: &str) -> Self {
        match token {
            "none" => Action::None,
            "keep" => Action::Keep,
            "fill_median" => Action::FillMedian,
            "fill_mean" => Action::FillMean,
            "fill_mode" => Action::FillMode,
            "fill_unknown" => Action::FillUnknown,
            "drop" => Action::Drop,
            "one_hot" => Action::OneHot,
            "label" => Action::Label,
            "standard" => Action::Standard,
            "minmax" => Action::MinMax,
            "drop_outliers" => Action::DropOutliers,
            "cap_outliers" => Action::CapOutliers,
            "log_transform" => Action::LogTransform,
            "sqrt_transform" => Action::SqrtTransform,
            t if t.starts_with("interaction_term") => Action::InteractionTerm(t.to_string()),
            t => Action::Unknown(t.to_string()),
        }
    }

    /// The wire token for this action.
    pub fn token(&self) -> &str {
        match self {
            Action::None => "none",
            Action::Keep => "keep",
            Action::FillMedian => "fill_median",
            Action::FillMean => "fill_mean",
            Action::FillMode => "fill_mode",
            Action::FillUnknown => "fill_unknown",
            Action::Drop => "drop",
            Action::OneHot => "one_hot",
            Action::Label => "label",
            Action::Standard => "standard",
            Action::MinMax => "minmax",
            Action::DropOutliers => "drop_outliers",
            Action::CapOutliers => "cap_outliers",
            Action::LogTransform => "log_transform",
            Action::SqrtTransform => "sqrt_transform",
            Action::InteractionTerm(t) => t,
            Action::Unknown(t) => t,
        }
    }

    /// True for the explicit no-op sentinels.
    pub fn is_noop_sentinel(&self) -> bool {
        matches!(self, Action::None | Action::Keep)
    }

    /// True when executing this action ends processing for its column
    /// (the column is removed or replaced).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::Drop | Action::OneHot)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(Action::from_token(&token))
    }
}
