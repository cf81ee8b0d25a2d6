//! Enumerated request options shared by the orchestrator and connectors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CalmapError;

/// Calendar period a series is collapsed to before remapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapsePeriod {
    /// Calendar months, labelled by the last day of the month.
    Monthly,
    /// Calendar quarters, labelled by Mar 31, Jun 30, Sep 30 or Dec 31.
    Quarterly,
    /// Calendar years, labelled by Dec 31.
    Annual,
}

impl CollapsePeriod {
    /// Wire name of the period.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annual => "annual",
        }
    }
}

impl FromStr for CollapsePeriod {
    type Err = CalmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annual" => Ok(Self::Annual),
            other => Err(CalmapError::validation(format!(
                "unsupported collapse period '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CollapsePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation applied to the observations inside one collapse bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollapseFunc {
    /// Arithmetic mean.
    #[default]
    Mean,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

impl CollapseFunc {
    /// Wire name of the aggregation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl FromStr for CollapseFunc {
    type Err = CalmapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(CalmapError::validation(format!(
                "unsupported collapse function '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CollapseFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fields of the upstream dataset to return.
///
/// On the wire this is a plain string; the literal `"ALL"` selects every field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnSelector {
    /// Every field the dataset provides.
    All,
    /// Exactly one named field.
    Named(String),
}

impl ColumnSelector {
    /// Wire token selecting every field.
    pub const ALL: &'static str = "ALL";

    /// The selected field name, if a single field was requested.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(n) => Some(n),
        }
    }
}

impl From<String> for ColumnSelector {
    fn from(s: String) -> Self {
        if s == Self::ALL { Self::All } else { Self::Named(s) }
    }
}

impl From<&str> for ColumnSelector {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<ColumnSelector> for String {
    fn from(c: ColumnSelector) -> Self {
        match c {
            ColumnSelector::All => ColumnSelector::ALL.to_string(),
            ColumnSelector::Named(n) => n,
        }
    }
}

impl fmt::Display for ColumnSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Named(n) => f.write_str(n),
        }
    }
}
