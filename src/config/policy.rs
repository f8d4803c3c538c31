use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Handling of visibility conditions that point at unknown properties.
///
/// A condition target is looked up among the component's flattened paths,
/// relative to the property that declares it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionPolicy {
    /// Log a warning and render the condition exactly as written.
    #[default]
    Lenient,

    /// Fail the run with a malformed metadata error.
    Strict,
}

impl fmt::Display for ConditionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionPolicy::Lenient => write!(f, "lenient"),
            ConditionPolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for ConditionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lenient" => Ok(ConditionPolicy::Lenient),
            "strict" => Ok(ConditionPolicy::Strict),
            other => Err(format!(
                "unknown condition policy '{other}', expected 'lenient' or 'strict'"
            )),
        }
    }
}
