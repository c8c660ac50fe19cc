use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// How independently ranked sub-query scores are added when intersected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCombine {
    /// Raw scores are summed.
    #[default]
    Sum,
    /// Each side is min-max scaled to `[0, 1]` before summing.
    MinMax,
}

impl fmt::Display for ScoreCombine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreCombine::Sum => "sum",
            ScoreCombine::MinMax => "minmax",
        })
    }
}

impl FromStr for ScoreCombine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(ScoreCombine::Sum),
            "minmax" | "min-max" => Ok(ScoreCombine::MinMax),
            other => Err(format!("unknown score combination `{other}` (expected sum or minmax)")),
        }
    }
}

/// Query-time tuning for ranked retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Documents taken from the first pass as pseudo-relevant.
    pub top_k: usize,
    /// Weight of the original query in the feedback query.
    pub alpha: f32,
    /// Weight of the feedback centroid in the feedback query.
    pub beta: f32,
    pub combine: ScoreCombine,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 5, alpha: 1.0, beta: 0.2, combine: ScoreCombine::Sum }
    }
}

impl SearchConfig {
    /// Load from a JSON file; absent fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading search config {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing search config {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"alpha": 0.8, "combine": "minmax"}"#).unwrap();
        assert_eq!(config.alpha, 0.8);
        assert_eq!(config.beta, 0.2);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.combine, ScoreCombine::MinMax);
    }

    #[test]
    fn combine_parses() {
        assert_eq!("MinMax".parse::<ScoreCombine>().unwrap(), ScoreCombine::MinMax);
        assert!("avg".parse::<ScoreCombine>().is_err());
    }
}
