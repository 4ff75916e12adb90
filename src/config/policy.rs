//! Assignment acceptance policy.
//!
//! Auto-assignment commits the top-ranked candidate only if it has at least
//! one matching skill. An optional `min_score` adds a numeric floor on the
//! composite score on top of that.
//!
//! ```toml
//! [policy]
//! min_score = 0.5
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::assign::CandidateScore;
use crate::error::{Error, Result};

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policy: AssignmentPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentPolicy {
    /// Minimum composite score for acceptance. `None` accepts any match.
    #[serde(default)]
    pub min_score: Option<f64>,
}

impl AssignmentPolicy {
    /// Accept any candidate with a matching skill.
    pub fn any_match() -> Self {
        Self { min_score: None }
    }

    /// Require a matching skill and a composite score of at least `min_score`.
    pub fn min_score(min_score: f64) -> Result<Self> {
        let policy = Self {
            min_score: Some(min_score),
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Would a candidate with this score be committed?
    pub fn accepts(&self, candidate: &CandidateScore) -> bool {
        candidate.has_match && self.min_score.is_none_or(|min| candidate.score >= min)
    }

    /// Parse a policy from TOML text. A missing `[policy]` table is the default.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: PolicyFile =
            toml::from_str(content).map_err(|e| Error::Config(format!("bad policy: {e}")))?;
        file.policy.validate()?;
        Ok(file.policy)
    }

    /// Load a policy file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read policy file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<()> {
        match self.min_score {
            Some(min) if !(0.0..=1.0).contains(&min) => Err(Error::Config(format!(
                "min_score must be within [0, 1], got {min}"
            ))),
            _ => Ok(()),
        }
    }
}
