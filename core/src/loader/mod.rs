//! Problem loader for proof problems
//!
//! Parses proof problems from JSON and converts them to goal states and
//! prover settings. Goals are written in the canonical diagram text.

use crate::ir::{read_diagram, GoalState, ReadError};
use crate::registry::{prover_kind_or_default, rules_by_names, ConfigError};
use crate::rules::{all_rules, RuleRef};
use crate::search::ProverConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A proof problem: goals to discharge and how to search for the proof
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofProblem {
    /// Problem ID
    pub id: String,

    /// Problem description (natural language)
    #[serde(default)]
    pub description: String,

    /// Goal diagrams in canonical text form
    pub goals: Vec<String>,

    /// Optional: prover name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prover: Option<String>,

    /// Optional: strategy name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Optional: names of the rules to search with (all rules otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,

    /// Optional: depth bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Optional: whether a proof is expected (for validation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provable: Option<bool>,
}

impl ProofProblem {
    /// Parse a problem from JSON
    pub fn from_json(json: &str) -> LoadResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert problem to initial goal state
    pub fn to_goal_state(&self) -> LoadResult<GoalState> {
        self.goals
            .iter()
            .enumerate()
            .map(|(index, text)| {
                read_diagram(text).map_err(|source| LoadError::InvalidGoal { index, source })
            })
            .collect()
    }

    /// Prover settings, unknown names replaced by the defaults
    pub fn prover_config(&self) -> ProverConfig {
        let mut config = ProverConfig::default();
        if let Some(name) = &self.prover {
            config.kind = prover_kind_or_default(name);
        }
        if let Some(name) = &self.strategy {
            config.strategy = name.clone();
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        config
    }

    /// The rules named by the problem, or every rule
    pub fn resolve_rules(&self) -> LoadResult<Vec<RuleRef>> {
        match &self.rules {
            Some(names) => Ok(rules_by_names(names)?),
            None => Ok(all_rules()),
        }
    }
}

/// Problem loader result
pub type LoadResult<T> = Result<T, LoadError>;

/// Problem loading errors
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid goal #{index}: {source}")]
    InvalidGoal { index: usize, source: ReadError },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ProverKind;

    const PROBLEM: &str = r#"{
        "id": "conj_001",
        "description": "Drop a conjunct",
        "goals": ["BinarySD {operator = \"op &\", arg1 = NullSD {}, arg2 = NullSD {}}"],
        "prover": "best_first",
        "strategy": "connective_count",
        "rules": ["conjunction_elimination"],
        "max_depth": 4
    }"#;

    #[test]
    fn test_problem_to_goal_state() {
        let problem = ProofProblem::from_json(PROBLEM).unwrap();
        let goals = problem.to_goal_state().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals.connective_count(), 1);
    }

    #[test]
    fn test_problem_settings() {
        let problem = ProofProblem::from_json(PROBLEM).unwrap();
        let config = problem.prover_config();
        assert_eq!(config.kind, ProverKind::BestFirst);
        assert_eq!(config.strategy, "connective_count");
        assert_eq!(config.max_depth, 4);

        let rules = problem.resolve_rules().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].id(), "conjunction_elimination");
    }

    #[test]
    fn test_minimal_problem_uses_defaults() {
        let problem = ProofProblem::from_json(r#"{"id": "p", "goals": []}"#).unwrap();
        assert_eq!(problem.prover_config(), ProverConfig::default());
        assert_eq!(problem.resolve_rules().unwrap().len(), all_rules().len());
        assert!(problem.to_goal_state().unwrap().is_empty());
    }

    #[test]
    fn test_bad_goal_reports_index() {
        let json = r#"{"id": "p", "goals": ["NullSD {}", "NotADiagram"]}"#;
        let problem = ProofProblem::from_json(json).unwrap();
        assert!(matches!(
            problem.to_goal_state(),
            Err(LoadError::InvalidGoal { index: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_rule_is_an_error() {
        let json = r#"{"id": "p", "goals": [], "rules": ["modus_ponens"]}"#;
        let problem = ProofProblem::from_json(json).unwrap();
        assert!(matches!(problem.resolve_rules(), Err(LoadError::Config(_))));
    }
}
