//! Proof traces
//!
//! A proof trace is the sequence of goal states visited by a proof, starting
//! with the initial goals, together with the rule application that produced
//! each subsequent state. A trace is finished when its last goal state has
//! no subgoals left.

use super::goals::GoalState;
use crate::rules::{InferenceRule, RuleArg, RuleRef, RuleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Errors that can occur during proof trace operations
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid proof trace: {0}")]
    InvalidTrace(String),

    #[error("Unknown rule in proof: {0}")]
    UnknownRule(String),

    #[error("Step {step} does not replay: {reason}")]
    ReplayMismatch { step: usize, reason: String },
}

/// Result type for proof operations
pub type ProofResult<T> = Result<T, ProofError>;

/// How a rule application came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// Chosen by a user
    Interactive,
    /// Found by the automatic prover
    Automatic,
    /// Produced by a tactic
    Tactic,
}

/// A recorded application of an inference rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleApplication {
    /// Identifier of the inference rule applied
    pub rule_id: String,

    /// The argument the rule was applied with
    pub arg: RuleArg,

    pub kind: ApplicationKind,
}

impl RuleApplication {
    pub fn new(rule_id: impl Into<String>, arg: RuleArg, kind: ApplicationKind) -> Self {
        Self {
            rule_id: rule_id.into(),
            arg,
            kind,
        }
    }
}

impl fmt::Display for RuleApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rule_id, self.arg)
    }
}

/// Complete trace of a proof attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawProofTrace")]
pub struct ProofTrace {
    /// Goal states, the initial one first
    goals: Vec<GoalState>,

    /// `applications[i]` leads from `goals[i]` to `goals[i + 1]`
    applications: Vec<RuleApplication>,

    /// Additional metadata about the proof
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

/// Unchecked wire form of a trace
#[derive(Deserialize)]
struct RawProofTrace {
    goals: Vec<GoalState>,
    applications: Vec<RuleApplication>,
    #[serde(default)]
    metadata: BTreeMap<String, String>,
}

impl TryFrom<RawProofTrace> for ProofTrace {
    type Error = ProofError;

    fn try_from(raw: RawProofTrace) -> ProofResult<Self> {
        if raw.goals.len() != raw.applications.len() + 1 {
            return Err(ProofError::InvalidTrace(format!(
                "{} goal states for {} applications",
                raw.goals.len(),
                raw.applications.len()
            )));
        }
        Ok(Self {
            goals: raw.goals,
            applications: raw.applications,
            metadata: raw.metadata,
        })
    }
}

impl ProofTrace {
    /// Create a trace holding only the initial goals
    pub fn new(initial: GoalState) -> Self {
        Self {
            goals: vec![initial],
            applications: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn goals(&self) -> &[GoalState] {
        &self.goals
    }

    pub fn applications(&self) -> &[RuleApplication] {
        &self.applications
    }

    pub fn initial_goals(&self) -> &GoalState {
        &self.goals[0]
    }

    /// The current goals
    pub fn last_goals(&self) -> &GoalState {
        // a trace always holds at least its initial state
        &self.goals[self.goals.len() - 1]
    }

    /// Number of goal states, including the initial one
    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn application_count(&self) -> usize {
        self.applications.len()
    }

    /// Check if the proof has no open subgoals left
    pub fn is_finished(&self) -> bool {
        self.last_goals().is_empty()
    }

    /// Apply a rule to the current goals
    ///
    /// On failure the trace is left as it was.
    pub fn apply_rule(
        &mut self,
        rule: &dyn InferenceRule,
        arg: RuleArg,
        kind: ApplicationKind,
    ) -> RuleResult<()> {
        let next = rule.apply(&arg, self.last_goals())?;
        self.push_step(next, RuleApplication::new(rule.id(), arg, kind));
        Ok(())
    }

    /// Append a goal state that was already computed from the current one
    pub fn push_step(&mut self, goals: GoalState, application: RuleApplication) {
        self.goals.push(goals);
        self.applications.push(application);
    }

    /// Remove the last application and the state it produced
    ///
    /// Returns `false` if only the initial state is left.
    pub fn undo_step(&mut self) -> bool {
        if self.applications.is_empty() {
            return false;
        }
        self.applications.pop();
        self.goals.pop();
        true
    }

    /// Add metadata entry
    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get metadata value
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> ProofResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serialize to compact JSON string
    pub fn to_json_compact(&self) -> ProofResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> ProofResult<Self> {
        let raw: RawProofTrace = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Re-apply every recorded step and check it produces the recorded state
    pub fn verify(&self, rules: &[RuleRef]) -> ProofResult<()> {
        for (step, application) in self.applications.iter().enumerate() {
            let rule = rules
                .iter()
                .find(|rule| rule.id() == application.rule_id)
                .ok_or_else(|| ProofError::UnknownRule(application.rule_id.clone()))?;
            let next = rule
                .apply(&application.arg, &self.goals[step])
                .map_err(|err| ProofError::ReplayMismatch {
                    step,
                    reason: err.to_string(),
                })?;
            if next != self.goals[step + 1] {
                return Err(ProofError::ReplayMismatch {
                    step,
                    reason: "rule produced different goals".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Get statistics about the proof
    pub fn statistics(&self) -> ProofStatistics {
        let mut rules_used = BTreeMap::new();
        for application in &self.applications {
            *rules_used.entry(application.rule_id.clone()).or_insert(0) += 1;
        }

        ProofStatistics {
            num_steps: self.applications.len(),
            max_subgoals: self.goals.iter().map(GoalState::len).max().unwrap_or(0),
            open_subgoals: self.last_goals().len(),
            finished: self.is_finished(),
            rules_used,
        }
    }
}

impl fmt::Display for ProofTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.goals[0])?;
        for (application, goals) in self.applications.iter().zip(&self.goals[1..]) {
            writeln!(f, "  by {}", application)?;
            writeln!(f, "{}", goals)?;
        }
        Ok(())
    }
}

/// Statistics about a proof trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStatistics {
    /// Total number of rule applications
    pub num_steps: usize,

    /// Largest number of subgoals open at any point
    pub max_subgoals: usize,

    /// Subgoals still open at the end
    pub open_subgoals: usize,

    /// Whether the proof was completed
    pub finished: bool,

    /// Count of how many times each rule was used
    pub rules_used: BTreeMap<String, usize>,
}

impl ProofStatistics {
    /// Get the most frequently used rule
    pub fn most_used_rule(&self) -> Option<(&str, usize)> {
        self.rules_used
            .iter()
            .max_by_key(|(_, count)| *count)
            .map(|(rule, count)| (rule.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::SpiderDiagram;
    use crate::rules::test_support::{empty_primary, shaded, spider_in};
    use crate::rules::{
        all_rules, Commutativity, ConjunctionElimination, DoubleNegationIntroduction, RuleError,
        SubDiagramIndex,
    };

    fn at(occurrence: usize) -> RuleArg {
        RuleArg::SubDiagram(SubDiagramIndex::new(0, occurrence))
    }

    fn sample() -> ProofTrace {
        ProofTrace::new(GoalState::single(SpiderDiagram::conjunction(
            spider_in("A"),
            shaded("B"),
        )))
    }

    #[test]
    fn test_new_trace() {
        let trace = sample();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace.application_count(), 0);
        assert!(!trace.is_finished());
        assert_eq!(trace.initial_goals(), trace.last_goals());
    }

    #[test]
    fn test_empty_initial_goals_are_finished() {
        let trace = ProofTrace::new(GoalState::empty());
        assert!(trace.is_finished());
    }

    #[test]
    fn test_apply_rule_appends_one_step() {
        let mut trace = sample();
        trace
            .apply_rule(&Commutativity, at(0), ApplicationKind::Interactive)
            .unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.applications()[0].rule_id, "commutativity");
        assert_eq!(trace.applications()[0].kind, ApplicationKind::Interactive);
    }

    #[test]
    fn test_failed_application_leaves_trace_unchanged() {
        let mut trace = sample();
        let before = trace.clone();
        let err = trace
            .apply_rule(&Commutativity, at(9), ApplicationKind::Interactive)
            .unwrap_err();
        assert!(matches!(err, RuleError::OccurrenceNotFound { .. }));
        assert_eq!(trace, before);
    }

    #[test]
    fn test_undo_is_inverse_of_apply() {
        let mut trace = sample();
        trace
            .apply_rule(&DoubleNegationIntroduction, at(1), ApplicationKind::Automatic)
            .unwrap();
        let before = trace.clone();

        trace
            .apply_rule(&Commutativity, at(0), ApplicationKind::Automatic)
            .unwrap();
        assert!(trace.undo_step());
        assert_eq!(trace, before);

        assert!(trace.undo_step());
        assert!(!trace.undo_step());
        assert_eq!(trace.len(), 1);
    }

    #[test]
    fn test_finished_after_closing_step() {
        let mut trace = ProofTrace::new(GoalState::single(SpiderDiagram::conjunction(
            empty_primary(),
            spider_in("A"),
        )));
        let arg = RuleArg::Multiple(vec![SubDiagramIndex::new(0, 0), SubDiagramIndex::new(0, 1)]);
        trace
            .apply_rule(&ConjunctionElimination, arg, ApplicationKind::Interactive)
            .unwrap();
        assert!(trace.is_finished());
    }

    #[test]
    fn test_trace_metadata() {
        let mut trace = sample();
        trace.add_metadata("problem", "conj_01");
        assert_eq!(trace.get_metadata("problem"), Some("conj_01"));
        assert_eq!(trace.get_metadata("nonexistent"), None);
    }

    #[test]
    fn test_json_serialization_roundtrip() {
        let mut trace = sample();
        trace.add_metadata("prover", "breadth_first");
        trace
            .apply_rule(&Commutativity, at(0), ApplicationKind::Automatic)
            .unwrap();

        let json = trace.to_json().unwrap();
        let restored = ProofTrace::from_json(&json).unwrap();
        assert_eq!(restored, trace);
        assert!(restored.verify(&all_rules()).is_ok());
    }

    #[test]
    fn test_compact_json() {
        let trace = sample();
        let compact = trace.to_json_compact().unwrap();
        let pretty = trace.to_json().unwrap();

        assert!(compact.len() < pretty.len());
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_from_json_rejects_misaligned_trace() {
        let json = r#"{"goals": [], "applications": []}"#;
        assert!(matches!(
            ProofTrace::from_json(json),
            Err(ProofError::InvalidTrace(_))
        ));
    }

    #[test]
    fn test_plain_deserialize_rejects_misaligned_trace() {
        let empty = serde_json::from_str::<ProofTrace>(r#"{"goals": [], "applications": []}"#);
        let err = empty.unwrap_err();
        assert!(err.to_string().contains("0 goal states for 0 applications"));

        let trace = sample();
        let mut value = serde_json::to_value(&trace).unwrap();
        value["goals"] = serde_json::json!([trace.initial_goals(), trace.initial_goals()]);
        assert!(serde_json::from_value::<ProofTrace>(value).is_err());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let mut trace = sample();
        trace
            .apply_rule(&Commutativity, at(0), ApplicationKind::Automatic)
            .unwrap();
        let mut tampered = ProofTrace::new(trace.initial_goals().clone());
        tampered.push_step(
            GoalState::single(spider_in("Z")),
            trace.applications()[0].clone(),
        );
        assert!(matches!(
            tampered.verify(&all_rules()),
            Err(ProofError::ReplayMismatch { step: 0, .. })
        ));

        let mut unknown = ProofTrace::new(trace.initial_goals().clone());
        unknown.push_step(
            trace.last_goals().clone(),
            RuleApplication::new("no_such_rule", at(0), ApplicationKind::Tactic),
        );
        assert!(matches!(
            unknown.verify(&all_rules()),
            Err(ProofError::UnknownRule(_))
        ));
    }

    #[test]
    fn test_proof_statistics() {
        let mut trace = sample();
        for _ in 0..2 {
            trace
                .apply_rule(&Commutativity, at(0), ApplicationKind::Automatic)
                .unwrap();
        }
        trace
            .apply_rule(&DoubleNegationIntroduction, at(1), ApplicationKind::Automatic)
            .unwrap();

        let stats = trace.statistics();
        assert_eq!(stats.num_steps, 3);
        assert_eq!(stats.max_subgoals, 1);
        assert!(!stats.finished);

        let (most_used, count) = stats.most_used_rule().unwrap();
        assert_eq!(most_used, "commutativity");
        assert_eq!(count, 2);
    }
}
