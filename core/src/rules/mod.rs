//! Inference rules over spider-diagram goals
//!
//! Every rule turns a goal state into a new goal state, replacing the
//! addressed subgoal with zero or more successors, and knows how to find
//! the places where it could be applied.

pub mod args;
pub mod candidates;
pub mod conjunction;
pub mod connectives;
pub mod negation;
pub mod spiders;
pub mod tautology;

pub use args::{ArgKind, RuleArg, SubDiagramIndex};
pub use candidates::{
    generate, generate_for_subgoal, CandidateDetail, CandidateTarget, PossibleRuleApplication,
};
pub use conjunction::{ConjunctionElimination, SplitConjunction};
pub use connectives::{Commutativity, Idempotency};
pub use negation::{DoubleNegationElimination, DoubleNegationIntroduction};
pub use spiders::SplitSpiders;
pub use tautology::TrivialImplicationTautology;

use crate::ir::{ConstructionError, GoalState, Occurrence, SpiderDiagram};
use std::sync::Arc;
use thiserror::Error;

/// Reasons a rule cannot be applied with a given argument
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("there are no subgoals to apply the rule to")]
    NoSubgoals,

    #[error("rule {rule} expects {expected} as its argument")]
    InvalidArgument { rule: &'static str, expected: ArgKind },

    #[error("subgoal {index} does not exist (there are {count} subgoals)")]
    SubgoalOutOfRange { index: usize, count: usize },

    #[error("subgoal {subgoal} has no sub-diagram at occurrence {occurrence}")]
    OccurrenceNotFound { subgoal: usize, occurrence: usize },

    #[error("rule {rule} is not applicable: {reason}")]
    NotApplicable { rule: &'static str, reason: String },

    #[error("rule produced an invalid diagram: {0}")]
    Construction(#[from] ConstructionError),
}

/// Result type for rule applications
pub type RuleResult<T> = Result<T, RuleError>;

/// Inference rule trait - all rules implement this
///
/// Rules are pure: `apply` never touches its inputs.
pub trait InferenceRule: Send + Sync {
    /// Stable identifier, used for lookup and in recorded proofs
    fn id(&self) -> &'static str;

    /// Human-readable summary
    fn description(&self) -> &'static str;

    /// Shape of argument this rule accepts
    fn arg_kind(&self) -> ArgKind;

    /// Most subgoals one application can put in place of the target subgoal
    fn max_split(&self) -> usize {
        1
    }

    /// Apply the rule, producing the next goal state
    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState>;

    /// Every place in `diagram` where this rule could be applied
    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget>;
}

/// Shared, dynamically dispatched rule handle
pub type RuleRef = Arc<dyn InferenceRule>;

/// Get all available inference rules
pub fn all_rules() -> Vec<RuleRef> {
    let mut rules: Vec<RuleRef> = Vec::new();

    // Conjunction rules (2)
    rules.push(Arc::new(ConjunctionElimination));
    rules.push(Arc::new(SplitConjunction));

    // Negation rules (2)
    rules.push(Arc::new(DoubleNegationElimination));
    rules.push(Arc::new(DoubleNegationIntroduction));

    // Connective rewriting (2)
    rules.push(Arc::new(Commutativity));
    rules.push(Arc::new(Idempotency));

    // Closing rules (1)
    rules.push(Arc::new(TrivialImplicationTautology));

    // Primary diagram rules (1)
    rules.push(Arc::new(SplitSpiders));

    rules
}

/// The subgoal addressed by `index`, checking the goal state preconditions
pub(crate) fn subgoal_at(goals: &GoalState, index: usize) -> RuleResult<&SpiderDiagram> {
    if goals.is_empty() {
        return Err(RuleError::NoSubgoals);
    }
    goals.subgoal(index).ok_or(RuleError::SubgoalOutOfRange {
        index,
        count: goals.len(),
    })
}

/// Resolve a sub-diagram index to its subgoal and occurrence
pub(crate) fn resolve(
    goals: &GoalState,
    target: SubDiagramIndex,
) -> RuleResult<(&SpiderDiagram, Occurrence)> {
    let subgoal = subgoal_at(goals, target.subgoal)?;
    let occurrence = subgoal
        .occurrence(target.occurrence)
        .ok_or(RuleError::OccurrenceNotFound {
            subgoal: target.subgoal,
            occurrence: target.occurrence,
        })?;
    Ok((subgoal, occurrence))
}

/// Unpack a single-target argument
pub(crate) fn single_target(
    rule: &dyn InferenceRule,
    arg: &RuleArg,
) -> RuleResult<SubDiagramIndex> {
    match arg {
        RuleArg::SubDiagram(target) => Ok(*target),
        _ => Err(RuleError::InvalidArgument {
            rule: rule.id(),
            expected: rule.arg_kind(),
        }),
    }
}

/// Goal state with the target occurrence replaced inside its subgoal
pub(crate) fn rewrite_at(
    goals: &GoalState,
    target: SubDiagramIndex,
    replacement: SpiderDiagram,
) -> RuleResult<GoalState> {
    let subgoal = subgoal_at(goals, target.subgoal)?;
    let rewritten = subgoal
        .replace_at(target.occurrence, replacement)
        .ok_or(RuleError::OccurrenceNotFound {
            subgoal: target.subgoal,
            occurrence: target.occurrence,
        })?;
    goals
        .replace_subgoal(target.subgoal, vec![rewritten])
        .ok_or(RuleError::SubgoalOutOfRange {
            index: target.subgoal,
            count: goals.len(),
        })
}

pub(crate) fn not_applicable(rule: &dyn InferenceRule, reason: impl Into<String>) -> RuleError {
    RuleError::NotApplicable {
        rule: rule.id(),
        reason: reason.into(),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::ir::{Region, SpiderDiagram, Zone};

    /// Primary diagram with one spider in the zone inside `contour`
    pub fn spider_in(contour: &str) -> SpiderDiagram {
        let zone = Zone::new([contour], Vec::<String>::new());
        SpiderDiagram::primary(["s"], [("s", Region::from([zone]))], []).unwrap()
    }

    /// Primary diagram whose only zone, inside `contour`, is shaded
    pub fn shaded(contour: &str) -> SpiderDiagram {
        let zone = Zone::new([contour], Vec::<String>::new());
        SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), [zone])
            .unwrap()
    }

    /// Primary diagram carrying no information at all
    pub fn empty_primary() -> SpiderDiagram {
        SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), []).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let rules = all_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_empty_goals_rejected_by_every_rule() {
        let arg = RuleArg::SubDiagram(SubDiagramIndex::new(0, 0));
        for rule in all_rules() {
            let err = rule.apply(&arg, &GoalState::empty()).unwrap_err();
            assert!(
                matches!(err, RuleError::NoSubgoals | RuleError::InvalidArgument { .. }),
                "{}: {:?}",
                rule.id(),
                err
            );
        }
    }
}
