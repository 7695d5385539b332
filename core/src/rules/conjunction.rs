//! Conjunction rules

use super::args::{ArgKind, RuleArg};
use super::candidates::CandidateTarget;
use super::{
    not_applicable, resolve, rewrite_at, single_target, subgoal_at, InferenceRule, RuleError,
    RuleResult,
};
use crate::ir::{GoalState, Operator, SpiderDiagram};

/// Conjunction elimination: A ∧ B ⇒ A (or B)
///
/// Takes two targets in the same subgoal: the conjunction and the operand
/// to keep.
pub struct ConjunctionElimination;

impl InferenceRule for ConjunctionElimination {
    fn id(&self) -> &'static str {
        "conjunction_elimination"
    }

    fn description(&self) -> &'static str {
        "Replace a conjunction with one of its operands"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::Multiple
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let (conjunction, kept) = match arg {
            RuleArg::Multiple(targets) if targets.len() == 2 => (targets[0], targets[1]),
            _ => {
                return Err(RuleError::InvalidArgument {
                    rule: self.id(),
                    expected: self.arg_kind(),
                })
            }
        };
        if conjunction.subgoal != kept.subgoal {
            return Err(not_applicable(self, "both targets must be in the same subgoal"));
        }

        let (_, target) = resolve(goals, conjunction)?;
        if target.operator() != Some(Operator::Conjunction) {
            return Err(not_applicable(self, "target is not a conjunction"));
        }
        let operand = target
            .operands()
            .into_iter()
            .find(|operand| operand.index() == kept.occurrence)
            .ok_or_else(|| {
                not_applicable(self, "the kept diagram is not an operand of the conjunction")
            })?;

        rewrite_at(goals, conjunction, operand.diagram().clone())
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| occurrence.operator() == Some(Operator::Conjunction))
            .flat_map(|occurrence| {
                occurrence
                    .operands()
                    .into_iter()
                    .map(move |operand| CandidateTarget::with_operand(occurrence.clone(), operand))
            })
            .collect()
    }
}

/// Split conjunction: a subgoal A ∧ B becomes the two subgoals A and B
pub struct SplitConjunction;

impl InferenceRule for SplitConjunction {
    fn id(&self) -> &'static str {
        "split_conjunction"
    }

    fn description(&self) -> &'static str {
        "Split a conjunctive subgoal into one subgoal per conjunct"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn max_split(&self) -> usize {
        2
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let subgoal = subgoal_at(goals, target.subgoal)?;
        if target.occurrence != 0 {
            return Err(not_applicable(self, "only a whole subgoal can be split"));
        }
        let conjunction = subgoal
            .as_compound()
            .filter(|compound| compound.operator() == Operator::Conjunction)
            .ok_or_else(|| not_applicable(self, "subgoal is not a conjunction"))?;

        goals
            .replace_subgoal(target.subgoal, conjunction.operands().to_vec())
            .ok_or(RuleError::SubgoalOutOfRange {
                index: target.subgoal,
                count: goals.len(),
            })
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        if !diagram.is_compound_of(Operator::Conjunction) {
            return Vec::new();
        }
        diagram
            .occurrence(0)
            .map(CandidateTarget::at)
            .into_iter()
            .collect()
    }
}
