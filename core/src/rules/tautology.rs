//! Closing rules

use super::args::{ArgKind, RuleArg};
use super::candidates::CandidateTarget;
use super::{not_applicable, resolve, rewrite_at, single_target, InferenceRule, RuleResult};
use crate::ir::{GoalState, Operator, SpiderDiagram};

/// Trivial implication: P → P ⇒ true
///
/// The implication is replaced by the null diagram. When it is a whole
/// subgoal, that subgoal is closed.
pub struct TrivialImplicationTautology;

impl InferenceRule for TrivialImplicationTautology {
    fn id(&self) -> &'static str {
        "trivial_implication_tautology"
    }

    fn description(&self) -> &'static str {
        "Discharge an implication whose premise and conclusion are equivalent"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let (_, occurrence) = resolve(goals, target)?;
        if !is_trivial_implication(occurrence.diagram()) {
            return Err(not_applicable(
                self,
                "target is not an implication between equivalent diagrams",
            ));
        }
        rewrite_at(goals, target, SpiderDiagram::Null)
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| is_trivial_implication(occurrence.diagram()))
            .map(CandidateTarget::at)
            .collect()
    }
}

/// Whether `diagram` is P → C with P and C known to be equivalent
pub(crate) fn is_trivial_implication(diagram: &SpiderDiagram) -> bool {
    match diagram.as_compound() {
        Some(compound) if compound.operator() == Operator::Implication => {
            match (compound.operand(0), compound.operand(1)) {
                (Some(premise), Some(conclusion)) => premise.equals_semantically(conclusion),
                _ => false,
            }
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{shaded, spider_in};
    use crate::rules::SubDiagramIndex;

    #[test]
    fn test_trivial_implication_closes_subgoal() {
        let goals = GoalState::new(vec![
            SpiderDiagram::implication(spider_in("A"), spider_in("A")),
            shaded("B"),
        ]);
        let arg = RuleArg::SubDiagram(SubDiagramIndex::new(0, 0));
        let result = TrivialImplicationTautology.apply(&arg, &goals).unwrap();
        assert_eq!(result, GoalState::single(shaded("B")));
    }

    #[test]
    fn test_nested_trivial_implication_becomes_null() {
        let goals = GoalState::single(SpiderDiagram::conjunction(
            shaded("B"),
            SpiderDiagram::implication(spider_in("A"), spider_in("A")),
        ));
        let arg = RuleArg::SubDiagram(SubDiagramIndex::new(0, 2));
        let result = TrivialImplicationTautology.apply(&arg, &goals).unwrap();
        assert_eq!(
            result,
            GoalState::single(SpiderDiagram::conjunction(shaded("B"), SpiderDiagram::Null))
        );
    }

    #[test]
    fn test_different_sides_are_not_trivial() {
        let d = SpiderDiagram::implication(spider_in("A"), shaded("A"));
        assert!(!is_trivial_implication(&d));
        assert!(TrivialImplicationTautology.possible_applications(&d).is_empty());
    }
}
