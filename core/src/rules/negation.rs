//! Double negation rules

use super::args::{ArgKind, RuleArg};
use super::candidates::CandidateTarget;
use super::{not_applicable, resolve, rewrite_at, single_target, InferenceRule, RuleResult};
use crate::ir::{GoalState, Operator, SpiderDiagram};

/// Double negation elimination: ¬¬X ⇒ X
pub struct DoubleNegationElimination;

impl InferenceRule for DoubleNegationElimination {
    fn id(&self) -> &'static str {
        "double_negation_elimination"
    }

    fn description(&self) -> &'static str {
        "Remove two consecutive negations"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let (_, occurrence) = resolve(goals, target)?;
        let inner = double_negated(occurrence.diagram())
            .ok_or_else(|| not_applicable(self, "target is not a double negation"))?;
        rewrite_at(goals, target, inner.clone())
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| double_negated(occurrence.diagram()).is_some())
            .map(CandidateTarget::at)
            .collect()
    }
}

/// The X of ¬¬X
fn double_negated(diagram: &SpiderDiagram) -> Option<&SpiderDiagram> {
    let outer = diagram.as_compound()?;
    if outer.operator() != Operator::Negation {
        return None;
    }
    let inner = outer.operand(0)?.as_compound()?;
    if inner.operator() != Operator::Negation {
        return None;
    }
    inner.operand(0)
}

/// Double negation introduction: X ⇒ ¬¬X
///
/// Applies anywhere, but only leaves are offered as candidates.
pub struct DoubleNegationIntroduction;

impl InferenceRule for DoubleNegationIntroduction {
    fn id(&self) -> &'static str {
        "double_negation_introduction"
    }

    fn description(&self) -> &'static str {
        "Wrap a diagram in two negations"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let (_, occurrence) = resolve(goals, target)?;
        let wrapped =
            SpiderDiagram::negation(SpiderDiagram::negation(occurrence.diagram().clone()));
        rewrite_at(goals, target, wrapped)
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| occurrence.operator().is_none())
            .map(CandidateTarget::at)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{shaded, spider_in};
    use crate::rules::{RuleError, SubDiagramIndex};

    fn at(occurrence: usize) -> RuleArg {
        RuleArg::SubDiagram(SubDiagramIndex::new(0, occurrence))
    }

    #[test]
    fn test_introduction_then_elimination_round_trips() {
        let goals = GoalState::single(SpiderDiagram::disjunction(spider_in("A"), shaded("B")));

        let introduced = DoubleNegationIntroduction.apply(&at(2), &goals).unwrap();
        assert_eq!(
            introduced,
            GoalState::single(SpiderDiagram::disjunction(
                spider_in("A"),
                SpiderDiagram::negation(SpiderDiagram::negation(shaded("B")))
            ))
        );

        let candidates =
            DoubleNegationElimination.possible_applications(introduced.subgoal(0).unwrap());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].target.index(), 2);

        let eliminated = DoubleNegationElimination.apply(&at(2), &introduced).unwrap();
        assert_eq!(eliminated, goals);
    }

    #[test]
    fn test_single_negation_is_not_eliminated() {
        let goals = GoalState::single(SpiderDiagram::negation(spider_in("A")));
        assert!(matches!(
            DoubleNegationElimination.apply(&at(0), &goals),
            Err(RuleError::NotApplicable { .. })
        ));
        assert!(DoubleNegationElimination
            .possible_applications(goals.subgoal(0).unwrap())
            .is_empty());
    }

    #[test]
    fn test_triple_negation_offers_both_positions() {
        let d = SpiderDiagram::negation(SpiderDiagram::negation(SpiderDiagram::negation(
            spider_in("A"),
        )));
        let indices: Vec<usize> = DoubleNegationElimination
            .possible_applications(&d)
            .iter()
            .map(|c| c.target.index())
            .collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn test_introduction_candidates_are_leaves() {
        let d = SpiderDiagram::implication(spider_in("A"), SpiderDiagram::Null);
        let indices: Vec<usize> = DoubleNegationIntroduction
            .possible_applications(&d)
            .iter()
            .map(|c| c.target.index())
            .collect();
        assert_eq!(indices, vec![1, 2]);
    }
}
