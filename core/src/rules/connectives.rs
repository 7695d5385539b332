//! Rewrites of binary connectives

use super::args::{ArgKind, RuleArg};
use super::candidates::CandidateTarget;
use super::{not_applicable, resolve, rewrite_at, single_target, InferenceRule, RuleResult};
use crate::ir::{CompoundDiagram, GoalState, Operator, SpiderDiagram};
use std::sync::Arc;

/// Commutativity: A ∘ B ⇒ B ∘ A for ∧, ∨ and ↔
pub struct Commutativity;

impl InferenceRule for Commutativity {
    fn id(&self) -> &'static str {
        "commutativity"
    }

    fn description(&self) -> &'static str {
        "Swap the operands of a conjunction, disjunction or equivalence"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let (_, occurrence) = resolve(goals, target)?;
        let compound = commutative(occurrence.diagram())
            .ok_or_else(|| not_applicable(self, "target is not a commutative connective"))?;
        let mut operands = compound.operands().to_vec();
        operands.swap(0, 1);
        let swapped = SpiderDiagram::compound(compound.operator(), operands)?;
        rewrite_at(goals, target, swapped)
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| commutative(occurrence.diagram()).is_some())
            .map(CandidateTarget::at)
            .collect()
    }
}

fn commutative(diagram: &SpiderDiagram) -> Option<&Arc<CompoundDiagram>> {
    diagram
        .as_compound()
        .filter(|compound| compound.operator().is_commutative())
}

/// Idempotency: X ∧ X ⇒ X and X ∨ X ⇒ X
///
/// Operands only need to be semantically equal.
pub struct Idempotency;

impl InferenceRule for Idempotency {
    fn id(&self) -> &'static str {
        "idempotency"
    }

    fn description(&self) -> &'static str {
        "Collapse a conjunction or disjunction of equivalent operands"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SubDiagram
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let target = single_target(self, arg)?;
        let (_, occurrence) = resolve(goals, target)?;
        let operand = idempotent_operand(occurrence.diagram())
            .ok_or_else(|| not_applicable(self, "operands are not known to be equivalent"))?;
        rewrite_at(goals, target, operand.clone())
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        diagram
            .occurrences()
            .into_iter()
            .filter(|occurrence| idempotent_operand(occurrence.diagram()).is_some())
            .map(CandidateTarget::at)
            .collect()
    }
}

fn idempotent_operand(diagram: &SpiderDiagram) -> Option<&SpiderDiagram> {
    let compound = diagram.as_compound()?;
    if !matches!(compound.operator(), Operator::Conjunction | Operator::Disjunction) {
        return None;
    }
    let (left, right) = (compound.operand(0)?, compound.operand(1)?);
    left.equals_semantically(right).then_some(left)
}
