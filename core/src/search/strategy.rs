//! Search strategies
//!
//! A strategy ranks partial proofs for the automatic prover: `cost` is what
//! a proof has taken so far, `heuristic` estimates what is still missing.
//! Neither needs to be admissible; they only order the frontier.

use crate::ir::{GoalState, Operator, ProofTrace};
use crate::rules::tautology::is_trivial_implication;
use thiserror::Error;

/// A heuristic that has no estimate for the given proof
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StrategyError {
    #[error("strategy {strategy} cannot estimate this proof: {reason}")]
    Inapplicable { strategy: &'static str, reason: String },
}

/// Result type for heuristic estimates
pub type StrategyResult<T> = Result<T, StrategyError>;

/// Cost and heuristic functions over partial proofs
pub trait Strategy: Send + Sync {
    /// Stable name, used for lookup
    fn name(&self) -> &'static str;

    /// Cost of the proof so far; defaults to the number of applications
    fn cost(&self, proof: &ProofTrace) -> u32 {
        u32::try_from(proof.application_count()).unwrap_or(u32::MAX)
    }

    /// Estimated remaining effort
    fn heuristic(&self, proof: &ProofTrace) -> StrategyResult<u32>;
}

/// No guidance: plain breadth-first search
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStrategy;

impl Strategy for NoStrategy {
    fn name(&self) -> &'static str {
        "none"
    }

    fn heuristic(&self, _proof: &ProofTrace) -> StrategyResult<u32> {
        Ok(0)
    }
}

/// Counts the compound nodes left in the open subgoals
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectiveCountStrategy;

impl Strategy for ConnectiveCountStrategy {
    fn name(&self) -> &'static str {
        "connective_count"
    }

    fn heuristic(&self, proof: &ProofTrace) -> StrategyResult<u32> {
        Ok(saturate(proof.last_goals().connective_count()))
    }
}

/// Estimates only goals that are all implications
///
/// A trivial implication costs nothing; any other is estimated by its
/// connective count.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImplicationStrategy;

impl ImplicationStrategy {
    fn estimate(&self, goals: &GoalState) -> StrategyResult<u32> {
        let mut total = 0usize;
        for (i, goal) in goals.iter().enumerate() {
            if !goal.is_compound_of(Operator::Implication) {
                return Err(StrategyError::Inapplicable {
                    strategy: self.name(),
                    reason: format!("subgoal {} is not an implication", i),
                });
            }
            if !is_trivial_implication(goal) {
                total += goal.connective_count();
            }
        }
        Ok(saturate(total))
    }
}

impl Strategy for ImplicationStrategy {
    fn name(&self) -> &'static str {
        "implication"
    }

    fn heuristic(&self, proof: &ProofTrace) -> StrategyResult<u32> {
        self.estimate(proof.last_goals())
    }
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
