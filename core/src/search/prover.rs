//! Automatic prover
//!
//! Best-first search over partial proofs: the frontier is a priority queue
//! of proof traces ranked by the strategy, ties broken by discovery order.
//! With a flat heuristic this is plain breadth-first search.

use crate::ir::{ApplicationKind, GoalState, ProofTrace, RuleApplication};
use crate::rules::{all_rules, generate, RuleRef};
use crate::search::strategy::{NoStrategy, Strategy};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// How the frontier is ranked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProverKind {
    /// Rank by cost only
    #[default]
    BreadthFirst,
    /// Rank by cost plus heuristic
    BestFirst,
}

/// Which goal states count as already visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Structurally equal goal states
    #[default]
    Structural,
    /// Goal states with equal normal forms
    Semantic,
}

/// Prover configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    pub kind: ProverKind,

    /// Name of the strategy ranking the frontier
    pub strategy: String,

    /// Maximum number of applications added to the seed proof
    pub max_depth: usize,

    /// Maximum number of proofs expanded
    pub max_states: usize,

    /// Maximum number of proofs waiting in the frontier
    pub max_frontier: usize,

    pub duplicates: DuplicatePolicy,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            kind: ProverKind::BreadthFirst,
            strategy: NoStrategy.name().to_string(),
            max_depth: 20,
            max_states: 10_000,
            max_frontier: 100_000,
            duplicates: DuplicatePolicy::Structural,
        }
    }
}

/// Cooperative cancellation signal, checked once per frontier pop
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, AtomicOrdering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(AtomicOrdering::Relaxed)
    }
}

/// Outcome of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// A finished proof was found
    Proved,
    /// No proof was found within the search space or bounds
    Exhausted,
    /// The search was cancelled
    Aborted,
}

/// Search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub status: SearchStatus,

    /// Final proof trace (if proved)
    pub proof: Option<ProofTrace>,

    /// Number of proofs popped and expanded
    pub states_explored: usize,

    /// Number of successful rule applications
    pub successors_generated: usize,

    /// Deepest expansion, counted from the seed
    pub depth_reached: usize,

    /// Whether any bound cut the search short
    pub bound_reached: bool,

    /// Largest number of proofs waiting in the frontier at once
    #[serde(default)]
    pub peak_frontier: usize,
}

impl SearchResult {
    pub fn is_proved(&self) -> bool {
        self.status == SearchStatus::Proved
    }
}

struct Node {
    rank: u64,
    seq: u64,
    trace: ProofTrace,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.seq == other.seq
    }
}

impl Eq for Node {}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node {
    // BinaryHeap is a max-heap: the lowest (rank, seq) must compare greatest
    fn cmp(&self, other: &Self) -> Ordering {
        (other.rank, other.seq).cmp(&(self.rank, self.seq))
    }
}

#[derive(Default)]
struct Counters {
    states_explored: usize,
    successors_generated: usize,
    depth_reached: usize,
    bound_reached: bool,
    peak_frontier: usize,
}

impl Counters {
    fn finish(self, status: SearchStatus, proof: Option<ProofTrace>) -> SearchResult {
        SearchResult {
            status,
            proof,
            states_explored: self.states_explored,
            successors_generated: self.successors_generated,
            depth_reached: self.depth_reached,
            bound_reached: self.bound_reached,
            peak_frontier: self.peak_frontier,
        }
    }
}

/// Automatic prover
pub struct AutomaticProver {
    config: ProverConfig,
    rules: Vec<RuleRef>,
    strategy: Arc<dyn Strategy>,
}

impl AutomaticProver {
    /// Create a prover over the given rules and strategy
    pub fn new(config: ProverConfig, rules: Vec<RuleRef>, strategy: Arc<dyn Strategy>) -> Self {
        Self {
            config,
            rules,
            strategy,
        }
    }

    /// Breadth-first prover over every known rule
    pub fn with_defaults() -> Self {
        Self::new(ProverConfig::default(), all_rules(), Arc::new(NoStrategy))
    }

    pub fn config(&self) -> &ProverConfig {
        &self.config
    }

    pub fn rules(&self) -> &[RuleRef] {
        &self.rules
    }

    pub fn strategy(&self) -> &dyn Strategy {
        self.strategy.as_ref()
    }

    /// Search for a proof of the given goals
    ///
    /// Trivially true subgoals are discharged before the search starts.
    pub fn generate_proof(&self, goals: GoalState) -> SearchResult {
        let seed = ProofTrace::new(goals.discharge_trivial());
        self.search(&seed, &CancellationFlag::new())
    }

    /// Continue an existing proof
    ///
    /// The returned trace starts with the given one. If no continuation is
    /// found, the given trace is returned unchanged.
    pub fn extend_proof(&self, proof: &ProofTrace) -> ProofTrace {
        self.search(proof, &CancellationFlag::new())
            .proof
            .unwrap_or_else(|| proof.clone())
    }

    /// Search for a finished continuation of `seed`
    pub fn search(&self, seed: &ProofTrace, cancel: &CancellationFlag) -> SearchResult {
        let mut counters = Counters::default();
        let base = seed.application_count();

        let mut visited: FxHashSet<GoalState> =
            seed.goals().iter().map(|goals| self.key(goals)).collect();
        let mut frontier = BinaryHeap::new();
        let mut seq = 0u64;
        frontier.push(Node {
            rank: self.rank(seed),
            seq,
            trace: seed.clone(),
        });
        counters.peak_frontier = frontier.len();

        loop {
            if cancel.is_cancelled() {
                info!(explored = counters.states_explored, "proof search aborted");
                return counters.finish(SearchStatus::Aborted, None);
            }
            let node = match frontier.pop() {
                Some(node) => node,
                None => break,
            };

            if node.trace.is_finished() {
                info!(
                    explored = counters.states_explored,
                    steps = node.trace.application_count(),
                    "proof found"
                );
                return counters.finish(SearchStatus::Proved, Some(node.trace));
            }

            if counters.states_explored >= self.config.max_states {
                counters.bound_reached = true;
                break;
            }
            counters.states_explored += 1;

            let depth = node.trace.application_count() - base;
            counters.depth_reached = counters.depth_reached.max(depth);
            if depth >= self.config.max_depth {
                counters.bound_reached = true;
                continue;
            }

            let goals = node.trace.last_goals();
            let candidates = generate(&self.rules, goals);
            let mut queued = 0usize;

            for (subgoal, candidate) in candidates {
                let arg = candidate.arg(subgoal);
                let next = match candidate.rule.apply(&arg, goals) {
                    Ok(next) => next,
                    Err(err) => {
                        trace!(rule = candidate.rule.id(), %arg, %err, "candidate rejected");
                        continue;
                    }
                };
                counters.successors_generated += 1;

                let key = self.key(&next);
                if visited.contains(&key) {
                    trace!(rule = candidate.rule.id(), %arg, "duplicate goal state");
                    continue;
                }
                // a state dropped here may be reached again once there is room
                if frontier.len() >= self.config.max_frontier {
                    counters.bound_reached = true;
                    continue;
                }
                visited.insert(key);

                let mut successor = node.trace.clone();
                successor.push_step(
                    next,
                    RuleApplication::new(candidate.rule.id(), arg, ApplicationKind::Automatic),
                );
                seq += 1;
                frontier.push(Node {
                    rank: self.rank(&successor),
                    seq,
                    trace: successor,
                });
                queued += 1;
            }

            counters.peak_frontier = counters.peak_frontier.max(frontier.len());
            debug!(depth, queued, frontier = frontier.len(), "expanded proof");
        }

        info!(
            explored = counters.states_explored,
            bound_reached = counters.bound_reached,
            "no proof found"
        );
        counters.finish(SearchStatus::Exhausted, None)
    }

    fn key(&self, goals: &GoalState) -> GoalState {
        match self.config.duplicates {
            DuplicatePolicy::Structural => goals.clone(),
            DuplicatePolicy::Semantic => goals.semantic_key(),
        }
    }

    fn rank(&self, proof: &ProofTrace) -> u64 {
        let cost = u64::from(self.strategy.cost(proof));
        match self.config.kind {
            ProverKind::BreadthFirst => cost,
            ProverKind::BestFirst => match self.strategy.heuristic(proof) {
                Ok(estimate) => cost + u64::from(estimate),
                Err(err) => {
                    trace!(%err, "heuristic unavailable, ranking by cost");
                    cost
                }
            },
        }
    }
}
