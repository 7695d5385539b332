//! Spider Reasoner Core
//!
//! Automatic proof search for spider diagrams

pub mod ir;       // Intermediate representation (diagrams, goals, proof traces)
pub mod rules;    // Inference rules and candidate generation
pub mod search;   // Automatic prover and strategies
pub mod registry; // Lookup of rules, strategies and provers by name
pub mod loader;   // Proof problem documents

pub use ir::*;
pub use rules::{
    all_rules, InferenceRule, RuleArg, RuleError, RuleRef, RuleResult, SubDiagramIndex,
};
pub use search::{
    AutomaticProver, CancellationFlag, ProverConfig, ProverKind, SearchResult, SearchStatus,
    Strategy,
};
pub use registry::{rule_by_name, strategy_by_name, ConfigError};
pub use loader::{LoadError, LoadResult, ProofProblem};
