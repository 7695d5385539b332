//! Intermediate Representation (IR) module for spider-diagram proofs
//!
//! This module provides the core data structures for representing proofs:
//! - **zones**: zones and regions of primary diagrams
//! - **diagram**: immutable, structurally shared spider diagrams
//! - **transform**: top-down rewriting of diagrams
//! - **occurrence**: sub-diagrams addressed by enumeration index
//! - **text**: the canonical textual form and its reader
//! - **goals**: goal states, the open obligations of a proof
//! - **proof**: proof traces with undo and serialization
//!
//! # Example
//!
//! ```rust
//! use spider_reasoner_core::ir::*;
//!
//! // A spider living in the zone inside A but outside B
//! let zone = Zone::new(["A"], ["B"]);
//! let a = SpiderDiagram::primary(["s"], [("s", Region::from([zone.clone()]))], []).unwrap();
//! let no_habitats: Vec<(String, Region)> = Vec::new();
//! let b = SpiderDiagram::primary(Vec::<String>::new(), no_habitats, [zone]).unwrap();
//!
//! // Goals are diagrams still to be shown
//! let goals = GoalState::single(SpiderDiagram::implication(a, b));
//!
//! // Sub-diagrams are addressed by their parent-first index
//! assert_eq!(goals.occurrences_at(0).unwrap().len(), 3);
//!
//! // Every diagram round-trips through its text
//! let text = goals.subgoal(0).unwrap().to_string();
//! assert_eq!(read_diagram(&text).unwrap(), goals.subgoal(0).unwrap().clone());
//! ```

mod diagram;
mod goals;
mod occurrence;
mod proof;
mod text;
mod transform;
mod zones;

// Re-export all public items for convenient access
pub use diagram::{
    CompoundDiagram, ConstructionError, ConstructionResult, Operator, PrimaryDiagram, SpiderDiagram,
};
pub use goals::GoalState;
pub use occurrence::Occurrence;
pub use proof::{
    ApplicationKind, ProofError, ProofResult, ProofStatistics, ProofTrace, RuleApplication,
};
pub use text::{read_diagram, ReadError, ReadResult};
pub use transform::{Action, AncestorIter, Ancestors, Flow, Transformed, Transformer, VisitContext};
pub use zones::{Region, Zone};
