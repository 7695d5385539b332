//! Rule arguments
//!
//! An argument addresses one or more sub-diagrams of a goal state by
//! subgoal index and occurrence index. Occurrence indices are only valid
//! against the goal state they were computed on.

use crate::ir::Region;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A sub-diagram of one subgoal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubDiagramIndex {
    /// Index of the subgoal in the goal state
    pub subgoal: usize,

    /// Occurrence index of the sub-diagram within that subgoal
    pub occurrence: usize,
}

impl SubDiagramIndex {
    pub fn new(subgoal: usize, occurrence: usize) -> Self {
        Self {
            subgoal,
            occurrence,
        }
    }
}

impl fmt::Display for SubDiagramIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}@{}", self.subgoal, self.occurrence)
    }
}

/// The shape of argument a rule expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArgKind {
    SubDiagram,
    Multiple,
    SpiderRegion,
}

impl fmt::Display for ArgKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArgKind::SubDiagram => "a single sub-diagram",
            ArgKind::Multiple => "multiple sub-diagrams",
            ArgKind::SpiderRegion => "a spider and a region",
        })
    }
}

/// Argument of an inference rule application
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleArg {
    /// One target sub-diagram
    SubDiagram(SubDiagramIndex),

    /// Several coordinated targets, e.g. a conjunction and the operand to keep
    Multiple(Vec<SubDiagramIndex>),

    /// A spider inside a primary diagram and a region of its habitat
    SpiderRegion {
        target: SubDiagramIndex,
        spider: String,
        region: Region,
    },
}

impl RuleArg {
    pub fn kind(&self) -> ArgKind {
        match self {
            RuleArg::SubDiagram(_) => ArgKind::SubDiagram,
            RuleArg::Multiple(_) => ArgKind::Multiple,
            RuleArg::SpiderRegion { .. } => ArgKind::SpiderRegion,
        }
    }

    /// Every sub-diagram this argument addresses
    pub fn targets(&self) -> Vec<SubDiagramIndex> {
        match self {
            RuleArg::SubDiagram(target) => vec![*target],
            RuleArg::Multiple(targets) => targets.clone(),
            RuleArg::SpiderRegion { target, .. } => vec![*target],
        }
    }

    /// The subgoal of the first target
    pub fn subgoal(&self) -> Option<usize> {
        self.targets().first().map(|t| t.subgoal)
    }
}

impl fmt::Display for RuleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleArg::SubDiagram(target) => write!(f, "{}", target),
            RuleArg::Multiple(targets) => {
                f.write_str("[")?;
                for (i, target) in targets.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", target)?;
                }
                f.write_str("]")
            }
            RuleArg::SpiderRegion {
                target,
                spider,
                region,
            } => write!(f, "{} spider {:?} in {} zone(s)", target, spider, region.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_kinds_and_targets() {
        let single = RuleArg::SubDiagram(SubDiagramIndex::new(0, 3));
        assert_eq!(single.kind(), ArgKind::SubDiagram);
        assert_eq!(single.subgoal(), Some(0));

        let multi = RuleArg::Multiple(vec![SubDiagramIndex::new(1, 0), SubDiagramIndex::new(1, 2)]);
        assert_eq!(multi.kind(), ArgKind::Multiple);
        assert_eq!(multi.targets().len(), 2);
        assert_eq!(multi.to_string(), "[#1@0, #1@2]");

        assert_eq!(RuleArg::Multiple(vec![]).subgoal(), None);
    }

    #[test]
    fn test_arg_json() {
        let arg = RuleArg::Multiple(vec![SubDiagramIndex::new(0, 0), SubDiagramIndex::new(0, 1)]);
        let json = serde_json::to_string(&arg).unwrap();
        let back: RuleArg = serde_json::from_str(&json).unwrap();
        assert_eq!(back, arg);
    }
}
