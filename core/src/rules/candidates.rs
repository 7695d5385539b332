//! Candidate generation
//!
//! Scans the open subgoals of a goal state and collects every place where
//! a rule could be applied. A candidate only becomes a concrete
//! [`RuleArg`] once the subgoal it was found in is fixed.

use super::args::{RuleArg, SubDiagramIndex};
use super::RuleRef;
use crate::ir::{GoalState, Occurrence, Region};
use rustc_hash::FxHashSet;
use std::fmt;

/// Extra structure a candidate carries beyond its target
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateDetail {
    None,

    /// A second position, e.g. the operand kept by conjunction elimination
    Operand(Occurrence),

    /// A spider of a primary target and the region to split it on
    Spider { spider: String, region: Region },
}

/// Where a rule applies within one diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateTarget {
    pub target: Occurrence,
    pub detail: CandidateDetail,
}

impl CandidateTarget {
    pub fn at(target: Occurrence) -> Self {
        Self {
            target,
            detail: CandidateDetail::None,
        }
    }

    pub fn with_operand(target: Occurrence, operand: Occurrence) -> Self {
        Self {
            target,
            detail: CandidateDetail::Operand(operand),
        }
    }

    pub fn with_spider(target: Occurrence, spider: impl Into<String>, region: Region) -> Self {
        Self {
            target,
            detail: CandidateDetail::Spider {
                spider: spider.into(),
                region,
            },
        }
    }

    /// The concrete argument for this candidate inside subgoal `subgoal`
    pub fn arg(&self, subgoal: usize) -> RuleArg {
        let target = SubDiagramIndex::new(subgoal, self.target.index());
        match &self.detail {
            CandidateDetail::None => RuleArg::SubDiagram(target),
            CandidateDetail::Operand(operand) => {
                RuleArg::Multiple(vec![target, SubDiagramIndex::new(subgoal, operand.index())])
            }
            CandidateDetail::Spider { spider, region } => RuleArg::SpiderRegion {
                target,
                spider: spider.clone(),
                region: region.clone(),
            },
        }
    }
}

/// A rule together with a place it applies to
#[derive(Clone)]
pub struct PossibleRuleApplication {
    pub rule: RuleRef,
    pub candidate: CandidateTarget,
}

impl PossibleRuleApplication {
    pub fn new(rule: RuleRef, candidate: CandidateTarget) -> Self {
        Self { rule, candidate }
    }

    pub fn target(&self) -> &Occurrence {
        &self.candidate.target
    }

    pub fn detail(&self) -> &CandidateDetail {
        &self.candidate.detail
    }

    /// Materialize the argument for the given subgoal
    pub fn arg(&self, subgoal: usize) -> RuleArg {
        self.candidate.arg(subgoal)
    }
}

impl fmt::Debug for PossibleRuleApplication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PossibleRuleApplication")
            .field("rule", &self.rule.id())
            .field("target", &self.candidate.target.index())
            .field("detail", &self.candidate.detail)
            .finish()
    }
}

/// Candidates of every rule for one subgoal, deduplicated by rule and argument
pub fn generate_for_subgoal(
    rules: &[RuleRef],
    goals: &GoalState,
    subgoal: usize,
) -> Vec<PossibleRuleApplication> {
    let diagram = match goals.subgoal(subgoal) {
        Some(diagram) => diagram,
        None => return Vec::new(),
    };

    let mut seen: FxHashSet<(&'static str, RuleArg)> = FxHashSet::default();
    let mut found = Vec::new();
    for rule in rules {
        for candidate in rule.possible_applications(diagram) {
            if seen.insert((rule.id(), candidate.arg(subgoal))) {
                found.push(PossibleRuleApplication::new(rule.clone(), candidate));
            }
        }
    }
    found
}

/// Candidates for every open subgoal, tagged with the subgoal index
pub fn generate(rules: &[RuleRef], goals: &GoalState) -> Vec<(usize, PossibleRuleApplication)> {
    (0..goals.len())
        .flat_map(|subgoal| {
            generate_for_subgoal(rules, goals, subgoal)
                .into_iter()
                .map(move |candidate| (subgoal, candidate))
        })
        .collect()
}
