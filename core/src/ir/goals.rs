//! Goal states
//!
//! A goal state is the ordered conjunction of the proof obligations still
//! open at one point of a proof. The first subgoal is the one to work on
//! next; an empty goal state means the proof is finished.

use super::diagram::SpiderDiagram;
use super::occurrence::Occurrence;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable, ordered list of open subgoals
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalState {
    goals: Vec<SpiderDiagram>,
}

impl GoalState {
    pub fn new(goals: Vec<SpiderDiagram>) -> Self {
        Self { goals }
    }

    /// A goal state with a single subgoal
    pub fn single(goal: SpiderDiagram) -> Self {
        Self { goals: vec![goal] }
    }

    /// The finished goal state
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if no subgoals are left
    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn subgoals(&self) -> &[SpiderDiagram] {
        &self.goals
    }

    /// The subgoal at the given index
    pub fn subgoal(&self, index: usize) -> Option<&SpiderDiagram> {
        self.goals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpiderDiagram> {
        self.goals.iter()
    }

    /// Occurrence enumeration of one subgoal, for translating selections
    /// into rule arguments
    pub fn occurrences_at(&self, index: usize) -> Option<Vec<Occurrence>> {
        self.subgoal(index).map(SpiderDiagram::occurrences)
    }

    /// New goal state with one subgoal replaced by zero or more successors
    ///
    /// Successors that are trivially true are discharged on the spot.
    /// Returns `None` if `index` is out of range.
    pub fn replace_subgoal(
        &self,
        index: usize,
        successors: Vec<SpiderDiagram>,
    ) -> Option<GoalState> {
        if index >= self.goals.len() {
            return None;
        }
        let mut goals = Vec::with_capacity(self.goals.len() + successors.len());
        goals.extend_from_slice(&self.goals[..index]);
        goals.extend(successors.into_iter().filter(|d| !d.is_trivially_true()));
        goals.extend_from_slice(&self.goals[index + 1..]);
        Some(GoalState { goals })
    }

    /// The same goals without the trivially true ones
    pub fn discharge_trivial(&self) -> GoalState {
        self.goals
            .iter()
            .filter(|d| !d.is_trivially_true())
            .cloned()
            .collect()
    }

    /// The goals in semantic normal form
    ///
    /// Two goal states with equal keys are equivalent; the converse does
    /// not hold.
    pub fn semantic_key(&self) -> GoalState {
        GoalState {
            goals: self.goals.iter().map(SpiderDiagram::normalized).collect(),
        }
    }

    /// Total number of connectives over all subgoals
    pub fn connective_count(&self) -> usize {
        self.goals.iter().map(SpiderDiagram::connective_count).sum()
    }
}

impl FromIterator<SpiderDiagram> for GoalState {
    fn from_iter<I: IntoIterator<Item = SpiderDiagram>>(iter: I) -> Self {
        Self {
            goals: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GoalState {
    type Item = &'a SpiderDiagram;
    type IntoIter = std::slice::Iter<'a, SpiderDiagram>;

    fn into_iter(self) -> Self::IntoIter {
        self.goals.iter()
    }
}

impl fmt::Display for GoalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.goals.is_empty() {
            return f.write_str("(no subgoals)");
        }
        for (i, goal) in self.goals.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "#{}: {}", i, goal)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Region, Zone};

    fn primary(contour: &str) -> SpiderDiagram {
        let zone = Zone::new([contour], Vec::<String>::new());
        SpiderDiagram::primary(["s"], [("s", Region::from([zone]))], []).unwrap()
    }

    #[test]
    fn test_empty_goal_state() {
        let goals = GoalState::empty();
        assert!(goals.is_empty());
        assert_eq!(goals.len(), 0);
        assert_eq!(goals.to_string(), "(no subgoals)");
    }

    #[test]
    fn test_replace_subgoal_splits_and_keeps_order() {
        let goals = GoalState::new(vec![primary("A"), primary("B"), primary("C")]);
        let replaced = goals
            .replace_subgoal(1, vec![primary("X"), primary("Y")])
            .unwrap();
        assert_eq!(
            replaced.subgoals(),
            &[primary("A"), primary("X"), primary("Y"), primary("C")]
        );
        // the original is untouched
        assert_eq!(goals.len(), 3);
        assert!(goals.replace_subgoal(3, vec![]).is_none());
    }

    #[test]
    fn test_trivially_true_successors_are_discharged() {
        let goals = GoalState::single(primary("A"));
        let closed = goals.replace_subgoal(0, vec![SpiderDiagram::Null]).unwrap();
        assert!(closed.is_empty());
    }

    #[test]
    fn test_discharge_trivial() {
        let goals =
            GoalState::new(vec![SpiderDiagram::Null, primary("A"), SpiderDiagram::Null]);
        assert_eq!(goals.discharge_trivial(), GoalState::single(primary("A")));
        assert!(GoalState::single(SpiderDiagram::Null).discharge_trivial().is_empty());
    }

    #[test]
    fn test_occurrences_at() {
        let goals = GoalState::single(SpiderDiagram::negation(primary("A")));
        assert_eq!(goals.occurrences_at(0).unwrap().len(), 2);
        assert!(goals.occurrences_at(1).is_none());
    }

    #[test]
    fn test_semantic_key() {
        let a = GoalState::single(SpiderDiagram::conjunction(primary("A"), primary("B")));
        let b = GoalState::single(SpiderDiagram::conjunction(primary("B"), primary("A")));
        assert_ne!(a, b);
        assert_eq!(a.semantic_key(), b.semantic_key());
    }
}
