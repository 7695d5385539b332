//! Occurrences: sub-diagrams addressed by their enumeration index
//!
//! An occurrence index is only meaningful against the tree it was computed
//! from. After a rewrite, occurrences must be recomputed on the new tree.

use super::diagram::{CompoundDiagram, Operator, PrimaryDiagram, SpiderDiagram};
use super::transform::{Transformed, Transformer, VisitContext};
use std::sync::Arc;

/// A sub-diagram together with its index inside one particular tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occurrence {
    diagram: SpiderDiagram,
    index: usize,
}

impl Occurrence {
    pub fn new(diagram: SpiderDiagram, index: usize) -> Self {
        Self { diagram, index }
    }

    pub fn diagram(&self) -> &SpiderDiagram {
        &self.diagram
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn operator(&self) -> Option<Operator> {
        self.diagram.operator()
    }

    /// Occurrences of the direct operands, indexed in the enclosing tree
    pub fn operands(&self) -> Vec<Occurrence> {
        match self.diagram.as_compound() {
            Some(compound) => compound
                .operands()
                .iter()
                .zip(compound.operand_offsets())
                .map(|(operand, offset)| Occurrence::new(operand.clone(), self.index + offset))
                .collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Default)]
struct Collector {
    found: Vec<Occurrence>,
}

impl Transformer for Collector {
    fn transform_null(&mut self, ctx: &VisitContext<'_>) -> Transformed {
        self.found.push(Occurrence::new(SpiderDiagram::Null, ctx.occurrence));
        Transformed::descend()
    }

    fn transform_primary(
        &mut self,
        primary: &Arc<PrimaryDiagram>,
        ctx: &VisitContext<'_>,
    ) -> Transformed {
        self.found.push(Occurrence::new(
            SpiderDiagram::Primary(Arc::clone(primary)),
            ctx.occurrence,
        ));
        Transformed::descend()
    }

    fn transform_compound(
        &mut self,
        compound: &Arc<CompoundDiagram>,
        ctx: &VisitContext<'_>,
    ) -> Transformed {
        self.found.push(Occurrence::new(
            SpiderDiagram::Compound(Arc::clone(compound)),
            ctx.occurrence,
        ));
        Transformed::descend()
    }
}

impl SpiderDiagram {
    /// All sub-diagrams in parent-first, left-to-right order
    pub fn occurrences(&self) -> Vec<Occurrence> {
        let mut collector = Collector::default();
        self.transform(&mut collector, false);
        collector.found
    }

    /// The occurrence at the given index
    pub fn occurrence(&self, index: usize) -> Option<Occurrence> {
        self.sub_diagram_at(index)
            .map(|diagram| Occurrence::new(diagram.clone(), index))
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
    fn test_occurrences_match_sub_diagram_at() {
        let d = SpiderDiagram::disjunction(
            SpiderDiagram::negation(SpiderDiagram::conjunction(primary("A"), primary("B"))),
            SpiderDiagram::Null,
        );
        let occurrences = d.occurrences();
        assert_eq!(occurrences.len(), d.sub_diagram_count());
        for (i, occurrence) in occurrences.iter().enumerate() {
            assert_eq!(occurrence.index(), i);
            assert_eq!(Some(occurrence.diagram()), d.sub_diagram_at(i));
        }
    }

    #[test]
    fn test_operand_occurrences() {
        // (A & B) | ¬C
        let d = SpiderDiagram::disjunction(
            SpiderDiagram::conjunction(primary("A"), primary("B")),
            SpiderDiagram::negation(primary("C")),
        );
        let root = d.occurrence(0).unwrap();
        let indices: Vec<usize> = root.operands().iter().map(Occurrence::index).collect();
        assert_eq!(indices, vec![1, 4]);

        let negation = d.occurrence(4).unwrap();
        assert_eq!(negation.operator(), Some(Operator::Negation));
        assert_eq!(negation.operands()[0].index(), 5);
        assert_eq!(negation.operands()[0].diagram(), &primary("C"));
        assert!(d.occurrence(6).is_none());
    }
}
