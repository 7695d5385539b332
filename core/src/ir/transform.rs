//! Top-down diagram transformation
//!
//! [`SpiderDiagram::transform`] visits a diagram parent-first, left to right,
//! and rebuilds it from whatever the [`Transformer`] returns. The traversal
//! is a pure recursion: every call returns the rewritten subtree together
//! with a [`Flow`] signal, so stopping early needs no shared state.
//!
//! Occurrence indices handed to the transformer always refer to the input
//! tree. A replaced node is never descended into; its original subtree is
//! skipped when numbering the nodes that follow it.

use super::diagram::{CompoundDiagram, PrimaryDiagram, SpiderDiagram};
use std::sync::Arc;

/// Whether the traversal continues after a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// What to do with a visited node
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Keep the node and visit its operands (leaves are simply kept)
    Descend,
    /// Keep the node as it is without visiting its operands
    Keep,
    /// Put the given diagram in place of the node
    Replace(SpiderDiagram),
}

/// The answer of a transformer for one node
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub action: Action,
    pub flow: Flow,
}

impl Transformed {
    pub fn descend() -> Self {
        Self {
            action: Action::Descend,
            flow: Flow::Continue,
        }
    }

    pub fn keep() -> Self {
        Self {
            action: Action::Keep,
            flow: Flow::Continue,
        }
    }

    pub fn replace(diagram: SpiderDiagram) -> Self {
        Self {
            action: Action::Replace(diagram),
            flow: Flow::Continue,
        }
    }

    /// Stop the traversal once this node has been handled
    pub fn and_stop(mut self) -> Self {
        self.flow = Flow::Stop;
        self
    }
}

/// Compound ancestors of a visited node, innermost first
///
/// The chain lives on the traversal's call stack and is never mutated.
#[derive(Debug, Clone, Copy)]
pub struct Ancestors<'a> {
    node: &'a Arc<CompoundDiagram>,
    parent: Option<&'a Ancestors<'a>>,
}

impl<'a> Ancestors<'a> {
    /// The immediate parent
    pub fn parent(&self) -> &'a Arc<CompoundDiagram> {
        self.node
    }

    pub fn iter(&self) -> AncestorIter<'a> {
        AncestorIter { next: Some(*self) }
    }

    pub fn depth(&self) -> usize {
        self.iter().count()
    }
}

/// Iterator over ancestors, innermost first
pub struct AncestorIter<'a> {
    next: Option<Ancestors<'a>>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Arc<CompoundDiagram>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = current.parent.copied();
        Some(current.node)
    }
}

/// Position of a visited node
#[derive(Debug, Clone, Copy)]
pub struct VisitContext<'a> {
    /// Index of the node in the parent-first enumeration of the input tree
    pub occurrence: usize,
    /// Index of the node among its siblings (0 for the root)
    pub child_index: usize,
    tracked: bool,
    chain: Option<&'a Ancestors<'a>>,
}

impl<'a> VisitContext<'a> {
    /// The ancestors of this node, innermost first
    ///
    /// Returns `None` when the traversal does not track parents; the root
    /// of a tracked traversal yields an empty iterator.
    pub fn parents(&self) -> Option<impl Iterator<Item = &'a Arc<CompoundDiagram>>> {
        if !self.tracked {
            return None;
        }
        Some(self.chain.into_iter().flat_map(|chain| chain.iter()))
    }

    /// The immediate parent, if parents are tracked and this is not the root
    pub fn parent(&self) -> Option<&'a Arc<CompoundDiagram>> {
        self.chain.map(|chain| chain.parent())
    }

    pub fn is_root(&self) -> bool {
        self.occurrence == 0
    }
}

/// Callbacks invoked by [`SpiderDiagram::transform`], one per node shape
///
/// Every callback defaults to [`Transformed::descend`].
pub trait Transformer {
    fn transform_null(&mut self, _ctx: &VisitContext<'_>) -> Transformed {
        Transformed::descend()
    }

    fn transform_primary(
        &mut self,
        _primary: &Arc<PrimaryDiagram>,
        _ctx: &VisitContext<'_>,
    ) -> Transformed {
        Transformed::descend()
    }

    fn transform_compound(
        &mut self,
        _compound: &Arc<CompoundDiagram>,
        _ctx: &VisitContext<'_>,
    ) -> Transformed {
        Transformed::descend()
    }
}

fn walk<T: Transformer + ?Sized>(
    transformer: &mut T,
    diagram: &SpiderDiagram,
    occurrence: usize,
    child_index: usize,
    tracked: bool,
    chain: Option<&Ancestors<'_>>,
) -> (SpiderDiagram, Flow) {
    let ctx = VisitContext {
        occurrence,
        child_index,
        tracked,
        chain,
    };
    let Transformed { action, flow } = match diagram {
        SpiderDiagram::Null => transformer.transform_null(&ctx),
        SpiderDiagram::Primary(primary) => transformer.transform_primary(primary, &ctx),
        SpiderDiagram::Compound(compound) => transformer.transform_compound(compound, &ctx),
    };

    let compound = match (action, diagram) {
        (Action::Replace(replacement), _) => return (replacement, flow),
        (Action::Descend, SpiderDiagram::Compound(compound)) if flow == Flow::Continue => compound,
        _ => return (diagram.clone(), flow),
    };

    let here = Ancestors {
        node: compound,
        parent: chain,
    };
    let child_chain = if tracked { Some(&here) } else { None };

    let mut flow = Flow::Continue;
    let mut changed = false;
    let mut operands = Vec::with_capacity(compound.operands().len());
    let offsets = compound.operand_offsets();
    for (index, operand) in compound.operands().iter().enumerate() {
        if flow == Flow::Stop {
            operands.push(operand.clone());
            continue;
        }
        let (rewritten, child_flow) = walk(
            transformer,
            operand,
            occurrence + offsets[index],
            index,
            tracked,
            child_chain,
        );
        changed |= !rewritten.ptr_eq(operand);
        operands.push(rewritten);
        flow = child_flow;
    }

    if !changed {
        return (diagram.clone(), flow);
    }
    let rebuilt = CompoundDiagram::from_parts(compound.operator(), operands);
    (SpiderDiagram::Compound(Arc::new(rebuilt)), flow)
}

/// Replaces the node at one occurrence index and stops
struct ReplaceAt {
    target: usize,
    replacement: Option<SpiderDiagram>,
}

impl ReplaceAt {
    fn visit(&mut self, ctx: &VisitContext<'_>, size: usize) -> Transformed {
        if ctx.occurrence == self.target {
            match self.replacement.take() {
                Some(replacement) => Transformed::replace(replacement).and_stop(),
                None => Transformed::keep().and_stop(),
            }
        } else if self.target < ctx.occurrence || self.target >= ctx.occurrence + size {
            Transformed::keep()
        } else {
            Transformed::descend()
        }
    }
}

impl Transformer for ReplaceAt {
    fn transform_null(&mut self, ctx: &VisitContext<'_>) -> Transformed {
        self.visit(ctx, 1)
    }

    fn transform_primary(
        &mut self,
        _: &Arc<PrimaryDiagram>,
        ctx: &VisitContext<'_>,
    ) -> Transformed {
        self.visit(ctx, 1)
    }

    fn transform_compound(
        &mut self,
        compound: &Arc<CompoundDiagram>,
        ctx: &VisitContext<'_>,
    ) -> Transformed {
        self.visit(ctx, compound.sub_diagram_count())
    }
}

impl SpiderDiagram {
    /// Rebuild this diagram top-down through the given transformer
    ///
    /// With `track_parents` set, every callback can see the compound
    /// ancestors of the visited node. Subtrees the transformer leaves alone
    /// are shared with the input.
    pub fn transform<T: Transformer + ?Sized>(
        &self,
        transformer: &mut T,
        track_parents: bool,
    ) -> SpiderDiagram {
        walk(transformer, self, 0, 0, track_parents, None).0
    }

    /// Copy of this diagram with the sub-diagram at `occurrence` replaced
    ///
    /// Returns `None` if this diagram has no such occurrence.
    pub fn replace_at(
        &self,
        occurrence: usize,
        replacement: SpiderDiagram,
    ) -> Option<SpiderDiagram> {
        if occurrence >= self.sub_diagram_count() {
            return None;
        }
        let mut replacer = ReplaceAt {
            target: occurrence,
            replacement: Some(replacement),
        };
        Some(self.transform(&mut replacer, false))
    }
}
