//! Spider diagrams
//!
//! A spider diagram is an immutable tree: the null diagram, a primary
//! diagram (spiders, their habitats and shaded zones) or a compound diagram
//! joining operands with a logical operator. Subtrees are shared through
//! `Arc`, so cloning a diagram is cheap and rewriting only allocates the
//! nodes on the path to the change.
//!
//! Diagrams can only be built through the validated constructors on
//! [`SpiderDiagram`] and [`PrimaryDiagram`].

use super::zones::{Region, Zone};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised when a diagram would violate its well-formedness invariants
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("invalid name {0:?}: names must be non-empty and contain no quotes or backslashes")]
    InvalidName(String),

    #[error("zone {zone} lists {contours:?} both as in- and out-contours")]
    OverlappingContours { zone: String, contours: Vec<String> },

    #[error("zone {zone} is not fully specified over the contours {expected:?}")]
    ZoneNotFullySpecified { zone: String, expected: Vec<String> },

    #[error("spider {0:?} has no habitat")]
    MissingHabitat(String),

    #[error("spider {0:?} has an empty habitat")]
    EmptyHabitat(String),

    #[error("spider {0:?} has more than one habitat")]
    DuplicateHabitat(String),

    #[error("habitat given for undeclared spider {0:?}")]
    UnknownSpider(String),

    #[error("operator {operator} expects {expected} operand(s), found {found}")]
    ArityMismatch {
        operator: Operator,
        expected: usize,
        found: usize,
    },
}

/// Result type for diagram construction
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// Logical operators joining compound diagrams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Operator {
    Negation,
    Conjunction,
    Disjunction,
    Implication,
    Equivalence,
}

impl Operator {
    pub const ALL: [Operator; 5] = [
        Operator::Negation,
        Operator::Conjunction,
        Operator::Disjunction,
        Operator::Implication,
        Operator::Equivalence,
    ];

    /// Number of operands this operator takes
    pub fn arity(self) -> usize {
        match self {
            Operator::Negation => 1,
            _ => 2,
        }
    }

    /// Name used in the textual form, e.g. `op &`
    pub fn name(self) -> &'static str {
        match self {
            Operator::Negation => "op ¬",
            Operator::Conjunction => "op &",
            Operator::Disjunction => "op |",
            Operator::Implication => "op -->",
            Operator::Equivalence => "op <-->",
        }
    }

    /// Look up an operator by its textual name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether swapping the operands preserves meaning
    pub fn is_commutative(self) -> bool {
        matches!(
            self,
            Operator::Conjunction | Operator::Disjunction | Operator::Equivalence
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub(crate) fn check_name(name: &str) -> ConstructionResult<()> {
    if name.is_empty() || name.contains('"') || name.contains('\\') {
        return Err(ConstructionError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A primary (unitary) spider diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryDiagram {
    spiders: BTreeSet<String>,
    habitats: BTreeMap<String, Region>,
    shaded_zones: BTreeSet<Zone>,
}

impl PrimaryDiagram {
    /// Build and validate a primary diagram
    pub fn new<S, N, H, Z>(spiders: S, habitats: H, shaded_zones: Z) -> ConstructionResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        H: IntoIterator<Item = (N, Region)>,
        N: Into<String>,
        Z: IntoIterator<Item = Zone>,
    {
        let mut habitat_map = BTreeMap::new();
        for (spider, region) in habitats {
            let spider = spider.into();
            if habitat_map.contains_key(&spider) {
                return Err(ConstructionError::DuplicateHabitat(spider));
            }
            habitat_map.insert(spider, region);
        }

        let diagram = Self {
            spiders: spiders.into_iter().map(Into::into).collect(),
            habitats: habitat_map,
            shaded_zones: shaded_zones.into_iter().collect(),
        };
        diagram.validate()?;
        Ok(diagram)
    }

    pub fn spiders(&self) -> &BTreeSet<String> {
        &self.spiders
    }

    pub fn habitats(&self) -> &BTreeMap<String, Region> {
        &self.habitats
    }

    pub fn habitat(&self, spider: &str) -> Option<&Region> {
        self.habitats.get(spider)
    }

    pub fn shaded_zones(&self) -> &BTreeSet<Zone> {
        &self.shaded_zones
    }

    /// Every zone mentioned by a habitat or by the shading
    fn mentioned_zones(&self) -> impl Iterator<Item = &Zone> {
        self.habitats
            .values()
            .flat_map(|region| region.iter())
            .chain(self.shaded_zones.iter())
    }

    /// The contour set of this diagram
    pub fn contours(&self) -> BTreeSet<String> {
        self.mentioned_zones()
            .flat_map(|zone| zone.in_contours.iter().chain(zone.out_contours.iter()))
            .cloned()
            .collect()
    }

    /// A diagram without spiders and shading carries no information
    pub fn is_trivially_true(&self) -> bool {
        self.spiders.is_empty() && self.shaded_zones.is_empty()
    }

    /// Copy of this diagram with one spider moved to a new habitat
    pub fn with_habitat(&self, spider: &str, region: Region) -> ConstructionResult<Self> {
        if !self.spiders.contains(spider) {
            return Err(ConstructionError::UnknownSpider(spider.to_string()));
        }
        let mut habitats = self.habitats.clone();
        habitats.insert(spider.to_string(), region);
        let diagram = Self {
            spiders: self.spiders.clone(),
            habitats,
            shaded_zones: self.shaded_zones.clone(),
        };
        diagram.validate()?;
        Ok(diagram)
    }

    /// Check the well-formedness invariants
    pub fn validate(&self) -> ConstructionResult<()> {
        for spider in &self.spiders {
            check_name(spider)?;
            match self.habitats.get(spider) {
                None => return Err(ConstructionError::MissingHabitat(spider.clone())),
                Some(region) if region.is_empty() => {
                    return Err(ConstructionError::EmptyHabitat(spider.clone()))
                }
                Some(_) => {}
            }
        }
        if let Some(stray) = self.habitats.keys().find(|s| !self.spiders.contains(*s)) {
            return Err(ConstructionError::UnknownSpider(stray.clone()));
        }

        let contours = self.contours();
        for contour in &contours {
            check_name(contour)?;
        }
        for zone in self.mentioned_zones() {
            let overlapping = zone.overlapping_contours();
            if !overlapping.is_empty() {
                return Err(ConstructionError::OverlappingContours {
                    zone: zone.to_string(),
                    contours: overlapping.into_iter().map(str::to_string).collect(),
                });
            }
            if zone.contours().len() != contours.len() {
                return Err(ConstructionError::ZoneNotFullySpecified {
                    zone: zone.to_string(),
                    expected: contours.iter().cloned().collect(),
                });
            }
        }
        Ok(())
    }
}

/// A compound spider diagram: an operator applied to operand diagrams
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompoundDiagram {
    operator: Operator,
    operands: Vec<SpiderDiagram>,
    // cached sub-diagram count, including this node
    count: usize,
}

impl CompoundDiagram {
    pub(crate) fn from_parts(operator: Operator, operands: Vec<SpiderDiagram>) -> Self {
        let count = 1 + operands.iter().map(SpiderDiagram::sub_diagram_count).sum::<usize>();
        Self {
            operator,
            operands,
            count,
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &[SpiderDiagram] {
        &self.operands
    }

    pub fn operand(&self, index: usize) -> Option<&SpiderDiagram> {
        self.operands.get(index)
    }

    /// Number of sub-diagrams, counting this node
    pub fn sub_diagram_count(&self) -> usize {
        self.count
    }

    /// Occurrence offsets of the operands, relative to this node
    pub fn operand_offsets(&self) -> Vec<usize> {
        let mut offset = 1;
        self.operands
            .iter()
            .map(|operand| {
                let current = offset;
                offset += operand.sub_diagram_count();
                current
            })
            .collect()
    }
}

/// An immutable spider diagram
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SpiderDiagram {
    /// The null diagram: no information, trivially true
    Null,
    Primary(Arc<PrimaryDiagram>),
    Compound(Arc<CompoundDiagram>),
}

impl Default for SpiderDiagram {
    fn default() -> Self {
        SpiderDiagram::Null
    }
}

impl From<PrimaryDiagram> for SpiderDiagram {
    fn from(primary: PrimaryDiagram) -> Self {
        SpiderDiagram::Primary(Arc::new(primary))
    }
}

impl SpiderDiagram {
    pub fn null() -> Self {
        SpiderDiagram::Null
    }

    /// Build a validated primary diagram
    pub fn primary<S, N, H, Z>(spiders: S, habitats: H, shaded_zones: Z) -> ConstructionResult<Self>
    where
        S: IntoIterator,
        S::Item: Into<String>,
        H: IntoIterator<Item = (N, Region)>,
        N: Into<String>,
        Z: IntoIterator<Item = Zone>,
    {
        PrimaryDiagram::new(spiders, habitats, shaded_zones).map(Into::into)
    }

    /// Build a compound diagram, checking the operator's arity
    pub fn compound(operator: Operator, operands: Vec<SpiderDiagram>) -> ConstructionResult<Self> {
        if operands.len() != operator.arity() {
            return Err(ConstructionError::ArityMismatch {
                operator,
                expected: operator.arity(),
                found: operands.len(),
            });
        }
        Ok(SpiderDiagram::Compound(Arc::new(CompoundDiagram::from_parts(
            operator, operands,
        ))))
    }

    pub fn negation(operand: SpiderDiagram) -> Self {
        SpiderDiagram::Compound(Arc::new(CompoundDiagram::from_parts(
            Operator::Negation,
            vec![operand],
        )))
    }

    /// Build a binary compound; fails for the negation operator
    pub fn binary(
        operator: Operator,
        left: SpiderDiagram,
        right: SpiderDiagram,
    ) -> ConstructionResult<Self> {
        Self::compound(operator, vec![left, right])
    }

    fn binary_unchecked(operator: Operator, left: SpiderDiagram, right: SpiderDiagram) -> Self {
        SpiderDiagram::Compound(Arc::new(CompoundDiagram::from_parts(
            operator,
            vec![left, right],
        )))
    }

    pub fn conjunction(left: SpiderDiagram, right: SpiderDiagram) -> Self {
        Self::binary_unchecked(Operator::Conjunction, left, right)
    }

    pub fn disjunction(left: SpiderDiagram, right: SpiderDiagram) -> Self {
        Self::binary_unchecked(Operator::Disjunction, left, right)
    }

    pub fn implication(premise: SpiderDiagram, conclusion: SpiderDiagram) -> Self {
        Self::binary_unchecked(Operator::Implication, premise, conclusion)
    }

    pub fn equivalence(left: SpiderDiagram, right: SpiderDiagram) -> Self {
        Self::binary_unchecked(Operator::Equivalence, left, right)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SpiderDiagram::Null)
    }

    pub fn as_primary(&self) -> Option<&Arc<PrimaryDiagram>> {
        match self {
            SpiderDiagram::Primary(primary) => Some(primary),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Arc<CompoundDiagram>> {
        match self {
            SpiderDiagram::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// The operator, if this is a compound diagram
    pub fn operator(&self) -> Option<Operator> {
        self.as_compound().map(|c| c.operator())
    }

    /// Whether this is a compound diagram with the given operator
    pub fn is_compound_of(&self, operator: Operator) -> bool {
        self.operator() == Some(operator)
    }

    /// Number of sub-diagrams, counting this diagram itself
    pub fn sub_diagram_count(&self) -> usize {
        match self {
            SpiderDiagram::Compound(compound) => compound.count,
            _ => 1,
        }
    }

    /// The sub-diagram at the given parent-first, left-to-right index
    ///
    /// Index 0 is this diagram.
    pub fn sub_diagram_at(&self, index: usize) -> Option<&SpiderDiagram> {
        if index == 0 {
            return Some(self);
        }
        let compound = self.as_compound()?;
        let mut offset = 1;
        for operand in &compound.operands {
            let count = operand.sub_diagram_count();
            if index < offset + count {
                return operand.sub_diagram_at(index - offset);
            }
            offset += count;
        }
        None
    }

    /// Recursively check all well-formedness invariants
    pub fn is_valid(&self) -> bool {
        match self {
            SpiderDiagram::Null => true,
            SpiderDiagram::Primary(primary) => primary.validate().is_ok(),
            SpiderDiagram::Compound(compound) => {
                compound.operands.len() == compound.operator.arity()
                    && compound.operands.iter().all(SpiderDiagram::is_valid)
            }
        }
    }

    /// Whether this diagram is known to hold in every model
    pub fn is_trivially_true(&self) -> bool {
        match self {
            SpiderDiagram::Null => true,
            SpiderDiagram::Primary(primary) => primary.is_trivially_true(),
            SpiderDiagram::Compound(_) => false,
        }
    }

    /// Semantics-preserving normal form
    ///
    /// Information-free primaries become null, double negations are removed
    /// and the operands of commutative operators are sorted by their text.
    pub fn normalized(&self) -> SpiderDiagram {
        match self {
            SpiderDiagram::Null => SpiderDiagram::Null,
            SpiderDiagram::Primary(primary) => {
                if primary.is_trivially_true() {
                    SpiderDiagram::Null
                } else {
                    self.clone()
                }
            }
            SpiderDiagram::Compound(compound) => {
                let mut operands: Vec<SpiderDiagram> =
                    compound.operands.iter().map(SpiderDiagram::normalized).collect();
                if compound.operator == Operator::Negation {
                    if let SpiderDiagram::Compound(inner) = &operands[0] {
                        if inner.operator == Operator::Negation {
                            return inner.operands[0].clone();
                        }
                    }
                }
                if compound.operator.is_commutative() {
                    operands.sort_by_cached_key(|operand| operand.to_string());
                }
                SpiderDiagram::Compound(Arc::new(CompoundDiagram::from_parts(
                    compound.operator,
                    operands,
                )))
            }
        }
    }

    /// Sound but incomplete semantic equivalence
    ///
    /// `true` means the diagrams are equivalent; `false` means unknown.
    pub fn equals_semantically(&self, other: &SpiderDiagram) -> bool {
        self == other || self.normalized() == other.normalized()
    }

    /// Whether both diagrams are the very same node in memory
    pub fn ptr_eq(&self, other: &SpiderDiagram) -> bool {
        match (self, other) {
            (SpiderDiagram::Null, SpiderDiagram::Null) => true,
            (SpiderDiagram::Primary(a), SpiderDiagram::Primary(b)) => Arc::ptr_eq(a, b),
            (SpiderDiagram::Compound(a), SpiderDiagram::Compound(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of compound nodes in this diagram
    pub fn connective_count(&self) -> usize {
        match self {
            SpiderDiagram::Compound(compound) => {
                1 + compound
                    .operands
                    .iter()
                    .map(SpiderDiagram::connective_count)
                    .sum::<usize>()
            }
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(zones: &[Zone]) -> Region {
        zones.iter().cloned().collect()
    }

    fn spider_in_a() -> SpiderDiagram {
        let a = Zone::new(["A"], Vec::<String>::new());
        SpiderDiagram::primary(["s"], [("s", region(&[a]))], []).unwrap()
    }

    #[test]
    fn test_null_diagrams_are_equal() {
        assert_eq!(SpiderDiagram::null(), SpiderDiagram::Null);
        assert!(SpiderDiagram::null().is_trivially_true());
    }

    #[test]
    fn test_primary_construction() {
        let d = spider_in_a();
        let primary = d.as_primary().unwrap();
        assert_eq!(primary.spiders().len(), 1);
        assert_eq!(primary.contours().len(), 1);
        assert!(d.is_valid());
        assert!(!d.is_trivially_true());
    }

    #[test]
    fn test_zone_not_fully_specified() {
        let a = Zone::new(["A"], Vec::<String>::new());
        let b = Zone::new(["B"], ["A"]);
        let result = SpiderDiagram::primary(["s"], [("s", region(&[a]))], [b]);
        assert!(matches!(
            result,
            Err(ConstructionError::ZoneNotFullySpecified { .. })
        ));
    }

    #[test]
    fn test_overlapping_contours_rejected() {
        let bad = Zone::new(["A"], ["A"]);
        let result =
            SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), [bad]);
        assert!(matches!(
            result,
            Err(ConstructionError::OverlappingContours { .. })
        ));
    }

    #[test]
    fn test_habitat_spider_mismatch() {
        let a = Zone::new(["A"], Vec::<String>::new());
        let missing = SpiderDiagram::primary(["s"], Vec::<(String, Region)>::new(), []);
        assert_eq!(missing, Err(ConstructionError::MissingHabitat("s".into())));

        let stray = SpiderDiagram::primary(Vec::<String>::new(), [("t", region(&[a.clone()]))], []);
        assert_eq!(stray, Err(ConstructionError::UnknownSpider("t".into())));

        let empty = SpiderDiagram::primary(["s"], [("s", Region::new())], []);
        assert_eq!(empty, Err(ConstructionError::EmptyHabitat("s".into())));

        let twice = SpiderDiagram::primary(
            ["s"],
            [("s", region(&[a.clone()])), ("s", region(&[a]))],
            [],
        );
        assert_eq!(twice, Err(ConstructionError::DuplicateHabitat("s".into())));
    }

    #[test]
    fn test_invalid_names() {
        let quoted = Zone::new(["A\""], Vec::<String>::new());
        let result =
            SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), [quoted]);
        assert!(matches!(result, Err(ConstructionError::InvalidName(_))));
    }

    #[test]
    fn test_compound_arity() {
        let result = SpiderDiagram::compound(
            Operator::Negation,
            vec![SpiderDiagram::Null, SpiderDiagram::Null],
        );
        assert_eq!(
            result,
            Err(ConstructionError::ArityMismatch {
                operator: Operator::Negation,
                expected: 1,
                found: 2
            })
        );
        let null = SpiderDiagram::Null;
        assert!(SpiderDiagram::binary(Operator::Negation, null.clone(), null.clone()).is_err());
        assert!(SpiderDiagram::binary(Operator::Disjunction, null.clone(), null).is_ok());
    }

    #[test]
    fn test_structural_equality_is_shape_discriminated() {
        let p = spider_in_a();
        let not_p = SpiderDiagram::negation(p.clone());
        assert_ne!(p, SpiderDiagram::Null);
        assert_ne!(p, not_p);
        assert_eq!(
            SpiderDiagram::conjunction(p.clone(), SpiderDiagram::Null),
            SpiderDiagram::conjunction(spider_in_a(), SpiderDiagram::Null)
        );
        assert_ne!(
            SpiderDiagram::conjunction(p.clone(), SpiderDiagram::Null),
            SpiderDiagram::disjunction(p.clone(), SpiderDiagram::Null)
        );
        assert_ne!(
            SpiderDiagram::conjunction(p.clone(), SpiderDiagram::Null),
            SpiderDiagram::conjunction(SpiderDiagram::Null, p)
        );
    }

    #[test]
    fn test_sub_diagram_enumeration() {
        // (p & null) --> ¬p
        let p = spider_in_a();
        let d = SpiderDiagram::implication(
            SpiderDiagram::conjunction(p.clone(), SpiderDiagram::Null),
            SpiderDiagram::negation(p.clone()),
        );
        assert_eq!(d.sub_diagram_count(), 6);
        assert_eq!(d.sub_diagram_at(0), Some(&d));
        assert!(d.sub_diagram_at(1).unwrap().is_compound_of(Operator::Conjunction));
        assert_eq!(d.sub_diagram_at(2), Some(&p));
        assert_eq!(d.sub_diagram_at(3), Some(&SpiderDiagram::Null));
        assert!(d.sub_diagram_at(4).unwrap().is_compound_of(Operator::Negation));
        assert_eq!(d.sub_diagram_at(5), Some(&p));
        assert_eq!(d.sub_diagram_at(6), None);
        assert_eq!(d.as_compound().unwrap().operand_offsets(), vec![1, 4]);
    }

    #[test]
    fn test_semantic_equivalence_is_sound_approximation() {
        let p = spider_in_a();
        let b = Zone::new(["B"], Vec::<String>::new());
        let q = SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), [b])
            .unwrap();

        let pq = SpiderDiagram::conjunction(p.clone(), q.clone());
        let qp = SpiderDiagram::conjunction(q.clone(), p.clone());
        assert_ne!(pq, qp);
        assert!(pq.equals_semantically(&qp));

        let double = SpiderDiagram::negation(SpiderDiagram::negation(p.clone()));
        assert!(double.equals_semantically(&p));

        let empty_primary =
            SpiderDiagram::primary(Vec::<String>::new(), Vec::<(String, Region)>::new(), [])
                .unwrap();
        assert!(empty_primary.equals_semantically(&SpiderDiagram::Null));

        // p --> q and q --> p are not claimed equivalent
        let imp = SpiderDiagram::implication(p.clone(), q.clone());
        let rev = SpiderDiagram::implication(q, p);
        assert!(!imp.equals_semantically(&rev));
    }

    #[test]
    fn test_with_habitat() {
        let a = Zone::new(["A"], ["B"]);
        let b = Zone::new(["B"], ["A"]);
        let d = PrimaryDiagram::new(["s"], [("s", region(&[a.clone(), b]))], []).unwrap();
        let moved = d.with_habitat("s", region(&[a])).unwrap();
        assert_eq!(moved.habitat("s").unwrap().len(), 1);
        assert!(d.with_habitat("t", Region::new()).is_err());
    }
}
