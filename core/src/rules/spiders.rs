//! Rules acting on the spiders of a primary diagram

use super::args::{ArgKind, RuleArg};
use super::candidates::CandidateTarget;
use super::{not_applicable, resolve, rewrite_at, InferenceRule, RuleError, RuleResult};
use crate::ir::{GoalState, Region, SpiderDiagram};

/// Split spiders: a spider with habitat H, split on a region R ⊂ H
///
/// The primary diagram D becomes D[s ↦ R] ∨ D[s ↦ H ∖ R]. Candidates use
/// single-zone regions only.
pub struct SplitSpiders;

impl InferenceRule for SplitSpiders {
    fn id(&self) -> &'static str {
        "split_spiders"
    }

    fn description(&self) -> &'static str {
        "Split a spider's habitat into two disjunctive cases"
    }

    fn arg_kind(&self) -> ArgKind {
        ArgKind::SpiderRegion
    }

    fn apply(&self, arg: &RuleArg, goals: &GoalState) -> RuleResult<GoalState> {
        let (target, spider, region) = match arg {
            RuleArg::SpiderRegion {
                target,
                spider,
                region,
            } => (*target, spider, region),
            _ => {
                return Err(RuleError::InvalidArgument {
                    rule: self.id(),
                    expected: self.arg_kind(),
                })
            }
        };

        let (_, occurrence) = resolve(goals, target)?;
        let primary = occurrence
            .diagram()
            .as_primary()
            .ok_or_else(|| not_applicable(self, "target is not a primary diagram"))?;
        let habitat = primary
            .habitat(spider)
            .ok_or_else(|| not_applicable(self, format!("there is no spider {:?}", spider)))?;

        if region.is_empty() || !region.is_subset(habitat) || region.len() == habitat.len() {
            return Err(not_applicable(
                self,
                "the region must be a non-empty proper part of the spider's habitat",
            ));
        }
        let rest: Region = habitat.difference(region).cloned().collect();

        let inside = primary.with_habitat(spider, region.clone())?;
        let outside = primary.with_habitat(spider, rest)?;
        rewrite_at(
            goals,
            target,
            SpiderDiagram::disjunction(inside.into(), outside.into()),
        )
    }

    fn possible_applications(&self, diagram: &SpiderDiagram) -> Vec<CandidateTarget> {
        let mut found = Vec::new();
        for occurrence in diagram.occurrences() {
            let primary = match occurrence.diagram().as_primary() {
                Some(primary) => primary.clone(),
                None => continue,
            };
            for (spider, habitat) in primary.habitats() {
                if habitat.len() < 2 {
                    continue;
                }
                for zone in habitat {
                    found.push(CandidateTarget::with_spider(
                        occurrence.clone(),
                        spider.clone(),
                        Region::from([zone.clone()]),
                    ));
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Operator, Zone};
    use crate::rules::SubDiagramIndex;

    fn a_only() -> Zone {
        Zone::new(["A"], ["B"])
    }

    fn b_only() -> Zone {
        Zone::new(["B"], ["A"])
    }

    fn two_zone_spider() -> SpiderDiagram {
        SpiderDiagram::primary(["s"], [("s", Region::from([a_only(), b_only()]))], []).unwrap()
    }

    fn split_on(zone: Zone) -> RuleArg {
        RuleArg::SpiderRegion {
            target: SubDiagramIndex::new(0, 0),
            spider: "s".into(),
            region: Region::from([zone]),
        }
    }

    #[test]
    fn test_split_spider_into_cases() {
        let goals = GoalState::single(two_zone_spider());
        let result = SplitSpiders.apply(&split_on(a_only()), &goals).unwrap();

        let split = result.subgoal(0).unwrap();
        assert!(split.is_compound_of(Operator::Disjunction));
        let cases = split.as_compound().unwrap();
        let left = cases.operand(0).unwrap().as_primary().unwrap();
        let right = cases.operand(1).unwrap().as_primary().unwrap();
        assert_eq!(left.habitat("s"), Some(&Region::from([a_only()])));
        assert_eq!(right.habitat("s"), Some(&Region::from([b_only()])));
        assert!(split.is_valid());
    }

    #[test]
    fn test_split_requires_proper_subregion() {
        let goals = GoalState::single(two_zone_spider());
        let whole = RuleArg::SpiderRegion {
            target: SubDiagramIndex::new(0, 0),
            spider: "s".into(),
            region: Region::from([a_only(), b_only()]),
        };
        assert!(matches!(
            SplitSpiders.apply(&whole, &goals),
            Err(RuleError::NotApplicable { .. })
        ));

        let outside = Zone::new(["A", "B"], Vec::<String>::new());
        assert!(SplitSpiders.apply(&split_on(outside), &goals).is_err());
    }

    #[test]
    fn test_split_candidates_one_per_zone() {
        let candidates = SplitSpiders.possible_applications(&two_zone_spider());
        assert_eq!(candidates.len(), 2);
        for candidate in &candidates {
            let goals = GoalState::single(two_zone_spider());
            assert!(SplitSpiders.apply(&candidate.arg(0), &goals).is_ok());
        }
    }

    #[test]
    fn test_split_needs_spider_region_argument() {
        let goals = GoalState::single(two_zone_spider());
        let arg = RuleArg::SubDiagram(SubDiagramIndex::new(0, 0));
        assert!(matches!(
            SplitSpiders.apply(&arg, &goals),
            Err(RuleError::InvalidArgument { .. })
        ));
    }
}
