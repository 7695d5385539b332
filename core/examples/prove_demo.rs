//! Demonstration of automatic proof search
//!
//! Run with: cargo run --example prove_demo

use spider_reasoner_core::rules::{generate, ConjunctionElimination};
use spider_reasoner_core::*;

fn main() {
    println!("=== Spider Reasoner Demo ===\n");

    // 1. Diagrams
    println!("1. Diagrams:");
    let zone = Zone::new(["A"], ["B"]);
    let spider = SpiderDiagram::primary(["s"], [("s", Region::from([zone.clone()]))], []).unwrap();
    let no_habitats: Vec<(String, Region)> = Vec::new();
    let shading = SpiderDiagram::primary(Vec::<String>::new(), no_habitats, [zone]).unwrap();
    let goal = SpiderDiagram::implication(
        SpiderDiagram::conjunction(spider.clone(), shading),
        spider,
    );
    println!("   Goal: {}", goal);
    println!("   Sub-diagrams: {}\n", goal.sub_diagram_count());

    // 2. Occurrences
    println!("2. Occurrences:");
    for occurrence in goal.occurrences() {
        println!("   #{}: {:?}", occurrence.index(), occurrence.operator());
    }
    println!();

    // 3. Candidates
    println!("3. Candidate rule applications:");
    let goals = GoalState::single(goal);
    for (subgoal, candidate) in generate(&all_rules(), &goals) {
        println!("   {} {}", candidate.rule.id(), candidate.arg(subgoal));
    }
    println!();

    // 4. Interactive step and undo
    println!("4. Proof trace:");
    let mut proof = ProofTrace::new(goals.clone());
    let arg = RuleArg::Multiple(vec![SubDiagramIndex::new(0, 1), SubDiagramIndex::new(0, 2)]);
    match proof.apply_rule(&ConjunctionElimination, arg, ApplicationKind::Interactive) {
        Ok(()) => println!("   After one step:\n{}", proof.last_goals()),
        Err(err) => println!("   Step failed: {}", err),
    }
    proof.undo_step();
    println!("   Undone, {} state(s) left\n", proof.len());

    // 5. Automatic search
    println!("5. Automatic search:");
    let result = AutomaticProver::with_defaults().generate_proof(goals);
    println!("   Status: {:?}", result.status);
    println!("   States explored: {}", result.states_explored);
    if let Some(proof) = result.proof {
        print!("{}", proof);
        let stats = proof.statistics();
        println!("   Steps: {}, rules used: {:?}", stats.num_steps, stats.rules_used);
    }
}
