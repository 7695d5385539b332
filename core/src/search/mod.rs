//! Search module - automatic proof search with pluggable strategies
//!
//! The prover explores goal states best-first; strategies decide the order.

pub mod prover;
pub mod strategy;

pub use prover::*;
pub use strategy::*;
