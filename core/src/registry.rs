//! Name registry for rules, strategies and prover kinds
//!
//! Configuration refers to components by stable names. An unknown name is
//! a [`ConfigError`]; callers that can carry on use the `*_or_default`
//! lookups, which log the problem once and fall back to the defaults.

use crate::rules::{all_rules, RuleRef};
use crate::search::{
    AutomaticProver, ConnectiveCountStrategy, ImplicationStrategy, NoStrategy, ProverConfig,
    ProverKind, Strategy,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// Name of the strategy used when none is configured
pub const DEFAULT_STRATEGY: &str = "none";

/// Name of the prover used when none is configured
pub const DEFAULT_PROVER: &str = "breadth_first";

/// Unknown component names
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown inference rule {0:?}")]
    UnknownRule(String),

    #[error("unknown strategy {0:?}")]
    UnknownStrategy(String),

    #[error("unknown prover {0:?}")]
    UnknownProver(String),
}

/// Result type for registry lookups
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ProverKind {
    pub const ALL: [ProverKind; 2] = [ProverKind::BreadthFirst, ProverKind::BestFirst];

    /// Stable name of this prover
    pub fn name(self) -> &'static str {
        match self {
            ProverKind::BreadthFirst => "breadth_first",
            ProverKind::BestFirst => "best_first",
        }
    }
}

/// Names of every registered strategy
pub fn strategy_names() -> Vec<&'static str> {
    all_strategies().iter().map(|s| s.name()).collect()
}

fn all_strategies() -> Vec<Arc<dyn Strategy>> {
    vec![
        Arc::new(NoStrategy),
        Arc::new(ConnectiveCountStrategy),
        Arc::new(ImplicationStrategy),
    ]
}

pub fn strategy_by_name(name: &str) -> ConfigResult<Arc<dyn Strategy>> {
    all_strategies()
        .into_iter()
        .find(|strategy| strategy.name() == name)
        .ok_or_else(|| ConfigError::UnknownStrategy(name.to_string()))
}

/// The named strategy, or the default one if the name is unknown
pub fn strategy_or_default(name: &str) -> Arc<dyn Strategy> {
    strategy_by_name(name).unwrap_or_else(|err| {
        warn!(%err, fallback = DEFAULT_STRATEGY, "using default strategy");
        Arc::new(NoStrategy)
    })
}

pub fn prover_kind_by_name(name: &str) -> ConfigResult<ProverKind> {
    ProverKind::ALL
        .into_iter()
        .find(|kind| kind.name() == name)
        .ok_or_else(|| ConfigError::UnknownProver(name.to_string()))
}

/// The named prover kind, or the default one if the name is unknown
pub fn prover_kind_or_default(name: &str) -> ProverKind {
    prover_kind_by_name(name).unwrap_or_else(|err| {
        warn!(%err, fallback = DEFAULT_PROVER, "using default prover");
        ProverKind::default()
    })
}

/// Names of every registered rule
pub fn rule_names() -> Vec<&'static str> {
    all_rules().iter().map(|rule| rule.id()).collect()
}

pub fn rule_by_name(name: &str) -> ConfigResult<RuleRef> {
    all_rules()
        .into_iter()
        .find(|rule| rule.id() == name)
        .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))
}

/// Look up several rules, keeping the given order
pub fn rules_by_names<S: AsRef<str>>(names: &[S]) -> ConfigResult<Vec<RuleRef>> {
    names.iter().map(|name| rule_by_name(name.as_ref())).collect()
}

/// Build a prover from its configuration, defaulting an unknown strategy
pub fn build_prover(config: ProverConfig, rules: Vec<RuleRef>) -> AutomaticProver {
    let strategy = strategy_or_default(&config.strategy);
    AutomaticProver::new(config, rules, strategy)
}
