//! Marking graph of plain place/transition nets.
use log::{debug, info, trace};

use crate::analysis::{Exploration, ExplorationError, Interned};
use crate::config::ExplorationConfig;
use crate::graph::{MarkingGraph, PlainSuccessors};
use crate::net::firing::FiringRule;
use crate::net::ids::NodeId;

pub struct ReachabilityBuilder<'n, N> {
    net: &'n N,
    config: ExplorationConfig,
}

impl<'n, N: FiringRule> ReachabilityBuilder<'n, N> {
    pub fn new(net: &'n N) -> Self {
        Self {
            net,
            config: ExplorationConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExplorationConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the complete marking graph reachable from `initial`.
    ///
    /// No safeguard applies here, whatever the configured one: on a net with
    /// infinitely many reachable markings this never returns. Use
    /// [`Self::try_build`] for a guarded exploration.
    pub fn build(&self, initial: N::Marking) -> MarkingGraph<N::Marking, PlainSuccessors> {
        let unguarded = ExplorationConfig::default();
        match self.explore(initial, &unguarded, |_, _, _| false) {
            Ok(graph) => graph,
            Err(err) => unreachable!("unguarded exploration failed: {err}"),
        }
    }

    /// Builds the marking graph from the net's own initial marking.
    pub fn build_from_initial(&self) -> MarkingGraph<N::Marking, PlainSuccessors> {
        self.build(self.net.initial_marking())
    }

    /// Worklist loop shared by both entry points. `unbounded` sees each new
    /// marking with the node it was fired from, before the marking is
    /// interned.
    fn explore<F>(
        &self,
        initial: N::Marking,
        config: &ExplorationConfig,
        unbounded: F,
    ) -> Result<MarkingGraph<N::Marking, PlainSuccessors>, ExplorationError>
    where
        F: Fn(&Exploration<N::Marking, PlainSuccessors>, NodeId, &N::Marking) -> bool,
    {
        let transitions = self.net.transition_ids();
        let mut exploration: Exploration<N::Marking, PlainSuccessors> =
            Exploration::new(initial, config);

        while let Some(current) = exploration.next_unexpanded() {
            let marking = exploration.graph().marking(current).clone();
            debug!("expanding {current:?}: {marking:?}");

            for &transition in &transitions {
                let next = match self.net.fire(&marking, transition) {
                    Ok(next) => next,
                    Err(err) => {
                        trace!("  {}: {err}", self.net.transition_name(transition));
                        continue;
                    }
                };

                if unbounded(&exploration, current, &next) {
                    let witness = exploration.witness(current, transition);
                    info!("plain net is unbounded, witness {witness:?}");
                    return Err(ExplorationError::Unbounded { witness });
                }

                let target = exploration.intern(next, current, transition)?;
                if let Interned::Fresh(id) = target {
                    trace!("  {} -> new {id:?}", self.net.transition_name(transition));
                }
                exploration
                    .successors_mut(current)
                    .insert(transition, target.id());
            }
        }

        let graph = exploration.finish();
        info!(
            "marking graph complete: {} markings, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

impl<'n, N> ReachabilityBuilder<'n, N>
where
    N: FiringRule,
    N::Marking: PartialOrd,
{
    /// Like [`Self::build`] but honours the configured state limit and, when
    /// enabled, the coverability check. Either failure discards the partial
    /// graph.
    ///
    /// The coverability check compares a new marking with the markings on
    /// the firing path that discovered its source, the way a coverability
    /// tree does. Markings on other branches never count.
    pub fn try_build(
        &self,
        initial: N::Marking,
    ) -> Result<MarkingGraph<N::Marking, PlainSuccessors>, ExplorationError> {
        let coverability_check = self.config.coverability_check;
        self.explore(initial, &self.config, |exploration, source, next| {
            coverability_check && exploration.covers_ancestor(source, next)
        })
    }
}

/// Convenience wrapper: the marking graph of `net` from its initial marking.
pub fn marking_graph<N: FiringRule>(net: &N) -> MarkingGraph<N::Marking, PlainSuccessors> {
    ReachabilityBuilder::new(net).build_from_initial()
}

/// Ids of the nodes whose marking enables nothing.
pub fn deadlocks<M>(graph: &MarkingGraph<M, PlainSuccessors>) -> Vec<NodeId> {
    graph.dead_nodes()
}
