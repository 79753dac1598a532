//! Marking graph of predicate nets.
//!
//! Each transition fires once per fireable binding, so edges are indexed by
//! transition and binding. Before a produced marking is accepted it is
//! compared against every marking discovered so far: strict coverage proves
//! that some firing sequence can be repeated forever with growing token
//! counts, and the whole construction is abandoned.
use log::{debug, info, trace};

use crate::analysis::{Exploration, ExplorationError, Interned};
use crate::config::ExplorationConfig;
use crate::graph::PredicateMarkingGraph;
use crate::graph::PredicateSuccessors;
use crate::net::firing::BindingFiringRule;
use crate::predicate::PredicateMarking;

pub struct PredicateReachabilityBuilder<'n, N> {
    net: &'n N,
    config: ExplorationConfig,
}

impl<'n, N: BindingFiringRule> PredicateReachabilityBuilder<'n, N> {
    pub fn new(net: &'n N) -> Self {
        Self {
            net,
            config: ExplorationConfig::default(),
        }
    }

    /// Only `state_limit` is read; the coverage check is always on.
    pub fn with_config(mut self, config: ExplorationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build_from_initial(&self) -> Result<PredicateMarkingGraph<N::Token>, ExplorationError> {
        self.build(self.net.initial_marking())
    }

    /// Builds the marking graph reachable from `initial`, or reports that no
    /// finite one exists. No partial graph is returned on failure.
    pub fn build(
        &self,
        initial: PredicateMarking<N::Token>,
    ) -> Result<PredicateMarkingGraph<N::Token>, ExplorationError> {
        let transitions = self.net.transition_ids();
        let mut exploration: Exploration<
            PredicateMarking<N::Token>,
            PredicateSuccessors<N::Token>,
        > = Exploration::new(initial, &self.config);

        while let Some(current) = exploration.next_unexpanded() {
            let marking = exploration.graph().marking(current).clone();
            debug!("expanding {current:?}: {marking:?}");

            for &transition in &transitions {
                // Every transition gets an entry, even one that never fires.
                exploration.successors_mut(current).bindings_mut(transition);

                for binding in self.net.fireable_bindings(transition, &marking) {
                    let next = match self.net.fire_with(transition, &marking, &binding) {
                        Ok(next) => next,
                        Err(err) => {
                            trace!(
                                "  {} {binding:?}: {err}",
                                self.net.transition_name(transition)
                            );
                            continue;
                        }
                    };

                    if covers_discovered(exploration.graph(), &next) {
                        let witness = exploration.witness(current, transition);
                        info!(
                            "predicate net is unbounded: {} with {binding:?} after {witness:?}",
                            self.net.transition_name(transition)
                        );
                        return Err(ExplorationError::Unbounded { witness });
                    }

                    let target = exploration.intern(next, current, transition)?;
                    if let Interned::Fresh(id) = target {
                        trace!(
                            "  {} {binding:?} -> new {id:?}",
                            self.net.transition_name(transition)
                        );
                    }
                    exploration
                        .successors_mut(current)
                        .bindings_mut(transition)
                        .insert(binding, target.id());
                }
            }
        }

        let graph = exploration.finish();
        info!(
            "predicate marking graph complete: {} markings, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Ok(graph)
    }
}

/// Strict coverage implies strictly more tokens in total, which rules most
/// candidates out before the place-by-place comparison.
fn covers_discovered<T>(
    graph: &PredicateMarkingGraph<T>,
    marking: &PredicateMarking<T>,
) -> bool
where
    T: Clone + Eq + std::hash::Hash + std::fmt::Debug,
{
    let tokens = marking.token_count();
    graph.nodes().any(|(_, node)| {
        node.marking().token_count() < tokens && marking.strictly_covers(node.marking())
    })
}

/// Convenience wrapper: the marking graph of `net` from its initial marking.
pub fn predicate_marking_graph<N: BindingFiringRule>(
    net: &N,
) -> Result<PredicateMarkingGraph<N::Token>, ExplorationError> {
    PredicateReachabilityBuilder::new(net).build_from_initial()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::ids::TransitionId;
    use crate::predicate::{Binding, Label, PredicateNet, PredicateTransition};

    #[test]
    fn duplicating_transition_is_unbounded() {
        let mut net = PredicateNet::new(["p"]).with_tokens("p", ['a']);
        net.add_transition(
            PredicateTransition::new("dup")
                .consume("p", vec![Label::variable("x")])
                .produce("p", vec![Label::variable("x"), Label::variable("x")]),
        );

        assert_eq!(
            predicate_marking_graph(&net).unwrap_err(),
            ExplorationError::Unbounded {
                witness: vec![TransitionId::new(0)]
            }
        );
    }

    #[test]
    fn each_binding_gets_its_own_edge() {
        let mut net = PredicateNet::new(["src", "dst"]).with_tokens("src", [1, 2]);
        let mv = net.add_transition(
            PredicateTransition::new("move")
                .consume("src", vec![Label::variable("x")])
                .produce("dst", vec![Label::variable("x")]),
        );

        let graph = predicate_marking_graph(&net).unwrap();
        let root = graph.root_node();
        let edges = root.successors().get(mv).unwrap();

        // {1,2}|{} -> {2}|{1}, {1}|{2} -> {}|{1,2}
        assert_eq!(graph.count(), 4);
        assert_eq!(edges.len(), 2);
        assert_ne!(
            edges.get(&Binding::new().with("x", 1)),
            edges.get(&Binding::new().with("x", 2))
        );
    }

    #[test]
    fn converging_firings_share_a_node() {
        let mut net = PredicateNet::new(["src", "dst"]).with_tokens("src", [1, 2]);
        net.add_transition(
            PredicateTransition::new("move")
                .consume("src", vec![Label::variable("x")])
                .produce("dst", vec![Label::variable("x")]),
        );

        let graph = predicate_marking_graph(&net).unwrap();
        let done = PredicateMarking::new()
            .with_place("dst", [1, 2])
            .with_place("src", []);
        let sink = graph.find(&done).unwrap();

        let incoming = graph
            .nodes()
            .filter(|(id, _)| graph.successors_of(*id).contains(&sink))
            .count();
        assert_eq!(incoming, 2);
        assert_eq!(graph.dead_nodes(), vec![sink]);
    }

    #[test]
    fn state_limit_applies_to_predicate_nets() {
        let mut net = PredicateNet::new(["src", "dst"]).with_tokens("src", [1, 2, 3]);
        net.add_transition(
            PredicateTransition::new("move")
                .consume("src", vec![Label::variable("x")])
                .produce("dst", vec![Label::variable("x")]),
        );

        let result = PredicateReachabilityBuilder::new(&net)
            .with_config(ExplorationConfig::default().with_state_limit(Some(3)))
            .build_from_initial();
        assert_eq!(result.unwrap_err(), ExplorationError::StateLimit { limit: 3 });
    }
}
