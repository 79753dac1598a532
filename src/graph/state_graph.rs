use std::fmt;
use std::hash::Hash;

use petgraph::Graph;
use petgraph::dot::Dot;
use petgraph::graph::NodeIndex;
use rustc_hash::FxHashMap;

use crate::graph::successors::{PlainSuccessors, PredicateSuccessors, SuccessorMap};
use crate::graph::traversal::Reachable;
use crate::net::ids::{NodeId, TransitionId};
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::Marking;
use crate::predicate::PredicateMarking;

/// One distinct reachable marking and its outgoing edges.
#[derive(Debug, Clone)]
pub struct MarkingNode<M, S> {
    marking: M,
    successors: S,
}

impl<M, S> MarkingNode<M, S> {
    pub fn marking(&self) -> &M {
        &self.marking
    }

    pub fn successors(&self) -> &S {
        &self.successors
    }
}

/// Reachability graph stored as an arena: nodes live in one vector and edges
/// refer to them by [`NodeId`], so cycles need no shared ownership.
///
/// Only the builders in [`crate::analysis`] grow a graph; once handed out it
/// is read-only. Every marking occurs in exactly one node, and `index` maps
/// it back to that node.
#[derive(Debug, Clone)]
pub struct MarkingGraph<M, S> {
    nodes: IndexVec<NodeId, MarkingNode<M, S>>,
    index: FxHashMap<M, NodeId>,
    root: NodeId,
}

pub type PlainMarkingGraph = MarkingGraph<Marking, PlainSuccessors>;
pub type PredicateMarkingGraph<T> = MarkingGraph<PredicateMarking<T>, PredicateSuccessors<T>>;

impl<M: Clone + Eq + Hash, S: SuccessorMap> MarkingGraph<M, S> {
    pub(crate) fn with_root(marking: M) -> Self {
        let mut graph = Self {
            nodes: IndexVec::new(),
            index: FxHashMap::default(),
            root: NodeId::new(0),
        };
        graph.root = graph.add_node(marking);
        graph
    }

    /// Appends a node for a marking the graph does not hold yet.
    pub(crate) fn add_node(&mut self, marking: M) -> NodeId {
        debug_assert!(!self.index.contains_key(&marking));
        let id = self.nodes.push(MarkingNode {
            marking: marking.clone(),
            successors: S::default(),
        });
        self.index.insert(marking, id);
        id
    }

    pub fn find(&self, marking: &M) -> Option<NodeId> {
        self.index.get(marking).copied()
    }

    pub fn contains_marking(&self, marking: &M) -> bool {
        self.index.contains_key(marking)
    }
}

impl<M, S: SuccessorMap> MarkingGraph<M, S> {
    pub(crate) fn successors_mut(&mut self, node: NodeId) -> &mut S {
        &mut self.nodes[node].successors
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_node(&self) -> &MarkingNode<M, S> {
        &self.nodes[self.root]
    }

    /// # Panics
    /// If `id` does not belong to this graph.
    pub fn node(&self, id: NodeId) -> &MarkingNode<M, S> {
        &self.nodes[id]
    }

    pub fn get(&self, id: NodeId) -> Option<&MarkingNode<M, S>> {
        self.nodes.get(id)
    }

    pub fn marking(&self, id: NodeId) -> &M {
        &self.nodes[id].marking
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.successors.edge_count()).sum()
    }

    /// Every node of the arena in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &MarkingNode<M, S>)> {
        self.nodes.iter_enumerated()
    }

    /// Walks the nodes reachable from `start`, `start` included. Each call
    /// starts a fresh walk.
    pub fn iter_from(&self, start: NodeId) -> Reachable<'_, M, S> {
        Reachable::new(self, start)
    }

    pub fn iter(&self) -> Reachable<'_, M, S> {
        self.iter_from(self.root)
    }

    /// Number of distinct markings reachable from `start`.
    pub fn count_from(&self, start: NodeId) -> usize {
        self.iter_from(start).count()
    }

    /// Number of distinct markings reachable from the root.
    pub fn count(&self) -> usize {
        self.count_from(self.root)
    }

    /// Reachable nodes without any outgoing edge (deadlocks).
    pub fn dead_nodes(&self) -> Vec<NodeId> {
        let mut dead: Vec<NodeId> = self
            .iter()
            .filter(|(_, node)| node.successors.is_dead())
            .map(|(id, _)| id)
            .collect();
        dead.sort();
        dead
    }

    pub fn successors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut targets = Vec::new();
        self.nodes[id]
            .successors
            .for_each_target(|target| targets.push(target));
        targets
    }
}

impl<M: fmt::Debug, S: SuccessorMap> MarkingGraph<M, S> {
    /// Copies the graph into a petgraph [`Graph`] whose weights are display
    /// labels. Node indices match [`NodeId`]s.
    pub fn to_petgraph<F>(&self, transition_name: F) -> Graph<String, String>
    where
        F: Fn(TransitionId) -> String,
    {
        let mut graph = Graph::with_capacity(self.node_count(), self.edge_count());
        for (id, node) in self.nodes.iter_enumerated() {
            graph.add_node(format!("{id:?}: {:?}", node.marking));
        }
        for (id, node) in self.nodes.iter_enumerated() {
            for edge in node.successors.edges() {
                let label = match edge.binding {
                    Some(binding) => format!("{} {binding}", transition_name(edge.transition)),
                    None => transition_name(edge.transition),
                };
                graph.add_edge(
                    NodeIndex::new(id.index()),
                    NodeIndex::new(edge.target.index()),
                    label,
                );
            }
        }
        graph
    }

    /// DOT rendering of the graph, transitions named by `transition_name`.
    pub fn dot<F>(&self, transition_name: F) -> String
    where
        F: Fn(TransitionId) -> String,
    {
        format!("{}", Dot::new(&self.to_petgraph(transition_name)))
    }
}
