use rustc_hash::FxHashSet;

use crate::graph::state_graph::{MarkingGraph, MarkingNode};
use crate::graph::successors::SuccessorMap;
use crate::net::ids::NodeId;

/// Lazy depth-first walk over the nodes reachable from a start node.
///
/// Nodes are remembered by id, so every node is yielded exactly once however
/// many edges or cycles lead back to it.
pub struct Reachable<'g, M, S> {
    graph: &'g MarkingGraph<M, S>,
    stack: Vec<NodeId>,
    visited: FxHashSet<NodeId>,
}

impl<'g, M, S: SuccessorMap> Reachable<'g, M, S> {
    pub(crate) fn new(graph: &'g MarkingGraph<M, S>, start: NodeId) -> Self {
        let mut visited = FxHashSet::default();
        let mut stack = Vec::new();
        if graph.get(start).is_some() {
            visited.insert(start);
            stack.push(start);
        }
        Self {
            graph,
            stack,
            visited,
        }
    }
}

impl<'g, M, S: SuccessorMap> Iterator for Reachable<'g, M, S> {
    type Item = (NodeId, &'g MarkingNode<M, S>);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let node = self.graph.node(current);
        node.successors().for_each_target(|target| {
            if self.visited.insert(target) {
                self.stack.push(target);
            }
        });
        Some((current, node))
    }
}

impl<M, S: SuccessorMap> std::iter::FusedIterator for Reachable<'_, M, S> {}
