//! 可达图构造：普通 P/T 网与谓词网两种构造器。
//!
//! 两者共用同一个工作表骨架：前沿队列中取出一个节点，对每个迁移（及其每个
//! 绑定）尝试发生，新标识经哈希索引去重后或复用已有节点，或创建新节点入队。

pub mod predicate;
pub mod reachability;

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::hash::Hash;

use thiserror::Error;

use crate::config::ExplorationConfig;
use crate::graph::{MarkingGraph, SuccessorMap};
use crate::net::ids::{NodeId, TransitionId};
use crate::net::index_vec::IndexVec;

pub use predicate::PredicateReachabilityBuilder;
pub use reachability::ReachabilityBuilder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorationError {
    /// Firing `witness` from the initial marking reaches a marking that
    /// strictly covers one seen before; the reachable state space is infinite.
    #[error("state space is unbounded: firing {witness:?} strictly covers an earlier marking")]
    Unbounded { witness: Vec<TransitionId> },
    #[error("exploration stopped after discovering {limit} markings")]
    StateLimit { limit: usize },
}

/// Outcome of interning a marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interned {
    Existing(NodeId),
    Fresh(NodeId),
}

impl Interned {
    pub(crate) fn id(self) -> NodeId {
        match self {
            Interned::Existing(id) | Interned::Fresh(id) => id,
        }
    }
}

/// Worklist state of one builder invocation: the growing graph, the FIFO
/// frontier, and for every node the edge that discovered it.
pub(crate) struct Exploration<M, S> {
    graph: MarkingGraph<M, S>,
    frontier: VecDeque<NodeId>,
    discovered_by: IndexVec<NodeId, Option<(NodeId, TransitionId)>>,
    state_limit: Option<usize>,
}

impl<M, S> Exploration<M, S>
where
    M: Clone + Eq + Hash,
    S: SuccessorMap,
{
    pub(crate) fn new(initial: M, config: &ExplorationConfig) -> Self {
        let graph = MarkingGraph::with_root(initial);
        let root = graph.root();
        let mut discovered_by = IndexVec::new();
        discovered_by.push(None);
        Self {
            graph,
            frontier: VecDeque::from([root]),
            discovered_by,
            state_limit: config.state_limit,
        }
    }

    pub(crate) fn graph(&self) -> &MarkingGraph<M, S> {
        &self.graph
    }

    pub(crate) fn next_unexpanded(&mut self) -> Option<NodeId> {
        self.frontier.pop_front()
    }

    pub(crate) fn successors_mut(&mut self, node: NodeId) -> &mut S {
        self.graph.successors_mut(node)
    }

    /// Returns the node holding `marking`, creating and enqueuing it when the
    /// marking has not been seen. Fails only when a new node would exceed the
    /// state limit.
    pub(crate) fn intern(
        &mut self,
        marking: M,
        source: NodeId,
        transition: TransitionId,
    ) -> Result<Interned, ExplorationError> {
        if let Some(existing) = self.graph.find(&marking) {
            return Ok(Interned::Existing(existing));
        }
        if let Some(limit) = self.state_limit {
            if self.graph.node_count() >= limit {
                return Err(ExplorationError::StateLimit { limit });
            }
        }
        let id = self.graph.add_node(marking);
        self.discovered_by.push(Some((source, transition)));
        self.frontier.push_back(id);
        Ok(Interned::Fresh(id))
    }

    /// Transitions fired from the root to reach `node`, then `last`.
    pub(crate) fn witness(&self, node: NodeId, last: TransitionId) -> Vec<TransitionId> {
        let mut witness = vec![last];
        let mut current = node;
        while let Some((parent, transition)) = self.discovered_by[current] {
            witness.push(transition);
            current = parent;
        }
        witness.reverse();
        witness
    }

    /// Whether `marking` strictly covers `node` or a node on the discovery
    /// path from the root to it. Every such path is a firing sequence, so a
    /// hit means the covering step can be repeated forever.
    pub(crate) fn covers_ancestor(&self, node: NodeId, marking: &M) -> bool
    where
        M: PartialOrd,
    {
        let mut current = Some(node);
        while let Some(id) = current {
            if marking.partial_cmp(self.graph.marking(id)) == Some(Ordering::Greater) {
                return true;
            }
            current = self.discovered_by[id].map(|(parent, _)| parent);
        }
        false
    }

    pub(crate) fn finish(self) -> MarkingGraph<M, S> {
        self.graph
    }
}
