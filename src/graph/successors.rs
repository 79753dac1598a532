//! Outgoing edges of a marking-graph node.
//!
//! Plain nets label an edge with its transition only; predicate nets label it
//! with the transition and the binding it fired under, so one transition may
//! leave a node along several edges.
use std::fmt;
use std::hash::Hash;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::net::ids::{NodeId, TransitionId};
use crate::predicate::Binding;

/// A labelled edge, as reported for display and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeView {
    pub transition: TransitionId,
    pub binding: Option<String>,
    pub target: NodeId,
}

pub trait SuccessorMap: Default {
    /// Calls `f` once per outgoing edge with the edge's target.
    fn for_each_target<F: FnMut(NodeId)>(&self, f: F);

    fn edge_count(&self) -> usize;

    /// No outgoing edge at all: the marking is dead.
    fn is_dead(&self) -> bool {
        self.edge_count() == 0
    }

    fn edges(&self) -> Vec<EdgeView>;
}

/// Transition → successor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainSuccessors {
    edges: IndexMap<TransitionId, NodeId, FxBuildHasher>,
}

impl PlainSuccessors {
    pub fn get(&self, transition: TransitionId) -> Option<NodeId> {
        self.edges.get(&transition).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransitionId, NodeId)> {
        self.edges.iter().map(|(t, n)| (*t, *n))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn insert(&mut self, transition: TransitionId, target: NodeId) -> Option<NodeId> {
        self.edges.insert(transition, target)
    }
}

impl SuccessorMap for PlainSuccessors {
    fn for_each_target<F: FnMut(NodeId)>(&self, mut f: F) {
        for target in self.edges.values() {
            f(*target);
        }
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edges(&self) -> Vec<EdgeView> {
        self.iter()
            .map(|(transition, target)| EdgeView {
                transition,
                binding: None,
                target,
            })
            .collect()
    }
}

/// Binding → successor, for the edges of one predicate transition.
///
/// Lookups, inserts and overwrites go through a hash index on the binding.
#[derive(Clone)]
pub struct BindingMap<T> {
    entries: IndexMap<Binding<T>, NodeId, FxBuildHasher>,
}

impl<T: Eq + Hash> BindingMap<T> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::default(),
        }
    }

    pub fn get(&self, binding: &Binding<T>) -> Option<NodeId> {
        self.entries.get(binding).copied()
    }

    /// Inserts or overwrites; returns the previous target, if any.
    pub fn insert(&mut self, binding: Binding<T>, target: NodeId) -> Option<NodeId> {
        self.entries.insert(binding, target)
    }

    pub fn remove(&mut self, binding: &Binding<T>) -> Option<NodeId> {
        self.entries.shift_remove(binding)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Binding<T>, NodeId)> {
        self.entries.iter().map(|(binding, node)| (binding, *node))
    }

    pub fn targets(&self) -> impl Iterator<Item = NodeId> {
        self.entries.values().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Eq + Hash> Default for BindingMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for BindingMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Transition → (binding → successor). Once a node has been expanded every
/// transition of the model has an entry here, empty if it never fired.
#[derive(Clone)]
pub struct PredicateSuccessors<T> {
    by_transition: IndexMap<TransitionId, BindingMap<T>, FxBuildHasher>,
}

impl<T: Eq + Hash> PredicateSuccessors<T> {
    pub fn get(&self, transition: TransitionId) -> Option<&BindingMap<T>> {
        self.by_transition.get(&transition)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransitionId, &BindingMap<T>)> {
        self.by_transition.iter().map(|(t, map)| (*t, map))
    }

    pub fn transitions(&self) -> impl Iterator<Item = TransitionId> {
        self.by_transition.keys().copied()
    }

    pub(crate) fn bindings_mut(&mut self, transition: TransitionId) -> &mut BindingMap<T> {
        self.by_transition.entry(transition).or_default()
    }
}

impl<T: Eq + Hash> Default for PredicateSuccessors<T> {
    fn default() -> Self {
        Self {
            by_transition: IndexMap::default(),
        }
    }
}

impl<T: Eq + Hash + fmt::Debug> SuccessorMap for PredicateSuccessors<T> {
    fn for_each_target<F: FnMut(NodeId)>(&self, mut f: F) {
        for bindings in self.by_transition.values() {
            for target in bindings.targets() {
                f(target);
            }
        }
    }

    fn edge_count(&self) -> usize {
        self.by_transition.values().map(BindingMap::len).sum()
    }

    fn edges(&self) -> Vec<EdgeView> {
        self.iter()
            .flat_map(|(transition, bindings)| {
                bindings.iter().map(move |(binding, target)| EdgeView {
                    transition,
                    binding: Some(format!("{binding:?}")),
                    target,
                })
            })
            .collect()
    }
}

impl<T: fmt::Debug> fmt::Debug for PredicateSuccessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.by_transition.iter()).finish()
    }
}
