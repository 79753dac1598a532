//! The narrow interface through which the graph builders talk to a net model.
//!
//! A builder never looks inside a model: it asks for the transitions, the
//! initial marking, and the successor marking of a firing. Any [`FireError`]
//! is read as "not enabled here" and simply yields no edge.
use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

use crate::net::ids::{PlaceId, TransitionId};
use crate::net::structure::Weight;
use crate::predicate::{Binding, PredicateMarking};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FireError {
    #[error("transition {0:?} is out of bounds")]
    OutOfBounds(TransitionId),
    #[error("transition {0:?} is not enabled under the supplied marking")]
    NotEnabled(TransitionId),
    #[error("capacity exceeded at place {place:?}: {after} > {capacity}")]
    Capacity {
        place: PlaceId,
        after: Weight,
        capacity: Weight,
    },
    #[error("variable `{0}` is not bound")]
    UnboundVariable(String),
    #[error("place `{0}` is not part of the marking")]
    UnknownPlace(String),
    #[error("guard of transition {0:?} rejects the binding")]
    GuardRejected(TransitionId),
}

/// Firing rule of a plain place/transition net.
pub trait FiringRule {
    type Marking: Clone + Eq + Hash + Debug;

    fn transition_ids(&self) -> Vec<TransitionId>;

    fn transition_name(&self, transition: TransitionId) -> String {
        format!("{transition:?}")
    }

    fn initial_marking(&self) -> Self::Marking;

    fn fire(
        &self,
        marking: &Self::Marking,
        transition: TransitionId,
    ) -> Result<Self::Marking, FireError>;
}

/// Firing rule of a predicate net, where a transition fires once per binding
/// of its variables.
pub trait BindingFiringRule {
    type Token: Clone + Eq + Hash + Debug;

    fn transition_ids(&self) -> Vec<TransitionId>;

    fn transition_name(&self, transition: TransitionId) -> String {
        format!("{transition:?}")
    }

    fn initial_marking(&self) -> PredicateMarking<Self::Token>;

    fn fireable_bindings(
        &self,
        transition: TransitionId,
        marking: &PredicateMarking<Self::Token>,
    ) -> Vec<Binding<Self::Token>>;

    fn fire_with(
        &self,
        transition: TransitionId,
        marking: &PredicateMarking<Self::Token>,
        binding: &Binding<Self::Token>,
    ) -> Result<PredicateMarking<Self::Token>, FireError>;
}
