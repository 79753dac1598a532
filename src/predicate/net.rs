//! Reference predicate-net model: arcs carry labels that are evaluated under
//! a binding of the transition's variables.
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use itertools::Itertools;
use log::trace;

use crate::net::firing::{BindingFiringRule, FireError};
use crate::net::ids::TransitionId;
use crate::net::index_vec::IndexVec;
use crate::predicate::binding::Binding;
use crate::predicate::marking::PredicateMarking;
use crate::predicate::multiset::Multiset;

pub type TokenFn<T> = Arc<dyn Fn(&Binding<T>) -> T + Send + Sync>;
pub type Guard<T> = Arc<dyn Fn(&Binding<T>) -> bool + Send + Sync>;

/// One token consumed or produced by an arc.
#[derive(Clone)]
pub enum Label<T> {
    Variable(String),
    Constant(T),
    Function(TokenFn<T>),
}

impl<T: Clone> Label<T> {
    pub fn variable(name: impl Into<String>) -> Self {
        Label::Variable(name.into())
    }

    pub fn constant(value: T) -> Self {
        Label::Constant(value)
    }

    pub fn function(f: impl Fn(&Binding<T>) -> T + Send + Sync + 'static) -> Self {
        Label::Function(Arc::new(f))
    }

    pub fn evaluate(&self, binding: &Binding<T>) -> Result<T, FireError> {
        match self {
            Label::Variable(name) => binding
                .get(name)
                .cloned()
                .ok_or_else(|| FireError::UnboundVariable(name.clone())),
            Label::Constant(value) => Ok(value.clone()),
            Label::Function(f) => Ok(f(binding)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Label<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Variable(name) => write!(f, "{name}"),
            Label::Constant(value) => write!(f, "{value:?}"),
            Label::Function(_) => write!(f, "<fn>"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PredicateArc<T> {
    pub place: String,
    pub labels: Vec<Label<T>>,
}

#[derive(Clone)]
pub struct PredicateTransition<T> {
    pub name: String,
    pub preconditions: Vec<PredicateArc<T>>,
    pub postconditions: Vec<PredicateArc<T>>,
    guard: Option<Guard<T>>,
}

impl<T: Clone + Eq + Hash> PredicateTransition<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            preconditions: Vec::new(),
            postconditions: Vec::new(),
            guard: None,
        }
    }

    pub fn consume(mut self, place: impl Into<String>, labels: Vec<Label<T>>) -> Self {
        self.preconditions.push(PredicateArc {
            place: place.into(),
            labels,
        });
        self
    }

    pub fn produce(mut self, place: impl Into<String>, labels: Vec<Label<T>>) -> Self {
        self.postconditions.push(PredicateArc {
            place: place.into(),
            labels,
        });
        self
    }

    pub fn with_guard(mut self, guard: impl Fn(&Binding<T>) -> bool + Send + Sync + 'static) -> Self {
        self.guard = Some(Arc::new(guard));
        self
    }

    /// Variables read by the preconditions, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        self.preconditions
            .iter()
            .flat_map(|arc| arc.labels.iter())
            .filter_map(|label| match label {
                Label::Variable(name) => Some(name.as_str()),
                _ => None,
            })
            .unique()
            .collect()
    }

    pub fn accepts(&self, binding: &Binding<T>) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(binding))
    }

    fn evaluate_arcs(
        arcs: &[PredicateArc<T>],
        binding: &Binding<T>,
    ) -> Result<BTreeMap<String, Multiset<T>>, FireError> {
        let mut tokens: BTreeMap<String, Multiset<T>> = BTreeMap::new();
        for arc in arcs {
            let entry = tokens.entry(arc.place.clone()).or_default();
            for label in &arc.labels {
                entry.insert(label.evaluate(binding)?);
            }
        }
        Ok(tokens)
    }

    /// Tokens the transition takes from each place under `binding`.
    pub fn consumed(&self, binding: &Binding<T>) -> Result<BTreeMap<String, Multiset<T>>, FireError> {
        Self::evaluate_arcs(&self.preconditions, binding)
    }

    /// Tokens the transition puts into each place under `binding`.
    pub fn produced(&self, binding: &Binding<T>) -> Result<BTreeMap<String, Multiset<T>>, FireError> {
        Self::evaluate_arcs(&self.postconditions, binding)
    }
}

impl<T: fmt::Debug> fmt::Debug for PredicateTransition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateTransition")
            .field("name", &self.name)
            .field("preconditions", &self.preconditions)
            .field("postconditions", &self.postconditions)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct PredicateNet<T: Eq + Hash> {
    pub transitions: IndexVec<TransitionId, PredicateTransition<T>>,
    initial: PredicateMarking<T>,
}

impl<T: Clone + Eq + Hash + fmt::Debug> PredicateNet<T> {
    /// A net over `places`, all of them initially empty.
    pub fn new<P: Into<String>>(places: impl IntoIterator<Item = P>) -> Self {
        let initial = places
            .into_iter()
            .fold(PredicateMarking::new(), |marking, place| {
                marking.with_place(place, std::iter::empty())
            });
        Self {
            transitions: IndexVec::new(),
            initial,
        }
    }

    pub fn add_transition(&mut self, transition: PredicateTransition<T>) -> TransitionId {
        self.transitions.push(transition)
    }

    pub fn set_tokens(&mut self, place: &str, tokens: impl IntoIterator<Item = T>) {
        if let Some(current) = self.initial.tokens_mut(place) {
            *current = tokens.into_iter().collect();
        }
    }

    pub fn with_tokens(mut self, place: &str, tokens: impl IntoIterator<Item = T>) -> Self {
        self.set_tokens(place, tokens);
        self
    }

    pub fn transition_by_name(&self, name: &str) -> Option<TransitionId> {
        self.transitions
            .iter_enumerated()
            .find(|(_, transition)| transition.name == name)
            .map(|(id, _)| id)
    }

    fn transition(&self, id: TransitionId) -> Result<&PredicateTransition<T>, FireError> {
        self.transitions.get(id).ok_or(FireError::OutOfBounds(id))
    }

    /// Candidate values of `variable`: tokens present in every precondition
    /// place that mentions it.
    fn candidates(
        transition: &PredicateTransition<T>,
        variable: &str,
        marking: &PredicateMarking<T>,
    ) -> Vec<T> {
        let mut places = transition.preconditions.iter().filter(|arc| {
            arc.labels
                .iter()
                .any(|label| matches!(label, Label::Variable(name) if name == variable))
        });
        let Some(first) = places.next().and_then(|arc| marking.tokens(&arc.place)) else {
            return Vec::new();
        };
        let rest: Vec<_> = places.collect();
        first
            .distinct()
            .filter(|value| {
                rest.iter().all(|arc| {
                    marking
                        .tokens(&arc.place)
                        .is_some_and(|tokens| tokens.contains(value))
                })
            })
            .cloned()
            .collect()
    }

    fn consumes_available(
        transition: &PredicateTransition<T>,
        marking: &PredicateMarking<T>,
        binding: &Binding<T>,
    ) -> bool {
        transition.accepts(binding)
            && transition.consumed(binding).is_ok_and(|consumed| {
                consumed.iter().all(|(place, tokens)| {
                    marking
                        .tokens(place)
                        .is_some_and(|available| available.contains_all(tokens))
                })
            })
    }
}

impl<T: Clone + Eq + Hash + fmt::Debug> BindingFiringRule for PredicateNet<T> {
    type Token = T;

    fn transition_ids(&self) -> Vec<TransitionId> {
        self.transitions.indices().collect()
    }

    fn transition_name(&self, transition: TransitionId) -> String {
        self.transitions
            .get(transition)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("{transition:?}"))
    }

    fn initial_marking(&self) -> PredicateMarking<T> {
        self.initial.clone()
    }

    fn fireable_bindings(
        &self,
        transition: TransitionId,
        marking: &PredicateMarking<T>,
    ) -> Vec<Binding<T>> {
        let Ok(t) = self.transition(transition) else {
            return Vec::new();
        };
        let variables = t.variables();

        let bindings: Vec<Binding<T>> = if variables.is_empty() {
            vec![Binding::new()]
        } else {
            variables
                .iter()
                .map(|variable| Self::candidates(t, variable, marking))
                .multi_cartesian_product()
                .map(|values| variables.iter().copied().zip(values).collect())
                .collect()
        };

        bindings
            .into_iter()
            .filter(|binding| Self::consumes_available(t, marking, binding))
            .collect()
    }

    fn fire_with(
        &self,
        transition: TransitionId,
        marking: &PredicateMarking<T>,
        binding: &Binding<T>,
    ) -> Result<PredicateMarking<T>, FireError> {
        let t = self.transition(transition)?;
        if !t.accepts(binding) {
            return Err(FireError::GuardRejected(transition));
        }

        let mut next = marking.clone();
        for (place, tokens) in t.consumed(binding)? {
            let available = next
                .tokens_mut(&place)
                .ok_or_else(|| FireError::UnknownPlace(place.clone()))?;
            *available = available
                .difference(&tokens)
                .ok_or(FireError::NotEnabled(transition))?;
        }
        for (place, tokens) in t.produced(binding)? {
            let target = next
                .tokens_mut(&place)
                .ok_or_else(|| FireError::UnknownPlace(place.clone()))?;
            *target = target.union(&tokens);
        }

        trace!("{} fired with {:?}", t.name, binding);
        Ok(next)
    }
}
