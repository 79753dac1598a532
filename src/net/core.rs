//! 运行时：可发生集与发生语义。
//!
//! 迁移 `t` 在标识 `M` 下可激发当且仅当 `∀p: M[p] ≥ Pre[p, t]`；
//! 发射后 `M' = M - Pre[:, t] + Post[:, t]`，且不得超过库所容量。
use std::fmt::{self, Write as FmtWrite};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::net::firing::{FireError, FiringRule};
use crate::net::ids::{PlaceId, TransitionId};
use crate::net::incidence::Incidence;
use crate::net::index_vec::{Idx, IndexVec};
use crate::net::structure::{Marking, Place, Transition, Weight};

#[derive(Clone, Serialize, Deserialize)]
pub struct Net {
    pub places: IndexVec<PlaceId, Place>,
    pub transitions: IndexVec<TransitionId, Transition>,
    pub pre: Incidence<Weight>,
    pub post: Incidence<Weight>,
}

impl fmt::Debug for Net {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Net")
            .field("places", &self.places)
            .field("transitions", &self.transitions)
            .field("pre", &self.pre)
            .field("post", &self.post)
            .finish()
    }
}

impl Net {
    pub fn empty() -> Self {
        Self {
            places: IndexVec::new(),
            transitions: IndexVec::new(),
            pre: Incidence::new(0, 0, 0),
            post: Incidence::new(0, 0, 0),
        }
    }

    pub fn add_place(&mut self, place: Place) -> PlaceId {
        let place_id = self.places.push(place);
        self.pre.push_place_with_default(0);
        self.post.push_place_with_default(0);
        place_id
    }

    pub fn add_transition(&mut self, transition: Transition) -> TransitionId {
        let transition_id = self.transitions.push(transition);
        self.pre.push_transition_with_default(0);
        self.post.push_transition_with_default(0);
        transition_id
    }

    pub fn set_input_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.pre.set(place, transition, weight);
    }

    pub fn set_output_weight(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        self.post.set(place, transition, weight);
    }

    /// 输入弧: place -> transition，权重累加。
    pub fn add_input_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        *self.pre.get_mut(place, transition) += weight;
    }

    /// 输出弧: transition -> place，权重累加。
    pub fn add_output_arc(&mut self, place: PlaceId, transition: TransitionId, weight: Weight) {
        *self.post.get_mut(place, transition) += weight;
    }

    pub fn place_by_name(&self, name: &str) -> Option<PlaceId> {
        self.places
            .iter_enumerated()
            .find(|(_, place)| place.name == name)
            .map(|(id, _)| id)
    }

    pub fn transition_by_name(&self, name: &str) -> Option<TransitionId> {
        self.transitions
            .iter_enumerated()
            .find(|(_, transition)| transition.name == name)
            .map(|(id, _)| id)
    }

    pub fn places_len(&self) -> usize {
        self.places.len()
    }

    pub fn transitions_len(&self) -> usize {
        self.transitions.len()
    }

    /// A net read from disk has to agree with itself before it can be fired.
    pub fn is_well_formed(&self) -> bool {
        self.pre.places() == self.places_len()
            && self.post.places() == self.places_len()
            && self.pre.transitions() == self.transitions_len()
            && self.post.transitions() == self.transitions_len()
            && self.pre.is_rectangular()
            && self.post.is_rectangular()
    }

    pub fn initial_marking(&self) -> Marking {
        Marking(self.places.iter().map(|p| p.tokens).collect())
    }

    pub fn enabled_transitions(&self, marking: &Marking) -> Vec<TransitionId> {
        self.transitions
            .indices()
            .filter(|&transition| self.is_transition_enabled(transition, marking))
            .collect()
    }

    pub fn fire_transition(
        &self,
        marking: &Marking,
        transition: TransitionId,
    ) -> Result<Marking, FireError> {
        if transition.index() >= self.transitions_len() {
            return Err(FireError::OutOfBounds(transition));
        }
        if !self.is_transition_enabled(transition, marking) {
            return Err(FireError::NotEnabled(transition));
        }

        let mut next = marking.clone();
        for (place, weight) in self.pre.weights(transition) {
            *next.tokens_mut(place) -= weight;
        }
        for (place, weight) in self.post.weights(transition) {
            let tokens = next.tokens_mut(place);
            let capacity = self.places[place].capacity;
            let after = tokens.saturating_add(weight);
            if after > capacity {
                return Err(FireError::Capacity {
                    place,
                    after,
                    capacity,
                });
            }
            *tokens = after;
        }

        Ok(next)
    }

    fn is_transition_enabled(&self, transition: TransitionId, marking: &Marking) -> bool {
        if transition.index() >= self.transitions_len() || marking.len() != self.places_len() {
            return false;
        }
        self.pre
            .weights(transition)
            .all(|(place, weight)| marking.tokens(place) >= weight)
    }

    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        let _ = writeln!(&mut dot, "digraph PetriNet {{");
        let _ = writeln!(&mut dot, "    rankdir=LR;");

        for (place_id, place) in self.places.iter_enumerated() {
            let _ = writeln!(
                &mut dot,
                "    place_{} [label=\"{}\\n{}\", shape=circle];",
                place_id.index(),
                escape_label(&place.name),
                place.tokens
            );
        }
        for (transition_id, transition) in self.transitions.iter_enumerated() {
            let _ = writeln!(
                &mut dot,
                "    trans_{} [label=\"{}\", shape=box];",
                transition_id.index(),
                escape_label(&transition.name)
            );
        }

        for transition in self.transitions.indices() {
            for (place, weight) in self.pre.weights(transition) {
                write_arc(
                    &mut dot,
                    &format!("place_{}", place.index()),
                    &format!("trans_{}", transition.index()),
                    weight,
                );
            }
            for (place, weight) in self.post.weights(transition) {
                write_arc(
                    &mut dot,
                    &format!("trans_{}", transition.index()),
                    &format!("place_{}", place.index()),
                    weight,
                );
            }
        }

        let _ = writeln!(&mut dot, "}}");
        dot
    }

    pub fn write_dot<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_dot())
    }
}

impl Default for Net {
    fn default() -> Self {
        Self::empty()
    }
}

impl FiringRule for Net {
    type Marking = Marking;

    fn transition_ids(&self) -> Vec<TransitionId> {
        self.transitions.indices().collect()
    }

    fn transition_name(&self, transition: TransitionId) -> String {
        self.transitions
            .get(transition)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("{transition:?}"))
    }

    fn initial_marking(&self) -> Marking {
        Net::initial_marking(self)
    }

    fn fire(&self, marking: &Marking, transition: TransitionId) -> Result<Marking, FireError> {
        self.fire_transition(marking, transition)
    }
}

fn write_arc(dot: &mut String, from: &str, to: &str, weight: Weight) {
    if weight == 1 {
        let _ = writeln!(dot, "    {from} -> {to};");
    } else {
        let _ = writeln!(dot, "    {from} -> {to} [label=\"{weight}\"];");
    }
}

pub(crate) fn escape_label(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
