//! Markings of predicate nets and the two predicates the builder needs on
//! them: multiset equality and strict coverage.
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hash;

use crate::predicate::multiset::Multiset;

/// A typed multiset of tokens per place, keyed by place name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PredicateMarking<T: Eq + Hash> {
    places: BTreeMap<String, Multiset<T>>,
}

impl<T: Eq + Hash> PredicateMarking<T> {
    pub fn new() -> Self {
        Self {
            places: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) a place and its tokens.
    pub fn with_place(
        mut self,
        place: impl Into<String>,
        tokens: impl IntoIterator<Item = T>,
    ) -> Self {
        self.places
            .insert(place.into(), tokens.into_iter().collect());
        self
    }

    pub fn tokens(&self, place: &str) -> Option<&Multiset<T>> {
        self.places.get(place)
    }

    pub fn tokens_mut(&mut self, place: &str) -> Option<&mut Multiset<T>> {
        self.places.get_mut(place)
    }

    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.places.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Multiset<T>)> {
        self.places
            .iter()
            .map(|(place, tokens)| (place.as_str(), tokens))
    }

    pub fn has_same_places(&self, other: &Self) -> bool {
        self.places.len() == other.places.len()
            && self.places.keys().zip(other.places.keys()).all(|(a, b)| a == b)
    }

    /// Total number of tokens over all places.
    pub fn token_count(&self) -> usize {
        self.places.values().map(Multiset::len).sum()
    }

    /// `self` holds at least as many copies of every token as `other` in
    /// every place, and strictly more of at least one. Markings over
    /// different place sets never cover each other.
    pub fn strictly_covers(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Greater)
    }
}

impl<T: Eq + Hash> Default for PredicateMarking<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash, P: Into<String>> FromIterator<(P, Multiset<T>)> for PredicateMarking<T> {
    fn from_iter<I: IntoIterator<Item = (P, Multiset<T>)>>(iter: I) -> Self {
        Self {
            places: iter
                .into_iter()
                .map(|(place, tokens)| (place.into(), tokens))
                .collect(),
        }
    }
}

/// Place-wise multiset inclusion.
impl<T: Eq + Hash> PartialOrd for PredicateMarking<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if !self.has_same_places(other) {
            return None;
        }
        let mut less = false;
        let mut greater = false;
        for (left, right) in self.places.values().zip(other.places.values()) {
            match left.partial_cmp(right)? {
                Ordering::Less => less = true,
                Ordering::Greater => greater = true,
                Ordering::Equal => {}
            }
            if less && greater {
                return None;
            }
        }
        Some(match (less, greater) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            _ => Ordering::Equal,
        })
    }
}

impl<T: Eq + Hash + fmt::Debug> fmt::Debug for PredicateMarking<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.places.iter()).finish()
    }
}
