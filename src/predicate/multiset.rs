use std::cmp::Ordering;
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

/// A finite multiset. Only equality and hashing are required of the
/// elements; no order is assumed. Zero counts are never stored, so two
/// multisets with the same content always have the same entries.
#[derive(Clone)]
pub struct Multiset<T> {
    counts: IndexMap<T, usize, FxBuildHasher>,
    len: usize,
}

impl<T: Eq + Hash> Multiset<T> {
    pub fn new() -> Self {
        Self {
            counts: IndexMap::default(),
            len: 0,
        }
    }

    /// Number of elements, counting repetitions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of distinct elements.
    pub fn distinct_len(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, value: &T) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn contains(&self, value: &T) -> bool {
        self.counts.contains_key(value)
    }

    pub fn insert(&mut self, value: T) {
        self.insert_n(value, 1);
    }

    pub fn insert_n(&mut self, value: T, n: usize) {
        if n == 0 {
            return;
        }
        *self.counts.entry(value).or_insert(0) += n;
        self.len += n;
    }

    /// Removes one occurrence. Returns `false` when there was none.
    pub fn remove(&mut self, value: &T) -> bool {
        match self.counts.get_mut(value) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                self.counts.swap_remove(value);
            }
            None => return false,
        }
        self.len -= 1;
        true
    }

    /// Distinct elements with their multiplicity.
    pub fn counts(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(value, count)| (value, *count))
    }

    pub fn distinct(&self) -> impl Iterator<Item = &T> {
        self.counts.keys()
    }

    /// Every element, repeated by its multiplicity.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.counts
            .iter()
            .flat_map(|(value, count)| std::iter::repeat_n(value, *count))
    }

    /// `other ⊆ self`, counting multiplicities.
    pub fn contains_all(&self, other: &Self) -> bool {
        other
            .counts()
            .all(|(value, count)| self.count(value) >= count)
    }
}

impl<T: Eq + Hash + Clone> Multiset<T> {
    /// `self - other`, or `None` when `other` is not contained in `self`.
    pub fn difference(&self, other: &Self) -> Option<Self> {
        if !self.contains_all(other) {
            return None;
        }
        let mut result = Self::new();
        for (value, count) in self.counts() {
            result.insert_n(value.clone(), count - other.count(value));
        }
        Some(result)
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        for (value, count) in other.counts() {
            result.insert_n(value.clone(), count);
        }
        result
    }
}

impl<T: Eq + Hash> Default for Multiset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Eq + Hash> FromIterator<T> for Multiset<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T: Eq + Hash> Extend<T> for Multiset<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T: Eq + Hash, const N: usize> From<[T; N]> for Multiset<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

/// Same elements with the same multiplicities, whatever the insertion order.
impl<T: Eq + Hash> PartialEq for Multiset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.counts.len() == other.counts.len()
            && self.counts().all(|(value, count)| other.count(value) == count)
    }
}

impl<T: Eq + Hash> Eq for Multiset<T> {}

/// Order-independent: entry hashes are combined with a commutative sum.
impl<T: Eq + Hash> Hash for Multiset<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let entries = self.counts().fold(0u64, |acc, entry| {
            acc.wrapping_add(FxBuildHasher.hash_one(entry))
        });
        self.len.hash(state);
        entries.hash(state);
    }
}

/// Inclusion order: `Greater` when `self ⊋ other`.
impl<T: Eq + Hash> PartialOrd for Multiset<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.contains_all(other), other.contains_all(self)) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            (false, false) => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Multiset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for (value, count) in self.counts.iter() {
            for _ in 0..*count {
                list.entry(value);
            }
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use std::hash::BuildHasher;

    use super::*;

    #[test]
    fn equality_ignores_insertion_order() {
        let left = Multiset::from(['b', 'v', 'b']);
        let right = Multiset::from(['v', 'b', 'b']);

        assert_eq!(left, right);
        assert_eq!(
            FxBuildHasher.hash_one(&left),
            FxBuildHasher.hash_one(&right)
        );
        assert_ne!(left, Multiset::from(['b', 'v', 'v']));
    }

    #[test]
    fn removing_the_last_copy_forgets_the_value() {
        let mut set = Multiset::from([1, 1]);
        assert!(set.remove(&1));
        assert_eq!(set.count(&1), 1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(!set.remove(&1));
        assert_eq!(set, Multiset::new());
    }

    #[test]
    fn difference_requires_containment() {
        let big = Multiset::from(['a', 'a', 'b']);
        let small = Multiset::from(['a', 'b']);

        assert_eq!(big.difference(&small), Some(Multiset::from(['a'])));
        assert_eq!(small.difference(&big), None);
        assert_eq!(small.union(&Multiset::from(['a'])), big);
    }

    #[test]
    fn inclusion_is_a_partial_order() {
        let ab = Multiset::from(['a', 'b']);
        let aab = Multiset::from(['a', 'a', 'b']);
        let c = Multiset::from(['c']);

        assert_eq!(aab.partial_cmp(&ab), Some(Ordering::Greater));
        assert_eq!(ab.partial_cmp(&aab), Some(Ordering::Less));
        assert_eq!(ab.partial_cmp(&c), None);
    }

    #[test]
    fn iter_repeats_by_multiplicity() {
        let set = Multiset::from([7, 7, 7]);
        assert_eq!(set.iter().count(), 3);
        assert_eq!(set.distinct_len(), 1);
        assert_eq!(format!("{set:?}"), "[7, 7, 7]");
    }
}
