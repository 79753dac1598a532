use std::collections::BTreeMap;
use std::fmt;

/// Assignment of token values to the variables of a predicate transition.
///
/// Entries are kept sorted by variable name, so two bindings with the same
/// assignments compare and hash alike whatever order they were built in.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Binding<T> {
    values: BTreeMap<String, T>,
}

impl<T> Binding<T> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, variable: impl Into<String>, value: T) -> Self {
        self.values.insert(variable.into(), value);
        self
    }

    pub fn get(&self, variable: &str) -> Option<&T> {
        self.values.get(variable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, V: Into<String>> FromIterator<(V, T)> for Binding<T> {
    fn from_iter<I: IntoIterator<Item = (V, T)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(variable, value)| (variable.into(), value))
                .collect(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.values.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use std::hash::BuildHasher;

    use rustc_hash::FxBuildHasher;

    use super::*;

    #[test]
    fn bindings_compare_structurally() {
        let left = Binding::new().with("x", 1).with("y", 2);
        let right: Binding<i32> = [("y", 2), ("x", 1)].into_iter().collect();

        assert_eq!(left, right);
        assert_eq!(
            FxBuildHasher.hash_one(&left),
            FxBuildHasher.hash_one(&right)
        );
        assert_ne!(left, Binding::new().with("x", 1));
        assert_eq!(format!("{left:?}"), r#"{"x": 1, "y": 2}"#);
    }
}
