//! Insertion-ordered string-keyed map.
//!
//! Selectors list entities, groups, positions and roles in the order they
//! first appear in the data files, so every keyed collection in the store
//! preserves insertion order instead of sorting by key.

use std::collections::HashMap;

/// A map from string keys to values that iterates in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    keys: Vec<String>,
    values: Vec<T>,
    index: HashMap<String, usize>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> Keyed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing (in place) any value stored under the same key.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.values[i], value)),
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(key);
                self.values.push(value);
                None
            }
        }
    }

    /// Mutable access to the value under `key`, inserting `make()` first if absent.
    pub fn get_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> T) -> &mut T {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.keys.len();
                self.index.insert(key.to_string(), i);
                self.keys.push(key.to_string());
                self.values.push(make());
                i
            }
        };
        &mut self.values[i]
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.values[i])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    /// `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    /// First inserted entry.
    pub fn first(&self) -> Option<(&str, &T)> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Apply `f` to every value, keeping keys and order.
    pub fn map_values<U>(self, mut f: impl FnMut(&str, T) -> U) -> Keyed<U> {
        let values = self
            .keys
            .iter()
            .zip(self.values)
            .map(|(k, v)| f(k, v))
            .collect();
        Keyed {
            keys: self.keys,
            values,
            index: self.index,
        }
    }
}

impl<T> IntoIterator for Keyed<T> {
    type Item = (String, T);
    type IntoIter = std::iter::Zip<std::vec::IntoIter<String>, std::vec::IntoIter<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Keyed<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut keyed = Keyed::new();
        for (k, v) in iter {
            keyed.insert(k, v);
        }
        keyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterates_in_insertion_order() {
        let keyed: Keyed<i32> = [("zed", 1), ("ahri", 2), ("mundo", 3)].into_iter().collect();
        let keys: Vec<&str> = keyed.keys().collect();
        assert_eq!(keys, vec!["zed", "ahri", "mundo"]);
        assert_eq!(keyed.first(), Some(("zed", &1)));
    }

    #[test]
    fn reinsert_keeps_original_position() {
        let mut keyed = Keyed::new();
        keyed.insert("a", 1);
        keyed.insert("b", 2);
        assert_eq!(keyed.insert("a", 10), Some(1));
        let pairs: Vec<(&str, &i32)> = keyed.iter().collect();
        assert_eq!(pairs, vec![("a", &10), ("b", &2)]);
    }

    #[test]
    fn get_or_insert_with_appends_once() {
        let mut keyed: Keyed<Vec<u32>> = Keyed::new();
        keyed.get_or_insert_with("top", Vec::new).push(1);
        keyed.get_or_insert_with("top", Vec::new).push(2);
        keyed.get_or_insert_with("mid", Vec::new).push(3);
        assert_eq!(keyed.len(), 2);
        assert_eq!(keyed.get("top"), Some(&vec![1, 2]));
        assert!(keyed.get("jungle").is_none());
    }

    #[test]
    fn map_values_preserves_keys() {
        let keyed: Keyed<i32> = [("x", 1), ("y", 2)].into_iter().collect();
        let doubled = keyed.map_values(|_, v| v * 2);
        assert_eq!(doubled.get("y"), Some(&4));
        assert!(doubled.contains_key("x"));
    }
}
