//! Decrypted secrets handed to the injection layer.

use std::fmt;

use zeroize::Zeroize;

/// Insertion-ordered key -> plaintext mapping.
///
/// Inserting an existing key replaces its value but keeps its original
/// position. All plaintext is zeroed when the map is dropped.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretMap {
    entries: Vec<(String, String)>,
}

impl SecretMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => {
                existing.zeroize();
                *existing = value;
            }
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SecretMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl Drop for SecretMap {
    fn drop(&mut self) {
        for (_, value) in &mut self.entries {
            value.zeroize();
        }
    }
}

impl fmt::Debug for SecretMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.keys().map(|k| (k, "<redacted>")))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let map: SecretMap = [("Z", "1"), ("A", "2"), ("M", "3")].into_iter().collect();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, ["Z", "A", "M"]);
    }

    #[test]
    fn duplicate_key_keeps_position_takes_last_value() {
        let map: SecretMap = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(map.len(), 2);
        let pairs: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(pairs, [("A", "3"), ("B", "2")]);
    }

    #[test]
    fn debug_hides_values() {
        let map: SecretMap = [("TOKEN", "hunter2")].into_iter().collect();
        let rendered = format!("{map:?}");
        assert!(rendered.contains("TOKEN"));
        assert!(!rendered.contains("hunter2"));
    }
}
