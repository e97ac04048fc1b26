//! Content-addressed storage of schema nodes
//!
//! Oneof options and top-level method fields are stored under the canonical
//! hash of their current value. Values are never handed out mutably: callers
//! remove an entry, change it and insert it again, or go through
//! [`ContentAddressedMap::update_all`], which re-keys afterwards.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::{Deserialize, Deserializer, Serialize};

use super::ir::hash_data_to_string;
use crate::meld::MeldError;
use crate::models::Data;

/// Map from canonical hash to the node with that hash
///
/// Serialized as a plain object. Keys read back from JSON are ignored and
/// recomputed from the values.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContentAddressedMap {
    entries: BTreeMap<String, Data>,
}

impl ContentAddressedMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert under the value's current hash and return the key.
    ///
    /// If an equal node is already stored, only its example values are merged.
    pub fn insert(&mut self, data: Data) -> String {
        let key = hash_data_to_string(&data);
        match self.entries.entry(key.clone()) {
            Entry::Occupied(mut existing) => {
                existing.get_mut().merge_example_values(data.example_values);
            }
            Entry::Vacant(slot) => {
                slot.insert(data);
            }
        }
        key
    }

    pub fn get(&self, key: &str) -> Option<&Data> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Data> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Data)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Data> {
        self.entries.values()
    }

    /// Remove and return every entry matching `pred`, in key order
    pub fn take_matching(&mut self, mut pred: impl FnMut(&Data) -> bool) -> Vec<Data> {
        let keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, data)| pred(data))
            .map(|(key, _)| key.clone())
            .collect();
        keys.iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }

    /// Remove and return every entry, in key order
    pub fn take_entries(&mut self) -> Vec<Data> {
        std::mem::take(&mut self.entries).into_values().collect()
    }

    /// Consume the map, yielding `(key, value)` pairs in key order
    pub fn into_entries(self) -> impl Iterator<Item = (String, Data)> {
        self.entries.into_iter()
    }

    /// Apply `f` to every value, then re-key the map.
    pub fn update_all<E>(
        &mut self,
        mut f: impl FnMut(&mut Data) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut values = self.take_entries();
        let result = values.iter_mut().try_for_each(&mut f);
        for data in values {
            self.insert(data);
        }
        result
    }

    /// Recompute every key from its current value.
    ///
    /// Entries that turn out to be equal are merged.
    pub fn rehash(&mut self) {
        for data in self.take_entries() {
            self.insert(data);
        }
    }

    /// Verify that every key equals the hash of its value
    pub fn check_keys(&self) -> Result<(), MeldError> {
        for (key, data) in &self.entries {
            let actual = hash_data_to_string(data);
            if *key != actual {
                return Err(MeldError::StaleKey {
                    key: key.clone(),
                    actual,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Data> for ContentAddressedMap {
    fn from_iter<I: IntoIterator<Item = Data>>(iter: I) -> Self {
        let mut map = Self::new();
        for data in iter {
            map.insert(data);
        }
        map
    }
}

impl<'de> Deserialize<'de> for ContentAddressedMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Data>::deserialize(deserializer)?;
        Ok(entries.into_values().collect())
    }
}

impl IntoIterator for ContentAddressedMap {
    type Item = Data;
    type IntoIter = std::collections::btree_map::IntoValues<String, Data>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}
