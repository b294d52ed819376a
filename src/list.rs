//! Ordered keyed collection of list entries

use std::fmt;

use crate::filter::YFilter;
use crate::node::Node;

/// Synthetic keys start above this value; the first entry gets `1_000_001`
pub const SYNTHETIC_KEY_BASE: u64 = 1_000_000;

/// Identity of an entry within its list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListKey {
    /// Value of the single declared key leaf
    Single(String),
    /// Values of every declared key leaf, in declaration order
    Tuple(Vec<String>),
    /// Counter assigned to keyless entries, or entries with an unset key
    Synthetic(u64),
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKey::Single(k) => f.write_str(k),
            ListKey::Tuple(keys) => write!(f, "({})", keys.join(", ")),
            ListKey::Synthetic(n) => write!(f, "{}", n),
        }
    }
}

/// Entries of one YANG list, iterated in insertion order.
///
/// Re-inserting an entry whose key matches an existing entry replaces it in
/// place. Keys are recomputed from the entries' leaf values on every lookup.
#[derive(Debug, Clone)]
pub struct YList {
    entries: Vec<Node>,
    counter: u64,
}

impl Default for YList {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            counter: SYNTHETIC_KEY_BASE,
        }
    }
}

impl YList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry and return its key. The caller has already attached
    /// the entry to the owning node.
    pub(crate) fn insert(&mut self, entry: Node) -> ListKey {
        let key = match entry.declared_key() {
            Some(key) => key,
            None => {
                self.counter += 1;
                entry.set_synthetic_key(Some(self.counter));
                ListKey::Synthetic(self.counter)
            }
        };

        if !matches!(key, ListKey::Synthetic(_)) {
            entry.set_synthetic_key(None);
            if let Some(pos) = self.position(&key) {
                tracing::debug!(%key, "replacing list entry with the same key");
                self.entries[pos] = entry;
                return key;
            }
        }
        self.entries.push(entry);
        key
    }

    /// Re-key an entry already held by this list after its key leafs were
    /// filled in. An older entry with the same key is replaced.
    pub(crate) fn reinsert(&mut self, entry: &Node) {
        if entry.declared_key().is_none() {
            return;
        }
        if let Some(pos) = self.entries.iter().position(|e| e.ptr_eq(entry)) {
            let entry = self.entries.remove(pos);
            self.insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Node] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.entries.iter()
    }

    /// Keys of every entry, computed fresh from the current leaf values
    pub fn keys(&self) -> Vec<ListKey> {
        self.entries.iter().filter_map(Node::list_key).collect()
    }

    pub fn has_key(&self, key: &ListKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.entries.get(index)
    }

    pub fn get_by_key(&self, key: &ListKey) -> Option<&Node> {
        self.position(key).map(|pos| &self.entries[pos])
    }

    /// Remove the last entry, or the one at `index`
    pub fn pop(&mut self, index: Option<usize>) -> Option<Node> {
        match index {
            None => self.entries.pop(),
            Some(i) if i < self.entries.len() => Some(self.entries.remove(i)),
            Some(_) => None,
        }
    }

    pub fn remove_by_key(&mut self, key: &ListKey) -> Option<Node> {
        self.position(key).map(|pos| self.entries.remove(pos))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Apply a filter to every entry
    pub fn set_filter(&self, filter: YFilter) {
        for entry in &self.entries {
            entry.set_filter(filter);
        }
    }

    fn position(&self, key: &ListKey) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.list_key().as_ref() == Some(key))
    }
}
