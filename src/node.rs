//! Entity nodes and the path resolver
//!
//! A `Node` is a shared handle onto one schema-described tree element. The
//! tree owns its nodes top-down; each node keeps only a weak reference to its
//! parent, set once when the node is attached. Children are materialized
//! lazily on first navigation.
//!
//! Paths are always computed from the current key leaf values and never
//! cached, since key leafs may change after a path was first read.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::{Result, YangError};
use crate::filter::YFilter;
use crate::leaf::{LeafData, YLeaf, YLeafList};
use crate::list::{ListKey, YList};
use crate::path::segmentalize;
use crate::schema::{LeafKind, NodeSchema};
use crate::types::{IdentityLookup, Value, YType, check_value, decode_value, describe};

/// Synthetic keys are rendered as a positional index modulo this value
const POSITION_MODULUS: u64 = 1_000_000;

#[derive(Debug, Clone)]
enum LeafSlot {
    Leaf(YLeaf),
    List(YLeafList),
}

#[derive(Debug, Clone)]
enum ChildSlot {
    Single(Option<Node>),
    List(YList),
}

struct NodeData {
    schema: &'static NodeSchema,
    parent: Option<Weak<RefCell<NodeData>>>,
    leafs: Vec<LeafSlot>,
    children: Vec<ChildSlot>,
    filter: YFilter,
    synthetic_key: Option<u64>,
    is_presence: bool,
}

impl NodeData {
    fn leaf(&self, name: &str) -> Option<&YLeaf> {
        let idx = self.schema.leaf_index(name)?;
        match &self.leafs[idx] {
            LeafSlot::Leaf(leaf) => Some(leaf),
            LeafSlot::List(_) => None,
        }
    }
}

/// One field of a node, as seen by traversals
#[derive(Debug, Clone)]
pub enum Field {
    Leaf(YLeaf),
    LeafList(YLeafList),
    /// A materialized container child
    Child(Node),
    /// Entries of a list child, possibly none
    ChildList(Vec<Node>),
}

/// Result of resolving an absolute path against a tree
#[derive(Debug, Clone)]
pub enum Resolved {
    Node(Node),
    /// The final segment named a list but no entry matched it
    Entries(Vec<Node>),
}

impl Resolved {
    pub fn node(self) -> Option<Node> {
        match self {
            Resolved::Node(node) => Some(node),
            Resolved::Entries(_) => None,
        }
    }

    pub fn entries(self) -> Vec<Node> {
        match self {
            Resolved::Node(node) => vec![node],
            Resolved::Entries(entries) => entries,
        }
    }
}

/// Handle onto a tree node
#[derive(Clone)]
pub struct Node(Rc<RefCell<NodeData>>);

impl Node {
    /// Construct an empty, detached node of the given type
    pub fn new(schema: &'static NodeSchema) -> Self {
        let leafs = schema
            .leafs
            .iter()
            .map(|l| match l.kind {
                LeafKind::Leaf => LeafSlot::Leaf(YLeaf::new(l.name, l.ytype)),
                LeafKind::LeafList => LeafSlot::List(YLeafList::new(l.name, l.ytype)),
            })
            .collect();
        let children = schema
            .children
            .iter()
            .map(|c| {
                if c.list {
                    ChildSlot::List(YList::new())
                } else {
                    ChildSlot::Single(None)
                }
            })
            .collect();

        Node(Rc::new(RefCell::new(NodeData {
            schema,
            parent: None,
            leafs,
            children,
            filter: YFilter::NotSet,
            synthetic_key: None,
            is_presence: schema.is_presence,
        })))
    }

    pub fn schema(&self) -> &'static NodeSchema {
        self.0.borrow().schema
    }

    pub fn yang_name(&self) -> &'static str {
        self.schema().yang_name
    }

    /// Whether both handles point at the same node
    pub fn ptr_eq(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn parent(&self) -> Option<Node> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Node)
    }

    /// Topmost node reachable through the parent chain
    pub fn root(&self) -> Node {
        let mut node = self.clone();
        while let Some(parent) = node.parent() {
            node = parent;
        }
        node
    }

    pub(crate) fn attach(&self, parent: &Node) {
        self.0.borrow_mut().parent = Some(Rc::downgrade(&parent.0));
    }

    pub fn is_top_level(&self) -> bool {
        self.schema().is_top_level
    }

    pub fn has_list_ancestor(&self) -> bool {
        self.schema().has_list_ancestor
    }

    pub fn is_presence(&self) -> bool {
        self.0.borrow().is_presence
    }

    /// Mark a presence container as present (or not)
    pub fn set_presence(&self, present: bool) {
        self.0.borrow_mut().is_presence = present;
    }

    pub fn filter(&self) -> YFilter {
        self.0.borrow().filter
    }

    pub fn set_filter(&self, filter: YFilter) {
        self.0.borrow_mut().filter = filter;
    }

    fn leaf_index(&self, name: &str) -> Result<usize> {
        let schema = self.schema();
        schema.leaf_index(name).ok_or_else(|| {
            YangError::model(format!(
                "Attempt to assign unknown attribute '{}' to '{}'",
                name, schema.yang_name
            ))
        })
    }

    /// Assign a scalar leaf after checking it against the leaf's types.
    /// On failure the node is left unmodified.
    pub fn set_leaf(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let idx = self.leaf_index(name)?;
        let leaf_schema = &self.schema().leafs[idx];
        let value = check_value(leaf_schema.name, value, &leaf_schema.descriptors())?;

        let mut data = self.0.borrow_mut();
        match &mut data.leafs[idx] {
            LeafSlot::Leaf(leaf) => {
                leaf.set(value);
                Ok(())
            }
            LeafSlot::List(_) => Err(YangError::model(format!(
                "Attempt to assign a single value to leaf-list '{}'",
                leaf_schema.name
            ))),
        }
    }

    /// Append one value to a leaf-list
    pub fn append_leaf(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let idx = self.leaf_index(name)?;
        let leaf_schema = &self.schema().leafs[idx];
        let value = check_value(leaf_schema.name, value, &leaf_schema.descriptors())?;

        let mut data = self.0.borrow_mut();
        match &mut data.leafs[idx] {
            LeafSlot::List(list) => {
                list.append(value);
                Ok(())
            }
            LeafSlot::Leaf(_) => Err(YangError::model(format!(
                "Attempt to append to scalar leaf '{}'",
                leaf_schema.name
            ))),
        }
    }

    /// Replace the whole content of a leaf-list; all values are checked first
    pub fn set_leaf_list(&self, name: &str, values: Vec<Value>) -> Result<()> {
        let idx = self.leaf_index(name)?;
        let leaf_schema = &self.schema().leafs[idx];
        let descriptors = leaf_schema.descriptors();
        let values = values
            .into_iter()
            .map(|value| check_value(leaf_schema.name, value, &descriptors))
            .collect::<Result<Vec<_>>>()?;

        let mut data = self.0.borrow_mut();
        match &mut data.leafs[idx] {
            LeafSlot::List(list) => {
                list.clear();
                list.extend(values);
                Ok(())
            }
            LeafSlot::Leaf(_) => Err(YangError::model(format!(
                "Attempt to assign a list of values to scalar leaf '{}'",
                leaf_schema.name
            ))),
        }
    }

    /// Set or clear one flag of a bits leaf
    pub fn set_bit(&self, name: &str, bit: &str, on: bool) -> Result<()> {
        let idx = self.leaf_index(name)?;
        let mut data = self.0.borrow_mut();
        match &mut data.leafs[idx] {
            LeafSlot::Leaf(leaf) if leaf.ytype() == YType::Bits => {
                leaf.set_bit(bit, on);
                Ok(())
            }
            _ => Err(YangError::model(format!("'{}' is not a bits leaf", name))),
        }
    }

    pub fn clear_leaf(&self, name: &str) -> Result<()> {
        let idx = self.leaf_index(name)?;
        match &mut self.0.borrow_mut().leafs[idx] {
            LeafSlot::Leaf(leaf) => leaf.clear(),
            LeafSlot::List(list) => list.clear(),
        }
        Ok(())
    }

    /// Attach an edit filter to a single leaf or leaf-list
    pub fn set_leaf_filter(&self, name: &str, filter: YFilter) -> Result<()> {
        let idx = self.leaf_index(name)?;
        match &mut self.0.borrow_mut().leafs[idx] {
            LeafSlot::Leaf(leaf) => leaf.filter = filter,
            LeafSlot::List(list) => list.filter = filter,
        }
        Ok(())
    }

    pub fn leaf(&self, name: &str) -> Option<YLeaf> {
        self.0.borrow().leaf(name).cloned()
    }

    pub fn leaf_value(&self, name: &str) -> Option<Value> {
        self.0.borrow().leaf(name).and_then(|l| l.value().cloned())
    }

    pub fn leaf_list(&self, name: &str) -> Option<YLeafList> {
        let data = self.0.borrow();
        let idx = data.schema.leaf_index(name)?;
        match &data.leafs[idx] {
            LeafSlot::List(list) => Some(list.clone()),
            LeafSlot::Leaf(_) => None,
        }
    }

    /// Assign wire text to the leaf named `name`, converting it through the
    /// leaf's types. Returns `false` when the node has no such leaf. Empty
    /// text that fits no type leaves the leaf unset; other text that fits no
    /// type is a codec error naming the leaf.
    pub(crate) fn set_value(
        &self,
        name: &str,
        text: &str,
        identities: &IdentityLookup<'_>,
    ) -> Result<bool> {
        let schema = self.schema();
        let Some(idx) = schema.leaf_index(name) else {
            return Ok(false);
        };
        let leaf_schema = &schema.leafs[idx];
        let descriptors = leaf_schema.descriptors();

        let value = match decode_value(text, &descriptors, identities) {
            Some(value) => value,
            None if text.trim().is_empty() => {
                tracing::debug!(leaf = leaf_schema.name, "empty text left leaf unset");
                return Ok(true);
            }
            None => {
                return Err(YangError::codec(format!(
                    "cannot decode '{}' for leaf '{}', expected {}",
                    text,
                    leaf_schema.name,
                    describe(&descriptors)
                )));
            }
        };

        match &mut self.0.borrow_mut().leafs[idx] {
            LeafSlot::Leaf(leaf) => leaf.set(value),
            LeafSlot::List(list) => list.append(value),
        }
        Ok(true)
    }

    /// Find or lazily create the child named `name`.
    ///
    /// Materialized children are matched by their child-table name or by
    /// `segment_hint`, which for list entries is compared with each entry's
    /// segment path. On a miss the child table supplies the child's type; a
    /// new list entry is appended to its collection. Returns `None` when the
    /// name is unknown to this node's schema.
    pub fn child_by_name(&self, name: &str, segment_hint: &str) -> Option<Node> {
        let schema = self.schema();
        {
            let data = self.0.borrow();
            for (child_schema, slot) in schema.children.iter().zip(&data.children) {
                match slot {
                    ChildSlot::Single(Some(child))
                        if child_schema.name == name
                            || (!segment_hint.is_empty() && child_schema.name == segment_hint) =>
                    {
                        return Some(child.clone());
                    }
                    ChildSlot::List(list) if !segment_hint.is_empty() => {
                        if let Some(entry) =
                            list.iter().find(|e| e.segment_path() == segment_hint)
                        {
                            return Some(entry.clone());
                        }
                    }
                    _ => {}
                }
            }
        }

        tracing::debug!(child = name, parent = schema.yang_name, "looking up child");
        let Some(idx) = schema.child_index(name) else {
            tracing::debug!(child = name, parent = schema.yang_name, "unknown child");
            return None;
        };

        let child = Node::new(schema.children[idx].schema);
        child.attach(self);
        match &mut self.0.borrow_mut().children[idx] {
            ChildSlot::Single(slot) => {
                if let Some(existing) = slot {
                    return Some(existing.clone());
                }
                *slot = Some(child.clone());
            }
            ChildSlot::List(list) => {
                list.insert(child.clone());
            }
        }
        Some(child)
    }

    /// A materialized container child, without creating it
    pub fn child(&self, name: &str) -> Option<Node> {
        let data = self.0.borrow();
        let idx = data.schema.child_index(name)?;
        match &data.children[idx] {
            ChildSlot::Single(child) => child.clone(),
            ChildSlot::List(_) => None,
        }
    }

    /// Entries of the list child `name`, `None` if there is no such list
    pub fn list(&self, name: &str) -> Option<Vec<Node>> {
        self.with_list(name, |list| list.entries().to_vec())
    }

    /// Run `f` against the list child `name`
    pub fn with_list<R>(&self, name: &str, f: impl FnOnce(&YList) -> R) -> Option<R> {
        let data = self.0.borrow();
        let idx = data.schema.child_index(name)?;
        match &data.children[idx] {
            ChildSlot::List(list) => Some(f(list)),
            ChildSlot::Single(_) => None,
        }
    }

    /// Attach `entry` to this node and insert it into the list child `name`
    pub fn append(&self, name: &str, entry: Node) -> Result<ListKey> {
        let schema = self.schema();
        let idx = schema.child_index(name).ok_or_else(|| {
            YangError::model(format!("'{}' has no list named '{}'", schema.yang_name, name))
        })?;
        let child_schema = &schema.children[idx];
        if !std::ptr::eq(child_schema.schema, entry.schema()) {
            return Err(YangError::model(format!(
                "Attempt to append '{}' to list '{}'",
                entry.yang_name(),
                child_schema.name
            )));
        }

        entry.attach(self);
        match &mut self.0.borrow_mut().children[idx] {
            ChildSlot::List(list) => Ok(list.insert(entry)),
            ChildSlot::Single(_) => Err(YangError::model(format!(
                "Attempt to append to container '{}'. Use child_by_name instead",
                child_schema.name
            ))),
        }
    }

    /// Recompute the key of `entry` within list `name`
    pub(crate) fn rekey(&self, name: &str, entry: &Node) {
        let Some(idx) = self.schema().child_index(name) else {
            return;
        };
        if let ChildSlot::List(list) = &mut self.0.borrow_mut().children[idx] {
            list.reinsert(entry);
        }
    }

    /// The entry of list `name` whose key leafs carry the given text values
    pub fn find_list_entry(&self, name: &str, keys: &[(String, String)]) -> Option<Node> {
        self.with_list(name, |list| {
            list.iter()
                .find(|entry| {
                    keys.iter().all(|(k, v)| {
                        entry
                            .leaf(k)
                            .is_some_and(|leaf| leaf.is_set() && leaf.get() == *v)
                    })
                })
                .cloned()
        })
        .flatten()
    }

    /// Every field in table order: leafs first, then materialized children
    pub fn fields(&self) -> Vec<(&'static str, Field)> {
        let data = self.0.borrow();
        let leafs = data
            .schema
            .leafs
            .iter()
            .zip(&data.leafs)
            .map(|(s, slot)| match slot {
                LeafSlot::Leaf(leaf) => (s.name, Field::Leaf(leaf.clone())),
                LeafSlot::List(list) => (s.name, Field::LeafList(list.clone())),
            });
        let children = data
            .schema
            .children
            .iter()
            .zip(&data.children)
            .filter_map(|(s, slot)| match slot {
                ChildSlot::Single(Some(child)) => Some((s.name, Field::Child(child.clone()))),
                ChildSlot::Single(None) => None,
                ChildSlot::List(list) => {
                    Some((s.name, Field::ChildList(list.entries().to_vec())))
                }
            });
        leafs.chain(children).collect()
    }

    /// Materialized children in child-table order, list entries expanded
    pub fn children(&self) -> Vec<Node> {
        let data = self.0.borrow();
        data.children
            .iter()
            .flat_map(|slot| match slot {
                ChildSlot::Single(child) => child.iter().cloned().collect::<Vec<_>>(),
                ChildSlot::List(list) => list.entries().to_vec(),
            })
            .collect()
    }

    /// Key of this entry computed from its key leafs; `None` when the type
    /// is keyless or a key leaf is unset
    pub fn declared_key(&self) -> Option<ListKey> {
        let data = self.0.borrow();
        if data.schema.keys.is_empty() {
            return None;
        }
        let mut values = Vec::with_capacity(data.schema.keys.len());
        for key in data.schema.keys {
            let leaf = data.leaf(key).filter(|l| l.is_set())?;
            let text = leaf.get();
            if !text.is_empty() {
                values.push(text);
            }
        }
        match values.len() {
            0 => None,
            1 => values.pop().map(ListKey::Single),
            _ => Some(ListKey::Tuple(values)),
        }
    }

    /// Key of this entry within its list, computed fresh
    pub fn list_key(&self) -> Option<ListKey> {
        self.declared_key()
            .or_else(|| self.synthetic_key().map(ListKey::Synthetic))
    }

    pub fn synthetic_key(&self) -> Option<u64> {
        self.0.borrow().synthetic_key
    }

    pub(crate) fn set_synthetic_key(&self, key: Option<u64>) {
        self.0.borrow_mut().synthetic_key = key;
    }

    /// Qualified name plus `[key='value']` qualifiers, or a positional
    /// `[n]` for entries held under a synthetic key.
    ///
    /// A value containing `'` is wrapped in double quotes instead. A value
    /// containing both quote characters is not escaped.
    pub fn segment_path(&self) -> String {
        let data = self.0.borrow();
        let mut path = data.schema.qualified_name();

        let mut rendered = false;
        for key in data.schema.keys {
            if let Some(leaf) = data.leaf(key).filter(|l| l.is_set()) {
                let text = leaf.get();
                if text.contains('\'') {
                    path.push_str(&format!("[{}=\"{}\"]", leaf.name(), text));
                } else {
                    path.push_str(&format!("[{}='{}']", leaf.name(), text));
                }
                rendered = true;
            }
        }

        if !rendered {
            if let Some(key) = data.synthetic_key {
                path.push_str(&format!("[{}]", (key - 1) % POSITION_MODULUS));
            }
        }
        path
    }

    /// Segment paths of every ancestor joined with `/`.
    ///
    /// A node without a parent uses its own segment path when it is
    /// top-level, and the absolute path supplied by its schema otherwise.
    pub fn absolute_path(&self) -> String {
        let segment = self.segment_path();
        if let Some(parent) = self.parent() {
            return format!("{}/{}", parent.absolute_path(), segment);
        }
        let schema = self.schema();
        if schema.is_top_level {
            return segment;
        }
        match schema.absolute_path {
            Some(path) => path.to_string(),
            None => segment,
        }
    }

    /// Whether any leaf in this node or its descendants carries data
    pub fn has_data(&self) -> bool {
        let children = {
            let data = self.0.borrow();
            if data.is_presence || data.filter.is_set() {
                return true;
            }
            let leaf_data = data.leafs.iter().any(|slot| match slot {
                LeafSlot::Leaf(leaf) => leaf.has_data() || leaf.filter.is_set(),
                LeafSlot::List(list) => !list.is_empty() || list.filter.is_set(),
            });
            if leaf_data {
                return true;
            }
            drop(data);
            self.children()
        };
        children.iter().any(Node::has_data)
    }

    /// `(name, data)` for every leaf that is set or carries a filter.
    /// Leaf-list members are reported as `name[.="value"]`.
    pub fn name_leaf_data(&self) -> Vec<(String, LeafData)> {
        let data = self.0.borrow();
        let mut out = Vec::new();
        for slot in &data.leafs {
            match slot {
                LeafSlot::Leaf(leaf) => {
                    if leaf.is_set() || leaf.filter.is_set() {
                        out.push(leaf.name_leaf_data());
                    }
                }
                LeafSlot::List(list) => {
                    if !list.is_empty() {
                        out.extend(list.name_leaf_data());
                    } else if list.filter.is_set() {
                        out.push((
                            list.name().to_string(),
                            LeafData {
                                value: String::new(),
                                filter: list.filter,
                                is_set: false,
                                namespace: String::new(),
                                namespace_prefix: String::new(),
                            },
                        ));
                    }
                }
            }
        }
        tracing::debug!(
            node = data.schema.yang_name,
            count = out.len(),
            "collected leaf data"
        );
        out
    }

    /// Walk `absolute_path` down from this top-level node.
    ///
    /// Container segments are materialized as needed. A keyed segment must
    /// match an existing entry, except for the final segment, which yields
    /// every entry of the list when nothing matches.
    pub fn resolve(&self, absolute_path: &str) -> Result<Resolved> {
        if absolute_path.is_empty() {
            return Err(YangError::invalid_argument(
                "Argument 'absolute_path' should not be empty",
            ));
        }
        let top_path = self.absolute_path();
        if top_path.is_empty() {
            return Err(YangError::invalid_argument(format!(
                "absolute path of '{}' should not be empty",
                self.yang_name()
            )));
        }

        let segments = segmentalize(absolute_path);
        if segments[0] != top_path {
            return Err(YangError::invalid_argument(format!(
                "{} is not in the ancestor hierarchy of {}",
                top_path, absolute_path
            )));
        }

        let mut node = self.clone();
        let last = segments.len() - 1;
        for (i, segment) in segments.iter().enumerate().skip(1) {
            if let Some((name, _)) = segment.split_once('[') {
                let entries = node.list(name).ok_or_else(|| {
                    YangError::invalid_argument(format!(
                        "'{}' is not a list of '{}'",
                        name,
                        node.yang_name()
                    ))
                })?;
                match entries.iter().find(|e| e.segment_path() == *segment) {
                    Some(entry) => node = entry.clone(),
                    None if i == last => return Ok(Resolved::Entries(entries)),
                    None => {
                        return Err(YangError::invalid_argument(format!(
                            "no entry matching '{}' in {}",
                            segment,
                            node.absolute_path()
                        )));
                    }
                }
            } else {
                node = node.child_by_name(segment, segment).ok_or_else(|| {
                    YangError::invalid_argument(format!(
                        "'{}' is not a child of '{}'",
                        segment,
                        node.yang_name()
                    ))
                })?;
            }
        }
        Ok(Resolved::Node(node))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let (self_has, other_has) = (self.has_data(), other.has_data());
        if !self_has && !other_has {
            return true;
        }
        if self_has != other_has {
            return false;
        }

        let a = self.0.borrow();
        let b = other.0.borrow();
        if !std::ptr::eq(a.schema, b.schema) {
            tracing::debug!(
                left = a.schema.yang_name,
                right = b.schema.yang_name,
                "entity types are not equal"
            );
            return false;
        }

        let leafs_equal = a.leafs.iter().zip(&b.leafs).all(|pair| match pair {
            (LeafSlot::Leaf(x), LeafSlot::Leaf(y)) => x == y,
            (LeafSlot::List(x), LeafSlot::List(y)) => x == y,
            _ => false,
        });
        if !leafs_equal {
            return false;
        }

        a.children.iter().zip(&b.children).all(|pair| match pair {
            (ChildSlot::Single(x), ChildSlot::Single(y)) => match (x, y) {
                (Some(x), Some(y)) => x == y,
                (Some(only), None) | (None, Some(only)) => !only.has_data(),
                (None, None) => true,
            },
            (ChildSlot::List(x), ChildSlot::List(y)) => {
                x.len() == y.len() && x.iter().zip(y.iter()).all(|(p, q)| p == q)
            }
            _ => false,
        })
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(data) => f
                .debug_struct("Node")
                .field("name", &data.schema.qualified_name())
                .field("filter", &data.filter)
                .field("leafs", &data.leafs)
                .field("children", &data.children)
                .finish(),
            Err(_) => f.write_str("Node(<borrowed>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{GLOBAL_BLOCK, INTERFACE, INTERFACES, SEGMENT_ROUTING};
    use crate::list::SYNTHETIC_KEY_BASE;
    use crate::types::Bits;

    fn interface(top: &Node, name: &str) -> Node {
        let entry = top.child_by_name("interface", "").unwrap();
        entry.set_leaf("name", name).unwrap();
        entry
    }

    #[test]
    fn test_segment_path_with_key() {
        let top = Node::new(&INTERFACES);
        let eth0 = interface(&top, "eth0");

        assert_eq!(eth0.segment_path(), "interface[name='eth0']");
        assert_eq!(
            eth0.absolute_path(),
            "example-interfaces:interfaces/interface[name='eth0']"
        );
    }

    #[test]
    fn test_path_follows_key_mutation() {
        let top = Node::new(&INTERFACES);
        let entry = interface(&top, "eth0");
        assert_eq!(entry.segment_path(), "interface[name='eth0']");

        entry.set_leaf("name", "eth1").unwrap();
        assert_eq!(entry.segment_path(), "interface[name='eth1']");
        assert_eq!(entry.list_key(), Some(ListKey::Single("eth1".into())));
    }

    #[test]
    fn test_key_quoting() {
        let top = Node::new(&INTERFACES);
        let entry = interface(&top, "it's");
        assert_eq!(entry.segment_path(), "interface[name=\"it's\"]");
    }

    #[test]
    fn test_key_with_both_quotes_is_not_escaped() {
        // Known limitation: no escaping scheme covers both quote characters.
        let top = Node::new(&INTERFACES);
        let entry = interface(&top, "a'b\"c");
        assert_eq!(entry.segment_path(), "interface[name=\"a'b\"c\"]");
    }

    #[test]
    fn test_tuple_key_path() {
        let top = Node::new(&INTERFACES);
        let route = top.child_by_name("route", "").unwrap();
        route.set_leaf("prefix", "10.0.0.0/8").unwrap();
        route.set_leaf("next-hop", "192.0.2.1").unwrap();

        assert_eq!(
            route.segment_path(),
            "route[prefix='10.0.0.0/8'][next-hop='192.0.2.1']"
        );
        assert_eq!(
            route.list_key(),
            Some(ListKey::Tuple(vec!["10.0.0.0/8".into(), "192.0.2.1".into()]))
        );
    }

    #[test]
    fn test_synthetic_keys() {
        let top = Node::new(&INTERFACES);
        let eth0 = interface(&top, "eth0");

        let units: Vec<Node> = (0..3)
            .map(|_| eth0.child_by_name("unit", "").unwrap())
            .collect();
        let keys: Vec<u64> = units.iter().filter_map(Node::synthetic_key).collect();
        assert_eq!(keys, vec![1_000_001, 1_000_002, 1_000_003]);
        assert!(keys.iter().all(|k| *k > SYNTHETIC_KEY_BASE));

        let paths: Vec<String> = units.iter().map(Node::segment_path).collect();
        assert_eq!(paths, vec!["unit[0]", "unit[1]", "unit[2]"]);
    }

    #[test]
    fn test_boolean_key_renders_literal() {
        let top = Node::new(&INTERFACES);
        let toggle = top.child_by_name("toggle", "").unwrap();
        toggle.set_leaf("on", true).unwrap();
        assert_eq!(toggle.segment_path(), "toggle[on='true']");
    }

    #[test]
    fn test_reinsert_same_key_replaces() {
        let top = Node::new(&INTERFACES);
        interface(&top, "eth0");

        let replacement = Node::new(&INTERFACE);
        replacement.set_leaf("name", "eth0").unwrap();
        replacement.set_leaf("mtu", 9000u16).unwrap();
        top.append("interface", replacement).unwrap();

        let entries = top.list("interface").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].leaf_value("mtu"), Some(Value::Uint(9000)));
    }

    #[test]
    fn test_append_rejects_wrong_type() {
        let top = Node::new(&INTERFACES);
        let err = top.append("interface", Node::new(&GLOBAL_BLOCK)).unwrap_err();
        assert!(matches!(err, YangError::ModelConstraint(_)));
    }

    #[test]
    fn test_lazy_child_is_reused() {
        let top = Node::new(&SEGMENT_ROUTING);
        assert!(top.child("global-block").is_none());

        let first = top.child_by_name("global-block", "").unwrap();
        let second = top.child_by_name("global-block", "global-block").unwrap();
        assert!(first.ptr_eq(&second));
        assert!(first.parent().unwrap().ptr_eq(&top));
        assert!(top.child_by_name("no-such-child", "").is_none());
    }

    #[test]
    fn test_standalone_absolute_path() {
        let block = Node::new(&GLOBAL_BLOCK);
        assert_eq!(
            block.absolute_path(),
            "Cisco-IOS-XR-um-segment-routing-cfg:segment-routing/global-block"
        );

        let top = Node::new(&SEGMENT_ROUTING);
        assert_eq!(top.absolute_path(), "Cisco-IOS-XR-um-segment-routing-cfg:segment-routing");
        let attached = top.child_by_name("global-block", "").unwrap();
        assert_eq!(attached.absolute_path(), block.absolute_path());
    }

    #[test]
    fn test_type_rejection_leaves_tree_unmodified() {
        let block = Node::new(&GLOBAL_BLOCK);
        block.set_leaf("lower-bound", 16000u32).unwrap();

        let err = block.set_leaf("lower-bound", "notanumber").unwrap_err();
        assert!(matches!(err, YangError::TypeMismatch { .. }));
        assert_eq!(block.leaf_value("lower-bound"), Some(Value::Uint(16000)));
    }

    #[test]
    fn test_bits_leaf_accepts_text_and_empty_set() {
        let top = Node::new(&INTERFACES);
        let eth0 = top.child_by_name("interface", "").unwrap();

        eth0.set_leaf("flags", "up running").unwrap();
        let mut expected = Bits::new();
        expected.set("up", true);
        expected.set("running", true);
        assert_eq!(eth0.leaf_value("flags"), Some(Value::Bits(expected)));

        eth0.set_leaf("flags", Bits::new()).unwrap();
        assert_eq!(eth0.leaf_value("flags"), Some(Value::Bits(Bits::new())));
    }

    #[test]
    fn test_unknown_leaf_rejected() {
        let block = Node::new(&GLOBAL_BLOCK);
        let err = block.set_leaf("middle-bound", 1u32).unwrap_err();
        assert!(matches!(err, YangError::ModelConstraint(_)));
    }

    #[test]
    fn test_has_data() {
        let top = Node::new(&SEGMENT_ROUTING);
        let block = top.child_by_name("global-block", "").unwrap();
        assert!(!top.has_data());

        block.set_leaf_filter("upper-bound", YFilter::Delete).unwrap();
        assert!(top.has_data());

        block.set_leaf_filter("upper-bound", YFilter::NotSet).unwrap();
        block.set_leaf("upper-bound", 21000u32).unwrap();
        assert!(top.has_data());
    }

    #[test]
    fn test_equality_ignores_parents() {
        let detached = Node::new(&GLOBAL_BLOCK);
        detached.set_leaf("lower-bound", 20000u32).unwrap();

        let top = Node::new(&SEGMENT_ROUTING);
        let attached = top.child_by_name("global-block", "").unwrap();
        assert_ne!(detached, attached);

        attached.set_leaf("lower-bound", 20000u32).unwrap();
        assert_eq!(detached, attached);
    }

    #[test]
    fn test_resolve() {
        let top = Node::new(&INTERFACES);
        let eth0 = interface(&top, "eth0");
        interface(&top, "eth1");

        let found = top
            .resolve("example-interfaces:interfaces/interface[name='eth0']")
            .unwrap()
            .node()
            .unwrap();
        assert!(found.ptr_eq(&eth0));

        let all = top
            .resolve("example-interfaces:interfaces/interface[name='eth9']")
            .unwrap()
            .entries();
        assert_eq!(all.len(), 2);

        assert!(top.resolve("other:top/interface").is_err());
        assert!(top.resolve("").is_err());
    }

    #[test]
    fn test_leaf_list_and_name_leaf_data() {
        let top = Node::new(&INTERFACES);
        let eth0 = interface(&top, "eth0");
        eth0.append_leaf("alias", "uplink").unwrap();
        eth0.append_leaf("alias", "wan").unwrap();
        assert!(eth0.set_leaf("alias", "x").is_err());

        let names: Vec<String> = eth0.name_leaf_data().into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["name", "alias[.=\"uplink\"]", "alias[.=\"wan\"]"]
        );
    }
}
