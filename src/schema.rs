//! Static descriptor tables supplied by generated model code
//!
//! Every node type is described by one `NodeSchema`: its qualified name, an
//! ordered leaf table, an ordered child table and its list keys. The tables
//! are plain `static` data, so the node model never needs reflection.

use std::fmt;

use crate::types::{TypeDescriptor, YType};

/// Whether a leaf table entry holds one value or an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Leaf,
    LeafList,
}

/// One entry of a node's leaf table
#[derive(Debug)]
pub struct LeafSchema {
    /// YANG name, prefixed (`module:name`) when augmented from another module
    pub name: &'static str,
    pub kind: LeafKind,
    pub ytype: YType,
    /// Acceptable types; a value must satisfy at least one
    pub types: &'static [TypeDescriptor],
}

impl LeafSchema {
    pub const fn leaf(name: &'static str, ytype: YType, types: &'static [TypeDescriptor]) -> Self {
        Self {
            name,
            kind: LeafKind::Leaf,
            ytype,
            types,
        }
    }

    pub const fn leaf_list(
        name: &'static str,
        ytype: YType,
        types: &'static [TypeDescriptor],
    ) -> Self {
        Self {
            name,
            kind: LeafKind::LeafList,
            ytype,
            types,
        }
    }

    /// Leaf name without its module prefix
    pub fn local_name(&self) -> &'static str {
        local_name(self.name)
    }

    /// Acceptable types, falling back to the holder's own type tag
    pub fn descriptors(&self) -> Vec<TypeDescriptor> {
        if self.types.is_empty() {
            vec![TypeDescriptor::Primitive(self.ytype)]
        } else {
            self.types.to_vec()
        }
    }
}

/// One entry of a node's child table
pub struct ChildSchema {
    /// Qualified child name as it appears in the parent's child table
    pub name: &'static str,
    /// The child is a list: entries live in an ordered keyed collection
    pub list: bool,
    pub schema: &'static NodeSchema,
}

impl ChildSchema {
    pub const fn container(name: &'static str, schema: &'static NodeSchema) -> Self {
        Self {
            name,
            list: false,
            schema,
        }
    }

    pub const fn list(name: &'static str, schema: &'static NodeSchema) -> Self {
        Self {
            name,
            list: true,
            schema,
        }
    }
}

impl fmt::Debug for ChildSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSchema")
            .field("name", &self.name)
            .field("list", &self.list)
            .finish()
    }
}

/// Descriptor table of one node type
#[derive(Debug)]
pub struct NodeSchema {
    /// Bundle whose namespace table qualifies this node
    pub bundle: &'static str,
    /// Local YANG name, used as the XML element tag
    pub yang_name: &'static str,
    /// Module prefix rendered in the segment path, if any
    pub prefix: Option<&'static str>,
    pub yang_parent_name: &'static str,
    pub leafs: &'static [LeafSchema],
    pub children: &'static [ChildSchema],
    /// Key leaf names, in declaration order
    pub keys: &'static [&'static str],
    pub is_top_level: bool,
    pub is_presence: bool,
    pub has_list_ancestor: bool,
    /// Absolute path used when the node is not attached to a parent chain
    pub absolute_path: Option<&'static str>,
}

impl NodeSchema {
    /// `prefix:yang-name` when prefixed, the bare YANG name otherwise
    pub fn qualified_name(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.yang_name),
            None => self.yang_name.to_string(),
        }
    }

    /// Position of a leaf in the leaf table. An exact match wins; otherwise
    /// names are compared without their module prefixes.
    pub fn leaf_index(&self, name: &str) -> Option<usize> {
        self.leafs.iter().position(|l| l.name == name).or_else(|| {
            self.leafs
                .iter()
                .position(|l| local_name(l.name) == local_name(name))
        })
    }

    /// Position of a child in the child table, matched like `leaf_index`
    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name).or_else(|| {
            self.children
                .iter()
                .position(|c| local_name(c.name) == local_name(name))
        })
    }

    pub fn is_key(&self, leaf: &str) -> bool {
        self.keys.contains(&leaf)
    }
}

/// Strip a `module:` prefix from a YANG name
pub fn local_name(name: &str) -> &str {
    name.split_once(':').map(|(_, local)| local).unwrap_or(name)
}

/// Module prefix of a YANG name, if it has one
pub fn name_prefix(name: &str) -> Option<&str> {
    name.split_once(':').map(|(prefix, _)| prefix)
}
