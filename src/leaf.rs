//! Leaf and leaf-list holders

use std::fmt;

use crate::filter::YFilter;
use crate::types::{Bits, Value, YType};

/// Value and metadata of one leaf, as reported in path descriptors
#[derive(Debug, Clone)]
pub struct LeafData {
    pub value: String,
    pub filter: YFilter,
    pub is_set: bool,
    /// Namespace carried by an identity value, empty otherwise
    pub namespace: String,
    /// Module prefix carried by an identity value, empty otherwise
    pub namespace_prefix: String,
}

impl PartialEq for LeafData {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.filter == other.filter && self.is_set == other.is_set
    }
}

impl fmt::Display for LeafData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A scalar leaf
#[derive(Debug, Clone)]
pub struct YLeaf {
    name: &'static str,
    ytype: YType,
    value: Option<Value>,
    pub filter: YFilter,
}

impl YLeaf {
    pub fn new(name: &'static str, ytype: YType) -> Self {
        Self {
            name,
            ytype,
            value: None,
            filter: YFilter::NotSet,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ytype(&self) -> YType {
        self.ytype
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Wire text of the value, empty when unset
    pub fn get(&self) -> String {
        self.value.as_ref().map(Value::to_text).unwrap_or_default()
    }

    pub fn set(&mut self, value: Value) {
        self.value = Some(value);
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    /// Integer behind an enumeration value
    pub fn enum_value(&self) -> Option<i64> {
        match &self.value {
            Some(Value::Enum(e)) => Some(e.value),
            _ => None,
        }
    }

    /// Set one flag of a bits leaf, starting a fresh bit-set if needed
    pub fn set_bit(&mut self, name: &str, on: bool) {
        match &mut self.value {
            Some(Value::Bits(bits)) => bits.set(name, on),
            _ => {
                let mut bits = Bits::new();
                bits.set(name, on);
                self.value = Some(Value::Bits(bits));
            }
        }
    }

    /// Whether the leaf holds data worth encoding
    pub fn has_data(&self) -> bool {
        match &self.value {
            Some(Value::Bits(bits)) => !bits.is_empty(),
            Some(_) => true,
            None => false,
        }
    }

    pub fn leaf_data(&self) -> LeafData {
        let (namespace, namespace_prefix) = match &self.value {
            Some(Value::Identity(identity)) => {
                (identity.namespace.clone(), identity.prefix.clone())
            }
            _ => (String::new(), String::new()),
        };
        LeafData {
            value: self.get(),
            filter: self.filter,
            is_set: self.is_set(),
            namespace,
            namespace_prefix,
        }
    }

    pub fn name_leaf_data(&self) -> (String, LeafData) {
        (self.name.to_string(), self.leaf_data())
    }
}

impl PartialEq for YLeaf {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// An ordered sequence of leafs sharing one type
#[derive(Debug, Clone)]
pub struct YLeafList {
    name: &'static str,
    ytype: YType,
    values: Vec<YLeaf>,
    pub filter: YFilter,
}

impl YLeafList {
    pub fn new(name: &'static str, ytype: YType) -> Self {
        Self {
            name,
            ytype,
            values: Vec::new(),
            filter: YFilter::NotSet,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn append(&mut self, value: Value) {
        let mut leaf = YLeaf::new(self.name, self.ytype);
        leaf.set(value);
        self.values.push(leaf);
    }

    pub fn extend(&mut self, values: impl IntoIterator<Item = Value>) {
        for value in values {
            self.append(value);
        }
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&YLeaf> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &YLeaf> {
        self.values.iter()
    }

    /// One entry per member, named `name[.="value"]`
    pub fn name_leaf_data(&self) -> Vec<(String, LeafData)> {
        self.values
            .iter()
            .map(|leaf| {
                let mut data = leaf.leaf_data();
                data.filter = self.filter;
                (format!("{}[.=\"{}\"]", self.name, data.value), data)
            })
            .collect()
    }
}

impl PartialEq for YLeafList {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}
