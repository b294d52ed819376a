//! gNMI JSON codec
//!
//! Edit operations produce `(xpath, object)` updates plus delete xpaths; read
//! operations produce bare xpaths. Decoding takes one `(path, val)` pair and
//! fills a fresh top-level tree from it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value as Json};

use crate::codec::{FilterGuard, OperationType};
use crate::error::{Result, YangError};
use crate::filter::YFilter;
use crate::leaf::YLeaf;
use crate::node::{Field, Node, Resolved};
use crate::path::{format_xpath, parse_segment, segmentalize};
use crate::registry::Registry;
use crate::types::{Identity, Value, YType};

/// One gNMI update: an xpath and the object found at it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathValue {
    pub path: String,
    pub val: Json,
}

impl PathValue {
    pub fn new(path: impl Into<String>, val: Json) -> Self {
        Self {
            path: path.into(),
            val,
        }
    }

    /// Parse a `{"path", "val"}` pair, or take the first update of a gNMI
    /// `notification` response
    pub fn from_response(payload: &str) -> Result<Self> {
        let response: Json = serde_json::from_str(payload)
            .map_err(|e| YangError::codec(format!("malformed JSON payload: {}", e)))?;

        let update = match response.get("notification") {
            Some(notification) => notification
                .get(0)
                .and_then(|n| n.get("update"))
                .and_then(|u| u.get(0))
                .cloned()
                .ok_or_else(|| YangError::codec("notification carries no update"))?,
            None => response,
        };
        serde_json::from_value(update)
            .map_err(|e| YangError::codec(format!("expected a path/val pair: {}", e)))
    }
}

/// Encoded JSON payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JsonPayload {
    /// Paths to read
    Read(Vec<String>),
    Edit {
        #[serde(rename = "update")]
        updates: Vec<PathValue>,
        #[serde(rename = "delete")]
        deletes: Vec<String>,
    },
}

impl JsonPayload {
    fn empty(operation: OperationType) -> Self {
        if operation.is_edit() {
            JsonPayload::Edit {
                updates: Vec::new(),
                deletes: Vec::new(),
            }
        } else {
            JsonPayload::Read(Vec::new())
        }
    }

    fn merge(&mut self, other: JsonPayload) {
        match (self, other) {
            (JsonPayload::Read(paths), JsonPayload::Read(more)) => paths.extend(more),
            (
                JsonPayload::Edit { updates, deletes },
                JsonPayload::Edit {
                    updates: more_updates,
                    deletes: more_deletes,
                },
            ) => {
                updates.extend(more_updates);
                deletes.extend(more_deletes);
            }
            _ => tracing::warn!("dropping payload of a different operation kind"),
        }
    }

    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// JSON codec bound to a registry
pub struct JsonCodec<'r> {
    registry: &'r Registry,
}

impl<'r> JsonCodec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn encode(&self, node: &Node, operation: OperationType) -> Result<JsonPayload> {
        if !operation.is_edit() {
            return Ok(JsonPayload::Read(vec![format_xpath(&node.absolute_path())]));
        }

        let _guard = FilterGuard::attach(node, operation, YFilter::Update);

        // updates are rooted at the closest ancestor that is not inside a list
        let mut top = node.clone();
        while top.has_list_ancestor() {
            match top.parent() {
                Some(parent) => top = parent,
                None => break,
            }
        }

        let mut root = Map::new();
        let mut deletes = Vec::new();
        self.encode_helper(&top, &mut root, &mut deletes);

        let mut updates = Vec::new();
        if !root.is_empty() {
            updates.push(PathValue::new(
                format_xpath(&top.absolute_path()),
                Json::Object(root),
            ));
        }
        Ok(JsonPayload::Edit { updates, deletes })
    }

    pub fn encode_list(&self, parent: &Node, list: &str, operation: OperationType) -> Result<JsonPayload> {
        let entries = parent.list(list).ok_or_else(|| {
            YangError::invalid_argument(format!(
                "'{}' has no list named '{}'",
                parent.yang_name(),
                list
            ))
        })?;
        self.encode_all(&entries, operation)
    }

    pub fn encode_all(&self, nodes: &[Node], operation: OperationType) -> Result<JsonPayload> {
        let mut payload = JsonPayload::empty(operation);
        for node in nodes {
            payload.merge(self.encode(node, operation)?);
        }
        Ok(payload)
    }

    fn encode_helper(&self, node: &Node, object: &mut Map<String, Json>, deletes: &mut Vec<String>) {
        if !node.has_data() {
            return;
        }
        if node.filter() == YFilter::Delete {
            deletes.push(format_xpath(&node.absolute_path()));
            return;
        }

        for (name, field) in node.fields() {
            match field {
                Field::Leaf(leaf) => {
                    if leaf.filter == YFilter::Delete {
                        deletes.push(format_xpath(&format!("{}/{}", node.absolute_path(), name)));
                    } else if leaf.is_set() {
                        object.insert(name.to_string(), leaf_json(&leaf));
                    }
                }
                Field::LeafList(list) => {
                    if list.filter == YFilter::Delete {
                        deletes.push(format_xpath(&format!("{}/{}", node.absolute_path(), name)));
                    } else if !list.is_empty() {
                        let values = list.iter().map(leaf_json).collect();
                        object.insert(name.to_string(), Json::Array(values));
                    }
                }
                Field::Child(child) => {
                    let mut child_object = Map::new();
                    self.encode_helper(&child, &mut child_object, deletes);
                    if !child_object.is_empty() {
                        object.insert(child_key(node, &child), Json::Object(child_object));
                    }
                }
                Field::ChildList(entries) => {
                    let Some(first) = entries.first() else {
                        continue;
                    };
                    let key = child_key(node, first);
                    let mut items = Vec::new();
                    for entry in &entries {
                        let mut entry_object = Map::new();
                        self.encode_helper(entry, &mut entry_object, deletes);
                        if !entry_object.is_empty() {
                            items.push(Json::Object(entry_object));
                        }
                    }
                    if !items.is_empty() {
                        object.insert(key, Json::Array(items));
                    }
                }
            }
        }
    }

    /// Decode one update into a fresh tree and return the part `model` names
    pub fn decode(&self, path_value: &PathValue, model: &Node) -> Result<Resolved> {
        let segments = segmentalize(&model.absolute_path());
        let top = self.registry.top_level(model.schema().bundle, &segments[0])?;

        if !path_value.path.is_empty() && !path_value.val.is_null() {
            let target = self.decode_path(&path_value.path, &top)?;
            self.decode_object(&path_value.val, &target)?;
        } else {
            tracing::debug!("empty update, returning an empty tree");
        }
        top.resolve(&model.absolute_path())
    }

    /// Walk `path` down from `top`, creating nodes and filling list keys
    fn decode_path(&self, path: &str, top: &Node) -> Result<Node> {
        let segments = segmentalize(path);
        let root = parse_segment(&segments[0])?;
        if root.name != top.schema().qualified_name() {
            return Err(YangError::codec(format!(
                "path '{}' does not start at '{}'",
                path,
                top.schema().qualified_name()
            )));
        }

        let lookup = |tag: &str| self.identity(tag);
        let mut node = top.clone();
        for segment in segments.iter().skip(1) {
            let parsed = parse_segment(segment)?;
            let missing = || {
                YangError::codec(format!(
                    "'{}' is not a child of '{}'",
                    parsed.name,
                    node.yang_name()
                ))
            };

            let next = if !parsed.keys.is_empty() {
                match node.find_list_entry(&parsed.name, &parsed.keys) {
                    Some(entry) => entry,
                    None => {
                        let entry = node.child_by_name(&parsed.name, "").ok_or_else(missing)?;
                        for (key, value) in &parsed.keys {
                            entry.set_value(key, value, &lookup)?;
                        }
                        node.rekey(&parsed.name, &entry);
                        entry
                    }
                }
            } else if let Some(position) = parsed.position {
                let existing = node
                    .list(&parsed.name)
                    .and_then(|entries| entries.get(position as usize).cloned());
                match existing {
                    Some(entry) => entry,
                    None => node.child_by_name(&parsed.name, "").ok_or_else(missing)?,
                }
            } else {
                node.child_by_name(&parsed.name, &parsed.name)
                    .ok_or_else(missing)?
            };
            node = next;
        }
        Ok(node)
    }

    fn decode_object(&self, value: &Json, node: &Node) -> Result<()> {
        let object = value.as_object().ok_or_else(|| {
            YangError::codec(format!(
                "expected an object for '{}', got {}",
                node.yang_name(),
                value
            ))
        })?;
        let lookup = |tag: &str| self.identity(tag);
        let schema = node.schema();

        for (name, item) in object {
            match item {
                Json::Object(_) => match node.child_by_name(name, name) {
                    Some(child) => self.decode_object(item, &child)?,
                    None => tracing::debug!(field = %name, "skipping unknown child"),
                },
                Json::Array(items) if schema.child_index(name).is_some() => {
                    for entry_value in items {
                        let entry = node.child_by_name(name, "").ok_or_else(|| {
                            YangError::codec(format!("'{}' is not a list", name))
                        })?;
                        self.decode_object(entry_value, &entry)?;
                        node.rekey(name, &entry);
                    }
                }
                Json::Array(items) => {
                    for member in items {
                        node.set_value(name, &scalar_text(member), &lookup)?;
                    }
                }
                scalar => {
                    if !node.set_value(name, &scalar_text(scalar), &lookup)? {
                        tracing::debug!(field = %name, "skipping unknown leaf");
                    }
                }
            }
        }
        Ok(())
    }

    fn identity(&self, tag: &str) -> Option<Identity> {
        self.registry.identity(tag)
    }
}

/// Name of `child` inside its parent's object: prefixed only when the child's
/// module differs from the parent's
fn child_key(parent: &Node, child: &Node) -> String {
    let schema = child.schema();
    match schema.prefix {
        Some(prefix) if effective_prefix(parent).as_deref() != Some(prefix) => {
            format!("{}:{}", prefix, schema.yang_name)
        }
        _ => schema.yang_name.to_string(),
    }
}

fn effective_prefix(node: &Node) -> Option<String> {
    match node.schema().prefix {
        Some(prefix) => Some(prefix.to_string()),
        None => node.parent().and_then(|p| effective_prefix(&p)),
    }
}

/// Integers up to 32 bits and booleans as JSON scalars, everything else as
/// a string
fn leaf_json(leaf: &YLeaf) -> Json {
    match leaf.value() {
        Some(Value::Uint(n)) if matches!(leaf.ytype(), YType::Uint8 | YType::Uint16 | YType::Uint32) => {
            Json::Number(Number::from(*n))
        }
        Some(Value::Int(n)) if matches!(leaf.ytype(), YType::Int8 | YType::Int16 | YType::Int32) => {
            Json::Number(Number::from(*n))
        }
        Some(Value::Bool(b)) => Json::Bool(*b),
        Some(Value::Empty) => Json::Null,
        _ => Json::String(leaf.get()),
    }
}

fn scalar_text(value: &Json) -> String {
    match value {
        Json::String(s) => s.clone(),
        Json::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Json::Null => String::new(),
        other => other.to_string(),
    }
}
