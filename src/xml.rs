//! NETCONF XML codec
//!
//! Encoding builds a small element tree: the preamble chain of ancestor
//! elements down to the encoded node, then the node's own subtree. The tree
//! is written out with quick-xml. Decoding parses the payload into the same
//! element tree, fills a fresh top-level node from it and resolves the
//! requested model's path inside that tree.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use uuid::Uuid;

use crate::codec::{FilterGuard, OperationType};
use crate::error::{Result, YangError};
use crate::filter::YFilter;
use crate::leaf::LeafData;
use crate::node::{Node, Resolved};
use crate::path::{parse_segment, segmentalize};
use crate::registry::Registry;
use crate::schema::{local_name, name_prefix};
use crate::types::Identity;

/// NETCONF base namespace
pub const NETCONF_NS: &str = "urn:ietf:params:xml:ns:netconf:base:1.0";

/// Prefix bound to the namespace of identity values
const IDENTITY_PREFIX: &str = "idx";

/// Envelope elements removed before decoding
const ENVELOPES: [&str; 3] = ["rpc-reply", "data", "config"];

#[derive(Debug, Clone, Default)]
struct XmlElement {
    /// Local name
    name: String,
    /// Default namespace declared on the element when encoding, the resolved
    /// namespace when decoding
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
    text: Option<String>,
    children: Vec<XmlElement>,
    /// Prefix bindings in scope, innermost last. Filled while decoding.
    scope: Vec<(String, String)>,
}

impl XmlElement {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.scope
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, ns)| ns.as_str())
    }

    fn set_operation(&mut self, filter: YFilter) {
        self.attributes
            .push(("xmlns:nc".to_string(), NETCONF_NS.to_string()));
        self.attributes
            .push(("nc:operation".to_string(), filter.as_str().to_string()));
    }
}

/// How an encoded leaf lands in its parent element
enum LeafOut {
    Element(XmlElement),
    /// A single key named like its list element, written as element text
    ParentText(String),
}

/// XML codec bound to a registry
pub struct XmlCodec<'r> {
    registry: &'r Registry,
}

impl<'r> XmlCodec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Encode one node, wrapped in `<config>` for edit operations
    pub fn encode(&self, node: &Node, operation: OperationType) -> Result<String> {
        let elements = self.encode_elements(node, operation)?;
        render(elements, operation)
    }

    /// Encode every entry of list `list` under one copy of the ancestors
    pub fn encode_list(&self, parent: &Node, list: &str, operation: OperationType) -> Result<String> {
        let entries = parent.list(list).ok_or_else(|| {
            YangError::invalid_argument(format!(
                "'{}' has no list named '{}'",
                parent.yang_name(),
                list
            ))
        })?;

        let chain = self.ancestor_chain(parent, true)?;
        let mut body = Vec::new();
        for entry in &entries {
            let _guard = FilterGuard::attach(entry, operation, YFilter::Merge);
            body.extend(self.encode_helper(entry, operation, operation.is_filter())?);
        }
        render(fold(chain, body), operation)
    }

    /// Encode several nodes into one payload
    pub fn encode_all(&self, nodes: &[Node], operation: OperationType) -> Result<String> {
        let mut elements = Vec::new();
        for node in nodes {
            elements.extend(self.encode_elements(node, operation)?);
        }
        render(elements, operation)
    }

    /// Wrap a payload in a NETCONF `<rpc>` with a fresh message id
    pub fn create_rpc(payload: &str) -> String {
        format!(
            "<rpc xmlns=\"{}\" message-id=\"urn:uuid:{}\">{}</rpc>",
            NETCONF_NS,
            Uuid::new_v4(),
            payload
        )
    }

    fn encode_elements(&self, node: &Node, operation: OperationType) -> Result<Vec<XmlElement>> {
        let chain = self.ancestor_chain(node, false)?;

        let body = {
            let _guard = FilterGuard::attach(node, operation, YFilter::Merge);
            self.encode_helper(node, operation, operation.is_filter())?
        };

        let body = match (operation, body) {
            (OperationType::Action, Some(mut elem)) => {
                hoist_input(&mut elem);
                Some(elem)
            }
            (_, body) => body,
        };
        Ok(fold(chain, body.into_iter().collect()))
    }

    /// Element for a node, declaring its namespace when the node is prefixed
    fn element_for(&self, node: &Node) -> XmlElement {
        let schema = node.schema();
        let mut elem = XmlElement::new(schema.yang_name);
        if let Some(prefix) = schema.prefix {
            elem.namespace = self
                .registry
                .namespace(schema.bundle, prefix)
                .map(str::to_string);
        }
        elem
    }

    /// Elements for every ancestor of `node` (and `node` itself when
    /// `include_self`), top first. Key leafs of list entries are included.
    fn ancestor_chain(&self, node: &Node, include_self: bool) -> Result<Vec<XmlElement>> {
        let mut lineage = Vec::new();
        let mut current = if include_self {
            Some(node.clone())
        } else {
            node.parent()
        };
        while let Some(n) = current {
            current = n.parent();
            lineage.push(n);
        }
        lineage.reverse();

        let anchor = lineage.first().cloned().unwrap_or_else(|| node.clone());
        let mut chain = self.static_preamble(&anchor)?;

        for ancestor in &lineage {
            let mut elem = self.element_for(ancestor);
            let schema = ancestor.schema();
            for (name, data) in ancestor.name_leaf_data() {
                if !schema.is_key(&name) {
                    continue;
                }
                match self.leaf_element(&name, data, ancestor, None) {
                    Some(LeafOut::Element(leaf)) => elem.children.push(leaf),
                    Some(LeafOut::ParentText(text)) => elem.text = Some(text),
                    None => {}
                }
            }
            chain.push(elem);
        }
        Ok(chain)
    }

    /// Elements above a node that has no parent chain, built from its
    /// absolute path
    fn static_preamble(&self, node: &Node) -> Result<Vec<XmlElement>> {
        if node.is_top_level() {
            return Ok(Vec::new());
        }
        let segments = segmentalize(&node.absolute_path());
        let top = self.registry.top_level(node.schema().bundle, &segments[0])?;

        let mut chain = vec![self.element_for(&top)];
        let mut current = top;
        let inner = segments.len().saturating_sub(1);
        for segment in segments.iter().take(inner).skip(1) {
            let parsed = parse_segment(segment)?;
            let hint = if parsed.keys.is_empty() && parsed.position.is_none() {
                segment.as_str()
            } else {
                ""
            };
            let child = current.child_by_name(&parsed.name, hint).ok_or_else(|| {
                YangError::codec(format!(
                    "'{}' is not a child of '{}'",
                    parsed.name,
                    current.yang_name()
                ))
            })?;

            let mut elem = self.element_for(&child);
            for (key, value) in parsed.keys {
                let mut leaf = XmlElement::new(local_name(&key));
                leaf.text = Some(value);
                elem.children.push(leaf);
            }
            chain.push(elem);
            current = child;
        }
        Ok(chain)
    }

    /// Encode `node` and its descendants. Nodes without data are skipped
    /// unless `is_filter` asks for the node as a selection.
    fn encode_helper(
        &self,
        node: &Node,
        operation: OperationType,
        is_filter: bool,
    ) -> Result<Option<XmlElement>> {
        if !is_filter && !node.has_data() {
            return Ok(None);
        }

        let mut elem = self.element_for(node);
        let filter = node.filter();
        if operation != OperationType::Read && filter.is_wire_visible() {
            elem.set_operation(filter);
        }

        for (name, data) in node.name_leaf_data() {
            match self.leaf_element(&name, data, node, Some(operation)) {
                Some(LeafOut::Element(leaf)) => elem.children.push(leaf),
                Some(LeafOut::ParentText(text)) => elem.text = Some(text),
                None => {}
            }
        }

        for child in node.children() {
            if let Some(child_elem) = self.encode_helper(&child, operation, false)? {
                elem.children.push(child_elem);
            }
        }
        Ok(Some(elem))
    }

    /// Element for one leaf. `operation` is `None` inside the preamble,
    /// where no operation attributes are written.
    fn leaf_element(
        &self,
        name: &str,
        data: LeafData,
        owner: &Node,
        operation: Option<OperationType>,
    ) -> Option<LeafOut> {
        if !data.is_set && !data.filter.is_set() {
            return None;
        }

        // leaf-list members arrive as `name[.="value"]`
        let name = name.split_once("[.=").map(|(n, _)| n).unwrap_or(name);

        let schema = owner.schema();
        let mut elem = XmlElement::new(name);
        if let Some(prefix) = name_prefix(name) {
            if let Some(ns) = self.registry.namespace(schema.bundle, prefix) {
                elem.namespace = Some(ns.to_string());
                elem.name = local_name(name).to_string();
            }
        }

        let mut value = data.value;
        if !data.namespace.is_empty() && !data.namespace_prefix.is_empty() {
            elem.attributes
                .push((format!("xmlns:{}", IDENTITY_PREFIX), data.namespace));
            if let Some(rest) = value.strip_prefix(&format!("{}:", data.namespace_prefix)) {
                value = format!("{}:{}", IDENTITY_PREFIX, rest);
            }
        }
        if data.is_set {
            elem.text = Some(value);
        }

        if let Some(operation) = operation {
            let filter = match data.filter {
                YFilter::NotSet if operation == OperationType::Create && data.is_set => {
                    YFilter::Create
                }
                filter => filter,
            };
            if operation != OperationType::Read && filter.is_wire_visible() {
                elem.set_operation(filter);
            }
        }

        if schema.keys.len() == 1
            && local_name(schema.keys[0]) == elem.name
            && elem.name == schema.yang_name
        {
            return Some(LeafOut::ParentText(elem.text.unwrap_or_default()));
        }
        Some(LeafOut::Element(elem))
    }

    /// Decode a payload and return the node (or list entries) at `model`'s
    /// absolute path inside a freshly populated tree
    pub fn decode(&self, payload: &str, model: &Node) -> Result<Resolved> {
        let root = strip_envelopes(parse(payload)?)?;
        let top = self.top_entity(model)?;
        if root.name != top.yang_name() {
            return Err(YangError::codec(format!(
                "root element '{}' does not match top-level entity '{}'",
                root.name,
                top.yang_name()
            )));
        }

        self.decode_helper(&root, &top)?;
        top.resolve(&model.absolute_path())
    }

    /// Decode an action reply into the `output` child of `model`
    pub fn decode_action_response(&self, payload: &str, model: &Node) -> Result<Node> {
        if model.schema().child_index("output").is_none() {
            return Err(YangError::codec(format!(
                "'{}' has no output to decode a reply into",
                model.yang_name()
            )));
        }

        let root = parse(payload)?;
        let mut output = XmlElement::new("output");
        output.namespace = self.element_for(model).namespace;
        if ENVELOPES.contains(&root.name.as_str()) {
            output.children = root.children;
        } else {
            output.children.push(root);
        }

        let target = model.child_by_name("output", "output").ok_or_else(|| {
            YangError::codec(format!("'{}' has no output child", model.yang_name()))
        })?;
        self.decode_helper(&output, &target)?;
        Ok(target)
    }

    /// Fresh instance of the top-level entity above `model`
    fn top_entity(&self, model: &Node) -> Result<Node> {
        let segments = segmentalize(&model.absolute_path());
        self.registry.top_level(model.schema().bundle, &segments[0])
    }

    fn decode_helper(&self, elem: &XmlElement, node: &Node) -> Result<()> {
        let schema = node.schema();
        let bundle = self.registry.bundle(schema.bundle)?;

        if schema.keys.len() == 1 && schema.keys[0] == schema.yang_name && !elem.text().is_empty() {
            let lookup = |tag: &str| self.identity(tag, elem);
            node.set_value(schema.keys[0], elem.text(), &lookup)?;
        }

        for child in &elem.children {
            let mut name = child.name.clone();
            if let (Some(parent_ns), Some(ns)) = (&elem.namespace, &child.namespace) {
                if ns != parent_ns {
                    if let Some(prefix) = bundle.prefix_for_namespace(ns) {
                        name = format!("{}:{}", prefix, name);
                    }
                }
            }

            let lookup = |tag: &str| self.identity(tag, child);
            if node.set_value(&name, child.text(), &lookup)? {
                continue;
            }

            let is_list = schema
                .child_index(&name)
                .is_some_and(|i| schema.children[i].list);
            match node.child_by_name(&name, "") {
                Some(entry) => {
                    self.decode_helper(child, &entry)?;
                    if is_list {
                        node.rekey(&name, &entry);
                    }
                }
                None => tracing::debug!(element = %name, parent = schema.yang_name, "skipping unknown element"),
            }
        }
        Ok(())
    }

    /// Resolve identity text through the element's prefix bindings, falling
    /// back to the module-qualified tag
    fn identity(&self, text: &str, elem: &XmlElement) -> Option<Identity> {
        let (prefix, name) = text.split_once(':')?;
        elem.resolve_prefix(prefix)
            .and_then(|ns| self.registry.identity_in_namespace(ns, name))
            .or_else(|| self.registry.identity(text))
    }
}

/// Attach `body` under the last chain element and nest the chain
fn fold(mut chain: Vec<XmlElement>, body: Vec<XmlElement>) -> Vec<XmlElement> {
    let Some(mut inner) = chain.pop() else {
        return body;
    };
    inner.children.extend(body);
    while let Some(mut outer) = chain.pop() {
        outer.children.push(inner);
        inner = outer;
    }
    vec![inner]
}

/// Move the children of an action's `input` element up into the action
fn hoist_input(action: &mut XmlElement) {
    if let Some(pos) = action.children.iter().position(|c| c.name == "input") {
        let input = action.children.remove(pos);
        for (i, child) in input.children.into_iter().enumerate() {
            action.children.insert(pos + i, child);
        }
    }
}

fn render(elements: Vec<XmlElement>, operation: OperationType) -> Result<String> {
    if elements.is_empty() {
        tracing::debug!(%operation, "nothing to encode");
        return Ok(String::new());
    }
    let elements = if operation.is_edit() {
        let mut config = XmlElement::new("config");
        config.children = elements;
        vec![config]
    } else {
        elements
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    for elem in &elements {
        write_element(&mut writer, elem)?;
    }
    String::from_utf8(writer.into_inner()).map_err(|e| YangError::codec(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, elem: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(elem.name.as_str());
    if let Some(ns) = &elem.namespace {
        start.push_attribute(("xmlns", ns.as_str()));
    }
    for (key, value) in &elem.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if elem.children.is_empty() && elem.text().is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| YangError::codec(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| YangError::codec(e.to_string()))?;
    if !elem.text().is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(elem.text())))
            .map_err(|e| YangError::codec(e.to_string()))?;
    }
    for child in &elem.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(elem.name.as_str())))
        .map_err(|e| YangError::codec(e.to_string()))
}

fn parse(payload: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(payload);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| YangError::codec(format!("malformed payload: {}", e)))?;
        match event {
            Event::Start(e) => {
                let scope = stack.last().map(|p| p.scope.clone()).unwrap_or_default();
                stack.push(start_element(&e, scope)?);
            }
            Event::Empty(e) => {
                let scope = stack.last().map(|p| p.scope.clone()).unwrap_or_default();
                let elem = start_element(&e, scope)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None => root = Some(elem),
                }
            }
            Event::Text(t) => {
                let text = t
                    .unescape()
                    .map_err(|e| YangError::codec(format!("bad text: {}", e)))?;
                if let Some(current) = stack.last_mut() {
                    current.text.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Event::CData(c) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(&String::from_utf8_lossy(&c));
                }
            }
            Event::End(_) => {
                let elem = stack
                    .pop()
                    .ok_or_else(|| YangError::codec("unbalanced end tag"))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(elem),
                    None => root = Some(elem),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(YangError::codec("unexpected end of payload"));
    }
    root.ok_or_else(|| YangError::codec("payload has no root element"))
}

fn start_element(e: &BytesStart<'_>, mut scope: Vec<(String, String)>) -> Result<XmlElement> {
    let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| YangError::codec(format!("bad attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| YangError::codec(format!("bad attribute value: {}", e)))?
            .into_owned();
        if key == "xmlns" {
            scope.push((String::new(), value));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            scope.push((prefix.to_string(), value));
        } else {
            attributes.push((key, value));
        }
    }

    let mut elem = XmlElement {
        name: local_name(&qname).to_string(),
        attributes,
        scope,
        ..Default::default()
    };
    let prefix = name_prefix(&qname).unwrap_or("");
    elem.namespace = elem.resolve_prefix(prefix).map(str::to_string);
    Ok(elem)
}

/// Unwrap `<rpc-reply>`, `<data>` and `<config>` envelopes
fn strip_envelopes(mut root: XmlElement) -> Result<XmlElement> {
    while ENVELOPES.contains(&root.name.as_str()) {
        if root.children.is_empty() {
            return Err(YangError::codec(format!(
                "<{}> envelope carries no data",
                root.name
            )));
        }
        root = root.children.remove(0);
    }
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{
        EXT_NS, GLOBAL_BLOCK, IANA_NS, IF_NS, INTERFACES, RESET, SEGMENT_ROUTING, SR_NS,
        registry,
    };
    use crate::types::Value;

    fn global_block(lower: u32, upper: u32) -> Node {
        let block = Node::new(&GLOBAL_BLOCK);
        block.set_leaf("lower-bound", lower).unwrap();
        block.set_leaf("upper-bound", upper).unwrap();
        block
    }

    #[test]
    fn test_create_marks_leaves() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let xml = codec
            .encode(&global_block(20000, 21000), OperationType::Create)
            .unwrap();

        assert!(xml.starts_with("<config>"));
        assert!(xml.contains(&format!("<segment-routing xmlns=\"{}\">", SR_NS)));
        assert!(xml.contains("<global-block>"));
        assert!(xml.contains("nc:operation=\"create\">20000</lower-bound>"));
        assert!(xml.contains("nc:operation=\"create\">21000</upper-bound>"));
        assert!(xml.contains(&format!("xmlns:nc=\"{}\"", NETCONF_NS)));
    }

    #[test]
    fn test_create_round_trip() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let xml = codec
            .encode(&global_block(20000, 21000), OperationType::Create)
            .unwrap();

        let decoded = codec
            .decode(&xml, &Node::new(&GLOBAL_BLOCK))
            .unwrap()
            .node()
            .unwrap();
        assert_eq!(decoded.leaf_value("lower-bound"), Some(Value::Uint(20000)));
        assert_eq!(decoded.leaf_value("upper-bound"), Some(Value::Uint(21000)));
        assert_eq!(decoded, global_block(20000, 21000));
    }

    #[test]
    fn test_round_trip_with_plain_integer_literals() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let block = Node::new(&GLOBAL_BLOCK);
        block.set_leaf("lower-bound", 20000).unwrap();
        block.set_leaf("upper-bound", 21000).unwrap();
        assert_eq!(block.leaf_value("lower-bound"), Some(Value::Uint(20000)));

        let xml = codec.encode(&block, OperationType::Update).unwrap();
        let decoded = codec
            .decode(&xml, &Node::new(&GLOBAL_BLOCK))
            .unwrap()
            .node()
            .unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_update_leaves_have_no_operation() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let xml = codec
            .encode(&global_block(1, 2), OperationType::Update)
            .unwrap();
        assert!(xml.contains("<lower-bound>1</lower-bound>"));
        assert!(!xml.contains("nc:operation"));
    }

    #[test]
    fn test_delete_marks_node_and_restores_filter() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let block = global_block(1, 2);

        let xml = codec.encode(&block, OperationType::Delete).unwrap();
        assert!(xml.contains("<global-block xmlns:nc="));
        assert!(xml.contains("nc:operation=\"delete\""));
        assert_eq!(block.filter(), YFilter::NotSet);
    }

    #[test]
    fn test_read_filter_has_no_config() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let top = Node::new(&SEGMENT_ROUTING);

        let xml = codec.encode(&top, OperationType::Read).unwrap();
        assert_eq!(xml, format!("<segment-routing xmlns=\"{}\"/>", SR_NS));
    }

    #[test]
    fn test_leaf_filter_rendered() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let block = global_block(1, 2);
        block.set_leaf_filter("upper-bound", YFilter::Replace).unwrap();

        let xml = codec.encode(&block, OperationType::Update).unwrap();
        assert!(xml.contains("nc:operation=\"replace\">2</upper-bound>"));
        assert!(xml.contains("<lower-bound>1</lower-bound>"));
    }

    #[test]
    fn test_list_entry_with_identity_round_trip() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);

        let top = Node::new(&INTERFACES);
        let eth0 = top.child_by_name("interface", "").unwrap();
        eth0.set_leaf("name", "eth0").unwrap();
        eth0.set_leaf("type", registry.identity("iana-if-type:ethernetCsmacd").unwrap())
            .unwrap();
        let stats = eth0.child_by_name("example-ext:statistics", "").unwrap();
        stats.set_leaf("in-octets", 42u64).unwrap();

        let xml = codec.encode(&top, OperationType::Update).unwrap();
        assert!(xml.contains(&format!("xmlns:idx=\"{}\">idx:ethernetCsmacd</type>", IANA_NS)));
        assert!(xml.contains(&format!("<statistics xmlns=\"{}\">", EXT_NS)));

        let decoded = codec
            .decode(&xml, &Node::new(&INTERFACES))
            .unwrap()
            .node()
            .unwrap();
        assert_eq!(decoded, top);
    }

    #[test]
    fn test_encode_child_of_list_entry_keeps_keys() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);

        let top = Node::new(&INTERFACES);
        let eth0 = top.child_by_name("interface", "").unwrap();
        eth0.set_leaf("name", "eth0").unwrap();
        let config = eth0.child_by_name("config", "").unwrap();
        config.set_leaf("description", "uplink").unwrap();

        let xml = codec.encode(&config, OperationType::Update).unwrap();
        assert!(xml.contains("<name>eth0</name>"));
        assert!(xml.contains("<description>uplink</description>"));

        let decoded = codec.decode(&xml, &config).unwrap().node().unwrap();
        assert_eq!(
            decoded.leaf_value("description"),
            Some(Value::Str("uplink".into()))
        );
        assert_eq!(decoded.absolute_path(), config.absolute_path());
    }

    #[test]
    fn test_encode_list() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);

        let top = Node::new(&INTERFACES);
        for name in ["eth0", "eth1"] {
            let entry = top.child_by_name("interface", "").unwrap();
            entry.set_leaf("name", name).unwrap();
        }

        let xml = codec
            .encode_list(&top, "interface", OperationType::Read)
            .unwrap();
        assert!(xml.starts_with(&format!("<interfaces xmlns=\"{}\">", IF_NS)));
        assert!(xml.contains("<name>eth0</name>"));
        assert!(xml.contains("<name>eth1</name>"));
        assert!(codec.encode_list(&top, "nope", OperationType::Read).is_err());
    }

    #[test]
    fn test_action_hoists_input() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);

        let reset = Node::new(&RESET);
        let input = reset.child_by_name("input", "").unwrap();
        input.set_leaf("delay", 5u32).unwrap();

        let xml = codec.encode(&reset, OperationType::Action).unwrap();
        assert!(xml.contains("<delay>5</delay>"));
        assert!(!xml.contains("<input"));
        assert!(!xml.contains("<config"));
    }

    #[test]
    fn test_decode_action_response() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let reset = Node::new(&RESET);

        let reply = r#"<rpc-reply xmlns="urn:ietf:params:xml:ns:netconf:base:1.0" message-id="1">
            <status xmlns="urn:example:interfaces">done</status>
        </rpc-reply>"#;
        let output = codec.decode_action_response(reply, &reset).unwrap();
        assert_eq!(output.leaf_value("status"), Some(Value::Str("done".into())));
        assert!(reset.child("output").unwrap().ptr_eq(&output));

        let block = Node::new(&GLOBAL_BLOCK);
        assert!(codec.decode_action_response(reply, &block).is_err());
    }

    #[test]
    fn test_decode_strips_rpc_reply() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let payload = format!(
            r#"<rpc-reply message-id="101" xmlns="{}"><data>
                <segment-routing xmlns="{}"><global-block>
                    <lower-bound>16000</lower-bound>
                </global-block></segment-routing>
            </data></rpc-reply>"#,
            NETCONF_NS, SR_NS
        );

        let block = codec
            .decode(&payload, &Node::new(&GLOBAL_BLOCK))
            .unwrap()
            .node()
            .unwrap();
        assert_eq!(block.leaf_value("lower-bound"), Some(Value::Uint(16000)));
        assert!(!block.leaf("upper-bound").unwrap().is_set());
    }

    #[test]
    fn test_decode_errors() {
        let registry = registry();
        let codec = XmlCodec::new(&registry);
        let model = Node::new(&GLOBAL_BLOCK);

        assert!(matches!(
            codec.decode("<segment-routing><global-block>", &model),
            Err(YangError::Codec(_))
        ));
        assert!(matches!(
            codec.decode("<interfaces/>", &model),
            Err(YangError::Codec(_))
        ));
        let bad = "<segment-routing><global-block><lower-bound>abc</lower-bound></global-block></segment-routing>";
        match codec.decode(bad, &model) {
            Err(YangError::Codec(msg)) => {
                assert!(msg.contains("'lower-bound'"));
                assert!(msg.contains("'uint32'"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_create_rpc() {
        let rpc = XmlCodec::create_rpc("<get/>");
        assert!(rpc.starts_with(&format!("<rpc xmlns=\"{}\" message-id=\"urn:uuid:", NETCONF_NS)));
        assert!(rpc.ends_with("<get/></rpc>"));
    }
}
