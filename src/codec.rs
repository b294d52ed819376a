//! Codec entry point shared by the XML and JSON codecs
//!
//! `Codec` dispatches on [`EncodingFormat`] and produces or consumes payload
//! text. Operation names are validated here so both codecs see a typed
//! [`OperationType`].

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, YangError};
use crate::filter::YFilter;
use crate::json::{JsonCodec, PathValue};
use crate::node::{Node, Resolved};
use crate::registry::Registry;
use crate::xml::XmlCodec;

/// Wire format of a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFormat {
    Xml,
    Json,
}

impl FromStr for EncodingFormat {
    type Err = YangError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "XML" => Ok(EncodingFormat::Xml),
            "JSON" => Ok(EncodingFormat::Json),
            _ => Err(YangError::codec(format!(
                "Invalid encoding format '{}'. Supported formats: [XML, JSON]",
                s
            ))),
        }
    }
}

/// Operation a payload is produced for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Create,
    Read,
    Update,
    Delete,
    Action,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationType::Create => "create",
            OperationType::Read => "read",
            OperationType::Update => "update",
            OperationType::Delete => "delete",
            OperationType::Action => "action",
        }
    }

    /// Create, update and delete produce edit payloads
    pub fn is_edit(self) -> bool {
        matches!(
            self,
            OperationType::Create | OperationType::Update | OperationType::Delete
        )
    }

    /// Read and action payloads select data instead of carrying it
    pub fn is_filter(self) -> bool {
        matches!(self, OperationType::Read | OperationType::Action)
    }

    /// Filter attached to an unmarked node for this operation.
    /// `edit_default` is the codec's vocabulary for create/update.
    pub(crate) fn node_filter(self, edit_default: YFilter) -> Option<YFilter> {
        match self {
            OperationType::Delete => Some(YFilter::Delete),
            OperationType::Create | OperationType::Update => Some(edit_default),
            OperationType::Read | OperationType::Action => None,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = YangError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "create" => Ok(OperationType::Create),
            "read" => Ok(OperationType::Read),
            "update" => Ok(OperationType::Update),
            "delete" => Ok(OperationType::Delete),
            "action" => Ok(OperationType::Action),
            _ => Err(YangError::codec(format!(
                "Invalid operation type '{}'. Supported types: [create, read, update, delete, action]",
                s
            ))),
        }
    }
}

/// Marks a node with an operation's filter for the duration of one encode.
///
/// The filter is only attached when the node is unmarked; the previous
/// value is put back on drop, so early returns and errors restore it too.
pub struct FilterGuard {
    node: Node,
    previous: YFilter,
}

impl FilterGuard {
    pub fn attach(node: &Node, operation: OperationType, edit_default: YFilter) -> Self {
        let previous = node.filter();
        if previous == YFilter::NotSet {
            if let Some(filter) = operation.node_filter(edit_default) {
                node.set_filter(filter);
            }
        }
        Self {
            node: node.clone(),
            previous,
        }
    }
}

impl Drop for FilterGuard {
    fn drop(&mut self) {
        self.node.set_filter(self.previous);
    }
}

/// Format-agnostic encode/decode over payload text
pub struct Codec<'r> {
    registry: &'r Registry,
}

impl<'r> Codec<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Encode one node
    pub fn encode(&self, node: &Node, format: EncodingFormat, operation: OperationType) -> Result<String> {
        match format {
            EncodingFormat::Xml => XmlCodec::new(self.registry).encode(node, operation),
            EncodingFormat::Json => JsonCodec::new(self.registry)
                .encode(node, operation)?
                .to_pretty_string(),
        }
    }

    /// Encode every entry of the list child `list` of `parent`
    pub fn encode_list(
        &self,
        parent: &Node,
        list: &str,
        format: EncodingFormat,
        operation: OperationType,
    ) -> Result<String> {
        match format {
            EncodingFormat::Xml => XmlCodec::new(self.registry).encode_list(parent, list, operation),
            EncodingFormat::Json => JsonCodec::new(self.registry)
                .encode_list(parent, list, operation)?
                .to_pretty_string(),
        }
    }

    /// Encode several nodes into one payload
    pub fn encode_all(
        &self,
        nodes: &[Node],
        format: EncodingFormat,
        operation: OperationType,
    ) -> Result<String> {
        if nodes.is_empty() {
            return Err(YangError::invalid_argument("no entities to encode"));
        }
        match format {
            EncodingFormat::Xml => XmlCodec::new(self.registry).encode_all(nodes, operation),
            EncodingFormat::Json => JsonCodec::new(self.registry)
                .encode_all(nodes, operation)?
                .to_pretty_string(),
        }
    }

    /// Decode a payload into a fresh tree and return the part `model` names
    pub fn decode(&self, payload: &str, model: &Node, format: EncodingFormat) -> Result<Resolved> {
        if payload.trim().is_empty() {
            return Err(YangError::invalid_argument("payload is empty"));
        }
        match format {
            EncodingFormat::Xml => XmlCodec::new(self.registry).decode(payload, model),
            EncodingFormat::Json => {
                let path_value = PathValue::from_response(payload)?;
                JsonCodec::new(self.registry).decode(&path_value, model)
            }
        }
    }

    /// Decode an action reply into the `output` child of `model`
    pub fn decode_action_response(
        &self,
        payload: &str,
        model: &Node,
        format: EncodingFormat,
    ) -> Result<Node> {
        if payload.trim().is_empty() {
            return Err(YangError::invalid_argument("payload is empty"));
        }
        match format {
            EncodingFormat::Xml => XmlCodec::new(self.registry).decode_action_response(payload, model),
            EncodingFormat::Json => Err(YangError::codec(
                "action replies are only supported for XML payloads",
            )),
        }
    }
}
