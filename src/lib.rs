//! yang-entity - YANG data trees with NETCONF XML and gNMI JSON codecs
//!
//! Generated model code describes every node type with a static
//! [`NodeSchema`] table. This library builds typed trees from those tables,
//! computes their paths and converts them to and from XML and JSON payloads.
//!
//! # Example
//!
//! ```no_run
//! use yang_entity::{Bundle, Codec, EncodingFormat, Node, NodeSchema, OperationType, Registry};
//!
//! # fn run(schema: &'static NodeSchema) -> yang_entity::Result<()> {
//! // Load the namespace table of the bundle and register its top-level entities
//! let mut bundle = Bundle::from_file("openconfig.json")?;
//! bundle.register_entity("openconfig-interfaces", "interfaces", schema);
//! let registry = Registry::new().with_bundle(bundle);
//!
//! // Build a tree and encode it for an edit-config
//! let interfaces = Node::new(schema);
//! let eth0 = interfaces.child_by_name("interface", "").unwrap();
//! eth0.set_leaf("name", "eth0")?;
//!
//! let codec = Codec::new(&registry);
//! let xml = codec.encode(&interfaces, EncodingFormat::Xml, OperationType::Update)?;
//! println!("{}", xml);
//! # Ok(())
//! # }
//! ```

pub mod codec;
mod error;
pub mod filter;
pub mod json;
pub mod leaf;
pub mod list;
pub mod node;
pub mod path;
pub mod registry;
pub mod schema;
pub mod types;
pub mod xml;

#[cfg(test)]
mod fixtures;

pub use codec::{Codec, EncodingFormat, FilterGuard, OperationType};
pub use error::{Result, YangError};
pub use filter::YFilter;
pub use json::{JsonCodec, JsonPayload, PathValue};
pub use leaf::{LeafData, YLeaf, YLeafList};
pub use list::{ListKey, YList};
pub use node::{Field, Node, Resolved};
pub use path::{EntityPath, get_entity_path, get_relative_entity_path};
pub use registry::{Bundle, Registry};
pub use schema::{ChildSchema, LeafKind, LeafSchema, NodeSchema};
pub use types::{Bits, Decimal64, EnumValue, Identity, TypeDescriptor, Value, YType};
pub use xml::XmlCodec;
