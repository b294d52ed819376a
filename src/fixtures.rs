//! Sample schema tables shared by the unit tests

use crate::registry::{Bundle, Registry};
use crate::schema::{ChildSchema, LeafSchema, NodeSchema};
use crate::types::{EnumMember, EnumType, TypeDescriptor, YType};

pub const SR_MODULE: &str = "Cisco-IOS-XR-um-segment-routing-cfg";
pub const SR_NS: &str = "http://cisco.com/ns/yang/Cisco-IOS-XR-um-segment-routing-cfg";
pub const IF_NS: &str = "urn:example:interfaces";
pub const EXT_NS: &str = "urn:example:ext";
pub const IANA_NS: &str = "urn:ietf:params:xml:ns:yang:iana-if-type";

pub const SAMPLE_BUNDLE: &str = r#"{
    "bundle": "example",
    "namespaces": {
        "Cisco-IOS-XR-um-segment-routing-cfg": "http://cisco.com/ns/yang/Cisco-IOS-XR-um-segment-routing-cfg",
        "example-interfaces": "urn:example:interfaces",
        "example-ext": "urn:example:ext",
        "iana-if-type": "urn:ietf:params:xml:ns:yang:iana-if-type"
    },
    "identities": {
        "iana-if-type:ethernetCsmacd": {"base": ["example-interfaces:interface-type"]},
        "iana-if-type:softwareLoopback": {"base": ["example-interfaces:interface-type"]}
    }
}"#;

pub static SPEED: EnumType = EnumType {
    module: "example-interfaces",
    container: "Interface",
    name: "Speed",
    members: &[
        EnumMember {
            name: "auto",
            value: 0,
        },
        EnumMember {
            name: "ten-gig",
            value: 10,
        },
    ],
};

static SPEED_TYPES: [TypeDescriptor; 1] = [TypeDescriptor::Enumeration(&SPEED)];

static IF_TYPE_TYPES: [TypeDescriptor; 1] = [TypeDescriptor::Identity {
    module: "example-interfaces",
    name: "interface-type",
}];

pub static SEGMENT_ROUTING: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "segment-routing",
    prefix: Some(SR_MODULE),
    yang_parent_name: SR_MODULE,
    leafs: &[],
    children: &[ChildSchema::container("global-block", &GLOBAL_BLOCK)],
    keys: &[],
    is_top_level: true,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static GLOBAL_BLOCK: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "global-block",
    prefix: None,
    yang_parent_name: "segment-routing",
    leafs: &[
        LeafSchema::leaf("lower-bound", YType::Uint32, &[]),
        LeafSchema::leaf("upper-bound", YType::Uint32, &[]),
    ],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: Some("Cisco-IOS-XR-um-segment-routing-cfg:segment-routing/global-block"),
};

pub static INTERFACES: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "interfaces",
    prefix: Some("example-interfaces"),
    yang_parent_name: "example-interfaces",
    leafs: &[],
    children: &[
        ChildSchema::list("interface", &INTERFACE),
        ChildSchema::list("route", &ROUTE),
        ChildSchema::list("toggle", &TOGGLE),
    ],
    keys: &[],
    is_top_level: true,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static INTERFACE: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "interface",
    prefix: None,
    yang_parent_name: "interfaces",
    leafs: &[
        LeafSchema::leaf("name", YType::Str, &[]),
        LeafSchema::leaf("mtu", YType::Uint16, &[]),
        LeafSchema::leaf("enabled", YType::Boolean, &[]),
        LeafSchema::leaf("type", YType::Identityref, &IF_TYPE_TYPES),
        LeafSchema::leaf("speed", YType::Enumeration, &SPEED_TYPES),
        LeafSchema::leaf("flags", YType::Bits, &[]),
        LeafSchema::leaf("ratio", YType::Decimal64, &[]),
        LeafSchema::leaf("cookie", YType::Binary, &[]),
        LeafSchema::leaf_list("alias", YType::Str, &[]),
    ],
    children: &[
        ChildSchema::container("config", &CONFIG),
        ChildSchema::list("unit", &UNIT),
        ChildSchema::container("example-ext:statistics", &STATISTICS),
    ],
    keys: &["name"],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static CONFIG: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "config",
    prefix: None,
    yang_parent_name: "interface",
    leafs: &[LeafSchema::leaf("description", YType::Str, &[])],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: true,
    absolute_path: None,
};

pub static UNIT: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "unit",
    prefix: None,
    yang_parent_name: "interface",
    leafs: &[
        LeafSchema::leaf("description", YType::Str, &[]),
        LeafSchema::leaf("vlan", YType::Uint16, &[]),
    ],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: true,
    absolute_path: None,
};

pub static STATISTICS: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "statistics",
    prefix: Some("example-ext"),
    yang_parent_name: "interface",
    leafs: &[LeafSchema::leaf("in-octets", YType::Uint64, &[])],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: true,
    absolute_path: None,
};

pub static ROUTE: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "route",
    prefix: None,
    yang_parent_name: "interfaces",
    leafs: &[
        LeafSchema::leaf("prefix", YType::Str, &[]),
        LeafSchema::leaf("next-hop", YType::Str, &[]),
        LeafSchema::leaf("metric", YType::Uint32, &[]),
    ],
    children: &[],
    keys: &["prefix", "next-hop"],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static TOGGLE: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "toggle",
    prefix: None,
    yang_parent_name: "interfaces",
    leafs: &[LeafSchema::leaf("on", YType::Boolean, &[])],
    children: &[],
    keys: &["on"],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static RESET: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "reset",
    prefix: Some("example-interfaces"),
    yang_parent_name: "example-interfaces",
    leafs: &[],
    children: &[
        ChildSchema::container("input", &RESET_INPUT),
        ChildSchema::container("output", &RESET_OUTPUT),
    ],
    keys: &[],
    is_top_level: true,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: None,
};

pub static RESET_INPUT: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "input",
    prefix: None,
    yang_parent_name: "reset",
    leafs: &[LeafSchema::leaf("delay", YType::Uint32, &[])],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: Some("example-interfaces:reset/input"),
};

pub static RESET_OUTPUT: NodeSchema = NodeSchema {
    bundle: "example",
    yang_name: "output",
    prefix: None,
    yang_parent_name: "reset",
    leafs: &[LeafSchema::leaf("status", YType::Str, &[])],
    children: &[],
    keys: &[],
    is_top_level: false,
    is_presence: false,
    has_list_ancestor: false,
    absolute_path: Some("example-interfaces:reset/output"),
};

/// Registry holding the sample bundle with every top-level entity registered
pub fn registry() -> Registry {
    let mut bundle: Bundle = match SAMPLE_BUNDLE.parse() {
        Ok(bundle) => bundle,
        Err(e) => panic!("sample bundle should parse: {}", e),
    };
    bundle.register_entity(SR_MODULE, "segment-routing", &SEGMENT_ROUTING);
    bundle.register_entity("example-interfaces", "interfaces", &INTERFACES);
    bundle.register_entity("example-interfaces", "reset", &RESET);
    Registry::new().with_bundle(bundle)
}
