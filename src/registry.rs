//! Namespace tables of compiled schema bundles
//!
//! A bundle maps module prefixes to namespace URIs, top-level entity names to
//! their descriptor tables and identity tags to identity values. A `Registry`
//! holds every bundle a program uses and is handed to each codec call.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, YangError};
use crate::node::Node;
use crate::schema::NodeSchema;
use crate::types::Identity;

/// Raw namespace table for deserialization
#[derive(Debug, Deserialize)]
struct RawBundle {
    bundle: String,
    #[serde(default)]
    namespaces: BTreeMap<String, String>,
    #[serde(default)]
    identities: BTreeMap<String, RawIdentity>,
}

#[derive(Debug, Deserialize)]
struct RawIdentity {
    #[serde(default)]
    base: Vec<String>,
}

/// Lookup tables of one schema bundle
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Bundle name, matched against `NodeSchema::bundle`
    pub name: String,
    /// Module prefix to namespace URI
    namespaces: BTreeMap<String, String>,
    /// (module, top-level name) to descriptor table
    entities: HashMap<(String, String), &'static NodeSchema>,
    /// Qualified identity tag to identity value
    identities: HashMap<String, Identity>,
}

impl Bundle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: BTreeMap::new(),
            entities: HashMap::new(),
            identities: HashMap::new(),
        }
    }

    /// Load a namespace table from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Load a namespace table from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawBundle = serde_json::from_str(content)?;
        let mut bundle = Bundle::new(raw.bundle);
        bundle.namespaces = raw.namespaces;

        for (tag, raw_identity) in raw.identities {
            let (module, name) = tag.split_once(':').ok_or_else(|| {
                YangError::invalid_argument(format!(
                    "identity '{}' is not qualified with a module",
                    tag
                ))
            })?;
            let namespace = bundle.namespace(module).unwrap_or_default().to_string();
            let mut identity = Identity::new(namespace, module, name);
            identity.bases = raw_identity.base;
            bundle.identities.insert(tag, identity);
        }

        tracing::debug!(
            bundle = %bundle.name,
            namespaces = bundle.namespaces.len(),
            identities = bundle.identities.len(),
            "loaded namespace table"
        );
        Ok(bundle)
    }

    pub fn with_namespace(mut self, prefix: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.namespaces.insert(prefix.into(), namespace.into());
        self
    }

    /// Register the descriptor table of a top-level entity
    pub fn register_entity(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        schema: &'static NodeSchema,
    ) {
        self.entities.insert((module.into(), name.into()), schema);
    }

    pub fn add_identity(&mut self, identity: Identity) {
        self.identities.insert(identity.tag(), identity);
    }

    /// Namespace URI for a module prefix
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Module prefix bound to a namespace URI
    pub fn prefix_for_namespace(&self, namespace: &str) -> Option<&str> {
        self.namespaces
            .iter()
            .find(|(_, ns)| ns.as_str() == namespace)
            .map(|(prefix, _)| prefix.as_str())
    }

    pub fn entity(&self, module: &str, name: &str) -> Option<&'static NodeSchema> {
        self.entities
            .get(&(module.to_string(), name.to_string()))
            .copied()
    }

    pub fn identity(&self, tag: &str) -> Option<&Identity> {
        self.identities.get(tag)
    }
}

impl FromStr for Bundle {
    type Err = YangError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json_str(s)
    }
}

/// Every bundle known to the program
#[derive(Debug, Clone, Default)]
pub struct Registry {
    bundles: Vec<Bundle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bundle(mut self, bundle: Bundle) -> Self {
        self.add_bundle(bundle);
        self
    }

    /// Add a bundle, replacing any bundle of the same name
    pub fn add_bundle(&mut self, bundle: Bundle) {
        self.bundles.retain(|b| b.name != bundle.name);
        self.bundles.push(bundle);
    }

    pub fn bundle(&self, name: &str) -> Result<&Bundle> {
        self.bundles
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| YangError::invalid_argument(format!("bundle '{}' is not registered", name)))
    }

    /// Namespace URI of a prefix within a bundle
    pub fn namespace(&self, bundle: &str, prefix: &str) -> Option<&str> {
        self.bundle(bundle).ok().and_then(|b| b.namespace(prefix))
    }

    /// Resolve an identity tag across every bundle
    pub fn identity(&self, tag: &str) -> Option<Identity> {
        self.bundles
            .iter()
            .find_map(|b| b.identity(tag))
            .cloned()
    }

    /// Resolve an identity by namespace URI and local name
    pub fn identity_in_namespace(&self, namespace: &str, name: &str) -> Option<Identity> {
        self.bundles.iter().find_map(|b| {
            b.prefix_for_namespace(namespace)
                .and_then(|prefix| b.identity(&format!("{}:{}", prefix, name)))
                .cloned()
        })
    }

    /// Instantiate the top-level entity named by an absolute path's first segment
    pub fn top_level(&self, bundle: &str, root_segment: &str) -> Result<Node> {
        let segment = root_segment.split('[').next().unwrap_or(root_segment);
        let (module, name) = segment.split_once(':').ok_or_else(|| {
            YangError::invalid_argument(format!(
                "top-level segment '{}' is not qualified with a module",
                root_segment
            ))
        })?;
        let schema = self.bundle(bundle)?.entity(module, name).ok_or_else(|| {
            YangError::codec(format!(
                "no top-level entity '{}' in bundle '{}'",
                segment, bundle
            ))
        })?;
        Ok(Node::new(schema))
    }
}
