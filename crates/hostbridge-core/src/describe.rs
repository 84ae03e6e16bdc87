//! Serialisable description of the exposed object tree
//!
//! This is what the hosted-runtime side needs to build its proxies: ids and
//! bridge names, nothing callable.

use serde::{Deserialize, Serialize};

use hostbridge_sdk::NodeId;

use crate::node::{Node, PropertyChild};
use crate::repository::ObjectRepository;

/// Every registered root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootDescriptor {
    /// Roots in registration order
    pub objects: Vec<ObjectDescriptor>,
}

/// One node and its members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    /// Node id
    pub id: u64,
    /// Exposed name
    pub name: String,
    /// Name used by the hosted runtime
    pub bridge_name: String,
    /// Methods in declaration order
    pub methods: Vec<MethodDescriptor>,
    /// Properties in declaration order
    pub properties: Vec<PropertyDescriptor>,
}

/// A method as seen by the hosted runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Exposed name
    pub name: String,
    /// Name used by the hosted runtime
    pub bridge_name: String,
}

/// A property as seen by the hosted runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Exposed name
    pub name: String,
    /// Name used by the hosted runtime
    pub bridge_name: String,
    /// Declared type is neither primitive nor text
    pub is_complex: bool,
    /// Snapshot of the property's value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<Box<ObjectDescriptor>>,
    /// Id of the ancestor a cyclic property points back to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_reference: Option<u64>,
}

impl ObjectRepository {
    /// Describe every root and everything reachable from it
    pub fn describe(&self) -> RootDescriptor {
        RootDescriptor {
            objects: self
                .roots()
                .iter()
                .map(|root| self.describe_node(root))
                .collect(),
        }
    }

    /// `describe()` rendered as JSON
    pub fn describe_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.describe())
    }

    /// Describe a single node and its subtree
    pub fn describe_id(&self, id: NodeId) -> Option<ObjectDescriptor> {
        self.node(id).map(|node| self.describe_node(&node))
    }

    fn describe_node(&self, node: &Node) -> ObjectDescriptor {
        let methods = node
            .methods()
            .iter()
            .map(|m| MethodDescriptor {
                name: m.exposed_name().to_string(),
                bridge_name: m.bridge_name().to_string(),
            })
            .collect();

        let properties = node
            .properties()
            .iter()
            .map(|p| {
                let (object, back_reference) = match p.child() {
                    Some(PropertyChild::Node(id)) => {
                        (self.describe_id(id).map(Box::new), None)
                    }
                    Some(PropertyChild::BackReference(id)) => (None, Some(id.as_u64())),
                    None => (None, None),
                };
                PropertyDescriptor {
                    name: p.exposed_name().to_string(),
                    bridge_name: p.bridge_name().to_string(),
                    is_complex: p.is_complex_type(),
                    object,
                    back_reference,
                }
            })
            .collect();

        ObjectDescriptor {
            id: node.id().as_u64(),
            name: node.exposed_name().to_string(),
            bridge_name: node.bridge_name().to_string(),
            methods,
            properties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostbridge_sdk::BridgeValue;

    #[test]
    fn test_describe_scalar_root() {
        let repo = ObjectRepository::new();
        let id = repo.register("Version", BridgeValue::from("1.2.0"));

        let root = repo.describe();
        assert_eq!(root.objects.len(), 1);
        assert_eq!(root.objects[0].id, id.as_u64());
        assert_eq!(root.objects[0].bridge_name, "version");
        assert!(root.objects[0].methods.is_empty());
    }

    #[test]
    fn test_json_is_camel_case() {
        let repo = ObjectRepository::new();
        let id = repo.register("Empty", BridgeValue::Null);

        let json = repo.describe_json().unwrap();
        assert_eq!(
            json,
            format!(
                r#"{{"objects":[{{"id":{},"name":"Empty","bridgeName":"empty","methods":[],"properties":[]}}]}}"#,
                id.as_u64()
            )
        );

        let parsed: RootDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, repo.describe());
    }

    #[test]
    fn test_describe_unknown_id() {
        let repo = ObjectRepository::new();
        assert!(repo.describe_id(NodeId::from_u64(u64::MAX)).is_none());
    }
}
