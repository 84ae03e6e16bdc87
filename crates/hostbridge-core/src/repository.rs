//! The object repository: registration and dispatch by node id
//!
//! Host code registers named values; the hosted runtime later calls methods
//! and reads or writes properties by node id and member name. An unknown id
//! is an ordinary outcome (`Dispatch::NodeNotFound`), since ids may belong to
//! another repository. A known id with an unknown member is a contract
//! mismatch and fails with `BridgeError::MemberNotFound`.

use std::sync::Arc;

use dashmap::DashMap;
use hostbridge_sdk::{
    BridgeError, BridgeResult, BridgeValue, Exposed, MemberKind, NodeId,
};
use parking_lot::RwLock;

use crate::analysis::Analyzer;
use crate::config::BridgeConfig;
use crate::node::Node;
use crate::node_id::next_node_id;

/// Outcome of a dispatch against a node id
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch<T> {
    /// The node exists and the member ran
    Handled(T),
    /// No node with this id in this repository
    NodeNotFound,
}

impl<T> Dispatch<T> {
    /// Check if the dispatch reached a node
    pub fn is_handled(&self) -> bool {
        matches!(self, Dispatch::Handled(_))
    }

    /// Handled value, `None` if the node was not found
    pub fn handled(self) -> Option<T> {
        match self {
            Dispatch::Handled(value) => Some(value),
            Dispatch::NodeNotFound => None,
        }
    }
}

/// Registry of exposed host objects
///
/// Registration and dispatch may run concurrently from different threads.
/// Dropping the repository releases every node; the host objects themselves
/// are only dereferenced.
pub struct ObjectRepository {
    config: BridgeConfig,
    /// Every node, roots and discovered children alike
    objects: DashMap<NodeId, Arc<Node>>,
    /// Root nodes in registration order
    roots: RwLock<Vec<NodeId>>,
}

impl ObjectRepository {
    /// Create an empty repository with the default config
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    /// Create an empty repository
    pub fn with_config(config: BridgeConfig) -> Self {
        Self {
            config,
            objects: DashMap::new(),
            roots: RwLock::new(Vec::new()),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Register a root value under `name` and analyse it.
    ///
    /// Registering the same name twice adds a second, independent root.
    /// Returns the root's node id.
    pub fn register(&self, name: impl Into<String>, value: impl Into<BridgeValue>) -> NodeId {
        let name = name.into();
        let value = value.into();
        let id = next_node_id();

        let nodes = Analyzer::new(&self.config).run(id, &name, value);
        let created = nodes.len();
        for node in nodes {
            self.objects.insert(node.id(), Arc::new(node));
        }
        self.roots.write().push(id);

        tracing::debug!(root = %id, name = %name, nodes = created, "registered object");
        id
    }

    /// Call method `name` on node `id` with positional `args`
    pub fn call_method(
        &self,
        id: NodeId,
        name: &str,
        args: &[BridgeValue],
    ) -> BridgeResult<Dispatch<BridgeValue>> {
        let Some(node) = self.node(id) else {
            tracing::trace!(node = %id, method = name, "call on unknown node");
            return Ok(Dispatch::NodeNotFound);
        };

        let method = node
            .find_method(name)
            .ok_or_else(|| member_not_found(MemberKind::Method, name, &node))?;
        let receiver = receiver(&node, MemberKind::Method, name)?;

        tracing::trace!(node = %id, method = name, args = args.len(), "call method");
        let result = (method.invoker())(receiver, args)?;
        Ok(Dispatch::Handled(result))
    }

    /// Read property `name` of node `id`.
    ///
    /// A complex property whose live value is the object its snapshot node
    /// wraps is returned as that node's id.
    pub fn get_property(&self, id: NodeId, name: &str) -> BridgeResult<Dispatch<BridgeValue>> {
        let Some(node) = self.node(id) else {
            tracing::trace!(node = %id, property = name, "get on unknown node");
            return Ok(Dispatch::NodeNotFound);
        };

        let property = node
            .find_property(name)
            .ok_or_else(|| member_not_found(MemberKind::Property, name, &node))?;
        let receiver = receiver(&node, MemberKind::Property, name)?;

        tracing::trace!(node = %id, property = name, "get property");
        let value = (property.getter())(receiver)?;

        if let (Some(child), BridgeValue::Object(live)) = (property.child(), &value) {
            let tracked = self
                .node(child.id())
                .and_then(|n| n.value().as_object().map(|obj| obj.ptr_eq(live)))
                .unwrap_or(false);
            if tracked {
                return Ok(Dispatch::Handled(BridgeValue::Node(child.id())));
            }
        }
        Ok(Dispatch::Handled(value))
    }

    /// Write property `name` of node `id`
    pub fn set_property(
        &self,
        id: NodeId,
        name: &str,
        value: BridgeValue,
    ) -> BridgeResult<Dispatch<()>> {
        let Some(node) = self.node(id) else {
            tracing::trace!(node = %id, property = name, "set on unknown node");
            return Ok(Dispatch::NodeNotFound);
        };

        let property = node
            .find_property(name)
            .ok_or_else(|| member_not_found(MemberKind::Property, name, &node))?;
        let receiver = receiver(&node, MemberKind::Property, name)?;
        let setter = property
            .setter()
            .ok_or_else(|| BridgeError::ReadOnlyProperty(name.to_string()))?;

        tracing::trace!(node = %id, property = name, "set property");
        setter(receiver, value)?;
        Ok(Dispatch::Handled(()))
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<Arc<Node>> {
        // Clone out so no shard lock is held while host code runs
        self.objects.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Check if a node exists
    pub fn contains(&self, id: NodeId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Root nodes in registration order
    pub fn roots(&self) -> Vec<Arc<Node>> {
        self.roots
            .read()
            .iter()
            .filter_map(|id| self.node(*id))
            .collect()
    }

    /// First root registered under `name`
    pub fn root_by_name(&self, name: &str) -> Option<Arc<Node>> {
        self.roots().into_iter().find(|n| n.exposed_name() == name)
    }

    /// Child node id of a complex property, as snapshotted at registration
    pub fn property_node(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id)?
            .find_property(name)?
            .child()
            .map(|child| child.id())
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.objects.len()
    }

    /// Get the number of roots
    pub fn root_count(&self) -> usize {
        self.roots.read().len()
    }
}

impl Default for ObjectRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ObjectRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectRepository")
            .field("config", &self.config)
            .field("nodes", &self.objects.len())
            .field("roots", &self.root_count())
            .finish()
    }
}

fn member_not_found(kind: MemberKind, name: &str, node: &Node) -> BridgeError {
    BridgeError::MemberNotFound {
        kind,
        member: name.to_string(),
        type_name: node.type_name().to_string(),
    }
}

/// Host object behind a node. Only object nodes have members, so this only
/// fails for a node whose members were resolved without an object.
fn receiver<'n>(node: &'n Node, kind: MemberKind, name: &str) -> BridgeResult<&'n dyn Exposed> {
    node.value()
        .as_object()
        .map(|obj| obj.get())
        .ok_or_else(|| member_not_found(kind, name, node))
}
