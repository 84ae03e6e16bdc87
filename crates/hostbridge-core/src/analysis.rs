//! One-time discovery of a node's exposed surface
//!
//! Analysis walks the member table of a registered value and, for every
//! complex property, snapshots the property's current value into a child node
//! which is analysed in turn. It never fails: members that cannot be exposed
//! are skipped.

use hostbridge_sdk::{BridgeValue, HostObject, NodeId};

use crate::config::BridgeConfig;
use crate::node::{BridgeMethod, BridgeProperty, Node, PropertyChild};
use crate::node_id::next_node_id;

/// Builds the node tree for one registration
pub(crate) struct Analyzer<'a> {
    config: &'a BridgeConfig,
    /// Host objects on the path from the root to the node being analysed
    path: Vec<(usize, NodeId)>,
    /// Finished nodes, children before their parents
    created: Vec<Node>,
}

impl<'a> Analyzer<'a> {
    pub(crate) fn new(config: &'a BridgeConfig) -> Self {
        Self {
            config,
            path: Vec::new(),
            created: Vec::new(),
        }
    }

    /// Analyse `value` as node `id` and everything reachable through its
    /// complex properties. Returns every node created.
    pub(crate) fn run(mut self, id: NodeId, name: &str, value: BridgeValue) -> Vec<Node> {
        self.analyse(id, name, value, 0);
        self.created
    }

    fn analyse(&mut self, id: NodeId, name: &str, value: BridgeValue, depth: usize) {
        let object = value.as_object().cloned();
        let mut node = Node::new(id, name, value);

        // Null, scalars, text and node references have nothing to discover
        let Some(object) = object else {
            self.created.push(node);
            return;
        };

        if depth > self.config.max_depth {
            tracing::warn!(
                node = %id,
                name,
                depth,
                max_depth = self.config.max_depth,
                "analysis depth limit reached, node left without members"
            );
            self.created.push(node);
            return;
        }

        self.path.push((object.addr(), id));
        self.discover(&mut node, &object, depth);
        self.path.pop();

        tracing::debug!(
            node = %id,
            name,
            type_name = object.type_name(),
            methods = node.methods().len(),
            properties = node.properties().len(),
            "analysed node"
        );
        self.created.push(node);
    }

    fn discover(&mut self, node: &mut Node, object: &HostObject, depth: usize) {
        let (methods, properties) = object.get().members().into_parts();

        for method in methods {
            // Type descriptors cannot be marshalled to the hosted runtime
            if method.special || method.returns.is_type_descriptor() {
                continue;
            }
            node.add_method(BridgeMethod::new(method.name, method.returns, method.invoke));
        }

        for property in properties {
            if property.special || property.kind.is_type_descriptor() {
                continue;
            }
            let mut prop =
                BridgeProperty::new(property.name, property.kind, property.get, property.set);
            if prop.is_complex_type() {
                let child = self.snapshot(&prop, object, depth);
                prop.set_child(child);
            }
            node.add_property(prop);
        }
    }

    /// Create (or link) the node holding a complex property's current value
    fn snapshot(&mut self, prop: &BridgeProperty, owner: &HostObject, depth: usize) -> PropertyChild {
        let current = match (prop.getter())(owner.get()) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(
                    property = prop.exposed_name(),
                    type_name = owner.type_name(),
                    error = %err,
                    "property getter failed during analysis, snapshotting null"
                );
                BridgeValue::Null
            }
        };

        if self.config.detect_cycles {
            if let Some(ancestor) = current.as_object().and_then(|obj| self.ancestor(obj)) {
                tracing::warn!(
                    property = prop.exposed_name(),
                    ancestor = %ancestor,
                    "cyclic property, linking back to ancestor node"
                );
                return PropertyChild::BackReference(ancestor);
            }
        }

        let child_id = next_node_id();
        self.analyse(child_id, prop.exposed_name(), current, depth + 1);
        PropertyChild::Node(child_id)
    }

    fn ancestor(&self, object: &HostObject) -> Option<NodeId> {
        let addr = object.addr();
        self.path
            .iter()
            .find(|(ancestor, _)| *ancestor == addr)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostbridge_sdk::{expect_args, BridgeError, Exposed, MemberTable, TypeTag, ValueKind};
    use parking_lot::Mutex;
    use std::any::Any;
    use std::sync::Arc;

    /// Hand-written surface covering every exclusion rule
    struct Widget {
        label: String,
        parent: Mutex<Option<Arc<Widget>>>,
    }

    impl Widget {
        fn new(label: &str) -> Arc<Self> {
            Arc::new(Self {
                label: label.to_string(),
                parent: Mutex::new(None),
            })
        }
    }

    impl Exposed for Widget {
        fn type_name(&self) -> &'static str {
            "Widget"
        }

        fn members(&self) -> MemberTable {
            MemberTable::new()
                .method("Describe", ValueKind::String, |w: &Widget, args| {
                    expect_args("Describe", args, 0)?;
                    Ok(BridgeValue::String(w.label.clone()))
                })
                .method("GetType", ValueKind::Type, |_w: &Widget, _args| {
                    Ok(BridgeValue::Type(TypeTag::new("Widget")))
                })
                .method("op_Equality", ValueKind::Bool, |_w: &Widget, _args| {
                    Ok(BridgeValue::Bool(false))
                })
                .special()
                .property("Label", ValueKind::String, |w: &Widget| {
                    Ok(BridgeValue::String(w.label.clone()))
                })
                .property("Parent", ValueKind::Object, |w: &Widget| {
                    Ok(match &*w.parent.lock() {
                        Some(p) => BridgeValue::Object(HostObject::from_arc(Arc::clone(p))),
                        None => BridgeValue::Null,
                    })
                })
                .property("Kind", ValueKind::Type, |_w: &Widget| {
                    Ok(BridgeValue::Type(TypeTag::new("Widget")))
                })
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    struct Failing;

    impl Exposed for Failing {
        fn type_name(&self) -> &'static str {
            "Failing"
        }

        fn members(&self) -> MemberTable {
            MemberTable::new().property("Inner", ValueKind::Object, |_f: &Failing| {
                Err(BridgeError::Host("not ready".to_string()))
            })
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    fn root_of(nodes: &[Node]) -> &Node {
        nodes.last().unwrap()
    }

    #[test]
    fn test_scalar_and_null_have_no_members() {
        let config = BridgeConfig::default();
        for value in [BridgeValue::Null, BridgeValue::I32(1), BridgeValue::from("text")] {
            let nodes = Analyzer::new(&config).run(NodeId::from_u64(0), "Plain", value);
            assert_eq!(nodes.len(), 1);
            assert!(nodes[0].methods().is_empty());
            assert!(nodes[0].properties().is_empty());
        }
    }

    #[test]
    fn test_exclusions() {
        let config = BridgeConfig::default();
        let widget = HostObject::from_arc(Widget::new("w"));
        let nodes = Analyzer::new(&config).run(NodeId::from_u64(0), "Widget", widget.into());
        let root = root_of(&nodes);

        let methods: Vec<_> = root.methods().iter().map(|m| m.exposed_name()).collect();
        assert_eq!(methods, vec!["Describe"]);

        let props: Vec<_> = root.properties().iter().map(|p| p.exposed_name()).collect();
        assert_eq!(props, vec!["Label", "Parent"]);
        assert_eq!(root.properties()[1].bridge_name(), "parent");
    }

    #[test]
    fn test_complex_property_gets_child_node() {
        let config = BridgeConfig::default();
        let child = Widget::new("child");
        *child.parent.lock() = Some(Widget::new("parent"));

        let nodes = Analyzer::new(&config).run(
            NodeId::from_u64(0),
            "Child",
            HostObject::from_arc(child).into(),
        );
        // child, its parent, and the parent's null parent
        assert_eq!(nodes.len(), 3);

        let root = root_of(&nodes);
        let parent_prop = root.find_property("Parent").unwrap();
        let Some(PropertyChild::Node(parent_id)) = parent_prop.child() else {
            panic!("expected child node");
        };
        let parent_node = nodes.iter().find(|n| n.id() == parent_id).unwrap();
        assert_eq!(parent_node.exposed_name(), "Parent");
        assert_eq!(parent_node.type_name(), "Widget");
        assert!(parent_node.find_method("Describe").is_some());

        // Label is text: no child
        assert!(root.find_property("Label").unwrap().child().is_none());
    }

    #[test]
    fn test_cycle_links_back() {
        let config = BridgeConfig::default();
        let widget = Widget::new("loop");
        *widget.parent.lock() = Some(Arc::clone(&widget));

        let nodes = Analyzer::new(&config).run(
            NodeId::from_u64(100),
            "Loop",
            HostObject::from_arc(Arc::clone(&widget)).into(),
        );
        assert_eq!(nodes.len(), 1);
        let prop = root_of(&nodes).find_property("Parent").unwrap();
        assert_eq!(prop.child(), Some(PropertyChild::BackReference(NodeId::from_u64(100))));

        // break the Arc cycle so the test does not leak
        widget.parent.lock().take();
    }

    #[test]
    fn test_depth_limit_bounds_cycles() {
        let config = BridgeConfig {
            max_depth: 3,
            detect_cycles: false,
        };
        let widget = Widget::new("loop");
        *widget.parent.lock() = Some(Arc::clone(&widget));

        let nodes = Analyzer::new(&config).run(
            NodeId::from_u64(0),
            "Loop",
            HostObject::from_arc(Arc::clone(&widget)).into(),
        );
        // depths 0..=3 analysed, depth 4 created without members
        assert_eq!(nodes.len(), 5);
        assert!(nodes[0].properties().is_empty());

        widget.parent.lock().take();
    }

    #[test]
    fn test_failing_getter_snapshots_null() {
        let config = BridgeConfig::default();
        let nodes = Analyzer::new(&config).run(
            NodeId::from_u64(0),
            "Failing",
            HostObject::new(Failing).into(),
        );
        assert_eq!(nodes.len(), 2);
        assert!(nodes[0].value().is_null());
    }
}
