//! Nodes and their discovered members

use hostbridge_sdk::{BridgeValue, GetterFn, InvokeFn, NodeId, SetterFn, ValueKind};
use rustc_hash::FxHashMap;

use crate::names::bridge_name;

/// A discovered method
#[derive(Clone)]
pub struct BridgeMethod {
    exposed_name: String,
    bridge_name: String,
    returns: ValueKind,
    invoke: InvokeFn,
}

impl BridgeMethod {
    pub(crate) fn new(exposed_name: String, returns: ValueKind, invoke: InvokeFn) -> Self {
        Self {
            bridge_name: bridge_name(&exposed_name),
            exposed_name,
            returns,
            invoke,
        }
    }

    /// Name as declared by the host type
    pub fn exposed_name(&self) -> &str {
        &self.exposed_name
    }

    /// Name seen by the hosted runtime
    pub fn bridge_name(&self) -> &str {
        &self.bridge_name
    }

    /// Declared return type
    pub fn returns(&self) -> ValueKind {
        self.returns
    }

    pub(crate) fn invoker(&self) -> &InvokeFn {
        &self.invoke
    }
}

impl std::fmt::Debug for BridgeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeMethod")
            .field("exposed_name", &self.exposed_name)
            .field("bridge_name", &self.bridge_name)
            .field("returns", &self.returns)
            .finish()
    }
}

/// Node held by a complex property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyChild {
    /// Child node created for the property's value at registration time
    Node(NodeId),
    /// The value was an ancestor on the analysis path; points back at it
    BackReference(NodeId),
}

impl PropertyChild {
    /// Id of the node either variant refers to
    pub fn id(&self) -> NodeId {
        match self {
            PropertyChild::Node(id) | PropertyChild::BackReference(id) => *id,
        }
    }
}

/// A discovered property
#[derive(Clone)]
pub struct BridgeProperty {
    exposed_name: String,
    bridge_name: String,
    kind: ValueKind,
    get: GetterFn,
    set: Option<SetterFn>,
    child: Option<PropertyChild>,
}

impl BridgeProperty {
    pub(crate) fn new(
        exposed_name: String,
        kind: ValueKind,
        get: GetterFn,
        set: Option<SetterFn>,
    ) -> Self {
        Self {
            bridge_name: bridge_name(&exposed_name),
            exposed_name,
            kind,
            get,
            set,
            child: None,
        }
    }

    /// Name as declared by the host type
    pub fn exposed_name(&self) -> &str {
        &self.exposed_name
    }

    /// Name seen by the hosted runtime
    pub fn bridge_name(&self) -> &str {
        &self.bridge_name
    }

    /// Declared value type
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Whether the declared type is neither a primitive scalar nor text
    pub fn is_complex_type(&self) -> bool {
        self.kind.is_complex()
    }

    /// Whether the property declares a setter
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }

    /// Snapshot node of a complex property
    pub fn child(&self) -> Option<PropertyChild> {
        self.child
    }

    pub(crate) fn set_child(&mut self, child: PropertyChild) {
        self.child = Some(child);
    }

    pub(crate) fn getter(&self) -> &GetterFn {
        &self.get
    }

    pub(crate) fn setter(&self) -> Option<&SetterFn> {
        self.set.as_ref()
    }
}

impl std::fmt::Debug for BridgeProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeProperty")
            .field("exposed_name", &self.exposed_name)
            .field("bridge_name", &self.bridge_name)
            .field("kind", &self.kind)
            .field("writable", &self.set.is_some())
            .field("child", &self.child)
            .finish()
    }
}

/// A host value known to the bridge, with the members discovered on it
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    exposed_name: String,
    bridge_name: String,
    value: BridgeValue,
    methods: Vec<BridgeMethod>,
    properties: Vec<BridgeProperty>,
    /// First method with each name
    method_index: FxHashMap<String, usize>,
    /// First property with each name
    property_index: FxHashMap<String, usize>,
}

impl Node {
    pub(crate) fn new(id: NodeId, exposed_name: impl Into<String>, value: BridgeValue) -> Self {
        let exposed_name = exposed_name.into();
        Self {
            id,
            bridge_name: bridge_name(&exposed_name),
            exposed_name,
            value,
            methods: Vec::new(),
            properties: Vec::new(),
            method_index: FxHashMap::default(),
            property_index: FxHashMap::default(),
        }
    }

    pub(crate) fn add_method(&mut self, method: BridgeMethod) {
        self.method_index
            .entry(method.exposed_name.clone())
            .or_insert(self.methods.len());
        self.methods.push(method);
    }

    pub(crate) fn add_property(&mut self, property: BridgeProperty) {
        self.property_index
            .entry(property.exposed_name.clone())
            .or_insert(self.properties.len());
        self.properties.push(property);
    }

    /// Node id
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name the node was registered or discovered under
    pub fn exposed_name(&self) -> &str {
        &self.exposed_name
    }

    /// Name seen by the hosted runtime
    pub fn bridge_name(&self) -> &str {
        &self.bridge_name
    }

    /// The wrapped host value
    pub fn value(&self) -> &BridgeValue {
        &self.value
    }

    /// Runtime type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.value.type_name()
    }

    /// Discovered methods in declaration order
    pub fn methods(&self) -> &[BridgeMethod] {
        &self.methods
    }

    /// Discovered properties in declaration order
    pub fn properties(&self) -> &[BridgeProperty] {
        &self.properties
    }

    /// First method with exactly this exposed name
    pub fn find_method(&self, name: &str) -> Option<&BridgeMethod> {
        self.method_index.get(name).map(|&i| &self.methods[i])
    }

    /// First property with exactly this exposed name
    pub fn find_property(&self, name: &str) -> Option<&BridgeProperty> {
        self.property_index.get(name).map(|&i| &self.properties[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostbridge_sdk::{BridgeResult, Exposed};
    use std::sync::Arc;

    fn constant(value: i32) -> InvokeFn {
        Arc::new(
            move |_this: &dyn Exposed, _args: &[BridgeValue]| -> BridgeResult<BridgeValue> {
                Ok(BridgeValue::I32(value))
            },
        )
    }

    #[test]
    fn test_names_derived_once() {
        let node = Node::new(NodeId::from_u64(3), "Foo", BridgeValue::Null);
        assert_eq!(node.exposed_name(), "Foo");
        assert_eq!(node.bridge_name(), "foo");
        assert_eq!(node.type_name(), "null");
    }

    #[test]
    fn test_first_match_wins() {
        let mut node = Node::new(NodeId::from_u64(1), "Calc", BridgeValue::Null);
        node.add_method(BridgeMethod::new("Get".to_string(), ValueKind::I32, constant(1)));
        node.add_method(BridgeMethod::new("Get".to_string(), ValueKind::I32, constant(2)));

        assert_eq!(node.methods().len(), 2);
        let found = node.find_method("Get").unwrap();
        assert!(Arc::ptr_eq(found.invoker(), node.methods()[0].invoker()));
        assert!(node.find_method("get").is_none());
    }

    #[test]
    fn test_property_child() {
        let get: GetterFn =
            Arc::new(|_this: &dyn Exposed| -> BridgeResult<BridgeValue> { Ok(BridgeValue::Null) });
        let mut prop = BridgeProperty::new("Inner".to_string(), ValueKind::Object, get, None);
        assert!(prop.is_complex_type());
        assert!(!prop.is_writable());
        assert_eq!(prop.bridge_name(), "inner");

        prop.set_child(PropertyChild::BackReference(NodeId::from_u64(9)));
        assert_eq!(prop.child().map(|c| c.id()), Some(NodeId::from_u64(9)));
    }
}
