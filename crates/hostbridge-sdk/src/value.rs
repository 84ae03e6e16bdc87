//! BridgeValue: the tagged value that crosses the bridge
//!
//! Scalars and text are carried inline. Host objects are carried as shared
//! `HostObject` handles; once the bridge tracks an object it is referred to by
//! its `NodeId` instead.

use std::fmt;
use std::sync::Arc;

use crate::handler::Exposed;

/// Identity of a node in an object repository.
///
/// Ids are opaque to the hosted runtime; it only hands them back.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a NodeId from a raw value (for ids received from the hosted runtime)
    pub const fn from_u64(id: u64) -> Self {
        NodeId(id)
    }

    /// Get the numeric id value
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A type-descriptor value.
///
/// Host code may produce these, but they cannot be marshalled to the hosted
/// runtime, so members declared with this type are never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeTag(&'static str);

impl TypeTag {
    /// Tag for a named type
    pub const fn new(name: &'static str) -> Self {
        TypeTag(name)
    }

    /// Tag for a Rust type
    pub fn of<T: ?Sized>() -> Self {
        TypeTag(std::any::type_name::<T>())
    }

    /// Type name
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

/// Shared handle to an exposed host object.
///
/// The bridge holds these for a node's lifetime but never drives the object's
/// lifecycle. Equality is identity.
#[derive(Clone)]
pub struct HostObject(Arc<dyn Exposed>);

impl HostObject {
    /// Wrap an owned host value
    pub fn new<T: Exposed>(value: T) -> Self {
        HostObject(Arc::new(value))
    }

    /// Wrap an already shared host value
    pub fn from_arc<T: Exposed>(value: Arc<T>) -> Self {
        HostObject(value)
    }

    /// Borrow the host object
    pub fn get(&self) -> &dyn Exposed {
        &*self.0
    }

    /// Runtime type name of the wrapped value
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// Borrow as a concrete type
    pub fn downcast_ref<T: Exposed>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Recover a shared handle to the concrete type
    pub fn downcast_arc<T: Exposed>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).into_any().downcast::<T>().ok()
    }

    /// Whether both handles point at the same host object
    pub fn ptr_eq(&self, other: &HostObject) -> bool {
        self.addr() == other.addr()
    }

    /// Address of the host object, used as its identity
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for HostObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostObject({} @ {:#x})", self.type_name(), self.addr())
    }
}

/// Declared type of an exposed member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// No value (method returns nothing)
    Unit,
    /// Boolean
    Bool,
    /// 32-bit integer
    I32,
    /// 64-bit integer
    I64,
    /// 64-bit float
    F64,
    /// Text
    String,
    /// Any host object
    Object,
    /// Type descriptor; never exposed
    Type,
}

impl ValueKind {
    /// Primitive scalar
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueKind::Bool | ValueKind::I32 | ValueKind::I64 | ValueKind::F64
        )
    }

    /// Complex type: a property of this kind gets its own child node
    pub const fn is_complex(self) -> bool {
        matches!(self, ValueKind::Object)
    }

    /// Type-descriptor valued
    pub const fn is_type_descriptor(self) -> bool {
        matches!(self, ValueKind::Type)
    }

    /// Name for diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::Unit => "unit",
            ValueKind::Bool => "bool",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::F64 => "f64",
            ValueKind::String => "string",
            ValueKind::Object => "object",
            ValueKind::Type => "type",
        }
    }
}

/// A value passed to or returned from the bridge.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BridgeValue {
    /// Absent value
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// 32-bit integer
    I32(i32),
    /// 64-bit integer
    I64(i64),
    /// 64-bit float
    F64(f64),
    /// Text
    String(String),
    /// Reference to a node the bridge already tracks
    Node(NodeId),
    /// Host object not (yet) known by id
    Object(HostObject),
    /// Type descriptor
    Type(TypeTag),
}

impl BridgeValue {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, BridgeValue::Null)
    }

    /// Primitive scalar or text: nothing to discover on it
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            BridgeValue::Bool(_)
                | BridgeValue::I32(_)
                | BridgeValue::I64(_)
                | BridgeValue::F64(_)
                | BridgeValue::String(_)
        )
    }

    /// Extract boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BridgeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract i32 value
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            BridgeValue::I32(i) => Some(*i),
            _ => None,
        }
    }

    /// Extract i64 value, widening i32
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BridgeValue::I64(i) => Some(*i),
            BridgeValue::I32(i) => Some(*i as i64),
            _ => None,
        }
    }

    /// Extract f64 value, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BridgeValue::F64(f) => Some(*f),
            BridgeValue::I32(i) => Some(*i as f64),
            BridgeValue::I64(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow text
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BridgeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract node id
    pub fn as_node(&self) -> Option<NodeId> {
        match self {
            BridgeValue::Node(id) => Some(*id),
            _ => None,
        }
    }

    /// Borrow host object
    pub fn as_object(&self) -> Option<&HostObject> {
        match self {
            BridgeValue::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Runtime type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            BridgeValue::Null => "null",
            BridgeValue::Bool(_) => "bool",
            BridgeValue::I32(_) => "i32",
            BridgeValue::I64(_) => "i64",
            BridgeValue::F64(_) => "f64",
            BridgeValue::String(_) => "string",
            BridgeValue::Node(_) => "node",
            BridgeValue::Object(obj) => obj.type_name(),
            BridgeValue::Type(_) => "type",
        }
    }
}

impl From<bool> for BridgeValue {
    fn from(b: bool) -> Self {
        BridgeValue::Bool(b)
    }
}

impl From<i32> for BridgeValue {
    fn from(i: i32) -> Self {
        BridgeValue::I32(i)
    }
}

impl From<i64> for BridgeValue {
    fn from(i: i64) -> Self {
        BridgeValue::I64(i)
    }
}

impl From<f64> for BridgeValue {
    fn from(f: f64) -> Self {
        BridgeValue::F64(f)
    }
}

impl From<&str> for BridgeValue {
    fn from(s: &str) -> Self {
        BridgeValue::String(s.to_string())
    }
}

impl From<String> for BridgeValue {
    fn from(s: String) -> Self {
        BridgeValue::String(s)
    }
}

impl From<HostObject> for BridgeValue {
    fn from(obj: HostObject) -> Self {
        BridgeValue::Object(obj)
    }
}

impl From<NodeId> for BridgeValue {
    fn from(id: NodeId) -> Self {
        BridgeValue::Node(id)
    }
}
