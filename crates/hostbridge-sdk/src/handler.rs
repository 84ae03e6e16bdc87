//! Exposed trait and member tables, the capability descriptor of a host type
//!
//! A host type declares the members it offers to the hosted runtime once, as a
//! `MemberTable` of named invokers and accessors. The bridge walks that table
//! instead of inspecting types at runtime. `#[expose]` from `hostbridge-native`
//! generates the table; it can also be written by hand with the builder below.

use std::any::Any;
use std::sync::Arc;

use crate::error::{BridgeError, BridgeResult};
use crate::value::{BridgeValue, ValueKind};

/// A host type whose members can be reached from the hosted runtime.
pub trait Exposed: Any + Send + Sync {
    /// Runtime type name, used in diagnostics
    fn type_name(&self) -> &'static str;

    /// Declared members, in declaration order
    fn members(&self) -> MemberTable;

    /// Upcast for downcasting to the concrete type
    fn as_any(&self) -> &dyn Any;

    /// Upcast a shared handle for downcasting to the concrete type
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Full Rust path of the implementing type
    fn rust_type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Method invoker: `(instance, arguments) -> result`
pub type InvokeFn =
    Arc<dyn Fn(&dyn Exposed, &[BridgeValue]) -> BridgeResult<BridgeValue> + Send + Sync>;

/// Property getter: `(instance) -> value`
pub type GetterFn = Arc<dyn Fn(&dyn Exposed) -> BridgeResult<BridgeValue> + Send + Sync>;

/// Property setter: `(instance, value)`
pub type SetterFn = Arc<dyn Fn(&dyn Exposed, BridgeValue) -> BridgeResult<()> + Send + Sync>;

/// A declared method
#[derive(Clone)]
pub struct MethodEntry {
    /// Exposed name
    pub name: String,
    /// Declared return type
    pub returns: ValueKind,
    /// Special-named members (operators, accessors) are never exposed
    pub special: bool,
    /// Bound invoker
    pub invoke: InvokeFn,
}

impl std::fmt::Debug for MethodEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodEntry")
            .field("name", &self.name)
            .field("returns", &self.returns)
            .field("special", &self.special)
            .finish()
    }
}

/// A declared property
#[derive(Clone)]
pub struct PropertyEntry {
    /// Exposed name
    pub name: String,
    /// Declared value type
    pub kind: ValueKind,
    /// Special-named members are never exposed
    pub special: bool,
    /// Getter
    pub get: GetterFn,
    /// Setter, `None` for read-only properties
    pub set: Option<SetterFn>,
}

impl std::fmt::Debug for PropertyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyEntry")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("special", &self.special)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
enum LastMember {
    Method(usize),
    Property(usize),
}

/// Ordered table of a type's declared members.
///
/// Duplicate names are kept; lookups resolve to the first declaration.
#[derive(Debug, Clone, Default)]
pub struct MemberTable {
    methods: Vec<MethodEntry>,
    properties: Vec<PropertyEntry>,
    last: Option<LastMember>,
}

fn receiver<T: Exposed>(this: &dyn Exposed) -> BridgeResult<&T> {
    this.as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| BridgeError::ReceiverMismatch {
            expected: std::any::type_name::<T>(),
            got: this.rust_type_name(),
        })
}

impl MemberTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a method on `T`
    pub fn method<T, F>(mut self, name: impl Into<String>, returns: ValueKind, invoke: F) -> Self
    where
        T: Exposed,
        F: Fn(&T, &[BridgeValue]) -> BridgeResult<BridgeValue> + Send + Sync + 'static,
    {
        self.methods.push(MethodEntry {
            name: name.into(),
            returns,
            special: false,
            invoke: Arc::new(move |this: &dyn Exposed, args: &[BridgeValue]| {
                invoke(receiver::<T>(this)?, args)
            }),
        });
        self.last = Some(LastMember::Method(self.methods.len() - 1));
        self
    }

    /// Declare a read-only property on `T`
    pub fn property<T, G>(mut self, name: impl Into<String>, kind: ValueKind, get: G) -> Self
    where
        T: Exposed,
        G: Fn(&T) -> BridgeResult<BridgeValue> + Send + Sync + 'static,
    {
        self.properties.push(PropertyEntry {
            name: name.into(),
            kind,
            special: false,
            get: Arc::new(move |this: &dyn Exposed| get(receiver::<T>(this)?)),
            set: None,
        });
        self.last = Some(LastMember::Property(self.properties.len() - 1));
        self
    }

    /// Declare a read-write property on `T`
    pub fn property_mut<T, G, S>(
        mut self,
        name: impl Into<String>,
        kind: ValueKind,
        get: G,
        set: S,
    ) -> Self
    where
        T: Exposed,
        G: Fn(&T) -> BridgeResult<BridgeValue> + Send + Sync + 'static,
        S: Fn(&T, BridgeValue) -> BridgeResult<()> + Send + Sync + 'static,
    {
        self.properties.push(PropertyEntry {
            name: name.into(),
            kind,
            special: false,
            get: Arc::new(move |this: &dyn Exposed| get(receiver::<T>(this)?)),
            set: Some(Arc::new(move |this: &dyn Exposed, value: BridgeValue| {
                set(receiver::<T>(this)?, value)
            })),
        });
        self.last = Some(LastMember::Property(self.properties.len() - 1));
        self
    }

    /// Flag the most recently declared member as special-named
    pub fn special(mut self) -> Self {
        match self.last {
            Some(LastMember::Method(i)) => self.methods[i].special = true,
            Some(LastMember::Property(i)) => self.properties[i].special = true,
            None => {}
        }
        self
    }

    /// Declared methods in order
    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    /// Declared properties in order
    pub fn properties(&self) -> &[PropertyEntry] {
        &self.properties
    }

    /// Split into method and property lists
    pub fn into_parts(self) -> (Vec<MethodEntry>, Vec<PropertyEntry>) {
        (self.methods, self.properties)
    }

    /// Check if the table declares nothing
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.properties.is_empty()
    }
}

/// Check the positional argument count of an invocation
pub fn expect_args(member: &str, args: &[BridgeValue], expected: usize) -> BridgeResult<()> {
    if args.len() != expected {
        return Err(BridgeError::ArgumentCount {
            member: member.to_string(),
            expected,
            got: args.len(),
        });
    }
    Ok(())
}

/// Render a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
