//! Hostbridge SDK - types shared by host code and the object bridge
//!
//! This crate provides the value model, conversion traits and the `Exposed`
//! capability trait needed to make a host type reachable from a hosted
//! JavaScript runtime, without depending on the bridge itself.
//!
//! # Example
//!
//! ```ignore
//! use hostbridge_native::expose;
//!
//! pub struct Calculator;
//!
//! #[expose]
//! impl Calculator {
//!     #[bridge(name = "Add")]
//!     pub fn add(&self, a: i32, b: i32) -> i32 {
//!         a + b
//!     }
//! }
//! ```

#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod event;
pub mod handler;
pub mod value;

pub use convert::{FromBridge, ToBridge};
pub use error::{BridgeError, BridgeResult, MemberKind};
pub use event::{ConsoleListenerFn, ConsoleMessage, ConsoleMessageListeners, ListenerId};
pub use handler::{
    expect_args, panic_message, Exposed, GetterFn, InvokeFn, MemberTable, MethodEntry,
    PropertyEntry, SetterFn,
};
pub use value::{BridgeValue, HostObject, NodeId, TypeTag, ValueKind};
