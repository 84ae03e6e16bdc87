//! Hostbridge Core
//!
//! The object bridge: registers host objects, discovers their exposed surface
//! once, and dispatches method calls and property access from a hosted
//! JavaScript runtime by node id and member name.
//!
//! # Example
//!
//! ```ignore
//! use hostbridge_core::{Dispatch, ObjectRepository};
//! use hostbridge_sdk::{BridgeValue, HostObject};
//!
//! let repo = ObjectRepository::new();
//! let id = repo.register("Calculator", HostObject::new(Calculator::default()));
//! let sum = repo.call_method(id, "Add", &[BridgeValue::I32(2), BridgeValue::I32(3)])?;
//! assert_eq!(sum, Dispatch::Handled(BridgeValue::I32(5)));
//! ```

#![warn(missing_docs)]

mod analysis;
pub mod config;
pub mod describe;
pub mod names;
pub mod node;
mod node_id;
pub mod repository;

pub use config::{BridgeConfig, ConfigError};
pub use describe::{MethodDescriptor, ObjectDescriptor, PropertyDescriptor, RootDescriptor};
pub use names::bridge_name;
pub use node::{BridgeMethod, BridgeProperty, Node, PropertyChild};
pub use repository::{Dispatch, ObjectRepository};

pub use hostbridge_sdk as sdk;
