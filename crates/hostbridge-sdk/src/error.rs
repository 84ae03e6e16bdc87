//! Error types for bridge dispatch

use std::fmt;

/// Result type for bridge calls
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Which member table a failed lookup searched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Callable method
    Method,
    /// Property with getter (and optional setter)
    Property,
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKind::Method => write!(f, "Method"),
            MemberKind::Property => write!(f, "Property"),
        }
    }
}

/// Bridge error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// A resolved node has no member with the requested name.
    ///
    /// This is a contract mismatch between the exposed surface and the caller,
    /// never an expected outcome.
    #[error("{kind} {member} not found on Object of Type {type_name}")]
    MemberNotFound {
        /// Method or property table
        kind: MemberKind,
        /// Requested exposed name
        member: String,
        /// Runtime type name of the node's value
        type_name: String,
    },

    /// Type mismatch during conversion
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type name
        expected: String,
        /// Actual type name
        got: String,
    },

    /// Wrong number of positional arguments
    #[error("{member} expects {expected} arguments, got {got}")]
    ArgumentCount {
        /// Invoked member
        member: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// Property declares no setter
    #[error("Property {0} has no setter")]
    ReadOnlyProperty(String),

    /// An invoker was handed an instance of another type
    #[error("Receiver mismatch: expected {expected}, got {got}")]
    ReceiverMismatch {
        /// Type the invoker was built for
        expected: &'static str,
        /// Type it was called with
        got: &'static str,
    },

    /// Host code panicked inside an invoker
    #[error("{member} panicked: {message}")]
    Panic {
        /// Invoked member
        member: String,
        /// Panic payload, if it was a string
        message: String,
    },

    /// Failure raised by host code
    #[error("{0}")]
    Host(String),
}

impl From<String> for BridgeError {
    fn from(s: String) -> Self {
        BridgeError::Host(s)
    }
}

impl From<&str> for BridgeError {
    fn from(s: &str) -> Self {
        BridgeError::Host(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_not_found_message() {
        let err = BridgeError::MemberNotFound {
            kind: MemberKind::Method,
            member: "Frobnicate".to_string(),
            type_name: "Calculator".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Method Frobnicate not found on Object of Type Calculator"
        );
    }

    #[test]
    fn test_from_str() {
        let err: BridgeError = "disk full".into();
        assert_eq!(err, BridgeError::Host("disk full".to_string()));
    }
}
