//! Process-wide node id allocation

use std::sync::atomic::{AtomicU64, Ordering};

use hostbridge_sdk::NodeId;

/// Shared by every repository in the process, so an id never names two nodes
/// even across repositories.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Allocate the next node id
pub(crate) fn next_node_id() -> NodeId {
    NodeId::from_u64(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
}
