use serde::{Deserialize, Serialize};

use crate::networking::peer::NodeAddr;

// NODE_VERSION, written by build.rs
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

/// Data Object for `addr`, the addresses a node knows about.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Addresses {
    pub addr_from: NodeAddr,
    pub addresses: Vec<NodeAddr>,
}

/// Data Object for `version`, sent when a node introduces itself.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Version {
    pub version: i64,
    pub best_height: i64,
    pub addr_from: NodeAddr,
}

/// What an inventory or data request refers to.
#[derive(Serialize, Deserialize, Debug, Copy, PartialEq, Eq, Clone)]
pub enum InventoryKind {
    Block,
    Transaction,
}

/// Data Object for `inv`. Block hashes or transaction ids.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct Inventory {
    pub addr_from: NodeAddr,
    pub kind: InventoryKind,
    pub items: Vec<Vec<u8>>,
}

/// Data Object for `getdata`, full body of a block or transaction by id.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetData {
    pub addr_from: NodeAddr,
    pub kind: InventoryKind,
    #[serde(with = "serde_bytes")]
    pub id: Vec<u8>,
}

/// Data Object for `addnode` and `removenode`
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ManageNode {
    pub node: NodeAddr,
}

/// Response to `getstate`
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct NodeState {
    pub host: String,
    pub blocks_number: i64,
    pub expecting_blocks_height: i64,
    pub transactions_cached: i64,
    pub unspent_outputs: i64,
}

/// Data Object for `getupdates`
/// - `last_check_time` - unix time of the previous call, the peer reports
///   what changed since
/// - `top_blocks` - hashes of our last blocks, lets the peer find the fork
///   point
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetUpdates {
    pub last_check_time: i64,
    pub current_block_height: i64,
    pub top_blocks: Vec<Vec<u8>>,
    pub addr_from: NodeAddr,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct GetUpdatesResponse {
    pub current_block_height: i64,
    pub count_transactions_in_pool: i64,
    pub blocks: Vec<Vec<u8>>,
    pub transactions_in_pool: Vec<Vec<u8>>,
    pub nodes: Vec<NodeAddr>,
}
