use serde::{Deserialize, Serialize};

use crate::networking::peer::NodeAddr;

///
/// Data Object for `block`
/// `block` - serialized block body pushed to the peer
///
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct BlockMessage {
    pub addr_from: NodeAddr,
    #[serde(with = "serde_bytes")]
    pub block: Vec<u8>,
}

/// Data Object for `getblocks` and `getblocksup`. The peer walks its chain
/// from `start_from` down (`getblocks`) or up (`getblocksup`) and answers out
/// of band with `inv` and `block` commands of its own.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetBlocks {
    pub addr_from: NodeAddr,
    #[serde(with = "serde_bytes")]
    pub start_from: Vec<u8>,
}

/// Response to `getfblocks`, the first blocks of the chain for a node that
/// is starting from nothing.
/// - `blocks` - lowest block first, each one a serialized short block
/// - `height` - height of the peer's chain
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct FirstBlocksData {
    pub blocks: Vec<Vec<u8>>,
    pub height: i64,
}

/// Response to `getcnsdata`
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct ConsensusData {
    #[serde(with = "serde_bytes")]
    pub config_file: Vec<u8>,
    /// can be long
    #[serde(with = "serde_bytes")]
    pub module: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetBlock {
    #[serde(with = "serde_bytes")]
    pub block_hash: Vec<u8>,
    pub addr_from: NodeAddr,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct GetBlockResponse {
    #[serde(with = "serde_bytes")]
    pub block: Vec<u8>,
}

/// Asks whether the peer already has a block. Sent before pushing a block
/// body so we don't transfer it twice.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct CheckBlock {
    #[serde(with = "serde_bytes")]
    pub block_hash: Vec<u8>,
    pub addr_from: NodeAddr,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct CheckBlockResponse {
    /// true if the peer does not want the body of this block
    pub exists: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_blocks_keep_order() {
        let data = FirstBlocksData {
            blocks: vec![vec![0; 8], vec![1; 8], vec![2; 8]],
            height: 3,
        };
        let deserialized: FirstBlocksData =
            bincode::deserialize(&bincode::serialize(&data).unwrap()).unwrap();
        assert_eq!(deserialized.blocks[0], vec![0; 8]);
        assert_eq!(deserialized.blocks[2], vec![2; 8]);
        assert_eq!(deserialized.height, 3);
    }

    #[test]
    fn test_block_bytes_are_length_prefixed() {
        let message = BlockMessage {
            addr_from: NodeAddr::new("h", 2000),
            block: vec![42; 5],
        };
        let serialized = bincode::serialize(&message).unwrap();
        // host length + host + port + block length + block
        assert_eq!(serialized.len(), 8 + 1 + 4 + 8 + 5);
        assert_eq!(&serialized[serialized.len() - 5..], &[42; 5]);
    }
}
