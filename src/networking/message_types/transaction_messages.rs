use serde::{Deserialize, Serialize};

use crate::networking::peer::NodeAddr;

/// Data Object for `tx`, a serialized transaction pushed to the peer.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct TxMessage {
    pub addr_from: NodeAddr,
    #[serde(with = "serde_bytes")]
    pub transaction: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetTransaction {
    #[serde(with = "serde_bytes")]
    pub transaction_id: Vec<u8>,
    pub addr_from: NodeAddr,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct GetTransactionResponse {
    #[serde(with = "serde_bytes")]
    pub transaction: Vec<u8>,
}

/// Data Object for `txdata`. The transaction prepared by the node with
/// `txcurrequest`/`txsqlrequest` plus the wallet's signature of it.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct NewTransactionData {
    pub address: String,
    #[serde(with = "serde_bytes")]
    pub tx: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub signature: Vec<u8>,
}

/// Data Object for `txcurrequest`. The wallet sends its public key, the
/// receiver and the amount, the node answers with an unsigned transaction.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RequestTransaction {
    #[serde(with = "serde_bytes")]
    pub pub_key: Vec<u8>,
    pub to: String,
    pub amount: f64,
}

/// Data Object for `txsqlrequest`
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct RequestSqlTransaction {
    #[serde(with = "serde_bytes")]
    pub pub_key: Vec<u8>,
    pub sql: String,
}

/// Response to `txcurrequest` and `txsqlrequest`.
/// - `finished` - nothing is left for the wallet to do (e.g. a select that
///   needs no transaction). Only set for SQL requests.
/// - `tx` - the transaction without signature
/// - `data_to_sign` - what the wallet must sign and return with `txdata`
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct RequestTransactionData {
    pub finished: bool,
    #[serde(with = "serde_bytes")]
    pub tx: Vec<u8>,
    #[serde(with = "serde_bytes")]
    pub data_to_sign: Vec<u8>,
}
