use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetWalletBalance {
    pub address: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct WalletBalance {
    pub total: f64,
    pub approved: f64,
    pub pending: f64,
}

/// Data Object for `getunspent`. `last_block` is the chain tip the wallet
/// knows about, the node answers with the tip its list was built on.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetUnspentTransactions {
    pub address: String,
    #[serde(with = "serde_bytes")]
    pub last_block: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct UnspentTransaction {
    #[serde(with = "serde_bytes")]
    pub txid: Vec<u8>,
    pub vout: i64,
    pub amount: f64,
    pub is_base: bool,
    pub from: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
pub struct UnspentTransactions {
    pub transactions: Vec<UnspentTransaction>,
    #[serde(with = "serde_bytes")]
    pub last_block: Vec<u8>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct GetHistoryTransactions {
    pub address: String,
}

/// One entry of the `gethistory` response.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct HistoryTransaction {
    /// false for incoming, true for outgoing
    pub outgoing: bool,
    #[serde(with = "serde_bytes")]
    pub txid: Vec<u8>,
    pub amount: f64,
    pub from: String,
    pub to: String,
}
