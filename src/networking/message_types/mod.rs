//! The command catalog.
//!
//! Every command has exactly one request payload type (or none) and one
//! response type (or none, for fire-and-forget commands). `CommandPayload`
//! is the tagged union of the request payloads, it picks the decoder by
//! command name so a receiving node never has to guess a payload shape.
//!
//! | command        | request                  | response                 |
//! |----------------|--------------------------|--------------------------|
//! | `addr`         | `Addresses`              | -                        |
//! | `getfblocks`   | -                        | `FirstBlocksData`        |
//! | `getcnsdata`   | -                        | `ConsensusData`          |
//! | `getblock`     | `GetBlock`               | `GetBlockResponse`       |
//! | `block`        | `BlockMessage`           | -                        |
//! | `getblocks`    | `GetBlocks`              | -                        |
//! | `getblocksup`  | `GetBlocks`              | -                        |
//! | `inv`          | `Inventory`              | -                        |
//! | `getdata`      | `GetData`                | -                        |
//! | `tx`           | `TxMessage`              | -                        |
//! | `version`      | `Version`                | -                        |
//! | `gettransact`  | `GetTransaction`         | `GetTransactionResponse` |
//! | `checkblock`   | `CheckBlock`             | `CheckBlockResponse`     |
//! | `getbalance`   | `GetWalletBalance`       | `WalletBalance`          |
//! | `getunspent`   | `GetUnspentTransactions` | `UnspentTransactions`    |
//! | `gethistory`   | `GetHistoryTransactions` | `Vec<HistoryTransaction>`|
//! | `txdata`       | `NewTransactionData`     | `Vec<u8>` (tx id)        |
//! | `txcurrequest` | `RequestTransaction`     | `RequestTransactionData` |
//! | `txsqlrequest` | `RequestSqlTransaction`  | `RequestTransactionData` |
//! | `getstate`     | -                        | `NodeState`              |
//! | `getupdates`   | `GetUpdates`             | `GetUpdatesResponse`     |
//! | `getnodes`     | -                        | `Vec<NodeAddr>`          |
//! | `addnode`      | `ManageNode`             | status only              |
//! | `removenode`   | `ManageNode`             | status only              |
//! | `void`         | -                        | -                        |

pub mod block_messages;
pub mod node_messages;
pub mod transaction_messages;
pub mod wallet_messages;

use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

use crate::networking::error::{NetworkError, Result};

use block_messages::{BlockMessage, CheckBlock, GetBlock, GetBlocks};
use node_messages::{Addresses, GetData, GetUpdates, Inventory, ManageNode, Version};
use transaction_messages::{
    GetTransaction, NewTransactionData, RequestSqlTransaction, RequestTransaction, TxMessage,
};
use wallet_messages::{GetHistoryTransactions, GetUnspentTransactions, GetWalletBalance};

#[derive(Debug, Copy, PartialEq, Eq, Hash, Clone)]
pub enum Command {
    Addresses,
    GetFirstBlocks,
    GetConsensusData,
    GetBlock,
    Block,
    GetBlocks,
    GetBlocksUpper,
    Inventory,
    GetData,
    Transaction,
    Version,
    GetTransaction,
    CheckBlock,
    GetBalance,
    GetUnspent,
    GetHistory,
    TransactionData,
    RequestCurrencyTransaction,
    RequestSqlTransaction,
    GetState,
    GetUpdates,
    GetNodes,
    AddNode,
    RemoveNode,
    Void,
}

pub const ALL_COMMANDS: [Command; 25] = [
    Command::Addresses,
    Command::GetFirstBlocks,
    Command::GetConsensusData,
    Command::GetBlock,
    Command::Block,
    Command::GetBlocks,
    Command::GetBlocksUpper,
    Command::Inventory,
    Command::GetData,
    Command::Transaction,
    Command::Version,
    Command::GetTransaction,
    Command::CheckBlock,
    Command::GetBalance,
    Command::GetUnspent,
    Command::GetHistory,
    Command::TransactionData,
    Command::RequestCurrencyTransaction,
    Command::RequestSqlTransaction,
    Command::GetState,
    Command::GetUpdates,
    Command::GetNodes,
    Command::AddNode,
    Command::RemoveNode,
    Command::Void,
];

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Addresses => "addr",
            Command::GetFirstBlocks => "getfblocks",
            Command::GetConsensusData => "getcnsdata",
            Command::GetBlock => "getblock",
            Command::Block => "block",
            Command::GetBlocks => "getblocks",
            Command::GetBlocksUpper => "getblocksup",
            Command::Inventory => "inv",
            Command::GetData => "getdata",
            Command::Transaction => "tx",
            Command::Version => "version",
            Command::GetTransaction => "gettransact",
            Command::CheckBlock => "checkblock",
            Command::GetBalance => "getbalance",
            Command::GetUnspent => "getunspent",
            Command::GetHistory => "gethistory",
            Command::TransactionData => "txdata",
            Command::RequestCurrencyTransaction => "txcurrequest",
            Command::RequestSqlTransaction => "txsqlrequest",
            Command::GetState => "getstate",
            Command::GetUpdates => "getupdates",
            Command::GetNodes => "getnodes",
            Command::AddNode => "addnode",
            Command::RemoveNode => "removenode",
            Command::Void => "void",
        }
    }

    /// Commands whose envelope carries the authorization token.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Command::AddNode | Command::RemoveNode | Command::GetState)
    }

    /// false for fire-and-forget commands
    pub fn waits_response(&self) -> bool {
        !matches!(
            self,
            Command::Addresses
                | Command::Block
                | Command::GetBlocks
                | Command::GetBlocksUpper
                | Command::Inventory
                | Command::GetData
                | Command::Transaction
                | Command::Version
                | Command::Void
        )
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = NetworkError;

    fn from_str(name: &str) -> Result<Self> {
        ALL_COMMANDS
            .iter()
            .find(|command| command.as_str() == name)
            .copied()
            .ok_or_else(|| NetworkError::UnknownCommand(String::from(name)))
    }
}

/// Request payload of every command in the catalog.
#[derive(Debug, PartialEq, Clone)]
pub enum CommandPayload {
    Addresses(Addresses),
    GetFirstBlocks,
    GetConsensusData,
    GetBlock(GetBlock),
    Block(BlockMessage),
    GetBlocks(GetBlocks),
    GetBlocksUpper(GetBlocks),
    Inventory(Inventory),
    GetData(GetData),
    Transaction(TxMessage),
    Version(Version),
    GetTransaction(GetTransaction),
    CheckBlock(CheckBlock),
    GetBalance(GetWalletBalance),
    GetUnspent(GetUnspentTransactions),
    GetHistory(GetHistoryTransactions),
    TransactionData(NewTransactionData),
    RequestCurrencyTransaction(RequestTransaction),
    RequestSqlTransaction(RequestSqlTransaction),
    GetState,
    GetUpdates(GetUpdates),
    GetNodes,
    AddNode(ManageNode),
    RemoveNode(ManageNode),
    Void,
}

impl CommandPayload {
    pub fn command(&self) -> Command {
        match self {
            CommandPayload::Addresses(_) => Command::Addresses,
            CommandPayload::GetFirstBlocks => Command::GetFirstBlocks,
            CommandPayload::GetConsensusData => Command::GetConsensusData,
            CommandPayload::GetBlock(_) => Command::GetBlock,
            CommandPayload::Block(_) => Command::Block,
            CommandPayload::GetBlocks(_) => Command::GetBlocks,
            CommandPayload::GetBlocksUpper(_) => Command::GetBlocksUpper,
            CommandPayload::Inventory(_) => Command::Inventory,
            CommandPayload::GetData(_) => Command::GetData,
            CommandPayload::Transaction(_) => Command::Transaction,
            CommandPayload::Version(_) => Command::Version,
            CommandPayload::GetTransaction(_) => Command::GetTransaction,
            CommandPayload::CheckBlock(_) => Command::CheckBlock,
            CommandPayload::GetBalance(_) => Command::GetBalance,
            CommandPayload::GetUnspent(_) => Command::GetUnspent,
            CommandPayload::GetHistory(_) => Command::GetHistory,
            CommandPayload::TransactionData(_) => Command::TransactionData,
            CommandPayload::RequestCurrencyTransaction(_) => Command::RequestCurrencyTransaction,
            CommandPayload::RequestSqlTransaction(_) => Command::RequestSqlTransaction,
            CommandPayload::GetState => Command::GetState,
            CommandPayload::GetUpdates(_) => Command::GetUpdates,
            CommandPayload::GetNodes => Command::GetNodes,
            CommandPayload::AddNode(_) => Command::AddNode,
            CommandPayload::RemoveNode(_) => Command::RemoveNode,
            CommandPayload::Void => Command::Void,
        }
    }

    /// Payload bytes as they go into the envelope. Empty for commands
    /// without a request payload.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            CommandPayload::Addresses(data) => bincode::serialize(data)?,
            CommandPayload::GetBlock(data) => bincode::serialize(data)?,
            CommandPayload::Block(data) => bincode::serialize(data)?,
            CommandPayload::GetBlocks(data) | CommandPayload::GetBlocksUpper(data) => {
                bincode::serialize(data)?
            }
            CommandPayload::Inventory(data) => bincode::serialize(data)?,
            CommandPayload::GetData(data) => bincode::serialize(data)?,
            CommandPayload::Transaction(data) => bincode::serialize(data)?,
            CommandPayload::Version(data) => bincode::serialize(data)?,
            CommandPayload::GetTransaction(data) => bincode::serialize(data)?,
            CommandPayload::CheckBlock(data) => bincode::serialize(data)?,
            CommandPayload::GetBalance(data) => bincode::serialize(data)?,
            CommandPayload::GetUnspent(data) => bincode::serialize(data)?,
            CommandPayload::GetHistory(data) => bincode::serialize(data)?,
            CommandPayload::TransactionData(data) => bincode::serialize(data)?,
            CommandPayload::RequestCurrencyTransaction(data) => bincode::serialize(data)?,
            CommandPayload::RequestSqlTransaction(data) => bincode::serialize(data)?,
            CommandPayload::GetUpdates(data) => bincode::serialize(data)?,
            CommandPayload::AddNode(data) | CommandPayload::RemoveNode(data) => {
                bincode::serialize(data)?
            }
            CommandPayload::GetFirstBlocks
            | CommandPayload::GetConsensusData
            | CommandPayload::GetState
            | CommandPayload::GetNodes
            | CommandPayload::Void => vec![],
        };
        Ok(bytes)
    }

    /// Decodes the payload of a received envelope against the shape its
    /// command declares.
    pub fn decode(command: Command, bytes: &[u8]) -> Result<CommandPayload> {
        let payload = match command {
            Command::Addresses => CommandPayload::Addresses(decode_payload(command, bytes)?),
            Command::GetFirstBlocks => CommandPayload::GetFirstBlocks,
            Command::GetConsensusData => CommandPayload::GetConsensusData,
            Command::GetBlock => CommandPayload::GetBlock(decode_payload(command, bytes)?),
            Command::Block => CommandPayload::Block(decode_payload(command, bytes)?),
            Command::GetBlocks => CommandPayload::GetBlocks(decode_payload(command, bytes)?),
            Command::GetBlocksUpper => {
                CommandPayload::GetBlocksUpper(decode_payload(command, bytes)?)
            }
            Command::Inventory => CommandPayload::Inventory(decode_payload(command, bytes)?),
            Command::GetData => CommandPayload::GetData(decode_payload(command, bytes)?),
            Command::Transaction => CommandPayload::Transaction(decode_payload(command, bytes)?),
            Command::Version => CommandPayload::Version(decode_payload(command, bytes)?),
            Command::GetTransaction => {
                CommandPayload::GetTransaction(decode_payload(command, bytes)?)
            }
            Command::CheckBlock => CommandPayload::CheckBlock(decode_payload(command, bytes)?),
            Command::GetBalance => CommandPayload::GetBalance(decode_payload(command, bytes)?),
            Command::GetUnspent => CommandPayload::GetUnspent(decode_payload(command, bytes)?),
            Command::GetHistory => CommandPayload::GetHistory(decode_payload(command, bytes)?),
            Command::TransactionData => {
                CommandPayload::TransactionData(decode_payload(command, bytes)?)
            }
            Command::RequestCurrencyTransaction => {
                CommandPayload::RequestCurrencyTransaction(decode_payload(command, bytes)?)
            }
            Command::RequestSqlTransaction => {
                CommandPayload::RequestSqlTransaction(decode_payload(command, bytes)?)
            }
            Command::GetState => CommandPayload::GetState,
            Command::GetUpdates => CommandPayload::GetUpdates(decode_payload(command, bytes)?),
            Command::GetNodes => CommandPayload::GetNodes,
            Command::AddNode => CommandPayload::AddNode(decode_payload(command, bytes)?),
            Command::RemoveNode => CommandPayload::RemoveNode(decode_payload(command, bytes)?),
            Command::Void => CommandPayload::Void,
        };
        Ok(payload)
    }
}

fn decode_payload<T: DeserializeOwned>(command: Command, bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|err| {
        NetworkError::MalformedEnvelope(format!("{} payload: {}", command, err))
    })
}
