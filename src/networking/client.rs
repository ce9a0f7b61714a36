use serde::de::DeserializeOwned;
use std::convert::TryFrom;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, event, trace, Level};

use crate::networking::api_message::{CommandEnvelope, ResponseEnvelope};
use crate::networking::error::{NetworkError, Result};
use crate::networking::message_types::block_messages::{
    BlockMessage, CheckBlock, CheckBlockResponse, ConsensusData, FirstBlocksData, GetBlock,
    GetBlockResponse, GetBlocks,
};
use crate::networking::message_types::node_messages::{
    Addresses, GetData, GetUpdates, GetUpdatesResponse, Inventory, InventoryKind, ManageNode,
    NodeState, Version, NODE_VERSION,
};
use crate::networking::message_types::transaction_messages::{
    GetTransaction, GetTransactionResponse, NewTransactionData, RequestSqlTransaction,
    RequestTransaction, RequestTransactionData, TxMessage,
};
use crate::networking::message_types::wallet_messages::{
    GetHistoryTransactions, GetUnspentTransactions, GetWalletBalance, HistoryTransaction,
    UnspentTransactions, WalletBalance,
};
use crate::networking::message_types::CommandPayload;
use crate::networking::peer::NodeAddr;
use crate::settings::ClientSettings;

/// Network client for communication with nodes.
///
/// Used by nodes to talk to other nodes and by lite wallets to talk to
/// nodes. Every call opens its own socket and closes it before returning,
/// the client keeps no per-call state and can be shared between tasks.
#[derive(Debug, Clone)]
pub struct NodeClient {
    node_address: NodeAddr,
    auth_token: Vec<u8>,
    connect_timeout: Duration,
    wait_connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl NodeClient {
    pub fn new(settings: &ClientSettings) -> Self {
        NodeClient {
            node_address: settings.node_address(),
            auth_token: settings
                .auth_token
                .as_ref()
                .map(|token| token.as_bytes().to_vec())
                .unwrap_or_default(),
            connect_timeout: settings.connect_timeout(),
            wait_connect_timeout: settings.wait_connect_timeout(),
            read_timeout: settings.read_timeout(),
            write_timeout: settings.write_timeout(),
        }
    }

    /// Address of our own node, included in requests to other nodes.
    pub fn node_address(&self) -> &NodeAddr {
        &self.node_address
    }

    //
    // framing
    //

    /// Frames a payload. Commands the catalog marks as requiring
    /// authorization get the token in the extra segment.
    pub fn build_command(&self, payload: &CommandPayload) -> Result<Vec<u8>> {
        if payload.command().requires_auth() {
            self.do_build_command(payload, &self.auth_token)
        } else {
            self.do_build_command(payload, &[])
        }
    }

    /// Same as `build_command`, with the authorization token in the extra
    /// segment whatever the command.
    pub fn build_command_with_auth(&self, payload: &CommandPayload) -> Result<Vec<u8>> {
        self.do_build_command(payload, &self.auth_token)
    }

    fn do_build_command(&self, payload: &CommandPayload, extra: &[u8]) -> Result<Vec<u8>> {
        let command = payload.command();
        let envelope = CommandEnvelope::new(command.as_str(), payload.encode()?, extra.to_vec())?;
        trace!(
            "Build command {} with {} bytes of payload",
            command,
            envelope.payload().len()
        );
        Ok(envelope.serialize())
    }

    //
    // transport
    //

    async fn connect(&self, addr: &NodeAddr, connect_timeout: Duration) -> Result<TcpStream> {
        let port = u16::try_from(addr.port)
            .map_err(|_| NetworkError::AddressInvalid(format!("port {}", addr.port)))?;
        match timeout(connect_timeout, TcpStream::connect((addr.host.as_str(), port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(err)) => {
                event!(Level::ERROR, "Error connecting to {}: {}", addr, err);
                Err(NetworkError::CannotConnect(addr.to_string()))
            }
            Err(_) => {
                event!(Level::ERROR, "Timed out connecting to {}", addr);
                Err(NetworkError::CannotConnect(addr.to_string()))
            }
        }
    }

    async fn write_request(
        &self,
        stream: &mut TcpStream,
        addr: &NodeAddr,
        data: &[u8],
    ) -> Result<()> {
        match timeout(self.write_timeout, stream.write_all(data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => {
                event!(Level::ERROR, "Error sending to {}: {}", addr, err);
                Err(NetworkError::CannotSend(err.to_string()))
            }
            Err(_) => {
                event!(
                    Level::ERROR,
                    "{} did not take {} bytes in {:?}",
                    addr,
                    data.len(),
                    self.write_timeout
                );
                Err(NetworkError::CannotSend(format!("write to {} timed out", addr)))
            }
        }
    }

    /// Sends a prepared command to a node. Doesn't wait for any response.
    pub async fn send_data(&self, addr: &NodeAddr, data: &[u8]) -> Result<()> {
        addr.validate()?;
        trace!("Sending {} bytes to {}", data.len(), addr);

        let mut stream = self.connect(addr, self.connect_timeout).await?;
        self.write_request(&mut stream, addr, data).await
    }

    /// Sends a prepared command and reads until the peer closes the
    /// connection. Returns the response body of a success status.
    async fn exchange(&self, addr: &NodeAddr, data: &[u8]) -> Result<Vec<u8>> {
        if let Err(err) = addr.validate() {
            debug!("Wrong address {}: {}", addr, err);
            return Err(err);
        }
        trace!("Sending data to {} and waiting response", addr);

        let mut stream = self.connect(addr, self.wait_connect_timeout).await?;
        self.write_request(&mut stream, addr, data).await?;

        let mut response = vec![];
        match timeout(self.read_timeout, stream.read_to_end(&mut response)).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => {
                event!(Level::ERROR, "Response read error from {}: {}", addr, err);
                return Err(NetworkError::CannotSend(err.to_string()));
            }
            Err(_) => {
                event!(Level::ERROR, "No response from {} in {:?}", addr, self.read_timeout);
                return Err(NetworkError::ResponseTimeout(addr.to_string()));
            }
        }

        if response.is_empty() {
            event!(Level::ERROR, "Received 0 bytes as a response from {}", addr);
            return Err(NetworkError::NoResponse);
        }
        trace!("Received {} bytes as a response", response.len());

        let response = ResponseEnvelope::parse(&response)?;
        if !response.is_success() {
            let message = String::from_utf8(response.body)
                .map_err(|err| NetworkError::CannotParseResponse(err.to_string()))?;
            return Err(NetworkError::RemoteError(message));
        }
        Ok(response.body)
    }

    /// Sends data to a node and decodes the response as `T`.
    pub async fn send_data_wait_response<T: DeserializeOwned>(
        &self,
        addr: &NodeAddr,
        data: &[u8],
    ) -> Result<T> {
        let body = self.exchange(addr, data).await?;
        bincode::deserialize(&body)
            .map_err(|err| NetworkError::CannotParseResponse(err.to_string()))
    }

    /// For commands whose response is the status alone.
    pub async fn send_data_wait_status(&self, addr: &NodeAddr, data: &[u8]) -> Result<()> {
        self.exchange(addr, data).await.map(|_| ())
    }

    // The typed operations below go through these three, so the framing and
    // the response handling always follow the catalog.

    async fn post(&self, addr: &NodeAddr, payload: &CommandPayload) -> Result<()> {
        let command = payload.command();
        debug_assert!(!command.waits_response(), "{} waits for a response", command);
        let request = self.build_command(payload)?;
        self.send_data(addr, &request).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        addr: &NodeAddr,
        payload: &CommandPayload,
    ) -> Result<T> {
        let command = payload.command();
        debug_assert!(command.waits_response(), "{} has no response", command);
        let request = self.build_command(payload)?;
        self.send_data_wait_response(addr, &request).await
    }

    async fn request_status(&self, addr: &NodeAddr, payload: &CommandPayload) -> Result<()> {
        let command = payload.command();
        debug_assert!(command.waits_response(), "{} has no response", command);
        let request = self.build_command(payload)?;
        self.send_data_wait_status(addr, &request).await
    }

    //
    // node to node commands
    //

    /// Sends a void command. A node sends it to itself when stopping, to
    /// unblock its own listener.
    pub async fn send_void(&self, addr: &NodeAddr) -> Result<()> {
        self.post(addr, &CommandPayload::Void).await
    }

    /// Sends a list of known node addresses to another node.
    pub async fn send_addr_list(&self, addr: &NodeAddr, addresses: Vec<NodeAddr>) -> Result<()> {
        let payload = CommandPayload::Addresses(Addresses {
            addr_from: self.node_address.clone(),
            addresses,
        });
        self.post(addr, &payload).await
    }

    /// Requests full info of a block from another node.
    pub async fn send_get_block(
        &self,
        addr: &NodeAddr,
        block_hash: &[u8],
    ) -> Result<GetBlockResponse> {
        let payload = CommandPayload::GetBlock(GetBlock {
            block_hash: block_hash.to_vec(),
            addr_from: self.node_address.clone(),
        });
        self.request(addr, &payload).await
    }

    pub async fn send_block(&self, addr: &NodeAddr, block: &[u8]) -> Result<()> {
        let payload = CommandPayload::Block(BlockMessage {
            addr_from: self.node_address.clone(),
            block: block.to_vec(),
        });
        self.post(addr, &payload).await
    }

    /// Sends inventory, block hashes or transaction ids.
    pub async fn send_inv(
        &self,
        addr: &NodeAddr,
        kind: InventoryKind,
        items: Vec<Vec<u8>>,
    ) -> Result<()> {
        let payload = CommandPayload::Inventory(Inventory {
            addr_from: self.node_address.clone(),
            kind,
            items,
        });
        self.post(addr, &payload).await
    }

    /// Requests the blocks below `start_from`.
    pub async fn send_get_blocks(&self, addr: &NodeAddr, start_from: &[u8]) -> Result<()> {
        let payload = CommandPayload::GetBlocks(GetBlocks {
            addr_from: self.node_address.clone(),
            start_from: start_from.to_vec(),
        });
        self.post(addr, &payload).await
    }

    /// Requests the blocks above `start_from`.
    pub async fn send_get_blocks_upper(&self, addr: &NodeAddr, start_from: &[u8]) -> Result<()> {
        let payload = CommandPayload::GetBlocksUpper(GetBlocks {
            addr_from: self.node_address.clone(),
            start_from: start_from.to_vec(),
        });
        self.post(addr, &payload).await
    }

    /// Requests the first blocks of the chain. Used by new nodes.
    pub async fn send_get_first_blocks(&self, addr: &NodeAddr) -> Result<FirstBlocksData> {
        self.request(addr, &CommandPayload::GetFirstBlocks).await
    }

    pub async fn send_get_consensus_data(&self, addr: &NodeAddr) -> Result<ConsensusData> {
        self.request(addr, &CommandPayload::GetConsensusData).await
    }

    /// Requests a transaction or a block by id or hash. The peer answers
    /// with a `tx` or `block` command of its own.
    pub async fn send_get_data(
        &self,
        addr: &NodeAddr,
        kind: InventoryKind,
        id: &[u8],
    ) -> Result<()> {
        let payload = CommandPayload::GetData(GetData {
            addr_from: self.node_address.clone(),
            kind,
            id: id.to_vec(),
        });
        self.post(addr, &payload).await
    }

    /// Gets a transaction and waits for it.
    pub async fn send_get_transaction(
        &self,
        addr: &NodeAddr,
        tx_id: &[u8],
    ) -> Result<GetTransactionResponse> {
        let payload = CommandPayload::GetTransaction(GetTransaction {
            transaction_id: tx_id.to_vec(),
            addr_from: self.node_address.clone(),
        });
        self.request(addr, &payload).await
    }

    /// Checks if a block exists on another node, to know if the block body
    /// has to be sent.
    pub async fn send_check_block(
        &self,
        addr: &NodeAddr,
        block_hash: &[u8],
    ) -> Result<CheckBlockResponse> {
        let payload = CommandPayload::CheckBlock(CheckBlock {
            block_hash: block_hash.to_vec(),
            addr_from: self.node_address.clone(),
        });
        self.request(addr, &payload).await
    }

    pub async fn send_tx(&self, addr: &NodeAddr, transaction: &[u8]) -> Result<()> {
        let payload = CommandPayload::Transaction(TxMessage {
            addr_from: self.node_address.clone(),
            transaction: transaction.to_vec(),
        });
        self.post(addr, &payload).await
    }

    /// Sends our protocol version and chain height to another node.
    pub async fn send_version(&self, addr: &NodeAddr, best_height: i64) -> Result<()> {
        let payload = CommandPayload::Version(Version {
            version: NODE_VERSION,
            best_height,
            addr_from: self.node_address.clone(),
        });
        self.post(addr, &payload).await
    }

    pub async fn send_get_updates(
        &self,
        addr: &NodeAddr,
        last_check_time: i64,
        current_block_height: i64,
        top_blocks: Vec<Vec<u8>>,
    ) -> Result<GetUpdatesResponse> {
        let payload = CommandPayload::GetUpdates(GetUpdates {
            last_check_time,
            current_block_height,
            top_blocks,
            addr_from: self.node_address.clone(),
        });
        self.request(addr, &payload).await
    }

    //
    // wallet commands
    //

    pub async fn send_get_history(
        &self,
        addr: &NodeAddr,
        address: &str,
    ) -> Result<Vec<HistoryTransaction>> {
        let payload = CommandPayload::GetHistory(GetHistoryTransactions {
            address: String::from(address),
        });
        self.request(addr, &payload).await
    }

    /// Sends a signed transaction from a wallet. Returns the id of the new
    /// transaction.
    pub async fn send_new_transaction_data(
        &self,
        addr: &NodeAddr,
        from: &str,
        tx: &[u8],
        signature: &[u8],
    ) -> Result<Vec<u8>> {
        let payload = CommandPayload::TransactionData(NewTransactionData {
            address: String::from(from),
            tx: tx.to_vec(),
            signature: signature.to_vec(),
        });
        self.request(addr, &payload).await
    }

    /// Asks the node to prepare a currency transfer. Returns the unsigned
    /// transaction and the data the wallet has to sign, the signed result
    /// goes back with `send_new_transaction_data`.
    pub async fn send_request_new_currency_transaction(
        &self,
        addr: &NodeAddr,
        pub_key: &[u8],
        to: &str,
        amount: f64,
    ) -> Result<(Vec<u8>, Vec<u8>)> {
        let payload = CommandPayload::RequestCurrencyTransaction(RequestTransaction {
            pub_key: pub_key.to_vec(),
            to: String::from(to),
            amount,
        });
        let response: RequestTransactionData = self.request(addr, &payload).await?;
        Ok((response.tx, response.data_to_sign))
    }

    /// Asks the node to prepare a SQL transaction. When `finished` is set in
    /// the response there is nothing to sign.
    pub async fn send_request_new_sql_transaction(
        &self,
        addr: &NodeAddr,
        pub_key: &[u8],
        sql: &str,
    ) -> Result<RequestTransactionData> {
        let payload = CommandPayload::RequestSqlTransaction(RequestSqlTransaction {
            pub_key: pub_key.to_vec(),
            sql: String::from(sql),
        });
        self.request(addr, &payload).await
    }

    /// Requests the unspent outputs of a wallet address. `chain_tip` is the
    /// last block the wallet knows.
    pub async fn send_get_unspent(
        &self,
        addr: &NodeAddr,
        address: &str,
        chain_tip: &[u8],
    ) -> Result<UnspentTransactions> {
        let payload = CommandPayload::GetUnspent(GetUnspentTransactions {
            address: String::from(address),
            last_block: chain_tip.to_vec(),
        });
        self.request(addr, &payload).await
    }

    pub async fn send_get_balance(&self, addr: &NodeAddr, address: &str) -> Result<WalletBalance> {
        let payload = CommandPayload::GetBalance(GetWalletBalance {
            address: String::from(address),
        });
        self.request(addr, &payload).await
    }

    //
    // management commands, always sent to our own node
    //

    pub async fn send_get_nodes(&self) -> Result<Vec<NodeAddr>> {
        self.request(&self.node_address, &CommandPayload::GetNodes).await
    }

    pub async fn send_add_node(&self, node: NodeAddr) -> Result<()> {
        let payload = CommandPayload::AddNode(ManageNode { node });
        self.request_status(&self.node_address, &payload).await
    }

    pub async fn send_remove_node(&self, node: NodeAddr) -> Result<()> {
        let payload = CommandPayload::RemoveNode(ManageNode { node });
        self.request_status(&self.node_address, &payload).await
    }

    pub async fn send_get_state(&self) -> Result<NodeState> {
        self.request(&self.node_address, &CommandPayload::GetState).await
    }
}
