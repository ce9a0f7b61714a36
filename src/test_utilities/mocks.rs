use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::dbquery::{QueryKind, QueryStructure};
use crate::networking::api_message::{read_envelope, CommandEnvelope};
use crate::networking::peer::NodeAddr;

/// A node listening on a local ephemeral port that serves one connection.
pub struct MockPeer {
    listener: TcpListener,
}

impl MockPeer {
    pub async fn bind() -> MockPeer {
        MockPeer {
            listener: TcpListener::bind("127.0.0.1:0").await.unwrap(),
        }
    }

    pub fn address(&self) -> NodeAddr {
        let local = self.listener.local_addr().unwrap();
        NodeAddr::new("127.0.0.1", local.port() as u32)
    }

    /// Accepts one connection and returns the envelope it carried.
    pub fn receive_once(self) -> JoinHandle<CommandEnvelope> {
        tokio::spawn(async move {
            let (mut socket, _) = self.listener.accept().await.unwrap();
            read_envelope(&mut socket).await.unwrap()
        })
    }

    /// Accepts one connection, writes `response` and closes.
    pub fn reply_once(self, response: Vec<u8>) -> JoinHandle<CommandEnvelope> {
        tokio::spawn(async move {
            let (mut socket, _) = self.listener.accept().await.unwrap();
            let envelope = read_envelope(&mut socket).await.unwrap();
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.unwrap();
            envelope
        })
    }

    /// Accepts one connection and never answers.
    pub fn hold_open(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let (mut socket, _) = self.listener.accept().await.unwrap();
            let _envelope = read_envelope(&mut socket).await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        })
    }

    /// Accepts one connection and never reads from it.
    pub fn never_read(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let (socket, _) = self.listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        })
    }
}

/// An address nothing listens on.
pub async fn unreachable_address() -> NodeAddr {
    let peer = MockPeer::bind().await;
    peer.address()
}

/// Stands in for the SQL parser.
#[derive(Debug, Clone)]
pub struct MockQueryStructure {
    pub kind: QueryKind,
    pub table: String,
    pub comments: Vec<String>,
}

impl MockQueryStructure {
    pub fn new(kind: QueryKind, table: &str) -> Self {
        MockQueryStructure {
            kind,
            table: String::from(table),
            comments: vec![],
        }
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comments.push(String::from(comment));
        self
    }
}

impl QueryStructure for MockQueryStructure {
    fn kind(&self) -> QueryKind {
        self.kind
    }

    fn table(&self) -> &str {
        &self.table
    }

    fn comments(&self) -> &[String] {
        &self.comments
    }
}
