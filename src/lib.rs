/*!
# SQLChain node communication layer

SQLChain is a blockchain whose transactions are SQL statements. Every peer,
full node or lite wallet, talks to other nodes through the same small binary
protocol, and every node has to decide how to apply, and later possibly
unwind, the SQL it receives.

This crate holds those two pieces:

* [`networking`] - the node-to-node wire protocol: command envelope framing,
  the command catalog, address validation and the `NodeClient` dispatcher.
* [`dbquery`] - the SQL transaction envelope: statement classification, the
  signature/public key/transaction bytes embedded in a trailing comment, and
  rollback statement synthesis.

The database engine, the consensus engine and the SQL parser live elsewhere.
The parser is plugged in through [`dbquery::QueryStructure`].

# Usage

```bash
sqlchaincli --config node state
sqlchaincli addnode --host 10.0.0.7 --port 8766
```

*/
#[macro_use]
extern crate lazy_static;

pub mod dbquery;
pub mod networking;
pub mod settings;

#[cfg(test)]
pub mod test_setup;
#[cfg(test)]
pub mod test_utilities;

/// Error returned by binaries and other top level entry points.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;
