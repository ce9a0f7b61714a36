/*!

# Networking Interfaces and Methods

## Introduction

SQLChain nodes talk to each other, and lite wallets talk to nodes, over plain
TCP sockets. One socket carries exactly one request. The requester either
closes it right after writing (fire-and-forget) or waits until the peer has
written its answer and closed the connection (wait-response).

There is no connection reuse, no request id and no multiplexing. If a caller
wants several requests in flight it spawns several tasks.

## Command envelope

Every request is framed the same way:

```bytes
0-11    CommandName(ascii, zero padded on the right)
12-15   PayloadLength(little-endian u32)
16-19   ExtraLength(little-endian u32)
20..    Payload(PayloadLength bytes)
..      Extra(ExtraLength bytes, only present when ExtraLength > 0)
```

The `CommandEnvelope` type carries this data.

CommandName is the method the sender wishes to invoke, e.g. `getblock`. We
reserve 12 bytes so every name in the catalog fits, the longest ones
(`txcurrequest`, `txsqlrequest`) use all of them.

Payload is the bincode encoding of the request struct for that command, see
`message_types`. Extra never carries domain data, it only carries the
authorization token for node management commands.

There is no checksum and no version field. Both ends must be built from the
same catalog.

## Response

A wait-response request gets back everything the peer writes before closing
the socket:

```bytes
0       Status(1 = success)
1..     Body
```

On success Body is the bincode encoding of the response type of the command.
On failure Body is a UTF-8 error message, it is surfaced to the caller as
`NetworkError::RemoteError`. A response of zero bytes is always an error.

## Commands

```bytes
addr        getfblocks  getcnsdata  getblock    block
getblocks   getblocksup inv         getdata     tx
version     gettransact checkblock  getbalance  getunspent
gethistory  txdata      txcurrequest            txsqlrequest
getstate    getupdates  getnodes    addnode     removenode
void
```

`addnode`, `removenode` and `getstate` carry the authorization token.
`void` has no payload, a node sends it to itself to unblock its own listener
when shutting down.

*/

pub mod api_message;
pub mod client;
pub mod error;
pub mod message_types;
pub mod peer;
