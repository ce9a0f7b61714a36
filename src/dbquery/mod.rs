//! SQL transaction envelope.
//!
//! A SQL transaction travels as the statement itself with a trailing comment
//! carrying the signer's public key, the signature and the original
//! transaction bytes, each base64 encoded:
//!
//! ```sql
//! INSERT INTO users SET id=1, name='bob' /*SIGN:c2ln...;DATA:ZGF0...;PUBKEY:cHVi...;*/
//! ```
//!
//! Parsing SQL is not done here. A parser hands over a [`QueryStructure`],
//! and [`QueryParsed`] derives from it everything the node needs to apply a
//! statement or to undo it during chain reorganisation.
pub mod parsed;
pub mod quote;
pub mod structure;

pub use parsed::{CommentEnvelope, QueryParsed, StatementClass};
pub use quote::quote;
pub use structure::{QueryKind, QueryStructure};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("malformed {field} in the comment envelope: {source}")]
    EnvelopeDecode {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
}
