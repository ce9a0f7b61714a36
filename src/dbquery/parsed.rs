use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::collections::HashMap;
use tracing::trace;

use crate::dbquery::quote::quote;
use crate::dbquery::structure::{QueryKind, QueryStructure};
use crate::dbquery::QueryError;

lazy_static! {
    static ref SIGNATURE_MARKER: Regex = Regex::new("SIGN:([^;]+);").unwrap();
    static ref DATA_MARKER: Regex = Regex::new("DATA:([^;]+);").unwrap();
    static ref PUBKEY_MARKER: Regex = Regex::new("PUBKEY:([^;]+);").unwrap();
}

/// What a node does with a statement: read it, or apply it as a transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatementClass {
    Select,
    Update,
}

/// Values embedded in the first comment of a statement. A marker that is
/// not present leaves its field empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentEnvelope {
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub transaction_bytes: Vec<u8>,
}

/// A SQL statement received by a node, with the parser's view of it.
///
/// `key_column`/`key_value` identify the row the statement touches and
/// `row_before_query` is the state of that row before the statement ran.
/// Both are filled by the node, not by this type.
#[derive(Debug)]
pub struct QueryParsed {
    pub sql: String,
    pub pub_key: Vec<u8>,
    pub signature: Vec<u8>,
    pub transaction_bytes: Vec<u8>,
    pub key_column: String,
    pub key_value: String,
    pub row_before_query: HashMap<String, String>,
    pub structure: Box<dyn QueryStructure>,
}

impl QueryParsed {
    pub fn new(sql: &str, structure: Box<dyn QueryStructure>) -> Self {
        QueryParsed {
            sql: String::from(sql),
            pub_key: vec![],
            signature: vec![],
            transaction_bytes: vec![],
            key_column: String::new(),
            key_value: String::new(),
            row_before_query: HashMap::new(),
            structure,
        }
    }

    /// Identity of the row the statement affects, `table:key_value`.
    pub fn reference_id(&self) -> String {
        format!("{}:{}", self.structure.table(), self.key_value)
    }

    pub fn key_value(&self) -> &str {
        &self.key_value
    }

    /// Create, Drop, Delete, Insert and Update are applied as transactions,
    /// everything else is treated as a read.
    pub fn classify(&self) -> StatementClass {
        if self.structure.kind().is_update() {
            StatementClass::Update
        } else {
            StatementClass::Select
        }
    }

    pub fn is_select(&self) -> bool {
        self.structure.kind() == QueryKind::Select
    }

    pub fn is_update(&self) -> bool {
        self.classify() == StatementClass::Update
    }

    /// Statement that undoes this one.
    ///
    /// Only Create and Insert have one. Drop, Update and Delete return None,
    /// their rollback needs the state captured in `row_before_query` and is
    /// done by the node.
    pub fn build_rollback_sql(&self) -> Option<String> {
        let table = self.structure.table();
        match self.structure.kind() {
            QueryKind::Create => Some(format!("DROP TABLE {}", table)),
            QueryKind::Insert => Some(format!(
                "DELETE FROM {} WHERE {}='{}'",
                table,
                self.key_column,
                quote(&self.key_value)
            )),
            _ => None,
        }
    }

    /// Reads the envelope from the first comment of the statement.
    pub fn parse_info_from_comments(&self) -> Result<CommentEnvelope, QueryError> {
        let comment = match self.structure.comments().first() {
            Some(comment) => comment,
            None => return Ok(CommentEnvelope::default()),
        };

        Ok(CommentEnvelope {
            signature: decode_marker(&SIGNATURE_MARKER, comment, "signature")?,
            transaction_bytes: decode_marker(&DATA_MARKER, comment, "transaction data")?,
            pub_key: decode_marker(&PUBKEY_MARKER, comment, "public key")?,
        })
    }

    /// Extracts the comment envelope and stores it on the statement. On
    /// error nothing is changed.
    pub fn apply_comment_envelope(&mut self) -> Result<(), QueryError> {
        let envelope = self.parse_info_from_comments()?;
        trace!(
            "Envelope of {}: {} bytes of signature, {} bytes of transaction",
            self.reference_id(),
            envelope.signature.len(),
            envelope.transaction_bytes.len()
        );
        self.pub_key = envelope.pub_key;
        self.signature = envelope.signature;
        self.transaction_bytes = envelope.transaction_bytes;
        Ok(())
    }
}

fn decode_marker(
    marker: &Regex,
    comment: &str,
    field: &'static str,
) -> Result<Vec<u8>, QueryError> {
    match marker.captures(comment).and_then(|captures| captures.get(1)) {
        Some(value) => general_purpose::STANDARD
            .decode(value.as_str())
            .map_err(|source| QueryError::EnvelopeDecode { field, source }),
        None => Ok(vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utilities::mocks::MockQueryStructure;

    fn parsed(kind: QueryKind, table: &str) -> QueryParsed {
        QueryParsed::new("", Box::new(MockQueryStructure::new(kind, table)))
    }

    fn parsed_with_comment(comment: &str) -> QueryParsed {
        let structure = MockQueryStructure::new(QueryKind::Insert, "users").with_comment(comment);
        QueryParsed::new("INSERT INTO users SET id=1", Box::new(structure))
    }

    #[test]
    fn test_classify() {
        for kind in [
            QueryKind::Create,
            QueryKind::Drop,
            QueryKind::Insert,
            QueryKind::Update,
            QueryKind::Delete,
        ] {
            let query = parsed(kind, "t");
            assert_eq!(query.classify(), StatementClass::Update);
            assert!(query.is_update());
            assert!(!query.is_select());
        }

        let query = parsed(QueryKind::Select, "t");
        assert_eq!(query.classify(), StatementClass::Select);
        assert!(query.is_select());
        assert!(!query.is_update());

        let query = parsed(QueryKind::Other, "t");
        assert_eq!(query.classify(), StatementClass::Select);
        assert!(!query.is_select());
    }

    #[test]
    fn test_reference_id() {
        let mut query = parsed(QueryKind::Update, "accounts");
        query.key_value = String::from("42");
        assert_eq!(query.reference_id(), "accounts:42");
        assert_eq!(query.key_value(), "42");
    }

    #[test]
    fn test_rollback_of_insert_quotes_key() {
        let mut query = parsed(QueryKind::Insert, "users");
        query.key_column = String::from("id");
        query.key_value = String::from("a'b");
        assert_eq!(
            query.build_rollback_sql(),
            Some(String::from("DELETE FROM users WHERE id='a\\'b'"))
        );
    }

    #[test]
    fn test_rollback_of_create_and_drop() {
        assert_eq!(
            parsed(QueryKind::Create, "t").build_rollback_sql(),
            Some(String::from("DROP TABLE t"))
        );
        assert_eq!(parsed(QueryKind::Drop, "t").build_rollback_sql(), None);
        assert_eq!(parsed(QueryKind::Update, "t").build_rollback_sql(), None);
        assert_eq!(parsed(QueryKind::Delete, "t").build_rollback_sql(), None);
        assert_eq!(parsed(QueryKind::Select, "t").build_rollback_sql(), None);
    }

    #[test]
    fn test_parse_info_from_comments() {
        let query = parsed_with_comment("SIGN:c2lnbmF0dXJl;DATA:ZGF0YQ==;PUBKEY:cHVia2V5;");
        let envelope = query.parse_info_from_comments().unwrap();
        assert_eq!(envelope.signature, b"signature".to_vec());
        assert_eq!(envelope.transaction_bytes, b"data".to_vec());
        assert_eq!(envelope.pub_key, b"pubkey".to_vec());
    }

    #[test]
    fn test_missing_markers_are_empty() {
        let query = parsed_with_comment("PUBKEY:cHVia2V5;");
        let envelope = query.parse_info_from_comments().unwrap();
        assert_eq!(envelope.pub_key, b"pubkey".to_vec());
        assert!(envelope.signature.is_empty());
        assert!(envelope.transaction_bytes.is_empty());

        let query = parsed(QueryKind::Insert, "users");
        assert_eq!(
            query.parse_info_from_comments().unwrap(),
            CommentEnvelope::default()
        );
    }

    #[test]
    fn test_only_first_comment_is_read() {
        let structure = MockQueryStructure::new(QueryKind::Insert, "users")
            .with_comment("just a note")
            .with_comment("SIGN:c2lnbmF0dXJl;");
        let query = QueryParsed::new("", Box::new(structure));
        assert_eq!(
            query.parse_info_from_comments().unwrap(),
            CommentEnvelope::default()
        );
    }

    #[test]
    fn test_invalid_base64_fails_whole_envelope() {
        let query = parsed_with_comment("SIGN:c2lnbmF0dXJl;DATA:!!!;PUBKEY:cHVia2V5;");
        match query.parse_info_from_comments() {
            Err(QueryError::EnvelopeDecode { field, .. }) => assert_eq!(field, "transaction data"),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_comment_envelope() {
        let mut query = parsed_with_comment("SIGN:c2lnbmF0dXJl;DATA:ZGF0YQ==;PUBKEY:cHVia2V5;");
        query.apply_comment_envelope().unwrap();
        assert_eq!(query.signature, b"signature".to_vec());
        assert_eq!(query.transaction_bytes, b"data".to_vec());
        assert_eq!(query.pub_key, b"pubkey".to_vec());

        let mut query = parsed_with_comment("SIGN:%%%;");
        assert!(query.apply_comment_envelope().is_err());
        assert!(query.signature.is_empty());
    }
}
