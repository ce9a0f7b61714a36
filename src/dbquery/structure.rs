use std::fmt;

/// Kind of a SQL statement as reported by the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Select,
    Create,
    Drop,
    Delete,
    Insert,
    Update,
    /// Anything else the parser accepts (SHOW, SET, ...).
    Other,
}

impl QueryKind {
    /// true for the statements that change data or schema.
    pub fn is_update(&self) -> bool {
        matches!(
            self,
            QueryKind::Create
                | QueryKind::Drop
                | QueryKind::Delete
                | QueryKind::Insert
                | QueryKind::Update
        )
    }
}

/// Parsed statement as produced by the SQL parser.
///
/// `comments` lists the statement's comments in source order, with the
/// comment markers already stripped.
pub trait QueryStructure: fmt::Debug + Send + Sync {
    fn kind(&self) -> QueryKind;
    fn table(&self) -> &str;
    fn comments(&self) -> &[String];
}
