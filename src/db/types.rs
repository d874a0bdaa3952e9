//! Result types exchanged with the SQL endpoint.
//!
//! Rows are positional lists of nullable raw byte cells; column names travel
//! separately so the same scanner serves every query shape.

use futures::stream::BoxStream;
use std::fmt;

use crate::error::Result;

/// A single value: `None` is SQL NULL, otherwise raw bytes of any encoding.
pub type Cell = Option<Vec<u8>>;

/// A row of cells, positionally matching the result columns.
pub type Row = Vec<Cell>;

/// Forward-only stream of rows.
pub type RowStream<'a> = BoxStream<'a, Result<Row>>;

/// Outcome of a statement that does not return rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Rows inserted, updated or deleted.
    pub rows_affected: u64,

    /// Auto-increment id of the last inserted row, if the backend reports one.
    pub last_insert_id: Option<u64>,
}

impl ExecOutcome {
    /// Creates an outcome with no insert id.
    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            last_insert_id: None,
        }
    }
}

impl fmt::Display for ExecOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Backends without insert ids report 0, like database/sql drivers do.
        write!(
            f,
            "lastInsertId: {}, rowsAffected: {}",
            self.last_insert_id.unwrap_or(0),
            self.rows_affected
        )
    }
}

/// Column names plus a lazily produced row stream.
pub struct ResultSet<'a> {
    /// Column names in result order.
    pub columns: Vec<String>,

    /// Rows, produced one at a time.
    pub rows: RowStream<'a>,
}

impl fmt::Debug for ResultSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// Converts a text value into a cell.
pub fn text_cell(value: impl AsRef<str>) -> Cell {
    Some(value.as_ref().as_bytes().to_vec())
}
