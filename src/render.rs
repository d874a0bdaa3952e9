//! Binary-safe rendering of query results.
//!
//! Produces a tab-separated table: a header line of column names, a line of
//! `---` placeholders, then one line per row. Every cell is either valid UTF-8
//! shown verbatim, or binary shown in a lossless single-line encoding.

use std::borrow::Cow;
use std::io::Write;

use base64::{engine::general_purpose::URL_SAFE, Engine};

use crate::db::Cell;
use crate::error::{DemoError, Result};

/// Token printed for SQL NULL cells.
pub const NULL_TOKEN: &str = "<NULL>";

/// Placeholder printed under each column name.
pub const SEPARATOR_TOKEN: &str = "---";

/// How cells that are not valid UTF-8 are displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BinaryEncoding {
    /// URL-safe, padded base64 without prefix.
    #[default]
    Base64Url,
    /// Lowercase hex with a `0x` prefix.
    Hex,
}

impl BinaryEncoding {
    /// Picks the encoding from the `--hex` flag.
    pub fn from_prefer_hex(prefer_hex: bool) -> Self {
        if prefer_hex {
            Self::Hex
        } else {
            Self::Base64Url
        }
    }

    /// Encodes raw bytes in this representation.
    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => format!("0x{}", hex::encode(bytes)),
            Self::Base64Url => URL_SAFE.encode(bytes),
        }
    }
}

/// Maps raw bytes to a printable string.
///
/// Valid UTF-8 (including the empty sequence) is returned as-is; anything
/// else goes through `encoding`.
pub fn classify(bytes: &[u8], encoding: BinaryEncoding) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(encoding.encode(bytes)),
    }
}

/// Renders one cell, mapping NULL to [`NULL_TOKEN`].
pub fn render_cell(cell: &Cell, encoding: BinaryEncoding) -> Cow<'_, str> {
    match cell {
        Some(bytes) => classify(bytes, encoding),
        None => Cow::Borrowed(NULL_TOKEN),
    }
}

/// Renders the column names line followed by the separator line.
pub fn render_header<S: AsRef<str>>(columns: &[S]) -> String {
    let names: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();
    let dashes = vec![SEPARATOR_TOKEN; columns.len()];
    format!("{}\n{}", names.join("\t"), dashes.join("\t"))
}

/// Renders a row of cells as a single tab-separated line (without newline).
pub fn render_row(cells: &[Cell], encoding: BinaryEncoding) -> String {
    cells
        .iter()
        .map(|cell| render_cell(cell, encoding))
        .collect::<Vec<_>>()
        .join("\t")
}

/// Writes a rendered table to any sink, one row at a time.
pub struct TableWriter<W: Write> {
    out: W,
    encoding: BinaryEncoding,
    rows_written: usize,
}

impl<W: Write> TableWriter<W> {
    /// Creates a writer using the given binary fallback.
    pub fn new(out: W, encoding: BinaryEncoding) -> Self {
        Self {
            out,
            encoding,
            rows_written: 0,
        }
    }

    /// Writes the header and separator lines.
    pub fn write_header<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        writeln!(self.out, "{}", render_header(columns)).map_err(write_error)
    }

    /// Writes one row.
    pub fn write_row(&mut self, cells: &[Cell]) -> Result<()> {
        writeln!(self.out, "{}", render_row(cells, self.encoding)).map_err(write_error)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Number of rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flushes and returns the underlying sink.
    pub fn finish(mut self) -> Result<W> {
        self.out.flush().map_err(write_error)?;
        Ok(self.out)
    }
}

fn write_error(e: std::io::Error) -> DemoError {
    DemoError::io(format!("Failed to write output: {e}"))
}
