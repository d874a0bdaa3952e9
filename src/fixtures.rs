//! Random fixture rows drawn from file-backed corpora.
//!
//! Each corpus is a newline-delimited file. Draws are bounded by the fixed
//! [`POOL_SIZE`] rather than by the corpus length, and bulk inserts are capped
//! by the same bound.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

use crate::error::{DemoError, Result};

/// Number of leading corpus lines eligible for random draws.
pub const POOL_SIZE: usize = 25;

/// Corpus file names expected inside the test data directory.
pub const USERNAMES_FILE: &str = "usernames";
pub const PASSWORDS_FILE: &str = "passwords";
pub const EMAILS_FILE: &str = "emails";

/// An immutable, ordered list of candidate strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    lines: Vec<String>,
}

impl Corpus {
    /// Builds a corpus from in-memory lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Loads a corpus from a newline-delimited file.
    ///
    /// Lines need not be UTF-8; invalid sequences are replaced with U+FFFD.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read(path).map_err(|e| DemoError::io(format!("{}: {e}", path.display())))?;
        let corpus = Self::parse(&String::from_utf8_lossy(&content));
        debug!("Loaded {} lines from {}", corpus.len(), path.display());
        Ok(corpus)
    }

    /// Splits text into lines, dropping `\r` before `\n`.
    fn parse(content: &str) -> Self {
        Self::from_lines(content.lines())
    }

    /// Number of lines in the corpus.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if the corpus has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the line at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Draws a line uniformly from the first `pool_size` entries.
    ///
    /// Fails when `pool_size` exceeds the corpus length, even if the drawn
    /// index would have been in range.
    pub fn pick<R: Rng>(&self, rng: &mut R, pool_size: usize) -> Result<&str> {
        if pool_size == 0 {
            return Err(DemoError::fixture("pool size must be at least 1"));
        }
        if pool_size > self.lines.len() {
            return Err(DemoError::fixture(format!(
                "pool size {pool_size} exceeds corpus length {}",
                self.lines.len()
            )));
        }
        let index = rng.gen_range(0..pool_size);
        Ok(&self.lines[index])
    }
}

/// One generated row for `test_table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRow {
    pub username: String,
    pub password: String,
    pub email: String,
}

/// The three corpora used to build fixture rows.
#[derive(Debug, Clone)]
pub struct FixtureSet {
    usernames: Corpus,
    passwords: Corpus,
    emails: Corpus,
}

impl FixtureSet {
    /// Creates a fixture set from already loaded corpora.
    pub fn new(usernames: Corpus, passwords: Corpus, emails: Corpus) -> Self {
        Self {
            usernames,
            passwords,
            emails,
        }
    }

    /// Loads `usernames`, `passwords` and `emails` from `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        let load = |name: &str| -> Result<Corpus> { Corpus::load(&corpus_path(dir, name)) };
        Ok(Self {
            emails: load(EMAILS_FILE)?,
            passwords: load(PASSWORDS_FILE)?,
            usernames: load(USERNAMES_FILE)?,
        })
    }

    /// Draws one row, each column independently, bounded by [`POOL_SIZE`].
    pub fn next_row<R: Rng>(&self, rng: &mut R) -> Result<FixtureRow> {
        Ok(FixtureRow {
            username: self.usernames.pick(rng, POOL_SIZE)?.to_string(),
            password: self.passwords.pick(rng, POOL_SIZE)?.to_string(),
            email: self.emails.pick(rng, POOL_SIZE)?.to_string(),
        })
    }
}

fn corpus_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

/// Validates a requested bulk insert count against [`POOL_SIZE`].
pub fn check_insert_count(count: usize) -> Result<()> {
    if count > POOL_SIZE {
        return Err(DemoError::fixture(format!(
            "Too much to insert. Use value from range [1 .. {POOL_SIZE}]"
        )));
    }
    Ok(())
}
