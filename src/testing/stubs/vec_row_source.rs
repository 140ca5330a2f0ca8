use crate::streaming::RowSource;
use std::borrow::Cow;
use std::io::Error;

/// In-memory result set that records every fetch size it is given.
pub struct VecRowSource {
    pub rows: Vec<String>,
    pub fetch_sizes: Vec<u32>,
    idx: usize,
    fail_at: Option<usize>,
    reject_changes: bool,
}

impl VecRowSource {
    pub fn new(rows: Vec<String>) -> Self {
        Self {
            rows,
            fetch_sizes: Vec::new(),
            idx: 0,
            fail_at: None,
            reject_changes: false,
        }
    }

    /// `next_row` fails instead of returning the row at `idx`.
    pub fn failing_at(mut self, idx: usize) -> Self {
        self.fail_at = Some(idx);
        self
    }

    /// Accepts the first fetch size, rejects every later one.
    pub fn rejecting_fetch_size_changes(mut self) -> Self {
        self.reject_changes = true;
        self
    }
}

impl RowSource for VecRowSource {
    type Row = String;

    fn next_row(&mut self) -> Result<Option<String>, Error> {
        if self.fail_at == Some(self.idx) {
            return Err(Error::other("connection reset"));
        }
        let row = self.rows.get(self.idx).cloned();
        if row.is_some() {
            self.idx += 1;
        }
        Ok(row)
    }

    fn set_fetch_size(&mut self, fetch_size: u32) -> Result<(), Error> {
        if self.reject_changes && !self.fetch_sizes.is_empty() {
            return Err(Error::other("fetch size is fixed"));
        }
        self.fetch_sizes.push(fetch_size);
        Ok(())
    }

    fn representation<'a>(&self, row: &'a String) -> Cow<'a, str> {
        Cow::Borrowed(row)
    }
}
