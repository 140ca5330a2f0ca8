/// Running totals over observed row representation lengths.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RowSizeStats {
    count: u64,
    total_bytes: u64,
    max_row_bytes: u64,
}

impl RowSizeStats {
    #[inline]
    pub fn record(&mut self, bytes: u64) {
        self.count += 1;
        self.total_bytes = self.total_bytes.saturating_add(bytes);
        self.max_row_bytes = self.max_row_bytes.max(bytes);
    }

    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    #[inline]
    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    #[inline]
    pub fn max_row_bytes(&self) -> u64 {
        self.max_row_bytes
    }

    /// Mean row size rounded half up, or `None` before the first sample.
    pub fn mean(&self) -> Option<u64> {
        if self.count == 0 {
            return None;
        }
        let count = self.count as u128;
        Some(((self.total_bytes as u128 + count / 2) / count) as u64)
    }
}
