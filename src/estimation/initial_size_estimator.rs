use crate::config::FetchSizeParams;
use crate::estimation::buffer_size::fetch_size_for;
use crate::estimation::{RowSizeStats, SizeEstimator};

/// Bootstrap stage: reports a fixed conservative row size.
///
/// Samples are still counted and summed so the sampling stage can be seeded
/// with them, but they never move [`estimated_average_bytes`] away from
/// `bootstrap_row_byte_estimate`. Once `initial_sample_size` rows have been
/// seen, a first fetch size derived from their mean becomes available.
///
/// [`estimated_average_bytes`]: SizeEstimator::estimated_average_bytes
#[derive(Debug, Clone)]
pub struct InitialSizeEstimator {
    params: FetchSizeParams,
    buffer_byte_size: u64,
    stats: RowSizeStats,
    fetch_size: Option<u32>,
    fetch_size_taken: bool,
}

impl InitialSizeEstimator {
    pub fn new(params: FetchSizeParams, buffer_byte_size: u64) -> Self {
        Self {
            params,
            buffer_byte_size,
            stats: RowSizeStats::default(),
            fetch_size: None,
            fetch_size_taken: false,
        }
    }

    #[inline]
    pub fn stats(&self) -> &RowSizeStats {
        &self.stats
    }

    #[inline]
    pub fn buffer_byte_size(&self) -> u64 {
        self.buffer_byte_size
    }

    pub(crate) fn set_buffer_byte_size(&mut self, bytes: u64) {
        self.buffer_byte_size = bytes;
    }

    pub(crate) fn params(&self) -> &FetchSizeParams {
        &self.params
    }

    /// Fetch size derived from the bootstrap samples, once there are enough.
    pub(crate) fn fetch_size(&self) -> Option<u32> {
        self.fetch_size
    }

    /// The derived fetch size if nobody has taken it yet.
    pub(crate) fn pending_fetch_size(&self) -> Option<u32> {
        self.fetch_size.filter(|_| !self.fetch_size_taken)
    }
}

impl SizeEstimator for InitialSizeEstimator {
    fn observe(&mut self, representation: &str) {
        self.stats.record(representation.len() as u64);
        if self.stats.count() == self.params.initial_sample_size {
            let mean = self.stats.mean().unwrap_or(self.params.bootstrap_row_byte_estimate);
            self.fetch_size = Some(fetch_size_for(&self.params, self.buffer_byte_size, mean));
        }
    }

    #[inline]
    fn estimated_average_bytes(&self) -> u64 {
        self.params.bootstrap_row_byte_estimate
    }

    #[inline]
    fn sample_count(&self) -> u64 {
        self.stats.count()
    }

    #[inline]
    fn max_row_byte_size(&self) -> u64 {
        self.stats.max_row_bytes()
    }

    fn take_fetch_size(&mut self) -> Option<u32> {
        let pending = self.pending_fetch_size();
        if pending.is_some() {
            self.fetch_size_taken = true;
        }
        pending
    }
}
