use crate::config::FetchSizeParams;
use crate::estimation::buffer_size::fetch_size_for;
use crate::estimation::{InitialSizeEstimator, RowSizeStats, SizeEstimator};

/// Steady stage: running mean over every observed row.
///
/// `mean = total_bytes / count`, rounded half up. The fetch size is
/// re-derived every `sample_frequency` observations and only reported when
/// it differs from the last reported value.
#[derive(Debug, Clone)]
pub struct SamplingSizeEstimator {
    params: FetchSizeParams,
    buffer_byte_size: u64,
    stats: RowSizeStats,
    since_refresh: u64,
    last_fetch_size: Option<u32>,
    pending_fetch_size: Option<u32>,
}

impl SamplingSizeEstimator {
    /// Starts from zero samples.
    pub fn new(params: FetchSizeParams, buffer_byte_size: u64) -> Self {
        Self {
            params,
            buffer_byte_size,
            stats: RowSizeStats::default(),
            since_refresh: 0,
            last_fetch_size: None,
            pending_fetch_size: None,
        }
    }

    /// Continues from the bootstrap stage: its counts and totals become the
    /// starting point of the running mean.
    pub fn seeded_from(initial: &InitialSizeEstimator) -> Self {
        Self {
            params: *initial.params(),
            buffer_byte_size: initial.buffer_byte_size(),
            stats: *initial.stats(),
            since_refresh: 0,
            last_fetch_size: initial.fetch_size(),
            pending_fetch_size: initial.pending_fetch_size(),
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
}

impl SizeEstimator for SamplingSizeEstimator {
    fn observe(&mut self, representation: &str) {
        self.stats.record(representation.len() as u64);
        self.since_refresh += 1;
        if self.since_refresh < self.params.sample_frequency {
            return;
        }
        self.since_refresh = 0;

        let fetch_size = fetch_size_for(
            &self.params,
            self.buffer_byte_size,
            self.estimated_average_bytes(),
        );
        if self.last_fetch_size != Some(fetch_size) {
            self.last_fetch_size = Some(fetch_size);
            self.pending_fetch_size = Some(fetch_size);
        }
    }

    #[inline]
    fn estimated_average_bytes(&self) -> u64 {
        self.stats
            .mean()
            .unwrap_or(self.params.bootstrap_row_byte_estimate)
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
        self.pending_fetch_size.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BOOTSTRAP_ROW_BYTE_ESTIMATE;

    fn params(initial: u64, freq: u64) -> FetchSizeParams {
        FetchSizeParams {
            initial_sample_size: initial,
            sample_frequency: freq,
            ..FetchSizeParams::default()
        }
    }

    #[test]
    fn empty_falls_back_to_bootstrap_estimate() {
        let e = SamplingSizeEstimator::new(FetchSizeParams::default(), 1_000);
        assert_eq!(e.estimated_average_bytes(), BOOTSTRAP_ROW_BYTE_ESTIMATE);
    }

    #[test]
    fn running_mean_over_all_rows() {
        let mut e = SamplingSizeEstimator::new(params(1, 100), 1_000);
        e.observe("aa");
        e.observe("aaaa");
        assert_eq!(e.estimated_average_bytes(), 3);
        e.observe("aaaaaaaaa");
        assert_eq!(e.estimated_average_bytes(), 5);
        assert_eq!(e.max_row_byte_size(), 9);
        assert_eq!(e.sample_count(), 3);
    }

    #[test]
    fn seeding_keeps_bootstrap_totals() {
        let mut initial = InitialSizeEstimator::new(params(2, 100), 1_000);
        initial.observe("aaaaaaaaaa");
        initial.observe("aaaaaaaaaa");

        let mut e = SamplingSizeEstimator::seeded_from(&initial);
        assert_eq!(e.sample_count(), 2);
        assert_eq!(e.estimated_average_bytes(), 10);

        e.observe("");
        // (10 + 10 + 0) / 3 = 6.67
        assert_eq!(e.estimated_average_bytes(), 7);
        assert_eq!(e.max_row_byte_size(), 10);
    }

    #[test]
    fn untaken_bootstrap_recommendation_is_carried_over() {
        let mut initial = InitialSizeEstimator::new(params(1, 100), 1_000);
        initial.observe("aaaa");
        let mut e = SamplingSizeEstimator::seeded_from(&initial);
        assert_eq!(e.take_fetch_size(), Some(250));
        assert_eq!(e.take_fetch_size(), None);
    }

    #[test]
    fn taken_bootstrap_recommendation_is_not_repeated() {
        let mut initial = InitialSizeEstimator::new(params(1, 1), 1_000);
        initial.observe("aaaa");
        assert_eq!(initial.take_fetch_size(), Some(250));

        let mut e = SamplingSizeEstimator::seeded_from(&initial);
        assert_eq!(e.take_fetch_size(), None);
        // refresh with an unchanged mean reports nothing
        e.observe("aaaa");
        assert_eq!(e.take_fetch_size(), None);
        e.observe(&"a".repeat(16));
        // (4 + 4 + 16) / 3 = 8
        assert_eq!(e.take_fetch_size(), Some(125));
    }

    #[test]
    fn fetch_size_refreshes_every_sample_frequency_rows() {
        let mut e = SamplingSizeEstimator::new(params(1, 3), 1_000);
        e.observe("aaaaaaaaaa");
        e.observe("aaaaaaaaaa");
        assert_eq!(e.take_fetch_size(), None);
        e.observe("aaaaaaaaaa");
        assert_eq!(e.take_fetch_size(), Some(100));

        // same mean, same fetch size: nothing new to report
        for _ in 0..3 {
            e.observe("aaaaaaaaaa");
        }
        assert_eq!(e.take_fetch_size(), None);

        // mean moves to (60 + 3 * 40) / 9 = 20
        for _ in 0..3 {
            e.observe(&"a".repeat(40));
        }
        assert_eq!(e.take_fetch_size(), Some(50));
    }
}
