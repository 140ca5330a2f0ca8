use strum_macros::{Display, EnumDiscriminants, EnumIter, IntoStaticStr};
use tracing::debug;

use crate::config::FetchSizeParams;
use crate::estimation::buffer_size;
use crate::estimation::{InitialSizeEstimator, SamplingSizeEstimator, SizeEstimator};

/// The estimator currently serving a [`TwoStageSizeEstimator`].
///
/// Only `Bootstrap -> Sampling` is ever taken, and only once.
#[derive(Debug, Clone, EnumDiscriminants)]
#[strum_discriminants(name(EstimatorStage))]
#[strum_discriminants(derive(EnumIter, Display, IntoStaticStr))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum SizeEstimatorStage {
    Bootstrap(InitialSizeEstimator),
    Sampling(SamplingSizeEstimator),
}

impl SizeEstimatorStage {
    #[inline]
    fn active(&self) -> &dyn SizeEstimator {
        match self {
            Self::Bootstrap(e) => e,
            Self::Sampling(e) => e,
        }
    }

    #[inline]
    fn active_mut(&mut self) -> &mut dyn SizeEstimator {
        match self {
            Self::Bootstrap(e) => e,
            Self::Sampling(e) => e,
        }
    }
}

/// Per-read row size estimator that starts on a fixed bootstrap estimate and
/// moves to a running mean after `initial_sample_size` rows.
///
/// The first `initial_sample_size` observations are served by
/// [`InitialSizeEstimator`]. The next observation replaces it with a
/// [`SamplingSizeEstimator`] seeded with everything seen so far, which then
/// serves the rest of the read. Create one instance per streamed read; the
/// state is never shared.
#[derive(Debug, Clone)]
pub struct TwoStageSizeEstimator {
    params: FetchSizeParams,
    delegate: SizeEstimatorStage,
}

impl TwoStageSizeEstimator {
    /// Fresh estimator on the built-in constants.
    pub fn new() -> Self {
        Self::with_params(FetchSizeParams::default())
    }

    /// Fresh estimator on `params`, budgeting `min_buffer_byte_size` for the
    /// buffered rows.
    pub fn with_params(params: FetchSizeParams) -> Self {
        Self {
            params,
            delegate: SizeEstimatorStage::Bootstrap(InitialSizeEstimator::new(
                params,
                params.min_buffer_byte_size,
            )),
        }
    }

    /// Sets the buffer budget used to turn row sizes into fetch sizes,
    /// clamped to the configured buffer bounds.
    pub fn with_buffer_byte_size(mut self, bytes: u64) -> Self {
        let bytes = self.params.clamp_buffer_byte_size(bytes);
        match &mut self.delegate {
            SizeEstimatorStage::Bootstrap(e) => e.set_buffer_byte_size(bytes),
            SizeEstimatorStage::Sampling(e) => e.set_buffer_byte_size(bytes),
        }
        self
    }

    #[inline]
    pub fn params(&self) -> &FetchSizeParams {
        &self.params
    }

    #[inline]
    pub fn delegate(&self) -> &SizeEstimatorStage {
        &self.delegate
    }

    #[inline]
    pub fn stage(&self) -> EstimatorStage {
        EstimatorStage::from(&self.delegate)
    }

    pub fn buffer_byte_size(&self) -> u64 {
        match &self.delegate {
            SizeEstimatorStage::Bootstrap(e) => e.buffer_byte_size(),
            SizeEstimatorStage::Sampling(e) => e.buffer_byte_size(),
        }
    }

    /// Buffer budget for `average_row_byte_size` under the built-in
    /// constants. Needs no estimator instance.
    ///
    /// See [`buffer_size::target_buffer_byte_size`] for the exact rules.
    #[inline]
    pub fn target_buffer_byte_size(average_row_byte_size: Option<u64>) -> u64 {
        buffer_size::target_buffer_byte_size(&FetchSizeParams::BUILT_IN, average_row_byte_size)
    }

    fn switch_to_sampling_if_due(&mut self) {
        let SizeEstimatorStage::Bootstrap(initial) = &self.delegate else {
            return;
        };
        if initial.sample_count() < self.params.initial_sample_size {
            return;
        }
        debug!(
            samples = initial.sample_count(),
            total_bytes = initial.stats().total_bytes(),
            "switching row size estimation to sampling"
        );
        self.delegate = SizeEstimatorStage::Sampling(SamplingSizeEstimator::seeded_from(initial));
    }
}

impl Default for TwoStageSizeEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl SizeEstimator for TwoStageSizeEstimator {
    fn observe(&mut self, representation: &str) {
        self.switch_to_sampling_if_due();
        self.delegate.active_mut().observe(representation);
    }

    #[inline]
    fn estimated_average_bytes(&self) -> u64 {
        self.delegate.active().estimated_average_bytes()
    }

    #[inline]
    fn sample_count(&self) -> u64 {
        self.delegate.active().sample_count()
    }

    #[inline]
    fn max_row_byte_size(&self) -> u64 {
        self.delegate.active().max_row_byte_size()
    }

    fn take_fetch_size(&mut self) -> Option<u32> {
        self.delegate.active_mut().take_fetch_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{
        BOOTSTRAP_ROW_BYTE_ESTIMATE, INITIAL_SAMPLE_SIZE, MAX_BUFFER_BYTE_SIZE,
        MIN_BUFFER_BYTE_SIZE, TARGET_BUFFER_SIZE_RATIO,
    };
    use strum::IntoEnumIterator;

    #[test]
    fn delegation_switches_after_initial_samples() {
        let mut e = TwoStageSizeEstimator::new();
        for _ in 0..INITIAL_SAMPLE_SIZE {
            e.observe("1");
            assert!(matches!(e.delegate(), SizeEstimatorStage::Bootstrap(_)));
        }
        for _ in 0..3 {
            e.observe("1");
            assert!(matches!(e.delegate(), SizeEstimatorStage::Sampling(_)));
        }
    }

    #[test]
    fn switch_point_does_not_depend_on_values() {
        let p = FetchSizeParams {
            initial_sample_size: 4,
            ..FetchSizeParams::default()
        };
        let rows = ["", "a very long row representation", "x", "", "yy", ""];
        let mut e = TwoStageSizeEstimator::with_params(p);
        let mut stages = Vec::new();
        for r in rows {
            e.observe(r);
            stages.push(e.stage());
        }
        assert_eq!(
            stages,
            [
                EstimatorStage::Bootstrap,
                EstimatorStage::Bootstrap,
                EstimatorStage::Bootstrap,
                EstimatorStage::Bootstrap,
                EstimatorStage::Sampling,
                EstimatorStage::Sampling,
            ]
        );
    }

    #[test]
    fn fresh_estimator_is_bootstrap_without_samples() {
        let e = TwoStageSizeEstimator::default();
        assert_eq!(e.stage(), EstimatorStage::Bootstrap);
        assert_eq!(e.sample_count(), 0);
        assert_eq!(e.estimated_average_bytes(), BOOTSTRAP_ROW_BYTE_ESTIMATE);
    }

    #[test]
    fn sampling_stage_averages_every_observation() {
        let p = FetchSizeParams {
            initial_sample_size: 2,
            ..FetchSizeParams::default()
        };
        let mut e = TwoStageSizeEstimator::with_params(p);
        e.observe("aaaa");
        e.observe("aaaa");
        assert_eq!(e.estimated_average_bytes(), BOOTSTRAP_ROW_BYTE_ESTIMATE);
        e.observe("a");
        // (4 + 4 + 1) / 3
        assert_eq!(e.estimated_average_bytes(), 3);
        assert_eq!(e.sample_count(), 3);
        assert_eq!(e.max_row_byte_size(), 4);
    }

    #[test]
    fn instances_do_not_share_state() {
        let mut a = TwoStageSizeEstimator::new();
        for _ in 0..=INITIAL_SAMPLE_SIZE {
            a.observe("row");
        }
        let b = TwoStageSizeEstimator::new();
        assert_eq!(a.stage(), EstimatorStage::Sampling);
        assert_eq!(b.stage(), EstimatorStage::Bootstrap);
        assert_eq!(b.sample_count(), 0);
    }

    #[test]
    fn first_fetch_size_is_reported_at_end_of_bootstrap() {
        let p = FetchSizeParams {
            initial_sample_size: 2,
            sample_frequency: 1_000,
            ..FetchSizeParams::default()
        };
        let mut e = TwoStageSizeEstimator::with_params(p).with_buffer_byte_size(0);
        assert_eq!(e.buffer_byte_size(), MIN_BUFFER_BYTE_SIZE);
        e.observe(&"a".repeat(1024));
        assert_eq!(e.take_fetch_size(), None);
        e.observe(&"a".repeat(1024));
        assert_eq!(e.take_fetch_size(), Some(256_000));
        e.observe(&"a".repeat(1024));
        assert_eq!(e.take_fetch_size(), None);
    }

    #[test]
    fn unvalidated_params_never_panic() {
        let p = FetchSizeParams {
            initial_sample_size: 1,
            sample_frequency: 1,
            min_fetch_size: 50,
            max_fetch_size: 5,
            min_buffer_byte_size: 10,
            max_buffer_byte_size: 9,
            ..FetchSizeParams::default()
        };
        let mut e = TwoStageSizeEstimator::with_params(p).with_buffer_byte_size(1_000);
        assert_eq!(e.buffer_byte_size(), 10);
        e.observe("abc");
        assert_eq!(e.take_fetch_size(), Some(50));
        e.observe("abcdef");
        assert_eq!(e.stage(), EstimatorStage::Sampling);
        assert_eq!(e.take_fetch_size(), None);
    }

    #[test]
    fn pending_fetch_size_survives_the_switch() {
        let p = FetchSizeParams {
            initial_sample_size: 1,
            ..FetchSizeParams::default()
        };
        let mut e = TwoStageSizeEstimator::with_params(p);
        e.observe(&"a".repeat(1024));
        e.observe(&"a".repeat(1024));
        assert_eq!(e.stage(), EstimatorStage::Sampling);
        assert_eq!(e.take_fetch_size(), Some(256_000));
    }

    #[test]
    fn buffer_byte_size_is_clamped() {
        let e = TwoStageSizeEstimator::new().with_buffer_byte_size(u64::MAX);
        assert_eq!(e.buffer_byte_size(), MAX_BUFFER_BYTE_SIZE);
    }

    #[test]
    fn target_buffer_byte_size_reference_points() {
        assert_eq!(
            TwoStageSizeEstimator::target_buffer_byte_size(None),
            MIN_BUFFER_BYTE_SIZE
        );
        assert_eq!(
            TwoStageSizeEstimator::target_buffer_byte_size(Some(i64::MAX as u64)),
            MIN_BUFFER_BYTE_SIZE
        );
        assert_eq!(
            TwoStageSizeEstimator::target_buffer_byte_size(Some(MIN_BUFFER_BYTE_SIZE - 10)),
            MIN_BUFFER_BYTE_SIZE
        );
        let over = (MAX_BUFFER_BYTE_SIZE as f64 / TARGET_BUFFER_SIZE_RATIO).round() as u64 + 10;
        assert_eq!(
            TwoStageSizeEstimator::target_buffer_byte_size(Some(over)),
            MAX_BUFFER_BYTE_SIZE
        );
    }

    #[test]
    fn target_buffer_byte_size_ignores_estimator_state() {
        let before = TwoStageSizeEstimator::target_buffer_byte_size(Some(700 * 1024 * 1024));
        let mut e = TwoStageSizeEstimator::new();
        for _ in 0..50 {
            e.observe("some row");
        }
        let after = TwoStageSizeEstimator::target_buffer_byte_size(Some(700 * 1024 * 1024));
        assert_eq!(before, after);
    }

    #[test]
    fn stage_names_are_kebab_case() {
        let names: Vec<&'static str> = EstimatorStage::iter().map(Into::into).collect();
        assert_eq!(names, ["bootstrap", "sampling"]);
        assert_eq!(EstimatorStage::Sampling.to_string(), "sampling");
    }
}
