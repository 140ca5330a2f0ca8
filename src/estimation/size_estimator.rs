/// Online estimator of the byte size of streamed rows.
///
/// Implementations accept one serialized row (or field) at a time via
/// [`observe`] and only look at its length. The current per-row estimate is
/// exposed via [`estimated_average_bytes`]. None of the operations fail:
/// an estimator without samples still reports a well-defined estimate.
///
/// [`observe`]: SizeEstimator::observe
/// [`estimated_average_bytes`]: SizeEstimator::estimated_average_bytes
pub trait SizeEstimator {
    /// Records one sample; `representation.len()` is the byte size proxy.
    fn observe(&mut self, representation: &str);

    /// Returns the current average row size in bytes.
    fn estimated_average_bytes(&self) -> u64;

    /// Number of samples this estimator has accounted for.
    fn sample_count(&self) -> u64;

    /// Largest single representation seen so far, in bytes.
    fn max_row_byte_size(&self) -> u64;

    /// Takes the pending fetch size recommendation, if any.
    ///
    /// A recommendation is reported once; later calls return `None` until
    /// new observations produce a different value.
    fn take_fetch_size(&mut self) -> Option<u32>;
}
