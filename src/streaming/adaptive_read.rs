use std::io::{Error, ErrorKind};

use tracing::{info, warn};

use crate::config::FetchSizeParams;
use crate::estimation::{SizeEstimator, TwoStageSizeEstimator};
use crate::streaming::RowSource;

/// Streams rows out of a [`RowSource`] while tuning its fetch size.
///
/// The first round trip is kept small (`initial_sample_size` rows). Every row
/// is fed to a [`TwoStageSizeEstimator`] owned by this read, and whenever the
/// estimator recommends a different fetch size the source is told about it.
pub struct AdaptiveRead<S: RowSource> {
    source: S,
    estimator: TwoStageSizeEstimator,
    fetch_size: u32,
    rows_read: u64,
    finished: bool,
}

impl<S: RowSource> AdaptiveRead<S> {
    pub fn new(mut source: S, params: FetchSizeParams) -> Result<Self, Error> {
        params
            .validate()
            .map_err(|e| Error::new(ErrorKind::InvalidInput, e))?;

        let fetch_size = u32::try_from(params.initial_sample_size)
            .unwrap_or(u32::MAX)
            .min(params.max_fetch_size)
            .max(params.min_fetch_size);
        source.set_fetch_size(fetch_size)?;

        Ok(Self {
            source,
            estimator: TwoStageSizeEstimator::with_params(params),
            fetch_size,
            rows_read: 0,
            finished: false,
        })
    }

    /// Budget (bytes) the buffered rows may take; clamped to the configured
    /// buffer bounds.
    pub fn with_buffer_byte_size(self, bytes: u64) -> Self {
        Self {
            estimator: self.estimator.with_buffer_byte_size(bytes),
            ..self
        }
    }

    #[inline]
    pub fn fetch_size(&self) -> u32 {
        self.fetch_size
    }

    #[inline]
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    #[inline]
    pub fn estimator(&self) -> &TwoStageSizeEstimator {
        &self.estimator
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn apply_fetch_size(&mut self) {
        let Some(fetch_size) = self.estimator.take_fetch_size() else {
            return;
        };
        if fetch_size == self.fetch_size {
            return;
        }
        match self.source.set_fetch_size(fetch_size) {
            Ok(()) => {
                info!(
                    rows = self.rows_read,
                    avg_row_bytes = self.estimator.estimated_average_bytes(),
                    from = self.fetch_size,
                    to = fetch_size,
                    "updating fetch size"
                );
                self.fetch_size = fetch_size;
            }
            Err(e) => warn!(error = %e, fetch_size, "source rejected fetch size"),
        }
    }
}

impl<S: RowSource> Iterator for AdaptiveRead<S> {
    type Item = Result<S::Row, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let row = match self.source.next_row() {
            Ok(Some(row)) => row,
            Ok(None) => {
                self.finished = true;
                return None;
            }
            Err(e) => {
                warn!(error = %e, rows = self.rows_read, "row source failed");
                self.finished = true;
                return Some(Err(e));
            }
        };
        self.rows_read += 1;
        {
            let representation = self.source.representation(&row);
            self.estimator.observe(&representation);
        }
        self.apply_fetch_size();
        Some(Ok(row))
    }
}
