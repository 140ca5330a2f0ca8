//! Row size estimation for streamed database reads.
//!
//! A [`TwoStageSizeEstimator`] watches the serialized rows of one read and
//! keeps an estimate of the average row size, starting from a fixed bootstrap
//! value and moving to a running mean once enough rows were seen. The
//! estimate drives two pure derivations: the target buffer budget
//! ([`target_buffer_byte_size`]) and the number of rows per round trip
//! ([`fetch_size_for`]). [`AdaptiveRead`] wires both into a row cursor.
//!
//! [`TwoStageSizeEstimator`]: estimation::TwoStageSizeEstimator
//! [`target_buffer_byte_size`]: estimation::target_buffer_byte_size
//! [`fetch_size_for`]: estimation::fetch_size_for
//! [`AdaptiveRead`]: streaming::AdaptiveRead

pub mod config;
pub mod constants;
pub mod estimation;
pub mod streaming;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
