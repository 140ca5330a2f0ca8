//! Built-in thresholds for row size estimation and fetch sizing.
//!
//! These back `FetchSizeParams::default()`. Deployments that need different
//! bounds load a [`FetchSizeParams`] instead.
//!
//! [`FetchSizeParams`]: crate::config::FetchSizeParams

/// Number of observations served by the bootstrap stage before switching to
/// the running average.
pub const INITIAL_SAMPLE_SIZE: u64 = 10;

/// During the sampling stage a new fetch size is recommended at most once
/// every this many rows.
pub const SAMPLE_FREQUENCY: u64 = 100;

/// Lower bound of the client-side buffer budget (250 MiB).
pub const MIN_BUFFER_BYTE_SIZE: u64 = 250 * 1024 * 1024;

/// Upper bound of the client-side buffer budget (1 GiB).
pub const MAX_BUFFER_BYTE_SIZE: u64 = 1024 * 1024 * 1024;

/// Share of the input size that may be spent on buffered rows.
pub const TARGET_BUFFER_SIZE_RATIO: f64 = 0.6;

/// Fewest rows requested per round trip.
pub const MIN_FETCH_SIZE: u32 = 1;

/// Rows per round trip while the row size is unknown.
pub const DEFAULT_FETCH_SIZE: u32 = 1000;

/// Most rows requested per round trip.
pub const MAX_FETCH_SIZE: u32 = 1_000_000_000;

/// Row size reported while too few rows have been seen. Chosen so that the
/// minimum buffer divided by it gives [`DEFAULT_FETCH_SIZE`].
pub const BOOTSTRAP_ROW_BYTE_ESTIMATE: u64 = MIN_BUFFER_BYTE_SIZE / DEFAULT_FETCH_SIZE as u64;

/// `i64::MAX`, the "no limit" value drivers report for an unknown size.
/// Byte sizes at or above it are never scaled.
pub const UNBOUNDED_BYTE_SIZE: u64 = i64::MAX as u64;
