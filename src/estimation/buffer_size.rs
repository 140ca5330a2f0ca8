//! Pure mappings from byte estimates to buffer budgets and fetch sizes.

use crate::config::FetchSizeParams;
use crate::constants::UNBOUNDED_BYTE_SIZE;

/// Derives the client-side buffer budget for a byte estimate.
///
/// * `None` yields `min_buffer_byte_size`.
/// * The estimate is scaled by `target_buffer_size_ratio` and rounded half
///   away from zero.
/// * An input of [`UNBOUNDED_BYTE_SIZE`] or more, a non-finite product, or
///   a product outside `u64` yields the minimum. An unrepresentable
///   estimate is treated as garbage, not as a huge row.
/// * Otherwise the result is clamped to
///   `[min_buffer_byte_size, max_buffer_byte_size]`. If the bounds are
///   inverted the lower bound wins.
///
/// Deterministic and side-effect free; never panics.
pub fn target_buffer_byte_size(params: &FetchSizeParams, average_row_byte_size: Option<u64>) -> u64 {
    let min = params.min_buffer_byte_size;
    let Some(bytes) = average_row_byte_size else {
        return min;
    };
    match scale(bytes, params.target_buffer_size_ratio) {
        Some(raw) => raw.min(params.max_buffer_byte_size).max(min),
        None => min,
    }
}

/// Rows per round trip for a buffer budget and an average row size.
///
/// A zero row size carries no information and yields `default_fetch_size`.
/// Otherwise `buffer / row` is rounded and clamped to
/// `[min_fetch_size, max_fetch_size]`, the lower bound winning if the two
/// are inverted.
pub fn fetch_size_for(params: &FetchSizeParams, buffer_byte_size: u64, average_row_byte_size: u64) -> u32 {
    if average_row_byte_size == 0 {
        return params.default_fetch_size;
    }
    let raw = (buffer_byte_size as f64 / average_row_byte_size as f64).round();
    raw.min(params.max_fetch_size as f64)
        .max(params.min_fetch_size as f64) as u32
}

fn scale(bytes: u64, ratio: f64) -> Option<u64> {
    if bytes >= UNBOUNDED_BYTE_SIZE {
        return None;
    }
    let raw = (bytes as f64 * ratio).round();
    // `u64::MAX as f64` is 2^64, one past the largest u64.
    if !raw.is_finite() || raw < 0.0 || raw >= u64::MAX as f64 {
        return None;
    }
    Some(raw as u64)
}
