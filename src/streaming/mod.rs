mod adaptive_read;
mod row_source;

pub use adaptive_read::AdaptiveRead;
pub use row_source::RowSource;
