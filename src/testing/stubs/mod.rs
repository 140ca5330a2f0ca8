pub mod random_row_source;
pub mod vec_row_source;

pub use random_row_source::RandomRowSource;
pub use vec_row_source::VecRowSource;
