pub mod stubs;

pub use stubs::{RandomRowSource, VecRowSource};
