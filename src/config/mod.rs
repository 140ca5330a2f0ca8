mod error;
mod params;

pub use error::ConfigError;
pub use params::FetchSizeParams;
