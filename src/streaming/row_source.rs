use std::borrow::Cow;
use std::io::Error;

/// Pull-based cursor over the rows of one query result.
///
/// This is the seam to the database driver: it produces rows, accepts fetch
/// size hints and knows how to serialize a row for size estimation.
pub trait RowSource {
    type Row;

    /// Produces the next row, or `None` once the result is exhausted.
    fn next_row(&mut self) -> Result<Option<Self::Row>, Error>;

    /// Asks the driver to fetch `fetch_size` rows per round trip from now on.
    ///
    /// This is a hint; drivers may ignore it.
    fn set_fetch_size(&mut self, fetch_size: u32) -> Result<(), Error>;

    /// Serialized form of `row`. Only its length is used.
    fn representation<'a>(&self, row: &'a Self::Row) -> Cow<'a, str>;
}
