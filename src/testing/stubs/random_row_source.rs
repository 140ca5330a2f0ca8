use crate::streaming::RowSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::borrow::Cow;
use std::io::Error;

/// Rows of uniformly random width, as lists of integer fields.
///
/// The representation joins the fields with commas, so the serialized size
/// only becomes known when a row is observed.
#[derive(Debug)]
pub struct RandomRowSource {
    rng: StdRng,
    remaining: usize,
    min_len: usize,
    max_len: usize,
    pub fetch_size: Option<u32>,
}

impl RandomRowSource {
    /// `rows` rows whose representation is `min_len..=max_len` bytes long.
    pub fn new(rows: usize, min_len: usize, max_len: usize, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            remaining: rows,
            min_len: min_len.max(1),
            max_len: max_len.max(min_len.max(1)),
            fetch_size: None,
        }
    }
}

impl RowSource for RandomRowSource {
    type Row = Vec<u8>;

    fn next_row(&mut self) -> Result<Option<Vec<u8>>, Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        // n single-digit fields joined by n - 1 commas: 2n - 1 bytes
        let len = self.rng.random_range(self.min_len..=self.max_len);
        let fields = len.div_ceil(2);
        let mut row: Vec<u8> = (0..fields).map(|_| self.rng.random_range(0..10)).collect();
        if len % 2 == 0 {
            // pad with a trailing empty field
            row.push(u8::MAX);
        }
        Ok(Some(row))
    }

    fn set_fetch_size(&mut self, fetch_size: u32) -> Result<(), Error> {
        self.fetch_size = Some(fetch_size);
        Ok(())
    }

    fn representation<'a>(&self, row: &'a Vec<u8>) -> Cow<'a, str> {
        let fields: Vec<String> = row
            .iter()
            .map(|&v| if v == u8::MAX { String::new() } else { v.to_string() })
            .collect();
        Cow::Owned(fields.join(","))
    }
}
