//! Slice-based source implementation.

use super::{FAKE_EOI, SkipError, Source};
use crate::cursor::Window;

/// A source over data already in memory.
///
/// By default the whole slice is delivered as a single chunk during
/// initialization. Once exhausted, every refill delivers a fake end-of-image
/// marker.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    chunk_size: usize,
}

impl<'a> SliceSource<'a> {
    /// Deliver `data` as a single chunk.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            chunk_size: usize::MAX,
        }
    }

    /// Deliver `data` in chunks of at most `chunk_size` bytes.
    pub fn with_chunk_size(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bytes not yet delivered to the window.
    pub fn undelivered(&self) -> &'a [u8] {
        self.data
    }

    fn load_next(&mut self, window: &mut Window) {
        let (chunk, rest) = self.data.split_at(self.chunk_size.min(self.data.len()));
        window.load(chunk);
        self.data = rest;
    }
}

impl Source for SliceSource<'_> {
    fn init(&mut self, window: &mut Window) {
        self.load_next(window);
    }

    fn fill(&mut self, window: &mut Window) -> bool {
        if self.data.is_empty() {
            log::warn!("Premature end of JPEG data");
            window.load(&FAKE_EOI);
        } else {
            self.load_next(window);
        }

        true
    }

    /// Skip over undelivered data without copying it into the window.
    fn skip(&mut self, window: &mut Window, n: usize) -> Result<(), SkipError> {
        let buffered = window.remaining();

        if n <= buffered {
            window.consume(n);
        } else {
            window.clear();
            let n = (n - buffered).min(self.data.len());
            self.data = &self.data[n..];
        }

        Ok(())
    }
}
